use galaxy::config::{Config, LogConfig};
use galaxy::server;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: jemallocator::Jemalloc = jemallocator::Jemalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env 不存在时忽略
    let _ = dotenvy::dotenv();

    let config = Config::load()?;
    init_tracing(&config.log);

    tracing::info!(listen_addr = %config.server.listen_addr, "Starting galaxy registry...");
    server::start(config).await?;
    Ok(())
}

fn init_tracing(log: &LogConfig) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.filter)))
        .with(tracing_subscriber::fmt::layer())
        .init();
}
