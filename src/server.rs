use std::future::Future;

use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::Server;

use crate::config::Config;
use crate::registry::registry_service_server::RegistryServiceServer;
use crate::services::{Catalog, MyRegistryService, SharedCatalog};

pub async fn start(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = config.listen_addr()?;

    // 初始化服务目录，进程内唯一
    let catalog = Catalog::shared();
    let registry_service = MyRegistryService::new(catalog);

    tracing::info!(%addr, "Galaxy registry listening");

    Server::builder()
        .add_service(RegistryServiceServer::new(registry_service))
        .serve_with_shutdown(addr, shutdown_signal())
        .await?;

    tracing::info!("Galaxy registry stopped");
    Ok(())
}

/// 在已绑定的监听器上提供服务，直到 `shutdown` 完成
pub async fn serve_with_listener<F>(
    listener: TcpListener,
    catalog: SharedCatalog,
    shutdown: F,
) -> Result<(), tonic::transport::Error>
where
    F: Future<Output = ()>,
{
    let registry_service = MyRegistryService::new(catalog);

    Server::builder()
        .add_service(RegistryServiceServer::new(registry_service))
        .serve_with_incoming_shutdown(TcpListenerStream::new(listener), shutdown)
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
