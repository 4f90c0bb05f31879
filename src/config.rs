use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::net::SocketAddr;
use std::path::Path;

/// 配置文件路径的环境变量
pub const CONFIG_PATH_ENV: &str = "GALAXY_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";
const ENV_PREFIX: &str = "GALAXY_";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid environment override: {0}")]
    Env(#[from] envy::Error),
    #[error("Invalid listen address '{addr}': {source}")]
    ListenAddr {
        addr: String,
        source: std::net::AddrParseError,
    },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:50051".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `RUST_LOG` 未设置时使用的过滤规则
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

/// `GALAXY_*` 环境变量覆盖项
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnvOverrides {
    pub listen_addr: Option<String>,
    pub log_filter: Option<String>,
}

// 部署环境通过 PORT 指定端口
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PortOverride {
    pub port: Option<u16>,
}

impl Config {
    /// 读取配置文件（不存在时使用默认值），再应用环境变量覆盖
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into());
        let mut config = Self::from_file(Path::new(&path))?;

        let overrides: EnvOverrides = envy::prefixed(ENV_PREFIX).from_env()?;
        let port: PortOverride = envy::from_env()?;
        config.apply_overrides(overrides, port);

        // 尽早暴露非法地址
        config.listen_addr()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(config_str) => Self::from_toml_str(&config_str),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn from_toml_str(config_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(config_str)?)
    }

    pub fn apply_overrides(&mut self, overrides: EnvOverrides, port: PortOverride) {
        if let Some(listen_addr) = overrides.listen_addr {
            self.server.listen_addr = listen_addr;
        }
        if let Some(filter) = overrides.log_filter {
            self.log.filter = filter;
        }
        if let Some(port) = port.port {
            // 只替换端口；地址非法时留给 listen_addr() 报错
            if let Ok(mut addr) = self.server.listen_addr.parse::<SocketAddr>() {
                addr.set_port(port);
                self.server.listen_addr = addr.to_string();
            }
        }
    }

    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.server
            .listen_addr
            .parse()
            .map_err(|source| ConfigError::ListenAddr {
                addr: self.server.listen_addr.clone(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_when_sections_are_missing() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config.server.listen_addr, "0.0.0.0:50051");
        assert_eq!(config.log.filter, "info");
    }

    #[test]
    fn parses_toml_sections() {
        let config = Config::from_toml_str(
            r#"
            [server]
            listen_addr = "127.0.0.1:7000"

            [log]
            filter = "galaxy=debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.listen_addr().unwrap().port(), 7000);
        assert_eq!(config.log.filter, "galaxy=debug");
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = Config::from_file(Path::new("/nonexistent/galaxy/config.toml")).unwrap();
        assert_eq!(config.server.listen_addr, "0.0.0.0:50051");
    }

    #[test]
    fn environment_overrides_apply() {
        let overrides: EnvOverrides = envy::prefixed(ENV_PREFIX)
            .from_iter(env(&[
                ("GALAXY_LISTEN_ADDR", "127.0.0.1:6000"),
                ("GALAXY_LOG_FILTER", "debug"),
            ]))
            .unwrap();
        let port: PortOverride = envy::from_iter(env(&[("PORT", "9100")])).unwrap();

        let mut config = Config::default();
        config.apply_overrides(overrides, port);

        assert_eq!(config.server.listen_addr, "127.0.0.1:9100");
        assert_eq!(config.log.filter, "debug");
    }

    #[test]
    fn invalid_port_is_rejected() {
        let port: Result<PortOverride, _> = envy::from_iter(env(&[("PORT", "not-a-port")]));
        assert!(port.is_err());
    }

    #[test]
    fn invalid_listen_addr_is_reported() {
        let mut config = Config::default();
        config.server.listen_addr = "localhost".to_string();
        assert!(matches!(
            config.listen_addr(),
            Err(ConfigError::ListenAddr { .. })
        ));
    }
}
