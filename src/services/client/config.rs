use std::time::Duration;

use uuid::Uuid;

use crate::services::registry::SUPPORTED_API_VERSION;

/// 注册中心客户端配置
#[derive(Debug, Clone)]
pub struct RegistryClientConfig {
    /// 注册中心地址
    pub registry_address: String,
    /// 当前节点名，宣告时作为 host 上报
    pub host: String,
    /// 宣告使用的协议版本
    pub api_version: i32,
    /// 默认超时时间
    pub default_timeout: Duration,
    /// 连接超时时间
    pub connect_timeout: Duration,
}

impl Default for RegistryClientConfig {
    fn default() -> Self {
        Self {
            registry_address: "http://localhost:50051".to_string(),
            host: format!("node-{}", Uuid::new_v4()),
            api_version: SUPPORTED_API_VERSION,
            default_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}
