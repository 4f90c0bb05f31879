use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tonic::transport::{Channel, Endpoint};

use super::config::RegistryClientConfig;
use super::error::RegistryClientError;
use crate::registry::{
    AnnounceRequest, ListCatalogRequest, LookupRequest, ModuleEntry,
    registry_service_client::RegistryServiceClient,
};

/// 节点侧的注册中心客户端
#[derive(Debug, Clone)]
pub struct RegistryClient {
    config: RegistryClientConfig,
    client: RegistryServiceClient<Channel>,
}

impl RegistryClient {
    /// 创建新的注册中心客户端
    pub async fn new(config: RegistryClientConfig) -> Result<Self, RegistryClientError> {
        let endpoint = Endpoint::from_shared(config.registry_address.clone())?
            .connect_timeout(config.connect_timeout)
            .timeout(config.default_timeout);

        let channel = endpoint.connect().await?;
        let client = RegistryServiceClient::new(channel);

        Ok(Self { config, client })
    }

    /// 便捷的创建方法，使用默认配置
    pub async fn connect(registry_address: &str) -> Result<Self, RegistryClientError> {
        let config = RegistryClientConfig {
            registry_address: registry_address.to_string(),
            ..Default::default()
        };
        Self::new(config).await
    }

    pub fn host(&self) -> &str {
        &self.config.host
    }

    /// 宣告本节点在 `address` 上导出的组件
    pub async fn announce(
        &mut self,
        address: &str,
        components: &[String],
    ) -> Result<(), RegistryClientError> {
        let request = AnnounceRequest {
            address: address.to_string(),
            components: components.to_vec(),
            host: self.config.host.clone(),
            api_version: self.config.api_version,
        };

        let reply = self.client.announce(request).await?.into_inner();
        if reply.success {
            tracing::debug!(address = %address, components = ?components, "Announced components");
            return Ok(());
        }

        Err(RegistryClientError::Rejected {
            failure: reply.failure(),
            message: reply.message,
        })
    }

    /// 查找方法地址；未注册时返回 `Ok(None)`
    pub async fn lookup(&mut self, method_name: &str) -> Result<Option<String>, RegistryClientError> {
        let reply = self
            .client
            .lookup(LookupRequest {
                method_name: method_name.to_string(),
            })
            .await?
            .into_inner();

        Ok(reply.found.then_some(reply.address))
    }

    pub async fn list_catalog(&mut self) -> Result<Vec<ModuleEntry>, RegistryClientError> {
        let reply = self.client.list_catalog(ListCatalogRequest {}).await?.into_inner();
        Ok(reply.modules)
    }

    /// 按固定间隔重新宣告，直到 `shutdown` 被取消
    ///
    /// 第一次宣告立即发生。单次失败只记录日志，下一个周期继续重试。
    pub fn spawn_reannounce(
        &self,
        address: String,
        components: Vec<String>,
        every: Duration,
        shutdown: CancellationToken,
    ) -> JoinHandle<()> {
        let mut client = self.clone();

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => {
                        tracing::debug!(host = %client.host(), "Re-announce loop stopped");
                        break;
                    }
                    _ = interval.tick() => {
                        if let Err(e) = client.announce(&address, &components).await {
                            tracing::warn!(
                                error = %e,
                                address = %address,
                                host = %client.host(),
                                "Failed to re-announce components"
                            );
                        }
                    }
                }
            }
        })
    }
}
