use std::time::SystemTime;

use super::error::AnnounceError;
use crate::services::catalog::{
    Catalog, ComponentName, Host, Instance, Service, SharedCatalog,
};

/// 注册中心支持的协议版本
pub const SUPPORTED_API_VERSION: i32 = 1;

/// 每个模块必须导出、但永远不会作为服务发布的健康检查组件
pub const HEALTH_SERVICE: &str = "Health";

/// 节点发来的一次宣告
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
    pub address: String,
    pub components: Vec<String>,
    pub host: String,
    pub api_version: i32,
}

impl From<crate::registry::AnnounceRequest> for Announcement {
    fn from(req: crate::registry::AnnounceRequest) -> Self {
        Self {
            address: req.address,
            components: req.components,
            host: req.host,
            api_version: req.api_version,
        }
    }
}

// 通过校验的宣告，合并阶段只处理这个类型
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedAnnouncement {
    pub module: String,
    pub components: Vec<ComponentName>,
    pub address: String,
    pub host: String,
}

/// 一次成功合并的结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnounceOutcome {
    pub module: String,
    pub created: usize,
    pub refreshed: usize,
}

#[derive(Debug, Clone)]
pub struct Registrar {
    catalog: SharedCatalog,
}

impl Registrar {
    pub fn new(catalog: SharedCatalog) -> Self {
        Self { catalog }
    }

    /// 校验并合并一次宣告。校验失败时目录保持不变。
    pub async fn announce(
        &self,
        announcement: Announcement,
    ) -> Result<AnnounceOutcome, AnnounceError> {
        tracing::info!(
            components = ?announcement.components,
            address = %announcement.address,
            host = %announcement.host,
            "Registering new components"
        );

        let validated = validate(&announcement).inspect_err(|e| {
            tracing::warn!(
                error = %e,
                components = ?announcement.components,
                address = %announcement.address,
                remote_version = announcement.api_version,
                "Unable to register components"
            );
        })?;

        // 整个合并过程持有写锁，查询不会看到合并到一半的模块
        let mut catalog = self.catalog.write().await;
        let outcome = merge(&mut catalog, &validated, SystemTime::now());

        tracing::info!(
            module = %outcome.module,
            created = outcome.created,
            refreshed = outcome.refreshed,
            address = %validated.address,
            "Components registered"
        );
        tracing::info!(catalog = ?*catalog, "Catalog state after merge");

        Ok(outcome)
    }
}

/// 按顺序执行全部校验，返回第一个失败
pub fn validate(announcement: &Announcement) -> Result<ValidatedAnnouncement, AnnounceError> {
    if announcement.api_version != SUPPORTED_API_VERSION {
        return Err(AnnounceError::VersionMismatch {
            supported: SUPPORTED_API_VERSION,
            remote: announcement.api_version,
        });
    }

    if announcement.address.is_empty() {
        return Err(AnnounceError::EmptyAddress);
    }

    if announcement.components.is_empty() {
        return Err(AnnounceError::NoComponents);
    }

    let components = announcement
        .components
        .iter()
        .map(|raw| {
            raw.parse::<ComponentName>()
                .map_err(|reason| AnnounceError::InvalidComponent {
                    component: raw.clone(),
                    reason,
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    // 裸名称不参与模块一致性检查
    let mut declared: Option<&str> = None;
    for module in components.iter().filter_map(ComponentName::module) {
        match declared {
            None => declared = Some(module),
            Some(first) if first != module => {
                return Err(AnnounceError::MultiModuleNotSupported {
                    first: first.to_string(),
                    second: module.to_string(),
                });
            }
            Some(_) => {}
        }
    }

    // 目标模块只取第一个组件的前缀
    let module = components[0].module().unwrap_or_default().to_string();

    let health = ComponentName::in_module(&module, HEALTH_SERVICE);
    if !components.contains(&health) {
        return Err(AnnounceError::MissingHealthExport {
            expected: health.to_string(),
        });
    }

    Ok(ValidatedAnnouncement {
        module,
        components,
        address: announcement.address.clone(),
        host: announcement.host.clone(),
    })
}

/// 把校验过的宣告合并进目录，调用方负责持有写锁
pub fn merge(
    catalog: &mut Catalog,
    announcement: &ValidatedAnnouncement,
    now: SystemTime,
) -> AnnounceOutcome {
    let mut outcome = AnnounceOutcome {
        module: announcement.module.clone(),
        ..Default::default()
    };

    // 已注册的服务：更新地址并刷新/追加节点
    if let Some(module) = catalog.module_mut(&announcement.module) {
        for service in module.services_mut() {
            if !announcement.components.contains(service.name()) {
                continue;
            }

            let instance = service.instance_mut();
            instance.set_address(&announcement.address);
            let added = instance.touch_host(&announcement.host, now);
            outcome.refreshed += 1;

            tracing::debug!(
                service = %service.name(),
                address = %announcement.address,
                host = %announcement.host,
                new_host = added,
                "Replaced existing service"
            );
        }
    }

    let module = catalog.ensure_module(&announcement.module);

    for component in &announcement.components {
        if component.service() == HEALTH_SERVICE || module.service(component).is_some() {
            continue;
        }

        module.push_service(Service::new(
            component.clone(),
            Instance::new(
                announcement.address.as_str(),
                Host::new(announcement.host.as_str(), now),
            ),
        ));
        outcome.created += 1;
    }

    outcome
}
