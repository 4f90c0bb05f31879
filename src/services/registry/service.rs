use std::time::{SystemTime, UNIX_EPOCH};

use super::registrar::Registrar;
use super::resolver::Resolver;
use crate::registry::{HostEntry, ModuleEntry, ServiceEntry};
use crate::services::catalog::{Catalog, Host, Module, Service, SharedCatalog};

// 定义的服务实现
#[derive(Debug, Clone)]
pub struct MyRegistryService {
    pub catalog: SharedCatalog,
    pub registrar: Registrar,
    pub resolver: Resolver,
}

impl MyRegistryService {
    pub fn new(catalog: SharedCatalog) -> Self {
        Self {
            registrar: Registrar::new(catalog.clone()),
            resolver: Resolver::new(catalog.clone()),
            catalog,
        }
    }

    // 目录快照，只用于诊断
    pub async fn snapshot(&self) -> Vec<ModuleEntry> {
        let catalog = self.catalog.read().await;
        catalog_entries(&catalog)
    }
}

pub fn catalog_entries(catalog: &Catalog) -> Vec<ModuleEntry> {
    catalog.modules().map(module_entry).collect()
}

fn module_entry(module: &Module) -> ModuleEntry {
    ModuleEntry {
        name: module.name().to_string(),
        services: module.services().iter().map(service_entry).collect(),
    }
}

fn service_entry(service: &Service) -> ServiceEntry {
    ServiceEntry {
        name: service.name().to_string(),
        address: service.instance().address().to_string(),
        hosts: service.instance().hosts().iter().map(host_entry).collect(),
    }
}

fn host_entry(host: &Host) -> HostEntry {
    HostEntry {
        name: host.name.clone(),
        last_seen: unix_seconds(host.last_seen),
    }
}

fn unix_seconds(time: SystemTime) -> i64 {
    time.duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_secs()).unwrap_or(i64::MAX))
        .unwrap_or_default()
}
