use std::sync::Arc;
use std::time::SystemTime;

use tokio::sync::RwLock;

use super::name::ComponentName;

// 上报节点
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Host {
    pub name: String,
    pub last_seen: SystemTime,
}

impl Host {
    pub fn new(name: impl Into<String>, last_seen: SystemTime) -> Self {
        Self {
            name: name.into(),
            last_seen,
        }
    }
}

// 服务当前的地址和确认过它的节点
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance {
    address: String,
    hosts: Vec<Host>,
}

impl Instance {
    pub fn new(address: impl Into<String>, host: Host) -> Self {
        Self {
            address: address.into(),
            hosts: vec![host],
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn hosts(&self) -> &[Host] {
        &self.hosts
    }

    pub fn host(&self, name: &str) -> Option<&Host> {
        self.hosts.iter().find(|host| host.name == name)
    }

    pub fn set_address(&mut self, address: &str) {
        self.address = address.to_string();
    }

    /// 刷新已有节点的 `last_seen`，不存在则追加；返回是否新增了节点
    pub fn touch_host(&mut self, name: &str, now: SystemTime) -> bool {
        match self.hosts.iter_mut().find(|host| host.name == name) {
            Some(host) => {
                host.last_seen = now;
                false
            }
            None => {
                self.hosts.push(Host::new(name, now));
                true
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Service {
    name: ComponentName,
    instance: Instance,
}

impl Service {
    pub fn new(name: ComponentName, instance: Instance) -> Self {
        Self { name, instance }
    }

    pub fn name(&self) -> &ComponentName {
        &self.name
    }

    pub fn instance(&self) -> &Instance {
        &self.instance
    }

    pub fn instance_mut(&mut self) -> &mut Instance {
        &mut self.instance
    }
}

// 模块：一组相关服务，服务按首次注册顺序保存
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    name: String,
    services: Vec<Service>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            services: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn services(&self) -> &[Service] {
        &self.services
    }

    pub fn services_mut(&mut self) -> impl Iterator<Item = &mut Service> {
        self.services.iter_mut()
    }

    pub fn service(&self, name: &ComponentName) -> Option<&Service> {
        self.services.iter().find(|service| service.name() == name)
    }

    pub fn push_service(&mut self, service: Service) {
        self.services.push(service);
    }
}

/// 服务目录，注册中心唯一的共享状态
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    modules: Vec<Module>,
}

/// 进程内共享的目录句柄；读写都必须经过这把锁
pub type SharedCatalog = Arc<RwLock<Catalog>>;

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 创建一个空目录并包装成共享句柄
    pub fn shared() -> SharedCatalog {
        Arc::new(RwLock::new(Self::new()))
    }

    pub fn modules(&self) -> impl Iterator<Item = &Module> {
        self.modules.iter()
    }

    pub fn module(&self, name: &str) -> Option<&Module> {
        self.modules.iter().find(|module| module.name == name)
    }

    pub fn module_mut(&mut self, name: &str) -> Option<&mut Module> {
        self.modules.iter_mut().find(|module| module.name == name)
    }

    /// 获取模块，不存在时追加一个空模块
    pub fn ensure_module(&mut self, name: &str) -> &mut Module {
        let index = match self.modules.iter().position(|module| module.name == name) {
            Some(index) => index,
            None => {
                self.modules.push(Module::new(name));
                self.modules.len() - 1
            }
        };
        &mut self.modules[index]
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn service_count(&self) -> usize {
        self.modules.iter().map(|module| module.services.len()).sum()
    }
}
