use crate::services::catalog::{Catalog, ComponentName, SharedCatalog};

#[derive(Debug, Clone)]
pub struct Resolver {
    catalog: SharedCatalog,
}

impl Resolver {
    pub fn new(catalog: SharedCatalog) -> Self {
        Self { catalog }
    }

    /// 查找当前服务该方法的地址；未注册返回 `None`，不是错误
    pub async fn lookup(&self, method_name: &str) -> Option<String> {
        let catalog = self.catalog.read().await;
        let address = resolve(&catalog, method_name);

        match &address {
            Some(address) => {
                tracing::debug!(method_name = %method_name, address = %address, "Lookup hit")
            }
            None => tracing::debug!(method_name = %method_name, "Lookup miss"),
        }

        address
    }
}

/// 线性扫描全部模块，返回第一个同名服务的地址
///
/// 不同模块下存在同名服务时，结果取决于目录的遍历顺序。
pub fn resolve(catalog: &Catalog, method_name: &str) -> Option<String> {
    // 不合法的名字不可能被注册过
    let name = method_name.parse::<ComponentName>().ok()?;

    catalog
        .modules()
        .flat_map(|module| module.services())
        .find(|service| service.name() == &name)
        .map(|service| service.instance().address().to_string())
}
