use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// 组件名解析错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComponentNameError {
    #[error("component name is empty")]
    Empty,

    #[error("component name has an empty segment")]
    EmptySegment,

    #[error("component name has more than one '.' separator")]
    TooManySegments,
}

/// 组件标识：可选的模块前缀 + 服务名
///
/// `"billing.Charge"` 解析为模块 `billing`、服务 `Charge`；
/// `"Charge"` 是不带模块的裸名称。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ComponentName {
    module: Option<String>,
    service: String,
}

impl ComponentName {
    pub fn qualified(module: impl Into<String>, service: impl Into<String>) -> Self {
        Self {
            module: Some(module.into()),
            service: service.into(),
        }
    }

    pub fn bare(service: impl Into<String>) -> Self {
        Self {
            module: None,
            service: service.into(),
        }
    }

    /// 按模块名构造；空模块名对应裸名称
    pub fn in_module(module: &str, service: impl Into<String>) -> Self {
        if module.is_empty() {
            Self::bare(service)
        } else {
            Self::qualified(module, service)
        }
    }

    pub fn module(&self) -> Option<&str> {
        self.module.as_deref()
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn is_qualified(&self) -> bool {
        self.module.is_some()
    }
}

impl FromStr for ComponentName {
    type Err = ComponentNameError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        if raw.is_empty() {
            return Err(ComponentNameError::Empty);
        }

        let mut parts = raw.split('.');
        let first = parts.next().unwrap_or_default();
        let second = parts.next();
        if parts.next().is_some() {
            return Err(ComponentNameError::TooManySegments);
        }

        match second {
            None => Ok(Self::bare(first)),
            Some(service) if !first.is_empty() && !service.is_empty() => {
                Ok(Self::qualified(first, service))
            }
            Some(_) => Err(ComponentNameError::EmptySegment),
        }
    }
}

impl fmt::Display for ComponentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.module {
            Some(module) => write!(f, "{module}.{}", self.service),
            None => f.write_str(&self.service),
        }
    }
}
