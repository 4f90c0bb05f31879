use thiserror::Error;

use crate::registry::AnnounceFailure;
use crate::services::catalog::ComponentNameError;

/// 宣告被拒绝的原因；任何一种都不会修改目录
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnnounceError {
    #[error("API version mismatch: registry speaks {supported}, remote sent {remote}")]
    VersionMismatch { supported: i32, remote: i32 },

    #[error("announcement address is empty")]
    EmptyAddress,

    #[error("no components to register")]
    NoComponents,

    #[error("invalid component name '{component}': {reason}")]
    InvalidComponent {
        component: String,
        reason: ComponentNameError,
    },

    #[error("multiple module exports are not supported: '{first}' and '{second}'")]
    MultiModuleNotSupported { first: String, second: String },

    #[error("health function not exported: expected '{expected}'")]
    MissingHealthExport { expected: String },
}

impl AnnounceError {
    /// 映射到线上协议里的失败类型
    pub fn failure(&self) -> AnnounceFailure {
        match self {
            AnnounceError::VersionMismatch { .. } => AnnounceFailure::VersionMismatch,
            AnnounceError::NoComponents => AnnounceFailure::NoComponents,
            AnnounceError::MultiModuleNotSupported { .. } => {
                AnnounceFailure::MultiModuleNotSupported
            }
            AnnounceError::MissingHealthExport { .. } => AnnounceFailure::MissingHealthExport,
            AnnounceError::EmptyAddress | AnnounceError::InvalidComponent { .. } => {
                AnnounceFailure::InvalidAnnouncement
            }
        }
    }
}
