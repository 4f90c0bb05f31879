use tonic::Status;

use crate::registry::AnnounceFailure;

/// 注册中心客户端错误类型
#[derive(Debug, thiserror::Error)]
pub enum RegistryClientError {
    #[error("Transport error: {0}")]
    Transport(#[from] tonic::transport::Error),
    #[error("gRPC error: {0}")]
    Grpc(#[from] Status),
    #[error("Announcement rejected ({failure:?}): {message}")]
    Rejected {
        failure: AnnounceFailure,
        message: String,
    },
}
