use tonic::{Request, Response, Status};

use super::registrar::Announcement;
use super::service::MyRegistryService;
use crate::registry::{
    AnnounceFailure, AnnounceRequest, AnnounceResponse, ListCatalogRequest, ListCatalogResponse,
    LookupRequest, LookupResponse, registry_service_server::RegistryService,
};

// 为结构体实现 gRPC 服务 trait
#[tonic::async_trait]
impl RegistryService for MyRegistryService {
    async fn announce(
        &self,
        request: Request<AnnounceRequest>,
    ) -> Result<Response<AnnounceResponse>, Status> {
        let announcement = Announcement::from(request.into_inner());

        // 协议层面的拒绝放在响应体里返回，Status 只留给传输错误
        let reply = match self.registrar.announce(announcement).await {
            Ok(_) => AnnounceResponse {
                success: true,
                failure: AnnounceFailure::Unspecified as i32,
                message: "Registration successful".into(),
            },
            Err(e) => AnnounceResponse {
                success: false,
                failure: e.failure() as i32,
                message: e.to_string(),
            },
        };

        Ok(Response::new(reply))
    }

    async fn lookup(
        &self,
        request: Request<LookupRequest>,
    ) -> Result<Response<LookupResponse>, Status> {
        let req = request.into_inner();

        let reply = match self.resolver.lookup(&req.method_name).await {
            Some(address) => LookupResponse {
                found: true,
                address,
            },
            None => LookupResponse {
                found: false,
                address: String::new(),
            },
        };

        Ok(Response::new(reply))
    }

    async fn list_catalog(
        &self,
        _request: Request<ListCatalogRequest>,
    ) -> Result<Response<ListCatalogResponse>, Status> {
        let modules = self.snapshot().await;
        tracing::debug!(modules = modules.len(), "Listing catalog");

        Ok(Response::new(ListCatalogResponse { modules }))
    }
}
