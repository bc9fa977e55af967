use std::sync::Arc;

use async_trait::async_trait;
use hook_proto::{v1alpha1, v1alpha2};
use log::{error, info};
use tonic::{Request, Response, Status};

use crate::rewrite::{error::Error, DomainHook};

/// Callback service for both API versions; only the negotiated one is
/// registered with the server.
pub struct CallbacksService {
    hook: Arc<DomainHook>,
}

impl CallbacksService {
    pub fn new(hook: Arc<DomainHook>) -> Self {
        CallbacksService { hook }
    }

    fn define_domain(&self, vmi: &[u8], domain_xml: &[u8]) -> Result<Vec<u8>, Status> {
        info!("OnDefineDomain method has been called");
        self.hook.on_define_domain(vmi, domain_xml).map_err(|e| {
            error!("failed OnDefineDomain: {}", e);
            status(e)
        })
    }
}

fn status(e: Error) -> Status {
    match e {
        Error::DecodeDomain(_) => Status::invalid_argument(e.to_string()),
        Error::EncodeDomain(_) => Status::internal(e.to_string()),
    }
}

#[async_trait]
impl v1alpha1::callbacks_server::Callbacks for CallbacksService {
    async fn on_define_domain(
        &self,
        request: Request<v1alpha1::OnDefineDomainParams>,
    ) -> Result<Response<v1alpha1::OnDefineDomainResult>, Status> {
        let params = request.into_inner();
        let domain_xml = self.define_domain(&params.vmi, &params.domain_xml)?;

        Ok(Response::new(v1alpha1::OnDefineDomainResult { domain_xml }))
    }
}

#[async_trait]
impl v1alpha2::callbacks_server::Callbacks for CallbacksService {
    async fn on_define_domain(
        &self,
        request: Request<v1alpha2::OnDefineDomainParams>,
    ) -> Result<Response<v1alpha2::OnDefineDomainResult>, Status> {
        let params = request.into_inner();
        let domain_xml = self.define_domain(&params.vmi, &params.domain_xml)?;

        Ok(Response::new(v1alpha2::OnDefineDomainResult { domain_xml }))
    }

    async fn pre_cloud_init_iso(
        &self,
        request: Request<v1alpha2::PreCloudInitIsoParams>,
    ) -> Result<Response<v1alpha2::PreCloudInitIsoResult>, Status> {
        info!("PreCloudInitIso method has been called, it is a no-op");
        let params = request.into_inner();

        Ok(Response::new(v1alpha2::PreCloudInitIsoResult {
            cloud_init_data: params.cloud_init_data,
        }))
    }
}
