use std::sync::Arc;

use async_trait::async_trait;
use hook_proto::info::{
    info_server::Info, HookPoint, InfoParams, InfoResult, ON_DEFINE_DOMAIN_HOOK_POINT,
};
use log::{debug, info};
use tonic::{Request, Response, Status};

use crate::config::Config;

/// Answers the launcher's discovery call.
pub struct InfoService {
    config: Arc<Config>,
}

impl InfoService {
    pub fn new(config: Arc<Config>) -> Self {
        InfoService { config }
    }
}

#[async_trait]
impl Info for InfoService {
    async fn info(&self, request: Request<InfoParams>) -> Result<Response<InfoResult>, Status> {
        info!("Info method has been called");
        debug!(
            "caller supports versions {:?}",
            request.get_ref().supported_versions
        );

        Ok(Response::new(InfoResult {
            name: self.config.name.clone(),
            versions: vec![self.config.version.to_string()],
            hook_points: vec![HookPoint {
                name: ON_DEFINE_DOMAIN_HOOK_POINT.into(),
                priority: 0,
            }],
        }))
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use hook_proto::info::{info_server::Info, HookPoint, InfoParams};
    use tonic::Request;

    use super::InfoService;
    use crate::config::Config;

    #[tokio::test]
    async fn advertises_on_define_domain() {
        let config = Config::new(Some("v1alpha1"), "/tmp".into()).unwrap();
        let service = InfoService::new(Arc::new(config));

        let result = service
            .info(Request::new(InfoParams {
                supported_versions: vec!["v1alpha1".into(), "v1alpha2".into()],
            }))
            .await
            .unwrap()
            .into_inner();

        assert_eq!(result.name, "shim");
        assert_eq!(result.versions, vec!["v1alpha1".to_string()]);
        assert_eq!(
            result.hook_points,
            vec![HookPoint {
                name: "OnDefineDomain".into(),
                priority: 0,
            }]
        );
    }
}
