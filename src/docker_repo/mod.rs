// Docker container listing via bollard

use crate::error::ProbeError;
use crate::models::{Container, PortMapping, SourceResult};
use crate::probe::ContainerRuntimeClient;
use async_trait::async_trait;
use bollard::Docker;
use bollard::query_parameters::ListContainersOptions;
use bollard::models::{ContainerSummary, PortSummary};
use tracing::{instrument, warn};

/// Host address reported when the engine omits one.
pub const WILDCARD_ADDRESS: &str = "0.0.0.0";

/// Shares one `Docker` handle across requests. The handle is internally thread-safe and
/// holds no per-request state; when it could not be built every call reports Unavailable.
pub struct DockerRepo {
    docker: Option<Docker>,
}

impl DockerRepo {
    pub fn connect() -> Self {
        match Docker::connect_with_local_defaults() {
            Ok(docker) => Self {
                docker: Some(docker),
            },
            Err(e) => {
                warn!(error = %e, "Docker client unavailable; containers will report unavailable");
                Self { docker: None }
            }
        }
    }

    /// A repo with no engine, e.g. for hosts where Docker is disabled.
    pub fn disabled() -> Self {
        Self { docker: None }
    }

    #[instrument(skip(self), fields(repo = "docker", operation = "list_containers"))]
    pub async fn get_containers(&self) -> Result<Vec<Container>, ProbeError> {
        let docker = self
            .docker
            .as_ref()
            .ok_or_else(|| ProbeError::Unavailable("container engine not available".into()))?;

        let options = ListContainersOptions {
            all: true,
            ..Default::default()
        };
        let containers = docker
            .list_containers(Some(options))
            .await
            .map_err(classify_error)?;

        Ok(containers.iter().map(normalize_container).collect())
    }
}

#[async_trait]
impl ContainerRuntimeClient for DockerRepo {
    async fn list_containers(&self) -> SourceResult<Vec<Container>> {
        SourceResult::from_probe("containers", self.get_containers().await)
    }
}

/// Missing socket or refused connection means no engine on this host; anything else is an error.
pub(crate) fn classify_error(e: bollard::errors::Error) -> ProbeError {
    if is_engine_absent(&e) {
        ProbeError::Unavailable(format!("container engine not running: {}", e))
    } else {
        ProbeError::Failed(format!("docker list_containers: {}", e))
    }
}

fn is_engine_absent(e: &bollard::errors::Error) -> bool {
    use bollard::errors::Error;
    match e {
        Error::SocketNotFoundError(_) => return true,
        Error::IOError { err } if is_absent_io(err) => return true,
        _ => {}
    }
    let mut source = std::error::Error::source(e);
    while let Some(err) = source {
        if let Some(io) = err.downcast_ref::<std::io::Error>()
            && is_absent_io(io)
        {
            return true;
        }
        source = err.source();
    }
    false
}

fn is_absent_io(err: &std::io::Error) -> bool {
    matches!(
        err.kind(),
        std::io::ErrorKind::NotFound | std::io::ErrorKind::ConnectionRefused
    )
}

/// Strip a single leading `/` from an engine-reported name.
pub fn normalize_name(raw: &str) -> String {
    raw.strip_prefix('/').unwrap_or(raw).to_string()
}

pub fn normalize_port(p: &PortSummary) -> PortMapping {
    PortMapping {
        host_address: p
            .ip
            .as_deref()
            .filter(|ip| !ip.is_empty())
            .unwrap_or(WILDCARD_ADDRESS)
            .to_string(),
        host_port: p.public_port.map(|port| port.to_string()).unwrap_or_default(),
    }
}

/// Convert an engine summary into our model. Port order is kept as reported.
pub fn normalize_container(c: &ContainerSummary) -> Container {
    let id = c.id.clone().unwrap_or_default();
    let name = c
        .names
        .as_ref()
        .and_then(|n| n.first())
        .map(|n| normalize_name(n))
        .unwrap_or_else(|| id.clone());
    Container {
        id,
        name,
        image: c.image.clone().unwrap_or_default(),
        status: c.status.clone().unwrap_or_default(),
        ports: c
            .ports
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(normalize_port)
            .collect(),
    }
}
