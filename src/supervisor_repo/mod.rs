// Process supervisor status: scoped connect -> list -> disconnect per call

mod pm2;

pub use pm2::{Pm2Connector, parse_jlist};

use crate::error::ProbeError;
use crate::models::{ManagedProcess, SourceResult};
use crate::probe::ProcessSupervisorClient;
use async_trait::async_trait;
use tracing::instrument;

/// Opens a session to the supervisor daemon. Connect errors mean the daemon is absent.
#[async_trait]
pub trait SupervisorConnector: Send + Sync {
    async fn connect(&self) -> Result<Box<dyn SupervisorSession>, ProbeError>;
}

/// One open connection. Never pooled: lives for exactly one `list_processes` call.
/// Implementations should also release on drop, since a timed-out call drops the session.
#[async_trait]
pub trait SupervisorSession: Send {
    async fn list(&mut self) -> anyhow::Result<Vec<ManagedProcess>>;
    async fn disconnect(&mut self);
}

pub struct SupervisorRepo<C> {
    connector: C,
}

impl<C: SupervisorConnector> SupervisorRepo<C> {
    pub fn new(connector: C) -> Self {
        Self { connector }
    }

    /// Single attempt; `disconnect` runs once whether or not `list` succeeded.
    #[instrument(skip(self), fields(repo = "supervisor", operation = "list_processes"))]
    pub async fn get_processes(&self) -> Result<Vec<ManagedProcess>, ProbeError> {
        let mut session = self.connector.connect().await.map_err(|e| {
            tracing::debug!(error = %e, "supervisor connect failed");
            ProbeError::Unavailable("process supervisor unreachable".into())
        })?;
        let listed = session.list().await;
        session.disconnect().await;
        listed.map_err(|e| ProbeError::Failed(format!("{:#}", e)))
    }
}

#[async_trait]
impl<C: SupervisorConnector> ProcessSupervisorClient for SupervisorRepo<C> {
    async fn list_processes(&self) -> SourceResult<Vec<ManagedProcess>> {
        SourceResult::from_probe("processes", self.get_processes().await)
    }
}
