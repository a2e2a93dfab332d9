// Domain models: probe payloads and the merged status snapshot

mod container;
mod metrics;
mod process;
mod snapshot;

pub use container::{Container, PortMapping};
pub use metrics::SystemMetrics;
pub use process::{ManagedProcess, ProcessStatus};
pub use snapshot::{SourceResult, StatusSnapshot};
