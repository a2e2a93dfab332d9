// Docker container models

use serde::{Deserialize, Serialize};

/// One published port mapping. `host_port` is empty when the port is exposed but not published.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortMapping {
    pub host_address: String,
    pub host_port: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    pub id: String,
    pub name: String,
    pub image: String,
    /// Free-form engine status text, e.g. "Up 2 hours" or "Exited (0) 3 days ago".
    pub status: String,
    pub ports: Vec<PortMapping>,
}
