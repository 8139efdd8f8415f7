use super::client::ProxmoxClient;
use super::error::Result;
use reqwest::Method;
use serde::Deserialize;
use serde_json::Value;

/// One entry of the `/nodes` listing. Everything except the name is optional;
/// offline nodes in particular report very little.
#[derive(Deserialize, Debug, Clone)]
pub struct NodeInfo {
    pub node: String,
    pub status: Option<String>,
    pub uptime: Option<u64>,
    pub cpu: Option<f64>,
    pub maxcpu: Option<f64>,
    pub mem: Option<u64>,
    pub maxmem: Option<u64>,
    #[serde(default)]
    pub loadavg: Vec<Value>,
}

#[derive(Deserialize, Debug, Default)]
pub struct MemoryStatus {
    pub used: Option<u64>,
    pub total: Option<u64>,
}

#[derive(Deserialize, Debug, Default)]
pub struct RootFsStatus {
    pub used: Option<u64>,
    pub total: Option<u64>,
}

/// Detailed `/nodes/{node}/status` payload.
#[derive(Deserialize, Debug)]
pub struct NodeStatus {
    pub uptime: Option<u64>,
    pub cpu: Option<f64>,
    // Proxmox reports load averages as strings.
    #[serde(default)]
    pub loadavg: Vec<Value>,
    #[serde(default)]
    pub memory: MemoryStatus,
    #[serde(default)]
    pub rootfs: RootFsStatus,
}

impl ProxmoxClient {
    pub async fn get_nodes(&self) -> Result<Vec<NodeInfo>> {
        self.request(Method::GET, "nodes", None).await
    }

    pub async fn get_node_status(&self, node: &str) -> Result<NodeStatus> {
        let path = format!("nodes/{}/status", node);
        self.request(Method::GET, &path, None).await
    }
}
