use super::client::ProxmoxClient;
use super::error::Result;
use reqwest::Method;
use serde::Deserialize;

/// One entry of `/cluster/status`. The listing mixes a `cluster` record with
/// per-node records; the `type` field tells them apart.
#[derive(Deserialize, Debug, Clone)]
pub struct ClusterStatusEntry {
    #[serde(rename = "type")]
    pub entry_type: String,
    pub name: Option<String>,
    pub quorate: Option<i64>,
    pub online: Option<i64>,
}

impl ProxmoxClient {
    pub async fn get_cluster_status(&self) -> Result<Vec<ClusterStatusEntry>> {
        self.request(Method::GET, "cluster/status", None).await
    }
}
