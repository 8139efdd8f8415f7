use super::client::ProxmoxClient;
use super::error::Result;
use reqwest::Method;
use serde::Deserialize;

/// One entry of `/nodes/{node}/storage`.
#[derive(Deserialize, Debug, Clone)]
pub struct StorageInfo {
    pub storage: String,
    #[serde(rename = "type")]
    pub storage_type: Option<String>,
    pub content: Option<String>,
    pub enabled: Option<i64>,
    pub used: Option<u64>,
    pub total: Option<u64>,
}

impl ProxmoxClient {
    pub async fn get_node_storage(&self, node: &str) -> Result<Vec<StorageInfo>> {
        let path = format!("nodes/{}/storage", node);
        self.request(Method::GET, &path, None).await
    }
}
