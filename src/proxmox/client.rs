use crate::proxmox::error::{ProxmoxError, Result};
use anyhow::Context;
use reqwest::{Client, Method};
use serde_json::Value;
use url::Url;

/// Thin client over the Proxmox VE REST API (`/api2/json`).
///
/// Holds one reusable reqwest client and the pre-built API token header.
/// Certificate verification is disabled for this client only: Proxmox nodes
/// commonly serve self-signed certificates.
#[derive(Clone)]
pub struct ProxmoxClient {
    pub(crate) client: Client,
    pub(crate) base_url: Url,
    api_token: Option<String>,
}

impl ProxmoxClient {
    pub fn new(host: &str, port: u16) -> anyhow::Result<Self> {
        let scheme = if host.starts_with("http://") {
            "http"
        } else {
            "https"
        };

        let host_cleaned = host
            .strip_prefix("http://")
            .or_else(|| host.strip_prefix("https://"))
            .unwrap_or(host)
            .trim_end_matches('/');

        // A host that already carries a port wins over the configured one.
        let url_str = if host_cleaned.contains(':') {
            format!("{}://{}/api2/json/", scheme, host_cleaned)
        } else {
            format!("{}://{}:{}/api2/json/", scheme, host_cleaned, port)
        };

        let base_url = Url::parse(&url_str).context("Invalid host URL")?;

        let client = Client::builder()
            .danger_accept_invalid_certs(true)
            .build()
            .context("Failed to build reqwest client")?;

        Ok(Self {
            client,
            base_url,
            api_token: None,
        })
    }

    pub fn set_api_token(&mut self, user: &str, token_name: &str, token_value: &str) {
        self.api_token = Some(format!(
            "PVEAPIToken={}!{}={}",
            user, token_name, token_value
        ));
    }

    /// Issue a request and surface the `data` field of the response envelope.
    ///
    /// A missing or empty token is not checked here; the backend answers with
    /// 401 and that surfaces as `ProxmoxError::Api` like any other status.
    pub(crate) async fn request<T: serde::de::DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<T> {
        let url = self.base_url.join(path).map_err(ProxmoxError::Url)?;
        let mut req = self
            .client
            .request(method, url)
            .header("Content-Type", "application/json");

        if let Some(token) = &self.api_token {
            req = req.header("Authorization", token);
        }

        if let Some(b) = body {
            req = req.json(b);
        }

        let resp = req.send().await.map_err(ProxmoxError::Connection)?;

        let status = resp.status();
        let text = resp.text().await.map_err(ProxmoxError::Connection)?;

        if !status.is_success() {
            return Err(ProxmoxError::Api(status, text));
        }

        if text.trim().is_empty() {
            return Err(ProxmoxError::EmptyResponse);
        }

        let v: Value = serde_json::from_str(&text).map_err(ProxmoxError::Json)?;
        let data = v.get("data").cloned().unwrap_or(Value::Null);
        serde_json::from_value(data).map_err(ProxmoxError::Json)
    }
}
