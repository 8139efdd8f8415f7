use super::client::ProxmoxClient;
use super::error::Result;
use reqwest::Method;
use serde::{Deserialize, Deserializer};
use serde_json::{json, Value};
use std::fmt;

/// Guest flavor. Decides which API subtree a guest lives under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuestKind {
    Qemu,
    Lxc,
}

impl GuestKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GuestKind::Qemu => "qemu",
            GuestKind::Lxc => "lxc",
        }
    }
}

impl fmt::Display for GuestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// LXC listings occasionally report vmid as a string.
fn de_vmid<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<i64, D::Error> {
    let v = Value::deserialize(deserializer)?;
    match &v {
        Value::Number(n) => n.as_i64().ok_or_else(|| serde::de::Error::custom("vmid out of range")),
        Value::String(s) => s
            .parse()
            .map_err(|_| serde::de::Error::custom("vmid is not numeric")),
        _ => Err(serde::de::Error::custom("vmid must be a number or string")),
    }
}

/// One entry of `/nodes/{node}/qemu` or `/nodes/{node}/lxc`.
#[derive(Deserialize, Debug, Clone)]
pub struct GuestInfo {
    #[serde(deserialize_with = "de_vmid")]
    pub vmid: i64,
    pub name: Option<String>,
    pub status: Option<String>,
    pub uptime: Option<u64>,
    pub cpu: Option<f64>,
    pub mem: Option<u64>,
    pub maxmem: Option<u64>,
}

/// `/nodes/{node}/{qemu|lxc}/{vmid}/status/current`.
#[derive(Deserialize, Debug)]
pub struct GuestStatus {
    pub name: Option<String>,
    pub status: Option<String>,
    pub uptime: Option<u64>,
    pub cpu: Option<f64>,
    pub mem: Option<u64>,
    pub maxmem: Option<u64>,
    pub diskread: Option<u64>,
    pub diskwrite: Option<u64>,
    pub netin: Option<u64>,
    pub netout: Option<u64>,
}

impl ProxmoxClient {
    pub async fn list_guests(&self, node: &str, kind: GuestKind) -> Result<Vec<GuestInfo>> {
        let path = format!("nodes/{}/{}", node, kind.as_str());
        self.request(Method::GET, &path, None).await
    }

    pub async fn guest_status(
        &self,
        node: &str,
        vmid: i64,
        kind: GuestKind,
    ) -> Result<GuestStatus> {
        let path = format!("nodes/{}/{}/{}/status/current", node, kind.as_str(), vmid);
        self.request(Method::GET, &path, None).await
    }

    /// Submit a command to the QEMU guest agent. Execution is asynchronous on
    /// the Proxmox side; only the in-guest pid comes back.
    pub async fn agent_exec(&self, node: &str, vmid: i64, command: &str) -> Result<Value> {
        let path = format!("nodes/{}/qemu/{}/agent/exec", node, vmid);
        let params = json!({ "command": command });
        self.request(Method::POST, &path, Some(&params)).await
    }

    /// Run a command in an LXC container. Output comes back inline.
    pub async fn lxc_exec(&self, node: &str, vmid: i64, command: &str) -> Result<Value> {
        let path = format!("nodes/{}/lxc/{}/exec", node, vmid);
        let params = json!({ "command": command });
        self.request(Method::POST, &path, Some(&params)).await
    }
}
