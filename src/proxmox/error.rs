use thiserror::Error;

/// Failures from the Proxmox API client. The four network-facing kinds stay
/// distinguishable so handlers and tests can react to them individually.
#[derive(Error, Debug)]
pub enum ProxmoxError {
    #[error("Proxmox API error: {} - {1}", .0.as_u16())]
    Api(reqwest::StatusCode, String),

    #[error("empty response from Proxmox API")]
    EmptyResponse,

    #[error("failed to parse Proxmox API response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("connection to Proxmox failed: {0}")]
    Connection(#[from] reqwest::Error),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

pub type Result<T> = std::result::Result<T, ProxmoxError>;
