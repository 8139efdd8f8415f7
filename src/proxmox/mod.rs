pub mod client;
pub mod cluster;
pub mod error;
pub mod guests;
pub mod nodes;
pub mod storage;

pub use client::ProxmoxClient;
pub use error::ProxmoxError;
