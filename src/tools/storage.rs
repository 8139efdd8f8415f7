use super::{arg_str, text_payload, ToolContext};
use crate::format::usage_line;
use crate::proxmox::storage::StorageInfo;
use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::HashSet;

pub async fn list_storage(ctx: &ToolContext, args: &Value) -> Result<Value> {
    let nodes: Vec<String> = match arg_str(args, "node") {
        Some(n) => vec![n.to_string()],
        None => ctx
            .client
            .get_nodes()
            .await
            .context("Failed to connect to Proxmox")?
            .into_iter()
            .map(|n| n.node)
            .collect(),
    };

    // Shared storage shows up once per node that mounts it; the (name, node)
    // pair keeps those apart while collapsing duplicates within one listing.
    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut entries: Vec<(StorageInfo, String)> = Vec::new();
    for node in &nodes {
        let listed = ctx
            .client
            .get_node_storage(node)
            .await
            .context("Failed to connect to Proxmox")?;
        for s in listed {
            if seen.insert((s.storage.clone(), node.clone())) {
                entries.push((s, node.clone()));
            }
        }
    }

    if entries.is_empty() {
        return Ok(text_payload("No storage found"));
    }

    entries.sort_by(|a, b| a.0.storage.cmp(&b.0.storage));

    let mut out = String::from("Proxmox storage:\n");
    for (s, node) in &entries {
        let glyph = if s.enabled.unwrap_or(0) != 0 {
            "\u{1f7e2}"
        } else {
            "\u{1f534}"
        };
        out.push_str(&format!("\n{} {} (node: {})\n", glyph, s.storage, node));
        out.push_str(&format!(
            "  Type: {}\n",
            s.storage_type.as_deref().unwrap_or("N/A")
        ));
        out.push_str(&format!(
            "  Content: {}\n",
            s.content.as_deref().unwrap_or("N/A")
        ));
        if s.used.is_some() && s.total.is_some() {
            out.push_str(&format!("  Used: {}\n", usage_line(s.used, s.total)));
        }
    }

    Ok(text_payload(out))
}
