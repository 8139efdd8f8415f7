use super::{arg_str, text_payload, ToolContext};
use crate::format::{cpu_percent, format_uptime, load_sample, status_glyph, usage_line};
use anyhow::{Context, Result};
use serde_json::Value;

const ELEVATED_HINT: &str = "\u{1f512} Node status requires elevated permissions.\n\n\
    Set PROXMOX_ALLOW_ELEVATED=true in the environment and make sure the API \
    token has Sys.Audit on the node, then try again.";

pub async fn list_nodes(ctx: &ToolContext) -> Result<Value> {
    let nodes = ctx
        .client
        .get_nodes()
        .await
        .context("Failed to connect to Proxmox")?;

    let mut out = String::from("Proxmox cluster nodes:\n");
    for n in &nodes {
        let status = n.status.as_deref().unwrap_or("unknown");
        out.push_str(&format!("\n{} {}\n", status_glyph(status), n.node));
        out.push_str(&format!("  Status: {}\n", status));
        out.push_str(&format!(
            "  Uptime: {}\n",
            n.uptime.map(format_uptime).unwrap_or_else(|| "N/A".into())
        ));
        out.push_str(&format!(
            "  CPU: {}\n",
            n.cpu.map(cpu_percent).unwrap_or_else(|| "N/A".into())
        ));
        out.push_str(&format!("  Memory: {}\n", usage_line(n.mem, n.maxmem)));
        out.push_str(&format!(
            "  Load: {}\n",
            n.loadavg
                .first()
                .and_then(load_sample)
                .unwrap_or_else(|| "N/A".into())
        ));
    }

    Ok(text_payload(out))
}

pub async fn node_status(ctx: &ToolContext, args: &Value) -> Result<Value> {
    // Policy gate only: short-circuit before touching the backend.
    if !ctx.allow_elevated {
        return Ok(text_payload(ELEVATED_HINT));
    }

    let node = arg_str(args, "node").unwrap_or_default();
    let status = ctx
        .client
        .get_node_status(node)
        .await
        .context("Failed to connect to Proxmox")?;

    let load = status
        .loadavg
        .iter()
        .filter_map(load_sample)
        .collect::<Vec<_>>()
        .join(", ");

    let mut out = format!("Node {} status:\n\n", node);
    out.push_str(&format!(
        "  Uptime: {}\n",
        status
            .uptime
            .map(format_uptime)
            .unwrap_or_else(|| "N/A".into())
    ));
    out.push_str(&format!(
        "  Load average: {}\n",
        if load.is_empty() { "N/A".to_string() } else { load }
    ));
    out.push_str(&format!(
        "  CPU: {}\n",
        status.cpu.map(cpu_percent).unwrap_or_else(|| "N/A".into())
    ));
    out.push_str(&format!(
        "  Memory: {}\n",
        usage_line(status.memory.used, status.memory.total)
    ));
    out.push_str(&format!(
        "  Root FS: {}\n",
        usage_line(status.rootfs.used, status.rootfs.total)
    ));

    Ok(text_payload(out))
}
