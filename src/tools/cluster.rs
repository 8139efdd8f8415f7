use super::{text_payload, ToolContext};
use crate::format::{percent, status_glyph};
use anyhow::Result;
use serde_json::Value;

/// Cluster overview. Any failure while assembling the report comes back as a
/// payload with its own prefix rather than falling through to the generic
/// dispatcher formatting.
pub async fn cluster_status(ctx: &ToolContext) -> Result<Value> {
    match build_report(ctx).await {
        Ok(text) => Ok(text_payload(text)),
        Err(e) => Ok(text_payload(format!(
            "\u{274c} Failed to get cluster status: {:#}",
            e
        ))),
    }
}

async fn build_report(ctx: &ToolContext) -> Result<String> {
    let mut nodes = ctx.client.get_nodes().await?;

    // Best-effort enrichment: the cluster-wide endpoint needs broader token
    // permissions, so a failure here does not sink the whole report.
    let cluster_info = if ctx.allow_elevated {
        ctx.client.get_cluster_status().await.ok()
    } else {
        None
    };

    let total = nodes.len();
    let online: Vec<_> = nodes
        .iter()
        .filter(|n| n.status.as_deref() == Some("online"))
        .collect();

    let mut out = String::from("Proxmox cluster status\n\n");

    if let Some(entries) = &cluster_info {
        if let Some(c) = entries.iter().find(|e| e.entry_type == "cluster") {
            let quorum = match c.quorate {
                Some(q) if q != 0 => "quorate",
                Some(_) => "not quorate",
                None => "quorum unknown",
            };
            out.push_str(&format!(
                "Cluster: {} ({})\n",
                c.name.as_deref().unwrap_or("unnamed"),
                quorum
            ));
        }
    }

    let health = if online.len() == total {
        "\u{2705} HEALTHY"
    } else {
        "\u{26a0}\u{fe0f} WARNING"
    };
    out.push_str(&format!("Health: {}\n", health));
    out.push_str(&format!("Nodes online: {}/{}\n\n", online.len(), total));

    if ctx.allow_elevated {
        let cpu_total: f64 = online.iter().filter_map(|n| n.maxcpu).sum();
        let cpu_used: f64 = online
            .iter()
            .filter_map(|n| Some(n.cpu? * n.maxcpu?))
            .sum();
        let mem_total: u64 = online.iter().filter_map(|n| n.maxmem).sum();
        let mem_used: u64 = online.iter().filter_map(|n| n.mem).sum();

        out.push_str("Resource usage (online nodes):\n");
        out.push_str(&format!("  CPU: {}\n", percent(cpu_used, cpu_total)));
        out.push_str(&format!(
            "  Memory: {}\n",
            percent(mem_used as f64, mem_total as f64)
        ));
    } else {
        out.push_str(
            "Resource usage unavailable (set PROXMOX_ALLOW_ELEVATED=true to enable)\n",
        );
    }

    out.push_str("\nNodes:\n");
    nodes.sort_by(|a, b| a.node.cmp(&b.node));
    for n in &nodes {
        let status = n.status.as_deref().unwrap_or("unknown");
        out.push_str(&format!("  {} {}: {}\n", status_glyph(status), n.node, status));
    }

    Ok(out)
}
