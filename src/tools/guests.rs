use super::{arg_i64, arg_str, text_payload, ToolContext};
use crate::format::{cpu_percent, format_bytes, format_uptime, kind_glyph, status_glyph, usage_line};
use crate::proxmox::guests::{GuestInfo, GuestKind};
use anyhow::{bail, Context, Result};
use serde_json::Value;

const ELEVATED_HINT: &str = "\u{1f512} Command execution requires elevated permissions.\n\n\
    Set PROXMOX_ALLOW_ELEVATED=true in the environment and make sure the API \
    token has VM.Monitor (qemu) or VM.Console (lxc) privileges, then try again.";

fn guest_kind(args: &Value) -> Result<GuestKind> {
    match arg_str(args, "type").unwrap_or("qemu") {
        "qemu" => Ok(GuestKind::Qemu),
        "lxc" => Ok(GuestKind::Lxc),
        other => bail!("Invalid guest type: {}", other),
    }
}

/// The fields shared by the listing and single-guest views.
struct GuestView<'a> {
    vmid: i64,
    name: Option<&'a str>,
    status: &'a str,
    node: &'a str,
    kind: GuestKind,
    uptime: Option<u64>,
    cpu: Option<f64>,
    mem: Option<u64>,
    maxmem: Option<u64>,
}

impl GuestView<'_> {
    fn render(&self) -> String {
        let name = self
            .name
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("VM-{}", self.vmid));

        let mut out = format!(
            "{} {} {} (ID: {})\n",
            status_glyph(self.status),
            kind_glyph(self.kind),
            name,
            self.vmid
        );
        out.push_str(&format!("  Node: {}\n", self.node));
        out.push_str(&format!("  Status: {}\n", self.status));
        out.push_str(&format!("  Type: {}\n", self.kind));

        // Runtime figures are meaningless for stopped guests.
        if self.status == "running" {
            out.push_str(&format!(
                "  Uptime: {}\n",
                self.uptime
                    .map(format_uptime)
                    .unwrap_or_else(|| "N/A".into())
            ));
            out.push_str(&format!(
                "  CPU: {}\n",
                self.cpu.map(cpu_percent).unwrap_or_else(|| "N/A".into())
            ));
            out.push_str(&format!("  Memory: {}\n", usage_line(self.mem, self.maxmem)));
        }
        out
    }
}

pub async fn list_guests(ctx: &ToolContext, args: &Value) -> Result<Value> {
    let node_filter = arg_str(args, "node");
    let kinds: &[GuestKind] = match arg_str(args, "type").unwrap_or("all") {
        "qemu" => &[GuestKind::Qemu],
        "lxc" => &[GuestKind::Lxc],
        "all" => &[GuestKind::Qemu, GuestKind::Lxc],
        other => bail!("Invalid guest type: {}", other),
    };

    let nodes: Vec<String> = match node_filter {
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

    let mut guests: Vec<(GuestInfo, String, GuestKind)> = Vec::new();
    for node in &nodes {
        for &kind in kinds {
            let listed = ctx
                .client
                .list_guests(node, kind)
                .await
                .context("Failed to connect to Proxmox")?;
            guests.extend(listed.into_iter().map(|g| (g, node.clone(), kind)));
        }
    }

    if guests.is_empty() {
        return Ok(text_payload("No guests found"));
    }

    guests.sort_by_key(|(g, _, _)| g.vmid);

    let mut out = String::from("Proxmox guests:\n");
    for (g, node, kind) in &guests {
        out.push('\n');
        out.push_str(
            &GuestView {
                vmid: g.vmid,
                name: g.name.as_deref(),
                status: g.status.as_deref().unwrap_or("unknown"),
                node,
                kind: *kind,
                uptime: g.uptime,
                cpu: g.cpu,
                mem: g.mem,
                maxmem: g.maxmem,
            }
            .render(),
        );
    }

    Ok(text_payload(out))
}

pub async fn guest_status(ctx: &ToolContext, args: &Value) -> Result<Value> {
    let node = arg_str(args, "node").unwrap_or_default();
    let vmid = arg_i64(args, "vmid").context("vmid must be numeric")?;
    let kind = guest_kind(args)?;

    let status = ctx
        .client
        .guest_status(node, vmid, kind)
        .await
        .context("Failed to connect to Proxmox")?;

    let state = status.status.as_deref().unwrap_or("unknown");
    let mut out = GuestView {
        vmid,
        name: status.name.as_deref(),
        status: state,
        node,
        kind,
        uptime: status.uptime,
        cpu: status.cpu,
        mem: status.mem,
        maxmem: status.maxmem,
    }
    .render();

    if state == "running" {
        let counter = |v: Option<u64>| v.map(format_bytes).unwrap_or_else(|| "N/A".into());
        out.push_str(&format!("  Disk read: {}\n", counter(status.diskread)));
        out.push_str(&format!("  Disk write: {}\n", counter(status.diskwrite)));
        out.push_str(&format!("  Network in: {}\n", counter(status.netin)));
        out.push_str(&format!("  Network out: {}\n", counter(status.netout)));
    }

    Ok(text_payload(out))
}

pub async fn guest_exec(ctx: &ToolContext, args: &Value) -> Result<Value> {
    if !ctx.allow_elevated {
        return Ok(text_payload(ELEVATED_HINT));
    }

    let node = arg_str(args, "node").unwrap_or_default();
    let vmid = arg_i64(args, "vmid").context("vmid must be numeric")?;
    let command = arg_str(args, "command").unwrap_or_default();
    let kind = guest_kind(args)?;

    let result = match kind {
        GuestKind::Qemu => ctx
            .client
            .agent_exec(node, vmid, command)
            .await
            .map(|data| match data.get("pid").and_then(Value::as_i64) {
                // The agent runs the command out of band; only the pid comes back.
                Some(pid) => format!(
                    "\u{2705} Command submitted to guest {} via QEMU guest agent\nPID: {}\n\n\
                     The command runs asynchronously inside the guest; its output is not returned here.",
                    vmid, pid
                ),
                None => format!(
                    "\u{2705} Command submitted to guest {} via QEMU guest agent (no pid returned)",
                    vmid
                ),
            }),
        GuestKind::Lxc => ctx.client.lxc_exec(node, vmid, command).await.map(|data| {
            let output = match &data {
                Value::String(s) => s.clone(),
                other => other
                    .get("output")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| {
                        serde_json::to_string_pretty(other).unwrap_or_default()
                    }),
            };
            format!(
                "\u{2705} Command executed on container {}\n\nOutput:\n{}",
                vmid, output
            )
        }),
    };

    match result {
        Ok(text) => Ok(text_payload(text)),
        // Reported as a payload, not an error: the usual cause is a missing
        // guest agent, which the caller can act on.
        Err(e) => Ok(text_payload(format!(
            "\u{274c} Failed to execute command on guest {}: {}\n\n\
             Note: QEMU guests need the guest agent installed and running for \
             command execution to work.",
            vmid, e
        ))),
    }
}
