pub mod cluster;
pub mod guests;
pub mod nodes;
pub mod storage;

use crate::proxmox::ProxmoxClient;
use serde_json::{json, Value};
use std::fmt;

/// One declared input parameter of a tool.
pub struct ParamDef {
    pub name: &'static str,
    pub kind: &'static str,
    pub description: &'static str,
    pub required: bool,
    pub allowed: &'static [&'static str],
    pub default: Option<&'static str>,
}

/// One tool in the static catalog. The same table produces the `tools/list`
/// schemas and drives dispatch, so the two cannot drift apart.
pub struct ToolDef {
    pub name: &'static str,
    pub description: &'static str,
    pub params: &'static [ParamDef],
}

const NO_PARAMS: &[ParamDef] = &[];

const NODE_PARAM: ParamDef = ParamDef {
    name: "node",
    kind: "string",
    description: "Node name (e.g. 'pve1')",
    required: true,
    allowed: &[],
    default: None,
};

const VMID_PARAM: ParamDef = ParamDef {
    name: "vmid",
    kind: "integer",
    description: "Guest ID (e.g. 100)",
    required: true,
    allowed: &[],
    default: None,
};

const GUEST_TYPE_PARAM: ParamDef = ParamDef {
    name: "type",
    kind: "string",
    description: "Guest type",
    required: false,
    allowed: &["qemu", "lxc"],
    default: Some("qemu"),
};

pub const TOOLS: &[ToolDef] = &[
    ToolDef {
        name: "list-nodes",
        description: "List all nodes in the Proxmox cluster with status, uptime, CPU and memory",
        params: NO_PARAMS,
    },
    ToolDef {
        name: "node-status",
        description: "Detailed status of a node: uptime, load, CPU, memory and root filesystem (requires elevated permissions)",
        params: &[NODE_PARAM],
    },
    ToolDef {
        name: "list-guests",
        description: "List VMs and containers across the cluster, optionally filtered by node and type",
        params: &[
            ParamDef {
                name: "node",
                kind: "string",
                description: "Only list guests on this node",
                required: false,
                allowed: &[],
                default: None,
            },
            ParamDef {
                name: "type",
                kind: "string",
                description: "Guest type filter",
                required: false,
                allowed: &["qemu", "lxc", "all"],
                default: Some("all"),
            },
        ],
    },
    ToolDef {
        name: "guest-status",
        description: "Current status of a VM or container, including disk and network counters",
        params: &[NODE_PARAM, VMID_PARAM, GUEST_TYPE_PARAM],
    },
    ToolDef {
        name: "guest-exec",
        description: "Run a command inside a VM (via QEMU guest agent) or container (requires elevated permissions)",
        params: &[
            NODE_PARAM,
            VMID_PARAM,
            ParamDef {
                name: "command",
                kind: "string",
                description: "Command to run (e.g. 'uname -a')",
                required: true,
                allowed: &[],
                default: None,
            },
            GUEST_TYPE_PARAM,
        ],
    },
    ToolDef {
        name: "list-storage",
        description: "List storage pools, optionally filtered by node",
        params: &[ParamDef {
            name: "node",
            kind: "string",
            description: "Only list storage visible on this node",
            required: false,
            allowed: &[],
            default: None,
        }],
    },
    ToolDef {
        name: "cluster-status",
        description: "Overall cluster health, per-node status and (when elevated) aggregate resource usage",
        params: NO_PARAMS,
    },
];

pub fn input_schema(def: &ToolDef) -> Value {
    let mut props = serde_json::Map::new();
    let mut required = Vec::new();

    for p in def.params {
        let mut prop = serde_json::Map::new();
        prop.insert("type".to_string(), json!(p.kind));
        prop.insert("description".to_string(), json!(p.description));
        if !p.allowed.is_empty() {
            prop.insert("enum".to_string(), json!(p.allowed));
        }
        if let Some(d) = p.default {
            prop.insert("default".to_string(), json!(d));
        }
        props.insert(p.name.to_string(), Value::Object(prop));
        if p.required {
            required.push(p.name);
        }
    }

    json!({
        "type": "object",
        "properties": props,
        "required": required,
    })
}

/// The catalog as served by `tools/list`.
pub fn catalog() -> Vec<Value> {
    TOOLS
        .iter()
        .map(|t| {
            json!({
                "name": t.name,
                "description": t.description,
                "inputSchema": input_schema(t),
            })
        })
        .collect()
}

/// Immutable per-process state shared by all handlers.
pub struct ToolContext {
    pub client: ProxmoxClient,
    pub allow_elevated: bool,
}

pub fn text_payload(text: impl Into<String>) -> Value {
    json!({ "content": [{ "type": "text", "text": text.into() }] })
}

pub fn error_payload(msg: impl fmt::Display) -> Value {
    text_payload(format!("Error: {}", msg))
}

/// Look up and run a tool. Every outcome, including unknown names, missing
/// arguments and handler failures, comes back as a well-formed text payload.
pub async fn dispatch(ctx: &ToolContext, name: &str, args: &Value) -> Value {
    let Some(def) = TOOLS.iter().find(|t| t.name == name) else {
        return error_payload(format!("Unknown tool: {}", name));
    };

    // Shallow validation: required-field presence only. Type coercion is the
    // handler's business.
    for p in def.params {
        if p.required && args.get(p.name).map_or(true, Value::is_null) {
            return error_payload(format!("Missing required argument: {}", p.name));
        }
    }

    let result = match def.name {
        "list-nodes" => nodes::list_nodes(ctx).await,
        "node-status" => nodes::node_status(ctx, args).await,
        "list-guests" => guests::list_guests(ctx, args).await,
        "guest-status" => guests::guest_status(ctx, args).await,
        "guest-exec" => guests::guest_exec(ctx, args).await,
        "list-storage" => storage::list_storage(ctx, args).await,
        "cluster-status" => cluster::cluster_status(ctx).await,
        other => unreachable!("tool {} is in the catalog but has no handler", other),
    };

    match result {
        Ok(payload) => payload,
        Err(e) => error_payload(format!("{:#}", e)),
    }
}

pub(crate) fn arg_str<'a>(args: &'a Value, name: &str) -> Option<&'a str> {
    args.get(name).and_then(Value::as_str)
}

// Callers sometimes send ids as strings; accept both.
pub(crate) fn arg_i64(args: &Value, name: &str) -> Option<i64> {
    match args.get(name)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}
