mod format;
mod mcp;
mod proxmox;
mod settings;
mod tools;

use clap::Parser;
use log::{error, info};
use mcp::McpServer;
use proxmox::ProxmoxClient;
use settings::Settings;
use std::process;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file path
    #[arg(short, long, env = "PROXMOX_CONFIG")]
    config: Option<String>,

    /// Proxmox Host (e.g., 192.168.1.10)
    #[arg(long, env = "PROXMOX_HOST")]
    host: Option<String>,

    /// Proxmox API port (default: 8006)
    #[arg(long, env = "PROXMOX_PORT")]
    port: Option<u16>,

    /// Proxmox User (e.g., api@pam)
    #[arg(long, env = "PROXMOX_USER")]
    user: Option<String>,

    /// API Token Name (e.g., mcp)
    #[arg(long, env = "PROXMOX_TOKEN_NAME")]
    token_name: Option<String>,

    /// API Token Value (UUID)
    #[arg(long, env = "PROXMOX_TOKEN_VALUE")]
    token_value: Option<String>,

    /// Allow elevated tools (node-status, guest-exec, cluster resource usage)
    #[arg(long, env = "PROXMOX_ALLOW_ELEVATED", default_value_t = false)]
    allow_elevated: bool,
}

#[tokio::main]
async fn main() {
    // stderr only; stdout belongs to the JSON-RPC transport.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut settings = match Settings::new(args.config.as_deref()) {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    // CLI arguments override file and environment settings.
    if let Some(host) = args.host {
        settings.host = Some(host);
    }
    if let Some(port) = args.port {
        settings.port = Some(port);
    }
    if let Some(user) = args.user {
        settings.user = Some(user);
    }
    if let Some(token_name) = args.token_name {
        settings.token_name = Some(token_name);
    }
    if let Some(token_value) = args.token_value {
        settings.token_value = Some(token_value);
    }
    if args.allow_elevated {
        settings.allow_elevated = Some(true);
    }

    if let Err(e) = settings.validate() {
        error!("Configuration error: {}", e);
        process::exit(1);
    }

    // Safe to unwrap because validate() checks these
    let host = settings.host.clone().unwrap();
    let user = settings.user.clone().unwrap();
    let token_name = settings.token_name.clone().unwrap();
    let token_value = settings.token_value.clone().unwrap_or_default();
    let allow_elevated = settings.allow_elevated.unwrap_or(false);

    info!("Connecting to Proxmox at {}:{}", host, settings.port());

    let mut client = match ProxmoxClient::new(&host, settings.port()) {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to create client: {}", e);
            process::exit(1);
        }
    };
    client.set_api_token(&user, &token_name, &token_value);

    if allow_elevated {
        info!("Elevated tools enabled");
    }

    let mut server = McpServer::new(client, allow_elevated);

    info!("MCP server ready (stdio transport)");
    if let Err(e) = server.run_stdio().await {
        error!("Server error: {}", e);
        process::exit(1);
    }
}
