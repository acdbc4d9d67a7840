//! Supabase MCP Server
//!
//! Manages Supabase projects over MCP (stdio).
//!
//! # Configuration
//! Flags or environment variables (`SUPABASE_ACCESS_TOKEN`, `ALIYUN_ACCESS_TOKEN`, ...),
//! plus optional defaults in `~/.binks/supabase.toml`

use clap::Parser;

use supabase_mcp::{Args, FileConfig, ServerConfig, SupabaseMcpServer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    mcp_common::init_tracing("supabase_mcp")?;

    let args = Args::parse();

    let file = match FileConfig::load() {
        Ok(file) => file,
        Err(e) => {
            tracing::error!("Failed to load config file: {:#}", e);
            std::process::exit(1);
        }
    };

    let config = ServerConfig::resolve(args, file);
    if let Err(e) = config.check_credentials() {
        tracing::error!("{}", e);
        std::process::exit(1);
    }

    tracing::info!(
        features = ?config.features,
        read_only = config.read_only,
        project_ref = config.project_ref.as_deref().unwrap_or("-"),
        "Configuration resolved"
    );

    let server = SupabaseMcpServer::from_config(config)?;
    mcp_common::serve_stdio(server, "supabase-mcp").await
}
