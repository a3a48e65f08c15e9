//! `savectl serve` - run the HTTP API
//!
//! Uses PostgreSQL when a database URL is configured, the in-memory store
//! otherwise (or when `--memory` is given).

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use savectl_core::{BoardStore, MemoryStore, SavectlConfig};
use savectl_server::db::{create_pool_with_options, migrations};
use savectl_server::{run_server, PgBoardStore, ServerConfig};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to (default: [server].bind or 127.0.0.1:3030)
    #[arg(long, short = 'b')]
    pub bind: Option<SocketAddr>,

    /// Database URL (overrides config)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Keep everything in memory, even if a database is configured
    #[arg(long, conflicts_with = "database_url")]
    pub memory: bool,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,
}

/// Run the HTTP server until Ctrl+C or SIGTERM
pub async fn run_serve(args: ServeArgs, config: &SavectlConfig) -> Result<()> {
    let bind_addr = match args.bind {
        Some(addr) => addr,
        None => config
            .server
            .bind
            .parse()
            .with_context(|| format!("invalid [server].bind '{}'", config.server.bind))?,
    };

    let database_url = args
        .database_url
        .or_else(|| config.server.database_url.clone());

    let store: Arc<dyn BoardStore> = match database_url {
        Some(url) if !args.memory => {
            let pool = create_pool_with_options(&url, config.server.max_connections)
                .await
                .context("Failed to create database pool")?;
            migrations::run(&pool)
                .await
                .context("Failed to run migrations")?;
            Arc::new(PgBoardStore::new(pool))
        }
        _ => {
            tracing::warn!("no database configured, saves are kept in memory and lost on exit");
            Arc::new(MemoryStore::new())
        }
    };

    let server_config = ServerConfig {
        bind_addr,
        cors_permissive: args.cors_permissive || config.server.cors_permissive,
        mixed_membership: config.saves.mixed_membership,
    };

    run_server(store, server_config)
        .await
        .context("Server error")?;

    Ok(())
}
