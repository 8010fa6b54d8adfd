//! HTTP server command

use std::net::SocketAddr;

use anyhow::{bail, Context, Result};
use clap::Parser;

use blog_server::db::{create_pool_with_options, schema, MemoryStore, DEFAULT_MAX_CONNECTIONS};
use blog_server::{run_server, AppState, ServerConfig};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', env = "BLOG_BIND", default_value = "127.0.0.1:8080")]
    pub bind: SocketAddr,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// PostgreSQL connection URL
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// Maximum pooled database connections
    #[arg(long, env = "BLOG_MAX_CONNECTIONS", default_value_t = DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: u32,

    /// Keep data in process memory instead of PostgreSQL (lost on exit).
    /// Takes priority over --database-url / DATABASE_URL.
    #[arg(long)]
    pub memory: bool,
}

async fn build_state(args: &ServeArgs) -> Result<AppState> {
    if args.memory {
        if args.database_url.is_some() {
            tracing::info!("--memory given, ignoring DATABASE_URL");
        }
        tracing::warn!("Using in-memory store - data is lost on shutdown");
        return Ok(AppState::memory(MemoryStore::new()));
    }

    let Some(database_url) = args.database_url.as_deref() else {
        bail!("DATABASE_URL not set. Set via --database-url, DATABASE_URL env or .env, or pass --memory");
    };

    let pool = create_pool_with_options(database_url, args.max_connections)
        .await
        .context("Failed to create database pool")?;

    schema::bootstrap(&pool)
        .await
        .context("Failed to bootstrap database schema")?;

    Ok(AppState::postgres(pool))
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    tracing::info!("Starting blog server on {}", args.bind);

    let state = build_state(&args).await?;

    let config = ServerConfig {
        bind_addr: args.bind,
        cors_permissive: args.cors_permissive,
    };

    // Blocks until shutdown
    run_server(state, config).await.context("Server error")?;

    Ok(())
}
