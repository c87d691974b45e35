//! dv-site - DoubleVisuals portfolio site host
//!
//! Serves the page shell and JSON API on the configured bind address
//! (default 127.0.0.1:5740).

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use dv_common::config::ConfigResolver;
use dv_site::{build_router, AppState};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "dv-site")]
#[command(about = "DoubleVisuals portfolio site")]
#[command(version)]
struct Args {
    /// Config file (overrides DV_SITE_CONFIG and the platform config path)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address, e.g. 0.0.0.0:8080 (overrides DV_SITE_BIND)
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config comes first so its log level can seed the filter; RUST_LOG still wins
    let config = ConfigResolver::new(args.config, args.bind)
        .resolve()
        .context("Failed to load site configuration")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "dv_site={lvl},dv_common={lvl},tower_http={lvl}",
                    lvl = config.log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting DoubleVisuals site (dv-site) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    info!(
        "Banner close delay {} ms, cookie max-age {} s",
        config.banner.close_delay_ms, config.cookies.max_age_secs
    );

    let bind_addr = config.bind_addr.clone();
    let app = build_router(AppState::new(config));

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;
    info!("dv-site listening on http://{}", bind_addr);
    info!("Health check: http://{}/health", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
