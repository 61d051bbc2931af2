use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;

use testbed_messaging_service::{
    build_service, create_router,
    logging::{log_startup, setup_logging, LogSettings},
    AppConfig,
};

#[derive(Parser, Debug)]
#[command(name = "messaging-service", version, about = "Test bed messaging service")]
struct Args {
    /// Configuration file (TOML, YAML or JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on, overrides `server.bind_address`
    #[arg(short, long)]
    bind: Option<String>,

    /// Log level, overrides `logging.level`
    #[arg(long)]
    log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = AppConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    if let Some(bind) = args.bind {
        config.server.bind_address = bind;
    }
    if let Some(level) = args.log_level {
        config.logging.level = level;
    }
    config.logging.json |= args.json_logs;

    let logging = LogSettings::from_config(&config.logging, "messaging-service")?;
    setup_logging(&logging)?;
    log_startup(&logging, env!("CARGO_PKG_VERSION"));

    let service = build_service(&config)?;
    let app = create_router(service, &config.server.base_path);

    let listener = TcpListener::bind(&config.server.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind_address))?;
    info!(
        "Messaging service [{}] v{} listening on {}{}",
        config.service.id,
        config.service.version,
        listener.local_addr()?,
        config.server.base_path
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Messaging service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
