use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use inventory_api::auth::PasswordHasher;
use inventory_api::cli::{Cli, Commands};
use inventory_api::{app, database, AppConfig, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("inventory_api=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = AppConfig::from_env();
    cli.apply(&mut config);
    config.validate().context("invalid configuration")?;

    match cli.command {
        Some(Commands::HashPassword { password }) => {
            let hash = PasswordHasher::new(config.security.bcrypt_cost).hash(&password)?;
            println!("{}", hash);
            Ok(())
        }
        Some(Commands::Serve) | None => serve(config, cli.memory).await,
    }
}

async fn serve(config: AppConfig, force_memory: bool) -> anyhow::Result<()> {
    tracing::info!("Starting Inventory API in {:?} mode", config.environment);
    if config.uses_default_secret() {
        tracing::warn!("JWT_SECRET is not set; signing tokens with the insecure default secret");
    }

    let store = database::connect(&config.database, force_memory)
        .await
        .context("failed to open database")?;

    let bind_addr = format!("{}:{}", config.server.bind_address, config.server.port);
    let state = AppState::new(config, store);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Inventory API listening on http://{}", bind_addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
