//! Parley REST API entry point.
//!
//! Binary name: `parley`
//!
//! Parses CLI arguments, initializes the database and services, seeds the
//! bootstrap admin account and default model, then starts the HTTP server.

mod http;
mod state;

use clap::{Parser, Subcommand};

use parley_infra::config::AppConfig;
use state::AppState;

#[derive(Parser)]
#[command(name = "parley", about = "Multi-user chat backend for Bedrock-hosted models", version)]
struct Cli {
    /// Increase log verbosity (-v: debug, -vv: trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Export spans via OpenTelemetry (stdout exporter)
    #[arg(long, global = true)]
    otel: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Address to bind
        #[arg(long, env = "PARLEY_HOST", default_value = "127.0.0.1")]
        host: String,

        /// Port to listen on
        #[arg(long, env = "PARLEY_PORT", default_value_t = 8080)]
        port: u16,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "info",
        1 => "info,parley=debug",
        _ => "trace",
    };
    parley_observe::tracing_setup::init_tracing(cli.otel, filter)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let config = AppConfig::from_env();
    let state = AppState::init(config).await?;

    bootstrap(&state).await?;

    match cli.command {
        Commands::Serve { host, port } => {
            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            println!(
                "  {} Parley API listening on {}",
                console::style("⚡").bold(),
                console::style(format!("http://{addr}")).cyan()
            );
            println!("  {}", console::style("Press Ctrl+C to stop").dim());

            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            println!("\n  Server stopped.");
        }
    }

    parley_observe::tracing_setup::shutdown_tracing();
    Ok(())
}

/// Seed the admin account and default model on an empty database.
async fn bootstrap(state: &AppState) -> anyhow::Result<()> {
    let seeded = state
        .account_service
        .bootstrap_admin(
            &state.config.admin_username,
            &state.config.admin_password,
        )
        .await?;
    if let Some(account) = seeded {
        println!(
            "  {} Admin account '{}' created",
            console::style("✓").green(),
            console::style(&account.username).cyan()
        );
    }

    let seeded = state
        .model_registry
        .bootstrap_default("Claude Sonnet 4", "anthropic.claude-sonnet-4-20250514-v1:0")
        .await?;
    if let Some(entry) = seeded {
        println!(
            "  {} Default model '{}' registered",
            console::style("✓").green(),
            console::style(&entry.name).cyan()
        );
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
