//! Databricks Genie bot entry point.
//!
//! Binary name: `genie-bot`
//!
//! Loads settings from the environment, then either serves the Bot Framework
//! messaging endpoint or runs a single question from the terminal.

mod cli;
mod http;
mod state;

use clap::Parser;

use genie_infra::config::Settings;
use genie_observe::{LogOptions, init_tracing, shutdown_tracing};

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(&LogOptions {
        filter: cli.log_filter().to_string(),
        json: cli.log_json,
        otel: cli.otel,
    })
    .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = Settings::from_env()?;

    match cli.command {
        Some(Commands::Ask {
            question,
            user,
            raw,
        }) => {
            let bot = state::build_bot(settings.genie)?;
            cli::ask::ask(&bot, &user, &question, raw).await
        }
        Some(Commands::Serve { host, port }) => serve(settings, host, port).await,
        None => serve(settings, None, None).await,
    }
}

async fn serve(settings: Settings, host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    let host = host.unwrap_or_else(|| settings.server.host.clone());
    let port = port.unwrap_or(settings.server.port);

    let state = AppState::from_settings(settings)?;
    let authenticated = state.connector.is_authenticated();
    let verify_tokens = state.channel_auth.is_some();
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!(%addr, authenticated, verify_tokens, "Genie bot listening");
    println!(
        "  {} Genie bot listening on {}",
        console::style("⚡").bold(),
        console::style(format!("http://{addr}/api/messages")).cyan()
    );
    println!("  {}", console::style("Press Ctrl+C to stop").dim());

    let router = http::router::build_router(state);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    println!("\n  Server stopped.");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
