//! Symptomix service entry point.
//!
//! Binary name: `sympx`
//!
//! Parses CLI arguments, loads configuration and secrets, wires the
//! retrieval and generation collaborators, then starts the HTTP server or
//! runs a collaborator connectivity check.

mod http;
mod state;

use std::path::Path;

use clap::{Parser, Subcommand};
use secrecy::ExposeSecret;
use tracing_subscriber::EnvFilter;

use symptomix_core::llm::provider::LlmProvider;
use symptomix_core::retrieval::embedder::Embedder;
use symptomix_infra::config::{Secrets, load_config};
use symptomix_infra::llm::openai_compat::OpenAiCompatProvider;
use symptomix_infra::llm::test_provider_connection;
use symptomix_infra::vector::embedder::FastEmbedder;
use symptomix_infra::vector::pinecone::PineconeIndex;
use symptomix_types::config::AppConfig;

use state::AppState;

#[derive(Debug, Parser)]
#[command(name = "sympx", version, about = "Grounded medical chat service")]
struct Cli {
    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Start the HTTP chat service
    Serve {
        /// Bind address (overrides config.toml)
        #[arg(long)]
        host: Option<String>,
        /// Bind port (overrides config.toml)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Verify that the generation and retrieval collaborators are reachable
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,symptomix=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    let config = load_config(Path::new(".")).await;

    match cli.command {
        Commands::Serve { host, port } => serve(&config, host, port).await?,
        Commands::Check => check(&config).await?,
    }

    Ok(())
}

async fn serve(config: &AppConfig, host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    let state = AppState::init(config).await?;

    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    println!(
        "  {} Symptomix listening on {}",
        console::style("⚡").bold(),
        console::style(format!("http://{addr}")).cyan()
    );
    println!("  {}", console::style("Press Ctrl+C to stop").dim());

    let router = http::router::build_router(state);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    println!("\n  Server stopped.");
    Ok(())
}

/// Probe both collaborators with minimal requests and report per-service
/// status; exits nonzero when either is unreachable.
async fn check(config: &AppConfig) -> anyhow::Result<()> {
    let secrets = Secrets::from_env()?;

    println!();
    println!("  {} Checking collaborators", console::style("🔍").bold());
    println!();

    let check_mark = |ok: bool| {
        if ok {
            format!("{}", console::style("✓").green())
        } else {
            format!("{}", console::style("✗").red())
        }
    };

    let provider = OpenAiCompatProvider::groq(
        secrets.groq_api_key.expose_secret(),
        &config.generation.model,
    );
    let generation_ok = match test_provider_connection(&provider).await {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(error = %err, "generation probe failed");
            false
        }
    };
    println!(
        "  {} generation provider '{}' ({})",
        check_mark(generation_ok),
        provider.name(),
        config.generation.model
    );

    let retrieval_ok = match FastEmbedder::new() {
        Ok(embedder) => {
            match PineconeIndex::connect(
                secrets.pinecone_api_key,
                embedder.dimension(),
                &config.retrieval,
            )
            .await
            {
                Ok(index) => {
                    println!(
                        "  {} index '{}' ready ({} dims, {})",
                        check_mark(true),
                        index.index_name(),
                        embedder.dimension(),
                        embedder.model_name()
                    );
                    true
                }
                Err(err) => {
                    tracing::warn!(error = %err, "index probe failed");
                    println!(
                        "  {} index '{}'",
                        check_mark(false),
                        config.retrieval.index_name
                    );
                    false
                }
            }
        }
        Err(err) => {
            tracing::warn!(error = %err, "embedding model failed to load");
            println!("  {} embedding model", check_mark(false));
            false
        }
    };

    println!();
    if !(generation_ok && retrieval_ok) {
        anyhow::bail!("one or more collaborators are unreachable");
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
