//! # matchdesk CLI
//!
//! The `matchdesk` binary serves the analysis API and offers one-shot
//! commands for local use.
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `matchdesk serve` | Start the HTTP server on `[server].bind` |
//! | `matchdesk analyze "<match>"` | Run the pipeline once and print the reply |
//! | `matchdesk providers` | List gateways and backend with live/demo status |
//!
//! ## Examples
//!
//! ```bash
//! # Demo mode: no credentials, synthetic previews
//! matchdesk analyze "Rapid - FCSB"
//!
//! # Live mode
//! OPENAI_API_KEY=sk-... SEARCH_API_KEY=... matchdesk serve
//!
//! # With a config file
//! matchdesk --config ./config/matchdesk.toml serve
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use matchdesk::completion::create_backend;
use matchdesk::config::{load_or_default, Config};
use matchdesk::gateways::GatewayRegistry;
use matchdesk::orchestrate::Orchestrator;
use matchdesk::server::run_server;

/// matchdesk — football match analysis from aggregated provider data.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file; without one, every setting falls back to its default and
/// credentials are read from the environment.
#[derive(Parser)]
#[command(
    name = "matchdesk",
    about = "Football match analysis: aggregate provider data, generate a betting preview",
    version
)]
struct Cli {
    /// Path to configuration file (TOML). Optional; defaults apply when
    /// the file does not exist.
    #[arg(long, global = true, default_value = "./config/matchdesk.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server.
    Serve,

    /// Run the analysis pipeline once for a match description and print
    /// the reply to stdout.
    Analyze {
        /// Free-text match description, e.g. "Rapid - FCSB".
        prompt: String,
    },

    /// List configured data providers and the generation backend, with
    /// their live/demo status.
    Providers,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = load_or_default(&cli.config)?;

    match cli.command {
        Commands::Serve => {
            let orchestrator = build_orchestrator(&config)?;
            run_server(&config, orchestrator).await
        }
        Commands::Analyze { prompt } => {
            let orchestrator = build_orchestrator(&config)?;
            match orchestrator.analyze(&prompt).await {
                Ok(analysis) => {
                    println!("{}", analysis.reply);
                    Ok(())
                }
                Err(err) => anyhow::bail!("{}", err),
            }
        }
        Commands::Providers => {
            print_providers(&config)?;
            Ok(())
        }
    }
}

/// Wire the dependency bundle once; gateways and backend are shared
/// read-only for the lifetime of the process.
fn build_orchestrator(config: &Config) -> Result<Arc<Orchestrator>> {
    let gateways = GatewayRegistry::from_config(config)?;
    let backend = create_backend(&config.generation)?;

    Ok(Arc::new(Orchestrator::new(
        Arc::new(config.clone()),
        Arc::new(gateways),
        Arc::from(backend),
    )))
}

fn print_providers(config: &Config) -> Result<()> {
    let gateways = GatewayRegistry::from_config(config)?;

    println!("Data providers:");
    if gateways.is_empty() {
        println!("  (none enabled)");
    }
    for gateway in gateways.gateways() {
        let status = if gateway.is_live() { "live" } else { "demo" };
        println!("  {:<24} {}", gateway.name(), status);
    }

    let backend = create_backend(&config.generation)?;
    let status = if backend.is_live() { "live" } else { "demo" };
    println!("Generation backend:");
    println!("  {:<24} {}", backend.model_name(), status);

    Ok(())
}
