//! Curator CLI entry point.

use anyhow::Result;
use clap::Parser;
use curator::cli::{commands, Cli, Commands};
use curator::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config_path = cli.config.as_deref().map(Settings::expand_path);
    let settings = Settings::load_from(config_path.as_ref())?;

    // Initialize logging
    let log_level = match cli.verbose {
        0 => settings.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("curator={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    // Execute command
    match &cli.command {
        Commands::Chunk { file, strategy, json } => {
            commands::run_chunk(file.as_deref(), strategy.as_deref(), *json, &settings)?;
        }

        Commands::Index { namespace, dry_run } => {
            commands::run_index(namespace.clone(), *dry_run, settings).await?;
        }

        Commands::Search { query, top_k, namespace } => {
            commands::run_search(query, *top_k, namespace.clone(), settings).await?;
        }

        Commands::Ask {
            question,
            top_k,
            model,
            namespace,
        } => {
            commands::run_ask(question, *top_k, model.clone(), namespace.clone(), settings).await?;
        }

        Commands::Chat { model } => {
            commands::run_chat(model.clone(), settings).await?;
        }

        Commands::Serve { host, port } => {
            commands::run_serve(host, *port, settings).await?;
        }

        Commands::Config { action } => {
            commands::run_config(action, config_path, settings)?;
        }
    }

    Ok(())
}
