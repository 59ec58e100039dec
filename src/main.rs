// ABOUTME: Entry point for the keelson CLI application.
// ABOUTME: Parses arguments and dispatches to the init, run and dev commands.

mod cli;

use clap::Parser;
use cli::{Cli, Commands};
use keelson::config::{self, PipelineConfig};
use keelson::error::Result;
use keelson::output::{Output, OutputMode};
use keelson::runner::{RunMode, Runner};
use std::env;
use std::path::Path;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber based on verbose flag
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let result = run(cli).await;

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mode = cli.output_mode();
    match cli.command {
        Commands::Init { image, force } => {
            let cwd = env::current_dir()?;
            config::init_config(&cwd, image.as_deref(), force)?;
            Output::new(mode).success(&format!("Created {}", config::CONFIG_FILENAME));
            Ok(())
        }
        Commands::Run => {
            let config = load_config(cli.filename.as_deref())?;
            pipeline(config.with_continuous(false), mode).await
        }
        Commands::Dev => {
            let config = load_config(cli.filename.as_deref())?;
            pipeline(config.with_continuous(true), mode).await
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<PipelineConfig> {
    match path {
        Some(path) => PipelineConfig::load(path),
        None => PipelineConfig::discover(&env::current_dir()?),
    }
}

/// Resolve strategies and drive the pipeline until it finishes or is interrupted.
async fn pipeline(config: PipelineConfig, mode: OutputMode) -> Result<()> {
    let mut runner = Runner::for_config(&config, Output::new(mode))?;

    if runner.mode() == RunMode::Continuous {
        let cancel = runner.cancellation();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Interrupted, stopping dev loop");
                cancel.cancel();
            }
        });

        if mode == OutputMode::Normal {
            let ready = runner.ready_signal();
            tokio::spawn(async move {
                loop {
                    ready.notified().await;
                    println!("Watching for changes... (Ctrl+C to stop)");
                }
            });
        }
    }

    runner.run().await?;
    Ok(())
}
