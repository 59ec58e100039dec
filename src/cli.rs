// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Parser, Subcommand};
use keelson::output::OutputMode;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "keelson")]
#[command(about = "Build, tag and deploy container workloads, continuously in dev mode")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print results and problems
    #[arg(short, long, global = true, conflicts_with = "json")]
    pub quiet: bool,

    /// Print JSON lines instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Path to the config file (defaults to keelson.yml in the current directory)
    #[arg(short = 'f', long, global = true)]
    pub filename: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else if self.quiet {
            OutputMode::Quiet
        } else {
            OutputMode::Normal
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new keelson.yml configuration file
    Init {
        /// Image name for the first artifact
        #[arg(long)]
        image: Option<String>,

        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Build and deploy once
    Run,

    /// Build and deploy, then redeploy on every source change
    Dev,
}
