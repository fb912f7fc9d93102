//! Silent Investigator CLI, the main entry point.
//!
//! Commands:
//! - `onboard`      Write a default config file
//! - `doctor`       Check config, credentials and the example library
//! - `prompt`       Print the assembled prompt for a document (no network)
//! - `investigate`  Run the full pipeline on a document
//! - `judge`        Grade a predicted result against an expected one
//! - `evaluate`     Run a labelled dataset and print the report
//! - `retrieve`     Rank text files against a query

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "silent-investigator",
    about = "Silent Investigator: find missing information in documents",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to ~/.silent-investigator/config.toml)
    #[arg(long, global = true, env = "INVESTIGATOR_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file
    Onboard,

    /// Diagnose configuration and connectivity
    Doctor {
        /// Also ask the generator endpoint whether it is reachable
        #[arg(long)]
        ping: bool,
    },

    /// Print the prompt that would be sent for a document
    Prompt {
        #[arg(short, long)]
        file: PathBuf,

        /// Print the system prompt before the prompt
        #[arg(long)]
        system: bool,
    },

    /// Investigate a document and print the structured result
    Investigate {
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Grade a predicted result file against an expected result file
    Judge {
        /// Model output (JSON, optionally fenced or wrapped in prose)
        #[arg(long)]
        predicted: PathBuf,

        /// Expected result as JSON
        #[arg(long)]
        expected: PathBuf,

        /// Print the model-judge rubric prompt instead of grading
        #[arg(long)]
        rubric: bool,
    },

    /// Evaluate a dataset of labelled documents
    Evaluate {
        /// JSON array of {id, document, expected}
        #[arg(short, long)]
        dataset: PathBuf,

        /// Also write the report to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Rank documents against a query with the configured embedder
    Retrieve {
        #[arg(short, long)]
        query: String,

        /// Text files to index
        #[arg(long, num_args = 1.., required = true)]
        docs: Vec<PathBuf>,

        #[arg(short = 'k', long, default_value_t = 3)]
        top_k: usize,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Logs go to stderr so command output on stdout stays machine-readable.
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = cli.config.as_deref();

    match cli.command {
        Commands::Onboard => commands::onboard::run(config).await?,
        Commands::Doctor { ping } => commands::doctor::run(config, ping).await?,
        Commands::Prompt { file, system } => commands::prompt::run(config, &file, system).await?,
        Commands::Investigate { file } => commands::investigate::run(config, &file).await?,
        Commands::Judge {
            predicted,
            expected,
            rubric,
        } => commands::judge::run(config, &predicted, &expected, rubric).await?,
        Commands::Evaluate { dataset, output } => {
            commands::evaluate::run(config, &dataset, output.as_deref()).await?
        }
        Commands::Retrieve { query, docs, top_k } => {
            commands::retrieve::run(config, &query, &docs, top_k).await?
        }
    }

    Ok(())
}
