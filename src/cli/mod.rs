//! Command-line interface.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use parse_report::config::load_settings;

#[derive(Parser)]
#[command(name = "parse-report")]
#[command(about = "Constituency and dependency reports from a CoreNLP pipeline")]
#[command(version)]
pub struct Cli {
    /// Config file path (defaults to ./parse-report.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Annotate the configured sentences and write the report
    Run {
        /// Side-file with one pre-computed tagging line per sentence
        #[arg(long)]
        side_file: Option<PathBuf>,
        /// Report file to (over)write
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// CoreNLP server endpoint (overrides config and CORENLP_ENDPOINT)
        #[arg(long)]
        endpoint: Option<String>,
    },

    /// Score a report's dependency parses against a gold-standard report
    Eval {
        /// Gold-standard report
        #[arg(long)]
        gold: PathBuf,
        /// Report to evaluate
        #[arg(long)]
        predicted: PathBuf,
        /// Score UPOS and POS tags from the side-file lines instead
        #[arg(long)]
        tags: bool,
    },

    /// Write a report's trees one per line, without the ROOT layer, for EVALB
    ExportTrees {
        /// Report to read
        report: PathBuf,
        /// File to (over)write
        #[arg(short, long)]
        output: PathBuf,
    },
}

/// Parse arguments and dispatch.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            side_file,
            output,
            endpoint,
        } => {
            let mut settings = load_settings(cli.config.as_deref())?;
            if let Some(side_file) = side_file {
                settings.side_file = side_file;
            }
            if let Some(output) = output {
                settings.output = output;
            }
            if let Some(endpoint) = endpoint {
                settings.pipeline.endpoint = endpoint;
            }
            commands::cmd_run(settings).await
        }
        Commands::Eval {
            gold,
            predicted,
            tags,
        } => {
            if tags {
                commands::cmd_eval_tags(&gold, &predicted)
            } else {
                commands::cmd_eval(&gold, &predicted)
            }
        }
        Commands::ExportTrees { report, output } => {
            commands::cmd_export_trees(&report, &output)
        }
    }
}
