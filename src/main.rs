use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use concall::{process_document, run_batch, GroqClient, GroqConfig, SegmenterConfig};

#[derive(Parser)]
#[command(name = "concall")]
#[command(author, version, about = "Earnings-call transcript dialogue segmentation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Segment one page-map transcript into phase buckets
    Parse {
        /// Input page-map file (JSON object of page index -> text)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file for the segmented result (JSON)
        #[arg(short, long)]
        output: PathBuf,

        /// Speaker label reserved for the call facilitator
        #[arg(long, default_value = "Moderator")]
        moderator_label: String,

        /// Keep the generic label heuristic instead of verifying speaker names
        #[arg(long)]
        no_verify: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Segment every page-map transcript in a directory
    Batch {
        /// Directory of page-map JSON files
        #[arg(short, long)]
        input_dir: PathBuf,

        /// Directory for segmented results
        #[arg(short, long)]
        output_dir: PathBuf,

        /// Roster of failing documents, updated after the run
        #[arg(long, default_value = "failed_files.json")]
        roster: PathBuf,

        /// Re-run only the documents currently in the roster
        #[arg(long)]
        retry_failed: bool,

        /// Speaker label reserved for the call facilitator
        #[arg(long, default_value = "Moderator")]
        moderator_label: String,

        /// Keep the generic label heuristic instead of verifying speaker names
        #[arg(long)]
        no_verify: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Parse {
            input,
            output,
            moderator_label,
            no_verify,
            verbose,
        } => {
            setup_logging(verbose);
            let client = GroqClient::new(GroqConfig::from_env()?);
            let config = SegmenterConfig { moderator_label };
            process_document(&input, &output, &config, no_verify, &client, &client).await?;
            Ok(())
        }
        Commands::Batch {
            input_dir,
            output_dir,
            roster,
            retry_failed,
            moderator_label,
            no_verify,
            verbose,
        } => {
            setup_logging(verbose);
            let client = GroqClient::new(GroqConfig::from_env()?);
            let config = SegmenterConfig { moderator_label };
            let summary = run_batch(
                &input_dir,
                &output_dir,
                &roster,
                retry_failed,
                no_verify,
                &config,
                &client,
                &client,
            )
            .await?;
            info!(
                "Finished: {} documents processed, {} failed",
                summary.processed, summary.failed
            );
            Ok(())
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}
