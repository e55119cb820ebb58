//! ReadPal CLI, the main entry point.
//!
//! Commands:
//! - `onboard`   Write the default config
//! - `gateway`   Start the HTTP API server
//! - `ask`       Ask a question about a PDF
//! - `summarize` Summarize a PDF
//! - `doctor`    Diagnose config and provider health

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "readpal",
    about = "ReadPal: an AI reading companion for PDF documents",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the default configuration file
    Onboard,

    /// Start the HTTP gateway server
    Gateway {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Ask a single question about a PDF
    Ask {
        /// URL of the PDF
        #[arg(short, long)]
        url: String,

        /// The question to ask
        #[arg(short, long)]
        question: String,
    },

    /// Summarize a PDF
    Summarize {
        /// URL of the PDF
        #[arg(short, long)]
        url: String,
    },

    /// Diagnose configuration and provider health
    Doctor,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Onboard => commands::onboard::run().await?,
        Commands::Gateway { port } => commands::gateway::run(port).await?,
        Commands::Ask { url, question } => commands::read::ask(&url, &question).await?,
        Commands::Summarize { url } => commands::read::summarize(&url).await?,
        Commands::Doctor => commands::doctor::run().await?,
    }

    Ok(())
}
