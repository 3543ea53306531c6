use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use protanno::config::{Config, LoggingConfig};

mod commands;

#[derive(Parser)]
#[command(
    name = "protanno",
    version,
    about = "Protein annotation aggregator for DAS sources",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (TOML); environment variables are used otherwise
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json); defaults to the configured format
    #[arg(long, global = true)]
    log_format: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Backfill sequences and crawl every annotation source
    Crawl {
        /// MI-JSON interactor file
        #[arg(short, long)]
        input: PathBuf,

        /// Write the JSON report here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also render every entity's annotation panel into this directory
        #[arg(long)]
        html: Option<PathBuf>,

        /// Patterns highlighted in the rendered panels
        #[arg(long, num_args = 1.., requires = "html")]
        highlight: Vec<String>,
    },

    /// List the configured annotation sources in crawl order
    Sources,

    /// Highlight search terms in a piece of text
    Highlight {
        /// Text to mark up
        #[arg(short, long)]
        text: String,

        /// Patterns to highlight
        #[arg(short, long, num_args = 1..)]
        include: Vec<String>,

        /// Patterns marked as excluded inside highlighted text
        #[arg(short, long, num_args = 1..)]
        exclude: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?;

    // Initialize tracing/logging; command-line flags override the configured values
    let log_format = cli
        .log_format
        .clone()
        .unwrap_or_else(|| config.logging.format.clone());
    setup_tracing(&log_format, &config.logging, cli.verbose)?;

    match cli.command {
        Commands::Crawl {
            input,
            output,
            html,
            highlight,
        } => {
            tracing::info!(
                input = %input.display(),
                output = ?output,
                html = ?html,
                "Starting crawl command"
            );
            let render = html.map(|dir| commands::RenderOptions {
                dir,
                patterns: highlight,
            });
            commands::crawl(config, input, output, render).await?;
        }

        Commands::Sources => {
            commands::sources(&config);
        }

        Commands::Highlight {
            text,
            include,
            exclude,
        } => {
            tracing::debug!(
                include = ?include,
                exclude = ?exclude,
                "Starting highlight command"
            );
            commands::highlight(&config, text, include, exclude)?;
        }
    }

    Ok(())
}

fn setup_tracing(format: &str, logging: &LoggingConfig, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        EnvFilter::new(logging.filter_directive(true))
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(logging.filter_directive(false)))
    };

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        "text" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
        other => anyhow::bail!("unknown log format: {other}"),
    }

    Ok(())
}
