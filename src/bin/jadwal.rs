//! CLI binary for jadwal.
//!
//! A thin shim over the library crate: maps CLI flags to
//! `ExtractionConfig`, prints JSON, and hosts the HTTP service.

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use jadwal::{extract_tables, inspect, start_server, ApiState, ExtractionConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "jadwal",
    version,
    about = "Hybrid table extraction from Arabic PDF reports",
    long_about = "Extract tables from PDF documents using two independent strategies \
                  (ruled-line lattice detection and horizontal-line text detection) \
                  and merge the results into one hybrid list."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP service
    Serve {
        /// Bind address
        #[arg(long, env = "JADWAL_ADDR", default_value = "0.0.0.0:8080")]
        addr: String,
    },

    /// Extract tables from a PDF file or URL and print them as JSON
    Extract {
        /// Local file path or HTTP/HTTPS URL
        input: String,

        /// Page selector: "all", a page number, or ranges like "1-3,7"
        #[arg(short, long, default_value = "1")]
        pages: String,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Print page count and a text sample without extracting tables
    Inspect {
        /// Local file path or HTTP/HTTPS URL
        input: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Serve { addr } => {
            start_server(&addr, ApiState::default())
                .await
                .with_context(|| format!("server failed on {addr}"))?;
        }

        Command::Extract {
            input,
            pages,
            pretty,
        } => {
            let config = ExtractionConfig::builder()
                .pages(pages)
                .build()
                .context("invalid configuration")?;
            let output = extract_tables(&input, &config)
                .await
                .with_context(|| format!("extraction failed for '{input}'"))?;

            for failure in &output.failures {
                eprintln!(
                    "warning: {} strategy failed{}: {}",
                    match failure.origin {
                        jadwal::Origin::RuledLine => "ruled-line",
                        jadwal::Origin::HorizontalLine => "horizontal-line",
                    },
                    failure
                        .page
                        .map(|p| format!(" on page {p}"))
                        .unwrap_or_default(),
                    failure.detail
                );
            }

            let json = if pretty {
                serde_json::to_string_pretty(&output)?
            } else {
                serde_json::to_string(&output)?
            };
            println!("{json}");
        }

        Command::Inspect { input } => {
            let summary = inspect(&input, &ExtractionConfig::default())
                .await
                .with_context(|| format!("inspect failed for '{input}'"))?;
            println!("pages: {}", summary.pages);
            if !summary.sample_text.is_empty() {
                println!("--- page 1 sample ---");
                println!("{}", summary.sample_text);
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let default_filter = match verbose {
        0 => "jadwal=warn",
        1 => "jadwal=info",
        _ => "jadwal=debug,tower_http=debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}
