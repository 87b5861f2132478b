use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use larder_core::{fetch_recipe_with, parse_recipe_html, render_markdown, write_recipe, ReqwestClient};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "larder")]
#[command(about = "Converts scraped recipes to Obsidian Markdown", long_about = None)]
struct Cli {
    /// The recipe page URL to process
    url: String,

    /// The name of the file to write to (default: "<recipe title>.md")
    #[arg(long)]
    outfile: Option<PathBuf>,

    /// Read the page from a saved HTML file instead of fetching URL
    #[arg(long, value_name = "FILE")]
    html: Option<PathBuf>,

    /// Print the note to stdout instead of writing a file
    #[arg(long, conflicts_with = "outfile")]
    stdout: bool,

    /// Request timeout in seconds (overrides LARDER_HTTP_TIMEOUT_SECS)
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    tracing::debug!(url = %cli.url, html = ?cli.html, "processing recipe");

    let recipe = match &cli.html {
        Some(file) => {
            let html = fs::read_to_string(file)
                .with_context(|| format!("Failed to read HTML file: {}", file.display()))?;
            parse_recipe_html(&html, &cli.url)
                .with_context(|| format!("Failed to extract recipe from {}", file.display()))?
        }
        None => {
            let mut builder = ReqwestClient::builder();
            if let Some(secs) = cli.timeout {
                builder = builder.timeout(Duration::from_secs(secs));
            }
            let client = builder.build().context("Failed to build HTTP client")?;
            fetch_recipe_with(&client, &cli.url)
                .await
                .with_context(|| format!("Failed to fetch recipe from {}", cli.url))?
        }
    };

    if cli.stdout {
        println!("{}", render_markdown(&recipe));
        return Ok(());
    }

    let path = write_recipe(&recipe, cli.outfile.as_deref())?;
    println!("Saved recipe to: {}", path.display());

    Ok(())
}
