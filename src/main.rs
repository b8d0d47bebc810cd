//! # metagen CLI
//!
//! Drives the metadata pipeline from the terminal: generate metadata for one
//! page, ask for SEO suggestions, or process a batch file of pages.
//!
//! Configuration comes from the environment (`HUGGINGFACE_API_KEY`,
//! `METAGEN_MODEL`, `METAGEN_BASE_URL`) with command-line overrides. Logs go to
//! stderr (filtered by `RUST_LOG`); results go to stdout or `--output`.

mod telemetry;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use metagen::config::Config;
use metagen::extract::{extract_page_title, extract_text};
use metagen::service::{HostedGenerator, SeoService};
use serde::{Deserialize, Serialize};
use telemetry::TelemetryOptions;
use tracing::{info, instrument};

#[derive(Parser)]
#[command(author, version, about = "Generate SEO metadata for webpage content with a hosted language model", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Model identifier (overrides METAGEN_MODEL)
    #[arg(long, global = true)]
    model: Option<String>,

    /// Client-side limit on model requests per minute
    #[arg(long, global = true)]
    requests_per_minute: Option<u32>,

    /// Also write logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Export traces over OTLP/HTTP
    #[arg(long, global = true)]
    otel: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate title, description and keywords for a page
    Generate(GenerateArgs),

    /// Suggest SEO improvements for page content
    Analyze(AnalyzeArgs),

    /// Generate metadata for every page in a JSON file
    Batch(BatchArgs),
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Page content as text
    #[arg(short, long, conflicts_with = "file", required_unless_present = "file")]
    content: Option<String>,

    /// Read page content from a file
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Treat the input as raw HTML and extract its visible text
    #[arg(long)]
    html: bool,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Address of the page
    #[arg(short, long, required = true)]
    url: String,

    #[command(flatten)]
    input: InputArgs,

    /// Output format (text|json)
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    format: String,
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Output format (text|json)
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    format: String,
}

#[derive(Args, Debug)]
struct BatchArgs {
    /// JSON file holding an array of {"url", "content"} objects
    #[arg(short, long, required = true)]
    input: PathBuf,

    /// Pages processed at the same time
    #[arg(short, long, default_value = "4")]
    concurrency: usize,

    /// Write results here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// One entry of a batch input file
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
struct PageInput {
    url: String,
    content: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let _telemetry = telemetry::init_tracing_subscriber(TelemetryOptions {
        log_file: cli.log_file.as_deref(),
        otel: cli.otel,
    })?;

    let Some(command) = cli.command else {
        // If no command is provided, show help
        let _ = Cli::parse_from(["metagen", "--help"]);
        return Ok(());
    };

    let mut config = Config::from_env()?;
    if let Some(model) = cli.model {
        config.inference.model = model;
    }
    if let Some(limit) = cli.requests_per_minute {
        config.requests_per_minute = std::num::NonZeroU32::new(limit);
    }
    let service = SeoService::from_config(config)?;

    match command {
        Commands::Generate(args) => generate_command(&service, args).await?,
        Commands::Analyze(args) => analyze_command(&service, args).await?,
        Commands::Batch(args) => batch_command(&service, args).await?,
    }

    Ok(())
}

/// Load the page content named by the input flags
async fn load_content(input: &InputArgs) -> anyhow::Result<(String, Option<String>)> {
    let raw = match (&input.content, &input.file) {
        (Some(content), _) => content.clone(),
        (None, Some(path)) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?,
        (None, None) => anyhow::bail!("either --content or --file is required"),
    };

    if input.html {
        Ok((extract_text(&raw), extract_page_title(&raw)))
    } else {
        Ok((raw, None))
    }
}

#[instrument(skip(service))]
async fn generate_command(
    service: &SeoService<HostedGenerator>,
    args: GenerateArgs,
) -> anyhow::Result<()> {
    let (content, existing_title) = load_content(&args.input).await?;

    let (metadata, source) = service
        .generate_llm_metadata_with_source(&args.url, &content)
        .await;
    info!("Metadata for {} produced by {:?}", args.url, source);

    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&metadata)?),
        _ => {
            println!("URL:         {}", metadata.url);
            if let Some(existing) = existing_title {
                println!("Page title:  {}", existing);
            }
            println!(
                "Title:       {} ({} chars)",
                metadata.title,
                metadata.title.chars().count()
            );
            println!(
                "Description: {} ({} chars)",
                metadata.description,
                metadata.description.chars().count()
            );
            println!("Keywords:    {}", metadata.keywords);
            println!("Source:      {:?}", source);
        }
    }

    Ok(())
}

#[instrument(skip(service))]
async fn analyze_command(
    service: &SeoService<HostedGenerator>,
    args: AnalyzeArgs,
) -> anyhow::Result<()> {
    let (content, _) = load_content(&args.input).await?;
    let suggestions = service.analyze_content(&content).await;

    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&suggestions)?),
        _ => {
            for (i, suggestion) in suggestions.iter().enumerate() {
                println!("{}. {}", i + 1, suggestion);
            }
        }
    }

    Ok(())
}

/// Parse a batch input file
fn read_batch_file(path: &Path) -> anyhow::Result<Vec<PageInput>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let pages: Vec<PageInput> = serde_json::from_str(&content)
        .with_context(|| format!("{} is not a JSON array of pages", path.display()))?;
    Ok(pages)
}

#[instrument(skip(service))]
async fn batch_command(
    service: &SeoService<HostedGenerator>,
    args: BatchArgs,
) -> anyhow::Result<()> {
    let pages = read_batch_file(&args.input)?;
    info!("Processing {} pages", pages.len());

    let progress_bar = ProgressBar::new(pages.len() as u64);
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} ({eta}) {msg}")?
            .progress_chars("##-"),
    );

    let results: Vec<_> = stream::iter(pages)
        .map(|page| {
            let progress_bar = progress_bar.clone();
            async move {
                let metadata = service
                    .generate_llm_metadata(&page.url, &page.content)
                    .await;
                progress_bar.inc(1);
                metadata
            }
        })
        .buffered(args.concurrency.max(1))
        .collect()
        .await;
    progress_bar.finish_with_message("done");

    let json = serde_json::to_string_pretty(&results)?;
    match args.output {
        Some(output_file) => {
            tokio::fs::write(&output_file, json).await?;
            println!(
                "Saved metadata for {} pages to {}",
                results.len(),
                output_file.display()
            );
        }
        None => println!("{}", json),
    }

    Ok(())
}
