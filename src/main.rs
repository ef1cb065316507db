// src/main.rs
use bill_sections::extractors::TextSegmenter;
use bill_sections::utils::config::Overrides;
use bill_sections::utils::logging;
use bill_sections::{AppError, BillReference, Config, CongressClient, SectionPipeline};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Command Line Interface for bill section extraction
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Congress.gov API key (falls back to CONGRESS_API_KEY)
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Congress.gov API base URL (falls back to CONGRESS_API_BASE)
    #[arg(long, global = true)]
    api_base: Option<String>,

    /// User-Agent sent with every request
    #[arg(long, global = true)]
    user_agent: Option<String>,

    /// Per-request timeout in seconds (default: 30)
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    /// Structural heading that ends a section body in flat text; repeatable (default: TITLE, DIVISION)
    #[arg(long = "boundary-keyword", global = true)]
    boundary_keywords: Vec<String>,

    /// Write the JSON result (or error) to this file instead of stdout
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract the sections of a bill's newest text version as JSON
    Sections(BillArgs),
    /// Print a bill's title as JSON
    Title(BillArgs),
}

#[derive(clap::Args, Debug)]
struct BillArgs {
    /// Congress number, e.g. 118
    #[arg(long)]
    congress: String,

    /// Bill type, e.g. hr, s, hjres
    #[arg(long)]
    bill_type: String,

    /// Bill number, e.g. 815
    #[arg(long)]
    bill_number: String,
}

impl BillArgs {
    fn reference(&self) -> BillReference {
        BillReference::new(&self.congress, &self.bill_type, &self.bill_number)
    }
}

#[tokio::main]
async fn main() {
    // 1. Setup Logging (reads RUST_LOG env var)
    logging::setup_logging();

    // 2. Parse CLI Arguments
    let args = Args::parse();
    tracing::info!("Starting: {:?}", args.command); // args carry the API key, log only the command

    let output = args.output.clone();
    if let Err(e) = run(args).await {
        match &e {
            AppError::Extraction(err) => {
                // Callers get the error kind and a short message, nothing more
                let body = serde_json::json!({ "error": { "kind": err.kind(), "message": err.to_string() } });
                if let Err(write_err) = emit(output.as_deref(), &body.to_string()) {
                    tracing::error!("{}", write_err);
                }
            }
            other => tracing::error!("{}", other),
        }
        std::process::exit(1);
    }
}

/// Sends the JSON document to the output file, or stdout when none is given.
fn emit(path: Option<&Path>, json: &str) -> Result<(), AppError> {
    match path {
        Some(path) => {
            std::fs::write(path, format!("{}\n", json))?;
            tracing::info!("Wrote result to {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

async fn run(args: Args) -> Result<(), AppError> {
    // 3. Resolve configuration (env + CLI overrides)
    let config = Config::load(Overrides {
        api_base: args.api_base,
        api_key: args.api_key,
        user_agent: args.user_agent,
        timeout_secs: args.timeout_secs,
        boundary_keywords: args.boundary_keywords,
    })?;

    // 4. Build the pipeline
    let segmenter = TextSegmenter::with_boundary_keywords(&config.boundary_keywords)
        .map_err(|e| AppError::Config(format!("invalid boundary keyword: {}", e)))?;
    let client = CongressClient::new(&config)?;
    let pipeline = SectionPipeline::new(client).with_segmenter(segmenter);

    // 5. Run the command; Ctrl-C drops the in-flight request
    let output = tokio::select! {
        result = execute(&pipeline, &args.command) => result?,
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("Interrupted, abandoning in-flight request");
            return Err(AppError::Interrupted);
        }
    };

    emit(args.output.as_deref(), &output)
}

async fn execute(pipeline: &SectionPipeline<CongressClient>, command: &Command) -> Result<String, AppError> {
    match command {
        Command::Sections(bill) => {
            let result = pipeline.extract_sections(&bill.reference()).await?;
            tracing::info!("Extracted {} sections using {}", result.sections.len(), result.format_used);
            Ok(serde_json::to_string_pretty(&result)?)
        }
        Command::Title(bill) => {
            let title = pipeline.fetch_title(&bill.reference()).await?;
            Ok(serde_json::to_string_pretty(&serde_json::json!({ "title": title }))?)
        }
    }
}
