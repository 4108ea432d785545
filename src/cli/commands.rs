//! CLI commands implementation.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;

use super::helpers::parse_bind;
use crate::analysis::classify;
use crate::config::Settings;
use crate::extract::{aggregate, TextExtractor};
use crate::llm::LlmClient;
use crate::server;

#[derive(Parser)]
#[command(name = "dealscan")]
#[command(about = "Document intake and analysis service for deal due diligence")]
#[command(version)]
pub struct Cli {
    /// Data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

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
    /// Initialize the data directory and database
    Init,

    /// Start the analysis web server
    Serve {
        /// Address to bind to: PORT, HOST, or HOST:PORT (default: 127.0.0.1:3030)
        #[arg(default_value = "127.0.0.1:3030")]
        bind: String,
    },

    /// Analyze documents from disk without going through the server
    Analyze {
        /// Files to analyze (PDFs and images)
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Show persisted analysis log entries
    Logs {
        /// Limit number of entries shown, newest first (0 = all, oldest first)
        #[arg(short, long, default_value = "0")]
        limit: usize,
    },

    /// Check availability of external extraction tools
    Tools,
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load(cli.data_dir.clone());

    match cli.command {
        Commands::Init => cmd_init(&settings).await,
        Commands::Serve { bind } => {
            let (host, port) = parse_bind(&bind);
            server::serve(&settings, &host, port).await
        }
        Commands::Analyze { files } => cmd_analyze(&settings, &files).await,
        Commands::Logs { limit } => cmd_logs(&settings, limit).await,
        Commands::Tools => cmd_tools(),
    }
}

async fn cmd_init(settings: &Settings) -> anyhow::Result<()> {
    settings.ensure_dirs()?;
    settings.log_repository().init_schema().await?;

    println!(
        "{} {}",
        style("Initialized").green().bold(),
        settings.data_dir.display()
    );
    Ok(())
}

async fn cmd_analyze(settings: &Settings, files: &[PathBuf]) -> anyhow::Result<()> {
    let llm = LlmClient::from_env()?;

    settings.ensure_dirs()?;
    let repo = settings.log_repository();
    repo.init_schema().await?;

    let extractor = TextExtractor::new(&settings.uploads_dir);
    let mut extracted = Vec::with_capacity(files.len());
    for path in files {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        let content_type = mime_guess::from_path(path).first_or_octet_stream();

        let bytes = std::fs::read(path)?;
        let result = extractor.extract(&bytes, content_type.essence_str(), &filename)?;
        println!(
            "{} {} ({} chars)",
            style("Extracted").cyan(),
            filename,
            result.text.chars().count()
        );
        extracted.push((filename, result.text));
    }

    let combined_text = aggregate(&extracted);
    let completion = llm.analyze(&combined_text).await?;
    let result = classify(&completion);

    let response_text = serde_json::to_string(&result)?;
    let entry = repo.append(&combined_text, &response_text).await?;

    println!("\n{}", style("Summary").bold());
    for point in &result.summary {
        println!("  - {}", point);
    }

    for (label, clauses) in [
        ("Risks", &result.clauses.risk),
        ("Opportunities", &result.clauses.opportunity),
        ("Neutral", &result.clauses.neutral),
        ("Anomalies", &result.anomalies),
    ] {
        if clauses.is_empty() {
            continue;
        }
        println!("\n{}", style(label).bold());
        for clause in clauses {
            println!("  - {}", clause);
        }
    }

    println!(
        "\n{} risk {} / opportunity {}",
        style("Scores:").bold(),
        result.risk_score_or_zero(),
        result.opportunity_score_or_zero()
    );
    println!("Logged as entry {}", entry.id);

    Ok(())
}

async fn cmd_logs(settings: &Settings, limit: usize) -> anyhow::Result<()> {
    let repo = settings.log_repository();
    repo.init_schema().await?;

    let entries = if limit == 0 {
        repo.list_all().await?
    } else {
        repo.list_recent(limit).await?
    };

    if entries.is_empty() {
        println!("No log entries.");
        return Ok(());
    }

    for entry in entries {
        println!(
            "{} {} request: {} chars",
            style(format!("#{}", entry.id)).bold(),
            entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
            entry.request_text.chars().count()
        );
        println!("  {}", entry.response_text);
    }

    Ok(())
}

fn cmd_tools() -> anyhow::Result<()> {
    for (tool, available) in TextExtractor::check_tools() {
        let status = if available {
            style("found").green()
        } else {
            style("missing").red()
        };
        println!("{:12} {}", tool, status);
    }
    Ok(())
}
