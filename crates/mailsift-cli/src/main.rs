//! mailsift - find and score email addresses in PDF documents.

use anyhow::{Context, bail};
use clap::{Parser, Subcommand, ValueEnum};
use mailsift::{
    DocumentSource, JobRegistry, JobState, MailsiftConfig, ScanReport, ValidationOutcome, check_addresses,
};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const POLL_INTERVAL: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "mailsift", version)]
#[command(about = "Find and score email addresses in PDF documents", long_about = None)]
struct Cli {
    /// Configuration file (.toml, .yaml, .yml or .json); defaults to a discovered mailsift.toml
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text", global = true)]
    format: OutputFormat,

    /// Query MX records for promising addresses
    #[arg(long, global = true)]
    dns: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract and score addresses from PDF files
    Extract {
        /// PDF files to scan, merged into one report
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Never fall back to OCR
        #[arg(long)]
        no_ocr: bool,

        /// OCR language (e.g. eng, deu, eng+fra)
        #[arg(short, long)]
        lang: Option<String>,
    },

    /// Score addresses given on the command line
    Check {
        #[arg(required = true)]
        addresses: Vec<String>,
    },
}

fn load_config(cli: &Cli) -> anyhow::Result<MailsiftConfig> {
    let mut config = match &cli.config {
        Some(path) => MailsiftConfig::from_file(path).with_context(|| format!("loading {}", path.display()))?,
        None => MailsiftConfig::discover()?.unwrap_or_default(),
    };

    if cli.dns {
        config.validation.enable_dns_lookup = true;
    }
    if let Commands::Extract { no_ocr, lang, .. } = &cli.command {
        if *no_ocr {
            config.ocr.enabled = false;
        }
        if let Some(lang) = lang {
            config.ocr.language = lang.clone();
        }
    }

    config.validate()?;
    Ok(config)
}

fn init_tracing(config: &MailsiftConfig) {
    let default_filter = config.log_level.clone().unwrap_or_else(|| "info".to_string());
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run_extract(files: Vec<PathBuf>, config: &MailsiftConfig) -> anyhow::Result<ScanReport> {
    let registry = JobRegistry::new();
    let documents = files.into_iter().map(DocumentSource::Path).collect();
    let id = registry.submit(documents, config)?;

    let mut last_message = String::new();
    loop {
        let status = registry.status(&id)?;
        if status.message != last_message {
            eprintln!("{}", status.message);
            last_message = status.message.clone();
        }

        match status.state {
            JobState::Completed => break,
            JobState::Failed => bail!(status.error.unwrap_or_else(|| "scan failed".to_string())),
            _ => tokio::time::sleep(POLL_INTERVAL).await,
        }
    }

    registry
        .output(&id)?
        .map(|report| report.as_ref().clone())
        .context("completed job has no output")
}

fn print_report(report: &ScanReport) {
    println!(
        "{} addresses ({} valid, {} invalid) in {:.2}s",
        report.total_emails, report.valid_emails, report.invalid_emails, report.processing_time_secs
    );
    for failed in &report.files_failed {
        println!("skipped {}: {}", failed.name, failed.error);
    }
    println!();

    for record in &report.records {
        let verdict = if record.is_valid { "valid" } else { "invalid" };
        println!(
            "{:<40} {:>3} {:<9} {:<7} x{}",
            record.address,
            record.confidence,
            record.confidence_label().as_str(),
            verdict,
            record.occurrences
        );
        if let Some(name) = &record.name_hint {
            println!("    name:    {}", name);
        }
        if let Some(company) = &record.company_hint {
            println!("    company: {}", company);
        }
        for issue in &record.validation_details.issues {
            println!("    issue:   {}", issue);
        }
    }

    if !report.duplicates.is_empty() {
        println!();
        println!("Repeated addresses:");
        for duplicate in &report.duplicates {
            println!("  {:<40} {}", duplicate.address, duplicate.count);
        }
    }
}

fn print_outcomes(outcomes: &[ValidationOutcome]) {
    for outcome in outcomes {
        let verdict = if outcome.is_valid { "valid" } else { "invalid" };
        println!("{:<40} {:>3} {}", outcome.address, outcome.confidence, verdict);
        for issue in &outcome.details.issues {
            println!("    issue: {}", issue);
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    init_tracing(&config);
    tracing::debug!(?config, "Configuration loaded");

    let format = cli.format;
    match cli.command {
        Commands::Extract { files, .. } => {
            let report = run_extract(files, &config).await?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
                OutputFormat::Text => print_report(&report),
            }
        }
        Commands::Check { addresses } => {
            let outcomes = check_addresses(&addresses, &config).await?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outcomes)?),
                OutputFormat::Text => print_outcomes(&outcomes),
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_extract_flags_override_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mailsift.toml");
        std::fs::write(
            &path,
            "[validation]\nenable_dns_lookup = false\n\n[ocr]\nenabled = true\nlanguage = \"fra\"\n",
        )
        .unwrap();

        let cli = Cli::parse_from([
            "mailsift",
            "--config",
            path.to_str().unwrap(),
            "extract",
            "a.pdf",
            "--no-ocr",
            "--lang",
            "deu",
            "--dns",
        ]);
        let config = load_config(&cli).unwrap();
        assert!(!config.ocr.enabled);
        assert_eq!(config.ocr.language, "deu");
        assert!(config.validation.enable_dns_lookup);
    }

    #[test]
    fn test_config_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mailsift.toml");
        std::fs::write(&path, "[extraction]\nmin_content_weight = 10\n").unwrap();

        let cli = Cli::parse_from(["mailsift", "--config", path.to_str().unwrap(), "check", "a@b.com"]);
        let config = load_config(&cli).unwrap();
        assert_eq!(config.extraction.min_content_weight, 10);
        assert_eq!(cli.format, OutputFormat::Text);
    }
}
