//! vitae - résumé record and document tree tool

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use vitae::{AdapterConfig, Document, ResumeRecord, build_document_with, extract_record_with};

#[derive(Parser)]
#[command(name = "vitae")]
#[command(version, about = "Résumé record and document tree tool", long_about = None)]
#[command(after_help = "EXAMPLES:
    vitae build resume.json          Record to document tree
    vitae extract tree.json          Document tree to record
    vitae validate tree.json         Check a tree against the content model
    vitae markup resume.json         Flatten to inline markup

Use - as INPUT to read from stdin. Set RUST_LOG=vitae=debug for detail.")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Adapter configuration (placeholders, skills separator) as JSON
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(short, long, global = true)]
    pretty: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Build a document tree from a résumé record
    Build {
        #[arg(value_name = "INPUT")]
        input: String,
    },
    /// Extract a résumé record from a document tree
    Extract {
        #[arg(value_name = "INPUT")]
        input: String,
    },
    /// Validate a document tree and list every violation
    Validate {
        #[arg(value_name = "INPUT")]
        input: String,
    },
    /// Flatten a document tree or record to inline markup
    Markup {
        #[arg(value_name = "INPUT")]
        input: String,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "vitae=info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> vitae::Result<ExitCode> {
    let config = match &cli.config {
        Some(path) => AdapterConfig::from_path(path)?,
        None => AdapterConfig::default(),
    };

    match &cli.command {
        Command::Build { input } => {
            let record = ResumeRecord::from_json(&read_input(input)?)?;
            let doc = build_document_with(&record, &config);
            emit_json(&doc.to_fragment(), cli.pretty)?;
        }
        Command::Extract { input } => {
            let doc = Document::from_json(&read_input(input)?)?;
            let record = extract_record_with(&doc, &config);
            emit_json(&record, cli.pretty)?;
        }
        Command::Validate { input } => {
            let doc = Document::from_json(&read_input(input)?)?;
            let violations = vitae::validate(&doc);
            if violations.is_empty() {
                println!("ok: {} nodes", doc.node_count());
            } else {
                for violation in &violations {
                    println!("{violation}");
                }
                tracing::info!(count = violations.len(), "document has violations");
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Markup { input } => {
            let doc = load_any(&read_input(input)?, &config)?;
            println!("{}", vitae::document_markup_with(&doc, &config));
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Accept either a document tree or a résumé record.
fn load_any(json: &str, config: &AdapterConfig) -> vitae::Result<Document> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    if value.get("type").is_some() {
        Document::from_value(value)
    } else {
        let record = ResumeRecord::from_value(value)?;
        Ok(build_document_with(&record, config))
    }
}

fn read_input(input: &str) -> io::Result<String> {
    if input == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        fs::read_to_string(Path::new(input))
    }
}

fn emit_json<T: serde::Serialize>(value: &T, pretty: bool) -> vitae::Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{json}");
    Ok(())
}
