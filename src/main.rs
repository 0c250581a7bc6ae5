//! Rowguard CLI - Validate batches of imported records
//!
//! # Main Commands
//!
//! ```bash
//! rowguard serve                     # Start HTTP server (port 3000)
//! rowguard validate batch.json      # Validate a JSON array of records
//! rowguard rules show               # Print the active rule-set
//! ```
//!
//! A batch file is a JSON array of records, each record an object mapping
//! field keys to scalar cells.

use clap::{Parser, Subcommand};
use rowguard::{
    process_batch, BatchOptions, BatchOutcome, FixedNamespace, HttpSpaceResolver, Record, RuleSet,
};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "rowguard")]
#[command(about = "Record-level validation for tabular data imports", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a JSON file containing an array of records
    Validate {
        /// Input JSON file (array of records)
        input: PathBuf,

        /// Validate under this namespace (skips the space lookup)
        #[arg(short, long)]
        namespace: Option<String>,

        /// Resolve the namespace from this import space
        #[arg(short, long)]
        space_id: Option<String>,

        /// Rule-set JSON file (default: built-in rules)
        #[arg(short, long)]
        rules: Option<PathBuf>,

        /// Output file for annotated records (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Records per dispatch unit
        #[arg(long, default_value = "100")]
        chunk_size: usize,

        /// Worker threads for chunk dispatch
        #[arg(long, default_value = "2")]
        parallel: usize,
    },

    /// Start HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },

    /// Manage the validation rule-set
    Rules {
        #[command(subcommand)]
        action: RulesAction,
    },
}

#[derive(Subcommand)]
enum RulesAction {
    /// Print the active rule-set
    Show {
        /// Rule-set JSON file (default: built-in rules)
        #[arg(short, long)]
        rules: Option<PathBuf>,
    },

    /// Write the default rule-set to a file for editing
    Init {
        /// Destination path
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Validate {
            input,
            namespace,
            space_id,
            rules,
            output,
            chunk_size,
            parallel,
        } => {
            cmd_validate(
                &input,
                namespace,
                space_id,
                rules.as_deref(),
                output.as_deref(),
                chunk_size,
                parallel,
            )
            .await
        }

        Commands::Serve { port } => cmd_serve(port).await,

        Commands::Rules { action } => cmd_rules(action),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

async fn cmd_validate(
    input: &Path,
    namespace: Option<String>,
    space_id: Option<String>,
    rules_path: Option<&Path>,
    output: Option<&Path>,
    chunk_size: usize,
    parallel: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Validating: {}", input.display());

    let content = fs::read_to_string(input)?;
    let records: Vec<Record> = serde_json::from_str(&content)?;
    eprintln!("   {} records", records.len());

    let rules = match rules_path {
        Some(path) => {
            eprintln!("   Rule-set: {}", path.display());
            RuleSet::from_file(path)?
        }
        None => RuleSet::default(),
    };

    let options = BatchOptions {
        chunk_size,
        parallelism: parallel,
    };

    let outcome = match (namespace, space_id) {
        (Some(ns), _) => {
            process_batch(records, &FixedNamespace::new(ns), "-", &rules, &options).await
        }
        (None, Some(id)) => {
            let resolver = HttpSpaceResolver::from_env()?;
            process_batch(records, &resolver, &id, &rules, &options).await
        }
        // No namespace context at all: unconditional rules only
        (None, None) => {
            process_batch(records, &FixedNamespace::default(), "-", &rules, &options).await
        }
    };

    print_summary(&outcome);

    let json = serde_json::to_string_pretty(&outcome.records)?;
    write_output(&json, output)?;

    if outcome.flagged_count > 0 {
        std::process::exit(1);
    }

    Ok(())
}

fn print_summary(outcome: &BatchOutcome) {
    if !outcome.validated {
        eprintln!("\n⚠️  Validation skipped: space lookup failed, batch returned untouched");
        return;
    }

    if let Some(ref namespace) = outcome.namespace {
        if !namespace.is_empty() {
            eprintln!("   Namespace: {}", namespace);
        }
    }

    if outcome.flagged_count == 0 {
        eprintln!("\n✅ All {} records valid!", outcome.valid_count);
        return;
    }

    eprintln!("\n📊 Results: {} valid, {} flagged", outcome.valid_count, outcome.flagged_count);
    let mut shown = 0;
    for (i, record) in outcome.records.iter().enumerate() {
        if !record.has_errors() {
            continue;
        }
        shown += 1;
        if shown > 5 {
            eprintln!("   ... and {} more flagged records", outcome.flagged_count - 5);
            break;
        }
        eprintln!("\n❌ Record {}:", i);
        for error in record.errors.iter().take(3) {
            eprintln!("   - {}: {}", error.field, error.message);
        }
    }
}

async fn cmd_serve(port: u16) -> Result<(), Box<dyn std::error::Error>> {
    rowguard::server::start_server(port).await
}

fn cmd_rules(action: RulesAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        RulesAction::Show { rules } => {
            let rule_set = match rules {
                Some(ref path) => RuleSet::from_file(path)?,
                None => RuleSet::default(),
            };
            println!("{}", serde_json::to_string_pretty(&rule_set)?);
        }

        RulesAction::Init { path } => {
            RuleSet::default().save(&path)?;
            eprintln!("✅ Default rule-set written to: {}", path.display());
            eprintln!("   Edit validProjectNames, then pass --rules {}", path.display());
        }
    }

    Ok(())
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
