use std::{fs, path::PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use engine::{RuleVersion, compute_sheet};

#[derive(Subcommand)]
enum Cmd {
    /// Compute the derived sheet for a raw character JSON file (stdout)
    Derive {
        /// Path to the raw character record
        file: PathBuf,
        /// Pretty-print JSON
        #[arg(long, default_value_t = true)]
        pretty: bool,
    },
    /// Report the detected rule version and the reason for it
    Version {
        /// Path to the raw character record
        file: PathBuf,
    },
}

#[derive(Parser)]
#[command(name = "sheet-cli")]
#[command(about = "Character derivation harness")]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

fn load_record(file: &PathBuf) -> anyhow::Result<serde_json::Value> {
    let text = fs::read_to_string(file)
        .with_context(|| format!("failed to read character JSON: {}", file.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("failed to parse character JSON: {}", file.display()))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Cmd::Derive { file, pretty } => {
            let record = load_record(&file)?;
            let sheet = compute_sheet(&record)?;
            let out = if pretty {
                serde_json::to_string_pretty(&sheet)?
            } else {
                serde_json::to_string(&sheet)?
            };
            println!("{}", out);
        }
        Cmd::Version { file } => {
            let record = load_record(&file)?;
            let detection = RuleVersion::detect(&record);
            println!(
                "{} ({})",
                serde_json::to_string(&detection.version)?,
                detection.reason
            );
        }
    }
    Ok(())
}
