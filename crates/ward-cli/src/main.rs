//! Operator CLI for Ward
//!
//! Signs attestations the way a discovery node would, recovers signers, and
//! runs a full access decision against file-backed collaborators.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{authorize, recover, sign};

#[derive(Parser)]
#[command(name = "ward")]
#[command(about = "Ward - content access attestation tooling", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Authorizer config file (TOML); `WARD_*` variables override it
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign an attestation with a discovery-node key
    Sign(sign::SignArgs),
    /// Recover the address that signed an attestation
    Recover(recover::RecoverArgs),
    /// Decide whether a request would be served
    Authorize(authorize::AuthorizeArgs),
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Sign(args) => {
            let output = sign::run(&args)?;
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Recover(args) => {
            let signer = recover::run(&args)?;
            println!("{signer}");
            Ok(ExitCode::SUCCESS)
        }
        Commands::Authorize(args) => {
            let config = commands::load_config(cli.config.as_deref())?;
            let decision = authorize::run(&args, &config).await?;
            println!("{}", serde_json::to_string_pretty(&decision)?);
            Ok(authorize::exit_code(&decision))
        }
    }
}
