//! `ward authorize`

use super::{decode_hex_arg, read_text_arg};
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use ward_authorization::{AccessAuthorizer, AuthorizerConfig};
use ward_core::{AccessDecision, BlacklistStore, PhysicalTimeEffects};
use ward_effects::{InMemoryBlacklist, StaticRegistrySource, SystemClock};

/// Exit status for a denied request
const EXIT_DENIED: u8 = 2;

/// Arguments for `ward authorize`
#[derive(Args, Debug)]
pub struct AuthorizeArgs {
    /// CID the client is requesting
    #[arg(long)]
    pub cid: String,

    /// Attestation JSON exactly as received, or `@path`
    #[arg(long)]
    pub attestation: String,

    /// 65-byte signature as hex, or `@path`
    #[arg(long)]
    pub signature: String,

    /// JSON file listing registry records
    #[arg(long)]
    pub registry: PathBuf,

    /// JSON blacklist file; omitted means nothing is blocked
    #[arg(long)]
    pub blacklist: Option<PathBuf>,

    /// Evaluate at this time (ms since epoch) instead of now
    #[arg(long)]
    pub now_ms: Option<u64>,
}

struct FixedClock(u64);

impl PhysicalTimeEffects for FixedClock {
    fn now_ms(&self) -> u64 {
        self.0
    }
}

/// Run one access decision against file-backed collaborators
pub async fn run(args: &AuthorizeArgs, config: &AuthorizerConfig) -> Result<AccessDecision> {
    let attestation = read_text_arg(&args.attestation)?;
    let signature = decode_hex_arg(&args.signature)?;

    let blacklist: Arc<dyn BlacklistStore> = match &args.blacklist {
        Some(path) => Arc::new(InMemoryBlacklist::load(path)?),
        None => Arc::new(InMemoryBlacklist::new()),
    };
    let clock: Arc<dyn PhysicalTimeEffects> = match args.now_ms {
        Some(now_ms) => Arc::new(FixedClock(now_ms)),
        None => Arc::new(SystemClock::new()),
    };
    let authorizer = AccessAuthorizer::from_sources(
        config,
        Arc::new(StaticRegistrySource::from_file(&args.registry)),
        blacklist,
        clock,
    );

    Ok(authorizer
        .authorize_raw(&args.cid, attestation.as_bytes(), &signature)
        .await)
}

/// Process exit status for a decision
pub fn exit_code(decision: &AccessDecision) -> ExitCode {
    if decision.is_authorized() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_DENIED)
    }
}
