//! `ward sign`

use super::read_text_arg;
use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use ward_core::{Address, PhysicalTimeEffects, SignedAttestation};
use ward_effects::SystemClock;
use ward_signature::{AttestationSigner, DigestScheme};

/// Arguments for `ward sign`
#[derive(Args, Debug)]
pub struct SignArgs {
    /// Secret key as hex, or `@path` to read it from a file
    #[arg(long)]
    pub key: String,

    /// CID being granted
    #[arg(long)]
    pub cid: String,

    /// Logical content id the CID belongs to
    #[arg(long)]
    pub content_id: u64,

    /// Signing time in ms since epoch (defaults to now)
    #[arg(long)]
    pub timestamp_ms: Option<u64>,

    /// Mark the grant as safe to cache
    #[arg(long)]
    pub cacheable: bool,

    /// Digest scheme: raw or personal_message
    #[arg(long, default_value = "raw")]
    pub scheme: DigestScheme,
}

/// What `ward sign` prints
#[derive(Debug, Serialize)]
pub struct SignOutput {
    /// Address the signature recovers to
    pub signer: Address,
    /// Exact signed bytes, as text
    pub attestation: String,
    /// `0x`-prefixed 65-byte signature
    pub signature: String,
}

/// Sign an attestation built from `args`
pub fn run(args: &SignArgs) -> Result<SignOutput> {
    let key = read_text_arg(&args.key)?;
    let signer = AttestationSigner::from_secret_hex(&key, args.scheme).context("loading key")?;

    let timestamp_ms = args
        .timestamp_ms
        .unwrap_or_else(|| SystemClock::new().now_ms());
    let attestation =
        SignedAttestation::new(args.cid.clone(), args.content_id, timestamp_ms, args.cacheable)
            .context("building attestation")?;
    let signed = signer
        .sign_attestation(&attestation)
        .context("signing attestation")?;

    tracing::debug!(signer = %signer.address(), cid = attestation.cid(), "signed attestation");
    Ok(SignOutput {
        signer: signer.address(),
        attestation: String::from_utf8(signed.payload.clone()).context("payload is not UTF-8")?,
        signature: signed.signature_hex(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(cid: &str, timestamp_ms: u64) -> SignArgs {
        SignArgs {
            key: format!("0x{}", "11".repeat(32)),
            cid: cid.into(),
            content_id: 42,
            timestamp_ms: Some(timestamp_ms),
            cacheable: true,
            scheme: DigestScheme::Raw,
        }
    }

    #[test]
    fn signs_canonical_payload() {
        let output = run(&args("Qm1", 1_700_000_000_000)).unwrap();
        assert_eq!(
            output.attestation,
            r#"{"cacheable":true,"cid":"Qm1","content_id":42,"timestamp":1700000000000}"#
        );
        assert!(output.signature.starts_with("0x"));
        assert_eq!(output.signature.len(), 2 + 130);
    }

    #[test]
    fn rejects_invalid_cid() {
        assert!(run(&args("has space", 1)).is_err());
    }
}
