//! `ward recover`

use super::{decode_hex_arg, read_text_arg};
use anyhow::{Context, Result};
use clap::Args;
use ward_core::Address;
use ward_signature::{DigestScheme, SignatureVerifier};

/// Arguments for `ward recover`
#[derive(Args, Debug)]
pub struct RecoverArgs {
    /// Signed payload exactly as signed, or `@path`
    #[arg(long)]
    pub attestation: String,

    /// 65-byte signature as hex, or `@path`
    #[arg(long)]
    pub signature: String,

    /// Digest scheme: raw or personal_message
    #[arg(long, default_value = "raw")]
    pub scheme: DigestScheme,
}

/// Recover the signer of the given payload
pub fn run(args: &RecoverArgs) -> Result<Address> {
    let payload = read_text_arg(&args.attestation)?;
    let signature = decode_hex_arg(&args.signature)?;
    SignatureVerifier::new(args.scheme)
        .recover_signer_from_bytes(payload.as_bytes(), &signature)
        .context("recovering signer")
}
