//! # Ward Signature
//!
//! Recovers the signer of a discovery-node attestation.
//!
//! Attestations are signed with ECDSA over secp256k1 on the Keccak-256 digest
//! of the payload and carried as 65-byte `r || s || v` recoverable signatures.
//! Recovery is a fixed-cost curve operation with no I/O, so it is safe to run
//! on attacker-controlled bytes before any network check.
//!
//! - [`RecoverableSignature`]: strict parsing of the 65-byte form
//! - [`SignatureVerifier`]: payload + signature → [`ward_core::Address`]
//! - [`AttestationSigner`]: the signing side, for tooling and tests
//! - [`DigestScheme`]: raw Keccak-256 or the Ethereum personal-message prefix

mod digest;
mod error;
mod recoverable;
mod signer;
mod verifier;

pub use digest::{keccak256, DigestScheme};
pub use error::SignatureError;
pub use recoverable::{decode_hex, RecoverableSignature, SIGNATURE_LEN};
pub use signer::{AttestationSigner, SignedPayload};
pub use verifier::{address_of, SignatureVerifier, MAX_PAYLOAD_LEN};
