//! Signing fixtures
//!
//! Keys are derived from a small integer seed so a test can name "node 1" and
//! "node 2" and get the same wallets on every run.

use ward_core::{Address, DiscoveryNodeRecord, SignedAttestation};
use ward_signature::{keccak256, AttestationSigner, DigestScheme, SignedPayload};

/// Discovery-node key for tests
#[derive(Debug)]
pub struct KeyTestFixture {
    signer: AttestationSigner,
    address: Address,
}

impl KeyTestFixture {
    /// Deterministic key using the raw digest scheme
    pub fn from_seed(seed: u64) -> Self {
        Self::from_seed_with_scheme(seed, DigestScheme::Raw)
    }

    /// Deterministic key using `scheme`
    pub fn from_seed_with_scheme(seed: u64, scheme: DigestScheme) -> Self {
        let mut material = b"ward-test-key:".to_vec();
        material.extend_from_slice(&seed.to_be_bytes());
        let secret = keccak256(&material);
        let signer = AttestationSigner::from_secret_bytes(&secret, scheme)
            .expect("keccak output is a valid secp256k1 scalar");
        let address = signer.address();
        Self { signer, address }
    }

    /// Wallet this key signs as
    pub fn address(&self) -> Address {
        self.address
    }

    /// Underlying signer
    pub fn signer(&self) -> &AttestationSigner {
        &self.signer
    }

    /// Registry entry for this key as a discovery node
    pub fn record(&self) -> DiscoveryNodeRecord {
        DiscoveryNodeRecord::discovery(self.address, format!("https://{}.test", self.address))
    }

    /// Sign the canonical encoding of `attestation`
    pub fn sign(&self, attestation: &SignedAttestation) -> SignedPayload {
        self.signer.sign_attestation(attestation).expect("signing succeeds")
    }

    /// Sign arbitrary bytes
    pub fn sign_bytes(&self, payload: &[u8]) -> SignedPayload {
        self.signer.sign_payload(payload).expect("signing succeeds")
    }
}

/// Valid attestation; panics on invalid input
pub fn attestation(cid: &str, content_id: u64, timestamp_ms: u64, cacheable: bool) -> SignedAttestation {
    SignedAttestation::new(cid, content_id, timestamp_ms, cacheable).expect("valid attestation")
}
