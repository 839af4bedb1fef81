//! Signing side of the attestation scheme
//!
//! Discovery nodes hold the key; the storage node never signs. This type
//! exists for operator tooling and for tests that need real signatures.

use crate::{
    address_of, decode_hex, DigestScheme, RecoverableSignature, SignatureError, SIGNATURE_LEN,
};
use k256::ecdsa::SigningKey;
use std::fmt;
use ward_core::{Address, SignedAttestation};

/// Payload bytes together with their 65-byte signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedPayload {
    /// Exact bytes that were signed
    pub payload: Vec<u8>,
    /// `r || s || v`, `v` in {27, 28}
    pub signature: [u8; SIGNATURE_LEN],
}

impl SignedPayload {
    /// Signature as `0x`-prefixed hex
    pub fn signature_hex(&self) -> String {
        format!("0x{}", hex::encode(self.signature))
    }
}

/// secp256k1 key that signs attestation payloads
pub struct AttestationSigner {
    key: SigningKey,
    scheme: DigestScheme,
}

impl AttestationSigner {
    /// Wrap an existing signing key
    pub fn new(key: SigningKey, scheme: DigestScheme) -> Self {
        Self { key, scheme }
    }

    /// Build from a 32-byte secret scalar
    pub fn from_secret_bytes(secret: &[u8], scheme: DigestScheme) -> Result<Self, SignatureError> {
        let key = SigningKey::from_slice(secret)
            .map_err(|_| SignatureError::Signing("secret is not a valid scalar".into()))?;
        Ok(Self::new(key, scheme))
    }

    /// Build from hex secret text, with or without a `0x` prefix
    pub fn from_secret_hex(text: &str, scheme: DigestScheme) -> Result<Self, SignatureError> {
        Self::from_secret_bytes(&decode_hex(text)?, scheme)
    }

    /// Address recovered from this key's signatures
    pub fn address(&self) -> Address {
        address_of(self.key.verifying_key())
    }

    /// Sign arbitrary payload bytes
    pub fn sign_payload(&self, payload: &[u8]) -> Result<SignedPayload, SignatureError> {
        let digest = self.scheme.digest(payload);
        let (signature, recovery_id) = self
            .key
            .sign_prehash_recoverable(&digest)
            .map_err(|e| SignatureError::Signing(e.to_string()))?;
        Ok(SignedPayload {
            payload: payload.to_vec(),
            signature: RecoverableSignature::from_parts(signature, recovery_id).to_bytes(),
        })
    }

    /// Sign the canonical encoding of an attestation
    pub fn sign_attestation(
        &self,
        attestation: &SignedAttestation,
    ) -> Result<SignedPayload, SignatureError> {
        let payload = attestation
            .canonical_bytes()
            .map_err(|e| SignatureError::Signing(e.to_string()))?;
        self.sign_payload(&payload)
    }
}

impl fmt::Debug for AttestationSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttestationSigner")
            .field("address", &self.address())
            .field("scheme", &self.scheme)
            .finish_non_exhaustive()
    }
}
