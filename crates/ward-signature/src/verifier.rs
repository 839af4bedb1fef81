//! Signer recovery

use crate::{DigestScheme, RecoverableSignature, SignatureError};
use k256::ecdsa::VerifyingKey;
use ward_core::Address;

/// Upper bound on hashed payload size, in bytes
pub const MAX_PAYLOAD_LEN: usize = 16 * 1024;

/// Derive the 20-byte address of a secp256k1 public key: the last 20 bytes
/// of the Keccak-256 digest of the uncompressed point without its 0x04 tag.
pub fn address_of(key: &VerifyingKey) -> Address {
    let point = key.to_encoded_point(false);
    let digest = crate::keccak256(&point.as_bytes()[1..]);
    let mut bytes = [0u8; 20];
    bytes.copy_from_slice(&digest[12..]);
    Address::from_bytes(bytes)
}

/// Recovers the address that produced a signature over a payload.
///
/// Pure and deterministic: no I/O, no shared state, fixed-cost curve math.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignatureVerifier {
    scheme: DigestScheme,
}

impl SignatureVerifier {
    /// Create a verifier using `scheme` to derive digests
    pub fn new(scheme: DigestScheme) -> Self {
        Self { scheme }
    }

    /// Digest scheme in use
    pub fn scheme(&self) -> DigestScheme {
        self.scheme
    }

    /// Recover the signer of `payload`.
    ///
    /// `signature` has already passed [`RecoverableSignature::from_bytes`], so
    /// the only failure left is a point that does not exist on the curve.
    pub fn recover_signer(
        &self,
        payload: &[u8],
        signature: &RecoverableSignature,
    ) -> Result<Address, SignatureError> {
        if payload.len() > MAX_PAYLOAD_LEN {
            return Err(SignatureError::PayloadTooLarge {
                len: payload.len(),
                max: MAX_PAYLOAD_LEN,
            });
        }

        let digest = self.scheme.digest(payload);
        let key = VerifyingKey::recover_from_prehash(
            &digest,
            signature.signature(),
            signature.recovery_id(),
        )
        .map_err(|_| SignatureError::Unrecoverable)?;

        let address = address_of(&key);
        tracing::trace!(signer = %address, scheme = %self.scheme, "recovered signer");
        Ok(address)
    }

    /// Parse raw signature bytes, then recover the signer
    pub fn recover_signer_from_bytes(
        &self,
        payload: &[u8],
        signature: &[u8],
    ) -> Result<Address, SignatureError> {
        let signature = RecoverableSignature::from_bytes(signature)?;
        self.recover_signer(payload, &signature)
    }
}
