//! 65-byte recoverable signature form

use crate::SignatureError;
use k256::ecdsa::{RecoveryId, Signature};
use std::fmt;

/// Length of an `r || s || v` signature
pub const SIGNATURE_LEN: usize = 65;

/// Decode hex text, with or without a `0x` prefix. Surrounding whitespace is
/// ignored.
pub fn decode_hex(text: &str) -> Result<Vec<u8>, SignatureError> {
    let trimmed = text.trim();
    let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    hex::decode(digits).map_err(|_| SignatureError::InvalidHex)
}

/// A parsed `r || s || v` signature, normalized to low-S.
///
/// Parsing is the only gate between untrusted bytes and curve arithmetic: a
/// value of this type always holds in-range scalars and a valid recovery id.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct RecoverableSignature {
    signature: Signature,
    recovery_id: RecoveryId,
}

impl RecoverableSignature {
    /// Parse the 65-byte form. `v` may be 0/1 or 27/28.
    ///
    /// High-S signatures are accepted and normalized, flipping the recovery
    /// parity so the same signer is recovered.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SignatureError> {
        if bytes.len() != SIGNATURE_LEN {
            return Err(SignatureError::InvalidLength {
                expected: SIGNATURE_LEN,
                actual: bytes.len(),
            });
        }

        let v = bytes[64];
        let parity = match v {
            0 | 27 => false,
            1 | 28 => true,
            other => return Err(SignatureError::InvalidRecoveryByte(other)),
        };

        let signature =
            Signature::from_slice(&bytes[..64]).map_err(|_| SignatureError::InvalidScalar)?;

        let (signature, parity) = match signature.normalize_s() {
            Some(normalized) => (normalized, !parity),
            None => (signature, parity),
        };

        Ok(Self {
            signature,
            recovery_id: RecoveryId::new(parity, false),
        })
    }

    /// Parse hex text, with or without a `0x` prefix
    pub fn from_hex(text: &str) -> Result<Self, SignatureError> {
        Self::from_bytes(&decode_hex(text)?)
    }

    pub(crate) fn from_parts(signature: Signature, recovery_id: RecoveryId) -> Self {
        Self {
            signature,
            recovery_id,
        }
    }

    /// The `(r, s)` component
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// The recovery id
    pub fn recovery_id(&self) -> RecoveryId {
        self.recovery_id
    }

    /// Serialize as `r || s || v` with `v` in {27, 28}
    pub fn to_bytes(&self) -> [u8; SIGNATURE_LEN] {
        let mut out = [0u8; SIGNATURE_LEN];
        out[..64].copy_from_slice(&self.signature.to_bytes());
        out[64] = 27 + u8::from(self.recovery_id.is_y_odd());
        out
    }

    /// Lowercase hex with a `0x` prefix
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.to_bytes()))
    }
}

impl fmt::Debug for RecoverableSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecoverableSignature({})", self.to_hex())
    }
}
