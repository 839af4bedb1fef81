//! Keccak-256 digests over attestation payloads

use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};
use std::fmt;
use std::str::FromStr;

/// Keccak-256 of `input`
pub fn keccak256(input: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(input);
    hasher.finalize().into()
}

/// How the signed digest is derived from the payload bytes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DigestScheme {
    /// `keccak256(payload)`
    #[default]
    Raw,
    /// `keccak256("\x19Ethereum Signed Message:\n" || len || payload)`, the
    /// digest wallets produce for `personal_sign`
    PersonalMessage,
}

impl DigestScheme {
    /// Digest `payload` under this scheme
    pub fn digest(self, payload: &[u8]) -> [u8; 32] {
        match self {
            Self::Raw => keccak256(payload),
            Self::PersonalMessage => {
                let mut hasher = Keccak256::new();
                hasher.update(b"\x19Ethereum Signed Message:\n");
                hasher.update(payload.len().to_string().as_bytes());
                hasher.update(payload);
                hasher.finalize().into()
            }
        }
    }
}

impl FromStr for DigestScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "raw" => Ok(Self::Raw),
            "personal_message" => Ok(Self::PersonalMessage),
            other => Err(format!(
                "unknown digest scheme '{other}', expected 'raw' or 'personal_message'"
            )),
        }
    }
}

impl fmt::Display for DigestScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raw => f.write_str("raw"),
            Self::PersonalMessage => f.write_str("personal_message"),
        }
    }
}
