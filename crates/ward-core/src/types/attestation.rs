//! Signed content-access attestation
//!
//! The payload a discovery node signs and a client forwards to the storage
//! node. It is parsed once, validated exhaustively, and never mutated.
//!
//! # Wire format
//!
//! Attestations travel as compact JSON. The canonical encoding, which is the
//! byte string a discovery node signs, lists the keys in lexicographic order
//! with no whitespace:
//!
//! ```text
//! {"cacheable":true,"cid":"Qm1","content_id":42,"timestamp":1700000000000}
//! ```
//!
//! `timestamp` is milliseconds since the Unix epoch on the signer's clock.

use serde::{Deserialize, Serialize};

/// Upper bound on the length of an attested CID, in bytes
pub const MAX_CID_LEN: usize = 256;

/// Reasons an attestation payload is rejected before authorization
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AttestationError {
    /// The CID field is empty
    #[error("cid must not be empty")]
    EmptyCid,

    /// The CID is longer than [`MAX_CID_LEN`]
    #[error("cid is {len} bytes, limit is {max}")]
    CidTooLong {
        /// Actual length in bytes
        len: usize,
        /// Allowed maximum
        max: usize,
    },

    /// The CID contains whitespace or a control character
    #[error("cid contains a whitespace or control character")]
    InvalidCidCharacter,

    /// The signing timestamp is zero
    #[error("timestamp must be positive")]
    ZeroTimestamp,

    /// The payload is not a well-formed attestation document
    #[error("malformed attestation payload: {0}")]
    Malformed(String),
}

/// Content-access grant signed by a discovery node.
///
/// Fields are private; the only ways to obtain one are [`SignedAttestation::new`]
/// and [`SignedAttestation::from_json_bytes`], both of which validate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "AttestationWire")]
pub struct SignedAttestation {
    // Field order is the canonical key order; do not reorder.
    cacheable: bool,
    cid: String,
    content_id: u64,
    #[serde(rename = "timestamp")]
    timestamp_ms: u64,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct AttestationWire {
    #[serde(default)]
    cacheable: bool,
    cid: String,
    content_id: u64,
    timestamp: u64,
}

impl TryFrom<AttestationWire> for SignedAttestation {
    type Error = AttestationError;

    fn try_from(wire: AttestationWire) -> Result<Self, Self::Error> {
        Self::new(wire.cid, wire.content_id, wire.timestamp, wire.cacheable)
    }
}

impl SignedAttestation {
    /// Build a validated attestation
    pub fn new(
        cid: impl Into<String>,
        content_id: u64,
        timestamp_ms: u64,
        cacheable: bool,
    ) -> Result<Self, AttestationError> {
        let cid = cid.into();
        validate_cid(&cid)?;
        if timestamp_ms == 0 {
            return Err(AttestationError::ZeroTimestamp);
        }
        Ok(Self {
            cacheable,
            cid,
            content_id,
            timestamp_ms,
        })
    }

    /// Parse and validate an attestation from its JSON wire bytes.
    ///
    /// Unknown keys are rejected. A missing `cacheable` key reads as `false`.
    pub fn from_json_bytes(bytes: &[u8]) -> Result<Self, AttestationError> {
        serde_json::from_slice(bytes).map_err(|e| AttestationError::Malformed(e.to_string()))
    }

    /// Canonical byte encoding that discovery nodes sign.
    pub fn canonical_bytes(&self) -> Result<Vec<u8>, AttestationError> {
        serde_json::to_vec(self).map_err(|e| AttestationError::Malformed(e.to_string()))
    }

    /// Content identifier this attestation grants access to
    pub fn cid(&self) -> &str {
        &self.cid
    }

    /// Logical entity (for example a track) the CID belongs to
    pub fn content_id(&self) -> u64 {
        self.content_id
    }

    /// Signer-side wall-clock time at signing, milliseconds since epoch
    pub fn timestamp_ms(&self) -> u64 {
        self.timestamp_ms
    }

    /// Signer's hint that a positive decision for this grant may be memoized
    pub fn cacheable(&self) -> bool {
        self.cacheable
    }
}

fn validate_cid(cid: &str) -> Result<(), AttestationError> {
    if cid.is_empty() {
        return Err(AttestationError::EmptyCid);
    }
    if cid.len() > MAX_CID_LEN {
        return Err(AttestationError::CidTooLong {
            len: cid.len(),
            max: MAX_CID_LEN,
        });
    }
    if cid.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(AttestationError::InvalidCidCharacter);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_encoding_sorts_keys() {
        let att = SignedAttestation::new("Qm1", 42, 1_700_000_000_000, true).unwrap();
        let bytes = att.canonical_bytes().unwrap();
        assert_eq!(
            std::str::from_utf8(&bytes).unwrap(),
            r#"{"cacheable":true,"cid":"Qm1","content_id":42,"timestamp":1700000000000}"#
        );
    }

    #[test]
    fn parses_wire_json_in_any_key_order() {
        let att = SignedAttestation::from_json_bytes(
            br#"{"timestamp":5,"cid":"QmX","content_id":7,"cacheable":false}"#,
        )
        .unwrap();
        assert_eq!(att.cid(), "QmX");
        assert_eq!(att.content_id(), 7);
        assert_eq!(att.timestamp_ms(), 5);
        assert!(!att.cacheable());
    }

    #[test]
    fn missing_cacheable_defaults_to_false() {
        let att =
            SignedAttestation::from_json_bytes(br#"{"cid":"QmX","content_id":7,"timestamp":5}"#)
                .unwrap();
        assert!(!att.cacheable());
    }

    #[test]
    fn rejects_unknown_fields() {
        let err = SignedAttestation::from_json_bytes(
            br#"{"cid":"QmX","content_id":7,"timestamp":5,"admin":true}"#,
        )
        .unwrap_err();
        assert!(matches!(err, AttestationError::Malformed(_)));
    }

    #[test]
    fn rejects_invalid_cids() {
        assert_eq!(
            SignedAttestation::new("", 1, 1, false).unwrap_err(),
            AttestationError::EmptyCid
        );
        assert_eq!(
            SignedAttestation::new("Qm 1", 1, 1, false).unwrap_err(),
            AttestationError::InvalidCidCharacter
        );
        assert!(matches!(
            SignedAttestation::new("a".repeat(MAX_CID_LEN + 1), 1, 1, false).unwrap_err(),
            AttestationError::CidTooLong { .. }
        ));
    }

    #[test]
    fn validation_applies_to_wire_input() {
        let err =
            SignedAttestation::from_json_bytes(br#"{"cid":"","content_id":7,"timestamp":5}"#)
                .unwrap_err();
        assert!(matches!(err, AttestationError::Malformed(_)));
    }

    #[test]
    fn rejects_zero_timestamp_and_negative_ids() {
        assert_eq!(
            SignedAttestation::new("Qm1", 1, 0, false).unwrap_err(),
            AttestationError::ZeroTimestamp
        );
        assert!(SignedAttestation::from_json_bytes(
            br#"{"cid":"Qm1","content_id":-1,"timestamp":5}"#
        )
        .is_err());
    }
}
