//! Access decision returned for every content request

use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a content request was denied.
///
/// The HTTP layer maps each kind to a response so clients can tell a retryable
/// infrastructure condition apart from a genuine authorization denial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialKind {
    /// The signature is not a well-formed recoverable signature
    MalformedSignature,
    /// The attestation payload failed to parse or validate
    MalformedAttestation,
    /// The recovered signer is not a registered discovery node
    UntrustedSigner,
    /// The node registry could not be consulted and no snapshot exists
    RegistryUnavailable,
    /// The attested CID differs from the requested CID
    CidMismatch,
    /// The attestation is older than the freshness window
    ExpiredAttestation,
    /// The CID or its content id is blacklisted, or the blacklist was unreachable
    ContentBlocked,
}

impl DenialKind {
    /// Whether the denial reflects a transient infrastructure condition, so the
    /// same request may succeed if retried.
    ///
    /// Only `RegistryUnavailable` qualifies. `ContentBlocked` is permanent for
    /// clients even when it came from an unreachable blacklist.
    pub fn is_retryable(self) -> bool {
        matches!(self, Self::RegistryUnavailable)
    }

    /// Suggested HTTP status for the surrounding service
    pub fn suggested_status(self) -> u16 {
        match self {
            Self::MalformedSignature | Self::MalformedAttestation => 400,
            Self::UntrustedSigner => 401,
            Self::CidMismatch | Self::ExpiredAttestation | Self::ContentBlocked => 403,
            Self::RegistryUnavailable => 503,
        }
    }

    /// Stable snake_case name, identical to the serialized form
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MalformedSignature => "malformed_signature",
            Self::MalformedAttestation => "malformed_attestation",
            Self::UntrustedSigner => "untrusted_signer",
            Self::RegistryUnavailable => "registry_unavailable",
            Self::CidMismatch => "cid_mismatch",
            Self::ExpiredAttestation => "expired_attestation",
            Self::ContentBlocked => "content_blocked",
        }
    }
}

impl fmt::Display for DenialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a single authorization call.
///
/// `should_cache` tells the caller whether this exact decision may be memoized
/// for later requests bearing the identical attestation and signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum AccessDecision {
    /// The requester may receive the content
    Authorized {
        /// Logical entity the served CID belongs to
        content_id: u64,
        /// Taken from the signer's `cacheable` hint
        should_cache: bool,
    },
    /// The request is refused
    Denied {
        /// Reason for the refusal
        error_kind: DenialKind,
        /// Whether the denial may be memoized
        should_cache: bool,
    },
}

impl AccessDecision {
    /// Positive decision; cacheability comes from the signer's hint
    pub fn authorized(content_id: u64, should_cache: bool) -> Self {
        Self::Authorized {
            content_id,
            should_cache,
        }
    }

    /// Denial. Every denial is non-cacheable.
    pub fn denied(error_kind: DenialKind) -> Self {
        Self::Denied {
            error_kind,
            should_cache: false,
        }
    }

    /// Whether access was granted
    pub fn is_authorized(&self) -> bool {
        matches!(self, Self::Authorized { .. })
    }

    /// Whether the caller may memoize this decision
    pub fn should_cache(&self) -> bool {
        match self {
            Self::Authorized { should_cache, .. } | Self::Denied { should_cache, .. } => {
                *should_cache
            }
        }
    }

    /// Denial reason, if denied
    pub fn denial_kind(&self) -> Option<DenialKind> {
        match self {
            Self::Denied { error_kind, .. } => Some(*error_kind),
            Self::Authorized { .. } => None,
        }
    }

    /// Authorized content id, if authorized
    pub fn content_id(&self) -> Option<u64> {
        match self {
            Self::Authorized { content_id, .. } => Some(*content_id),
            Self::Denied { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn denials_are_never_cacheable() {
        for kind in [
            DenialKind::MalformedSignature,
            DenialKind::MalformedAttestation,
            DenialKind::UntrustedSigner,
            DenialKind::RegistryUnavailable,
            DenialKind::CidMismatch,
            DenialKind::ExpiredAttestation,
            DenialKind::ContentBlocked,
        ] {
            let decision = AccessDecision::denied(kind);
            assert!(!decision.should_cache());
            assert_eq!(decision.denial_kind(), Some(kind));
            assert_eq!(decision.content_id(), None);
        }
    }

    #[test]
    fn registry_unavailable_is_distinguishable_from_denial() {
        assert_eq!(DenialKind::RegistryUnavailable.suggested_status(), 503);
        assert_eq!(DenialKind::ContentBlocked.suggested_status(), 403);
        assert!(DenialKind::RegistryUnavailable.is_retryable());
        assert!(!DenialKind::CidMismatch.is_retryable());
        assert!(!DenialKind::ExpiredAttestation.is_retryable());
    }

    #[test]
    fn only_registry_outage_is_retryable() {
        let retryable: Vec<_> = [
            DenialKind::MalformedSignature,
            DenialKind::MalformedAttestation,
            DenialKind::UntrustedSigner,
            DenialKind::RegistryUnavailable,
            DenialKind::CidMismatch,
            DenialKind::ExpiredAttestation,
            DenialKind::ContentBlocked,
        ]
        .into_iter()
        .filter(|kind| kind.is_retryable())
        .collect();
        assert_eq!(retryable, vec![DenialKind::RegistryUnavailable]);
    }

    #[test]
    fn serializes_with_stable_shape() {
        let json = serde_json::to_value(AccessDecision::authorized(42, true)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"decision": "authorized", "content_id": 42, "should_cache": true})
        );

        let json = serde_json::to_value(AccessDecision::denied(DenialKind::CidMismatch)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"decision": "denied", "error_kind": "cid_mismatch", "should_cache": false})
        );
    }

    #[test]
    fn display_matches_serialized_name() {
        let kind = DenialKind::ExpiredAttestation;
        assert_eq!(
            serde_json::to_string(&kind).unwrap(),
            format!("\"{kind}\"")
        );
    }
}
