//! Authorization pipeline

use crate::{AuthorizerConfig, BlacklistGate, BlacklistOutcome, FreshnessGuard};
use std::sync::Arc;
use ward_core::{
    AccessDecision, Address, BlacklistStore, DenialKind, PhysicalTimeEffects, RegistrySource,
    SignedAttestation,
};
use ward_registry::{NodeRegistryCache, RegistryError};
use ward_signature::{
    RecoverableSignature, SignatureError, SignatureVerifier, MAX_PAYLOAD_LEN,
};

/// Stateless-per-call authorizer for content requests.
///
/// Holds no mutable state of its own; all memoization lives in the registry
/// cache. Safe to share across tasks behind an `Arc`.
pub struct AccessAuthorizer {
    verifier: SignatureVerifier,
    freshness: FreshnessGuard,
    registry: Arc<NodeRegistryCache>,
    blacklist: BlacklistGate,
    clock: Arc<dyn PhysicalTimeEffects>,
}

impl AccessAuthorizer {
    /// Build an authorizer around an existing registry cache
    pub fn new(
        config: &AuthorizerConfig,
        registry: Arc<NodeRegistryCache>,
        blacklist: Arc<dyn BlacklistStore>,
        clock: Arc<dyn PhysicalTimeEffects>,
    ) -> Self {
        Self {
            verifier: SignatureVerifier::new(config.digest_scheme),
            freshness: FreshnessGuard::new(config.max_attestation_age_ms),
            registry,
            blacklist: BlacklistGate::new(blacklist, config.blacklist.query_timeout()),
            clock,
        }
    }

    /// Build an authorizer with its own registry cache over `source`
    pub fn from_sources(
        config: &AuthorizerConfig,
        source: Arc<dyn RegistrySource>,
        blacklist: Arc<dyn BlacklistStore>,
        clock: Arc<dyn PhysicalTimeEffects>,
    ) -> Self {
        let registry = Arc::new(NodeRegistryCache::new(
            source,
            clock.clone(),
            config.registry.clone(),
        ));
        Self::new(config, registry, blacklist, clock)
    }

    /// Shared registry cache, for health reporting or a background refresher
    pub fn registry(&self) -> &Arc<NodeRegistryCache> {
        &self.registry
    }

    /// Freshness window in force
    pub fn freshness(&self) -> FreshnessGuard {
        self.freshness
    }

    /// Current time as seen by this authorizer
    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    /// Decide a request carrying an already-parsed attestation.
    ///
    /// The signature is checked against the canonical encoding of
    /// `attestation`.
    pub async fn authorize(
        &self,
        requested_cid: &str,
        attestation: &SignedAttestation,
        signature: &[u8],
    ) -> AccessDecision {
        let signature = match parse_signature(signature) {
            Ok(signature) => signature,
            Err(kind) => return AccessDecision::denied(kind),
        };
        let payload = match attestation.canonical_bytes() {
            Ok(payload) => payload,
            Err(error) => {
                tracing::debug!(%error, "attestation has no canonical encoding");
                return AccessDecision::denied(DenialKind::MalformedAttestation);
            }
        };
        self.decide(requested_cid, attestation, &payload, &signature)
            .await
    }

    /// Decide a request exactly as it arrived on the wire.
    ///
    /// `attestation_bytes` is parsed into a [`SignedAttestation`] and the
    /// signature is checked against those bytes as received.
    pub async fn authorize_raw(
        &self,
        requested_cid: &str,
        attestation_bytes: &[u8],
        signature: &[u8],
    ) -> AccessDecision {
        let signature = match parse_signature(signature) {
            Ok(signature) => signature,
            Err(kind) => return AccessDecision::denied(kind),
        };
        if attestation_bytes.len() > MAX_PAYLOAD_LEN {
            tracing::debug!(
                len = attestation_bytes.len(),
                max = MAX_PAYLOAD_LEN,
                "attestation payload too large"
            );
            return AccessDecision::denied(DenialKind::MalformedAttestation);
        }
        let attestation = match SignedAttestation::from_json_bytes(attestation_bytes) {
            Ok(attestation) => attestation,
            Err(error) => {
                tracing::debug!(%error, "rejecting malformed attestation");
                return AccessDecision::denied(DenialKind::MalformedAttestation);
            }
        };
        self.decide(requested_cid, &attestation, attestation_bytes, &signature)
            .await
    }

    async fn decide(
        &self,
        requested_cid: &str,
        attestation: &SignedAttestation,
        payload: &[u8],
        signature: &RecoverableSignature,
    ) -> AccessDecision {
        let signer = match self.verifier.recover_signer(payload, signature) {
            Ok(signer) => signer,
            Err(error) => {
                tracing::debug!(%error, "signer recovery failed");
                return AccessDecision::denied(match error {
                    SignatureError::PayloadTooLarge { .. } => DenialKind::MalformedAttestation,
                    _ => DenialKind::MalformedSignature,
                });
            }
        };

        if attestation.cid() != requested_cid {
            tracing::debug!(
                requested_cid,
                attested_cid = attestation.cid(),
                %signer,
                "attested cid does not match request"
            );
            return AccessDecision::denied(DenialKind::CidMismatch);
        }

        let now_ms = self.clock.now_ms();
        if self.freshness.is_expired(attestation.timestamp_ms(), now_ms) {
            tracing::debug!(
                cid = requested_cid,
                %signer,
                age_ms = now_ms.saturating_sub(attestation.timestamp_ms()),
                max_age_ms = self.freshness.max_age_ms(),
                "attestation expired"
            );
            return AccessDecision::denied(DenialKind::ExpiredAttestation);
        }

        if let Err(kind) = self.check_signer(&signer).await {
            return AccessDecision::denied(kind);
        }

        let content_id = attestation.content_id();
        match self.blacklist.check(requested_cid, content_id).await {
            BlacklistOutcome::Clear => {}
            outcome => {
                tracing::debug!(
                    cid = requested_cid,
                    content_id,
                    ?outcome,
                    "content blocked"
                );
                return AccessDecision::denied(DenialKind::ContentBlocked);
            }
        }

        tracing::info!(
            cid = requested_cid,
            content_id,
            %signer,
            cacheable = attestation.cacheable(),
            "content access authorized"
        );
        AccessDecision::authorized(content_id, attestation.cacheable())
    }

    async fn check_signer(&self, signer: &Address) -> Result<(), DenialKind> {
        match self.registry.is_registered_discovery_node(signer).await {
            Ok(true) => {
                tracing::debug!(%signer, "signer is a registered discovery node");
                Ok(())
            }
            Ok(false) => {
                tracing::debug!(%signer, "signer is not a registered discovery node");
                Err(DenialKind::UntrustedSigner)
            }
            Err(RegistryError::Unavailable(error)) => {
                tracing::warn!(%signer, %error, "node registry unavailable");
                Err(DenialKind::RegistryUnavailable)
            }
        }
    }
}

fn parse_signature(bytes: &[u8]) -> Result<RecoverableSignature, DenialKind> {
    RecoverableSignature::from_bytes(bytes).map_err(|error| {
        tracing::debug!(%error, len = bytes.len(), "rejecting malformed signature");
        DenialKind::MalformedSignature
    })
}

impl std::fmt::Debug for AccessAuthorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessAuthorizer")
            .field("verifier", &self.verifier)
            .field("freshness", &self.freshness)
            .field("registry", &self.registry)
            .field("blacklist", &self.blacklist)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use ward_testkit::{attestation, KeyTestFixture, ManualClock, MockBlacklistStore, MockRegistrySource};

    const T: u64 = 1_700_000_000_000;

    struct Harness {
        node: KeyTestFixture,
        registry: Arc<MockRegistrySource>,
        blacklist: Arc<MockBlacklistStore>,
        authorizer: AccessAuthorizer,
    }

    fn harness() -> Harness {
        let node = KeyTestFixture::from_seed(1);
        let registry = Arc::new(MockRegistrySource::with_wallets(&[node.address()]));
        let blacklist = Arc::new(MockBlacklistStore::new());
        let authorizer = AccessAuthorizer::from_sources(
            &AuthorizerConfig::default(),
            registry.clone(),
            blacklist.clone(),
            Arc::new(ManualClock::new(T + 1_000)),
        );
        Harness {
            node,
            registry,
            blacklist,
            authorizer,
        }
    }

    #[tokio::test]
    async fn raw_and_typed_paths_agree_on_canonical_bytes() {
        let h = harness();
        let att = attestation("Qm1", 42, T, true);
        let signed = h.node.sign(&att);

        let typed = h.authorizer.authorize("Qm1", &att, &signed.signature).await;
        let raw = h
            .authorizer
            .authorize_raw("Qm1", &signed.payload, &signed.signature)
            .await;
        assert_eq!(typed, AccessDecision::authorized(42, true));
        assert_eq!(raw, typed);
    }

    #[tokio::test]
    async fn raw_path_verifies_bytes_as_received() {
        let h = harness();
        let wire = br#"{ "cid": "Qm1", "content_id": 42, "timestamp": 1700000000000, "cacheable": false }"#;
        let signed = h.node.sign_bytes(wire);

        let decision = h.authorizer.authorize_raw("Qm1", wire, &signed.signature).await;
        assert_eq!(decision, AccessDecision::authorized(42, false));

        // The same signature does not cover the canonical re-encoding.
        let att = SignedAttestation::from_json_bytes(wire).unwrap();
        let typed = h.authorizer.authorize("Qm1", &att, &signed.signature).await;
        assert!(!typed.is_authorized());
    }

    #[tokio::test]
    async fn malformed_attestation_is_denied_without_io() {
        let h = harness();
        let signed = h.node.sign_bytes(b"not json");
        let decision = h
            .authorizer
            .authorize_raw("Qm1", b"not json", &signed.signature)
            .await;
        assert_matches!(
            decision,
            AccessDecision::Denied {
                error_kind: DenialKind::MalformedAttestation,
                should_cache: false
            }
        );
        assert_eq!(h.registry.call_count(), 0);
        assert_eq!(h.blacklist.call_count(), 0);
    }

    #[tokio::test]
    async fn oversized_payload_is_malformed_attestation() {
        let h = harness();
        let payload = vec![b' '; MAX_PAYLOAD_LEN + 1];
        let signed = h.node.sign_bytes(b"{}");
        let decision = h
            .authorizer
            .authorize_raw("Qm1", &payload, &signed.signature)
            .await;
        assert_eq!(decision.denial_kind(), Some(DenialKind::MalformedAttestation));
    }

    #[tokio::test]
    async fn blacklist_outage_fails_closed() {
        let h = harness();
        h.blacklist.set_failing(true);
        let att = attestation("Qm1", 42, T, true);
        let signed = h.node.sign(&att);
        let decision = h.authorizer.authorize("Qm1", &att, &signed.signature).await;
        assert_eq!(decision, AccessDecision::denied(DenialKind::ContentBlocked));
    }
}
