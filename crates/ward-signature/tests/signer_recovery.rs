//! Signature round-trip properties
//!
//! For any payload and any valid secret key, recovering the signer of a fresh
//! signature yields the key's own address, under either digest scheme.

use proptest::prelude::*;
use ward_core::SignedAttestation;
use ward_signature::{
    AttestationSigner, DigestScheme, RecoverableSignature, SignatureError, SignatureVerifier,
};

fn secret_key() -> impl Strategy<Value = [u8; 32]> {
    prop::array::uniform32(any::<u8>()).prop_filter("scalar out of range", |bytes| {
        AttestationSigner::from_secret_bytes(bytes, DigestScheme::Raw).is_ok()
    })
}

fn scheme() -> impl Strategy<Value = DigestScheme> {
    prop_oneof![Just(DigestScheme::Raw), Just(DigestScheme::PersonalMessage)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn recover_returns_signing_address(
        secret in prop::array::uniform32(1u8..),
        payload in prop::collection::vec(any::<u8>(), 0..512),
        scheme in scheme(),
    ) {
        let signer = match AttestationSigner::from_secret_bytes(&secret, scheme) {
            Ok(signer) => signer,
            Err(_) => return Ok(()),
        };
        let signed = signer.sign_payload(&payload).unwrap();
        let recovered = SignatureVerifier::new(scheme)
            .recover_signer_from_bytes(&payload, &signed.signature)
            .unwrap();
        prop_assert_eq!(recovered, signer.address());
    }

    #[test]
    fn recovery_is_deterministic(secret in secret_key(), payload in prop::collection::vec(any::<u8>(), 0..64)) {
        let signer = AttestationSigner::from_secret_bytes(&secret, DigestScheme::Raw).unwrap();
        let signed = signer.sign_payload(&payload).unwrap();
        let verifier = SignatureVerifier::default();
        let first = verifier.recover_signer_from_bytes(&payload, &signed.signature);
        let second = verifier.recover_signer_from_bytes(&payload, &signed.signature);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn arbitrary_bytes_never_panic(bytes in prop::collection::vec(any::<u8>(), 0..80)) {
        let verifier = SignatureVerifier::default();
        let _ = verifier.recover_signer_from_bytes(b"payload", &bytes);
    }
}

#[test]
fn attestation_signature_binds_every_field() {
    let signer = AttestationSigner::from_secret_bytes(&[0x42; 32], DigestScheme::Raw).unwrap();
    let original = SignedAttestation::new("Qm1", 42, 1_000, true).unwrap();
    let signed = signer.sign_attestation(&original).unwrap();
    let verifier = SignatureVerifier::default();

    let variants = [
        SignedAttestation::new("Qm2", 42, 1_000, true).unwrap(),
        SignedAttestation::new("Qm1", 43, 1_000, true).unwrap(),
        SignedAttestation::new("Qm1", 42, 1_001, true).unwrap(),
        SignedAttestation::new("Qm1", 42, 1_000, false).unwrap(),
    ];
    for variant in variants {
        let payload = variant.canonical_bytes().unwrap();
        let recovered = verifier.recover_signer_from_bytes(&payload, &signed.signature);
        assert_ne!(recovered, Ok(signer.address()), "variant {variant:?} verified");
    }
}

#[test]
fn truncated_signature_is_malformed() {
    let signer = AttestationSigner::from_secret_bytes(&[0x42; 32], DigestScheme::Raw).unwrap();
    let signed = signer.sign_payload(b"abc").unwrap();
    let err = RecoverableSignature::from_bytes(&signed.signature[..64]).unwrap_err();
    assert!(matches!(err, SignatureError::InvalidLength { actual: 64, .. }));
}
