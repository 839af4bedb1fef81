//! Signature error taxonomy

/// Why a signature could not yield a signer
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignatureError {
    /// Signature is not exactly 65 bytes
    #[error("signature must be {expected} bytes, got {actual}")]
    InvalidLength {
        /// Required length
        expected: usize,
        /// Length received
        actual: usize,
    },

    /// Hex text did not decode
    #[error("not valid hex")]
    InvalidHex,

    /// `v` is not one of 0, 1, 27, 28
    #[error("invalid recovery byte {0}")]
    InvalidRecoveryByte(u8),

    /// `r` or `s` is zero or not below the curve order
    #[error("signature scalar out of range")]
    InvalidScalar,

    /// No public key corresponds to this signature and digest
    #[error("public key could not be recovered")]
    Unrecoverable,

    /// Payload exceeds the hashing bound
    #[error("payload is {len} bytes, limit is {max}")]
    PayloadTooLarge {
        /// Payload length
        len: usize,
        /// Allowed maximum
        max: usize,
    },

    /// Secret key material was rejected or signing failed
    #[error("signing failed: {0}")]
    Signing(String),
}
