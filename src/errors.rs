use thiserror::Error;

/// Failures constructing keys, signatures, or batch inputs from raw bytes.
///
/// Verification rejection is deliberately not represented here: a signature
/// that fails to verify is an expected, frequent outcome and surfaces as
/// `false`, carrying no cause that could feed an oracle. Only malformed
/// inputs (wrong lengths, undecodable encodings) are errors, and they fail
/// fast at the byte boundary before any group arithmetic runs.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum SignatureError {
    #[error("invalid length: expected {expected} got {got}")]
    InvalidLength { expected: usize, got: usize },

    /// 32 bytes that are not the canonical encoding of a ristretto255 point.
    #[error("invalid ristretto point encoding")]
    InvalidPointEncoding,

    /// A v2 signature encoding without the schnorrkel marker bit set.
    #[error("signature bytes lack the v2 marker bit")]
    UnmarkedSignature,

    #[error("batch inputs differ in length: {messages} messages, {signatures} signatures, {public_keys} public keys")]
    BatchSizeMismatch {
        messages: usize,
        signatures: usize,
        public_keys: usize,
    },
}
