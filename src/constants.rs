//! Wire lengths and transcript labels.
//!
//! The labels are consensus-normative: both deployed protocol revisions pin
//! the exact bytes below, and any change produces signatures no other
//! implementation will accept.

/// Length of a mini secret key (seed), in bytes.
pub const MINI_SECRET_KEY_LENGTH: usize = 32;

/// Length of an expanded secret key: signing scalar followed by nonce seed.
pub const SECRET_KEY_LENGTH: usize = 64;

/// Length of the nonce-seed half of an expanded secret key.
pub const NONCE_SEED_LENGTH: usize = 32;

/// Length of a compressed ristretto255 public key, in bytes.
pub const PUBLIC_KEY_LENGTH: usize = 32;

/// Length of a signature: compressed point `R` followed by scalar `s`.
pub const SIGNATURE_LENGTH: usize = 64;

/// Length of a keypair encoding: secret key followed by public key.
pub const KEYPAIR_LENGTH: usize = SECRET_KEY_LENGTH + PUBLIC_KEY_LENGTH;

/// Transcript protocol name, shared by both revisions.
pub const PROTO_NAME: &[u8] = b"Schnorr-sig";

/// Transcript label opening every signing context.
pub const SIGNING_CONTEXT_LABEL: &[u8] = b"SigningContext";

/// Transcript label for the uniform secret-key expansion.
pub const EXPAND_SECRET_KEYS_LABEL: &[u8] = b"ExpandSecretKeys";

/// Signing context used by Substrate-based chains.
pub const SUBSTRATE_CONTEXT: &[u8] = b"substrate";

/// Marker set on the top bit of the last signature byte by the v2 wire form.
pub(crate) const SIGNATURE_MARKER_BIT: u8 = 0b1000_0000;

/// The transcript labels a protocol revision threads through signing and
/// verification. `proto-name`/`Schnorr-sig` framing is common to both
/// revisions; everything else differs.
#[derive(Clone, Copy, Debug)]
pub(crate) struct TranscriptLabels {
    /// Label committing the signer's public key.
    pub public_key: &'static [u8],
    /// Label rekeying the witness (nonce) derivation with the nonce seed.
    pub witness: &'static [u8],
    /// Label committing the commitment point `R`.
    pub commitment: &'static [u8],
    /// Label drawing the challenge scalar.
    pub challenge: &'static [u8],
}

pub(crate) const V1_LABELS: TranscriptLabels = TranscriptLabels {
    public_key: b"pk",
    witness: b"",
    commitment: b"no",
    challenge: b"",
};

pub(crate) const V2_LABELS: TranscriptLabels = TranscriptLabels {
    public_key: b"sign:pk",
    witness: b"signing",
    commitment: b"sign:R",
    challenge: b"sign:c",
};
