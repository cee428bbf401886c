//! Version-aware signing and verification.
//!
//! One engine serves both deployed protocol revisions: the revision is an
//! explicit parameter that selects a transcript label set, the witness
//! derivation's rekey label, and the wire marker, so the group arithmetic is
//! never duplicated per version. The two revisions' witness orderings are
//! replicated independently and must stay asymmetric; reordering either one
//! changes signature bytes and breaks compatibility with deployed verifiers.

use curve25519_dalek::constants::RISTRETTO_BASEPOINT_POINT;
use curve25519_dalek::ristretto::{CompressedRistretto, RistrettoPoint};
use curve25519_dalek::scalar::Scalar;
use curve25519_dalek::traits::{IsIdentity, VartimeMultiscalarMul};
use merlin::Transcript;
use rand_core::{CryptoRng, RngCore};
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use crate::constants::{
    TranscriptLabels, PROTO_NAME, PUBLIC_KEY_LENGTH, SIGNATURE_LENGTH, SIGNATURE_MARKER_BIT,
    SUBSTRATE_CONTEXT, V1_LABELS, V2_LABELS,
};
use crate::errors::SignatureError;
use crate::keys::{ExpandMode, Keypair, PublicKey, SecretKey};
use crate::transcript::{signing_context, SigningTranscript};

/// The two deployed, wire-incompatible revisions of the scheme.
///
/// A signature made under one revision never verifies under the other: the
/// transcript labels differ, so the derived challenges differ.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ProtocolVersion {
    /// The schnorrkel 0.1.1-era protocol used by early networks.
    V1,
    /// The schnorrkel 0.9.1-era protocol used by current Substrate and
    /// Polkadot networks; its wire form carries a marker bit.
    V2,
}

impl ProtocolVersion {
    pub(crate) const fn labels(self) -> &'static TranscriptLabels {
        match self {
            Self::V1 => &V1_LABELS,
            Self::V2 => &V2_LABELS,
        }
    }

    pub(crate) const fn marks_signature(self) -> bool {
        matches!(self, Self::V2)
    }

    /// The seed-expansion mode historically paired with this revision.
    ///
    /// The pairing is conventional only: expansion changes which keys a seed
    /// produces, not the wire compatibility of signatures.
    #[must_use]
    pub const fn expand_mode(self) -> ExpandMode {
        match self {
            Self::V1 => ExpandMode::Ed25519,
            Self::V2 => ExpandMode::Uniform,
        }
    }
}

/// A Schnorr signature: commitment point `R` and response scalar `s`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Signature {
    pub(crate) r: CompressedRistretto,
    pub(crate) s: Scalar,
}

impl Signature {
    /// Decode a 64-byte signature.
    ///
    /// For [`ProtocolVersion::V2`] the marker bit must be set and is cleared
    /// before the scalar half is interpreted mod `l`. No further range check
    /// is applied to `s`; the verification equation is the arbiter.
    pub fn from_bytes(version: ProtocolVersion, bytes: &[u8]) -> Result<Self, SignatureError> {
        if bytes.len() != SIGNATURE_LENGTH {
            return Err(SignatureError::InvalidLength {
                expected: SIGNATURE_LENGTH,
                got: bytes.len(),
            });
        }
        let mut lower = [0u8; 32];
        let mut upper = [0u8; 32];
        lower.copy_from_slice(&bytes[..32]);
        upper.copy_from_slice(&bytes[32..]);
        if version.marks_signature() {
            if upper[31] & SIGNATURE_MARKER_BIT == 0 {
                return Err(SignatureError::UnmarkedSignature);
            }
            upper[31] &= !SIGNATURE_MARKER_BIT;
        }
        Ok(Self {
            r: CompressedRistretto(lower),
            s: Scalar::from_bytes_mod_order(upper),
        })
    }

    /// Encode as `R` followed by `s`, setting the marker bit for v2.
    #[must_use]
    pub fn to_bytes(&self, version: ProtocolVersion) -> [u8; SIGNATURE_LENGTH] {
        let mut bytes = [0u8; SIGNATURE_LENGTH];
        bytes[..32].copy_from_slice(self.r.as_bytes());
        bytes[32..].copy_from_slice(self.s.as_bytes());
        if version.marks_signature() {
            bytes[63] |= SIGNATURE_MARKER_BIT;
        }
        bytes
    }
}

impl SecretKey {
    /// Sign a prepared transcript.
    ///
    /// `rng` feeds the witness derivation; see
    /// [`SigningTranscript::witness_scalar`].
    pub fn sign<R>(
        &self,
        version: ProtocolVersion,
        mut t: Transcript,
        public: &PublicKey,
        rng: &mut R,
    ) -> Signature
    where
        R: RngCore + CryptoRng,
    {
        let labels = version.labels();
        t.proto_name(PROTO_NAME);
        t.commit_point(labels.public_key, public.as_compressed());
        let mut witness = t.witness_scalar(labels.witness, &[&self.nonce[..]], rng);
        let commitment = RistrettoPoint::mul_base(&witness).compress();
        t.commit_point(labels.commitment, &commitment);
        let challenge = t.challenge_scalar(labels.challenge);
        let s = challenge * self.key + witness;
        witness.zeroize();
        Signature { r: commitment, s }
    }
}

impl PublicKey {
    /// Verify a signature over a prepared transcript.
    ///
    /// Rejection carries no cause: a tampered message, a wrong version, an
    /// invalid `R` encoding, and a forged `s` all yield plain `false`.
    #[must_use]
    pub fn verify(&self, version: ProtocolVersion, mut t: Transcript, signature: &Signature) -> bool {
        let labels = version.labels();
        t.proto_name(PROTO_NAME);
        t.commit_point(labels.public_key, self.as_compressed());
        t.commit_point(labels.commitment, &signature.r);
        let challenge = t.challenge_scalar(labels.challenge);
        // s·B == R + k·A, compared through canonical compression: an R that
        // is not a canonical encoding can never match.
        let recomputed = RistrettoPoint::vartime_double_scalar_mul_basepoint(
            &challenge,
            &(-self.as_point()),
            &signature.s,
        );
        bool::from(
            recomputed
                .compress()
                .as_bytes()
                .ct_eq(signature.r.as_bytes()),
        )
    }

    /// Verify `signature` over `message` under `context`.
    #[must_use]
    pub fn verify_simple(
        &self,
        version: ProtocolVersion,
        context: &[u8],
        message: &[u8],
        signature: &Signature,
    ) -> bool {
        let t = signing_context(context).bytes(message);
        self.verify(version, t, signature)
    }
}

impl Keypair {
    /// Sign `message` under `context`.
    pub fn sign_simple<R>(
        &self,
        version: ProtocolVersion,
        context: &[u8],
        message: &[u8],
        rng: &mut R,
    ) -> Signature
    where
        R: RngCore + CryptoRng,
    {
        let t = signing_context(context).bytes(message);
        self.secret.sign(version, t, &self.public, rng)
    }
}

/// Sign `message` with a 64-byte wire-form secret key under the Substrate
/// signing context, returning signature wire bytes.
///
/// The public key is derived by fixed-base multiplication; only a malformed
/// secret-key length produces an error.
pub fn sign_message<R>(
    version: ProtocolVersion,
    secret_key: &[u8],
    message: &[u8],
    rng: &mut R,
) -> Result<[u8; SIGNATURE_LENGTH], SignatureError>
where
    R: RngCore + CryptoRng,
{
    let secret = SecretKey::from_bytes(secret_key)?;
    let public = secret.to_public();
    let t = signing_context(SUBSTRATE_CONTEXT).bytes(message);
    Ok(secret.sign(version, t, &public, rng).to_bytes(version))
}

/// Verify wire-form `signature` by `public_key` over `message` under the
/// Substrate signing context.
///
/// Errors only on malformed lengths. Every other failure (an invalid point
/// encoding, a missing v2 marker, a failed equation) is `Ok(false)`, with
/// no distinguishable cause.
pub fn verify_message(
    version: ProtocolVersion,
    signature: &[u8],
    public_key: &[u8],
    message: &[u8],
) -> Result<bool, SignatureError> {
    if signature.len() != SIGNATURE_LENGTH {
        return Err(SignatureError::InvalidLength {
            expected: SIGNATURE_LENGTH,
            got: signature.len(),
        });
    }
    if public_key.len() != PUBLIC_KEY_LENGTH {
        return Err(SignatureError::InvalidLength {
            expected: PUBLIC_KEY_LENGTH,
            got: public_key.len(),
        });
    }
    let Ok(signature) = Signature::from_bytes(version, signature) else {
        return Ok(false);
    };
    let Ok(public) = PublicKey::from_bytes(public_key) else {
        return Ok(false);
    };
    Ok(public.verify_simple(version, SUBSTRATE_CONTEXT, message, &signature))
}

/// Verify a batch of `(message, signature, public key)` triples of one
/// protocol revision under a shared context in a single multiscalar pass.
///
/// Each triple is weighted by a random 128-bit coefficient from `rng`, so an
/// accepting batch implies every member verifies individually except with
/// probability ~2^-128. Any undecodable `R` rejects the whole batch;
/// mismatched slice lengths fail fast.
pub fn verify_batch<R>(
    version: ProtocolVersion,
    context: &[u8],
    messages: &[&[u8]],
    signatures: &[Signature],
    public_keys: &[PublicKey],
    rng: &mut R,
) -> Result<bool, SignatureError>
where
    R: RngCore + CryptoRng,
{
    if messages.len() != signatures.len() || messages.len() != public_keys.len() {
        return Err(SignatureError::BatchSizeMismatch {
            messages: messages.len(),
            signatures: signatures.len(),
            public_keys: public_keys.len(),
        });
    }
    let labels = version.labels();
    let ctx = signing_context(context);

    let mut challenges = Vec::with_capacity(messages.len());
    let mut commitments = Vec::with_capacity(messages.len());
    for (message, (signature, public)) in messages.iter().zip(signatures.iter().zip(public_keys)) {
        let mut t = ctx.bytes(message);
        t.proto_name(PROTO_NAME);
        t.commit_point(labels.public_key, public.as_compressed());
        t.commit_point(labels.commitment, &signature.r);
        challenges.push(t.challenge_scalar(labels.challenge));
        match signature.r.decompress() {
            Some(point) => commitments.push(point),
            None => return Ok(false),
        }
    }

    let mut coefficients = Vec::with_capacity(messages.len());
    for _ in 0..messages.len() {
        let mut z = [0u8; 16];
        rng.fill_bytes(&mut z);
        coefficients.push(Scalar::from(u128::from_le_bytes(z)));
    }

    // sum_i z_i·(s_i·B − R_i − k_i·A_i) == identity.
    let basepoint_coefficient: Scalar = coefficients
        .iter()
        .zip(signatures)
        .map(|(z, signature)| z * signature.s)
        .sum();
    let scalars = core::iter::once(basepoint_coefficient)
        .chain(coefficients.iter().map(|z| -z))
        .chain(
            coefficients
                .iter()
                .zip(&challenges)
                .map(|(z, challenge)| -(z * challenge)),
        );
    let points = core::iter::once(RISTRETTO_BASEPOINT_POINT)
        .chain(commitments.iter().copied())
        .chain(public_keys.iter().map(|public| *public.as_point()));
    Ok(RistrettoPoint::vartime_multiscalar_mul(scalars, points).is_identity())
}
