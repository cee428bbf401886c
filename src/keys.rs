//! Key material: seeds, expanded secret keys, public keys, keypairs.
//!
//! A 32-byte seed ([`MiniSecretKey`]) expands by one of two modes into a
//! [`SecretKey`], a signing scalar plus a 32-byte nonce seed, and the
//! public key is always the fixed-base multiple of the signing scalar.
//! Public keys follow an explicit two-stage pattern: the 32-byte wire form
//! is decoded fallibly, once, into a value that carries both the validated
//! group element and its canonical compression.

use core::fmt;

use curve25519_dalek::ristretto::{CompressedRistretto, RistrettoPoint};
use curve25519_dalek::scalar::Scalar;
use merlin::Transcript;
use rand_core::{CryptoRng, RngCore};
use sha2::{Digest, Sha512};
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::constants::{
    EXPAND_SECRET_KEYS_LABEL, KEYPAIR_LENGTH, MINI_SECRET_KEY_LENGTH, NONCE_SEED_LENGTH,
    PUBLIC_KEY_LENGTH, SECRET_KEY_LENGTH,
};
use crate::errors::SignatureError;
use crate::scalars;

/// How a seed is expanded into a (signing scalar, nonce seed) pair.
///
/// Both modes feed the same downstream representation; the choice only
/// matters for interoperating with keys derived elsewhere.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ExpandMode {
    /// SHA-512 of the seed with Ed25519 clamping and cofactor division,
    /// as paired with the v1-era protocol.
    Ed25519,
    /// Transcript-based uniform expansion, as paired with the v2 protocol.
    Uniform,
}

/// A 32-byte seed, the root secret of a keypair.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct MiniSecretKey([u8; MINI_SECRET_KEY_LENGTH]);

impl MiniSecretKey {
    /// Draw a fresh seed from the supplied CSPRNG.
    pub fn generate<R>(rng: &mut R) -> Self
    where
        R: RngCore + CryptoRng,
    {
        let mut seed = [0u8; MINI_SECRET_KEY_LENGTH];
        rng.fill_bytes(&mut seed);
        Self(seed)
    }

    /// Wrap exactly 32 seed bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SignatureError> {
        if bytes.len() != MINI_SECRET_KEY_LENGTH {
            return Err(SignatureError::InvalidLength {
                expected: MINI_SECRET_KEY_LENGTH,
                got: bytes.len(),
            });
        }
        let mut seed = [0u8; MINI_SECRET_KEY_LENGTH];
        seed.copy_from_slice(bytes);
        Ok(Self(seed))
    }

    /// The raw seed bytes.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; MINI_SECRET_KEY_LENGTH] {
        self.0
    }

    /// Expand into a signing key with the given mode.
    #[must_use]
    pub fn expand(&self, mode: ExpandMode) -> SecretKey {
        match mode {
            ExpandMode::Ed25519 => self.expand_ed25519(),
            ExpandMode::Uniform => self.expand_uniform(),
        }
    }

    /// Expand and derive the matching public key in one step.
    #[must_use]
    pub fn expand_to_keypair(&self, mode: ExpandMode) -> Keypair {
        Keypair::from_secret(self.expand(mode))
    }

    fn expand_ed25519(&self) -> SecretKey {
        let hash = Sha512::digest(self.0);
        let mut key_bytes = [0u8; 32];
        key_bytes.copy_from_slice(&hash[..32]);
        let key = scalars::clamp_and_divide_cofactor(key_bytes);
        let mut nonce = [0u8; NONCE_SEED_LENGTH];
        nonce.copy_from_slice(&hash[32..]);
        SecretKey { key, nonce }
    }

    fn expand_uniform(&self) -> SecretKey {
        let mut t = Transcript::new(EXPAND_SECRET_KEYS_LABEL);
        t.append_message(b"mini", &self.0);
        let mut scalar_bytes = [0u8; 64];
        t.challenge_bytes(b"sk", &mut scalar_bytes);
        let key = Scalar::from_bytes_mod_order_wide(&scalar_bytes);
        let mut nonce = [0u8; NONCE_SEED_LENGTH];
        t.challenge_bytes(b"no", &mut nonce);
        SecretKey { key, nonce }
    }
}

impl fmt::Debug for MiniSecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MiniSecretKey(<secret seed>)")
    }
}

/// An expanded signing key: the signing scalar plus the nonce seed that
/// feeds per-signature witness derivation.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretKey {
    pub(crate) key: Scalar,
    pub(crate) nonce: [u8; NONCE_SEED_LENGTH],
}

impl SecretKey {
    /// Decode the 64-byte wire form: signing scalar followed by nonce seed.
    ///
    /// The scalar half is interpreted mod `l`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SignatureError> {
        if bytes.len() != SECRET_KEY_LENGTH {
            return Err(SignatureError::InvalidLength {
                expected: SECRET_KEY_LENGTH,
                got: bytes.len(),
            });
        }
        let mut key_bytes = [0u8; 32];
        key_bytes.copy_from_slice(&bytes[..32]);
        let mut nonce = [0u8; NONCE_SEED_LENGTH];
        nonce.copy_from_slice(&bytes[32..]);
        Ok(Self {
            key: Scalar::from_bytes_mod_order(key_bytes),
            nonce,
        })
    }

    /// Encode as signing scalar followed by nonce seed.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; SECRET_KEY_LENGTH] {
        let mut bytes = [0u8; SECRET_KEY_LENGTH];
        bytes[..32].copy_from_slice(self.key.as_bytes());
        bytes[32..].copy_from_slice(&self.nonce);
        bytes
    }

    /// Decode the Ed25519-expanded layout, where the scalar half carries the
    /// cofactor-multiplied form used by Substrate keystores.
    pub fn from_ed25519_bytes(bytes: &[u8]) -> Result<Self, SignatureError> {
        if bytes.len() != SECRET_KEY_LENGTH {
            return Err(SignatureError::InvalidLength {
                expected: SECRET_KEY_LENGTH,
                got: bytes.len(),
            });
        }
        let mut key_bytes = [0u8; 32];
        key_bytes.copy_from_slice(&bytes[..32]);
        scalars::divide_scalar_bytes_by_cofactor(&mut key_bytes);
        let mut nonce = [0u8; NONCE_SEED_LENGTH];
        nonce.copy_from_slice(&bytes[32..]);
        Ok(Self {
            key: Scalar::from_bytes_mod_order(key_bytes),
            nonce,
        })
    }

    /// Encode into the Ed25519-expanded layout.
    #[must_use]
    pub fn to_ed25519_bytes(&self) -> [u8; SECRET_KEY_LENGTH] {
        let mut bytes = [0u8; SECRET_KEY_LENGTH];
        let mut key_bytes = self.key.to_bytes();
        scalars::multiply_scalar_bytes_by_cofactor(&mut key_bytes);
        bytes[..32].copy_from_slice(&key_bytes);
        bytes[32..].copy_from_slice(&self.nonce);
        bytes
    }

    /// Derive the public key by fixed-base multiplication.
    #[must_use]
    pub fn to_public(&self) -> PublicKey {
        PublicKey::from_point(RistrettoPoint::mul_base(&self.key))
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(<signing scalar and nonce seed>)")
    }
}

/// A validated public key: the decompressed group element together with its
/// canonical compression, fixed at construction.
#[derive(Clone, Copy)]
pub struct PublicKey {
    point: RistrettoPoint,
    compressed: CompressedRistretto,
}

impl PublicKey {
    /// Decode and validate 32 bytes of compressed-point wire form.
    ///
    /// Rejects non-canonical encodings and bytes that do not name a group
    /// element.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SignatureError> {
        if bytes.len() != PUBLIC_KEY_LENGTH {
            return Err(SignatureError::InvalidLength {
                expected: PUBLIC_KEY_LENGTH,
                got: bytes.len(),
            });
        }
        let mut compressed_bytes = [0u8; PUBLIC_KEY_LENGTH];
        compressed_bytes.copy_from_slice(bytes);
        let compressed = CompressedRistretto(compressed_bytes);
        let point = compressed
            .decompress()
            .ok_or(SignatureError::InvalidPointEncoding)?;
        Ok(Self { point, compressed })
    }

    /// Wrap an already-validated group element.
    #[must_use]
    pub fn from_point(point: RistrettoPoint) -> Self {
        Self {
            point,
            compressed: point.compress(),
        }
    }

    /// The canonical 32-byte wire form.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; PUBLIC_KEY_LENGTH] {
        self.compressed.to_bytes()
    }

    /// The canonical compression.
    #[must_use]
    pub fn as_compressed(&self) -> &CompressedRistretto {
        &self.compressed
    }

    pub(crate) fn as_point(&self) -> &RistrettoPoint {
        &self.point
    }
}

// Group-element equality is equality of canonical compressions; comparing
// decompressed coordinates would distinguish representations of the same
// element.
impl PartialEq for PublicKey {
    fn eq(&self, other: &Self) -> bool {
        bool::from(self.compressed.as_bytes().ct_eq(other.compressed.as_bytes()))
    }
}

impl Eq for PublicKey {}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PublicKey").field(&self.compressed).finish()
    }
}

/// A signing key with its public half.
#[derive(Clone, Debug)]
pub struct Keypair {
    /// The expanded secret key.
    pub secret: SecretKey,
    /// The matching public key.
    pub public: PublicKey,
}

impl Keypair {
    /// Generate a fresh keypair from an injected CSPRNG.
    pub fn generate<R>(mode: ExpandMode, rng: &mut R) -> Self
    where
        R: RngCore + CryptoRng,
    {
        MiniSecretKey::generate(rng).expand_to_keypair(mode)
    }

    /// Pair a secret key with its derived public key.
    #[must_use]
    pub fn from_secret(secret: SecretKey) -> Self {
        let public = secret.to_public();
        Self { secret, public }
    }

    /// Decode the 96-byte wire form: secret key followed by public key.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SignatureError> {
        if bytes.len() != KEYPAIR_LENGTH {
            return Err(SignatureError::InvalidLength {
                expected: KEYPAIR_LENGTH,
                got: bytes.len(),
            });
        }
        let secret = SecretKey::from_bytes(&bytes[..SECRET_KEY_LENGTH])?;
        let public = PublicKey::from_bytes(&bytes[SECRET_KEY_LENGTH..])?;
        Ok(Self { secret, public })
    }

    /// Encode as secret key followed by public key.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; KEYPAIR_LENGTH] {
        let mut bytes = [0u8; KEYPAIR_LENGTH];
        bytes[..SECRET_KEY_LENGTH].copy_from_slice(&self.secret.to_bytes());
        bytes[SECRET_KEY_LENGTH..].copy_from_slice(&self.public.to_bytes());
        bytes
    }
}
