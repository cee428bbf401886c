#![forbid(unsafe_code)]
#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::missing_const_for_fn
)]

//! sr25519: Schnorr signatures over the ristretto255 group.
//!
//! This crate implements the signature scheme used to authenticate accounts
//! and sign transactions on Substrate-based chains: Schnorr over the
//! prime-order ristretto255 group, with Fiat-Shamir challenges drawn from a
//! merlin transcript.
//!
//! Two deployed, wire-incompatible protocol revisions are supported and must
//! both remain available for network interoperability:
//!
//! - [`ProtocolVersion::V1`], the schnorrkel 0.1.1-era protocol used by
//!   early networks,
//! - [`ProtocolVersion::V2`], the schnorrkel 0.9.1-era protocol used by
//!   current Substrate/Polkadot networks, recognizable by the marker bit in
//!   its signature encoding.
//!
//! The revisions differ in transcript labels, in how the per-signature
//! nonce folds in the secret nonce seed, and in the wire marker; the version
//! is therefore an explicit parameter of signing, verification, and the
//! signature byte codec.
//!
//! ```
//! use rand_core::OsRng;
//! use sr25519::{Keypair, ProtocolVersion};
//!
//! let version = ProtocolVersion::V2;
//! let keypair = Keypair::generate(version.expand_mode(), &mut OsRng);
//! let message = b"a test of the tsunami alert system";
//! let signature = keypair.sign_simple(version, b"substrate", message, &mut OsRng);
//! assert!(keypair
//!     .public
//!     .verify_simple(version, b"substrate", message, &signature));
//! ```
//!
//! All operations are pure, synchronous functions over immutable values;
//! every random input is an injected `RngCore + CryptoRng`, never process
//! state. Secret material is zeroized on drop.

mod scalars;

pub mod constants;
pub mod errors;
pub mod keys;
pub mod sign;
pub mod transcript;

pub use errors::SignatureError;
pub use keys::{ExpandMode, Keypair, MiniSecretKey, PublicKey, SecretKey};
pub use sign::{sign_message, verify_batch, verify_message, ProtocolVersion, Signature};
pub use transcript::{signing_context, SigningContext, SigningTranscript};

/// Crate version, for diagnostics.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
