//! Property-based coverage: round trips hold for arbitrary seeds and
//! messages, and no single-bit tamper of any input survives verification.

use proptest::prelude::*;
use rand_chacha::ChaCha20Rng;
use rand_core::SeedableRng;
use sr25519::{verify_message, ExpandMode, MiniSecretKey, ProtocolVersion};

fn sign_with(
    seed: [u8; 32],
    entropy: [u8; 32],
    version: ProtocolVersion,
    message: &[u8],
) -> ([u8; 32], [u8; 64]) {
    let keypair = MiniSecretKey::from_bytes(&seed)
        .unwrap()
        .expand_to_keypair(version.expand_mode());
    let mut rng = ChaCha20Rng::from_seed(entropy);
    let signature = keypair
        .sign_simple(version, b"substrate", message, &mut rng)
        .to_bytes(version);
    (keypair.public.to_bytes(), signature)
}

proptest! {
    #[test]
    fn round_trip_holds_for_any_seed_and_message(
        seed in prop::array::uniform32(any::<u8>()),
        entropy in prop::array::uniform32(any::<u8>()),
        message in prop::collection::vec(any::<u8>(), 10..200),
    ) {
        for version in [ProtocolVersion::V1, ProtocolVersion::V2] {
            let (public, signature) = sign_with(seed, entropy, version, &message);
            prop_assert_eq!(
                verify_message(version, &signature, &public, &message),
                Ok(true)
            );
        }
    }

    #[test]
    fn single_bit_tamper_rejects(
        seed in prop::array::uniform32(any::<u8>()),
        entropy in prop::array::uniform32(any::<u8>()),
        message in prop::collection::vec(any::<u8>(), 10..64),
        sig_bit in 0usize..512,
        msg_bit_seed in any::<usize>(),
    ) {
        let version = ProtocolVersion::V2;
        let (public, signature) = sign_with(seed, entropy, version, &message);

        let mut tampered_signature = signature;
        tampered_signature[sig_bit / 8] ^= 1 << (sig_bit % 8);
        prop_assert_eq!(
            verify_message(version, &tampered_signature, &public, &message),
            Ok(false)
        );

        let msg_bit = msg_bit_seed % (message.len() * 8);
        let mut tampered_message = message.clone();
        tampered_message[msg_bit / 8] ^= 1 << (msg_bit % 8);
        prop_assert_eq!(
            verify_message(version, &signature, &public, &tampered_message),
            Ok(false)
        );
    }

    #[test]
    fn expansion_is_a_pure_function(
        seed in prop::array::uniform32(any::<u8>()),
    ) {
        let mini = MiniSecretKey::from_bytes(&seed).unwrap();
        for mode in [ExpandMode::Ed25519, ExpandMode::Uniform] {
            prop_assert_eq!(
                mini.expand(mode).to_bytes(),
                mini.expand(mode).to_bytes()
            );
            prop_assert_eq!(
                mini.expand_to_keypair(mode).public.to_bytes(),
                mini.expand(mode).to_public().to_bytes()
            );
        }
    }

    #[test]
    fn distinct_keys_reject_each_others_signatures(
        seed_a in prop::array::uniform32(any::<u8>()),
        seed_b in prop::array::uniform32(any::<u8>()),
        entropy in prop::array::uniform32(any::<u8>()),
        message in prop::collection::vec(any::<u8>(), 10..64),
    ) {
        prop_assume!(seed_a != seed_b);
        let version = ProtocolVersion::V2;
        let (public_a, signature) = sign_with(seed_a, entropy, version, &message);
        let (public_b, _) = sign_with(seed_b, entropy, version, &message);
        prop_assert_eq!(verify_message(version, &signature, &public_a, &message), Ok(true));
        prop_assert_eq!(verify_message(version, &signature, &public_b, &message), Ok(false));
    }
}
