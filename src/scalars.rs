//! Scalar byte utilities for the cofactor-8 embedding.
//!
//! ristretto255 scalars are integers mod the prime group order `l`, and all
//! mod-`l` arithmetic lives in curve25519-dalek. What lives here is the one
//! byte-level operation dalek does not expose: shifting a 256-bit
//! little-endian value across the curve cofactor, which the classic Ed25519
//! key expansion needs to land its clamped scalar in the prime-order
//! subgroup's reduced representation.

use curve25519_dalek::scalar::Scalar;

/// Divide a 256-bit little-endian value by 8 in place.
///
/// Exact only when the low three bits are clear; the Ed25519 clamp
/// guarantees that for every caller.
pub(crate) fn divide_scalar_bytes_by_cofactor(scalar: &mut [u8; 32]) {
    let mut low = 0u8;
    for b in scalar.iter_mut().rev() {
        let carried = *b & 0b0000_0111;
        *b >>= 3;
        *b |= low;
        low = carried << 5;
    }
}

/// Multiply a 256-bit little-endian value by 8 in place, the inverse of
/// [`divide_scalar_bytes_by_cofactor`] for values below 2^253.
pub(crate) fn multiply_scalar_bytes_by_cofactor(scalar: &mut [u8; 32]) {
    let mut high = 0u8;
    for b in scalar.iter_mut() {
        let carried = *b & 0b1110_0000;
        *b <<= 3;
        *b |= high;
        high = carried >> 5;
    }
}

/// Ed25519-style scalar derivation: clear the low three bits, set bit 254,
/// clear bit 255, then divide by the cofactor.
///
/// The quotient is below 2^252 and therefore already fully reduced mod `l`.
pub(crate) fn clamp_and_divide_cofactor(mut bytes: [u8; 32]) -> Scalar {
    bytes[0] &= 0b1111_1000;
    bytes[31] &= 0b0011_1111;
    bytes[31] |= 0b0100_0000;
    debug_assert_eq!(
        bytes[0] & 0b0000_0111,
        0,
        "clamped scalar must be a multiple of the cofactor"
    );
    divide_scalar_bytes_by_cofactor(&mut bytes);
    Scalar::from_bytes_mod_order(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clamp(mut bytes: [u8; 32]) -> [u8; 32] {
        bytes[0] &= 0b1111_1000;
        bytes[31] &= 0b0011_1111;
        bytes[31] |= 0b0100_0000;
        bytes
    }

    #[test]
    fn cofactor_shifts_round_trip() {
        let mut bytes = [0u8; 32];
        for (i, b) in bytes.iter_mut().enumerate() {
            *b = u8::try_from(i).unwrap().wrapping_mul(37).wrapping_add(11);
        }
        let clamped = clamp(bytes);

        let mut shifted = clamped;
        divide_scalar_bytes_by_cofactor(&mut shifted);
        multiply_scalar_bytes_by_cofactor(&mut shifted);
        assert_eq!(shifted, clamped);
    }

    #[test]
    fn clamped_division_is_exact() {
        let seed_bytes = [0xA7u8; 32];
        let clamped = clamp(seed_bytes);
        let divided = clamp_and_divide_cofactor(seed_bytes);
        // 8 * (clamped / 8) == clamped, as reduced scalars.
        assert_eq!(
            divided * Scalar::from(8u64),
            Scalar::from_bytes_mod_order(clamped)
        );
    }

    #[test]
    fn divided_scalar_is_canonical() {
        let divided = clamp_and_divide_cofactor([0xFFu8; 32]);
        // The quotient fits in 252 bits, so its byte form round-trips
        // through the canonical decoder.
        let bytes = divided.to_bytes();
        assert_eq!(bytes[31] & 0b1111_0000, 0);
        assert_eq!(Scalar::from_bytes_mod_order(bytes), divided);
    }
}
