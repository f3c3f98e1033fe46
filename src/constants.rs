// -*- mode: rust; -*-
//
// This file is part of ecvrf-dalek.
// See LICENSE for licensing information.

//! Precomputed field constants for the Elligator 2 map and the
//! Edwards/Montgomery birational correspondence.
//!
//! The Elligator constants can all be derived from `A = 486662` and
//! `sqrt(-1)`; [`crate::elligator2::check_constants`] re-derives each one
//! and is exercised by the test suite.

use fiat_crypto::curve25519_64::fiat_25519_tight_field_element;

use crate::field::FieldElement;

/// `sqrt(-1) = 2^((p-1)/4) (mod p)`.
pub(crate) const SQRT_M1: FieldElement = FieldElement(fiat_25519_tight_field_element([
    1718705420411056,
    234908883556509,
    2233514472574048,
    2117202627021982,
    765476049583133,
]));

/// The Edwards curve constant `d = -121665/121666 (mod p)`, used to
/// recover the x-coordinate of a compressed point.
pub(crate) const EDWARDS_D: FieldElement = FieldElement(fiat_25519_tight_field_element([
    929955233495203,
    466365720129213,
    1662059464998953,
    2033849074728123,
    1442794654840575,
]));

/// The Montgomery curve constant `A = 486662`.
pub(crate) const MONTGOMERY_A: FieldElement =
    FieldElement(fiat_25519_tight_field_element([486662, 0, 0, 0, 0]));

/// `A^2`.
pub(crate) const MONTGOMERY_A_SQUARED: FieldElement =
    FieldElement(fiat_25519_tight_field_element([236839902244, 0, 0, 0, 0]));

/// `-A (mod p)`.
pub(crate) const MONTGOMERY_NEG_A: FieldElement = FieldElement(fiat_25519_tight_field_element([
    2251799813198567,
    2251799813685247,
    2251799813685247,
    2251799813685247,
    2251799813685247,
]));

/// `sqrt(-(A+2))`, the scaling constant of the birational map between
/// curve25519 and edwards25519 (RFC 7748 writes it `sqrt(-486664)`).
pub(crate) const MONTGOMERY_SQRT_NEG_A_PLUS_TWO: FieldElement =
    FieldElement(fiat_25519_tight_field_element([
        1693982333959686,
        608509411481997,
        2235573344831311,
        947681270984193,
        266558006233600,
    ]));

/// `u_factor = -2 * sqrt(-1)`.
pub(crate) const MONTGOMERY_U_FACTOR: FieldElement = FieldElement(fiat_25519_tight_field_element([
    1066188786548365,
    1781982046572228,
    36570682222399,
    269194373326530,
    720847714518980,
]));

/// `v_factor = sqrt(u_factor)`.
pub(crate) const MONTGOMERY_V_FACTOR: FieldElement = FieldElement(fiat_25519_tight_field_element([
    533094393274174,
    2016890930128738,
    18285341111199,
    134597186663265,
    1486323764102114,
]));

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn constants_serialize_to_reference_bytes() {
        // Known-good canonical encodings, cross-checked with Sage.
        for (constant, expected) in [
            (
                &SQRT_M1,
                "b0a00e4a271beec478e42fad0618432fa7d7fb3d99004d2b0bdfc14f8024832b",
            ),
            (
                &MONTGOMERY_NEG_A,
                "e792f8ffffffffffffffffffffffffffffffffffffffffffffffffffffffff7f",
            ),
            (
                &MONTGOMERY_SQRT_NEG_A_PLUS_TWO,
                "067e45ffaa046ecc821a7d4bd1d3a1c57e4ffc03dc087bd2bb06a060f4ed260f",
            ),
            (
                &MONTGOMERY_U_FACTOR,
                "8dbee26bb1c923760e37a0a5f2cf79a1b1500884cdfe65a9e9417c60ffb6f928",
            ),
            (
                &MONTGOMERY_V_FACTOR,
                "3e5ff1b5d8e4113b871bd052f9e7bcd0582804c266ffb2d4f4203eb07fdb7c54",
            ),
        ] {
            assert_eq!(hex::encode(constant.to_bytes()), expected);
        }
    }

    #[test]
    fn sqrt_m1_squares_to_minus_one() {
        assert_eq!(SQRT_M1.square(), FieldElement::MINUS_ONE);
    }

    #[test]
    fn edwards_d_satisfies_defining_ratio() {
        // d * 121666 = -121665 (mod p)
        let mut bytes = [0u8; 32];
        bytes[..3].copy_from_slice(&121666u32.to_le_bytes()[..3]);
        let k121666 = FieldElement::from_bytes(&bytes);
        bytes[..3].copy_from_slice(&121665u32.to_le_bytes()[..3]);
        let k121665 = FieldElement::from_bytes(&bytes);

        assert_eq!(&EDWARDS_D * &k121666, -&k121665);
    }

    #[test]
    fn montgomery_a_squared() {
        assert_eq!(&MONTGOMERY_A * &MONTGOMERY_A, MONTGOMERY_A_SQUARED);
    }
}
