// -*- mode: rust; -*-
//
// This file is part of ecvrf-dalek.
// See LICENSE for licensing information.

//! The Elligator 2 map for Curve25519.
//!
//! The map takes a field element to a point on the Montgomery curve
//! \\(v\^2 = u\^3 + A u\^2 + u\\), and from there to edwards25519 through
//! the birational correspondence.  It is defined on every input and is
//! constant time: both the square and nonsquare branches run the same
//! sequence of field operations, with the results combined by masked
//! selection.
//!
//! The operation ordering follows Loup Vaillant's formulation (the
//! reference implementation distributed with Monocypher), which folds the
//! inverse square root and the squareness test into a single
//! `sqrt_ratio_i` call.

use curve25519_dalek::edwards::{CompressedEdwardsY, EdwardsPoint};
use subtle::{ConditionallySelectable, ConstantTimeEq};

use crate::constants::{
    MONTGOMERY_A, MONTGOMERY_A_SQUARED, MONTGOMERY_NEG_A, MONTGOMERY_SQRT_NEG_A_PLUS_TWO,
    MONTGOMERY_U_FACTOR, MONTGOMERY_V_FACTOR, SQRT_M1,
};
use crate::errors::Error;
use crate::field::FieldElement;

/// Map a field element to a Montgomery `(u, v)` point.
pub(crate) fn montgomery_flavor(r: &FieldElement) -> (FieldElement, FieldElement) {
    let one = FieldElement::ONE;

    let mut t1 = r.square();
    t1 = &t1 + &t1; // 2r^2
    let u0 = &t1 + &one; // 1 + 2r^2
    let t2 = u0.square();

    // numerator: A(A^2 * 2r^2 - (1 + 2r^2)^2)
    let mut t3 = &MONTGOMERY_A_SQUARED * &t1;
    t3 = &t3 - &t2;
    t3 = &t3 * &MONTGOMERY_A;

    // denominator
    t1 = &(&t2 * &u0) * &t3;
    let (is_square, mut t1) = FieldElement::sqrt_ratio_i(&one, &t1);

    let mut u = &r.square() * &MONTGOMERY_U_FACTOR;
    let mut v = r * &MONTGOMERY_V_FACTOR;
    u.conditional_assign(&one, is_square);
    v.conditional_assign(&one, is_square);

    v = &(&v * &t3) * &t1;
    t1 = t1.square();

    u = &u * &MONTGOMERY_NEG_A;
    u = &u * &t3;
    u = &u * &t2;
    u = &u * &t1;

    let v_neg = -&v;
    v.conditional_assign(&v_neg, is_square ^ v.is_negative());

    (u, v)
}

/// Map a field element to an edwards25519 point.
pub(crate) fn edwards_flavor(r: &FieldElement) -> EdwardsPoint {
    let (u, v) = montgomery_flavor(r);
    let one = FieldElement::ONE;

    // Per RFC 7748: (x, y) = (sqrt(-(A+2))*u/v, (u-1)/(u+1))
    let mut x = &(&u * &v.invert()) * &MONTGOMERY_SQRT_NEG_A_PLUS_TWO;

    let u_minus_one = &u - &one;
    let u_plus_one = &u + &one;
    let u_plus_one_is_zero = u_plus_one.is_zero();
    let mut y = &u_minus_one * &u_plus_one.invert();

    // The map is undefined where either denominator vanishes; such inputs
    // MUST yield the identity (0, 1), selected without branching.
    let undefined = v.is_zero() | u_plus_one_is_zero;
    x.conditional_assign(&FieldElement::ZERO, undefined);
    y.conditional_assign(&one, undefined);

    edwards_from_xy(&x, &y)
}

/// Build an `EdwardsPoint` from affine coordinates known to satisfy the
/// curve equation, by way of the compressed encoding.
///
/// # Panics
///
/// Panics if `(x, y)` is not on the curve, which indicates a bug in the
/// caller rather than bad input.
pub(crate) fn edwards_from_xy(x: &FieldElement, y: &FieldElement) -> EdwardsPoint {
    let mut bytes = y.to_bytes();
    bytes[31] ^= x.is_negative().unwrap_u8() << 7;

    CompressedEdwardsY(bytes)
        .decompress()
        .expect("affine coordinates from the birational map are on the curve")
}

/// Re-derive every precomputed Elligator constant from `A` and `sqrt(-1)`
/// and compare against the shipped values in constant time.
///
/// A mismatch means the build is corrupt; callers should treat it as
/// fatal.  The crate's test suite runs this check, and embedders with
/// integrity requirements can invoke it at start-up.
pub fn check_constants() -> Result<(), Error> {
    let one = FieldElement::ONE;
    let two = &one + &one;

    let mut ok = (-&MONTGOMERY_NEG_A).ct_eq(&MONTGOMERY_A);
    ok &= (&MONTGOMERY_A * &MONTGOMERY_A).ct_eq(&MONTGOMERY_A_SQUARED);

    // sqrt(-(A+2)) from -A - 2.
    let (_, root) = FieldElement::sqrt_ratio_i(&(&MONTGOMERY_NEG_A - &two), &one);
    ok &= root.ct_eq(&MONTGOMERY_SQRT_NEG_A_PLUS_TWO);

    // u_factor = -2 * sqrt(-1)
    ok &= (&(-&two) * &SQRT_M1).ct_eq(&MONTGOMERY_U_FACTOR);

    // v_factor = sqrt(u_factor)
    let (_, root) = FieldElement::sqrt_ratio_i(&MONTGOMERY_U_FACTOR, &one);
    ok &= root.ct_eq(&MONTGOMERY_V_FACTOR);

    if bool::from(ok) {
        Ok(())
    } else {
        Err(Error::InternalInvariant)
    }
}
