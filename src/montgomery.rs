// -*- mode: rust; -*-
//
// This file is part of ecvrf-dalek.
// See LICENSE for licensing information.

//! Montgomery points `(u, v)` and the birational correspondence with
//! edwards25519.
//!
//! Unlike the x-coordinate-only Montgomery type in `curve25519-dalek`,
//! this type carries both coordinates; the `curve25519_*` hash-to-curve
//! suites are defined to return the full `(u, v)` pair.

use curve25519_dalek::edwards::EdwardsPoint;
use subtle::{Choice, ConditionallyNegatable, ConditionallySelectable, ConstantTimeEq};

use crate::constants::{EDWARDS_D, MONTGOMERY_SQRT_NEG_A_PLUS_TWO};
use crate::elligator2::edwards_from_xy;
use crate::field::FieldElement;

/// A point `(u, v)` on the Montgomery form of Curve25519,
/// \\(v\^2 = u\^3 + A u\^2 + u\\).
#[derive(Copy, Clone, Debug)]
pub struct MontgomeryPoint {
    pub(crate) u: FieldElement,
    pub(crate) v: FieldElement,
}

impl ConstantTimeEq for MontgomeryPoint {
    fn ct_eq(&self, other: &MontgomeryPoint) -> Choice {
        self.u.ct_eq(&other.u) & self.v.ct_eq(&other.v)
    }
}

impl Eq for MontgomeryPoint {}

impl PartialEq for MontgomeryPoint {
    fn eq(&self, other: &MontgomeryPoint) -> bool {
        self.ct_eq(other).into()
    }
}

impl MontgomeryPoint {
    /// The canonical little-endian encodings of the `u` and `v`
    /// coordinates.
    pub fn to_bytes(&self) -> ([u8; 32], [u8; 32]) {
        (self.u.to_bytes(), self.v.to_bytes())
    }

    /// Convert an Edwards point to its Montgomery image.
    ///
    /// Per RFC 7748, `(u, v) = ((1+y)/(1-y), sqrt(-(A+2))*u/x)`.  The
    /// identity (`y = 1`) has no affine image and maps to `(0, 0)`; the
    /// remaining `x = 0` point maps to `(0, 0)` as well.  Both exceptions
    /// are handled by constant-time selection.
    pub fn from_edwards(point: &EdwardsPoint) -> MontgomeryPoint {
        let (x, y) = affine_coordinates(point);
        let one = FieldElement::ONE;

        let mut u = &(&one + &y) * &(&one - &y).invert();
        let mut v = &(&MONTGOMERY_SQRT_NEG_A_PLUS_TWO * &u) * &x.invert();

        let y_is_one = y.ct_eq(&one);
        u.conditional_assign(&FieldElement::ZERO, y_is_one);
        v.conditional_assign(&FieldElement::ZERO, y_is_one | x.is_zero());

        MontgomeryPoint { u, v }
    }

    /// Convert back to an Edwards point.
    ///
    /// Per RFC 7748, `(x, y) = (sqrt(-(A+2))*u/v, (u-1)/(u+1))`.  Inputs
    /// where either denominator vanishes yield the Edwards identity.
    pub fn to_edwards(&self) -> EdwardsPoint {
        let one = FieldElement::ONE;

        let mut x = &(&self.u * &self.v.invert()) * &MONTGOMERY_SQRT_NEG_A_PLUS_TWO;

        let u_plus_one = &self.u + &one;
        let u_plus_one_is_zero = u_plus_one.is_zero();
        let mut y = &(&self.u - &one) * &u_plus_one.invert();

        let undefined = self.v.is_zero() | u_plus_one_is_zero;
        x.conditional_assign(&FieldElement::ZERO, undefined);
        y.conditional_assign(&one, undefined);

        edwards_from_xy(&x, &y)
    }
}

/// Recover the affine `(x, y)` of an Edwards point from its compressed
/// encoding: `x = ±sqrt((y^2 - 1)/(d y^2 + 1))`, with the sign taken from
/// bit 255.
fn affine_coordinates(point: &EdwardsPoint) -> (FieldElement, FieldElement) {
    let mut y_bytes = point.compress().to_bytes();
    let x_sign = Choice::from(y_bytes[31] >> 7);
    y_bytes[31] &= 0x7f;
    let y = FieldElement::from_bytes(&y_bytes);

    let yy = y.square();
    let numerator = &yy - &FieldElement::ONE;
    let denominator = &(&yy * &EDWARDS_D) + &FieldElement::ONE;
    let (_, mut x) = FieldElement::sqrt_ratio_i(&numerator, &denominator);
    x.conditional_negate(x_sign ^ x.is_negative());

    (x, y)
}
