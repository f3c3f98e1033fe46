// -*- mode: rust; -*-
//
// This file is part of ecvrf-dalek.
// See LICENSE for licensing information.

//! Field arithmetic modulo \\(p = 2\^{255} - 19\\).
//!
//! `curve25519-dalek` keeps its field type crate-private, so the Elligator
//! map and the Montgomery conversions carry a thin `FieldElement` of their
//! own.  Limb-level arithmetic (addition, multiplication, squaring,
//! carrying, byte codecs) is delegated to the formally verified
//! fiat-crypto backend; operations defined in terms of other field
//! operations, such as inversion or square roots, are defined here.

use core::ops::{Add, Mul, Neg, Sub};

use fiat_crypto::curve25519_64::{
    fiat_25519_add, fiat_25519_carry, fiat_25519_carry_mul, fiat_25519_carry_square,
    fiat_25519_from_bytes, fiat_25519_loose_field_element, fiat_25519_opp, fiat_25519_relax,
    fiat_25519_sub, fiat_25519_tight_field_element, fiat_25519_to_bytes,
};
use subtle::{Choice, ConditionallyNegatable, ConditionallySelectable, ConstantTimeEq};

use crate::constants;

/// An element of the field \\( \mathbb Z / (2\^{255} - 19) \\), held in
/// the backend's unpacked 51-bit-limb representation.
#[derive(Copy, Clone)]
pub(crate) struct FieldElement(pub(crate) fiat_25519_tight_field_element);

impl core::fmt::Debug for FieldElement {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "FieldElement({:?})", &self.to_bytes())
    }
}

impl<'a, 'b> Add<&'b FieldElement> for &'a FieldElement {
    type Output = FieldElement;
    fn add(self, rhs: &'b FieldElement) -> FieldElement {
        let mut sum_loose = fiat_25519_loose_field_element([0; 5]);
        fiat_25519_add(&mut sum_loose, &self.0, &rhs.0);

        let mut sum = FieldElement::ZERO;
        fiat_25519_carry(&mut sum.0, &sum_loose);
        sum
    }
}

impl<'a, 'b> Sub<&'b FieldElement> for &'a FieldElement {
    type Output = FieldElement;
    fn sub(self, rhs: &'b FieldElement) -> FieldElement {
        let mut difference_loose = fiat_25519_loose_field_element([0; 5]);
        fiat_25519_sub(&mut difference_loose, &self.0, &rhs.0);

        let mut difference = FieldElement::ZERO;
        fiat_25519_carry(&mut difference.0, &difference_loose);
        difference
    }
}

impl<'a, 'b> Mul<&'b FieldElement> for &'a FieldElement {
    type Output = FieldElement;
    fn mul(self, rhs: &'b FieldElement) -> FieldElement {
        let mut self_loose = fiat_25519_loose_field_element([0; 5]);
        fiat_25519_relax(&mut self_loose, &self.0);
        let mut rhs_loose = fiat_25519_loose_field_element([0; 5]);
        fiat_25519_relax(&mut rhs_loose, &rhs.0);

        let mut product = FieldElement::ZERO;
        fiat_25519_carry_mul(&mut product.0, &self_loose, &rhs_loose);
        product
    }
}

impl<'a> Neg for &'a FieldElement {
    type Output = FieldElement;
    fn neg(self) -> FieldElement {
        let mut negated_loose = fiat_25519_loose_field_element([0; 5]);
        fiat_25519_opp(&mut negated_loose, &self.0);

        let mut negated = FieldElement::ZERO;
        fiat_25519_carry(&mut negated.0, &negated_loose);
        negated
    }
}

impl ConditionallySelectable for FieldElement {
    fn conditional_select(a: &FieldElement, b: &FieldElement, choice: Choice) -> FieldElement {
        let mut limbs = [0u64; 5];
        for (i, limb) in limbs.iter_mut().enumerate() {
            *limb = u64::conditional_select(&(a.0).0[i], &(b.0).0[i], choice);
        }
        FieldElement(fiat_25519_tight_field_element(limbs))
    }
}

impl ConstantTimeEq for FieldElement {
    /// Test equality between two `FieldElement`s.  Since the internal
    /// representation is not canonical, the elements are normalized to
    /// wire format before comparison.
    fn ct_eq(&self, other: &FieldElement) -> Choice {
        self.to_bytes().ct_eq(&other.to_bytes())
    }
}

impl Eq for FieldElement {}

impl PartialEq for FieldElement {
    fn eq(&self, other: &FieldElement) -> bool {
        self.ct_eq(other).into()
    }
}

impl FieldElement {
    pub(crate) const ZERO: FieldElement =
        FieldElement(fiat_25519_tight_field_element([0, 0, 0, 0, 0]));
    pub(crate) const ONE: FieldElement =
        FieldElement(fiat_25519_tight_field_element([1, 0, 0, 0, 0]));
    pub(crate) const MINUS_ONE: FieldElement = FieldElement(fiat_25519_tight_field_element([
        2251799813685228,
        2251799813685247,
        2251799813685247,
        2251799813685247,
        2251799813685247,
    ]));

    /// Load a `FieldElement` from the low 255 bits of a 32-byte
    /// little-endian encoding.  The unused high bit is ignored, as in the
    /// RFC 8032 field codec.
    pub(crate) fn from_bytes(bytes: &[u8; 32]) -> FieldElement {
        let mut masked = *bytes;
        masked[31] &= 0x7f;

        let mut fe = FieldElement::ZERO;
        fiat_25519_from_bytes(&mut fe.0, &masked);
        fe
    }

    /// Serialize to the canonical 32-byte little-endian encoding.
    pub(crate) fn to_bytes(&self) -> [u8; 32] {
        let mut bytes = [0u8; 32];
        fiat_25519_to_bytes(&mut bytes, &self.0);
        bytes
    }

    /// Load a `FieldElement` from 64 little-endian bytes, reducing the
    /// full 512-bit value modulo \\(p\\).
    pub(crate) fn from_bytes_wide(bytes: &[u8; 64]) -> FieldElement {
        let mut lo_bytes = [0u8; 32];
        let mut hi_bytes = [0u8; 32];
        lo_bytes.copy_from_slice(&bytes[..32]);
        hi_bytes.copy_from_slice(&bytes[32..]);

        // `from_bytes` drops bit 255 of either half; save both so they can
        // be folded back in below.
        let lo_top_bit = u16::from(lo_bytes[31] >> 7);
        let hi_top_bit = u16::from(hi_bytes[31] >> 7);

        let lo = FieldElement::from_bytes(&lo_bytes);
        let hi = FieldElement::from_bytes(&hi_bytes);

        // 2^255 = 19 and 2^511 = 722 (mod p), so the dropped bits
        // contribute at most 19 + 722 = 741.
        let top_bits: u16 = lo_top_bit * 19 + hi_top_bit * 722;
        let mut top_bits_bytes = [0u8; 32];
        top_bits_bytes[..2].copy_from_slice(&top_bits.to_le_bytes());
        let top_bits = FieldElement::from_bytes(&top_bits_bytes);

        // The high half is scaled by 2^256 = 38 (mod p).
        const THIRTY_EIGHT: FieldElement =
            FieldElement(fiat_25519_tight_field_element([38, 0, 0, 0, 0]));

        &(&lo + &top_bits) + &(&THIRTY_EIGHT * &hi)
    }

    /// Determine if this `FieldElement` is negative, in the sense used in
    /// the ed25519 paper: `x` is negative if the low bit of its canonical
    /// encoding is set.
    pub(crate) fn is_negative(&self) -> Choice {
        (self.to_bytes()[0] & 1).into()
    }

    /// Determine if this `FieldElement` is zero.
    pub(crate) fn is_zero(&self) -> Choice {
        self.to_bytes().ct_eq(&[0u8; 32])
    }

    /// Square this field element.
    pub(crate) fn square(&self) -> FieldElement {
        let mut self_loose = fiat_25519_loose_field_element([0; 5]);
        fiat_25519_relax(&mut self_loose, &self.0);

        let mut square = FieldElement::ZERO;
        fiat_25519_carry_square(&mut square.0, &self_loose);
        square
    }

    /// Raise this field element to the power \\(2\^k\\) by repeated
    /// squaring.
    fn pow2k(&self, k: u32) -> FieldElement {
        debug_assert!(k > 0);
        let mut output = *self;
        for _ in 0..k {
            output = output.square();
        }
        output
    }

    /// Compute `(self^(2^250-1), self^11)`, used as a helper within
    /// `invert()` and `pow_p58()`.
    #[rustfmt::skip] // keep alignment of explanatory comments
    fn pow22501(&self) -> (FieldElement, FieldElement) {
        // Each temporary t_i below is of the form self^e_i; squaring
        // doubles e_i and multiplication adds them.
        //
        //                                  nonzero bits of e_i
        let t0  = self.square();         // 1
        let t1  = t0.square().square();  // 3
        let t2  = self * &t1;            // 3,0
        let t3  = &t0 * &t2;             // 3,1,0
        let t4  = t3.square();           // 4,2,1
        let t5  = &t2 * &t4;             // 4,3,2,1,0
        let t6  = t5.pow2k(5);           // 9,8,7,6,5
        let t7  = &t6 * &t5;             // 9..0
        let t8  = t7.pow2k(10);          // 19..10
        let t9  = &t8 * &t7;             // 19..0
        let t10 = t9.pow2k(20);          // 39..20
        let t11 = &t10 * &t9;            // 39..0
        let t12 = t11.pow2k(10);         // 49..10
        let t13 = &t12 * &t7;            // 49..0
        let t14 = t13.pow2k(50);         // 99..50
        let t15 = &t14 * &t13;           // 99..0
        let t16 = t15.pow2k(100);        // 199..100
        let t17 = &t16 * &t15;           // 199..0
        let t18 = t17.pow2k(50);         // 249..50
        let t19 = &t18 * &t13;           // 249..0

        (t19, t3)
    }

    /// Compute the multiplicative inverse as `self^(p-2)`.
    ///
    /// This function returns zero on input zero.
    pub(crate) fn invert(&self) -> FieldElement {
        // The bits of p-2 = 2^255 - 21 are 11010111111...11.
        let (t19, t3) = self.pow22501(); // t19: 249..0 ; t3: 3,1,0
        let t20 = t19.pow2k(5); //          254..5
        &t20 * &t3 //                       254..5,3,1,0
    }

    /// Raise this field element to the power `(p-5)/8 = 2^252 - 3`.
    fn pow_p58(&self) -> FieldElement {
        // The bits of (p-5)/8 are 101111.....11.
        let (t19, _) = self.pow22501(); // 249..0
        let t20 = t19.pow2k(2); //         251..2
        self * &t20 //                     251..2,0
    }

    /// Given `FieldElement`s `u` and `v`, compute either `sqrt(u/v)` or
    /// `sqrt(i*u/v)` in constant time.
    ///
    /// This function always returns the nonnegative square root.
    ///
    /// # Return
    ///
    /// - `(Choice(1), +sqrt(u/v))  ` if `v` is nonzero and `u/v` is square;
    /// - `(Choice(1), zero)        ` if `u` is zero;
    /// - `(Choice(0), zero)        ` if `v` is zero and `u` is nonzero;
    /// - `(Choice(0), +sqrt(i*u/v))` if `u/v` is nonsquare (so `i*u/v` is square).
    pub(crate) fn sqrt_ratio_i(u: &FieldElement, v: &FieldElement) -> (Choice, FieldElement) {
        // The inversion, square root, and square test merge as in ed25519
        // decompression: with r = (uv^3) (uv^7)^((p-5)/8), a nonzero
        // square u/v gives vr^2 = ±u, and multiplying r by sqrt(-1)
        // corrects the flipped case.
        let v3 = &v.square() * v;
        let v7 = &v3.square() * v;
        let mut r = &(u * &v3) * &(u * &v7).pow_p58();
        let check = v * &r.square();

        let i = &constants::SQRT_M1;

        let correct_sign_sqrt = check.ct_eq(u);
        let flipped_sign_sqrt = check.ct_eq(&(-u));
        let flipped_sign_sqrt_i = check.ct_eq(&(&(-u) * i));

        let r_prime = i * &r;
        r.conditional_assign(&r_prime, flipped_sign_sqrt | flipped_sign_sqrt_i);

        // Choose the nonnegative square root.
        let r_is_negative = r.is_negative();
        r.conditional_negate(r_is_negative);

        (correct_sign_sqrt | flipped_sign_sqrt, r)
    }
}
