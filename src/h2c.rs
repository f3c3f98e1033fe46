// -*- mode: rust; -*-
//
// This file is part of ecvrf-dalek.
// See LICENSE for licensing information.

//! Hashing to edwards25519 and curve25519, per RFC 9380.
//!
//! The `*_xmd_sha512_*` functions implement the standardised suites
//! `edwards25519_XMD:SHA-512_ELL2_{RO,NU}_` and
//! `curve25519_XMD:SHA-512_ELL2_{RO,NU}_`.  The generic variants accept
//! any fixed-output hash satisfying the RFC's requirements, or any
//! extendable-output function, under the same domain-separation rules.
//!
//! The random-oracle (`_ro`) suites hash to the curve by combining two
//! independently mapped points; the nonuniform (`_nu`) suites use a
//! single map and are cheaper, at the cost of a distinguishable output
//! distribution.  Both clear the cofactor, so results always lie in the
//! prime-order subgroup.

use curve25519_dalek::edwards::EdwardsPoint;
use digest::core_api::BlockSizeUser;
use digest::generic_array::GenericArray;
use digest::typenum::Unsigned;
use digest::{Digest, ExtendableOutput, FixedOutputReset, Update, XofReader};
use sha2::Sha512;

use crate::elligator2;
use crate::errors::Error;
use crate::field::FieldElement;
use crate::montgomery::MontgomeryPoint;

/// Bytes of expander output consumed per field element:
/// `L = ceil((ceil(log2(p)) + k) / 8)` with `k = 128`-bit security.
const ELEMENT_SIZE: usize = 48;

const ENCODE_TO_CURVE_SIZE: usize = ELEMENT_SIZE;
const HASH_TO_CURVE_SIZE: usize = ELEMENT_SIZE * 2;

/// Prefix hashed over a DST longer than 255 bytes to derive a short one.
const OVERSIZE_DST_SALT: &[u8] = b"H2C-OVERSIZE-DST-";

/// Length of an XOF-derived replacement DST: `ceil(2 * k / 8)`.
const OVERSIZE_DST_LENGTH: usize = 32;

/// Implements the `edwards25519_XMD:SHA-512_ELL2_RO_` suite.
pub fn edwards25519_xmd_sha512_ell2_ro(
    domain_separator: &[u8],
    message: &[u8],
) -> Result<EdwardsPoint, Error> {
    edwards25519_xmd_ell2_ro::<Sha512>(domain_separator, message)
}

/// Implements the `edwards25519_XMD:SHA-512_ELL2_NU_` suite.
pub fn edwards25519_xmd_sha512_ell2_nu(
    domain_separator: &[u8],
    message: &[u8],
) -> Result<EdwardsPoint, Error> {
    edwards25519_xmd_ell2_nu::<Sha512>(domain_separator, message)
}

/// Implements the `curve25519_XMD:SHA-512_ELL2_RO_` suite, returning the
/// Montgomery `(u, v)` coordinates.
pub fn curve25519_xmd_sha512_ell2_ro(
    domain_separator: &[u8],
    message: &[u8],
) -> Result<MontgomeryPoint, Error> {
    curve25519_xmd_ell2_ro::<Sha512>(domain_separator, message)
}

/// Implements the `curve25519_XMD:SHA-512_ELL2_NU_` suite, returning the
/// Montgomery `(u, v)` coordinates.
pub fn curve25519_xmd_sha512_ell2_nu(
    domain_separator: &[u8],
    message: &[u8],
) -> Result<MontgomeryPoint, Error> {
    curve25519_xmd_ell2_nu::<Sha512>(domain_separator, message)
}

/// A generic edwards25519 random-oracle suite using `expand_message_xmd`
/// with the hash `D`.
pub fn edwards25519_xmd_ell2_ro<D>(
    domain_separator: &[u8],
    message: &[u8],
) -> Result<EdwardsPoint, Error>
where
    D: BlockSizeUser + Digest + FixedOutputReset,
{
    let mut uniform_bytes = [0u8; HASH_TO_CURVE_SIZE];
    expand_message_xmd::<D>(&mut uniform_bytes, domain_separator, message)?;
    Ok(hash_to_curve(&uniform_bytes))
}

/// A generic edwards25519 nonuniform suite using `expand_message_xmd`
/// with the hash `D`.
pub fn edwards25519_xmd_ell2_nu<D>(
    domain_separator: &[u8],
    message: &[u8],
) -> Result<EdwardsPoint, Error>
where
    D: BlockSizeUser + Digest + FixedOutputReset,
{
    let mut uniform_bytes = [0u8; ENCODE_TO_CURVE_SIZE];
    expand_message_xmd::<D>(&mut uniform_bytes, domain_separator, message)?;
    Ok(encode_to_curve(&uniform_bytes))
}

/// A generic curve25519 random-oracle suite using `expand_message_xmd`
/// with the hash `D`.
pub fn curve25519_xmd_ell2_ro<D>(
    domain_separator: &[u8],
    message: &[u8],
) -> Result<MontgomeryPoint, Error>
where
    D: BlockSizeUser + Digest + FixedOutputReset,
{
    let point = edwards25519_xmd_ell2_ro::<D>(domain_separator, message)?;
    Ok(MontgomeryPoint::from_edwards(&point))
}

/// A generic curve25519 nonuniform suite using `expand_message_xmd` with
/// the hash `D`.
pub fn curve25519_xmd_ell2_nu<D>(
    domain_separator: &[u8],
    message: &[u8],
) -> Result<MontgomeryPoint, Error>
where
    D: BlockSizeUser + Digest + FixedOutputReset,
{
    let point = edwards25519_xmd_ell2_nu::<D>(domain_separator, message)?;
    Ok(MontgomeryPoint::from_edwards(&point))
}

/// A generic edwards25519 random-oracle suite using `expand_message_xof`
/// with the extendable-output function `xof`.
pub fn edwards25519_xof_ell2_ro<X>(
    xof: &X,
    domain_separator: &[u8],
    message: &[u8],
) -> Result<EdwardsPoint, Error>
where
    X: ExtendableOutput + Update + Clone,
{
    let mut uniform_bytes = [0u8; HASH_TO_CURVE_SIZE];
    expand_message_xof(&mut uniform_bytes, xof, domain_separator, message)?;
    Ok(hash_to_curve(&uniform_bytes))
}

/// A generic edwards25519 nonuniform suite using `expand_message_xof`
/// with the extendable-output function `xof`.
pub fn edwards25519_xof_ell2_nu<X>(
    xof: &X,
    domain_separator: &[u8],
    message: &[u8],
) -> Result<EdwardsPoint, Error>
where
    X: ExtendableOutput + Update + Clone,
{
    let mut uniform_bytes = [0u8; ENCODE_TO_CURVE_SIZE];
    expand_message_xof(&mut uniform_bytes, xof, domain_separator, message)?;
    Ok(encode_to_curve(&uniform_bytes))
}

/// A generic curve25519 random-oracle suite using `expand_message_xof`
/// with the extendable-output function `xof`.
pub fn curve25519_xof_ell2_ro<X>(
    xof: &X,
    domain_separator: &[u8],
    message: &[u8],
) -> Result<MontgomeryPoint, Error>
where
    X: ExtendableOutput + Update + Clone,
{
    let point = edwards25519_xof_ell2_ro(xof, domain_separator, message)?;
    Ok(MontgomeryPoint::from_edwards(&point))
}

/// A generic curve25519 nonuniform suite using `expand_message_xof` with
/// the extendable-output function `xof`.
pub fn curve25519_xof_ell2_nu<X>(
    xof: &X,
    domain_separator: &[u8],
    message: &[u8],
) -> Result<MontgomeryPoint, Error>
where
    X: ExtendableOutput + Update + Clone,
{
    let point = edwards25519_xof_ell2_nu(xof, domain_separator, message)?;
    Ok(MontgomeryPoint::from_edwards(&point))
}

/// `expand_message_xmd` per RFC 9380 section 5.3.1, filling `out`.
///
/// Fails with [`Error::ExpandMessageOutOfRange`] if `out` is longer than
/// `255 * b_in_bytes` or 65535 bytes.  A DST longer than 255 bytes is
/// replaced by `H("H2C-OVERSIZE-DST-" || DST)` first; an empty DST is
/// allowed (but discouraged by the RFC).
pub fn expand_message_xmd<D>(out: &mut [u8], dst: &[u8], msg: &[u8]) -> Result<(), Error>
where
    D: BlockSizeUser + Digest + FixedOutputReset,
{
    let b_in_bytes = D::OutputSize::USIZE;
    let len_in_bytes = out.len();

    if len_in_bytes > 255 * b_in_bytes || len_in_bytes > 65535 {
        return Err(Error::ExpandMessageOutOfRange);
    }
    if len_in_bytes == 0 {
        return Ok(());
    }

    let hashed_dst;
    let dst: &[u8] = if dst.len() > 255 {
        hashed_dst = D::new()
            .chain_update(OVERSIZE_DST_SALT)
            .chain_update(dst)
            .finalize();
        hashed_dst.as_slice()
    } else {
        dst
    };
    let dst_len = dst.len() as u8;

    let ell = (len_in_bytes + b_in_bytes - 1) / b_in_bytes;

    // b_0 = H(Z_pad || msg || l_i_b_str || I2OSP(0, 1) || DST_prime)
    let mut hasher = D::new();
    Digest::update(&mut hasher, GenericArray::<u8, D::BlockSize>::default());
    Digest::update(&mut hasher, msg);
    Digest::update(&mut hasher, (len_in_bytes as u16).to_be_bytes());
    Digest::update(&mut hasher, [0u8]);
    Digest::update(&mut hasher, dst);
    Digest::update(&mut hasher, [dst_len]);
    let b_0 = hasher.finalize_reset();

    // b_i = H(strxor(b_0, b_(i-1)) || I2OSP(i, 1) || DST_prime); the
    // first round mixes with an all-zero b_0 "predecessor".
    let mut b_i = digest::Output::<D>::default();
    for (i, chunk) in (1..=ell).zip(out.chunks_mut(b_in_bytes)) {
        let mut mixed = b_0.clone();
        for (mixed_byte, prev_byte) in mixed.iter_mut().zip(b_i.iter()) {
            *mixed_byte ^= prev_byte;
        }
        Digest::update(&mut hasher, mixed);
        Digest::update(&mut hasher, [i as u8]);
        Digest::update(&mut hasher, dst);
        Digest::update(&mut hasher, [dst_len]);
        b_i = hasher.finalize_reset();

        chunk.copy_from_slice(&b_i[..chunk.len()]);
    }

    Ok(())
}

/// `expand_message_xof` per RFC 9380 section 5.3.2, filling `out` from a
/// clone of `xof`.
///
/// Fails with [`Error::ExpandMessageOutOfRange`] if `out` is longer than
/// 65535 bytes.  A DST longer than 255 bytes is replaced by
/// `XOF("H2C-OVERSIZE-DST-" || DST, 32)` first.
pub fn expand_message_xof<X>(out: &mut [u8], xof: &X, dst: &[u8], msg: &[u8]) -> Result<(), Error>
where
    X: ExtendableOutput + Update + Clone,
{
    let len_in_bytes = out.len();
    if len_in_bytes > 65535 {
        return Err(Error::ExpandMessageOutOfRange);
    }

    let mut hashed_dst = [0u8; OVERSIZE_DST_LENGTH];
    let dst: &[u8] = if dst.len() > 255 {
        let mut hasher = xof.clone();
        hasher.update(OVERSIZE_DST_SALT);
        hasher.update(dst);
        hasher.finalize_xof().read(&mut hashed_dst);
        &hashed_dst
    } else {
        dst
    };

    // XOF(msg || I2OSP(len_in_bytes, 2) || DST_prime, len_in_bytes)
    let mut hasher = xof.clone();
    hasher.update(msg);
    hasher.update(&(len_in_bytes as u16).to_be_bytes());
    hasher.update(dst);
    hasher.update(&[dst.len() as u8]);
    hasher.finalize_xof().read(out);

    Ok(())
}

fn hash_to_curve(uniform_bytes: &[u8; HASH_TO_CURVE_SIZE]) -> EdwardsPoint {
    let fe_0 = uniform_to_field(&uniform_bytes[..ELEMENT_SIZE]);
    let fe_1 = uniform_to_field(&uniform_bytes[ELEMENT_SIZE..]);

    let q_0 = elligator2::edwards_flavor(&fe_0);
    let q_1 = elligator2::edwards_flavor(&fe_1);

    (&q_0 + &q_1).mul_by_cofactor()
}

fn encode_to_curve(uniform_bytes: &[u8; ENCODE_TO_CURVE_SIZE]) -> EdwardsPoint {
    elligator2::edwards_flavor(&uniform_to_field(uniform_bytes)).mul_by_cofactor()
}

/// Interpret `ELEMENT_SIZE` big-endian expander bytes as a field element.
///
/// The backend's wide reduction wants 64 little-endian bytes, so the
/// input is left-zero-padded to 64 bytes and byte-reversed; skipping
/// either step changes the value.
fn uniform_to_field(bytes: &[u8]) -> FieldElement {
    debug_assert_eq!(bytes.len(), ELEMENT_SIZE);

    let mut wide = [0u8; 64];
    for (wide_byte, big_endian_byte) in wide.iter_mut().zip(bytes.iter().rev()) {
        *wide_byte = *big_endian_byte;
    }

    FieldElement::from_bytes_wide(&wide)
}

#[cfg(test)]
mod test {
    use super::*;

    use sha2::Sha256;
    use sha3::{Shake128, Shake256};

    #[test]
    fn expand_message_xmd_rejects_oversized_output() {
        // 255 * 64 = 16320 is the cap for SHA-512.
        let mut out = vec![0u8; 255 * 64 + 1];
        assert_eq!(
            expand_message_xmd::<Sha512>(&mut out, b"dst", b"msg"),
            Err(Error::ExpandMessageOutOfRange),
        );

        let mut out = vec![0u8; 65536];
        assert_eq!(
            expand_message_xmd::<Sha256>(&mut out, b"dst", b"msg"),
            Err(Error::ExpandMessageOutOfRange),
        );
        assert_eq!(
            expand_message_xof(&mut out, &Shake128::default(), b"dst", b"msg"),
            Err(Error::ExpandMessageOutOfRange),
        );
    }

    #[test]
    fn expand_message_xmd_oversized_dst_substitution() {
        // Expanding under a >255-byte DST must equal expanding under
        // H("H2C-OVERSIZE-DST-" || DST).
        let long_dst = [b'x'; 300];
        let substitute: [u8; 64] = Sha512::new()
            .chain_update(OVERSIZE_DST_SALT)
            .chain_update(long_dst)
            .finalize()
            .into();

        let mut expanded_long = [0u8; 96];
        let mut expanded_substitute = [0u8; 96];
        expand_message_xmd::<Sha512>(&mut expanded_long, &long_dst, b"msg").unwrap();
        expand_message_xmd::<Sha512>(&mut expanded_substitute, &substitute, b"msg").unwrap();

        assert_eq!(expanded_long, expanded_substitute);
    }

    #[test]
    fn expand_message_xof_oversized_dst_substitution() {
        let long_dst = [b'x'; 300];
        let mut substitute = [0u8; OVERSIZE_DST_LENGTH];
        let mut hasher = Shake256::default();
        hasher.update(OVERSIZE_DST_SALT);
        hasher.update(&long_dst);
        hasher.finalize_xof().read(&mut substitute);

        let mut expanded_long = [0u8; 96];
        let mut expanded_substitute = [0u8; 96];
        expand_message_xof(&mut expanded_long, &Shake256::default(), &long_dst, b"msg").unwrap();
        expand_message_xof(
            &mut expanded_substitute,
            &Shake256::default(),
            &substitute,
            b"msg",
        )
        .unwrap();

        assert_eq!(expanded_long, expanded_substitute);
    }

    #[test]
    fn expand_message_xmd_empty_dst_is_allowed() {
        let mut out = [0u8; 32];
        expand_message_xmd::<Sha512>(&mut out, b"", b"msg").unwrap();
        assert_ne!(out, [0u8; 32]);
    }

    #[test]
    fn ro_suites_land_in_the_prime_order_subgroup() {
        let dst: &[u8] = b"QUUX-V01-CS02-with-edwards25519_XMD:SHA-512_ELL2_RO_";
        for msg in [&b""[..], b"abc", b"abcdef0123456789"] {
            let point = edwards25519_xmd_sha512_ell2_ro(dst, msg).unwrap();
            assert!(!point.is_small_order());
            assert!(point.is_torsion_free());

            let nonuniform = edwards25519_xmd_sha512_ell2_nu(dst, msg).unwrap();
            assert!(nonuniform.is_torsion_free());
            assert_ne!(point, nonuniform);
        }
    }

    #[test]
    fn xof_suites_land_in_the_prime_order_subgroup() {
        let dst: &[u8] = b"QUUX-V01-CS02-with-edwards25519_XOF:SHAKE-256_ELL2_RO_";
        for msg in [&b""[..], b"abc"] {
            let shake256 = Shake256::default();
            let random_oracle = edwards25519_xof_ell2_ro(&shake256, dst, msg).unwrap();
            let nonuniform = edwards25519_xof_ell2_nu(&shake256, dst, msg).unwrap();
            assert!(random_oracle.is_torsion_free());
            assert!(nonuniform.is_torsion_free());
            assert_ne!(random_oracle, nonuniform);

            // A different XOF must give a different point.
            let shake128 = Shake128::default();
            assert_ne!(
                random_oracle,
                edwards25519_xof_ell2_ro(&shake128, dst, msg).unwrap(),
            );
        }
    }

    #[test]
    fn montgomery_suites_match_edwards_suites() {
        let dst: &[u8] = b"QUUX-V01-CS02-with-curve25519_XMD:SHA-512_ELL2_RO_";
        for msg in [&b""[..], b"abc"] {
            let montgomery = curve25519_xmd_sha512_ell2_ro(dst, msg).unwrap();
            let edwards = edwards25519_xmd_sha512_ell2_ro(dst, msg).unwrap();
            assert_eq!(MontgomeryPoint::from_edwards(&edwards), montgomery);
            assert_eq!(montgomery.to_edwards(), edwards);
        }
    }
}
