// -*- mode: rust; -*-
//
// This file is part of ecvrf-dalek.
// See LICENSE for licensing information.

//! The `ECVRF-EDWARDS25519-SHA512-ELL2` verifiable random function,
//! per RFC 9381.
//!
//! A VRF is a keyed hash whose output can be verified against the public
//! key: [`prove`] produces an 80-byte proof binding the input to the
//! secret key, [`verify`] checks a proof against the public key, and both
//! yield the same 64-byte output via [`proof_to_hash`].
//!
//! Secret keys are Ed25519 private keys (32-byte seed followed by the
//! 32-byte public key); the VRF secret scalar is derived exactly as the
//! Ed25519 signing scalar is.
//!
//! Earlier draft versions of the RFC (up to and including draft 10) did
//! not hash the public key into the challenge transcript.  The
//! [`prove_v10`]/[`verify_v10`] variants retain that behaviour for
//! interoperability with deployed implementations; the two modes differ
//! in nothing else and their proofs are mutually invalid.

use alloc::vec::Vec;

use curve25519_dalek::edwards::{CompressedEdwardsY, EdwardsPoint};
use curve25519_dalek::scalar::{clamp_integer, Scalar};
use curve25519_dalek::traits::VartimeMultiscalarMul;
use sha2::{Digest, Sha512};
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use crate::errors::Error;
use crate::h2c;

/// The size, in bytes, of an ECVRF proof.
pub const PROOF_SIZE: usize = 80;

/// The size, in bytes, of an ECVRF output.
pub const OUTPUT_SIZE: usize = 64;

/// The size, in bytes, of an ECVRF secret key (an Ed25519 private key:
/// seed followed by public key).
pub const SECRET_KEY_SIZE: usize = 64;

/// The size, in bytes, of an ECVRF public key.
pub const PUBLIC_KEY_SIZE: usize = 32;

const SUITE_STRING: u8 = 0x04;
const TWO_STRING: u8 = 0x02;
const THREE_STRING: u8 = 0x03;
const ZERO_STRING: u8 = 0x00;

/// The hash-to-curve domain separation tag,
/// `"ECVRF_" || h2c_suite_ID_string || suite_string`.
const H2C_DST: &[u8] = b"ECVRF_edwards25519_XMD:SHA-512_ELL2_NU_\x04";

/// Whether the public key is hashed into the challenge transcript.  This
/// is the only difference between RFC 9381 and the pre-v11 drafts.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum ChallengeMode {
    /// RFC 9381 (draft v11 and later): `Y` is hashed.
    WithPublicKey,
    /// Drafts up to v10: `Y` is omitted.
    Legacy,
}

/// The VRF secret scalar and nonce seed, derived from an Ed25519 seed by
/// SHA-512 expansion as in RFC 8032.  Wiped on drop.
struct ExpandedSecretKey {
    scalar: Scalar,
    nonce_seed: [u8; 32],
}

impl Drop for ExpandedSecretKey {
    fn drop(&mut self) {
        self.scalar.zeroize();
        self.nonce_seed.zeroize();
    }
}

impl ExpandedSecretKey {
    fn from_seed(seed: &[u8]) -> ExpandedSecretKey {
        let mut hash: [u8; 64] = Sha512::digest(seed).into();
        let mut scalar_bytes: [u8; 32] = hash[..32].try_into().expect("SHA-512 output is 64 bytes");
        let nonce_seed: [u8; 32] = hash[32..].try_into().expect("SHA-512 output is 64 bytes");

        let scalar = Scalar::from_bytes_mod_order(clamp_integer(scalar_bytes));
        scalar_bytes.zeroize();
        hash.zeroize();

        ExpandedSecretKey { scalar, nonce_seed }
    }
}

/// Produce an ECVRF proof for `alpha_string` under `secret_key`, per
/// RFC 9381 section 5.1.
///
/// `secret_key` is an Ed25519 private key: the 32-byte seed followed by
/// the 32-byte public key.
///
/// # Panics
///
/// Panics if an internal invariant is violated (hashing to the curve or
/// scalar decoding of a freshly generated digest fails); such a failure
/// cannot be triggered by input and indicates broken cryptographic state.
pub fn prove(secret_key: &[u8; SECRET_KEY_SIZE], alpha_string: &[u8]) -> [u8; PROOF_SIZE] {
    prove_inner(secret_key, alpha_string, ChallengeMode::WithPublicKey)
}

/// [`prove`] with the pre-v11 draft challenge transcript (the public key
/// is not hashed).  Proofs produced here do not verify under [`verify`].
pub fn prove_v10(secret_key: &[u8; SECRET_KEY_SIZE], alpha_string: &[u8]) -> [u8; PROOF_SIZE] {
    prove_inner(secret_key, alpha_string, ChallengeMode::Legacy)
}

/// Verify an ECVRF proof against `public_key` and `alpha_string`, per
/// RFC 9381 section 5.3, returning the 64-byte VRF output on success.
///
/// The public key is validated (canonical encoding, not of small order)
/// so that the "full uniqueness" and "full collision resistance"
/// properties hold even for adversarial keys.  All failures are reported
/// as [`Error::InvalidProof`] without further distinction.
pub fn verify(
    public_key: &[u8; PUBLIC_KEY_SIZE],
    pi_string: &[u8],
    alpha_string: &[u8],
) -> Result<[u8; OUTPUT_SIZE], Error> {
    verify_inner(public_key, pi_string, alpha_string, ChallengeMode::WithPublicKey)
}

/// [`verify`] with the pre-v11 draft challenge transcript.
pub fn verify_v10(
    public_key: &[u8; PUBLIC_KEY_SIZE],
    pi_string: &[u8],
    alpha_string: &[u8],
) -> Result<[u8; OUTPUT_SIZE], Error> {
    verify_inner(public_key, pi_string, alpha_string, ChallengeMode::Legacy)
}

/// Compute the VRF output from a proof, per RFC 9381 section 5.2.
///
/// Only Γ is decoded and validated; this should be run on a `pi_string`
/// known to come from [`prove`], or from within [`verify`] (which is the
/// only path that checks the challenge and response).
pub fn proof_to_hash(pi_string: &[u8]) -> Result<[u8; OUTPUT_SIZE], Error> {
    if pi_string.len() != PROOF_SIZE {
        return Err(Error::InvalidInputLength);
    }
    let gamma = decode_point(&pi_string[..32])?;
    Ok(gamma_to_hash(&gamma))
}

fn prove_inner(
    secret_key: &[u8; SECRET_KEY_SIZE],
    alpha_string: &[u8],
    mode: ChallengeMode,
) -> [u8; PROOF_SIZE] {
    let (seed, public_key) = secret_key.split_at(32);
    let expanded = ExpandedSecretKey::from_seed(seed);

    // H = ECVRF_encode_to_curve(Y, alpha_string)
    let h_point = hash_to_curve_h2c_suite(public_key, alpha_string);
    let h_string = h_point.compress();

    // Gamma = x*H
    let gamma = &expanded.scalar * &h_point;
    let gamma_string = gamma.compress();

    // k = ECVRF_nonce_generation(SK, h_string), RFC 8032 style: the wide
    // reduction of SHA-512(nonce_seed || h_string).
    let mut nonce_digest: [u8; 64] = Sha512::new()
        .chain_update(expanded.nonce_seed)
        .chain_update(h_string.as_bytes())
        .finalize()
        .into();
    let k = Scalar::from_bytes_mod_order_wide(&nonce_digest);
    nonce_digest.zeroize();

    // c = ECVRF_challenge_generation([Y,] H, Gamma, k*B, k*H)
    let k_b = EdwardsPoint::mul_base(&k);
    let k_h = &k * &h_point;
    let c = generate_challenge(
        mode,
        public_key,
        h_string.as_bytes(),
        gamma_string.as_bytes(),
        k_b.compress().as_bytes(),
        k_h.compress().as_bytes(),
    );

    // s = (k + c*x) mod q
    let s = k + c * expanded.scalar;

    // pi = point_to_string(Gamma) || int_to_string(c, 16) || int_to_string(s, 32)
    let mut pi_string = [0u8; PROOF_SIZE];
    pi_string[..32].copy_from_slice(gamma_string.as_bytes());
    pi_string[32..48].copy_from_slice(&c.to_bytes()[..16]);
    pi_string[48..].copy_from_slice(&s.to_bytes());
    pi_string
}

fn verify_inner(
    public_key: &[u8; PUBLIC_KEY_SIZE],
    pi_string: &[u8],
    alpha_string: &[u8],
    mode: ChallengeMode,
) -> Result<[u8; OUTPUT_SIZE], Error> {
    let (gamma, c, s) = decode_proof(pi_string).map_err(|_| Error::InvalidProof)?;

    // Decode and validate Y (RFC 9381 section 5.6.1: reject keys in the
    // small subgroup, so that torsion components cannot be smuggled in).
    let y_point = decode_point(public_key).map_err(|_| Error::InvalidProof)?;
    if y_point.is_small_order() {
        return Err(Error::InvalidProof);
    }

    let h_point = hash_to_curve_h2c_suite(public_key, alpha_string);
    let h_string = h_point.compress();

    // U = s*B - c*Y
    let u_point = EdwardsPoint::vartime_double_scalar_mul_basepoint(&c, &-y_point, &s);

    // V = s*H - c*Gamma
    let v_point = EdwardsPoint::vartime_multiscalar_mul(&[s, c], &[h_point, -gamma]);

    let c_prime = generate_challenge(
        mode,
        public_key,
        h_string.as_bytes(),
        gamma.compress().as_bytes(),
        u_point.compress().as_bytes(),
        v_point.compress().as_bytes(),
    );

    if c == c_prime {
        Ok(gamma_to_hash(&gamma))
    } else {
        Err(Error::InvalidProof)
    }
}

/// `ECVRF_challenge_generation` (RFC 9381 section 5.4.3): SHA-512 over
/// the domain-separated point transcript, truncated to 16 bytes and
/// decoded as a scalar.
fn generate_challenge(
    mode: ChallengeMode,
    y_string: &[u8],
    h_string: &[u8],
    gamma_string: &[u8],
    u_string: &[u8],
    v_string: &[u8],
) -> Scalar {
    let mut hasher = Sha512::new();
    hasher.update([SUITE_STRING, TWO_STRING]);
    if mode == ChallengeMode::WithPublicKey {
        hasher.update(y_string);
    }
    hasher.update(h_string);
    hasher.update(gamma_string);
    hasher.update(u_string);
    hasher.update(v_string);
    hasher.update([ZERO_STRING]);
    let digest = hasher.finalize();

    let mut c_bytes = [0u8; 32];
    c_bytes[..16].copy_from_slice(&digest[..16]);
    Option::<Scalar>::from(Scalar::from_canonical_bytes(c_bytes))
        .expect("a 128-bit value is always a canonical scalar")
}

/// `ECVRF_proof_to_hash` steps 4-7: `Hash(suite_string || three_string ||
/// point_to_string(cofactor * Gamma) || zero_string)`.
fn gamma_to_hash(gamma: &EdwardsPoint) -> [u8; OUTPUT_SIZE] {
    let cofactor_gamma = gamma.mul_by_cofactor();

    let mut hasher = Sha512::new();
    hasher.update([SUITE_STRING, THREE_STRING]);
    hasher.update(cofactor_gamma.compress().as_bytes());
    hasher.update([ZERO_STRING]);
    hasher.finalize().into()
}

/// `ECVRF_encode_to_curve` over `Y || alpha_string` with the suite's DST.
///
/// # Panics
///
/// Panics if message expansion fails, which cannot happen for the fixed
/// output size used here.
fn hash_to_curve_h2c_suite(public_key: &[u8], alpha_string: &[u8]) -> EdwardsPoint {
    let mut string_to_hash = Vec::with_capacity(public_key.len() + alpha_string.len());
    string_to_hash.extend_from_slice(public_key);
    string_to_hash.extend_from_slice(alpha_string);

    h2c::edwards25519_xmd_sha512_ell2_nu(H2C_DST, &string_to_hash)
        .expect("encode_to_curve with a fixed-size output cannot fail")
}

/// `ECVRF_decode_proof` (RFC 9381 section 5.4.4).
fn decode_proof(pi_string: &[u8]) -> Result<(EdwardsPoint, Scalar, Scalar), Error> {
    if pi_string.len() != PROOF_SIZE {
        return Err(Error::InvalidInputLength);
    }

    let gamma = decode_point(&pi_string[..32])?;

    // c occupies 16 bytes on the wire and is zero-extended to a scalar.
    let mut c_bytes = [0u8; 32];
    c_bytes[..16].copy_from_slice(&pi_string[32..48]);
    let c = decode_scalar(&c_bytes)?;

    let s_bytes: [u8; 32] = pi_string[48..].try_into().expect("proof length checked");
    let s = decode_scalar(&s_bytes)?;

    Ok((gamma, c, s))
}

/// Decode a point, enforcing the RFC 8032 requirement that the encoding
/// be canonical (re-encoding must reproduce the input byte for byte).
fn decode_point(bytes: &[u8]) -> Result<EdwardsPoint, Error> {
    let compressed = CompressedEdwardsY::from_slice(bytes).map_err(|_| Error::InvalidInputLength)?;
    let point = compressed.decompress().ok_or(Error::InvalidPoint)?;

    if !bool::from(point.compress().as_bytes().ct_eq(compressed.as_bytes())) {
        return Err(Error::NonCanonicalEncoding);
    }

    Ok(point)
}

/// Decode a canonical scalar (rejects values >= the group order).
fn decode_scalar(bytes: &[u8; 32]) -> Result<Scalar, Error> {
    Option::<Scalar>::from(Scalar::from_canonical_bytes(*bytes))
        .ok_or(Error::NonCanonicalEncoding)
}
