// -*- mode: rust; -*-
//
// This file is part of ecvrf-dalek.
// See LICENSE for licensing information.

//! # ecvrf-dalek
//!
//! Hashing to Curve25519 and a verifiable random function, built on
//! [`curve25519-dalek`](https://docs.rs/curve25519-dalek).
//!
//! Two constructions are provided:
//!
//! * **Hash-to-curve** ([`h2c`]): the RFC 9380 suites
//!   `edwards25519_XMD:SHA-512_ELL2_{RO,NU}_` and
//!   `curve25519_XMD:SHA-512_ELL2_{RO,NU}_`, together with generic
//!   variants parameterised over any suitable fixed-output hash or
//!   extendable-output function.
//! * **ECVRF** ([`vrf`]): the `ECVRF-EDWARDS25519-SHA512-ELL2` suite of
//!   RFC 9381, with `_v10` variants implementing the pre-draft-11
//!   challenge transcript for interoperability with older deployments.
//!
//! # Example
//!
//! ```
//! use ecvrf_dalek::vrf;
//!
//! // An Ed25519 private key: 32-byte seed followed by the public key.
//! let signing_key = ed25519_dalek::SigningKey::from_bytes(&[42u8; 32]);
//! let mut secret_key = [0u8; vrf::SECRET_KEY_SIZE];
//! secret_key[..32].copy_from_slice(signing_key.as_bytes());
//! secret_key[32..].copy_from_slice(signing_key.verifying_key().as_bytes());
//! let public_key = signing_key.verifying_key().to_bytes();
//!
//! let pi = vrf::prove(&secret_key, b"example input");
//! let beta = vrf::verify(&public_key, &pi, b"example input").expect("proof is valid");
//! assert_eq!(beta, vrf::proof_to_hash(&pi).unwrap());
//! ```
//!
//! All prove-side operations are constant time with respect to secret
//! material; verification uses variable-time arithmetic, as every input
//! on that side is public.

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

extern crate alloc;

mod constants;
mod errors;
mod field;
mod montgomery;

pub mod elligator2;
pub mod h2c;
pub mod vrf;

pub use crate::errors::Error;
pub use crate::montgomery::MontgomeryPoint;

// Re-exported so that callers can name the point type returned by the
// edwards25519 suites without adding a direct dependency.
pub use curve25519_dalek::edwards::EdwardsPoint;
