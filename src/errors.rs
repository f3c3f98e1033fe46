// -*- mode: rust; -*-
//
// This file is part of ecvrf-dalek.
// See LICENSE for licensing information.

//! Errors which may occur while hashing to the curve or while decoding
//! and verifying VRF proofs.

use core::fmt;
use core::fmt::Display;

/// Errors raised by the hash-to-curve suites and the VRF.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Error {
    /// An input was not of the expected length (e.g. a proof that is not
    /// exactly 80 bytes).
    InvalidInputLength,
    /// A point or scalar decoded successfully but re-encoding it does not
    /// reproduce the input, as required by the RFC 8032 decode semantics.
    NonCanonicalEncoding,
    /// Point decompression failed.
    InvalidPoint,
    /// The proof failed to verify.
    ///
    /// Every verification-time failure is collapsed into this one kind so
    /// that callers cannot distinguish a malformed public key from a
    /// malformed or forged proof.
    InvalidProof,
    /// The requested `expand_message` output length exceeds the RFC 9380
    /// limits.
    ExpandMessageOutOfRange,
    /// A precomputed constant failed its derivation self-check, which
    /// indicates a corrupted build rather than bad input.
    InternalInvariant,
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Error::InvalidInputLength => write!(f, "Input is not of the expected length"),
            Error::NonCanonicalEncoding => {
                write!(f, "Encoding is non-canonical: re-encoding differs from input")
            }
            Error::InvalidPoint => write!(f, "Cannot decompress Edwards point"),
            Error::InvalidProof => write!(f, "VRF proof verification failed"),
            Error::ExpandMessageOutOfRange => {
                write!(f, "expand_message output length is out of range")
            }
            Error::InternalInvariant => {
                write!(f, "Internal invariant violated: constant self-check failed")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
