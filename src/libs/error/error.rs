use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Every structural failure of an encode, corruption, decode or experiment run. A detected
/// corruption (non-zero remainder) is a normal outcome, never one of these.
#[derive(Debug, Error)]
pub enum Error {
    /// Bitwise operation or comparison between streams of unequal length.
    #[error("length mismatch: {left} bits vs {right} bits")]
    LengthMismatch { left: usize, right: usize },

    #[error("invalid range {lo}..{hi} of a {len} bit stream")]
    Range { lo: usize, hi: usize, len: usize },

    #[error("bit index {index} out of range of a {len} bit stream")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("invalid bit string {0:?}: only '0' and '1' are allowed")]
    InvalidBitString(String),

    /// Generator polynomials need at least two bits and a leading 1.
    #[error("invalid generator polynomial {0:?}")]
    InvalidPolynomial(String),

    #[error("burst length {0} is too short; at least 2 bits are needed")]
    InvalidBurstLength(usize),

    #[error("could not read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "./error_spec.rs"]
mod error_spec;
