//! Error types
//!
//! Collisions, unrecovered digests and cancellation are regular outcomes and
//! have no variant here.

use std::io;
use thiserror::Error;

/// Codec errors (invalid argument to encode/decode)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Password length outside the supported range
    #[error("password length must be between 6 and 10, got {0}")]
    InvalidLength(usize),
    /// Character outside `[0-9A-Za-z]`
    #[error("invalid character {byte:#04x} at position {index}")]
    InvalidCharacter { byte: u8, index: usize },
    /// 6-bit group that does not map to any character (> 61)
    #[error("invalid 6-bit symbol {value} at position {index}")]
    InvalidSymbol { value: u8, index: usize },
}

/// Table configuration errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Password length outside the supported range
    #[error("unsupported password length {0} (expected 6 to 10)")]
    UnsupportedLength(usize),
    /// Chain length of zero
    #[error("chain length must be at least 1")]
    ZeroChainLength,
    /// Target size that is zero, negative or not finite
    #[error("invalid table size {0} GB")]
    InvalidSize(f64),
    /// File name not following the table naming convention
    #[error("cannot infer table parameters from file name '{0}'")]
    UnrecognizedFileName(String),
}

/// Errors parsing a target digest
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DigestError {
    /// Digest with the wrong number of hex characters
    #[error("digest must be 64 hex characters, got {0}")]
    InvalidLength(usize),
    /// Non-hex character in the digest
    #[error("invalid hex character {0:?} in digest")]
    InvalidCharacter(char),
}

/// Errors raised by table generation, storage and loading
#[derive(Debug, Error)]
pub enum TableError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// Corrupt or invalid password code
    #[error(transparent)]
    Codec(#[from] CodecError),
    /// Invalid table parameters
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result alias for table operations
pub type TableResult<T> = Result<T, TableError>;
