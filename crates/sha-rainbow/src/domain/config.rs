//! Table parameters and file naming
//!
//! Table files carry no header, so the parameters needed to read them back
//! (password length, chain length) travel in the file name:
//! `rainbowTable-{length}-{chain}-{size:.3}.bin`, with `-incomplete` before
//! the extension when generation was cancelled.

use crate::constants::{
    BYTES_PER_GB, CHAIN_ENTRY_SIZE, DIGEST_HEX_LEN, INCOMPLETE_SUFFIX, MAX_PASSWORD_LENGTH,
    MAX_REDUCTION_OFFSET, MIN_PASSWORD_LENGTH, TABLE_FILE_EXTENSION, TABLE_FILE_PREFIX,
};
use crate::error::ConfigError;
use std::path::Path;

/// Parameters of one rainbow table
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TableConfig {
    /// Number of characters of every password in the table
    pub password_length: usize,
    /// Number of hash/reduce steps per chain
    pub chain_length: u32,
    /// Target file size in (decimal) gigabytes
    pub target_size_gb: f64,
}

impl TableConfig {
    /// Create a validated configuration
    pub fn new(
        password_length: usize,
        chain_length: u32,
        target_size_gb: f64,
    ) -> Result<Self, ConfigError> {
        check_chain_shape(password_length, chain_length)?;
        if !target_size_gb.is_finite() || target_size_gb <= 0.0 {
            return Err(ConfigError::InvalidSize(target_size_gb));
        }

        Ok(Self {
            password_length,
            chain_length,
            target_size_gb,
        })
    }

    /// Target size in bytes
    pub fn target_size_bytes(&self) -> u64 {
        (self.target_size_gb * BYTES_PER_GB).round() as u64
    }

    /// Number of entries that fit in the target size (16 bytes each)
    pub fn max_entries(&self) -> usize {
        (self.target_size_bytes() / CHAIN_ENTRY_SIZE as u64) as usize
    }

    /// File name of the generated table
    pub fn file_name(&self, incomplete: bool) -> String {
        format!(
            "{}-{}-{}-{:.3}{}.{}",
            TABLE_FILE_PREFIX,
            self.password_length,
            self.chain_length,
            self.target_size_gb,
            if incomplete { INCOMPLETE_SUFFIX } else { "" },
            TABLE_FILE_EXTENSION
        )
    }

    /// Recover the configuration from a table file name
    ///
    /// Returns the configuration and whether the file is marked incomplete.
    /// The size segment is informational: it is rounded to three decimals in
    /// the name, so small tables read back as `0.000` and are still accepted.
    pub fn from_file_name(path: impl AsRef<Path>) -> Result<(Self, bool), ConfigError> {
        let path = path.as_ref();
        let unrecognized = || ConfigError::UnrecognizedFileName(path.display().to_string());

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(unrecognized)?;
        let stem = name
            .strip_suffix(TABLE_FILE_EXTENSION)
            .and_then(|s| s.strip_suffix('.'))
            .ok_or_else(unrecognized)?;
        let (stem, incomplete) = match stem.strip_suffix(INCOMPLETE_SUFFIX) {
            Some(s) => (s, true),
            None => (stem, false),
        };

        let mut parts = stem.split('-');
        if parts.next() != Some(TABLE_FILE_PREFIX) {
            return Err(unrecognized());
        }
        let password_length: usize = parts
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or_else(unrecognized)?;
        let chain_length: u32 = parts
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or_else(unrecognized)?;
        let target_size_gb: f64 = parts
            .next()
            .and_then(|s| s.parse().ok())
            .filter(|size: &f64| size.is_finite())
            .ok_or_else(unrecognized)?;
        if parts.next().is_some() {
            return Err(unrecognized());
        }

        check_chain_shape(password_length, chain_length)?;
        Ok((
            Self {
                password_length,
                chain_length,
                target_size_gb,
            },
            incomplete,
        ))
    }
}

/// Validate the parameters needed to walk and store chains
fn check_chain_shape(password_length: usize, chain_length: u32) -> Result<(), ConfigError> {
    if !(MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH).contains(&password_length)
        || password_length + MAX_REDUCTION_OFFSET > DIGEST_HEX_LEN
    {
        return Err(ConfigError::UnsupportedLength(password_length));
    }
    if chain_length == 0 {
        return Err(ConfigError::ZeroChainLength);
    }
    Ok(())
}
