//! Chain operations implementation
//!
//! This module provides the chain entry structure and functions for
//! chain generation and verification in rainbow table operations.
//!
//! A chain of length `t` over passwords of length `L`:
//!
//! ```text
//! head -> H -> R(0) -> H -> R(1) -> ... -> H -> R(t) = tail
//! ```
//!
//! The column of a digest is the number of reductions applied before it,
//! so the digest of the head sits at column 0.

use crate::domain::codec::encode;
use crate::domain::digest::{HexDigest, sha256_hex};
use crate::domain::reduction::reduce_into;
use crate::error::CodecError;

/// Chain entry structure
///
/// File format: (head, tail), both 6-bit packed password codes
/// Sort order: tail ascending
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ChainEntry {
    /// Encoded starting password of the chain
    pub head: u64,
    /// Encoded final password of the chain
    pub tail: u64,
}

impl ChainEntry {
    /// Create a new chain entry
    pub fn new(head: u64, tail: u64) -> Self {
        Self { head, tail }
    }
}

/// Compute a single chain and return its tail
///
/// Starting from `head`, repeat hash → reduce `chain_length` times, then
/// reduce the last digest once more at position `chain_length`.
pub fn compute_chain(head: &[u8], chain_length: u32) -> Vec<u8> {
    let mut digest = sha256_hex(head);
    let mut current = vec![0u8; head.len()];

    for n in 0..chain_length {
        reduce_into(&digest, n, &mut current);
        digest = sha256_hex(&current);
    }
    reduce_into(&digest, chain_length, &mut current);

    current
}

/// Compute a chain and encode it as a table entry
pub fn compute_entry(head: &[u8], chain_length: u32) -> Result<ChainEntry, CodecError> {
    let tail = compute_chain(head, chain_length);
    Ok(ChainEntry::new(encode(head)?, encode(&tail)?))
}

/// Compute the tail a chain would end with if `target` sat at `column`
///
/// Applies reduce/hash rounds at positions `column..chain_length`, then the
/// final reduction at `chain_length`.
pub fn tail_from_column(
    target: &HexDigest,
    column: u32,
    chain_length: u32,
    password_length: usize,
) -> Vec<u8> {
    let mut digest = *target;
    let mut current = vec![0u8; password_length];

    for n in column..chain_length {
        reduce_into(&digest, n, &mut current);
        digest = sha256_hex(&current);
    }
    reduce_into(&digest, chain_length, &mut current);

    current
}

/// Replay a chain from its head looking for `target` up to `column`
///
/// Checks the digest at every column from 0 to `column` inclusive and returns
/// the password that hashes to `target`. Returns `None` if the chain never
/// produces `target` (a false alarm caused by merging chains).
pub fn verify_chain(head: &[u8], column: u32, target: &HexDigest) -> Option<Vec<u8>> {
    let mut current = head.to_vec();

    for n in 0..=column {
        let digest = sha256_hex(&current);
        if digest == *target {
            return Some(current);
        }
        if n < column {
            reduce_into(&digest, n, &mut current);
        }
    }

    None
}
