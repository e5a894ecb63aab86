//! sha-rainbow - Rainbow table implementation for fixed-length SHA-256 passwords
//!
//! This crate provides functionality to:
//! - Generate rainbow tables of (head, tail) chains over the 62-symbol alphanumeric alphabet
//! - Store tables in a compact 16-byte-per-entry binary layout (6-bit character packing)
//! - Recover passwords from SHA-256 digests using a sorted table

pub mod app;
pub mod constants;
pub mod domain;
pub mod error;
pub mod infra;

// Re-export commonly used types
pub use app::attacker::{AttackOptions, TailLookup, attack, attack_batch, attack_multi_length};
pub use app::cancel::CancellationToken;
pub use app::generator::{
    GenerationOptions, GenerationReport, generate_and_save, generate_multi_length, generate_table,
};
pub use app::registry::{LoadedTable, TableRegistry};
pub use constants::*;
pub use domain::chain::ChainEntry;
pub use domain::codec::{decode, encode};
pub use domain::config::TableConfig;
pub use domain::digest::{HexDigest, parse_hex_digest, sha256_hex};
pub use domain::reduction::reduce;
pub use error::{CodecError, ConfigError, DigestError, TableError};
