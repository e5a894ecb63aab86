//! Rainbow table related constants

// =============================================================================
// Password alphabet
// =============================================================================

/// Alphabet used by the reduction function and random head generation
///
/// The order (lowercase, uppercase, digits) is part of the table format:
/// changing it changes every chain.
pub const CHARSET: &[u8; 62] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Number of symbols in the alphabet
pub const CHARSET_SIZE: usize = 62;

/// Shortest supported password length
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Longest supported password length (10 * 6 bits = 60 bits fit in a u64)
pub const MAX_PASSWORD_LENGTH: usize = 10;

/// Bits used per character by the codec
pub const BITS_PER_CHAR: u32 = 6;

// =============================================================================
// Digest and reduction parameters
// =============================================================================

/// Length of a SHA-256 digest rendered as lowercase hex
pub const DIGEST_HEX_LEN: usize = 64;

/// Digest offsets summed by the reduction function for each output character
pub const REDUCTION_OFFSETS: [usize; 5] = [3, 5, 7, 9, 17];

/// Largest digest offset read past the character index
pub const MAX_REDUCTION_OFFSET: usize = 17;

// =============================================================================
// Table sizing
// =============================================================================

/// Bytes per gigabyte used when sizing tables (decimal)
pub const BYTES_PER_GB: f64 = 1e9;

/// Number of progress reports emitted over a full generation
pub const PROGRESS_STEPS: usize = 100;

// =============================================================================
// File format
// =============================================================================

/// Byte size of a chain entry (two little-endian u64 codes)
pub const CHAIN_ENTRY_SIZE: usize = 16;

/// Prefix of every table file name
pub const TABLE_FILE_PREFIX: &str = "rainbowTable";

/// Suffix marking a table whose generation was cancelled
pub const INCOMPLETE_SUFFIX: &str = "-incomplete";

/// Extension of table files
pub const TABLE_FILE_EXTENSION: &str = "bin";

/// Marker written for digests that could not be cracked
pub const NOT_FOUND_MARKER: &str = "?";
