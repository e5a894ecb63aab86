//! SHA-256 digest helpers
//!
//! Digests are handled as their 64-character lowercase hex rendering, which is
//! what the reduction function reads.

use crate::constants::DIGEST_HEX_LEN;
use crate::error::DigestError;
use sha2::{Digest, Sha256};

/// SHA-256 digest as lowercase hex ASCII
pub type HexDigest = [u8; DIGEST_HEX_LEN];

/// Hash `input` with SHA-256 and return the lowercase hex digest
#[inline]
pub fn sha256_hex(input: &[u8]) -> HexDigest {
    let raw = Sha256::digest(input);
    let mut out = [0u8; DIGEST_HEX_LEN];
    // 32 bytes always fill the 64-byte buffer exactly
    hex::encode_to_slice(raw, &mut out).expect("hex buffer sized for SHA-256");
    out
}

/// Parse a hex digest, accepting either case and surrounding whitespace
pub fn parse_hex_digest(text: &str) -> Result<HexDigest, DigestError> {
    let text = text.trim();
    if text.len() != DIGEST_HEX_LEN {
        return Err(DigestError::InvalidLength(text.chars().count()));
    }

    let mut out = [0u8; DIGEST_HEX_LEN];
    for (slot, c) in out.iter_mut().zip(text.chars()) {
        if !c.is_ascii_hexdigit() {
            return Err(DigestError::InvalidCharacter(c));
        }
        *slot = c.to_ascii_lowercase() as u8;
    }
    Ok(out)
}

/// Render a digest as a `&str`
pub fn digest_str(digest: &HexDigest) -> &str {
    // Only ever filled with ASCII hex characters.
    std::str::from_utf8(digest).unwrap_or_default()
}
