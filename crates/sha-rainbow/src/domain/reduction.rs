//! Reduction function
//!
//! Maps a hex digest and a chain position to a candidate password.
//!
//! The essence of rainbow tables: the chain position (column) enters the
//! reduction twice, inside and outside the XOR, so the same digest reduces to
//! different passwords at different depths of a chain.

use crate::constants::{CHARSET, CHARSET_SIZE, MAX_REDUCTION_OFFSET, REDUCTION_OFFSETS};

/// Reduce `digest` into `out`, filling all of `out.len()` characters
///
/// For output index `i`:
/// `(d[i] ^ p) + d[i+3] + d[i+5] + d[i+7] + d[i+9] + d[i+17] + p  (mod 62)`
///
/// `digest` must hold at least `out.len() + 17` bytes.
#[inline]
pub fn reduce_into(digest: &[u8], position: u32, out: &mut [u8]) {
    debug_assert!(digest.len() >= out.len() + MAX_REDUCTION_OFFSET);

    let p = position as u64;
    for (i, slot) in out.iter_mut().enumerate() {
        let mut sum = (digest[i] as u64 ^ p) + p;
        for offset in REDUCTION_OFFSETS {
            sum += digest[i + offset] as u64;
        }
        *slot = CHARSET[(sum % CHARSET_SIZE as u64) as usize];
    }
}

/// Reduce `digest` to a new password of `length` characters
pub fn reduce(digest: &[u8], length: usize, position: u32) -> Vec<u8> {
    let mut out = vec![0u8; length];
    reduce_into(digest, position, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH};
    use crate::domain::digest::sha256_hex;

    #[test]
    fn test_reduce_deterministic() {
        let digest = sha256_hex(b"abc123");
        for position in 0..100 {
            assert_eq!(reduce(&digest, 8, position), reduce(&digest, 8, position));
        }
    }

    #[test]
    fn test_reduce_length_and_alphabet() {
        let digest = sha256_hex(b"hello world");
        for length in MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH {
            for position in [0u32, 1, 17, 1000, u32::MAX] {
                let reduced = reduce(&digest, length, position);
                assert_eq!(reduced.len(), length);
                assert!(reduced.iter().all(|c| c.is_ascii_alphanumeric()));
            }
        }
    }

    #[test]
    fn test_reduce_position_sensitive() {
        let digest = sha256_hex(b"position");
        assert_ne!(reduce(&digest, 6, 0), reduce(&digest, 6, 1));
    }

    #[test]
    fn test_reduce_manual_first_character() {
        let digest = sha256_hex(b"abc");
        let position = 5u64;
        let d = |i: usize| digest[i] as u64;
        let idx = ((d(0) ^ position) + d(3) + d(5) + d(7) + d(9) + d(17) + position) % 62;

        let reduced = reduce(&digest, 6, position as u32);
        assert_eq!(reduced[0], CHARSET[idx as usize]);
    }

    #[test]
    fn test_reduce_into_matches_reduce() {
        let digest = sha256_hex(b"buffer");
        let mut out = [0u8; 7];
        reduce_into(&digest, 42, &mut out);
        assert_eq!(out.to_vec(), reduce(&digest, 7, 42));
    }

    #[test]
    fn test_reduce_max_length_fits_digest() {
        // The highest index read is 9 + 17 = 26, well inside 64 hex chars.
        let digest = [b'f'; 64];
        let reduced = reduce(&digest, MAX_PASSWORD_LENGTH, 0);
        assert_eq!(reduced.len(), MAX_PASSWORD_LENGTH);
    }
}
