//! Random password generation

use crate::constants::CHARSET;
use rand::Rng;

/// Fill `out` with characters drawn uniformly from the alphabet
#[inline]
pub fn fill_random_password<R: Rng + ?Sized>(rng: &mut R, out: &mut [u8]) {
    for slot in out.iter_mut() {
        *slot = CHARSET[rng.gen_range(0..CHARSET.len())];
    }
}

/// Generate a random password of `length` characters
pub fn random_password<R: Rng + ?Sized>(rng: &mut R, length: usize) -> Vec<u8> {
    let mut out = vec![0u8; length];
    fill_random_password(rng, &mut out);
    out
}
