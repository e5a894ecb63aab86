//! Table sort operations
//!
//! This module provides functions for sorting rainbow table entries by tail.
//! Colliding tails end up adjacent and are pruned when the table is saved.

use crate::domain::chain::ChainEntry;
use rayon::prelude::*;

/// Sort table entries by tail using parallel sort
pub fn sort_table_parallel(entries: &mut [ChainEntry]) {
    entries.par_sort_unstable_by_key(|entry| entry.tail);
}

/// Check that entries are sorted by tail
pub fn is_sorted_by_tail(entries: &[ChainEntry]) -> bool {
    entries.windows(2).all(|w| w[0].tail <= w[1].tail)
}
