//! Work partitioning
//!
//! Splits `[0, total)` into one contiguous range per worker. Every worker gets
//! `total / workers` items and the last one also takes the remainder, so the
//! ranges cover the whole interval with no gap and no overlap.

use std::ops::Range;

/// Partition `[0, total)` into `workers` contiguous ranges
///
/// `workers == 0` is treated as a single worker.
pub fn partition(total: usize, workers: usize) -> Vec<Range<usize>> {
    let workers = workers.max(1);
    let chunk = total / workers;

    (0..workers)
        .map(|i| {
            let start = i * chunk;
            let end = if i == workers - 1 { total } else { start + chunk };
            start..end
        })
        .collect()
}

/// Split `items` into disjoint mutable slices following `ranges`
///
/// `ranges` must be contiguous and start at 0, as produced by [`partition`].
pub fn split_by_ranges<'a, T>(mut items: &'a mut [T], ranges: &[Range<usize>]) -> Vec<&'a mut [T]> {
    let mut slices = Vec::with_capacity(ranges.len());
    for range in ranges {
        let (head, rest) = std::mem::take(&mut items).split_at_mut(range.len());
        slices.push(head);
        items = rest;
    }
    slices
}
