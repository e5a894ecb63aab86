//! Attack workflow implementation
//!
//! Recovers passwords from SHA-256 digests with a table sorted by tail.
//!
//! For a target digest, every column from the end of the chain back to 0 is
//! tried: the digest is walked forward to a candidate tail, every chain ending
//! with that tail is replayed from its head, and a hit is confirmed by hashing.

use crate::app::cancel::CancellationToken;
use crate::app::registry::{LoadedTable, TableRegistry};
use crate::constants::{MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH};
use crate::domain::chain::{ChainEntry, tail_from_column, verify_chain};
use crate::domain::codec::{decode, encode};
use crate::domain::digest::{HexDigest, parse_hex_digest};
use crate::domain::partition::{partition, split_by_ranges};
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info, warn};

#[cfg(feature = "mmap")]
use crate::infra::table_io::MappedTable;

#[cfg(feature = "hashmap-search")]
use rustc_hash::FxHashMap;

/// Lookup of chain heads by encoded tail
pub trait TailLookup: Sync {
    /// Heads of all chains ending with `tail`
    fn heads(&self, tail: u64) -> impl Iterator<Item = u64> + '_;
}

impl TailLookup for [ChainEntry] {
    /// Binary search for the first entry with `tail`, then every equal one
    fn heads(&self, tail: u64) -> impl Iterator<Item = u64> + '_ {
        let start = self.partition_point(|entry| entry.tail < tail);
        self[start..]
            .iter()
            .take_while(move |entry| entry.tail == tail)
            .map(|entry| entry.head)
    }
}

impl TailLookup for LoadedTable {
    fn heads(&self, tail: u64) -> impl Iterator<Item = u64> + '_ {
        self.entries.as_slice().heads(tail)
    }
}

#[cfg(feature = "mmap")]
impl TailLookup for MappedTable {
    fn heads(&self, tail: u64) -> impl Iterator<Item = u64> + '_ {
        let mut left = 0;
        let mut right = self.len();
        while left < right {
            let mid = left + (right - left) / 2;
            match self.get(mid) {
                Some(entry) if entry.tail < tail => left = mid + 1,
                _ => right = mid,
            }
        }

        (left..self.len())
            .map_while(move |i| self.get(i).filter(|entry| entry.tail == tail))
            .map(|entry| entry.head)
    }
}

// =============================================================================
// HashMap-based lookup (hashmap-search feature)
// =============================================================================

/// Tail → heads index for O(1) lookups
#[cfg(feature = "hashmap-search")]
#[derive(Debug, Default, Clone)]
pub struct TailIndex {
    map: FxHashMap<u64, Vec<u64>>,
}

#[cfg(feature = "hashmap-search")]
impl TailIndex {
    /// Index a table; entries need not be sorted
    pub fn build(entries: &[ChainEntry]) -> Self {
        let mut map: FxHashMap<u64, Vec<u64>> = FxHashMap::default();
        map.reserve(entries.len());
        for entry in entries {
            map.entry(entry.tail).or_default().push(entry.head);
        }
        Self { map }
    }

    /// Number of distinct tails
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(feature = "hashmap-search")]
impl TailLookup for TailIndex {
    fn heads(&self, tail: u64) -> impl Iterator<Item = u64> + '_ {
        self.map.get(&tail).into_iter().flatten().copied()
    }
}

// =============================================================================
// Single target
// =============================================================================

/// Recover the password behind `target`
///
/// Returns `None` if no chain of the table covers the digest, including when
/// `password_length` is not supported by the codec.
pub fn attack<T>(
    target: &HexDigest,
    chain_length: u32,
    password_length: usize,
    table: &T,
) -> Option<String>
where
    T: TailLookup + ?Sized,
{
    if !(MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH).contains(&password_length) {
        return None;
    }

    for column in (0..=chain_length).rev() {
        let tail = tail_from_column(target, column, chain_length, password_length);
        let tail_code = encode(&tail).ok()?;

        for head_code in table.heads(tail_code) {
            // Corrupt records are skipped, not fatal
            let Ok(head) = decode(head_code, password_length) else {
                continue;
            };
            if let Some(password) = verify_chain(&head, column, target) {
                return Some(password.into_iter().map(char::from).collect());
            }
            debug!(column, "false alarm");
        }
    }

    None
}

// =============================================================================
// Batch
// =============================================================================

/// Options for batch attacks
#[derive(Clone)]
pub struct AttackOptions<F = fn(usize, usize)> {
    /// Number of partitions (0 = rayon pool size)
    pub workers: usize,
    /// Progress callback (processed, total)
    pub on_progress: Option<F>,
}

impl Default for AttackOptions<fn(usize, usize)> {
    fn default() -> Self {
        Self {
            workers: 0,
            on_progress: None,
        }
    }
}

impl<F> AttackOptions<F> {
    /// Set the number of partitions
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Set the progress callback
    pub fn with_progress<G>(self, callback: G) -> AttackOptions<G> {
        AttackOptions {
            workers: self.workers,
            on_progress: Some(callback),
        }
    }

    fn worker_count(&self) -> usize {
        if self.workers == 0 {
            rayon::current_num_threads()
        } else {
            self.workers
        }
    }
}

/// Attack a list of hex digests
///
/// Results are in input order. Digests that fail to parse, and digests not
/// yet reached when `token` is raised, stay `None`.
pub fn attack_batch<S, T, F>(
    targets: &[S],
    chain_length: u32,
    password_length: usize,
    table: &T,
    token: &CancellationToken,
    options: &AttackOptions<F>,
) -> Vec<Option<String>>
where
    S: AsRef<str> + Sync,
    T: TailLookup + ?Sized,
    F: Fn(usize, usize) + Sync,
{
    let total = targets.len();
    let mut results: Vec<Option<String>> = vec![None; total];

    let ranges = partition(total, options.worker_count());
    let processed = AtomicUsize::new(0);
    let on_progress = options.on_progress.as_ref();

    ranges
        .par_iter()
        .zip(split_by_ranges(&mut results, &ranges).into_par_iter())
        .for_each(|(range, slots)| {
            for (target, slot) in targets[range.clone()].iter().zip(slots.iter_mut()) {
                if token.is_cancelled() {
                    break;
                }

                *slot = match parse_hex_digest(target.as_ref()) {
                    Ok(digest) => attack(&digest, chain_length, password_length, table),
                    Err(e) => {
                        warn!(target = target.as_ref(), error = %e, "skipping invalid digest");
                        None
                    }
                };

                let done = processed.fetch_add(1, Ordering::Relaxed) + 1;
                if let Some(callback) = on_progress {
                    callback(done, total);
                }
            }
        });

    let recovered = results.iter().filter(|r| r.is_some()).count();
    info!(password_length, recovered, total, "batch attack finished");
    if token.is_cancelled() {
        warn!("batch attack cancelled, results are partial");
    }

    results
}

/// Attack a list of hex digests with every table of `registry`
///
/// One batch per registered password length runs concurrently. For every
/// digest the shortest length that recovered a password wins.
///
/// Progress is reported across all lengths: `total` is the number of digests
/// times the number of tables.
pub fn attack_multi_length<S, F>(
    targets: &[S],
    registry: &TableRegistry,
    token: &CancellationToken,
    options: &AttackOptions<F>,
) -> Vec<Option<String>>
where
    S: AsRef<str> + Sync,
    F: Fn(usize, usize) + Sync,
{
    let tables: Vec<&LoadedTable> = registry.iter().collect();

    let grand_total = targets.len() * tables.len();
    let processed = AtomicUsize::new(0);
    let on_progress = options.on_progress.as_ref();
    let per_length_options = AttackOptions {
        workers: options.workers,
        on_progress: Some(|_: usize, _: usize| {
            let done = processed.fetch_add(1, Ordering::Relaxed) + 1;
            if let Some(callback) = on_progress {
                callback(done, grand_total);
            }
        }),
    };

    let per_length: Vec<Vec<Option<String>>> = tables
        .par_iter()
        .map(|table| {
            attack_batch(
                targets,
                table.chain_length,
                table.password_length,
                *table,
                token,
                &per_length_options,
            )
        })
        .collect();

    (0..targets.len())
        .map(|i| per_length.iter().find_map(|results| results[i].clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::generator::generate_table_from_heads;
    use crate::domain::chain::compute_chain;
    use crate::domain::digest::{digest_str, sha256_hex};
    use crate::domain::reduction::reduce;
    use crate::infra::table_sort::sort_table_parallel;
    use std::sync::Mutex;

    const HEADS: [&str; 4] = ["abc123", "Passw0", "zZ9yY8", "qwerty"];

    fn sorted_table(heads: &[&str], chain_length: u32) -> Vec<ChainEntry> {
        let mut entries = generate_table_from_heads(heads, chain_length).unwrap();
        sort_table_parallel(&mut entries);
        entries
    }

    fn hex(password: &[u8]) -> String {
        digest_str(&sha256_hex(password)).to_string()
    }

    /// Passwords hashed inside a chain, columns 0 to `chain_length`
    fn hashed_passwords(head: &[u8], chain_length: u32) -> Vec<Vec<u8>> {
        let mut passwords = vec![head.to_vec()];
        for n in 0..chain_length {
            let last = &passwords[passwords.len() - 1];
            passwords.push(reduce(&sha256_hex(last), head.len(), n));
        }
        passwords
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    #[test]
    fn test_slice_lookup_returns_equal_run() {
        let table = vec![
            ChainEntry::new(1, 10),
            ChainEntry::new(2, 20),
            ChainEntry::new(3, 20),
            ChainEntry::new(4, 30),
        ];
        assert_eq!(table.heads(20).collect::<Vec<_>>(), vec![2, 3]);
        assert_eq!(table.heads(10).collect::<Vec<_>>(), vec![1]);
        assert_eq!(table.heads(25).count(), 0);
        assert_eq!(table.heads(99).count(), 0);
    }

    #[test]
    fn test_slice_lookup_empty_table() {
        let table: Vec<ChainEntry> = vec![];
        assert_eq!(table.as_slice().heads(0).count(), 0);
    }

    #[cfg(feature = "hashmap-search")]
    #[test]
    fn test_tail_index_matches_slice_lookup() {
        let table = sorted_table(&HEADS, 10);
        let index = TailIndex::build(&table);
        assert!(!index.is_empty());

        for entry in &table {
            let mut from_index: Vec<u64> = index.heads(entry.tail).collect();
            let mut from_slice: Vec<u64> = table.as_slice().heads(entry.tail).collect();
            from_index.sort_unstable();
            from_slice.sort_unstable();
            assert_eq!(from_index, from_slice);
        }
    }

    // =========================================================================
    // Single target
    // =========================================================================

    #[test]
    fn test_attack_recovers_head() {
        let table = sorted_table(&HEADS, 10);
        let target = sha256_hex(b"abc123");
        assert_eq!(attack(&target, 10, 6, table.as_slice()), Some("abc123".to_string()));
    }

    #[test]
    fn test_attack_recovers_every_column() {
        let table = sorted_table(&HEADS, 10);
        let passwords = hashed_passwords(b"Passw0", 10);
        assert_eq!(passwords.len(), 11);

        for password in &passwords {
            let found = attack(&sha256_hex(password), 10, 6, table.as_slice())
                .expect("password in chain should be recovered");
            assert_eq!(sha256_hex(found.as_bytes()), sha256_hex(password));
        }
    }

    #[test]
    fn test_attack_absent_password() {
        let table = sorted_table(&HEADS, 10);
        let target = sha256_hex(b"nothere");
        assert_eq!(attack(&target, 10, 6, table.as_slice()), None);
    }

    #[test]
    fn test_attack_false_alarm_only() {
        // Tail matches the target at the last column, but the head's chain
        // never produces the target digest
        let target = sha256_hex(b"Passw0");
        let decoy_tail = tail_from_column(&target, 10, 10, 6);
        let table = vec![ChainEntry::new(
            encode(b"abc123").unwrap(),
            encode(&decoy_tail).unwrap(),
        )];

        assert_eq!(attack(&target, 10, 6, table.as_slice()), None);
    }

    #[test]
    fn test_attack_skips_false_alarm_in_equal_tails() {
        let target = sha256_hex(b"Passw0");
        let shared_tail = encode(&compute_chain(b"Passw0", 10)).unwrap();
        let mut table = vec![
            ChainEntry::new(encode(b"abc123").unwrap(), shared_tail),
            ChainEntry::new(encode(b"Passw0").unwrap(), shared_tail),
            ChainEntry::new(encode(b"qwerty").unwrap(), shared_tail),
        ];
        sort_table_parallel(&mut table);

        assert_eq!(attack(&target, 10, 6, table.as_slice()), Some("Passw0".to_string()));
    }

    #[test]
    fn test_attack_empty_table() {
        let table: Vec<ChainEntry> = vec![];
        assert_eq!(attack(&sha256_hex(b"abc123"), 10, 6, table.as_slice()), None);
    }

    #[test]
    fn test_attack_unsupported_length() {
        let table = sorted_table(&HEADS, 10);
        assert_eq!(attack(&sha256_hex(b"abc123"), 10, 4, table.as_slice()), None);
    }

    #[cfg(feature = "hashmap-search")]
    #[test]
    fn test_attack_with_tail_index() {
        let table = sorted_table(&HEADS, 10);
        let index = TailIndex::build(&table);
        assert_eq!(
            attack(&sha256_hex(b"qwerty"), 10, 6, &index),
            Some("qwerty".to_string())
        );
    }

    // =========================================================================
    // Batch
    // =========================================================================

    #[test]
    fn test_attack_batch_preserves_order() {
        let table = sorted_table(&HEADS, 10);
        let targets = vec![
            hex(b"zZ9yY8"),
            hex(b"absent"),
            "not a digest".to_string(),
            hex(b"abc123"),
        ];

        let results = attack_batch(
            &targets,
            10,
            6,
            table.as_slice(),
            &CancellationToken::new(),
            &AttackOptions::default().with_workers(3),
        );

        assert_eq!(
            results,
            vec![Some("zZ9yY8".to_string()), None, None, Some("abc123".to_string())]
        );
    }

    #[test]
    fn test_attack_batch_more_workers_than_targets() {
        let table = sorted_table(&HEADS, 10);
        let targets = [hex(b"Passw0")];

        let results = attack_batch(
            &targets,
            10,
            6,
            table.as_slice(),
            &CancellationToken::new(),
            &AttackOptions::default().with_workers(8),
        );
        assert_eq!(results, vec![Some("Passw0".to_string())]);
    }

    #[test]
    fn test_attack_batch_cancelled() {
        let table = sorted_table(&HEADS, 10);
        let targets = vec![hex(b"abc123"); 5];
        let token = CancellationToken::new();
        token.cancel();

        let results = attack_batch(
            &targets,
            10,
            6,
            table.as_slice(),
            &token,
            &AttackOptions::default(),
        );
        assert_eq!(results, vec![None; 5]);
    }

    #[test]
    fn test_attack_batch_progress() {
        let table = sorted_table(&HEADS, 10);
        let targets = vec![hex(b"abc123"), hex(b"qwerty"), hex(b"absent")];
        let calls = AtomicUsize::new(0);

        attack_batch(
            &targets,
            10,
            6,
            table.as_slice(),
            &CancellationToken::new(),
            &AttackOptions::default().with_progress(|_, total| {
                assert_eq!(total, 3);
                calls.fetch_add(1, Ordering::Relaxed);
            }),
        );
        assert_eq!(calls.load(Ordering::Relaxed), 3);
    }

    // =========================================================================
    // Multi-length
    // =========================================================================

    #[test]
    fn test_attack_multi_length_merges_results() {
        let mut registry = TableRegistry::new();
        registry.register(LoadedTable::new(6, 10, sorted_table(&["abc123"], 10)));
        registry.register(LoadedTable::new(8, 10, sorted_table(&["abcd1234"], 10)));

        let targets = vec![hex(b"abcd1234"), hex(b"abc123"), hex(b"absent")];
        let results = attack_multi_length(
            &targets,
            &registry,
            &CancellationToken::new(),
            &AttackOptions::default(),
        );

        assert_eq!(
            results,
            vec![Some("abcd1234".to_string()), Some("abc123".to_string()), None]
        );
    }

    #[test]
    fn test_attack_multi_length_progress_spans_all_tables() {
        let mut registry = TableRegistry::new();
        registry.register(LoadedTable::new(6, 10, sorted_table(&["abc123"], 10)));
        registry.register(LoadedTable::new(8, 10, sorted_table(&["abcd1234"], 10)));

        let targets = vec![hex(b"abcd1234"), hex(b"abc123"), hex(b"absent")];
        let reports = Mutex::new(Vec::new());

        attack_multi_length(
            &targets,
            &registry,
            &CancellationToken::new(),
            &AttackOptions::default()
                .with_workers(2)
                .with_progress(|current, total| reports.lock().unwrap().push((current, total))),
        );

        let reports = reports.into_inner().unwrap();
        assert_eq!(reports.len(), 6);
        assert!(reports.iter().all(|&(_, total)| total == 6));

        let mut seen: Vec<usize> = reports.iter().map(|&(current, _)| current).collect();
        seen.sort_unstable();
        assert_eq!(seen, (1..=6).collect::<Vec<_>>());
    }

    #[test]
    fn test_attack_multi_length_empty_registry() {
        let targets = vec![hex(b"abc123")];
        let results = attack_multi_length(
            &targets,
            &TableRegistry::new(),
            &CancellationToken::new(),
            &AttackOptions::default(),
        );
        assert_eq!(results, vec![None]);
    }
}
