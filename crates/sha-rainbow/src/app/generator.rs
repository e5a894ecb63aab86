//! Table generation workflow
//!
//! This module provides functions for generating rainbow tables.
//!
//! Generation walks `Idle -> Generating -> Sorting -> Saving -> Done`.
//! Cancellation can only interrupt `Generating`: every worker finishes its
//! current chain, leaves the rest of its range at `ChainEntry::default()`,
//! and the table is still sorted and saved under an `-incomplete` file name.

use crate::app::cancel::CancellationToken;
use crate::constants::PROGRESS_STEPS;
use crate::domain::chain::{ChainEntry, compute_entry};
use crate::domain::config::TableConfig;
use crate::domain::partition::{partition, split_by_ranges};
use crate::domain::password::fill_random_password;
use crate::error::{CodecError, TableError, TableResult};
use crate::infra::table_io::{StoreStats, save_table};
use crate::infra::table_sort::sort_table_parallel;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Phase of a table generation run
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenerationPhase {
    Idle,
    Generating,
    Sorting,
    Saving,
    Done,
}

/// Options for table generation
#[derive(Clone)]
pub struct GenerationOptions<F = fn(usize, usize)> {
    /// Number of partitions (0 = rayon pool size)
    pub workers: usize,
    /// Progress callback (completed, total)
    pub on_progress: Option<F>,
}

impl Default for GenerationOptions<fn(usize, usize)> {
    fn default() -> Self {
        Self {
            workers: 0,
            on_progress: None,
        }
    }
}

impl<F> GenerationOptions<F> {
    /// Set the number of partitions
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Set the progress callback
    pub fn with_progress<G>(self, callback: G) -> GenerationOptions<G> {
        GenerationOptions {
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

/// In-memory result of the generation phase
#[derive(Debug, Clone)]
pub struct GeneratedTable {
    /// Preallocated table; unfinished slots stay at the zero entry
    pub entries: Vec<ChainEntry>,
    /// Number of chains actually computed
    pub completed: usize,
    /// Whether generation stopped early on cancellation
    pub cancelled: bool,
}

/// Result of a full generate → sort → save run
#[derive(Debug, Clone)]
pub struct GenerationReport {
    /// Path of the written table file
    pub path: PathBuf,
    /// Number of chains computed
    pub completed: usize,
    /// Number of slots in the preallocated table
    pub max_entries: usize,
    /// Records written and collisions dropped
    pub stats: StoreStats,
    /// Whether the table is partial
    pub cancelled: bool,
}

/// Generate a rainbow table of random chains
///
/// The table holds `config.max_entries()` slots, split into one contiguous
/// range per worker. Each worker draws random heads and checks `token` once
/// per chain.
pub fn generate_table<F>(
    config: &TableConfig,
    token: &CancellationToken,
    options: GenerationOptions<F>,
) -> TableResult<GeneratedTable>
where
    F: Fn(usize, usize) + Sync,
{
    let total = config.max_entries();
    let workers = options.worker_count();
    let mut entries = vec![ChainEntry::default(); total];

    let ranges = partition(total, workers);
    debug!(workers, total, "partitioned table");

    let progress = AtomicUsize::new(0);
    let report_every = (total / PROGRESS_STEPS).max(1);
    let on_progress = options.on_progress.as_ref();

    let counts = split_by_ranges(&mut entries, &ranges)
        .into_par_iter()
        .map(|slice| {
            fill_slice(slice, config, token, || {
                let done = progress.fetch_add(1, Ordering::Relaxed) + 1;
                if done % report_every == 0 {
                    if let Some(callback) = on_progress {
                        callback(done, total);
                    }
                }
            })
        })
        .collect::<Result<Vec<usize>, CodecError>>()?;

    let completed: usize = counts.iter().sum();
    if let Some(callback) = on_progress {
        callback(completed, total);
    }

    let cancelled = completed < total && token.is_cancelled();
    if cancelled {
        warn!(completed, total, "generation cancelled, table is incomplete");
    }

    Ok(GeneratedTable {
        entries,
        completed,
        cancelled,
    })
}

/// Fill one worker's slice with random chains
///
/// Returns the number of chains computed before the slice was full or the
/// token was raised.
fn fill_slice(
    slice: &mut [ChainEntry],
    config: &TableConfig,
    token: &CancellationToken,
    on_chain: impl Fn(),
) -> Result<usize, CodecError> {
    let mut rng = rand::thread_rng();
    let mut head = vec![0u8; config.password_length];
    let mut done = 0;

    for slot in slice.iter_mut() {
        if token.is_cancelled() {
            break;
        }

        fill_random_password(&mut rng, &mut head);
        *slot = compute_entry(&head, config.chain_length)?;

        done += 1;
        on_chain();
    }

    Ok(done)
}

/// Generate a table from a fixed list of heads
///
/// Deterministic counterpart of [`generate_table`], one chain per head.
pub fn generate_table_from_heads<H>(heads: &[H], chain_length: u32) -> Result<Vec<ChainEntry>, CodecError>
where
    H: AsRef<[u8]> + Sync,
{
    heads
        .par_iter()
        .map(|head| compute_entry(head.as_ref(), chain_length))
        .collect()
}

/// Table generation driver
///
/// Runs the generation pipeline for one configuration and tracks its phase.
#[derive(Debug)]
pub struct TableGenerator {
    config: TableConfig,
    token: CancellationToken,
    phase: GenerationPhase,
}

impl TableGenerator {
    /// Create a generator for `config`, cancelled through `token`
    pub fn new(config: TableConfig, token: CancellationToken) -> Self {
        Self {
            config,
            token,
            phase: GenerationPhase::Idle,
        }
    }

    /// Current phase
    pub fn phase(&self) -> GenerationPhase {
        self.phase
    }

    /// Table parameters
    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    fn enter(&mut self, phase: GenerationPhase) {
        debug!(from = ?self.phase, to = ?phase, "generation phase");
        self.phase = phase;
    }

    /// Generate, sort and save the table into `out_dir`
    ///
    /// # Errors
    ///
    /// Fails if the output file cannot be created or written.
    pub fn run<F>(
        &mut self,
        out_dir: impl AsRef<Path>,
        options: GenerationOptions<F>,
    ) -> TableResult<GenerationReport>
    where
        F: Fn(usize, usize) + Sync,
    {
        let config = self.config;
        info!(
            password_length = config.password_length,
            chain_length = config.chain_length,
            max_entries = config.max_entries(),
            "generating rainbow table"
        );

        self.enter(GenerationPhase::Generating);
        let start = Instant::now();
        let generated = generate_table(&config, &self.token, options)?;
        info!(
            completed = generated.completed,
            elapsed_secs = start.elapsed().as_secs_f64(),
            "chains generated"
        );

        self.enter(GenerationPhase::Sorting);
        let mut entries = generated.entries;
        let start = Instant::now();
        sort_table_parallel(&mut entries);
        info!(elapsed_secs = start.elapsed().as_secs_f64(), "table sorted");

        self.enter(GenerationPhase::Saving);
        let path = out_dir.as_ref().join(config.file_name(generated.cancelled));
        let start = Instant::now();
        let stats = save_table(&path, &entries)?;
        info!(
            path = %path.display(),
            elapsed_secs = start.elapsed().as_secs_f64(),
            "table saved"
        );

        self.enter(GenerationPhase::Done);
        Ok(GenerationReport {
            path,
            completed: generated.completed,
            max_entries: entries.len(),
            stats,
            cancelled: generated.cancelled,
        })
    }
}

/// Generate, sort and save a table in one call
pub fn generate_and_save<F>(
    config: TableConfig,
    out_dir: impl AsRef<Path>,
    token: &CancellationToken,
    options: GenerationOptions<F>,
) -> TableResult<GenerationReport>
where
    F: Fn(usize, usize) + Sync,
{
    TableGenerator::new(config, token.clone()).run(out_dir, options)
}

/// Generate one table per password length concurrently
///
/// Every length shares `chain_length`, `target_size_gb` and `token`. A length
/// that fails is logged and reported without stopping the others. Results
/// follow the order of `lengths`.
pub fn generate_multi_length(
    lengths: &[usize],
    chain_length: u32,
    target_size_gb: f64,
    out_dir: &Path,
    token: &CancellationToken,
) -> Vec<(usize, TableResult<GenerationReport>)> {
    lengths
        .par_iter()
        .map(|&password_length| {
            let result = TableConfig::new(password_length, chain_length, target_size_gb)
                .map_err(TableError::from)
                .and_then(|config| {
                    generate_and_save(config, out_dir, token, GenerationOptions::default())
                });

            if let Err(e) = &result {
                warn!(password_length, error = %e, "table generation failed");
            }
            (password_length, result)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chain::compute_chain;
    use crate::domain::codec::decode;
    use crate::error::ConfigError;
    use crate::infra::table_io::load_table;
    use crate::infra::table_sort::is_sorted_by_tail;
    use std::sync::Mutex;
    use tempfile::TempDir;

    fn small_config() -> TableConfig {
        // 3_200 bytes = 200 entries
        TableConfig::new(6, 10, 3.2e-6).unwrap()
    }

    #[test]
    fn test_generate_table_fills_every_slot() {
        let config = small_config();
        let table = generate_table(
            &config,
            &CancellationToken::new(),
            GenerationOptions::default().with_workers(3),
        )
        .unwrap();

        assert_eq!(table.entries.len(), 200);
        assert_eq!(table.completed, 200);
        assert!(!table.cancelled);
    }

    #[test]
    fn test_generated_entries_are_valid_chains() {
        let config = small_config();
        let table = generate_table(&config, &CancellationToken::new(), GenerationOptions::default())
            .unwrap();

        for entry in table.entries.iter().take(20) {
            let head = decode(entry.head, 6).unwrap();
            let tail = compute_chain(&head, 10);
            assert_eq!(decode(entry.tail, 6).unwrap(), tail);
        }
    }

    #[test]
    fn test_generate_table_cancelled_before_start() {
        let config = small_config();
        let token = CancellationToken::new();
        token.cancel();

        let table = generate_table(&config, &token, GenerationOptions::default().with_workers(4))
            .unwrap();

        assert!(table.cancelled);
        assert_eq!(table.completed, 0);
        assert!(table.entries.iter().all(|e| *e == ChainEntry::default()));
    }

    #[test]
    fn test_generate_table_progress_reaches_total() {
        let config = small_config();
        let calls = Mutex::new(Vec::new());

        generate_table(
            &config,
            &CancellationToken::new(),
            GenerationOptions::default()
                .with_workers(2)
                .with_progress(|done, total| calls.lock().unwrap().push((done, total))),
        )
        .unwrap();

        let calls = calls.into_inner().unwrap();
        assert!(!calls.is_empty());
        assert_eq!(*calls.last().unwrap(), (200, 200));
    }

    #[test]
    fn test_generate_table_from_heads() {
        let heads = ["abc123", "Zz9Yy8", "passwd"];
        let entries = generate_table_from_heads(&heads, 5).unwrap();

        assert_eq!(entries.len(), 3);
        for (entry, head) in entries.iter().zip(heads) {
            assert_eq!(*entry, compute_entry(head.as_bytes(), 5).unwrap());
        }
    }

    #[test]
    fn test_generate_table_from_heads_rejects_invalid() {
        let heads = ["abc_12"];
        assert!(generate_table_from_heads(&heads, 5).is_err());
    }

    #[test]
    fn test_generator_run_writes_sorted_table() {
        let dir = TempDir::new().unwrap();
        let config = small_config();
        let mut generator = TableGenerator::new(config, CancellationToken::new());
        assert_eq!(generator.phase(), GenerationPhase::Idle);

        let report = generator.run(dir.path(), GenerationOptions::default()).unwrap();

        assert_eq!(generator.phase(), GenerationPhase::Done);
        assert!(!report.cancelled);
        assert_eq!(report.path, dir.path().join(config.file_name(false)));
        assert_eq!(report.stats.written + report.stats.collisions, 200);

        let loaded = load_table(&report.path).unwrap();
        assert_eq!(loaded.len(), report.stats.written);
        assert!(is_sorted_by_tail(&loaded));
        assert!(loaded.windows(2).all(|w| w[0].tail != w[1].tail));
    }

    #[test]
    fn test_generate_and_save_cancelled_marks_incomplete() {
        let dir = TempDir::new().unwrap();
        let config = small_config();
        let token = CancellationToken::new();
        token.cancel();

        let report = generate_and_save(config, dir.path(), &token, GenerationOptions::default())
            .unwrap();

        assert!(report.cancelled);
        assert_eq!(report.completed, 0);
        assert_eq!(report.path, dir.path().join(config.file_name(true)));
        assert!(report.path.exists());
        // Zero placeholders are pruned as collisions
        assert_eq!(report.stats.written, 0);
        assert_eq!(report.stats.collisions, 200);
    }

    #[test]
    fn test_generate_multi_length_isolates_failures() {
        let dir = TempDir::new().unwrap();
        // A directory squatting on the length-7 file name makes its save fail
        let blocked = TableConfig::new(7, 10, 3.2e-6).unwrap().file_name(false);
        std::fs::create_dir(dir.path().join(&blocked)).unwrap();

        let results =
            generate_multi_length(&[5, 6, 7], 10, 3.2e-6, dir.path(), &CancellationToken::new());

        let lengths: Vec<usize> = results.iter().map(|(length, _)| *length).collect();
        assert_eq!(lengths, vec![5, 6, 7]);

        assert!(matches!(
            results[0].1,
            Err(TableError::Config(ConfigError::UnsupportedLength(5)))
        ));

        let report = results[1].1.as_ref().unwrap();
        assert!(!report.cancelled);
        assert_eq!(report.path, dir.path().join(small_config().file_name(false)));
        assert!(report.path.is_file());
        assert_eq!(report.stats.written + report.stats.collisions, 200);

        assert!(matches!(results[2].1, Err(TableError::Io(_))));
    }

    #[test]
    fn test_generate_and_save_missing_directory_fails() {
        let result = generate_and_save(
            small_config(),
            "/nonexistent/output/dir",
            &CancellationToken::new(),
            GenerationOptions::default(),
        );
        assert!(result.is_err());
    }
}
