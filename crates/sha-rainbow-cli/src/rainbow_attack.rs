//! Rainbow table attack CLI
//!
//! Usage: rainbow_attack <password_length> <chain_length> <table_file> <hash_file> <output_file> [options]
//!
//! Options:
//!   --threads <N>          Number of worker threads (default: all cores)
//!   --extra-table <FILE>   Table for another password length, parameters read
//!                          from its file name (repeatable)
//!   --hash-index           Look tails up in a hash index instead of binary search
//!
//! The hash file holds one hex SHA-256 digest per line. The output file holds
//! one line per digest: the recovered password, or `?`.
//!
//! With the `mmap` feature the table is searched in place without sorting or
//! record validation, so only files named by `rainbow_generate` for the same
//! password and chain length are mapped. Any other file is loaded, sorted and
//! checked instead.
//!
//! Example: rainbow_attack 6 2000 output/rainbowTable-6-2000-0.500.bin hashes.txt cracked.txt

mod common;

use anyhow::{Context, Result, bail};
use clap::Parser;
use sha_rainbow::app::registry::LoadedTable;
use sha_rainbow::infra::hash_list::{load_hash_list, save_results};
use sha_rainbow::{
    AttackOptions, CancellationToken, MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH, TableRegistry,
    attack_batch, attack_multi_length,
};
use std::path::PathBuf;
use std::time::Instant;
use tracing::warn;

#[cfg(feature = "mmap")]
use sha_rainbow::infra::table_io::MappedTable;

#[cfg(feature = "hashmap-search")]
use sha_rainbow::app::attacker::TailIndex;

/// Recover passwords from SHA-256 digests with a rainbow table.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Number of characters of the passwords in the table (6-10).
    password_length: usize,

    /// Chain length the table was generated with.
    chain_length: u32,

    /// Table file.
    table_file: PathBuf,

    /// File with one hex digest per line.
    hash_file: PathBuf,

    /// File receiving one recovered password (or `?`) per digest.
    output_file: PathBuf,

    /// Number of worker threads.
    #[arg(short, long)]
    threads: Option<usize>,

    /// Table for another password length, named `rainbowTable-{len}-{chain}-{size}.bin`.
    #[arg(long = "extra-table", value_name = "FILE")]
    extra_tables: Vec<PathBuf>,

    /// Build an in-memory hash index of the table tails.
    #[cfg(feature = "hashmap-search")]
    #[arg(long)]
    hash_index: bool,
}

fn main() -> Result<()> {
    common::init_tracing();
    let cli = Cli::parse();

    if !(MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH).contains(&cli.password_length) {
        bail!(
            "password length must be between {} and {}, got {}",
            MIN_PASSWORD_LENGTH,
            MAX_PASSWORD_LENGTH,
            cli.password_length
        );
    }
    common::init_thread_pool(cli.threads)?;
    let token = common::cancel_on_ctrlc()?;

    let targets = load_hash_list(&cli.hash_file)
        .with_context(|| format!("failed to read hash file {}", cli.hash_file.display()))?;
    println!("Loaded {} digests from {}", targets.len(), cli.hash_file.display());

    let step = (targets.len() / 100).max(1);
    let options = AttackOptions::default().with_progress(move |current, total| {
        if current % step == 0 || current == total {
            common::print_progress("Attack", current, total);
        }
    });

    let start = Instant::now();
    let results = if cli.extra_tables.is_empty() {
        attack_single_table(&cli, &targets, &token, &options)?
    } else {
        attack_all_lengths(&cli, &targets, &token, &options)?
    };
    println!();

    save_results(&cli.output_file, &results)
        .with_context(|| format!("failed to write {}", cli.output_file.display()))?;

    let recovered = results.iter().filter(|r| r.is_some()).count();
    if token.is_cancelled() {
        println!("Cancelled, results are partial.");
    }
    println!(
        "Recovered {}/{} passwords in {:.2} seconds",
        recovered,
        results.len(),
        start.elapsed().as_secs_f64()
    );
    println!("Results written to {}", cli.output_file.display());

    Ok(())
}

fn attack_single_table<F>(
    cli: &Cli,
    targets: &[String],
    token: &CancellationToken,
    options: &AttackOptions<F>,
) -> Result<Vec<Option<String>>>
where
    F: Fn(usize, usize) + Sync,
{
    #[cfg(feature = "hashmap-search")]
    if cli.hash_index {
        let table = load_primary(cli)?;
        let index = TailIndex::build(&table.entries);
        println!("Indexed {} distinct tails", index.len());
        return Ok(attack_batch(
            targets,
            cli.chain_length,
            cli.password_length,
            &index,
            token,
            options,
        ));
    }

    #[cfg(feature = "mmap")]
    {
        let mapped =
            MappedTable::open_generated(&cli.table_file, cli.password_length, cli.chain_length)
                .with_context(|| {
                    format!("failed to open table {}", cli.table_file.display())
                })?;

        match mapped {
            Some(table) => {
                println!("Mapped {} chains from {}", table.len(), cli.table_file.display());
                Ok(attack_batch(
                    targets,
                    cli.chain_length,
                    cli.password_length,
                    &table,
                    token,
                    options,
                ))
            }
            None => {
                warn!(
                    path = %cli.table_file.display(),
                    "table name does not match the given parameters, loading and sorting it instead"
                );
                let table = load_primary(cli)?;
                Ok(attack_batch(
                    targets,
                    cli.chain_length,
                    cli.password_length,
                    &table,
                    token,
                    options,
                ))
            }
        }
    }

    #[cfg(not(feature = "mmap"))]
    {
        let table = load_primary(cli)?;
        Ok(attack_batch(
            targets,
            cli.chain_length,
            cli.password_length,
            &table,
            token,
            options,
        ))
    }
}

fn attack_all_lengths<F>(
    cli: &Cli,
    targets: &[String],
    token: &CancellationToken,
    options: &AttackOptions<F>,
) -> Result<Vec<Option<String>>>
where
    F: Fn(usize, usize) + Sync,
{
    let mut registry = TableRegistry::new();
    registry.register(load_primary(cli)?);

    for path in &cli.extra_tables {
        match registry.load_file(path) {
            Ok(length) if length == cli.password_length => {
                warn!(path = %path.display(), length, "extra table replaces the primary table");
            }
            Ok(_) => {}
            Err(e) => warn!(path = %path.display(), error = %e, "skipping extra table"),
        }
    }

    let lengths: Vec<String> = registry.lengths().map(|l| l.to_string()).collect();
    println!("Attacking with password lengths {}", lengths.join(", "));

    Ok(attack_multi_length(targets, &registry, token, options))
}

fn load_primary(cli: &Cli) -> Result<LoadedTable> {
    let table = LoadedTable::load(&cli.table_file, cli.password_length, cli.chain_length)
        .with_context(|| format!("failed to load table {}", cli.table_file.display()))?;
    println!(
        "Loaded {} chains from {}",
        table.entries.len(),
        cli.table_file.display()
    );
    Ok(table)
}
