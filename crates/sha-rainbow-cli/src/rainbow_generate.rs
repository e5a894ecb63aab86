//! Rainbow table generation CLI
//!
//! Usage: rainbow_generate <password_length> <size_gb> <chain_length> [options]
//!
//! Options:
//!   --output-dir <DIR>  Directory for the table file (default: output)
//!   --threads <N>       Number of worker threads (default: all cores)
//!   --max-length <N>    Also generate every length up to N, one table each
//!
//! Example: rainbow_generate 6 0.5 2000
//!          rainbow_generate 6 0.5 2000 --max-length 8
//!
//! Ctrl+C stops generation early; the partial table is still sorted and
//! saved with an `-incomplete` suffix.

mod common;

use anyhow::{Context, Result, bail};
use clap::Parser;
use sha_rainbow::{
    CancellationToken, GenerationOptions, GenerationReport, TableConfig, generate_and_save,
    generate_multi_length,
};
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

/// Generate a SHA-256 rainbow table for fixed-length alphanumeric passwords.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Number of characters of every password (6-10).
    password_length: usize,

    /// Target table size in gigabytes (1 GB = 10^9 bytes, 16 bytes per chain).
    size_gb: f64,

    /// Number of hash/reduce steps per chain.
    chain_length: u32,

    /// Directory where the table file is written.
    #[arg(short, long, default_value = "output")]
    output_dir: PathBuf,

    /// Number of worker threads.
    #[arg(short, long)]
    threads: Option<usize>,

    /// Generate tables for every length from `password_length` to this one.
    #[arg(long, value_name = "N")]
    max_length: Option<usize>,
}

fn main() -> Result<()> {
    common::init_tracing();
    let cli = Cli::parse();

    if cli.max_length.is_some_and(|max_length| max_length < cli.password_length) {
        bail!(
            "--max-length must not be shorter than password length {}",
            cli.password_length
        );
    }

    common::init_thread_pool(cli.threads)?;
    let token = common::cancel_on_ctrlc()?;

    fs::create_dir_all(&cli.output_dir).with_context(|| {
        format!("failed to create output directory {}", cli.output_dir.display())
    })?;

    let start = Instant::now();
    match cli.max_length {
        Some(max_length) => generate_range(&cli, max_length, &token)?,
        None => generate_single(&cli, &token)?,
    }

    println!(
        "Done! Total time: {:.2} seconds",
        start.elapsed().as_secs_f64()
    );

    Ok(())
}

fn generate_single(cli: &Cli, token: &CancellationToken) -> Result<()> {
    let config = TableConfig::new(cli.password_length, cli.chain_length, cli.size_gb)
        .context("invalid table parameters")?;

    println!(
        "Generating {} chains of length {} for {}-character passwords...",
        config.max_entries(),
        config.chain_length,
        config.password_length
    );
    println!("Using {} threads. Press Ctrl+C to cancel.", rayon::current_num_threads());

    let options = GenerationOptions::default()
        .with_progress(|current, total| common::print_progress("Generation", current, total));

    let report = generate_and_save(config, &cli.output_dir, token, options)
        .context("table generation failed")?;
    println!();

    print_report(&report);
    Ok(())
}

fn generate_range(cli: &Cli, max_length: usize, token: &CancellationToken) -> Result<()> {
    let lengths: Vec<usize> = (cli.password_length..=max_length).collect();
    println!(
        "Generating tables for password lengths {} to {} ({} GB each, chain length {})...",
        cli.password_length, max_length, cli.size_gb, cli.chain_length
    );
    println!("Using {} threads. Press Ctrl+C to cancel.", rayon::current_num_threads());

    let results = generate_multi_length(
        &lengths,
        cli.chain_length,
        cli.size_gb,
        &cli.output_dir,
        token,
    );

    let mut failed = Vec::new();
    for (length, result) in &results {
        match result {
            Ok(report) => {
                println!("[length {}]", length);
                print_report(report);
            }
            Err(e) => {
                println!("[length {}] failed: {}", length, e);
                failed.push(length.to_string());
            }
        }
    }

    if !failed.is_empty() {
        bail!("generation failed for password lengths {}", failed.join(", "));
    }
    Ok(())
}

fn print_report(report: &GenerationReport) {
    if report.cancelled {
        println!(
            "Cancelled after {}/{} chains.",
            report.completed, report.max_entries
        );
    }
    println!(
        "Saved {} chains ({} collisions removed) to {}",
        report.stats.written,
        report.stats.collisions,
        report.path.display()
    );

    let file_size = fs::metadata(&report.path).map(|m| m.len()).unwrap_or(0);
    println!("File size: {:.2} MB", file_size as f64 / (1024.0 * 1024.0));
}
