//! Hash list input and cracked password output
//!
//! Input: one hex digest per line, blank lines skipped.
//! Output: one line per input digest, in input order, holding the recovered
//! password or `?`, followed by a trailing blank line.

use crate::constants::NOT_FOUND_MARKER;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Read digest lines from a reader, skipping blank lines
pub fn read_hash_list(reader: impl BufRead) -> io::Result<Vec<String>> {
    let mut hashes = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            hashes.push(trimmed.to_string());
        }
    }
    Ok(hashes)
}

/// Load digest lines from a file
pub fn load_hash_list(path: impl AsRef<Path>) -> io::Result<Vec<String>> {
    read_hash_list(BufReader::new(File::open(path)?))
}

/// Write cracking results, `?` standing for digests that were not recovered
pub fn write_results(mut writer: impl Write, results: &[Option<String>]) -> io::Result<()> {
    for result in results {
        writeln!(writer, "{}", result.as_deref().unwrap_or(NOT_FOUND_MARKER))?;
    }
    writeln!(writer)?;
    writer.flush()
}

/// Write cracking results to a file
pub fn save_results(path: impl AsRef<Path>, results: &[Option<String>]) -> io::Result<()> {
    write_results(BufWriter::new(File::create(path)?), results)
}
