//! Table file I/O operations
//!
//! This module provides functions for reading and writing rainbow table files.
//!
//! File format: a flat sequence of 16-byte records `[head: u64][tail: u64]`,
//! little-endian, with no header. Table parameters are carried by the file
//! name (see [`TableConfig::file_name`](crate::domain::config::TableConfig::file_name)).

use crate::constants::CHAIN_ENTRY_SIZE;
use crate::domain::chain::ChainEntry;
use crate::domain::codec::decode;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;
use tracing::{info, warn};

#[cfg(feature = "mmap")]
use crate::domain::config::TableConfig;
#[cfg(feature = "mmap")]
use memmap2::Mmap;

/// Outcome of persisting a table
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StoreStats {
    /// Records written to the file
    pub written: usize,
    /// Entries dropped because their tail equals the previous one
    pub collisions: usize,
}

/// Persist a tail-sorted table, dropping colliding tails
///
/// Walks the entries once and writes an entry only if its tail differs from
/// the preceding tail (initially 0). Entries must already be sorted by tail;
/// on unsorted input non-adjacent duplicates would survive.
pub fn save_table(path: impl AsRef<Path>, entries: &[ChainEntry]) -> io::Result<StoreStats> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    let mut stats = StoreStats::default();
    let mut prev_tail = 0u64;

    for entry in entries {
        if entry.tail != prev_tail {
            writer.write_u64::<LittleEndian>(entry.head)?;
            writer.write_u64::<LittleEndian>(entry.tail)?;
            stats.written += 1;
        } else {
            stats.collisions += 1;
        }
        prev_tail = entry.tail;
    }

    writer.flush()?;
    info!(
        written = stats.written,
        collisions = stats.collisions,
        "table stored"
    );
    Ok(stats)
}

/// Write entries verbatim, without collision pruning
pub fn write_entries(path: impl AsRef<Path>, entries: &[ChainEntry]) -> io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    for entry in entries {
        writer.write_u64::<LittleEndian>(entry.head)?;
        writer.write_u64::<LittleEndian>(entry.tail)?;
    }

    writer.flush()
}

/// Load table from file
///
/// A truncated trailing record is ignored.
pub fn load_table(path: impl AsRef<Path>) -> io::Result<Vec<ChainEntry>> {
    let file = File::open(path)?;
    let metadata = file.metadata()?;
    let num_entries = metadata.len() as usize / CHAIN_ENTRY_SIZE;

    if metadata.len() as usize % CHAIN_ENTRY_SIZE != 0 {
        warn!(
            trailing_bytes = metadata.len() as usize % CHAIN_ENTRY_SIZE,
            "ignoring truncated trailing record"
        );
    }

    let mut reader = BufReader::new(file);
    let mut entries = Vec::with_capacity(num_entries);

    for _ in 0..num_entries {
        let head = reader.read_u64::<LittleEndian>()?;
        let tail = reader.read_u64::<LittleEndian>()?;
        entries.push(ChainEntry { head, tail });
    }

    Ok(entries)
}

/// Load table from file, skipping records that are not valid password codes
///
/// Returns the valid entries and the number of skipped records.
pub fn load_table_checked(
    path: impl AsRef<Path>,
    password_length: usize,
) -> io::Result<(Vec<ChainEntry>, usize)> {
    let mut entries = load_table(path)?;
    let before = entries.len();

    entries.retain(|entry| {
        decode(entry.head, password_length).is_ok() && decode(entry.tail, password_length).is_ok()
    });

    let skipped = before - entries.len();
    if skipped > 0 {
        warn!(skipped, "skipped corrupt table records");
    }
    Ok((entries, skipped))
}

// =============================================================================
// Memory-mapped table I/O (mmap feature)
// =============================================================================

/// Memory-mapped rainbow table
///
/// Read-only access to a table file through memory-mapped I/O. The OS pages
/// the file in on demand instead of loading it up front. Records are decoded
/// one at a time, so the view works on any host byte order.
#[cfg(feature = "mmap")]
pub struct MappedTable {
    mmap: Mmap,
    len: usize,
}

#[cfg(feature = "mmap")]
impl MappedTable {
    /// Open a table file as memory-mapped
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or mapped.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = File::open(path)?;
        let metadata = file.metadata()?;
        let len = metadata.len() as usize / CHAIN_ENTRY_SIZE;

        let mmap = unsafe { Mmap::map(&file)? };

        Ok(Self { mmap, len })
    }

    /// Open a table only if its file name was produced for these parameters
    ///
    /// A mapped table is searched as is, so it must come sorted and valid
    /// from generation. Returns `Ok(None)` for any other file name; such a
    /// file should go through [`load_table_checked`] instead.
    pub fn open_generated(
        path: impl AsRef<Path>,
        password_length: usize,
        chain_length: u32,
    ) -> io::Result<Option<Self>> {
        let path = path.as_ref();
        let matches = TableConfig::from_file_name(path).is_ok_and(|(config, _)| {
            config.password_length == password_length && config.chain_length == chain_length
        });
        if !matches {
            return Ok(None);
        }
        Self::open(path).map(Some)
    }

    /// Get the number of entries
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Get an entry by index
    ///
    /// Returns `None` if the index is out of bounds.
    pub fn get(&self, index: usize) -> Option<ChainEntry> {
        if index >= self.len {
            return None;
        }

        let offset = index * CHAIN_ENTRY_SIZE;
        let mut bytes = &self.mmap[offset..offset + CHAIN_ENTRY_SIZE];

        let head = bytes.read_u64::<LittleEndian>().ok()?;
        let tail = bytes.read_u64::<LittleEndian>().ok()?;

        Some(ChainEntry { head, tail })
    }
}
