//! Loaded tables keyed by password length

use crate::domain::chain::ChainEntry;
use crate::domain::config::TableConfig;
use crate::error::TableResult;
use crate::infra::table_io::load_table_checked;
use crate::infra::table_sort::{is_sorted_by_tail, sort_table_parallel};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{info, warn};

/// A table held in memory together with the parameters needed to attack it
#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub password_length: usize,
    pub chain_length: u32,
    /// Entries sorted by tail
    pub entries: Vec<ChainEntry>,
}

impl LoadedTable {
    /// Wrap entries, sorting them by tail if needed
    pub fn new(password_length: usize, chain_length: u32, mut entries: Vec<ChainEntry>) -> Self {
        if !is_sorted_by_tail(&entries) {
            warn!("table is not sorted by tail, sorting in memory");
            sort_table_parallel(&mut entries);
        }
        Self {
            password_length,
            chain_length,
            entries,
        }
    }

    /// Load a table file, skipping corrupt records
    pub fn load(
        path: impl AsRef<Path>,
        password_length: usize,
        chain_length: u32,
    ) -> TableResult<Self> {
        let path = path.as_ref();
        let (entries, skipped) = load_table_checked(path, password_length)?;
        info!(
            path = %path.display(),
            entries = entries.len(),
            skipped,
            "table loaded"
        );
        Ok(Self::new(password_length, chain_length, entries))
    }
}

/// Tables indexed by password length
///
/// At most one table per length; registering a second one replaces the first.
#[derive(Debug, Default)]
pub struct TableRegistry {
    tables: BTreeMap<usize, LoadedTable>,
}

impl TableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a table under its password length
    ///
    /// Returns the table previously registered for that length, if any.
    pub fn register(&mut self, table: LoadedTable) -> Option<LoadedTable> {
        self.tables.insert(table.password_length, table)
    }

    /// Load a table file whose parameters follow the file naming convention
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> TableResult<usize> {
        let path = path.as_ref();
        let (config, incomplete) = TableConfig::from_file_name(path)?;
        if incomplete {
            warn!(path = %path.display(), "loading an incomplete table");
        }
        let table = LoadedTable::load(path, config.password_length, config.chain_length)?;
        self.register(table);
        Ok(config.password_length)
    }

    pub fn get(&self, password_length: usize) -> Option<&LoadedTable> {
        self.tables.get(&password_length)
    }

    /// Registered password lengths, ascending
    pub fn lengths(&self) -> impl Iterator<Item = usize> + '_ {
        self.tables.keys().copied()
    }

    /// Registered tables, ordered by password length
    pub fn iter(&self) -> impl Iterator<Item = &LoadedTable> {
        self.tables.values()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
