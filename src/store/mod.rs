//! CSV merge-store
//!
//! A store is one CSV file with a header row and a leading `index` column.
//! Saving is a read-modify-write cycle: load what is on disk, append the new
//! rows, keep the last row per identifier and atomically replace the file.

pub mod migrate;

pub use migrate::{FormatVersion, INDEX_COLUMN, LEGACY_INDEX_COLUMN};

use crate::error::{Error, Result};
use crate::table::{Column, Table};
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Default identifier column
pub const ID_COLUMN: &str = "id";

/// A table persisted as CSV at a fixed path
#[derive(Debug, Clone)]
pub struct CsvStore {
    path: PathBuf,
    key: String,
}

impl CsvStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CsvStore {
            path: path.into(),
            key: ID_COLUMN.to_string(),
        }
    }

    /// Use a different identifier column for deduplication
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read the stored table
    ///
    /// A missing or empty file reads as an empty table. Older layouts are
    /// upgraded on the way in, and the identifier column is checked to hold
    /// 64-bit integers, rewritten in canonical form.
    pub fn load(&self) -> Result<Table> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Store not found, starting empty");
                return Ok(Table::new());
            }
            Err(e) => return Err(e.into()),
        };

        let mut table = read_csv(file)?;
        migrate::upgrade(&mut table);
        migrate::apply_index(&mut table);

        if let Some(ids) = table.column_mut(&self.key) {
            for (row, cell) in ids.iter_mut().enumerate() {
                let id = parse_identifier(cell).ok_or_else(|| Error::InvalidIdentifier {
                    path: self.path.clone(),
                    row,
                    value: cell.clone(),
                })?;
                *cell = id.to_string();
            }
        }

        Ok(table)
    }

    /// Merge `table` into the store and return what was written
    ///
    /// Existing rows come first, new rows after; for every identifier only the
    /// last row survives.
    pub fn save(&self, table: &Table) -> Result<Table> {
        let mut merged = self.load()?;
        let existing = merged.len();
        merged.append(table.clone());

        let ids = self.identifiers(&merged)?;
        merged.dedupe_keep_last(&ids);

        self.write(&merged)?;
        info!(
            path = %self.path.display(),
            existing,
            added = table.len(),
            rows = merged.len(),
            "Merged table into store"
        );
        Ok(merged)
    }

    /// Overwrite the store with `table`, index first
    ///
    /// The file is written next to its destination and renamed into place, so
    /// an interrupted write leaves the previous contents intact.
    pub fn write(&self, table: &Table) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir)?;

        {
            let mut writer = csv::Writer::from_writer(tmp.as_file_mut());
            let header = std::iter::once(INDEX_COLUMN).chain(table.column_names());
            writer.write_record(header)?;

            for (row, label) in table.index().iter().enumerate() {
                let label = label.to_string();
                let cells = std::iter::once(label.as_str()).chain(table.row(row));
                writer.write_record(cells)?;
            }
            writer.flush()?;
        }

        tmp.as_file_mut().flush()?;
        tmp.persist(&self.path)?;
        Ok(())
    }

    fn identifiers(&self, table: &Table) -> Result<Vec<i64>> {
        let Some(ids) = table.column(&self.key) else {
            if table.is_empty() {
                return Ok(Vec::new());
            }
            return Err(Error::MissingIdentifierColumn {
                path: self.path.clone(),
            });
        };

        ids.iter()
            .enumerate()
            .map(|(row, cell)| {
                parse_identifier(cell).ok_or_else(|| Error::InvalidIdentifier {
                    path: self.path.clone(),
                    row,
                    value: cell.clone(),
                })
            })
            .collect()
    }
}

/// Read a table from `path`
pub fn load(path: impl AsRef<Path>) -> Result<Table> {
    CsvStore::new(path.as_ref()).load()
}

/// Merge `table` into the store at `path`
pub fn save(table: &Table, path: impl AsRef<Path>) -> Result<Table> {
    CsvStore::new(path.as_ref()).save(table)
}

/// Read an identifier cell as a 64-bit integer
///
/// Accepts plain integers and integral floats such as `101.0`, which is how
/// an integer column holding blanks is sometimes serialized.
pub fn parse_identifier(cell: &str) -> Option<i64> {
    let cell = cell.trim();
    if let Ok(id) = cell.parse::<i64>() {
        return Some(id);
    }

    let float = cell.parse::<f64>().ok()?;
    let in_range = float.fract() == 0.0 && float >= i64::MIN as f64 && float < i64::MAX as f64;
    in_range.then_some(float as i64)
}

/// Read raw CSV into a table whose index is still a data column
///
/// Repeated header names get a `.1`, `.2`, ... suffix, so a duplicated index
/// column reads back as `index.1`.
fn read_csv<R: std::io::Read>(reader: R) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);

    let headers = mangle_duplicates(reader.headers()?.iter());
    if headers.is_empty() {
        return Ok(Table::new());
    }

    let mut values: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for record in reader.records() {
        let record = record?;
        for (column, cell) in values.iter_mut().zip(record.iter()) {
            column.push(cell.to_string());
        }
    }

    Ok(Table::from_columns(
        headers
            .into_iter()
            .zip(values)
            .map(|(name, values)| Column::new(name, values))
            .collect(),
    ))
}

fn mangle_duplicates<'a>(headers: impl Iterator<Item = &'a str>) -> Vec<String> {
    let headers: Vec<&str> = headers.collect();
    let original: HashSet<&str> = headers.iter().copied().collect();
    let mut used: HashSet<String> = HashSet::new();
    let mut suffixes: HashMap<&str, usize> = HashMap::new();

    headers
        .into_iter()
        .map(|name| {
            if used.insert(name.to_string()) {
                return name.to_string();
            }
            // Skip suffixes already taken by a real header or an earlier rename
            let suffix = suffixes.entry(name).or_insert(0);
            let mangled = loop {
                *suffix += 1;
                let candidate = format!("{}.{}", name, suffix);
                if !original.contains(candidate.as_str()) && !used.contains(&candidate) {
                    break candidate;
                }
            };
            used.insert(mangled.clone());
            mangled
        })
        .collect()
}
