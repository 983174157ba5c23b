//! On-disk format migrations
//!
//! Stores written by earlier versions of the pipeline carry two known
//! artifacts: a row-index column saved without its name, and a duplicated
//! index column that comes back as `index.1`. Every load detects the format
//! version of the raw table and runs the steps needed to reach the current
//! one before the index column is lifted out of the data.

use crate::table::Table;
use tracing::debug;

/// Header of the row-index column
pub const INDEX_COLUMN: &str = "index";

/// Header a duplicated index column is read back under
pub const LEGACY_INDEX_COLUMN: &str = "index.1";

/// Layout versions of a stored table, oldest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FormatVersion {
    /// Index column unnamed, or missing entirely
    MisnamedIndex,
    /// Named index column plus a duplicated `index.1`
    LegacyIndexColumn,
    /// A single leading `index` column
    Current,
}

type Migration = fn(&mut Table);

/// Steps in application order, keyed by the version they upgrade from
const MIGRATIONS: [(FormatVersion, Migration); 2] = [
    (FormatVersion::MisnamedIndex, rename_misnamed_index),
    (FormatVersion::LegacyIndexColumn, coalesce_legacy_index),
];

impl FormatVersion {
    /// Detect the version of a raw table whose index is still a data column
    pub fn detect(table: &Table) -> Self {
        let has_index = table.column(INDEX_COLUMN).is_some();
        let has_legacy = table.column(LEGACY_INDEX_COLUMN).is_some();

        match (has_index, has_legacy) {
            (false, _) => FormatVersion::MisnamedIndex,
            (true, true) => FormatVersion::LegacyIndexColumn,
            (true, false) => FormatVersion::Current,
        }
    }
}

/// Bring a raw table up to the current layout, returning the version found
pub fn upgrade(table: &mut Table) -> FormatVersion {
    let found = FormatVersion::detect(table);
    for (from, step) in MIGRATIONS {
        if found <= from {
            step(table);
        }
    }
    if found != FormatVersion::Current {
        debug!(?found, "Upgraded stored table layout");
    }
    found
}

/// Lift the `index` column out of the data and into the row index
///
/// Cells that are not integers keep their row position as label. A table
/// without an index column keeps its positional index.
pub fn apply_index(table: &mut Table) {
    let Some(labels) = table.remove_column(INDEX_COLUMN) else {
        return;
    };

    let index = labels
        .iter()
        .enumerate()
        .map(|(row, label)| label.trim().parse::<i64>().unwrap_or(row as i64))
        .collect();
    table.set_index(index);
}

/// Give an unnamed leading column the index role
fn rename_misnamed_index(table: &mut Table) {
    if table.column(INDEX_COLUMN).is_some() {
        return;
    }

    let Some(first) = table.column_names().next().map(str::to_string) else {
        return;
    };

    if is_unnamed(&first) {
        table.rename_column(&first, INDEX_COLUMN);
    } else if first == LEGACY_INDEX_COLUMN {
        table.rename_column(LEGACY_INDEX_COLUMN, INDEX_COLUMN);
    }
}

/// Merge `index.1` into `index` and drop it
///
/// The legacy value wins wherever it is an integer.
fn coalesce_legacy_index(table: &mut Table) {
    let Some(legacy) = table.remove_column(LEGACY_INDEX_COLUMN) else {
        return;
    };

    match table.column_mut(INDEX_COLUMN) {
        Some(primary) => {
            for (cell, old) in primary.iter_mut().zip(legacy) {
                if old.trim().parse::<i64>().is_ok() {
                    *cell = old;
                }
            }
        }
        None => {
            debug!("Legacy index column found without a primary index; dropped");
        }
    }
}

fn is_unnamed(header: &str) -> bool {
    header.trim().is_empty() || header.starts_with("Unnamed:")
}
