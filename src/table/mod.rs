//! Column-oriented tables
//!
//! A [`Table`] holds the text cells of a batch of flat records, one vector per
//! column, plus a row index that survives deduplication the way a stored
//! table's index does.

pub mod builder;
pub mod schema;

pub use builder::TableBuilder;
pub use schema::{SchemaPolicy, TableSchema};

use std::collections::HashSet;
use std::hash::Hash;

/// One named column of cell text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub values: Vec<String>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<String>) -> Self {
        Column {
            name: name.into(),
            values,
        }
    }
}

/// A column-oriented table with a row index
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    columns: Vec<Column>,
    index: Vec<i64>,
}

impl Table {
    pub fn new() -> Self {
        Table::default()
    }

    /// Build a table with a fresh `0..n` index
    ///
    /// All columns must have the same length.
    pub fn from_columns(columns: Vec<Column>) -> Self {
        let rows = columns.first().map_or(0, |c| c.values.len());
        Self::with_index(columns, (0..rows as i64).collect())
    }

    pub fn with_index(columns: Vec<Column>, index: Vec<i64>) -> Self {
        debug_assert!(columns.iter().all(|c| c.values.len() == index.len()));
        Table { columns, index }
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn column(&self, name: &str) -> Option<&[String]> {
        self.position(name).map(|i| self.columns[i].values.as_slice())
    }

    pub(crate) fn column_mut(&mut self, name: &str) -> Option<&mut Vec<String>> {
        let i = self.position(name)?;
        Some(&mut self.columns[i].values)
    }

    pub fn index(&self) -> &[i64] {
        &self.index
    }

    pub(crate) fn set_index(&mut self, index: Vec<i64>) {
        debug_assert_eq!(index.len(), self.len());
        self.index = index;
    }

    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        self.column(column)?.get(row).map(String::as_str)
    }

    /// Cells of one row, in column order
    pub fn row(&self, row: usize) -> Vec<&str> {
        self.columns.iter().map(|c| c.values[row].as_str()).collect()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Remove a column, returning its cells
    pub fn remove_column(&mut self, name: &str) -> Option<Vec<String>> {
        let i = self.position(name)?;
        Some(self.columns.remove(i).values)
    }

    pub fn rename_column(&mut self, from: &str, to: &str) -> bool {
        match self.position(from) {
            Some(i) => {
                self.columns[i].name = to.to_string();
                true
            }
            None => false,
        }
    }

    /// Append `other` below this table
    ///
    /// Columns are the union of both sides, this table's first. Cells a side
    /// has no column for are left empty. The index is renumbered `0..n` over the
    /// concatenation.
    pub fn append(&mut self, other: Table) {
        let existing = self.len();
        let added = other.len();

        for column in &other.columns {
            if self.position(&column.name).is_none() {
                self.columns
                    .push(Column::new(column.name.clone(), vec![String::new(); existing]));
            }
        }

        let mut incoming: Vec<Option<Vec<String>>> = Vec::with_capacity(self.columns.len());
        let mut other_columns = other.columns;
        for column in &self.columns {
            let found = other_columns.iter().position(|c| c.name == column.name);
            incoming.push(found.map(|i| other_columns.swap_remove(i).values));
        }

        for (column, values) in self.columns.iter_mut().zip(incoming) {
            match values {
                Some(values) => column.values.extend(values),
                None => column.values.extend(std::iter::repeat(String::new()).take(added)),
            }
        }

        self.index = (0..(existing + added) as i64).collect();
    }

    /// Keep only rows whose flag is set; survivors keep their index labels
    pub fn retain_rows(&mut self, keep: &[bool]) {
        debug_assert_eq!(keep.len(), self.len());
        for column in &mut self.columns {
            let mut flags = keep.iter();
            column.values.retain(|_| *flags.next().unwrap_or(&false));
        }
        let mut flags = keep.iter();
        self.index.retain(|_| *flags.next().unwrap_or(&false));
    }

    /// Drop rows identical in every column to an earlier row
    pub fn drop_duplicate_rows(&mut self) {
        let mut seen = HashSet::new();
        let keep: Vec<bool> = (0..self.len())
            .map(|i| {
                let row: Vec<String> = self.row(i).into_iter().map(str::to_string).collect();
                seen.insert(row)
            })
            .collect();
        self.retain_rows(&keep);
    }

    /// Keep only the last row for each key, `keys[i]` being row `i`'s key
    pub fn dedupe_keep_last<K: Eq + Hash>(&mut self, keys: &[K]) {
        debug_assert_eq!(keys.len(), self.len());
        let mut seen = HashSet::new();
        let mut keep = vec![false; keys.len()];
        for (i, key) in keys.iter().enumerate().rev() {
            keep[i] = seen.insert(key);
        }
        self.retain_rows(&keep);
    }
}
