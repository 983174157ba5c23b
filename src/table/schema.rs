//! Batch schemas
//!
//! The column set of a batch is computed once, from its first record, and
//! every later record is checked against it.

use crate::error::{Error, Result};
use crate::normalize::{scalar_text, FlatRecord};

/// What to do when a record lacks a column of the batch schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchemaPolicy {
    /// Fill the missing cell with the placeholder of the record kind
    #[default]
    Backfill,
    /// Fail with [`Error::SchemaMismatch`]
    Strict,
}

/// Ordered column set shared by every row of a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    columns: Vec<String>,
}

impl TableSchema {
    /// Derive the schema from a record's key order
    pub fn from_record(record: &FlatRecord) -> Self {
        TableSchema {
            columns: record.keys().cloned().collect(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Columns of the schema that `record` does not carry
    pub fn missing<'a>(&'a self, record: &'a FlatRecord) -> impl Iterator<Item = &'a String> + 'a {
        self.columns.iter().filter(move |c| !record.contains_key(c))
    }

    /// Lay out `record` as one row of cell text, in schema order
    ///
    /// Keys outside the schema are ignored.
    pub fn conform(
        &self,
        record: &FlatRecord,
        row: usize,
        policy: SchemaPolicy,
        placeholder: &str,
    ) -> Result<Vec<String>> {
        self.columns
            .iter()
            .map(|column| match (record.get(column), policy) {
                (Some(value), _) => Ok(scalar_text(value)),
                (None, SchemaPolicy::Backfill) => Ok(placeholder.to_string()),
                (None, SchemaPolicy::Strict) => Err(Error::SchemaMismatch {
                    row,
                    column: column.clone(),
                }),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> FlatRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_schema_from_first_record() {
        let schema = TableSchema::from_record(&record(json!({"id": 1, "b": "x", "a": true})));
        assert_eq!(schema.columns(), ["id", "b", "a"]);
    }

    #[test]
    fn test_conform_backfill_and_strict() {
        let schema = TableSchema::from_record(&record(json!({"id": 1, "lang": "en"})));
        let short = record(json!({"id": 2, "extra": 5}));

        let row = schema.conform(&short, 1, SchemaPolicy::Backfill, " ").unwrap();
        assert_eq!(row, vec!["2".to_string(), " ".to_string()]);

        let err = schema.conform(&short, 1, SchemaPolicy::Strict, " ").unwrap_err();
        assert!(matches!(err, Error::SchemaMismatch { row: 1, ref column } if column == "lang"));

        assert_eq!(schema.missing(&short).collect::<Vec<_>>(), vec!["lang"]);
    }
}
