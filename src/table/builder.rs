//! Schema-checked table assembly
//!
//! Normalizes a batch, fixes the schema from the first record, then lays every
//! record out against that schema.

use crate::error::{Error, Result};
use crate::normalize::{Author, FlatRecord, Normalize, NormalizeConfig, Post, RecordKind};
use crate::table::schema::{SchemaPolicy, TableSchema};
use crate::table::{Column, Table};
use tracing::debug;

/// Builds tables from batches of raw or flat records
#[derive(Debug, Clone, Default)]
pub struct TableBuilder {
    config: NormalizeConfig,
    policy: SchemaPolicy,
}

impl TableBuilder {
    pub fn new(config: NormalizeConfig, policy: SchemaPolicy) -> Self {
        TableBuilder { config, policy }
    }

    pub fn config(&self) -> &NormalizeConfig {
        &self.config
    }

    /// Normalize a batch and build its table
    ///
    /// Author tables additionally drop rows that are identical in every
    /// column, which happens whenever a batch holds several posts by the same
    /// account.
    pub fn build<T: Normalize>(&self, records: &[T]) -> Result<Table> {
        let flat = records
            .iter()
            .map(|r| r.normalize(&self.config))
            .collect::<Result<Vec<_>>>()?;

        let mut table = self.build_flat(&flat, T::KIND)?;
        if T::KIND == RecordKind::Author {
            table.drop_duplicate_rows();
        }
        Ok(table)
    }

    pub fn posts(&self, posts: &[Post]) -> Result<Table> {
        self.build(posts)
    }

    pub fn authors(&self, authors: &[Author]) -> Result<Table> {
        self.build(authors)
    }

    /// Lay out already-normalized records as a table
    pub fn build_flat(&self, records: &[FlatRecord], kind: RecordKind) -> Result<Table> {
        let first = records.first().ok_or(Error::EmptyBatch)?;
        let schema = TableSchema::from_record(first);
        let placeholder = self.config.placeholder(kind);

        let mut columns: Vec<Vec<String>> = vec![Vec::with_capacity(records.len()); schema.len()];
        let mut backfilled = 0usize;

        for (row, record) in records.iter().enumerate() {
            backfilled += schema.missing(record).count();
            let cells = schema.conform(record, row, self.policy, placeholder)?;
            for (column, cell) in columns.iter_mut().zip(cells) {
                column.push(cell);
            }
        }

        if backfilled > 0 {
            debug!(backfilled, rows = records.len(), "Backfilled cells missing from the batch schema");
        }

        Ok(Table::from_columns(
            schema
                .columns()
                .iter()
                .zip(columns)
                .map(|(name, values)| Column::new(name.clone(), values))
                .collect(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn post(id: i64, extra: serde_json::Value) -> Post {
        let mut value = json!({
            "id": id,
            "full_text": "text",
            "user": {"id": 1, "screen_name": "ferris", "name": "Ferris"},
            "entities": {"hashtags": []}
        });
        for (k, v) in extra.as_object().unwrap() {
            value[k] = v.clone();
        }
        Post::from_value(value).unwrap()
    }

    #[test]
    fn test_posts_table() {
        let posts = vec![
            post(101, json!({})),
            post(102, json!({
                "quoted_status_id": 999,
                "is_quote_status": true,
                "entities": {"hashtags": [{"text": "#test"}]}
            })),
        ];

        let table = TableBuilder::default().posts(&posts).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.column("entities_hashtags").unwrap(), [" ", "#test"]);
        assert_eq!(table.column("quoted_status_id").unwrap(), [" ", "999"]);
        assert_eq!(table.column("is_quote_status").unwrap(), [" ", "True"]);
        assert_eq!(table.index(), &[0, 1]);
    }

    #[test]
    fn test_empty_batch() {
        let err = TableBuilder::default().posts(&[]).unwrap_err();
        assert!(matches!(err, Error::EmptyBatch));
    }

    #[test]
    fn test_author_table_drops_exact_duplicates() {
        let ferris = Author::from_value(json!({"id": 1, "screen_name": "ferris"})).unwrap();
        let corro = Author::from_value(json!({"id": 2, "screen_name": "corro"})).unwrap();
        let authors = vec![ferris.clone(), corro, ferris];

        let table = TableBuilder::default().authors(&authors).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.column("id").unwrap(), ["1", "2"]);
        assert_eq!(table.column("location").unwrap(), ["", ""]);
    }

    #[test]
    fn test_mixed_flat_batch_strict() {
        let first: FlatRecord = serde_json::from_value(json!({"id": 1, "lang": "en"})).unwrap();
        let second: FlatRecord = serde_json::from_value(json!({"id": 2})).unwrap();
        let records = vec![first, second];

        let backfill = TableBuilder::default().build(&records).unwrap();
        assert_eq!(backfill.column("lang").unwrap(), ["en", " "]);

        let strict = TableBuilder::new(NormalizeConfig::default(), SchemaPolicy::Strict);
        let err = strict.build(&records).unwrap_err();
        assert!(matches!(err, Error::SchemaMismatch { row: 1, .. }));
    }
}
