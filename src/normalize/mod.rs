//! Record normalization - flatten raw posts and authors into flat records
//!
//! Raw API objects are semi-structured: fields come and go, entity lists may
//! be empty or absent. The normalizers here produce records with a fixed,
//! ordered key set so that a batch can be laid out as a table.

pub mod author;
pub mod fields;
pub mod post;
pub mod types;

pub use author::{normalize_author, AUTHOR_FIELDS, RELATIONSHIP_FIELDS};
pub use fields::{extract_field, flatten_entities, join_values, scalar_text};
pub use post::{normalize_post, normalize_post_value, post_columns, POST_FIELDS};
pub use types::{
    Author, FlatRecord, NormalizeConfig, Post, RecordKind, AUTHOR_PLACEHOLDER, POST_PLACEHOLDER,
};

use crate::error::Result;

/// Anything that can be turned into a flat record
pub trait Normalize {
    /// Kind of record produced, which selects the placeholder policy
    const KIND: RecordKind;

    fn normalize(&self, config: &NormalizeConfig) -> Result<FlatRecord>;
}

impl Normalize for Post {
    const KIND: RecordKind = RecordKind::Post;

    fn normalize(&self, config: &NormalizeConfig) -> Result<FlatRecord> {
        if FlatRecord::looks_flat(self.json()) {
            return Ok(FlatRecord::from(self.json().clone()));
        }
        normalize_post(self, config)
    }
}

impl Normalize for Author {
    const KIND: RecordKind = RecordKind::Author;

    fn normalize(&self, config: &NormalizeConfig) -> Result<FlatRecord> {
        Ok(normalize_author(self, config))
    }
}

/// Already flat: returned unchanged
impl Normalize for FlatRecord {
    const KIND: RecordKind = RecordKind::Post;

    fn normalize(&self, _config: &NormalizeConfig) -> Result<FlatRecord> {
        Ok(self.clone())
    }
}
