//! # tweetmelt - timeline normalization toolkit
//!
//! Flattens raw social-media posts and their authors into flat tabular
//! records, scores post sentiment with a word lexicon, and merges the results
//! into CSV stores deduplicated by identifier.
//!
//! ## Modules
//!
//! - **normalize**: turn raw posts and authors into flat records
//! - **table**: lay out a batch of flat records as a column-oriented table
//! - **store**: read, merge and rewrite CSV stores
//! - **analysis**: cleaned text, display text and sentiment scoring
//! - **source** / **pipeline**: feed fetched timelines through the stores
//!
//! ## Quick Start
//!
//! ```rust
//! use tweetmelt::{Post, TableBuilder};
//! use serde_json::json;
//!
//! # fn main() -> tweetmelt::Result<()> {
//! let post = Post::from_value(json!({
//!     "id": 101,
//!     "full_text": "hello #rust",
//!     "user": {"id": 42, "screen_name": "ferris", "name": "Ferris"},
//!     "entities": {"hashtags": [{"text": "rust", "indices": [6, 11]}]}
//! }))
//! .unwrap();
//!
//! let table = TableBuilder::default().posts(&[post])?;
//! assert_eq!(table.cell(0, "entities_hashtags"), Some("rust"));
//! assert_eq!(table.cell(0, "coordinates"), Some(" "));
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod config;
pub mod error;
pub mod normalize;
pub mod pipeline;
pub mod source;
pub mod store;
pub mod table;

// Re-export commonly used types for convenience
pub use analysis::{LexiconAnalyzer, PolarityScores, SentimentAnalyzer};
pub use config::PipelineConfig;
pub use error::{Error, Result};
pub use normalize::{Author, FlatRecord, Normalize, NormalizeConfig, Post};
pub use pipeline::{Pipeline, PipelineReport};
pub use source::{ArchiveSource, TimelineSource};
pub use store::CsvStore;
pub use table::{SchemaPolicy, Table, TableBuilder, TableSchema};
