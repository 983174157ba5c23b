use crate::normalize::NormalizeConfig;
use crate::table::SchemaPolicy;
use std::path::PathBuf;

/// Default post store
pub const TWEETS_CSV: &str = "tweets.csv";

/// Default author store
pub const USERS_CSV: &str = "users.csv";

/// Configuration for a pipeline run
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Store receiving one row per post
    pub tweets_path: PathBuf,

    /// Store receiving one row per author
    pub users_path: PathBuf,

    /// Placeholders for absent fields
    pub normalize: NormalizeConfig,

    /// How to treat records that miss a column of their batch
    pub schema_policy: SchemaPolicy,
}

impl PipelineConfig {
    /// Default file names, placed under `dir`
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        PipelineConfig {
            tweets_path: dir.join(TWEETS_CSV),
            users_path: dir.join(USERS_CSV),
            ..PipelineConfig::default()
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            tweets_path: PathBuf::from(TWEETS_CSV),
            users_path: PathBuf::from(USERS_CSV),
            normalize: NormalizeConfig::default(),
            schema_policy: SchemaPolicy::default(),
        }
    }
}
