//! The normalize-and-store pipeline
//!
//! A [`Pipeline`] owns its configuration and stores; callers drive it with
//! batches of raw posts or with a [`TimelineSource`].

use crate::config::PipelineConfig;
use crate::error::{Error, Result};
use crate::normalize::{Author, Post};
use crate::source::TimelineSource;
use crate::store::CsvStore;
use crate::table::TableBuilder;
use tracing::info;

/// Row counts from one pipeline run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineReport {
    /// Posts in the batch
    pub posts: usize,
    /// Distinct author rows in the batch
    pub authors: usize,
    /// Rows in the post store after merging
    pub tweets_stored: usize,
    /// Rows in the author store after merging
    pub users_stored: usize,
}

pub struct Pipeline {
    builder: TableBuilder,
    tweets: CsvStore,
    users: CsvStore,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Pipeline {
            builder: TableBuilder::new(config.normalize, config.schema_policy),
            tweets: CsvStore::new(config.tweets_path),
            users: CsvStore::new(config.users_path),
        }
    }

    pub fn tweets(&self) -> &CsvStore {
        &self.tweets
    }

    pub fn users(&self) -> &CsvStore {
        &self.users
    }

    /// Normalize a batch of posts and merge it into both stores
    ///
    /// Both tables are built before either store is touched, so a post with a
    /// missing author leaves the stores as they were.
    pub fn process_posts(&self, posts: &[Post]) -> Result<PipelineReport> {
        if posts.is_empty() {
            info!("No posts to process");
            return Ok(PipelineReport::default());
        }

        let authors = posts
            .iter()
            .map(|post| {
                post.author().ok_or_else(|| Error::MissingAuthor {
                    post: post.label(),
                    field: "user",
                })
            })
            .collect::<Result<Vec<Author>>>()?;

        let users = self.builder.authors(&authors)?;
        let tweets = self.builder.posts(posts)?;

        let users_stored = self.users.save(&users)?.len();
        let tweets_stored = self.tweets.save(&tweets)?.len();

        Ok(PipelineReport {
            posts: tweets.len(),
            authors: users.len(),
            tweets_stored,
            users_stored,
        })
    }

    /// Fetch one page of an account's timeline and process it
    pub fn ingest_timeline<S: TimelineSource + ?Sized>(
        &self,
        source: &S,
        handle: &str,
        count: usize,
        page: usize,
    ) -> Result<(Vec<Post>, PipelineReport)> {
        let posts = source.user_timeline(handle, count, page)?;
        info!(handle, page, fetched = posts.len(), "Fetched timeline page");
        let report = self.process_posts(&posts)?;
        Ok((posts, report))
    }
}
