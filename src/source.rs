//! Timeline sources
//!
//! The pipeline never talks to the network itself. It asks a
//! [`TimelineSource`] for already-fetched raw posts; [`ArchiveSource`] serves
//! them from a dump of API responses on disk.

use crate::error::{Error, Result};
use crate::normalize::Post;
use serde_json::Value;
use std::path::Path;
use tracing::debug;

/// Supplies raw posts for an account
pub trait TimelineSource {
    /// One page of the account's timeline, newest first as the source orders it
    ///
    /// `page` is 1-based; `count` is the page size.
    fn user_timeline(&self, handle: &str, count: usize, page: usize) -> Result<Vec<Post>>;
}

/// Posts read from an archived API dump
///
/// Accepts a JSON array of posts (the shape of a timeline response), a single
/// post object, or newline-delimited JSON with one post per line.
#[derive(Debug, Clone, Default)]
pub struct ArchiveSource {
    posts: Vec<Post>,
}

impl ArchiveSource {
    pub fn new(posts: Vec<Post>) -> Self {
        ArchiveSource { posts }
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = std::fs::read(path.as_ref())?;
        let source = Self::from_bytes(&bytes)?;
        debug!(path = %path.as_ref().display(), posts = source.posts.len(), "Loaded archive");
        Ok(source)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        // simd-json parses in place, so it gets a scratch copy
        let mut scratch = bytes.to_vec();
        let values = match simd_json::serde::from_slice::<Value>(&mut scratch) {
            Ok(Value::Array(items)) => items,
            Ok(single) => vec![single],
            Err(_) => parse_ndjson(bytes)?,
        };

        let posts = values
            .into_iter()
            .enumerate()
            .map(|(index, value)| Post::from_value(value).ok_or(Error::NotAnObject { index }))
            .collect::<Result<Vec<_>>>()?;

        Ok(ArchiveSource { posts })
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn into_posts(self) -> Vec<Post> {
        self.posts
    }
}

impl TimelineSource for ArchiveSource {
    fn user_timeline(&self, handle: &str, count: usize, page: usize) -> Result<Vec<Post>> {
        let handle = handle.trim_start_matches('@');
        let skip = page.saturating_sub(1).saturating_mul(count);

        Ok(self
            .posts
            .iter()
            .filter(|post| {
                post.author()
                    .and_then(|a| a.screen_name().map(|s| s.eq_ignore_ascii_case(handle)))
                    .unwrap_or(false)
            })
            .skip(skip)
            .take(count)
            .cloned()
            .collect())
    }
}

fn parse_ndjson(bytes: &[u8]) -> Result<Vec<Value>> {
    let text = String::from_utf8_lossy(bytes);
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| serde_json::from_str(line).map_err(Error::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARRAY: &str = r#"[
        {"id": 1, "user": {"id": 10, "screen_name": "Ferris"}},
        {"id": 2, "user": {"id": 11, "screen_name": "corro"}},
        {"id": 3, "user": {"id": 10, "screen_name": "ferris"}},
        {"id": 4, "user": {"id": 10, "screen_name": "ferris"}}
    ]"#;

    #[test]
    fn test_array_dump() {
        let source = ArchiveSource::from_bytes(ARRAY.as_bytes()).unwrap();
        assert_eq!(source.posts().len(), 4);
    }

    #[test]
    fn test_ndjson_dump() {
        let dump = "{\"id\": 1}\n\n{\"id\": 2}\n";
        let source = ArchiveSource::from_bytes(dump.as_bytes()).unwrap();

        let ids: Vec<_> = source.posts().iter().map(Post::id).collect();
        assert_eq!(ids, vec![Some(1), Some(2)]);
    }

    #[test]
    fn test_single_object_dump() {
        let source = ArchiveSource::from_bytes(br#"{"id": 9}"#).unwrap();
        assert_eq!(source.posts()[0].id(), Some(9));
    }

    #[test]
    fn test_non_object_rejected() {
        let err = ArchiveSource::from_bytes(b"[{\"id\": 1}, 5]").unwrap_err();
        assert!(matches!(err, Error::NotAnObject { index: 1 }));
    }

    #[test]
    fn test_timeline_filters_and_pages() {
        let source = ArchiveSource::from_bytes(ARRAY.as_bytes()).unwrap();

        let first = source.user_timeline("@ferris", 2, 1).unwrap();
        assert_eq!(first.iter().map(Post::id).collect::<Vec<_>>(), vec![Some(1), Some(3)]);

        let second = source.user_timeline("ferris", 2, 2).unwrap();
        assert_eq!(second.iter().map(Post::id).collect::<Vec<_>>(), vec![Some(4)]);

        assert!(source.user_timeline("nobody", 50, 1).unwrap().is_empty());
    }

    #[test]
    fn test_timeline_past_the_end_is_empty() {
        let source = ArchiveSource::from_bytes(ARRAY.as_bytes()).unwrap();

        assert!(source.user_timeline("ferris", usize::MAX, 3).unwrap().is_empty());
        assert!(source.user_timeline("ferris", 2, usize::MAX).unwrap().is_empty());
        assert_eq!(source.user_timeline("ferris", usize::MAX, 1).unwrap().len(), 3);
    }
}
