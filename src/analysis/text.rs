//! Post text helpers
//!
//! Entity spans are given by the API as `[start, end)` character offsets into
//! `full_text`, counted in code points.

use crate::normalize::Post;
use serde_json::Value;

/// Text with every entity span removed, for sentiment scoring
///
/// Retweets are scored on the original post's text and entities.
pub fn cleaned_text(post: &Post) -> String {
    match post.retweeted_status() {
        Some(origin) => strip_entity_spans(&origin),
        None => strip_entity_spans(post),
    }
}

fn strip_entity_spans(post: &Post) -> String {
    let text = post.full_text();
    let len = text.chars().count();

    // Offsets past the end of the text are clamped
    let mut spans: Vec<(usize, usize)> = entity_spans(post)
        .map(|(start, end)| (start, end.min(len)))
        .filter(|(start, end)| start < end)
        .collect();
    spans.sort_unstable();

    let mut spans = spans.into_iter().peekable();
    let mut covered_until = 0;
    text.chars()
        .enumerate()
        .filter(|&(i, _)| {
            while let Some(&(start, end)) = spans.peek() {
                if start > i {
                    break;
                }
                covered_until = covered_until.max(end);
                spans.next();
            }
            i >= covered_until
        })
        .map(|(_, c)| c)
        .collect()
}

/// `(start, end)` of every entity, across all categories
fn entity_spans(post: &Post) -> impl Iterator<Item = (usize, usize)> + '_ {
    post.entities()
        .into_iter()
        .flat_map(|entities| entities.values())
        .filter_map(Value::as_array)
        .flatten()
        .filter_map(|entity| indices(entity.get("indices")?))
}

fn indices(value: &Value) -> Option<(usize, usize)> {
    let pair = value.as_array()?;
    let start = pair.first()?.as_u64()? as usize;
    let end = pair.get(1)?.as_u64()? as usize;
    Some((start, end))
}

/// The part of the text a client would display
///
/// Cut at the end of `display_text_range`, or earlier at the first link or
/// media attachment, whichever comes first.
pub fn display_text(post: &Post) -> String {
    let text = post.full_text();
    let mut end = post
        .display_text_range()
        .map(|(_, end)| end)
        .unwrap_or_else(|| text.chars().count());

    for category in ["urls", "media"] {
        let first_start = post
            .entities()
            .and_then(|e| e.get(category))
            .and_then(Value::as_array)
            .and_then(|list| list.first())
            .and_then(|entity| indices(entity.get("indices")?))
            .map(|(start, _)| start);
        if let Some(start) = first_start {
            end = end.min(start);
        }
    }

    text.chars().take(end).collect()
}
