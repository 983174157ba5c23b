//! Post normalization
//!
//! Turns one raw post into one flat record with a fixed column order.

use crate::error::{Error, Result};
use crate::normalize::fields::{extract_field, flatten_entities};
use crate::normalize::types::{FlatRecord, NormalizeConfig, Post};
use serde_json::Value;

/// Top-level post fields copied as-is, in column order
pub const POST_FIELDS: [&str; 16] = [
    "created_at",
    "id",
    "full_text",
    "source",
    "in_reply_to_status_id",
    "in_reply_to_user_id",
    "in_reply_to_screen_name",
    "geo",
    "coordinates",
    "place",
    "is_quote_status",
    "retweet_count",
    "favorite_count",
    "lang",
    "possibly_sensitive",
    "quoted_status_id",
];

/// Required author fields: (column, key inside `user`)
pub const AUTHOR_REF_FIELDS: [(&str, &str); 3] = [
    ("user_id", "id"),
    ("user_screen_name", "screen_name"),
    ("user_name", "name"),
];

/// Flattened entity columns: (column, category, attribute)
pub const ENTITY_COLUMNS: [(&str, &str, &str); 4] = [
    ("entities_hashtags", "hashtags", "text"),
    ("entities_user_mentions_ids", "user_mentions", "id_str"),
    ("entities_urls", "urls", "url"),
    ("entities_media_urls", "media", "url"),
];

/// Column holding the id of the retweeted original
pub const RETWEET_COLUMN: &str = "retweeted_status";

/// Every column of a normalized post, in order
pub fn post_columns() -> Vec<&'static str> {
    POST_FIELDS
        .iter()
        .copied()
        .chain(AUTHOR_REF_FIELDS.iter().map(|(column, _)| *column))
        .chain(std::iter::once(RETWEET_COLUMN))
        .chain(ENTITY_COLUMNS.iter().map(|(column, _, _)| *column))
        .collect()
}

/// Normalize a raw post into a flat record
///
/// Absent optional fields become the post placeholder. The author reference
/// is required: a missing `user` object or a missing `id`, `screen_name` or
/// `name` inside it fails with [`Error::MissingAuthor`].
pub fn normalize_post(post: &Post, config: &NormalizeConfig) -> Result<FlatRecord> {
    let placeholder = config.post_placeholder.as_str();
    let json = post.json();
    let mut flat = FlatRecord::new();

    for field in POST_FIELDS {
        flat.insert(field, extract_field(json, field, placeholder));
    }

    let user = json
        .get("user")
        .and_then(Value::as_object)
        .ok_or_else(|| Error::MissingAuthor {
            post: post.label(),
            field: "user",
        })?;

    for (column, key) in AUTHOR_REF_FIELDS {
        let value = user.get(key).cloned().ok_or_else(|| Error::MissingAuthor {
            post: post.label(),
            field: key,
        })?;
        flat.insert(column, value);
    }

    let retweet_origin = post
        .retweeted_status()
        .and_then(|origin| origin.json().get("id").cloned())
        .unwrap_or_else(|| Value::String(placeholder.to_string()));
    flat.insert(RETWEET_COLUMN, retweet_origin);

    let entities = post.entities();
    for (column, category, attribute) in ENTITY_COLUMNS {
        flat.insert(column, flatten_entities(entities, category, attribute, placeholder));
    }

    Ok(flat)
}

/// Normalize a post given as plain JSON
///
/// JSON that already has the flat shape is returned unchanged, so running a
/// batch through the normalizer twice is harmless.
pub fn normalize_post_value(value: &Value, index: usize, config: &NormalizeConfig) -> Result<FlatRecord> {
    let json = value.as_object().ok_or(Error::NotAnObject { index })?;

    if FlatRecord::looks_flat(json) {
        return Ok(FlatRecord::from(json.clone()));
    }

    normalize_post(&Post::new(json.clone()), config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn post(value: Value) -> Post {
        Post::from_value(value).unwrap()
    }

    fn sample() -> Value {
        json!({
            "created_at": "Mon Oct 05 12:00:00 +0000 2020",
            "id": 101,
            "full_text": "hello #rust @ferris https://t.co/x",
            "source": "web",
            "in_reply_to_status_id": null,
            "is_quote_status": false,
            "retweet_count": 3,
            "favorite_count": 10,
            "lang": "en",
            "user": {"id": 42, "screen_name": "ferris", "name": "Ferris"},
            "entities": {
                "hashtags": [{"text": "rust", "indices": [6, 11]}],
                "user_mentions": [{"id_str": "7", "indices": [12, 19]}],
                "urls": [{"url": "https://t.co/x", "indices": [20, 34]}]
            }
        })
    }

    #[test]
    fn test_normalize_column_order() {
        let flat = normalize_post(&post(sample()), &NormalizeConfig::default()).unwrap();

        let keys: Vec<&str> = flat.keys().map(String::as_str).collect();
        assert_eq!(keys, post_columns());
        assert_eq!(flat.len(), 24);
    }

    #[test]
    fn test_normalize_values() {
        let flat = normalize_post(&post(sample()), &NormalizeConfig::default()).unwrap();

        assert_eq!(flat.get("id").unwrap(), 101);
        assert_eq!(flat.get("user_id").unwrap(), 42);
        assert_eq!(flat.get("user_screen_name").unwrap(), "ferris");
        assert_eq!(flat.get("in_reply_to_status_id").unwrap(), &Value::Null);
        assert_eq!(flat.get("coordinates").unwrap(), " ");
        assert_eq!(flat.get("quoted_status_id").unwrap(), " ");
        assert_eq!(flat.get("retweeted_status").unwrap(), " ");
        assert_eq!(flat.get("entities_hashtags").unwrap(), "rust");
        assert_eq!(flat.get("entities_user_mentions_ids").unwrap(), "7");
        assert_eq!(flat.get("entities_urls").unwrap(), "https://t.co/x");
        assert_eq!(flat.get("entities_media_urls").unwrap(), " ");
    }

    #[test]
    fn test_retweet_origin() {
        let mut raw = sample();
        raw["retweeted_status"] = json!({"id": 999, "full_text": "original"});

        let flat = normalize_post(&post(raw), &NormalizeConfig::default()).unwrap();
        assert_eq!(flat.get("retweeted_status").unwrap(), 999);
    }

    #[test]
    fn test_missing_author_id_is_fatal() {
        let mut raw = sample();
        raw["user"] = json!({"screen_name": "ferris", "name": "Ferris"});

        let err = normalize_post(&post(raw), &NormalizeConfig::default()).unwrap_err();
        match err {
            Error::MissingAuthor { post, field } => {
                assert_eq!(post, "101");
                assert_eq!(field, "id");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_user_object_is_fatal() {
        let mut raw = sample();
        raw.as_object_mut().unwrap().remove("user");

        let err = normalize_post(&post(raw), &NormalizeConfig::default()).unwrap_err();
        assert!(matches!(err, Error::MissingAuthor { field: "user", .. }));
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let config = NormalizeConfig::default();
        let raw = sample();

        let once = normalize_post_value(&raw, 0, &config).unwrap();
        let again = normalize_post_value(&raw, 0, &config).unwrap();
        assert_eq!(once, again);

        let flat_json = serde_json::to_value(&once).unwrap();
        let twice = normalize_post_value(&flat_json, 0, &config).unwrap();
        assert_eq!(twice, once);
    }

    #[test]
    fn test_non_object_rejected() {
        let err = normalize_post_value(&json!([1, 2]), 3, &NormalizeConfig::default()).unwrap_err();
        assert!(matches!(err, Error::NotAnObject { index: 3 }));
    }
}
