use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Placeholder written for an absent post field
pub const POST_PLACEHOLDER: &str = " ";

/// Placeholder written for an absent author field
pub const AUTHOR_PLACEHOLDER: &str = "";

/// A raw post as returned by the timeline API
///
/// The object is kept as-is; accessors read the handful of fields the
/// normalizer and the text helpers need.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Post {
    json: Map<String, Value>,
}

impl Post {
    pub fn new(json: Map<String, Value>) -> Self {
        Post { json }
    }

    /// Wrap a JSON value, returning `None` unless it is an object
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(json) => Some(Post { json }),
            _ => None,
        }
    }

    pub fn json(&self) -> &Map<String, Value> {
        &self.json
    }

    pub fn id(&self) -> Option<i64> {
        self.json.get("id").and_then(Value::as_i64)
    }

    /// Identifier used in error messages, `?` when the post has none
    pub fn label(&self) -> String {
        match self.json.get("id") {
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::String(s)) => s.clone(),
            _ => "?".to_string(),
        }
    }

    /// Extended text, falling back to the compat-mode `text` field
    pub fn full_text(&self) -> &str {
        self.json
            .get("full_text")
            .or_else(|| self.json.get("text"))
            .and_then(Value::as_str)
            .unwrap_or("")
    }

    pub fn entities(&self) -> Option<&Map<String, Value>> {
        self.json.get("entities").and_then(Value::as_object)
    }

    /// The embedded author sub-object
    pub fn author(&self) -> Option<Author> {
        self.json
            .get("user")
            .and_then(Value::as_object)
            .map(|user| Author::new(user.clone()))
    }

    /// The original post when this one is a retweet
    pub fn retweeted_status(&self) -> Option<Post> {
        self.json
            .get("retweeted_status")
            .and_then(Value::as_object)
            .map(|origin| Post::new(origin.clone()))
    }

    /// `[start, end)` of the displayable part of the text, in characters
    pub fn display_text_range(&self) -> Option<(usize, usize)> {
        let range = self.json.get("display_text_range")?.as_array()?;
        let start = range.first()?.as_u64()? as usize;
        let end = range.get(1)?.as_u64()? as usize;
        Some((start, end))
    }
}

/// A raw author profile, as embedded in every post under `user`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Author {
    json: Map<String, Value>,
}

impl Author {
    pub fn new(json: Map<String, Value>) -> Self {
        Author { json }
    }

    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(json) => Some(Author { json }),
            _ => None,
        }
    }

    pub fn json(&self) -> &Map<String, Value> {
        &self.json
    }

    pub fn id(&self) -> Option<i64> {
        self.json.get("id").and_then(Value::as_i64)
    }

    pub fn screen_name(&self) -> Option<&str> {
        self.json.get("screen_name").and_then(Value::as_str)
    }
}

/// A single-level record, ready for tabular assembly
///
/// Field order is the insertion order; the first record of a batch fixes the
/// column order of the resulting table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlatRecord {
    pub data: Map<String, Value>,
}

impl FlatRecord {
    pub fn new() -> Self {
        FlatRecord { data: Map::new() }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.data.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.data.keys()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Heuristic for JSON that has already been through the post normalizer:
    /// no nested `user` object, but a flattened `user_id` column.
    pub fn looks_flat(json: &Map<String, Value>) -> bool {
        !matches!(json.get("user"), Some(Value::Object(_))) && json.contains_key("user_id")
    }
}

impl From<Map<String, Value>> for FlatRecord {
    fn from(data: Map<String, Value>) -> Self {
        FlatRecord { data }
    }
}

/// Which kind of raw record a batch holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Post,
    Author,
}

/// Configuration for the normalizers
#[derive(Debug, Clone)]
pub struct NormalizeConfig {
    /// Value substituted for absent post fields
    pub post_placeholder: String,

    /// Value substituted for absent author fields
    pub author_placeholder: String,
}

impl NormalizeConfig {
    pub fn placeholder(&self, kind: RecordKind) -> &str {
        match kind {
            RecordKind::Post => &self.post_placeholder,
            RecordKind::Author => &self.author_placeholder,
        }
    }
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        NormalizeConfig {
            post_placeholder: String::from(POST_PLACEHOLDER),
            author_placeholder: String::from(AUTHOR_PLACEHOLDER),
        }
    }
}
