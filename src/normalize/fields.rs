//! Field extraction and entity flattening
//!
//! Both helpers are total: an absent field or entity category yields the
//! placeholder, never an error.

use serde_json::{Map, Value};

/// Return the record's value for `name`, or `placeholder` when the key is absent
///
/// A key that is present with a `null` value is returned as `null`.
pub fn extract_field(record: &Map<String, Value>, name: &str, placeholder: &str) -> Value {
    record
        .get(name)
        .cloned()
        .unwrap_or_else(|| Value::String(placeholder.to_string()))
}

/// Join `attribute` of every entity in `category` with a single space
///
/// Entities are visited in the order the API returned them. If the category is
/// absent, empty or not a list, or any entity lacks the attribute, the
/// placeholder is returned instead.
pub fn flatten_entities(
    entities: Option<&Map<String, Value>>,
    category: &str,
    attribute: &str,
    placeholder: &str,
) -> Value {
    let joined = entities
        .and_then(|e| e.get(category))
        .and_then(Value::as_array)
        .filter(|list| !list.is_empty())
        .and_then(|list| {
            list.iter()
                .map(|entity| entity.get(attribute))
                .collect::<Option<Vec<&Value>>>()
        })
        .map(join_values);

    Value::String(joined.unwrap_or_else(|| placeholder.to_string()))
}

/// Space-join the text form of a list of values
pub fn join_values<'a>(values: impl IntoIterator<Item = &'a Value>) -> String {
    values
        .into_iter()
        .map(scalar_text)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Text form of a value as written to a CSV cell
///
/// Strings are kept verbatim, booleans use the `True`/`False` spelling found in
/// existing stores, `null` becomes an empty cell and nested values are written
/// as compact JSON.
pub fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Null => String::new(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}
