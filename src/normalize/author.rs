use crate::normalize::fields::extract_field;
use crate::normalize::types::{Author, FlatRecord, NormalizeConfig};
use serde_json::Value;

/// Profile attributes copied from the author object, in column order
pub const AUTHOR_FIELDS: [&str; 36] = [
    "id",
    "name",
    "screen_name",
    "location",
    "profile_location",
    "description",
    "url",
    "protected",
    "followers_count",
    "friends_count",
    "listed_count",
    "created_at",
    "favourites_count",
    "utc_offset",
    "time_zone",
    "geo_enabled",
    "verified",
    "statuses_count",
    "lang",
    "contributors_enabled",
    "is_translator",
    "is_translation_enabled",
    "profile_background_color",
    "profile_background_image_url",
    "profile_background_tile",
    "profile_image_url",
    "profile_banner_url",
    "profile_link_color",
    "profile_sidebar_border_color",
    "profile_sidebar_fill_color",
    "profile_text_color",
    "profile_use_background_image",
    "has_extended_profile",
    "default_profile",
    "default_profile_image",
    "translator_type",
];

/// Relationship columns kept in the schema but never filled here
pub const RELATIONSHIP_FIELDS: [&str; 2] = ["known_friends", "known_followers"];

/// Normalize an author profile into a flat record
///
/// Every attribute is optional and defaults to the author placeholder.
pub fn normalize_author(author: &Author, config: &NormalizeConfig) -> FlatRecord {
    let placeholder = config.author_placeholder.as_str();
    let mut flat = FlatRecord::new();

    for field in AUTHOR_FIELDS {
        flat.insert(field, extract_field(author.json(), field, placeholder));
    }
    for field in RELATIONSHIP_FIELDS {
        flat.insert(field, Value::String(String::new()));
    }

    flat
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_author_fields() {
        let author = Author::from_value(json!({
            "id": 42,
            "name": "Ferris",
            "screen_name": "ferris",
            "followers_count": 1000,
            "verified": true,
            "profile_location": null,
            "entities": {"url": {}}
        }))
        .unwrap();

        let flat = normalize_author(&author, &NormalizeConfig::default());

        assert_eq!(flat.len(), 38);
        assert_eq!(flat.get("id").unwrap(), 42);
        assert_eq!(flat.get("verified").unwrap(), true);
        assert_eq!(flat.get("profile_location").unwrap(), &Value::Null);
        assert_eq!(flat.get("time_zone").unwrap(), "");
        assert_eq!(flat.get("known_friends").unwrap(), "");
        assert!(!flat.contains_key("entities"));

        let keys: Vec<&String> = flat.keys().collect();
        assert_eq!(keys[0], "id");
        assert_eq!(keys[35], "translator_type");
        assert_eq!(keys[37], "known_followers");
    }
}
