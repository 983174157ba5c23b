use serde_json::{json, Value};
use tempfile::TempDir;
use tweetmelt::store;
use tweetmelt::{ArchiveSource, Pipeline, PipelineConfig, Post, TableBuilder};

fn raw_post(id: i64, favorite_count: i64, extra: Value) -> Post {
    let mut value = json!({
        "created_at": "Tue Oct 06 09:30:00 +0000 2020",
        "id": id,
        "full_text": format!("post number {id}"),
        "source": "<a href=\"https://example.com\">web</a>",
        "is_quote_status": false,
        "retweet_count": 0,
        "favorite_count": favorite_count,
        "lang": "en",
        "user": {
            "id": 42,
            "name": "Ferris",
            "screen_name": "ferris",
            "followers_count": 100
        },
        "entities": {"hashtags": [], "user_mentions": [], "urls": []}
    });
    for (key, v) in extra.as_object().unwrap() {
        value[key] = v.clone();
    }
    Post::from_value(value).unwrap()
}

#[test]
fn test_normalize_build_and_merge() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tweets.csv");
    let builder = TableBuilder::default();

    let first = raw_post(101, 1, json!({}));
    let quote = raw_post(
        102,
        3,
        json!({
            "is_quote_status": true,
            "quoted_status_id": 999,
            "entities": {"hashtags": [{"text": "#test", "indices": [0, 5]}]}
        }),
    );

    let table = builder.posts(&[first, quote]).unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(table.column("entities_hashtags").unwrap(), [" ", "#test"]);
    assert_eq!(table.column("quoted_status_id").unwrap(), [" ", "999"]);

    store::save(&table, &path).unwrap();

    let updated = builder.posts(&[raw_post(101, 57, json!({}))]).unwrap();
    store::save(&updated, &path).unwrap();

    let stored = store::load(&path).unwrap();
    assert_eq!(stored.len(), 2);

    let ids = stored.column("id").unwrap();
    let favorites = stored.column("favorite_count").unwrap();
    let row = ids.iter().position(|id| id == "101").unwrap();
    assert_eq!(favorites[row], "57");
    assert!(ids.iter().any(|id| id == "102"));
}

#[test]
fn test_pipeline_over_archive_is_rerunnable() {
    let dir = TempDir::new().unwrap();
    let archive = json!([
        raw_post(1, 0, json!({})),
        raw_post(2, 0, json!({"retweeted_status": {"id": 77, "full_text": "orig"}})),
        raw_post(3, 0, json!({"user": {"id": 43, "screen_name": "corro", "name": "Corro"}})),
    ]);
    let source = ArchiveSource::from_bytes(archive.to_string().as_bytes()).unwrap();
    let pipeline = Pipeline::new(PipelineConfig::in_dir(dir.path()));

    let first = pipeline.process_posts(source.posts()).unwrap();
    let second = pipeline.process_posts(source.posts()).unwrap();

    assert_eq!(first.tweets_stored, 3);
    assert_eq!(first.users_stored, 2);
    assert_eq!(second.tweets_stored, 3);
    assert_eq!(second.users_stored, 2);

    let tweets = store::load(dir.path().join("tweets.csv")).unwrap();
    assert_eq!(tweets.column("retweeted_status").unwrap(), [" ", "77", " "]);

    let users = store::load(dir.path().join("users.csv")).unwrap();
    assert_eq!(users.column_names().count(), 38);
    assert_eq!(users.column("screen_name").unwrap(), ["ferris", "corro"]);
}

#[test]
fn test_ingest_one_page_of_one_account() {
    let dir = TempDir::new().unwrap();
    let archive = json!([
        raw_post(1, 0, json!({})),
        raw_post(2, 0, json!({"user": {"id": 43, "screen_name": "corro", "name": "Corro"}})),
        raw_post(3, 0, json!({})),
    ]);
    let source = ArchiveSource::from_bytes(archive.to_string().as_bytes()).unwrap();
    let pipeline = Pipeline::new(PipelineConfig::in_dir(dir.path()));

    let (posts, report) = pipeline.ingest_timeline(&source, "@Ferris", 50, 1).unwrap();

    assert_eq!(posts.len(), 2);
    assert_eq!(report.tweets_stored, 2);
    assert_eq!(report.users_stored, 1);
}
