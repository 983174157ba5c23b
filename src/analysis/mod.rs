//! Text cleaning and sentiment scoring for posts

pub mod sentiment;
pub mod text;

pub use sentiment::{
    score_post, score_posts, LexiconAnalyzer, PolarityScores, PostSentiment, SentimentAnalyzer,
};
pub use text::{cleaned_text, display_text};
