//! Lexicon-based sentiment scoring
//!
//! [`LexiconAnalyzer`] follows the VADER rule set: per-word valences from a
//! lexicon, adjusted by intensifiers, negations, capitalization, a contrastive
//! "but" and trailing punctuation, then squashed into a compound score.

use crate::analysis::text::{cleaned_text, display_text};
use crate::error::{Error, Result};
use crate::normalize::Post;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::io::BufRead;

/// Polarity scores for one text
///
/// `neg`, `neu` and `pos` are proportions summing to about 1; `compound` is
/// the normalized total in `[-1, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PolarityScores {
    pub neg: f64,
    pub neu: f64,
    pub pos: f64,
    pub compound: f64,
}

/// Scores text polarity
pub trait SentimentAnalyzer {
    fn polarity_scores(&self, text: &str) -> PolarityScores;
}

/// Sentiment of one post, with the text a reader would see
#[derive(Debug, Clone, Serialize)]
pub struct PostSentiment {
    pub id: Option<i64>,
    pub text: String,
    pub scores: PolarityScores,
}

/// Score a post on its cleaned text
pub fn score_post<A: SentimentAnalyzer + ?Sized>(post: &Post, analyzer: &A) -> PolarityScores {
    analyzer.polarity_scores(&cleaned_text(post))
}

pub fn score_posts<A: SentimentAnalyzer + ?Sized>(posts: &[Post], analyzer: &A) -> Vec<PostSentiment> {
    posts
        .iter()
        .map(|post| PostSentiment {
            id: post.id(),
            text: display_text(post),
            scores: score_post(post, analyzer),
        })
        .collect()
}

// Empirically derived constants of the VADER model
const BOOST_INCR: f64 = 0.293;
const BOOST_DECR: f64 = -0.293;
const CAPS_INCR: f64 = 0.733;
const NEGATION_SCALAR: f64 = -0.74;
const NORMALIZE_ALPHA: f64 = 15.0;
const EXCLAMATION_INCR: f64 = 0.292;
const QUESTION_INCR: f64 = 0.18;

static EDGE_PUNCTUATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\p{P}\p{S}]+|[\p{P}\p{S}]+$").unwrap());

static NEGATIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "aint", "arent", "cannot", "cant", "couldnt", "darent", "didnt", "doesnt", "dont",
        "hadnt", "hasnt", "havent", "isnt", "mightnt", "mustnt", "neither", "never", "no",
        "nobody", "none", "nope", "nor", "not", "nothing", "nowhere", "shouldnt", "wasnt",
        "werent", "without", "wont", "wouldnt",
    ]
    .into_iter()
    .collect()
});

static BOOSTERS: Lazy<HashMap<&'static str, f64>> = Lazy::new(|| {
    let up = [
        "absolutely", "amazingly", "completely", "considerably", "deeply", "effing",
        "enormously", "entirely", "especially", "exceptionally", "extremely", "fully",
        "greatly", "highly", "hugely", "incredibly", "intensely", "majorly", "more", "most",
        "particularly", "purely", "quite", "really", "remarkably", "so", "substantially",
        "thoroughly", "totally", "tremendously", "uber", "unbelievably", "unusually", "utterly",
        "very",
    ];
    let down = [
        "almost", "barely", "hardly", "kinda", "less", "little", "marginally", "occasionally",
        "partly", "scarcely", "slightly", "somewhat", "sorta",
    ];
    up.into_iter()
        .map(|w| (w, BOOST_INCR))
        .chain(down.into_iter().map(|w| (w, BOOST_DECR)))
        .collect()
});

static DEFAULT_LEXICON: Lazy<HashMap<String, f64>> = Lazy::new(|| {
    [
        ("abandon", -1.9), ("abuse", -3.2), ("admire", 2.1), ("afraid", -2.2),
        ("agree", 1.5), ("amazing", 2.8), ("anger", -2.7), ("angry", -2.3),
        ("annoying", -1.7), ("awesome", 3.1), ("awful", -2.0), ("bad", -2.5),
        ("beautiful", 2.9), ("best", 3.2), ("better", 1.9), ("blame", -1.4),
        ("bless", 1.8), ("boring", -1.3), ("brave", 2.4), ("brilliant", 2.8),
        ("broken", -2.1), ("calm", 1.3), ("celebrate", 2.7), ("cheat", -2.0),
        ("clean", 1.7), ("corrupt", -3.0), ("crazy", -1.4), ("crime", -2.5),
        ("crisis", -3.1), ("cruel", -2.8), ("damage", -2.2), ("danger", -2.4),
        ("dead", -3.3), ("death", -2.9), ("defeat", -2.0), ("delight", 2.9),
        ("destroy", -2.7), ("disaster", -3.1), ("disgrace", -2.2), ("dishonest", -2.7),
        ("dumb", -2.3), ("easy", 1.9), ("enemy", -2.5), ("enjoy", 2.2),
        ("evil", -3.4), ("excellent", 2.7), ("excited", 1.4), ("fail", -2.5),
        ("failed", -2.3), ("failing", -2.3), ("fair", 1.3), ("fake", -2.1),
        ("fantastic", 2.6), ("fear", -2.2), ("fight", -1.6), ("fine", 0.8),
        ("fool", -1.9), ("fraud", -2.8), ("free", 2.3), ("friend", 2.2),
        ("fun", 2.3), ("funny", 1.9), ("glad", 2.0), ("good", 1.9),
        ("great", 3.1), ("greatest", 3.2), ("happy", 2.7), ("harm", -2.5),
        ("hate", -2.7), ("hero", 2.6), ("honest", 2.3), ("honor", 2.2),
        ("hope", 1.9), ("horrible", -2.5), ("hurt", -2.4), ("ill", -1.8),
        ("illegal", -2.6), ("incredible", 2.5), ("joy", 2.8), ("kill", -3.7),
        ("kind", 2.4), ("lie", -1.6), ("liar", -2.8), ("lies", -1.8),
        ("like", 1.5), ("lol", 1.8), ("lose", -1.6), ("loser", -2.4),
        ("lost", -1.3), ("love", 3.2), ("lovely", 2.8), ("lucky", 1.8),
        ("mad", -2.2), ("mess", -1.5), ("miss", -0.6), ("nasty", -2.6),
        ("nice", 1.8), ("no", -1.2), ("pain", -2.3), ("peace", 2.5),
        ("perfect", 2.7), ("pleasant", 2.3), ("poor", -2.1), ("pretty", 2.2),
        ("problem", -1.7), ("proud", 2.1), ("protect", 1.6), ("rigged", -2.0),
        ("sad", -2.1), ("safe", 1.9), ("scandal", -1.9), ("scary", -2.2),
        ("shame", -2.1), ("sick", -2.3), ("smart", 1.7), ("sorry", -0.3),
        ("strong", 2.3), ("stupid", -2.4), ("success", 2.7), ("successful", 2.8),
        ("support", 1.7), ("sweet", 2.0), ("terrible", -2.1), ("terror", -3.0),
        ("thank", 1.5), ("thanks", 1.9), ("threat", -2.4), ("tragic", -3.4),
        ("tremendous", 1.9), ("trouble", -1.7), ("trust", 2.3), ("ugly", -2.3),
        ("unfair", -2.1), ("violence", -3.1), ("war", -2.9), ("weak", -1.9),
        ("welcome", 2.0), ("win", 2.8), ("winner", 2.8), ("winning", 2.4),
        ("wonderful", 2.7), ("worse", -2.1), ("worst", -3.1), ("wow", 2.8),
        ("wrong", -2.1), ("yes", 1.7), (":)", 2.0), (":(", -1.9),
        (":d", 2.3), ("<3", 1.9),
    ]
    .into_iter()
    .map(|(word, valence)| (word.to_string(), valence))
    .collect()
});

/// VADER-style analyzer over a word valence lexicon
#[derive(Debug, Clone)]
pub struct LexiconAnalyzer {
    lexicon: HashMap<String, f64>,
}

impl Default for LexiconAnalyzer {
    fn default() -> Self {
        LexiconAnalyzer {
            lexicon: DEFAULT_LEXICON.clone(),
        }
    }
}

impl LexiconAnalyzer {
    pub fn with_lexicon(lexicon: HashMap<String, f64>) -> Self {
        LexiconAnalyzer { lexicon }
    }

    /// Load a lexicon in the VADER file format
    ///
    /// One entry per line: `token<TAB>mean valence`, optionally followed by
    /// more tab-separated columns which are ignored. Blank lines are skipped.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut lexicon = HashMap::new();
        for (number, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let mut parts = line.split('\t');
            let token = parts.next().map(str::trim).filter(|t| !t.is_empty());
            let valence = parts.next().and_then(|v| v.trim().parse::<f64>().ok());
            match (token, valence) {
                (Some(token), Some(valence)) => {
                    lexicon.insert(token.to_lowercase(), valence);
                }
                _ => return Err(Error::InvalidLexicon { line: number + 1 }),
            }
        }
        Ok(Self::with_lexicon(lexicon))
    }

    pub fn len(&self) -> usize {
        self.lexicon.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lexicon.is_empty()
    }

    fn valence(&self, word: &str) -> Option<f64> {
        self.lexicon.get(word).copied()
    }

    /// Valence of every token, after all word-level rules
    fn token_valences(&self, tokens: &[Token]) -> Vec<f64> {
        let mixed_caps = tokens.iter().any(|t| t.all_caps) && tokens.iter().any(|t| !t.all_caps);
        let mut valences = Vec::with_capacity(tokens.len());

        for (i, token) in tokens.iter().enumerate() {
            if BOOSTERS.contains_key(token.lower.as_str()) {
                valences.push(0.0);
                continue;
            }
            if token.lower == "kind" && tokens.get(i + 1).is_some_and(|t| t.lower == "of") {
                valences.push(0.0);
                continue;
            }
            let Some(mut valence) = self.valence(&token.lower) else {
                valences.push(0.0);
                continue;
            };

            if token.all_caps && mixed_caps {
                valence += CAPS_INCR.copysign(valence);
            }

            for distance in 1..=3 {
                let Some(prev) = i.checked_sub(distance).map(|j| &tokens[j]) else {
                    break;
                };
                if self.valence(&prev.lower).is_none() {
                    let damping = match distance {
                        1 => 1.0,
                        2 => 0.95,
                        _ => 0.9,
                    };
                    valence += booster_scalar(prev, valence, mixed_caps) * damping;
                }
                if is_negation(prev) {
                    valence *= NEGATION_SCALAR;
                }
            }

            valences.push(valence);
        }

        apply_but_contrast(tokens, &mut valences);
        valences
    }
}

impl SentimentAnalyzer for LexiconAnalyzer {
    fn polarity_scores(&self, text: &str) -> PolarityScores {
        let tokens = self.tokenize(text);
        let valences = self.token_valences(&tokens);
        if valences.is_empty() {
            return PolarityScores::default();
        }

        let emphasis = punctuation_emphasis(text);
        let mut total: f64 = valences.iter().sum();
        if total > 0.0 {
            total += emphasis;
        } else if total < 0.0 {
            total -= emphasis;
        }

        let (mut pos, mut neg, mut neu) = (0.0, 0.0, 0.0);
        for &v in &valences {
            if v > 0.0 {
                pos += v + 1.0;
            } else if v < 0.0 {
                neg += v - 1.0;
            } else {
                neu += 1.0;
            }
        }
        if pos > neg.abs() {
            pos += emphasis;
        } else if pos < neg.abs() {
            neg -= emphasis;
        }

        let sum = pos + neg.abs() + neu;
        PolarityScores {
            neg: round(neg.abs() / sum, 3),
            neu: round(neu / sum, 3),
            pos: round(pos / sum, 3),
            compound: round(normalize(total), 4),
        }
    }
}

struct Token {
    lower: String,
    all_caps: bool,
    contracted_not: bool,
}

impl LexiconAnalyzer {
    /// Split on whitespace and trim edge punctuation, except for tokens the
    /// lexicon knows verbatim such as emoticons
    fn tokenize(&self, text: &str) -> Vec<Token> {
        text.split_whitespace()
            .filter_map(|raw| {
                let lower = raw.to_lowercase();
                if self.lexicon.contains_key(&lower) {
                    return Some(Token {
                        lower,
                        all_caps: is_all_caps(raw),
                        contracted_not: false,
                    });
                }

                let word = EDGE_PUNCTUATION.replace_all(raw, "");
                if word.chars().count() <= 1 {
                    return None;
                }
                let lower = word.to_lowercase();
                Some(Token {
                    contracted_not: lower.contains("n't"),
                    lower: lower.replace('\'', ""),
                    all_caps: is_all_caps(&word),
                })
            })
            .collect()
    }
}

fn is_all_caps(word: &str) -> bool {
    word.chars().any(char::is_alphabetic) && !word.chars().any(char::is_lowercase)
}

fn is_negation(token: &Token) -> bool {
    token.contracted_not || NEGATIONS.contains(token.lower.as_str())
}

fn booster_scalar(word: &Token, valence: f64, mixed_caps: bool) -> f64 {
    let Some(&scalar) = BOOSTERS.get(word.lower.as_str()) else {
        return 0.0;
    };
    let mut scalar = if valence < 0.0 { -scalar } else { scalar };
    if word.all_caps && mixed_caps {
        scalar += CAPS_INCR.copysign(valence);
    }
    scalar
}

/// Halve what precedes a "but" and weight what follows by half again
fn apply_but_contrast(tokens: &[Token], valences: &mut [f64]) {
    let Some(at) = tokens.iter().position(|t| t.lower == "but") else {
        return;
    };
    for (i, v) in valences.iter_mut().enumerate() {
        if i < at {
            *v *= 0.5;
        } else if i > at {
            *v *= 1.5;
        }
    }
}

fn punctuation_emphasis(text: &str) -> f64 {
    let exclamations = text.matches('!').count().min(4) as f64;
    let questions = text.matches('?').count();
    let question_emphasis = match questions {
        0 | 1 => 0.0,
        2 | 3 => questions as f64 * QUESTION_INCR,
        _ => 0.96,
    };
    exclamations * EXCLAMATION_INCR + question_emphasis
}

fn normalize(score: f64) -> f64 {
    (score / (score * score + NORMALIZE_ALPHA).sqrt()).clamp(-1.0, 1.0)
}

fn round(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn scores(text: &str) -> PolarityScores {
        LexiconAnalyzer::default().polarity_scores(text)
    }

    #[test]
    fn test_polarity_direction() {
        assert!(scores("What a great day").compound > 0.5);
        assert!(scores("This is a terrible disaster").compound < -0.5);
        assert_eq!(scores("The meeting is at noon").compound, 0.0);
        assert_eq!(scores("").compound, 0.0);
    }

    #[test]
    fn test_negation_flips() {
        assert!(scores("this is good").compound > 0.0);
        assert!(scores("this is not good").compound < 0.0);
        assert!(scores("this isn't good").compound < 0.0);
    }

    #[test]
    fn test_boosters_caps_and_punctuation_intensify() {
        let plain = scores("the food is good").compound;
        assert!(scores("the food is very good").compound > plain);
        assert!(scores("the food is GOOD").compound > plain);
        assert!(scores("the food is good!!").compound > plain);
    }

    #[test]
    fn test_but_shifts_weight() {
        let s = scores("the food is good but the service is horrible");
        assert!(s.compound < 0.0);
    }

    #[test]
    fn test_proportions_sum_to_one() {
        let s = scores("I love this but hate that");
        assert!((s.neg + s.neu + s.pos - 1.0).abs() < 0.01);
        assert!(s.compound >= -1.0 && s.compound <= 1.0);
    }

    #[test]
    fn test_lexicon_file() {
        let analyzer = LexiconAnalyzer::from_reader("zesty\t2.5\t0.5\t[2, 3]\n\nbland\t-1.0\n".as_bytes()).unwrap();
        assert_eq!(analyzer.len(), 2);
        assert!(analyzer.polarity_scores("so zesty").compound > 0.0);
        assert!(analyzer.polarity_scores("bland soup").compound < 0.0);

        let err = LexiconAnalyzer::from_reader("ok\t1\nbroken line\n".as_bytes()).unwrap_err();
        assert!(matches!(err, Error::InvalidLexicon { line: 2 }));
    }

    #[test]
    fn test_score_posts_uses_cleaned_and_display_text() {
        let post = Post::from_value(json!({
            "id": 5,
            "full_text": "#winning great news https://t.co/a",
            "entities": {
                "hashtags": [{"text": "winning", "indices": [0, 8]}],
                "urls": [{"url": "https://t.co/a", "indices": [20, 34]}]
            }
        }))
        .unwrap();

        let scored = score_posts(&[post], &LexiconAnalyzer::default());
        assert_eq!(scored.len(), 1);
        assert_eq!(scored[0].id, Some(5));
        assert_eq!(scored[0].text, "#winning great news ");
        assert_eq!(scored[0].scores, scores(" great news "));
    }
}
