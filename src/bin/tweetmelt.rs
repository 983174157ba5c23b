//! tweetmelt: Normalize archived timelines into CSV stores
//!
//! Usage:
//!   # Merge every post of an archived timeline into tweets.csv / users.csv
//!   tweetmelt ingest timeline.json
//!
//!   # Only one page of one account, into custom stores
//!   tweetmelt ingest timeline.json --handle ferris --count 50 --page 2 \
//!       --tweets data/tweets.csv --users data/users.csv
//!
//!   # Sentiment of each post, as NDJSON
//!   tweetmelt sentiment timeline.json --lexicon vader_lexicon.txt
//!
//!   # Summary of a store
//!   tweetmelt inspect tweets.csv

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::PathBuf;
use tracing::info;
use tweetmelt::analysis::{score_posts, LexiconAnalyzer};
use tweetmelt::config::{TWEETS_CSV, USERS_CSV};
use tweetmelt::store::ID_COLUMN;
use tweetmelt::{ArchiveSource, CsvStore, Pipeline, PipelineConfig, SchemaPolicy};

#[derive(Parser, Debug)]
#[command(name = "tweetmelt")]
#[command(about = "Normalize archived timelines into CSV stores", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Normalize posts and merge them into the post and author stores
    Ingest {
        /// Archived API dump: JSON array, single object, or NDJSON
        #[arg(value_name = "ARCHIVE")]
        archive: PathBuf,

        /// Only ingest posts by this account
        #[arg(long)]
        handle: Option<String>,

        /// Page size when --handle is given
        #[arg(long, default_value_t = 50, requires = "handle")]
        count: usize,

        /// 1-based page when --handle is given
        #[arg(long, default_value_t = 1, requires = "handle")]
        page: usize,

        /// Post store
        #[arg(long, env = "TWEETMELT_TWEETS_CSV", default_value = TWEETS_CSV)]
        tweets: PathBuf,

        /// Author store
        #[arg(long, env = "TWEETMELT_USERS_CSV", default_value = USERS_CSV)]
        users: PathBuf,

        /// Fail on records missing a column instead of backfilling it
        #[arg(long)]
        strict_schema: bool,
    },

    /// Score each post's sentiment and print one JSON line per post
    Sentiment {
        #[arg(value_name = "ARCHIVE")]
        archive: PathBuf,

        /// VADER-format lexicon replacing the built-in one
        #[arg(long)]
        lexicon: Option<PathBuf>,
    },

    /// Print a summary of a CSV store
    Inspect {
        #[arg(value_name = "CSV")]
        store: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tweetmelt=info".into()),
        )
        .init();

    let args = Args::parse();

    match args.command {
        Command::Ingest {
            archive,
            handle,
            count,
            page,
            tweets,
            users,
            strict_schema,
        } => {
            let config = PipelineConfig {
                tweets_path: tweets,
                users_path: users,
                schema_policy: if strict_schema {
                    SchemaPolicy::Strict
                } else {
                    SchemaPolicy::Backfill
                },
                ..PipelineConfig::default()
            };
            ingest(archive, handle, count, page, config)
        }
        Command::Sentiment { archive, lexicon } => sentiment(archive, lexicon),
        Command::Inspect { store } => inspect(store),
    }
}

fn ingest(
    archive: PathBuf,
    handle: Option<String>,
    count: usize,
    page: usize,
    config: PipelineConfig,
) -> Result<()> {
    let source = ArchiveSource::open(&archive)
        .with_context(|| format!("Failed to read archive {}", archive.display()))?;
    let pipeline = Pipeline::new(config);

    let report = match handle {
        Some(handle) => pipeline.ingest_timeline(&source, &handle, count, page)?.1,
        None => pipeline.process_posts(source.posts())?,
    };

    info!(
        posts = report.posts,
        authors = report.authors,
        tweets_stored = report.tweets_stored,
        users_stored = report.users_stored,
        "Ingest complete"
    );
    Ok(())
}

fn sentiment(archive: PathBuf, lexicon: Option<PathBuf>) -> Result<()> {
    let source = ArchiveSource::open(&archive)
        .with_context(|| format!("Failed to read archive {}", archive.display()))?;

    let analyzer = match lexicon {
        Some(path) => {
            let file = File::open(&path)
                .with_context(|| format!("Failed to open lexicon {}", path.display()))?;
            LexiconAnalyzer::from_reader(BufReader::new(file))?
        }
        None => LexiconAnalyzer::default(),
    };

    let mut stdout = std::io::stdout().lock();
    for scored in score_posts(source.posts(), &analyzer) {
        writeln!(stdout, "{}", serde_json::to_string(&scored)?)?;
    }
    Ok(())
}

fn inspect(path: PathBuf) -> Result<()> {
    let table = CsvStore::new(&path)
        .load()
        .with_context(|| format!("Failed to load store {}", path.display()))?;

    println!("{}: {} rows", path.display(), table.len());
    println!("columns: {}", table.column_names().collect::<Vec<_>>().join(", "));

    let ids = table
        .column(ID_COLUMN)
        .into_iter()
        .flatten()
        .filter_map(|id| id.parse::<i64>().ok());
    let (min, max) = ids.fold((None, None), |(lo, hi): (Option<i64>, Option<i64>), id| {
        (Some(lo.map_or(id, |l| l.min(id))), Some(hi.map_or(id, |h| h.max(id))))
    });
    if let (Some(min), Some(max)) = (min, max) {
        println!("ids: {min}..={max}");
    }
    Ok(())
}
