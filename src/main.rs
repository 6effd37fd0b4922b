use chrono::Duration;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use learner_progress::config::Config;
use learner_progress::export::{export_snapshot, import_snapshot, restore_snapshot};
use learner_progress::{ProgressEngine, SessionResult, SqliteChunkStore, StarRating, Topic};

/// Learner progress engine: spaced repetition, topic health and tree growth
#[derive(Parser, Debug)]
#[command(name = "garden-progress")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Record a finished lesson for every chunk it touched
    Submit {
        #[arg(long)]
        learner: String,
        #[arg(long)]
        topic: String,
        /// Stars earned in the lesson (1-3)
        #[arg(long, value_parser = parse_rating)]
        rating: StarRating,
        #[arg(required = true)]
        chunks: Vec<String>,
    },
    /// Topic health from chunk statuses
    Health {
        #[arg(long)]
        learner: String,
        #[arg(long)]
        topic: String,
    },
    /// Lesson freshness after a number of idle days
    Freshness {
        #[arg(allow_negative_numbers = true)]
        days: i64,
    },
    /// Tree growth stage for a currency total
    Growth { currency: u64 },
    /// Growth stage and freshness of a topic's tree
    Tree {
        #[arg(long)]
        learner: String,
        #[arg(long)]
        topic: String,
        #[arg(long)]
        currency: u64,
        /// Days since the topic was last practised; omit if never
        #[arg(long)]
        idle_days: Option<i64>,
    },
    /// Demote overdue acquired chunks
    Sweep {
        #[arg(long)]
        learner: String,
    },
    /// Move the simulated date one day forward
    AdvanceDay,
    /// Write a learner's chunk history to a JSON file
    Export {
        #[arg(long)]
        learner: String,
        #[arg(long)]
        out: String,
    },
    /// Load a JSON export back into the database, replacing stored records
    Import {
        #[arg(long = "in")]
        input: String,
    },
}

fn parse_rating(value: &str) -> Result<StarRating, String> {
    let stars: u8 = value.parse().map_err(|_| format!("'{value}' is not a star count"))?;
    StarRating::try_from(stars).map_err(|err| err.to_string())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    let config = Config::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let store = SqliteChunkStore::open(&config.db_path)?;
    let now = store.current_date()?;
    let engine = ProgressEngine::new(store);

    let learner = match &args.command {
        Command::Submit { learner, .. }
        | Command::Health { learner, .. }
        | Command::Sweep { learner }
        | Command::Export { learner, .. } => Some(learner.as_str()),
        _ => None,
    };
    let swept = match learner {
        Some(learner)
            if config.sweep_on_start && !matches!(args.command, Command::Sweep { .. }) =>
        {
            engine.run_maintenance_sweep(learner, now)
        }
        _ => 0,
    };
    if swept > 0 {
        tracing::info!(swept, "overdue chunks demoted on start");
    }

    match args.command {
        Command::Submit {
            learner,
            topic,
            rating,
            chunks,
        } => {
            let session = SessionResult {
                learner_id: learner,
                topic_id: topic,
                chunk_ids: chunks,
                rating,
            };
            print_json(&engine.submit_session_result(&session, now))?;
        }
        Command::Health { learner, topic } => {
            let health = engine.topic_health(&learner, &topic)?;
            print_json(&serde_json::json!({
                "learner_id": learner,
                "topic_id": topic,
                "health": health,
            }))?;
        }
        Command::Freshness { days } => {
            print_json(&serde_json::json!({
                "days": days,
                "health": engine.lesson_freshness(days),
            }))?;
        }
        Command::Growth { currency } => {
            let stage = engine.growth_stage(currency);
            print_json(&serde_json::json!({
                "currency": currency,
                "stage": stage,
                "index": stage.index(),
                "progress_to_next": stage.progress_to_next(currency),
            }))?;
        }
        Command::Tree {
            learner,
            topic,
            currency,
            idle_days,
        } => {
            let last_activity = idle_days
                .map(|days| {
                    Duration::try_days(days)
                        .and_then(|idle| now.checked_sub_signed(idle))
                        .ok_or("idle days out of range")
                })
                .transpose()?;
            let topic = Topic {
                cumulative_currency: currency,
                last_activity,
                ..Topic::new(&learner, &topic)
            };
            print_json(&engine.topic_view(&topic, now))?;
        }
        Command::Sweep { learner } => {
            let demoted = engine.run_maintenance_sweep(&learner, now);
            print_json(&serde_json::json!({ "learner_id": learner, "demoted": demoted }))?;
        }
        Command::AdvanceDay => {
            let today = engine.store().advance_day()?;
            print_json(&serde_json::json!({ "current_date": today }))?;
        }
        Command::Export { learner, out } => {
            let snapshot = export_snapshot(engine.store(), &learner, now, &out)?;
            print_json(&serde_json::json!({
                "learner_id": learner,
                "chunks": snapshot.chunks.len(),
                "path": out,
            }))?;
        }
        Command::Import { input } => {
            let snapshot = import_snapshot(&input)?;
            let restored = restore_snapshot(engine.store(), &snapshot);
            print_json(&serde_json::json!({
                "learner_id": snapshot.learner_id,
                "chunks": snapshot.chunks.len(),
                "restored": restored,
            }))?;
        }
    }

    Ok(())
}
