use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use quizdojo::config::progress::Progress;
use quizdojo::{App, Config, Quiz};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "quizdojo")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Take a quiz
    Take {
        /// Path to the quiz JSON file
        path: PathBuf,
        /// Time limit in minutes (0 = unlimited)
        #[arg(short, long)]
        time_limit: Option<u32>,
        /// Only use the first N questions
        #[arg(short, long)]
        limit: Option<usize>,
        /// Shuffle the answer options
        #[arg(long)]
        shuffle: bool,
    },
    /// Validate a quiz file
    Check {
        /// Path to the quiz JSON file
        path: PathBuf,
    },
    /// Show quiz history
    History {
        /// Only show this topic
        #[arg(short, long)]
        topic: Option<String>,
    },
}

/// Log to a file in the data directory so output never lands on the TUI
fn init_logging() -> Result<()> {
    let log_path = Config::log_path()?;
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {:?}", parent))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {:?}", log_path))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quizdojo=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Take { path, time_limit, limit, shuffle } => {
            let mut quiz = Quiz::load(&path)?;
            if let Some(limit) = limit {
                if limit == 0 {
                    bail!("--limit must be at least 1");
                }
                quiz.truncate(limit);
            }
            if shuffle || config.shuffle_options {
                quiz.shuffle_options(&mut rand::thread_rng());
            }

            let time_limit_secs = config.time_limit_secs(time_limit);
            let progress = Progress::load()?;
            let mut app = App::new(config, progress, quiz, time_limit_secs)?;
            app.run().await?;

            if let Some(summary) = app.summary() {
                println!(
                    "{}: {}/{} correct ({}%)",
                    summary.topic, summary.correct_count, summary.total, summary.percentage
                );
            }
        }
        Commands::Check { path } => {
            let quiz = Quiz::load(&path)?;
            println!(
                "{}: {} questions ({} difficulty)",
                quiz.topic,
                quiz.len(),
                quiz.difficulty
            );
        }
        Commands::History { topic } => {
            let progress = Progress::load()?;
            print_history(&progress, topic.as_deref());
        }
    }

    Ok(())
}

fn print_history(progress: &Progress, filter: Option<&str>) {
    let mut topics: Vec<_> = match filter {
        Some(name) => progress.topic(name).into_iter().collect(),
        None => progress.topics.values().collect(),
    };
    topics.sort_by(|a, b| a.topic.cmp(&b.topic));

    if topics.is_empty() {
        println!("No quizzes recorded yet");
        return;
    }

    for topic in topics {
        println!(
            "{} (best: {}%, next: {})",
            topic.topic,
            topic.best().unwrap_or(0),
            progress.suggested_difficulty(&topic.topic)
        );
        for attempt in &topic.attempts {
            println!(
                "  {}  {:>3}%  {}/{}  {}{}",
                attempt.completed_at.format("%Y-%m-%d %H:%M"),
                attempt.percentage,
                attempt.correct,
                attempt.total,
                attempt.difficulty,
                if attempt.timed_out { "  (timed out)" } else { "" }
            );
        }
    }

    let weak = progress.weak_areas();
    if filter.is_none() && !weak.is_empty() {
        println!();
        println!("Needs practice:");
        for (topic, average) in weak {
            println!("  {} ({}% average)", topic, average);
        }
    }
}
