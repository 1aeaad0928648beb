//! Logic Looper
//!
//! Command-line front end: play the daily puzzle against a local JSON store,
//! or run the score sync service.

use anyhow::{bail, Context, Result};
use chrono::{Datelike, Local, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use logic_looper::{
    Config, DailyContext, SeedPolicy, VERSION,
    core::seed::keyed_digest,
    network::{SyncClient, SyncServer},
    progress::{DailySession, DayStatus, JsonFileStore, SessionState, SubmitOutcome},
    puzzle::Attempt,
};

#[derive(Debug, Parser)]
#[command(name = "logic-looper", version, about = "Daily logic puzzles")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the score sync service.
    Serve,
    /// Show the day's puzzle and start its timer.
    Show {
        /// Puzzle date (YYYY-MM-DD), default today.
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Submit an answer.
    Answer {
        /// Number, name, symbol, or 16 grid digits.
        answer: String,
        /// Puzzle date (YYYY-MM-DD); only today is accepted.
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Reveal the next hint.
    Hint {
        /// Puzzle date (YYYY-MM-DD); only today is accepted.
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Print the seed and puzzle kind for a date.
    Seed {
        /// Puzzle date (YYYY-MM-DD), default today.
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Print completions for a year.
    Activity {
        /// Year, default the current one.
        #[arg(long)]
        year: Option<i32>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so command output stays clean.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("logic_looper=info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set tracing subscriber")?;

    let cli = Cli::parse();
    let config = Config::from_env();
    let today = Local::now().date_naive();

    match cli.command {
        Command::Serve => {
            info!("Logic Looper sync server v{}", VERSION);
            SyncServer::new(config.server_config()).run().await?;
        }
        Command::Show { date } => show(&config, date.unwrap_or(today))?,
        Command::Answer { answer, date } => {
            submit(&config, playable_date(date, today)?, &answer).await?
        }
        Command::Hint { date } => hint(&config, playable_date(date, today)?)?,
        Command::Seed { date } => seed(&config, date.unwrap_or(today)),
        Command::Activity { year } => activity(&config, year.unwrap_or(today.year()), today)?,
    }
    Ok(())
}

/// Answers and hints only apply to today's puzzle.
fn playable_date(date: Option<NaiveDate>, today: NaiveDate) -> Result<NaiveDate> {
    match date {
        Some(date) if date != today => {
            bail!("only today's puzzle ({}) can be answered, not {}", today, date)
        }
        _ => Ok(today),
    }
}

fn open_session(config: &Config, date: NaiveDate) -> Result<DailySession<JsonFileStore>> {
    let store = JsonFileStore::open(&config.data_dir)
        .with_context(|| format!("Failed to open store at {}", config.data_dir.display()))?;
    let ctx = DailyContext::new(date, &config.seed_policy);
    let session = DailySession::open(store, ctx, config.difficulty, config.hint_allowance)?;
    Ok(session)
}

fn show(config: &Config, date: NaiveDate) -> Result<()> {
    let mut session = open_session(config, date)?;
    let puzzle = session.puzzle().clone();

    println!("{} - {} puzzle", date, puzzle.kind());
    println!();
    println!("{}", puzzle.prompt());
    println!();

    if session.state() == SessionState::Completed {
        if let Some(record) = session.progress().record_for(date) {
            println!("Completed: score {}, {}s", record.score, record.time);
        }
        return Ok(());
    }

    if date == Local::now().date_naive() {
        session.begin(Utc::now())?;
    }
    for hint in session.revealed_hints() {
        println!("Hint {}: {}", hint.tier, hint.text);
    }
    let hints = session.hints();
    println!("Hints remaining: {}/{}", hints.remaining, hints.allowance());
    println!("Streak: {}", session.progress().streak);
    Ok(())
}

async fn submit(config: &Config, date: NaiveDate, answer: &str) -> Result<()> {
    let mut session = open_session(config, date)?;
    let attempt = Attempt::parse(session.puzzle().kind(), answer)?;

    match session.submit(attempt, Utc::now())? {
        SubmitOutcome::Completed(record) => {
            println!("Correct! Score {} in {}s, streak {}", record.score, record.time, record.streak);
            if let Some(url) = &config.sync_url {
                let client = SyncClient::new(url.as_str())?;
                for record in session.drain_events().iter().filter_map(|e| e.sync_record()) {
                    client.push_best_effort(&record).await;
                }
            }
        }
        SubmitOutcome::Rejected(verdict) => println!("Not quite ({:?}). Try again.", verdict),
        SubmitOutcome::AlreadyCompleted => println!("Already completed for {}.", date),
    }
    Ok(())
}

fn hint(config: &Config, date: NaiveDate) -> Result<()> {
    let mut session = open_session(config, date)?;
    let hint = session.request_hint(Utc::now())?;
    println!("Hint {}: {}", hint.tier, hint.text);
    println!("Hints remaining: {}", session.hints().remaining);
    Ok(())
}

fn seed(config: &Config, date: NaiveDate) {
    let ctx = DailyContext::new(date, &config.seed_policy);
    let kind = logic_looper::PuzzleKind::for_day(ctx.day_of_year);
    println!("date:        {}", ctx.date_key());
    println!("day of year: {}", ctx.day_of_year);
    println!("seed:        {}", ctx.seed);
    println!("kind:        {}", kind);
    if let SeedPolicy::Keyed { secret } = &config.seed_policy {
        println!("digest:      {}", hex::encode(keyed_digest(date, secret)));
    }
}

fn activity(config: &Config, year: i32, today: NaiveDate) -> Result<()> {
    let session = open_session(config, today)?;
    let progress = session.progress();
    let cells = progress.activity(year, today);

    for month in 1..=12u32 {
        let row: String = cells
            .iter()
            .filter(|c| c.date.month() == month)
            .map(|c| match c.status {
                DayStatus::Completed => '#',
                DayStatus::Missed => '.',
                DayStatus::Future => ' ',
            })
            .collect();
        println!("{:>2} {}", month, row);
    }
    println!();
    println!(
        "Completed: {}  Streak: {}  Best: {}",
        progress.total_completed(),
        progress.streak,
        progress.best_streak
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_playable_date_is_today_only() {
        let today = date(2026, 3, 5);
        assert_eq!(playable_date(None, today).unwrap(), today);
        assert_eq!(playable_date(Some(today), today).unwrap(), today);
        assert!(playable_date(Some(date(2026, 3, 1)), today).is_err());
        assert!(playable_date(Some(date(2030, 1, 1)), today).is_err());
    }
}
