use std::fmt;
use std::io::{BufRead, Write};
use std::str::FromStr;
use std::sync::Arc;

use quiz_core::model::{QuizSummary, SessionId};
use quiz_core::Clock;
use services::{CatalogService, ResponseService, SaveOutcome, SummaryService};
use storage::repository::Storage;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidSessionId { raw: String },
    MissingSessionId,
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidSessionId { raw } => {
                write!(f, "invalid --session value (expected UUID): {raw}")
            }
            ArgsError::MissingSessionId => write!(f, "summary requires --session <uuid>"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Quiz,
    Grid,
    Summary,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "quiz" => Some(Self::Quiz),
            "grid" => Some(Self::Grid),
            "summary" => Some(Self::Summary),
            _ => None,
        }
    }
}

struct Args {
    db_url: String,
    session_id: Option<SessionId>,
    json: bool,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url =
            std::env::var("QUIZ_DB_URL").unwrap_or_else(|_| "sqlite:quiz.sqlite3".into());
        let mut session_id = std::env::var("QUIZ_SESSION")
            .ok()
            .and_then(|value| SessionId::from_str(&value).ok());
        let mut json = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = value;
                }
                "--session" => {
                    let value = require_value(args, "--session")?;
                    let parsed = SessionId::from_str(&value)
                        .map_err(|_| ArgsError::InvalidSessionId { raw: value.clone() })?;
                    session_id = Some(parsed);
                }
                "--json" => json = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            session_id,
            json,
        })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- quiz    [--db <sqlite_url>] [--session <uuid>]");
    eprintln!("  cargo run -p app -- grid    [--db <sqlite_url>]");
    eprintln!("  cargo run -p app -- summary --session <uuid> [--db <sqlite_url>] [--json]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite:quiz.sqlite3");
    eprintln!("  quiz draws a fresh session token unless --session is given");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_DB_URL, QUIZ_SESSION, RUST_LOG");
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    let cmd = match argv.first().map(String::as_str) {
        None => Command::Quiz,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Quiz,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let args = Args::parse(&mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let storage = Storage::sqlite(&args.db_url).await?;

    match cmd {
        Command::Grid => run_grid(&storage).await,
        Command::Quiz => run_quiz(&storage, args.session_id).await,
        Command::Summary => {
            let session_id = args.session_id.ok_or(ArgsError::MissingSessionId)?;
            run_summary(&storage, session_id, args.json).await
        }
    }
}

async fn run_grid(storage: &Storage) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = CatalogService::new(Arc::clone(&storage.questions));
    let grid = catalog.grid().await?;

    if grid.is_empty() {
        println!("The catalog is empty. Run `cargo run -p storage --bin seed` first.");
        return Ok(());
    }

    println!("{:>4}  {:<16} {:<60} {}", "#", "type", "question", "answer key");
    for item in grid {
        println!(
            "{:>4}  {:<16} {:<60} {}",
            item.order_no,
            item.question_type.as_str(),
            item.text,
            item.correct_answer.as_deref().unwrap_or("-"),
        );
    }
    Ok(())
}

async fn run_quiz(
    storage: &Storage,
    session_id: Option<SessionId>,
) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = CatalogService::new(Arc::clone(&storage.questions));
    let responses = ResponseService::new(
        Clock::default_clock(),
        Arc::clone(&storage.questions),
        Arc::clone(&storage.responses),
        Arc::clone(&storage.sessions),
    );
    let summaries = SummaryService::new(
        Arc::clone(&storage.questions),
        Arc::clone(&storage.responses),
    );

    let quiz_set = catalog.quiz_set().await?;
    if quiz_set.is_empty() {
        println!("The catalog is empty. Run `cargo run -p storage --bin seed` first.");
        return Ok(());
    }

    let session_id = session_id.unwrap_or_else(SessionId::random);
    println!("Session {session_id}");
    println!("Answer each question; press Enter on an empty line to skip.\n");

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();

    for question in &quiz_set {
        println!("{}. {} [{}]", question.position, question.text, question.question_type);
        if let Some(options) = &question.options {
            for option in options {
                println!("     {}: {}", option.option_id, option.text);
            }
        }

        loop {
            print!("> ");
            std::io::stdout().flush()?;
            let Some(line) = lines.next() else {
                println!();
                return finish(&summaries, session_id).await;
            };
            let answer = line?;

            if answer.trim().is_empty() {
                println!("   (skipped)\n");
                break;
            }

            match responses.save(session_id, question.question_id, &answer).await? {
                SaveOutcome::Saved(_) => {
                    println!();
                    break;
                }
                SaveOutcome::Rejected(errors) => {
                    for error in errors {
                        println!("   {error}");
                    }
                }
            }
        }
    }

    finish(&summaries, session_id).await
}

async fn finish(
    summaries: &SummaryService,
    session_id: SessionId,
) -> Result<(), Box<dyn std::error::Error>> {
    let summary = summaries.build_summary(session_id).await?;
    print_summary(&summary);
    println!("\nReview again later with:");
    println!("  cargo run -p app -- summary --session {session_id}");
    Ok(())
}

async fn run_summary(
    storage: &Storage,
    session_id: SessionId,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let summaries = SummaryService::new(
        Arc::clone(&storage.questions),
        Arc::clone(&storage.responses),
    );
    let summary = summaries.build_summary(session_id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }
    Ok(())
}

fn print_summary(summary: &QuizSummary) {
    if summary.items.is_empty() {
        println!("No answers recorded for this session.");
        return;
    }

    println!("Summary");
    println!("-------");
    for item in &summary.items {
        let verdict = match item.is_correct {
            Some(true) => "correct",
            Some(false) => "wrong",
            None => "ungraded",
        };
        println!("{} [{}]", item.question_text, verdict);
        println!("  your answer: {}", item.user_answer.as_deref().unwrap_or("-"));
        if let Some(expected) = &item.correct_answer {
            println!("  correct answer: {expected}");
        }
    }

    let stats = &summary.stats;
    println!();
    println!(
        "{} answered, {} attempted, {} correct ({}%)",
        stats.total, stats.attempted, stats.correct, stats.percentage
    );
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
