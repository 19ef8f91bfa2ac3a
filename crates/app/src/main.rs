use std::fmt;
use std::path::PathBuf;

use quiz_core::model::{Category, Difficulty};
use quiz_core::session::{Announcement, Phase, QuizEvent};
use services::config::parse_positive;
use services::leaderboard::DEFAULT_BOARD_SIZE;
use services::{
    AnswerReview, AppServices, Clock, LeaderboardKind, QuizConfig, QuizRunner, QuizScore,
    QuizSnapshot,
};
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidNumber { flag: &'static str, raw: String },
    InvalidTag { flag: &'static str, raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidNumber { flag, raw } => {
                write!(f, "{flag} must be a positive number, got {raw}")
            }
            ArgsError::InvalidTag { flag, raw } => write!(f, "invalid {flag} value: {raw}"),
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

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--bank <path>] [--count <n>] [--seconds <n>]");
    eprintln!("                      [--scores-url <url>] [--category <name>] [--difficulty <level>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  bundled accessibility bank, 30 questions, 15 seconds each, no leaderboard");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_BANK_PATH, QUIZ_QUESTION_COUNT, QUIZ_SECONDS_PER_QUESTION,");
    eprintln!("  QUIZ_SCORES_URL, QUIZ_CATEGORY, QUIZ_DIFFICULTY, RUST_LOG");
}

/// Command-line flags layered over the environment config.
fn parse_args(
    args: &mut impl Iterator<Item = String>,
    mut config: QuizConfig,
) -> Result<QuizConfig, ArgsError> {
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--bank" => config.bank_path = Some(PathBuf::from(require_value(args, "--bank")?)),
            "--count" => {
                let raw = require_value(args, "--count")?;
                config.question_count = parse_positive("--count", &raw)
                    .map_err(|_| ArgsError::InvalidNumber { flag: "--count", raw })?;
            }
            "--seconds" => {
                let raw = require_value(args, "--seconds")?;
                config.seconds_per_question = parse_positive("--seconds", &raw)
                    .map_err(|_| ArgsError::InvalidNumber { flag: "--seconds", raw })?;
            }
            "--scores-url" => config.scores_url = Some(require_value(args, "--scores-url")?),
            "--category" => {
                let raw = require_value(args, "--category")?;
                let category: Category = raw
                    .parse()
                    .map_err(|_| ArgsError::InvalidTag { flag: "--category", raw: raw.clone() })?;
                config.category = Some(category);
            }
            "--difficulty" => {
                let raw = require_value(args, "--difficulty")?;
                let difficulty: Difficulty = raw.parse().map_err(|_| ArgsError::InvalidTag {
                    flag: "--difficulty",
                    raw: raw.clone(),
                })?;
                config.difficulty = Some(difficulty);
            }
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            _ => return Err(ArgsError::UnknownArg(arg)),
        }
    }
    Ok(config)
}

//
// ─── PLAYER INPUT ──────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Start,
    Quiz(QuizEvent),
    Board,
    Help,
    Quit,
}

impl Command {
    /// Options are numbered from 1 on screen.
    fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if let Some(name) = line.strip_prefix("name ") {
            return Some(Self::Quiz(QuizEvent::SubmitWithName(name.to_string())));
        }
        let command = match line {
            "start" => Self::Start,
            "c" | "confirm" => Self::Quiz(QuizEvent::Confirm),
            "e" | "extend" => Self::Quiz(QuizEvent::ExtendTime),
            "s" | "skip" => Self::Quiz(QuizEvent::SkipQuestion),
            "anon" => Self::Quiz(QuizEvent::SubmitAnonymously),
            "r" | "restart" => Self::Quiz(QuizEvent::Restart),
            "b" | "board" => Self::Board,
            "q" | "quit" => Self::Quit,
            "?" | "help" => Self::Help,
            other => {
                let option = other.parse::<usize>().ok()?.checked_sub(1)?;
                Self::Quiz(QuizEvent::SelectAnswer(option))
            }
        };
        Some(command)
    }
}

fn print_commands() {
    println!("  start        begin the quiz");
    println!("  1..n         choose an option");
    println!("  c            check the answer, then continue");
    println!("  e / s        extend time or skip once time is up");
    println!("  name <text>  submit your score under a name");
    println!("  anon         submit anonymously");
    println!("  b            show the leaderboard");
    println!("  r / q        restart or quit");
}

//
// ─── RENDERING ─────────────────────────────────────────────────────────────────
//

fn announce(announcements: &[Announcement]) {
    for announcement in announcements {
        match announcement {
            Announcement::QuestionStarted { position, total } => {
                println!();
                println!("Question {position} of {total}");
            }
            Announcement::TimeRunningLow { seconds_remaining } => {
                println!("  {seconds_remaining} seconds remaining");
            }
            Announcement::TimeExpired => {
                println!("  Time's up! [e]xtend for another round or [s]kip this question.");
            }
            Announcement::AnswerRevealed { correct: true } => println!("  Correct!"),
            Announcement::AnswerRevealed { correct: false } => println!("  Incorrect."),
            Announcement::QuizCompleted { score, total } => {
                println!();
                println!("Quiz complete: {score} of {total} correct.");
            }
        }
    }
}

/// Marked prompt per question; misses also show both options and the explanation.
fn review_lines(review: &[AnswerReview]) -> Vec<String> {
    let mut lines = Vec::new();
    for (index, entry) in review.iter().enumerate() {
        let mark = if entry.is_correct { '✓' } else { '✗' };
        lines.push(format!("  {mark} {}. {}", index + 1, entry.prompt));
        if entry.is_correct {
            continue;
        }
        match &entry.your_option {
            Some(option) => lines.push(format!("      Your answer: {option}")),
            None => lines.push("      Your answer: skipped".to_string()),
        }
        lines.push(format!("      Correct: {}", entry.correct_option));
        if let Some(explanation) = &entry.explanation {
            lines.push(format!("      {explanation}"));
        }
    }
    lines
}

fn board_line(rank: usize, score: &QuizScore) -> String {
    format!(
        "  {rank:>2}. {:<24} {}/{} ({}%)  {}",
        score.display_name(),
        score.score,
        score.total,
        score.percentage,
        score.date
    )
}

async fn show_leaderboard(services: &AppServices) {
    let Some(board) = services.leaderboard() else {
        println!("  No leaderboard configured (set --scores-url).");
        return;
    };
    println!();
    for (title, kind) in [
        ("Today's top scores", LeaderboardKind::Daily),
        ("All-time top scores", LeaderboardKind::AllTime),
    ] {
        match board.top_scores(kind, DEFAULT_BOARD_SIZE).await {
            Ok(scores) if scores.is_empty() => println!("{title}: no scores yet"),
            Ok(scores) => {
                println!("{title}:");
                for (index, score) in scores.iter().enumerate() {
                    println!("{}", board_line(index + 1, score));
                }
            }
            Err(err) => {
                log::warn!("could not load {} leaderboard: {err}", kind.as_str());
                println!("{title}: unavailable");
            }
        }
    }
    match board.stats().await {
        Ok(stats) => println!(
            "{} attempts ({} today), average {}%",
            stats.total_attempts, stats.today_attempts, stats.average_score
        ),
        Err(err) => log::warn!("could not load leaderboard stats: {err}"),
    }
}

fn render(snapshot: &QuizSnapshot) {
    match snapshot.phase {
        Phase::Intro => {
            println!("Accessibility quiz. Type `start` to begin, `help` for commands.");
        }
        Phase::Active | Phase::TimeExpiredDecision => {
            let Some(question) = &snapshot.question else {
                return;
            };
            if !snapshot.revealed && snapshot.selected.is_none() {
                println!("{}", question.prompt);
                for (index, option) in question.options.iter().enumerate() {
                    println!("  {}. {option}", index + 1);
                }
                println!("  ({}s, score {})", snapshot.time_remaining, snapshot.score);
            } else if let (Some(selected), false) = (snapshot.selected, snapshot.revealed) {
                println!("  Selected {}. Press c to check.", selected + 1);
            } else if let Some(correct) = question.correct_answer {
                println!("  Answer: {}", question.options[correct]);
                if let Some(explanation) = &question.explanation {
                    println!("  {explanation}");
                }
                if let Some(source) = &question.source {
                    println!("  Learn more: {} <{}>", source.title(), source.url());
                }
                println!("  Press c to continue.");
            }
        }
        Phase::NameEntry => {
            if let Some(outcome) = snapshot.outcome {
                println!("{} ({}%)", outcome.tier.title(), outcome.percentage);
                println!("{}", outcome.tier.message());
            }
            for line in review_lines(&snapshot.review) {
                println!("{line}");
            }
            println!("Type `name <your name>` for the leaderboard, or `anon`.");
        }
        Phase::Results => {
            match &snapshot.player_name {
                Some(name) => println!("Thanks, {name}!"),
                None => println!("Thanks for playing!"),
            }
            println!("Type `b` for the leaderboard, `r` to play again or `q` to quit.");
        }
    }
}

//
// ─── LOOP ──────────────────────────────────────────────────────────────────────
//

async fn play(services: &AppServices) -> Result<(), Box<dyn std::error::Error>> {
    let mut runner: QuizRunner = services.new_runner();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    render(&runner.snapshot());

    loop {
        tokio::select! {
            announcements = runner.next_tick() => announce(&announcements),
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                let Some(command) = Command::parse(&line) else {
                    println!("  unrecognised input, type `help` for commands");
                    continue;
                };
                let was_results = runner.snapshot().phase == Phase::Results;
                let result = match command {
                    Command::Quit => break,
                    Command::Help => {
                        print_commands();
                        continue;
                    }
                    Command::Board => {
                        show_leaderboard(services).await;
                        continue;
                    }
                    Command::Start => runner.start(&services.bank()),
                    Command::Quiz(event) => runner.handle(event),
                };
                match result {
                    Ok(announcements) => {
                        announce(&announcements);
                        let snapshot = runner.snapshot();
                        render(&snapshot);
                        let finished = snapshot.phase == Phase::Results && !was_results;
                        if finished && services.leaderboard().is_some() {
                            runner.settle_submission().await;
                            show_leaderboard(services).await;
                        }
                    }
                    Err(err) => eprintln!("  {err}"),
                }
            }
        }
    }

    runner.settle_submission().await;
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let base = QuizConfig::from_env()?;
    let mut argv = std::env::args().skip(1);
    let config = parse_args(&mut argv, base).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;
    log::debug!("resolved configuration: {config:?}");

    let services = AppServices::from_config(&config, Clock::default_clock()).await?;
    play(&services).await
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
