use std::collections::BTreeMap;
use std::fmt;

use quiz_core::model::QuestionBank;
use storage::repository::QuestionBankRepository;
use storage::{BuiltinQuestionBank, JsonFileQuestionBank};

#[derive(Debug, Clone)]
struct Args {
    bank_path: Option<String>,
    list: bool,
}

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidBankPath { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidBankPath { raw } => write!(f, "invalid --bank value: {raw:?}"),
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

impl Args {
    fn parse() -> Result<Self, ArgsError> {
        let mut bank_path = std::env::var("QUIZ_BANK_PATH")
            .ok()
            .filter(|value| !value.trim().is_empty());
        let mut list = false;

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--bank" => {
                    let value = require_value(&mut args, "--bank")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidBankPath { raw: value });
                    }
                    bank_path = Some(value);
                }
                "--list" => list = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self { bank_path, list })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p storage --bin bank-check -- [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --bank <path>     JSON question bank to validate (default: bundled bank)");
    eprintln!("  --list            Print every question id and prompt");
    eprintln!("  -h, --help        Show this help");
    eprintln!();
    eprintln!("Environment (same as flags):");
    eprintln!("  QUIZ_BANK_PATH");
}

fn print_breakdown(bank: &QuestionBank) {
    let mut categories: BTreeMap<String, usize> = BTreeMap::new();
    let mut difficulties: BTreeMap<String, usize> = BTreeMap::new();
    for question in bank.questions() {
        let category = question
            .category()
            .map_or_else(|| "untagged".to_string(), |c| c.to_string());
        let difficulty = question
            .difficulty()
            .map_or_else(|| "untagged".to_string(), |d| d.to_string());
        *categories.entry(category).or_default() += 1;
        *difficulties.entry(difficulty).or_default() += 1;
    }

    println!("categories:");
    for (name, count) in &categories {
        println!("  {name:<16} {count}");
    }
    println!("difficulties:");
    for (name, count) in &difficulties {
        println!("  {name:<16} {count}");
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse().map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let (label, bank) = match &args.bank_path {
        Some(path) => (path.clone(), JsonFileQuestionBank::new(path).load_bank().await?),
        None => ("bundled bank".to_string(), BuiltinQuestionBank.load_bank().await?),
    };

    println!("{label}: {} valid questions", bank.len());
    print_breakdown(&bank);

    if args.list {
        for question in bank.questions() {
            println!("{:>6}  {}", question.id().as_str(), question.prompt());
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
