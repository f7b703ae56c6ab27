//! kits CLI

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "kits", version, about = "kits - a small imperative scripting language")]
struct Cli {
    /// Trace every consumed token (lexeme, kind, row:col) to stderr
    #[arg(long, global = true)]
    trace_tokens: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run a source file
    Run {
        /// Source file to run
        file: PathBuf,
    },
    /// Start the interactive REPL (default)
    Repl,
    /// Tokenize and dump tokens (debug)
    Tokens {
        /// Source file to tokenize
        file: PathBuf,
    },
    /// Parse and dump the syntax tree as JSON (debug)
    Parse {
        /// Source file to parse
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.trace_tokens);

    let result = match cli.command.unwrap_or(Command::Repl) {
        Command::Run { file } => run_file(&file),
        Command::Repl => run_repl(),
        Command::Tokens { file } => tokenize_file(&file),
        Command::Parse { file } => parse_file(&file),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_tracing(trace_tokens: bool) {
    let filter = if trace_tokens {
        EnvFilter::new("warn,kits::tokens=trace")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

/// Print a front-end error with its source context and turn it into a
/// plain error for the exit path
fn reported(filename: &str, source: &str, err: kits::CompileError) -> Box<dyn std::error::Error> {
    if kits::error::report_error(filename, source, &err).is_err() {
        return err.into();
    }
    "compilation failed".into()
}

fn run_file(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let source = std::fs::read_to_string(path)?;
    let filename = path.display().to_string();

    let mut session = kits::Session::new();
    match session.run(&source) {
        Ok(kits::Value::Void) => Ok(()),
        Ok(value) => {
            println!("{value}");
            Ok(())
        }
        Err(kits::Error::Compile(err)) => Err(reported(&filename, &source, err)),
        Err(err) => Err(err.into()),
    }
}

fn run_repl() -> Result<(), Box<dyn std::error::Error>> {
    let mut repl = kits::repl::Repl::new()?;
    repl.run()?;
    Ok(())
}

fn tokenize_file(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let source = std::fs::read_to_string(path)?;
    let filename = path.display().to_string();

    let lexemes = kits::lexer::tokenize(&source).map_err(|e| reported(&filename, &source, e))?;
    for lexeme in &lexemes {
        println!(
            "{:<12} {:<12} @{}",
            lexeme.token.name(),
            lexeme.display_text(),
            lexeme.pos
        );
    }
    Ok(())
}

fn parse_file(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let source = std::fs::read_to_string(path)?;
    let filename = path.display().to_string();

    let nodes = kits::parser::parse(&source).map_err(|e| reported(&filename, &source, e))?;
    println!("{}", serde_json::to_string_pretty(&nodes)?);
    Ok(())
}
