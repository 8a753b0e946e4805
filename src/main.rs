// RAMI: Random Access Machine interpreter with a time-travel stepping UI

use std::error::Error;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{info, LevelFilter};
use ratatui::{backend::CrosstermBackend, Terminal};
use simple_logger::SimpleLogger;

use rami::interpreter::constants::{DEFAULT_COMMENT_MARKER, DEFAULT_SNAPSHOT_LIMIT};
use rami::interpreter::engine::{DebugFlag, Machine, RunOptions};
use rami::interpreter::history::History;
use rami::memory::Memory;
use rami::parser::{compile_source, set_substitution, StdPreprocessor, Substitutions};
use rami::ui::App;

const EXIT_COMPILE_ERROR: u8 = 1;
const EXIT_RUNTIME_ERROR: u8 = 2;

#[derive(Parser, Debug)]
#[command(
    name = "rami",
    version,
    about = "Random Access Machine interpreter",
    long_about = "Compile and run a Random Access Machine program.

Exit status is 0 when the program halts, 1 on a compile error and 2 on a runtime fault."
)]
struct Cli {
    #[arg(value_name = "FILE", help = "Program source file")]
    file: PathBuf,
    #[arg(
        short = 'd',
        long = "debug",
        value_enum,
        action = ArgAction::Append,
        help = "Enable a debug option (repeatable)"
    )]
    debug: Vec<DebugFlag>,
    #[arg(
        short = 'c',
        long = "count",
        action = ArgAction::SetTrue,
        help = "Print the number of executed instructions after the run"
    )]
    count: bool,
    #[arg(
        short = 's',
        long = "substitute",
        value_name = "NAME=VALUE",
        value_delimiter = ',',
        value_parser = parse_substitution,
        action = ArgAction::Append,
        help = "Replace {NAME} with VALUE in the source (repeatable, comma separated)"
    )]
    substitute: Vec<(String, String)>,
    #[arg(
        short = 'l',
        long = "list",
        action = ArgAction::SetTrue,
        help = "Print the compiled program and exit"
    )]
    list: bool,
    #[arg(
        long = "comment",
        value_name = "MARKER",
        default_value = DEFAULT_COMMENT_MARKER,
        help = "End-of-line comment marker (empty disables comments)"
    )]
    comment: String,
    #[arg(long = "seed", value_name = "SEED", help = "Seed for random values")]
    seed: Option<u64>,
    #[arg(
        long = "tui",
        action = ArgAction::SetTrue,
        help = "Record the run and open the stepping UI"
    )]
    tui: bool,
    #[arg(
        short = 'v',
        long = "verbose",
        action = ArgAction::Count,
        help = "Raise the log level (repeatable)"
    )]
    verbose: u8,
}

fn parse_substitution(text: &str) -> Result<(String, String), String> {
    match text.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected NAME=VALUE, got `{}`", text)),
    }
}

/// Substitutions in command-line order; a repeated name takes the last value
fn collect_substitutions(pairs: impl IntoIterator<Item = (String, String)>) -> Substitutions {
    let mut substitutions = Substitutions::new();
    for (name, value) in pairs {
        set_substitution(&mut substitutions, name, value);
    }
    substitutions
}

fn log_level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn main() -> Result<ExitCode, Box<dyn Error>> {
    let cli = Cli::parse();

    // Log lines would corrupt the alternate screen
    let level = if cli.tui {
        LevelFilter::Off
    } else {
        log_level(cli.verbose)
    };
    SimpleLogger::new().with_level(level).init()?;

    let source = fs::read_to_string(&cli.file)?;
    info!("read {} ({} bytes)", cli.file.display(), source.len());

    let substitutions = collect_substitutions(cli.substitute.iter().cloned());
    let preprocessor = StdPreprocessor::new().with_comment(cli.comment.as_str());

    let program = match compile_source(&source, &substitutions, &preprocessor) {
        Ok(program) => program,
        Err(e) => {
            eprintln!("{}", e);
            return Ok(ExitCode::from(EXIT_COMPILE_ERROR));
        }
    };
    info!("compiled {} instructions", program.len());

    if cli.list {
        println!("{}", program.listing());
        return Ok(ExitCode::SUCCESS);
    }

    let mut machine = match cli.seed {
        Some(seed) => Machine::with_seed(program, seed),
        None => Machine::new(program),
    };

    if cli.tui {
        return run_tui(machine);
    }

    let options = cli
        .debug
        .iter()
        .fold(RunOptions::new(), |options, &flag| options.with_debug(flag));
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let result = machine.run(Memory::new(), &options, &mut out);
    out.flush()?;

    if cli.count {
        println!("Instruction count: {}", machine.counter());
    }

    match result {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            eprintln!("Runtime error: {}", e);
            Ok(ExitCode::from(EXIT_RUNTIME_ERROR))
        }
    }
}

fn run_tui(machine: Machine) -> Result<ExitCode, Box<dyn Error>> {
    let mut history = History::record(machine, Memory::new(), DEFAULT_SNAPSHOT_LIMIT);
    let exit = if history.fault().is_some() {
        ExitCode::from(EXIT_RUNTIME_ERROR)
    } else {
        ExitCode::SUCCESS
    };
    history.rewind_to_start()?;

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(history);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Some(fault) = app.history.fault() {
        eprintln!("Runtime error: {}", fault);
    }
    res?;

    Ok(exit)
}
