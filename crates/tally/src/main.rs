use std::{
    fs::File,
    io::{self, BufReader, Write},
    path::PathBuf,
    process::ExitCode,
};

use anyhow::Context;
use clap::{ArgAction, Parser};
use libtally::load_lines;
use tracing_subscriber::{EnvFilter, fmt};

/// Evaluates arithmetic statements, one per line, and prints each result.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Program file. Reads standard input when absent or `-`.
    file: Option<PathBuf>,

    /// Evaluate this text instead of reading a file.
    #[arg(short, long, conflicts_with = "file", allow_hyphen_values = true)]
    expr: Option<String>,

    /// Print the token stream instead of evaluating.
    #[arg(long, conflicts_with = "tree")]
    tokens: bool,

    /// Print the syntax tree instead of evaluating.
    #[arg(long)]
    tree: bool,

    /// Log more to stderr (repeatable). `RUST_LOG` takes precedence.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match execute(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => match err.downcast::<libtally::Error>() {
            Ok(err) => {
                eprintln!("{:?}", miette::Report::new(err));
                ExitCode::from(1)
            }
            Err(err) => {
                eprintln!("error: {err:#}");
                ExitCode::from(2)
            }
        },
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    fmt()
        .with_writer(io::stderr)
        .with_target(false)
        .with_env_filter(filter)
        .init();
}

fn execute(args: &Args) -> anyhow::Result<()> {
    let lines = read_program(args)?;
    tracing::info!(lines = lines.len(), "loaded program");

    // Output is only written once the whole program has succeeded.
    let rendered: Vec<String> = if args.tokens {
        tally_syntax::tokenize(&lines)
            .map_err(|err| libtally::Error::Syntax(err.into()))?
            .iter()
            .map(ToString::to_string)
            .collect()
    } else if args.tree {
        let program = tally_syntax::parse_lines(&lines).map_err(libtally::Error::Syntax)?;
        vec![program.to_string().trim_end().to_string()]
    } else {
        libtally::run(&lines)?
            .iter()
            .map(ToString::to_string)
            .collect()
    };

    let mut stdout = io::stdout().lock();
    for line in &rendered {
        writeln!(stdout, "{line}")?;
    }
    stdout.flush()?;
    Ok(())
}

fn read_program(args: &Args) -> anyhow::Result<Vec<String>> {
    if let Some(expr) = &args.expr {
        return Ok(expr.lines().map(String::from).collect());
    }
    match &args.file {
        Some(path) if path.as_os_str() != "-" => {
            let file = File::open(path)
                .with_context(|| format!("failed to open {}", path.display()))?;
            load_lines(BufReader::new(file))
                .with_context(|| format!("failed to read {}", path.display()))
        }
        _ => load_lines(io::stdin().lock()).context("failed to read standard input"),
    }
}
