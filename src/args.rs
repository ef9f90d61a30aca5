//! Code to parse the command line using `clap`, and definitions of the
//! parsed result

use clap::{ArgGroup, Parser};
use std::path::PathBuf;

use crate::line::{CharClass, LinePolicy, Transform};

/// Returns the parsed command line: the `Args` return value's `policy` field
/// says how each line is filtered and transformed, and the `files` field
/// holds the files to read.
#[must_use]
pub fn parsed() -> Args {
    match CliArgs::try_parse() {
        Ok(parsed) => resolve(parsed),
        Err(e) if e.use_stderr() => {
            eprintln!("linedup: {}", usage_error(&e));
            std::process::exit(2)
        }
        Err(e) => e.exit(), // --help and --version
    }
}

/// The first line of clap's message, without its `error: ` prefix
fn usage_error(e: &clap::Error) -> String {
    let message = e.to_string();
    let first = message.lines().next().unwrap_or_default();
    first.strip_prefix("error: ").unwrap_or(first).to_string()
}

/// The command line, resolved
#[derive(Debug)]
pub struct Args {
    /// `policy` is applied to every byte read
    pub policy: LinePolicy,
    /// `verbose` asks for log output on stderr
    pub verbose: bool,
    /// `files` is the list of files from the command line
    pub files: Vec<PathBuf>,
}

/// `-u` and `-l` are shorthands for `--transform`; clap has already made
/// sure at most one of the three was given.
fn resolve(parsed: CliArgs) -> Args {
    let transform = if parsed.uppercase {
        Some(Transform::Uppercase)
    } else if parsed.lowercase {
        Some(Transform::Lowercase)
    } else {
        parsed.transform
    };
    Args {
        policy: LinePolicy { filter: parsed.filter, transform },
        verbose: parsed.verbose,
        files: parsed.files,
    }
}

#[derive(Debug, Parser)]
#[command(name = "linedup", version)]
#[command(group(ArgGroup::new("transforms").args(["transform", "uppercase", "lowercase"])))]
/// With one file, print each repeated line with the numbers of the lines where
/// it occurs. With several files, print every line with its number of
/// occurrences in each file.
struct CliArgs {
    #[arg(short, long, value_enum, value_name = "CLASS")]
    /// Keep only the characters in CLASS
    filter: Option<CharClass>,
    #[arg(short, long, value_enum, value_name = "NAME")]
    /// Transform each kept character
    transform: Option<Transform>,
    #[arg(short, long)]
    /// Same as --transform uppercase
    uppercase: bool,
    #[arg(short, long)]
    /// Same as --transform lowercase
    lowercase: bool,
    #[arg(short, long)]
    /// Log progress to stderr (RUST_LOG refines what is logged)
    verbose: bool,
    #[arg(value_name = "FILES")]
    /// The files to read
    files: Vec<PathBuf>,
}
