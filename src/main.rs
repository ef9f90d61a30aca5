use anyhow::Result;
use is_terminal::IsTerminal;
use std::io;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use linedup::args::Args;

/// Log to stderr, but only when asked to
fn init_tracing(verbose: bool) {
    if verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .with_writer(io::stderr)
            .init();
    }
}

fn main() -> ExitCode {
    let args = linedup::args::parsed();
    init_tracing(args.verbose);
    match try_main(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("linedup: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn try_main(args: &Args) -> Result<()> {
    if args.files.is_empty() {
        eprintln!("linedup: no input files");
        return Ok(());
    }
    let stdout = io::stdout();
    if stdout.is_terminal() {
        linedup::run(&args.files, args.policy, stdout.lock())?;
    } else {
        linedup::run(&args.files, args.policy, io::BufWriter::new(stdout.lock()))?;
    }
    Ok(())
}
