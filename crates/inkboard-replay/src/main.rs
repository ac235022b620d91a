//! Headless replay of recorded pointer sessions.
//!
//! ```text
//! inkboard-replay <script.json> [--commands]
//! ```
//!
//! Prints a JSON summary of the replay to stdout. Set `RUST_LOG=debug` to see
//! stroke lifecycle logging.

mod script;

use clap::Parser;
use script::{ReplayError, ReplayResult, ReplayScript};
use std::path::PathBuf;
use std::process::ExitCode;

/// Replay a recorded pointer session through the Inkboard engine
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the JSON replay script
    script: PathBuf,

    /// Include every emitted ink command in the summary
    #[arg(long, default_value_t = false)]
    commands: bool,
}

fn replay(args: &Args) -> ReplayResult<()> {
    let script = ReplayScript::load(&args.script)?;
    log::info!(
        "Replaying {} events from {}",
        script.events.len(),
        args.script.display()
    );

    let summary = script::run(&script, args.commands);
    let json = serde_json::to_string_pretty(&summary)
        .map_err(|e| ReplayError::Script(e.to_string()))?;
    println!("{json}");
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    match replay(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
