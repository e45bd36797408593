//! Binary entrypoint for the `testloom` CLI.

use std::process::ExitCode;

fn main() -> ExitCode {
    // Best-effort .env pickup for ANTHROPIC_API_KEY.
    let _ = dotenvy::dotenv();

    match testloom::run(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
