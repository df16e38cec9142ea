//! pagefix CLI entry point
//!
//! Parses arguments, runs the single-page recovery, prints errors to stderr
//! and exits non-zero on any refusal or failure. All logic lives in the CLI
//! module.

use pagefix::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
