//! modtrack CLI entry point
//!
//! Parses arguments and dispatches through `cli::run`, printing any error to
//! stderr and exiting non-zero.

use modtrack::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
