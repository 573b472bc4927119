//! formcraft CLI entry point
//!
//! Parses arguments and dispatches via `cli::run`, printing any error to stderr and
//! exiting non-zero. Configuration, logging and the server are all set up by the
//! command itself.

use formcraft::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
