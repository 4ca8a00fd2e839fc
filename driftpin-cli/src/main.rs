//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use driftpin_cli::run;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("driftpin: {err}");
        std::process::exit(1);
    }
}
