//! Larder - Local-first kitchen manager

use std::process::ExitCode;

fn main() -> ExitCode {
    larder_cli::cli::run()
}
