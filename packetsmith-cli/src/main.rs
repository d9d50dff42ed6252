//! ## packetsmith-cli
//! Builds packets from the command line, either through a named recipe or
//! by setting each field by hand, and prints the result.

use std::io::Write;
use std::process::ExitCode;

use clap::Parser;

mod commands;

use commands::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match commands::run_command(cli, &mut out) {
        Ok(()) => {
            let _ = out.flush();
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
