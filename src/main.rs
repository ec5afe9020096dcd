//! Akihabara Manga Store cart CLI

use std::{fmt::Display, io, process::ExitCode};

use akihabara::{cli::Cli, observability::init_logging};
use tracing::error;

fn main() -> ExitCode {
    let cli = Cli::load();

    if let Err(err) = init_logging(&cli.config.logging) {
        report(err);

        return ExitCode::FAILURE;
    }

    let stdout = io::stdout();

    match cli.run(&mut stdout.lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "command failed");
            report(err);

            ExitCode::FAILURE
        }
    }
}

#[expect(clippy::print_stderr, reason = "failures are reported to the user on stderr")]
fn report(err: impl Display) {
    eprintln!("error: {err}");
}
