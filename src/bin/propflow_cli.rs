use std::process::ExitCode;

use propflow_core::{cli::run_cli, init};

fn main() -> ExitCode {
    init();

    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "shell stopped");
            eprintln!("propflow: {err}");
            ExitCode::FAILURE
        }
    }
}
