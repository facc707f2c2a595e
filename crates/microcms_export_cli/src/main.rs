use std::process::ExitCode;

use clap::Parser;
use export_logging::export_error;

mod app;

fn main() -> ExitCode {
    let args = app::Args::parse();
    match app::run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            export_error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}
