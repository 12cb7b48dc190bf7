//! Main application entry point.

use sketchnote_app::{App, AppConfig, AppError, USAGE};
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Starting Sketchnote");

    let result = AppConfig::from_args(std::env::args().skip(1)).and_then(|config| App::run(&config));
    match result {
        Ok(summary) => {
            log::info!(
                "Replayed {} steps, exported {} drawables",
                summary.steps,
                summary.export.objects.len()
            );
            ExitCode::SUCCESS
        }
        Err(AppError::Usage(msg)) => {
            eprintln!("{}\n\n{}", msg, USAGE);
            ExitCode::from(2)
        }
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
