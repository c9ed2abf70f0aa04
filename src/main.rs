use std::process::ExitCode;

use clap::Parser;
use dotenvy::dotenv;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use hrm_attendance::cli::{self, Cli};
use hrm_attendance::config::Config;
use hrm_attendance::render::{self, Style};

fn main() -> ExitCode {
    dotenv().ok();
    let args = Cli::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    // Rolling daily log, the console belongs to the operator
    let file_appender = match config.log_appender() {
        Ok(appender) => appender,
        Err(e) => {
            eprintln!("Configuration error: {e:#}");
            return ExitCode::FAILURE;
        }
    };
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(
            EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .init();

    info!(data_file = %config.data_file.display(), "hrm starting");

    let color = config.color && !args.no_color;
    match cli::run(args, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %format!("{e:#}"), "Command failed");
            let palette = render::palette(color);
            eprintln!("{}", palette.paint(Style::Error, &format!("Error: {e:#}")));
            ExitCode::FAILURE
        }
    }
}
