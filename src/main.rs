mod app;

use clap::Parser;
use env_logger::{Builder, Env};
use log::LevelFilter;

use crate::app::cli::Cli;

/// Exit status for `--strict` runs that stepped over failures.
const EXIT_SKIPPED: i32 = 2;

fn main() {
    let args = Cli::parse();

    let mut logger = Builder::from_env(Env::default().default_filter_or("info"));
    if args.verbose {
        logger.filter(None, LevelFilter::Debug);
    }
    logger.init();

    match app::run(&args) {
        Ok(report) => {
            if args.strict && !report.errors.is_empty() {
                log::error!(
                    "Strict mode: {} entries were skipped because of errors",
                    report.errors.len()
                );
                std::process::exit(EXIT_SKIPPED);
            }
        }
        Err(err) => {
            log::error!("An unexpected error occurred: {:#}", err);
            std::process::exit(1);
        }
    }
}
