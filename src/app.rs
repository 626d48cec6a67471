// Declare modules
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod naming;
pub mod output_dir;
pub mod summary;
pub mod walker;

use anyhow::{Context, Result};
use std::env;

use self::cli::Cli;
use self::config::resolve_config;
use self::models::WalkReport;
use self::summary::SummaryGenerator;
use self::walker::Walker;

/// Initializes components and orchestrates data flow.
///
/// Only a failed reset or summary write is an error here; everything the walk
/// stepped over is in the returned report.
pub fn run(args: &Cli) -> Result<WalkReport> {
    log::info!("Starting file organization...");

    // 1. The working directory is both the source root and the base for the target folder
    let current_dir = env::current_dir().context("Failed to get current directory")?;

    // 2. Resolve Configuration
    let config = resolve_config(args, &current_dir);

    let filter = args.filter_token();
    if let Some(token) = filter {
        log::info!("Filtering files containing: {}", token);
    }

    // 3. Reset the destination, nothing is copied into a half-cleared folder
    let target = output_dir::resolve_target(&current_dir, &config.target_folder)
        .context("Cannot prepare the destination folder")?;
    output_dir::reset(&target).context("Cannot prepare the destination folder")?;

    // 4. Walk and copy
    let mut report = Walker::new(&current_dir, &target, &config, filter).walk();

    // 5. Summary goes in last
    SummaryGenerator::write(&target, &config, filter, &mut report)
        .context("Cannot write the summary file")?;

    log::info!(
        "File organization complete! {} files copied into {}",
        report.copied.len(),
        config.target_folder
    );
    if !report.collisions.is_empty() {
        log::warn!("{} destination names were written more than once", report.collisions.len());
    }
    if !report.errors.is_empty() {
        log::warn!("{} entries were skipped because of errors", report.errors.len());
    }

    Ok(report)
}
