use crate::app::cli::Cli;
use crate::app::error::PipeError;
use crate::app::models::{FolderMatch, RuntimeConfig};
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const CONFIG_FILE_NAME: &str = ".piedpiper.json";

/// Subset of `RuntimeConfig` a user may override. Absent keys keep their default.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
struct ConfigOverrides {
    target_folder: Option<String>,
    ignored_folders: Option<Vec<String>>,
    ignored_files: Option<Vec<String>>,
    ignored_patterns: Option<Vec<String>>,
    extensions_to_append_txt: Option<Vec<String>>,
    folder_match: Option<FolderMatch>,
}

fn load_overrides(path: &Path) -> Result<ConfigOverrides, PipeError> {
    let content = fs::read_to_string(path).map_err(|e| PipeError::ConfigLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    serde_json::from_str(&content).map_err(|e| PipeError::ConfigLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Shallow merge: a present field replaces the default as a whole, lists are never unioned.
fn apply_overrides(base: RuntimeConfig, overrides: ConfigOverrides) -> RuntimeConfig {
    RuntimeConfig {
        target_folder: overrides.target_folder.unwrap_or(base.target_folder),
        ignored_folders: overrides.ignored_folders.unwrap_or(base.ignored_folders),
        ignored_files: overrides.ignored_files.unwrap_or(base.ignored_files),
        ignored_patterns: overrides.ignored_patterns.unwrap_or(base.ignored_patterns),
        extensions_to_append_txt: overrides
            .extensions_to_append_txt
            .unwrap_or(base.extensions_to_append_txt),
        folder_match: overrides.folder_match.unwrap_or(base.folder_match),
    }
}

/// Builds the run configuration. Never fails: a broken config file is reported and skipped.
pub fn resolve_config(cli: &Cli, working_dir: &Path) -> RuntimeConfig {
    // Explicit --config > ./.piedpiper.json
    let (config_path, explicit) = match &cli.config {
        Some(path) => (working_dir.join(path), true),
        None => (working_dir.join(CONFIG_FILE_NAME), false),
    };

    load_from(&config_path, explicit)
}

fn load_from(config_path: &Path, explicit: bool) -> RuntimeConfig {
    if !explicit && !config_path.exists() {
        log::debug!("No {} found, using default configuration", CONFIG_FILE_NAME);
        return RuntimeConfig::default();
    }

    match load_overrides(config_path) {
        Ok(overrides) => {
            log::info!("Loaded configuration from {}", config_path.display());
            apply_overrides(RuntimeConfig::default(), overrides)
        }
        Err(err) => {
            log::warn!("{}", err);
            log::warn!("Using default configuration");
            RuntimeConfig::default()
        }
    }
}
