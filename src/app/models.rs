use crate::app::error::PipeError;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;

/// How `ignored_folders` entries are compared against the containing directory.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FolderMatch {
    /// Raw string prefix of the root-relative directory (`dist` also hides `distribution/`).
    #[default]
    Prefix,
    /// Whole path segments only.
    Segment,
}

/// Represents the final configuration after merging `.piedpiper.json` over the defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeConfig {
    pub target_folder: String,
    pub ignored_folders: Vec<String>,
    pub ignored_files: Vec<String>,
    pub ignored_patterns: Vec<String>,
    pub extensions_to_append_txt: Vec<String>,
    pub folder_match: FolderMatch,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        fn owned(items: &[&str]) -> Vec<String> {
            items.iter().map(|s| s.to_string()).collect()
        }

        Self {
            target_folder: "pipe".to_string(),
            ignored_folders: owned(&["node_modules", "pipe", ".git", "dist"]),
            ignored_files: owned(&[
                "package-lock.json",
                "organize.js",
                ".gitignore",
                ".prettierrc",
                ".env",
                "README.md",
                ".firebaserc",
            ]),
            ignored_patterns: owned(&["*.log", "*.cache", "*.svg"]),
            extensions_to_append_txt: owned(&[".rules", ".jsx"]),
            folder_match: FolderMatch::Prefix,
        }
    }
}

/// One file copied into the destination folder.
#[derive(Debug, Clone)]
pub struct RenameRecord {
    pub source: PathBuf,
    pub segments: Vec<String>, // Root-relative folder segments, root excluded
    pub dest_name: String,
    pub dest_path: PathBuf,
}

/// Two sources that flattened to the same destination name. `winner` is the one left on disk.
#[derive(Debug, Clone)]
pub struct Collision {
    pub dest_name: String,
    pub overwritten: PathBuf,
    pub winner: PathBuf,
}

/// Everything a walk did, including the failures it stepped over.
#[derive(Debug, Default)]
pub struct WalkReport {
    pub copied: Vec<RenameRecord>,
    pub ignored: usize,
    pub filtered_out: usize,
    pub errors: Vec<PipeError>,
    pub collisions: Vec<Collision>,
    /// Destination names written so far, mapped to the source that currently owns them.
    pub(crate) written: HashMap<String, PathBuf>,
}
