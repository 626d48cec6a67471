use crate::app::error::PipeError;
use crate::app::models::{Collision, RuntimeConfig, WalkReport};
use std::fs;
use std::path::{Path, PathBuf};

pub const SUMMARY_FILE_NAME: &str = "README.md";

pub struct SummaryGenerator;

impl SummaryGenerator {
    fn list(items: &[String]) -> String {
        if items.is_empty() {
            "(none)".to_string()
        } else {
            items.join(", ")
        }
    }

    pub fn generate(config: &RuntimeConfig, filter: Option<&str>, report: &WalkReport) -> String {
        let target = &config.target_folder;
        let mut out = String::from("# Pipe Folder Overview\n\n");

        out.push_str(&format!(
            "This folder contains a flattened version of a project directory structure, where all \
             files have been copied from their original subdirectories into this single `{}` folder. \
             The purpose is to allow a Large Language Model (LLM) to ingest and understand the \
             entire project structure in one shot by attaching these files.\n\n",
            target
        ));

        out.push_str("## Naming Convention\n");
        out.push_str("- Each file is renamed to reflect its original folder path.\n");
        out.push_str(
            "- Folder names are concatenated with underscores (`_`), followed by the original filename.\n",
        );
        out.push_str(
            "- Example: A file originally at `./functions/fetchTournaments/fetchTournaments.js` \
             becomes `functions_fetchTournaments_fetchTournaments.js`.\n",
        );
        out.push_str("- If a file was in the root directory, it retains its original name.\n");
        out.push_str("- Special cases:\n");
        out.push_str(&format!(
            "  - Files with one of these extensions have `.txt` appended: {}.\n",
            Self::list(&config.extensions_to_append_txt)
        ));
        out.push_str(
            "  - Files with no extension have `.txt` appended (e.g., `myfile` becomes `myfile.txt`).\n\n",
        );

        out.push_str("## Process\n");
        out.push_str(&format!(
            "1. The `{}` folder is cleared (if it exists) or created (if it doesn't).\n",
            target
        ));
        out.push_str("2. The parent directory is crawled recursively, ignoring:\n");
        out.push_str(&format!(
            "   - Folders: {}\n",
            Self::list(&config.ignored_folders)
        ));
        out.push_str(&format!("   - Files: {}\n", Self::list(&config.ignored_files)));
        out.push_str(&format!(
            "   - Patterns: {}\n",
            Self::list(&config.ignored_patterns)
        ));
        out.push_str("3. All other files are copied here with their new names, applying the extension rules above.\n");

        if let Some(filter) = filter {
            out.push_str(&format!(
                "\n## Filter\nOnly files containing \"{}\" in their path were included.\n",
                filter
            ));
        }

        out.push_str("\n## Contents\n");
        out.push_str(&format!("- Files copied: {}\n", report.copied.len()));
        out.push_str(&format!(
            "- Entries excluded by ignore rules: {}\n",
            report.ignored
        ));
        if filter.is_some() {
            out.push_str(&format!(
                "- Files not matching the filter: {}\n",
                report.filtered_out
            ));
        }
        out.push_str(&format!(
            "- Entries skipped because of errors: {}\n",
            report.errors.len()
        ));

        if !report.copied.is_empty() {
            out.push_str("\n## Files\n");
            for record in &report.copied {
                let origin = if record.segments.is_empty() {
                    ".".to_string()
                } else {
                    record.segments.join("/")
                };
                out.push_str(&format!("- `{}` (from `{}`)\n", record.dest_name, origin));
            }
        }

        if !report.collisions.is_empty() {
            out.push_str("\n## Name Collisions\n");
            out.push_str("These sources flattened to the same name; only the last one copied is present:\n");
            for c in &report.collisions {
                out.push_str(&format!(
                    "- `{}`: `{}` replaced `{}`\n",
                    c.dest_name,
                    c.winner.display(),
                    c.overwritten.display()
                ));
            }
        }

        out.push_str("\n## Usage\n");
        out.push_str(
            "Attach all files in this folder to an LLM to provide a complete view of the project's \
             codebase, with file paths embedded in the filenames for context.\n",
        );

        out
    }

    /// Writes the summary into `target`, after every copy has happened.
    ///
    /// A copied file that flattened to the summary's name is overwritten, so it
    /// moves from the copied list to the collisions.
    pub fn write(
        target: &Path,
        config: &RuntimeConfig,
        filter: Option<&str>,
        report: &mut WalkReport,
    ) -> Result<PathBuf, PipeError> {
        let path = target.join(SUMMARY_FILE_NAME);

        if let Some(source) = report.written.remove(SUMMARY_FILE_NAME) {
            log::warn!(
                "Name collision: summary replaces copied file {}",
                source.display()
            );
            report.copied.retain(|r| r.dest_name != SUMMARY_FILE_NAME);
            report.collisions.push(Collision {
                dest_name: SUMMARY_FILE_NAME.to_string(),
                overwritten: source,
                winner: path.clone(),
            });
        }

        fs::write(&path, Self::generate(config, filter, report)).map_err(|source| {
            PipeError::SummaryWrite {
                path: path.clone(),
                source,
            }
        })?;
        log::info!("Created: {}", path.display());

        Ok(path)
    }
}
