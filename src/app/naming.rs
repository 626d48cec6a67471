//! Renaming, filtering and exclusion rules applied to each walked entry.
//!
//! Everything here is pure string work over root-relative segments, so the
//! walker only has to hand over what it found on disk.

use crate::app::models::FolderMatch;
use std::path::{Component, Path};

/// Non-empty folder segments of a root-relative directory path.
pub fn relative_segments(relative_dir: &Path) -> Vec<String> {
    relative_dir
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().to_string()),
            _ => None,
        })
        .filter(|part| !part.is_empty())
        .collect()
}

/// Extension of a bare file name including its dot (`.rs`), `None` for `Makefile` or `.env`.
fn extension_of(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
}

fn same_extension(configured: &str, ext: &str) -> bool {
    configured.trim_start_matches('.') == ext.trim_start_matches('.')
}

/// `a/b/c.txt` becomes `a_b_c.txt`; a root-level file keeps its name.
///
/// `.txt` is appended once when the extension is listed in `append_txt`
/// or when the file has no extension at all.
pub fn destination_name(segments: &[String], file_name: &str, append_txt: &[String]) -> String {
    let mut name = if segments.is_empty() {
        file_name.to_string()
    } else {
        format!("{}_{}", segments.join("_"), file_name)
    };

    match extension_of(file_name) {
        Some(ext) if append_txt.iter().any(|a| same_extension(a, &ext)) => name.push_str(".txt"),
        Some(_) => {}
        None => name.push_str(".txt"),
    }

    name
}

/// Case-insensitive containment of `token` in the flattened `segments_file` name.
pub fn matches_filter(segments: &[String], file_name: &str, token: Option<&str>) -> bool {
    let Some(token) = token else {
        return true;
    };

    let mut parts: Vec<&str> = segments.iter().map(String::as_str).collect();
    parts.push(file_name);
    let constructed = parts.join("_").to_lowercase();

    constructed.contains(&token.to_lowercase())
}

/// Only the `*.ext` suffix form is understood; any other pattern never matches.
pub fn matches_ignored_pattern(file_name: &str, patterns: &[String]) -> bool {
    patterns.iter().any(|pattern| match pattern.strip_prefix('*') {
        Some(tail) if tail.starts_with('.') => file_name.ends_with(tail),
        _ => false,
    })
}

pub fn is_ignored_file(file_name: &str, ignored_files: &[String], patterns: &[String]) -> bool {
    ignored_files.iter().any(|f| f == file_name) || matches_ignored_pattern(file_name, patterns)
}

/// An entry is excluded when its own name is listed, or when its containing
/// directory (root-relative) falls under a listed folder. Once a prefix matches,
/// everything below stays excluded.
pub fn is_ignored_folder(
    entry_name: &str,
    parent_segments: &[String],
    ignored_folders: &[String],
    mode: FolderMatch,
) -> bool {
    if ignored_folders.iter().any(|f| f == entry_name) {
        return true;
    }

    match mode {
        FolderMatch::Prefix => {
            let parent = parent_segments.join("/");
            ignored_folders
                .iter()
                .map(|f| f.replace('\\', "/"))
                .any(|f| !f.is_empty() && parent.starts_with(&f))
        }
        FolderMatch::Segment => ignored_folders.iter().any(|f| {
            let wanted = relative_segments(Path::new(&f.replace('\\', "/")));
            !wanted.is_empty() && parent_segments.starts_with(&wanted)
        }),
    }
}
