use crate::app::error::PipeError;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Resolves `target_folder` against `root`, refusing anything that is not strictly
/// inside it.
pub fn resolve_target(root: &Path, target_folder: &str) -> Result<PathBuf, PipeError> {
    let relative = Path::new(target_folder);
    let reject = |reason: &str| PipeError::DestinationReset {
        path: relative.to_path_buf(),
        source: io::Error::new(io::ErrorKind::InvalidInput, reason.to_string()),
    };

    let mut has_name = false;
    for component in relative.components() {
        match component {
            Component::Normal(_) => has_name = true,
            Component::CurDir => {}
            _ => return Err(reject("target folder must be a relative path below the working directory")),
        }
    }
    if !has_name {
        return Err(reject("target folder must name a directory below the working directory"));
    }

    let target = root.join(relative);

    // Symlinks on the way may point back at the root or elsewhere.
    if let (Some(resolved), Ok(root)) = (canonical_prefix(&target), fs::canonicalize(root)) {
        if resolved == root || !resolved.starts_with(&root) {
            return Err(reject("target folder resolves outside the working directory"));
        }
    }

    Ok(target)
}

/// Canonical form of `path`, with any missing tail re-attached to its deepest existing ancestor.
fn canonical_prefix(path: &Path) -> Option<PathBuf> {
    let mut missing = Vec::new();
    let mut current = path;
    loop {
        if let Ok(resolved) = fs::canonicalize(current) {
            return Some(missing.iter().rev().fold(resolved, |acc, name| acc.join(name)));
        }
        missing.push(current.file_name()?);
        current = current.parent()?;
    }
}

/// Leaves `target` as an existing, empty directory.
///
/// The first entry that cannot be removed aborts the reset.
pub fn reset(target: &Path) -> Result<(), PipeError> {
    let fail = |source| PipeError::DestinationReset {
        path: target.to_path_buf(),
        source,
    };

    if !target.exists() {
        log::info!("Creating target folder: {}", target.display());
        return fs::create_dir_all(target).map_err(fail);
    }

    if !target.is_dir() {
        return Err(fail(std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            "path exists and is not a directory",
        )));
    }

    log::info!("Clearing existing {} folder...", target.display());

    let mut entries: Vec<_> = fs::read_dir(target)
        .map_err(fail)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(fail)?;
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let path = entry.path();
        let file_type = entry.file_type().map_err(|source| PipeError::DestinationReset {
            path: path.clone(),
            source,
        })?;

        // Output is always flat; a directory here is left over from something else.
        let removed = if file_type.is_dir() {
            log::warn!("Removing stale subdirectory: {}", path.display());
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        };

        removed.map_err(|source| PipeError::DestinationReset {
            path: path.clone(),
            source,
        })?;
        log::info!("Deleted: {}", path.display());
    }

    Ok(())
}
