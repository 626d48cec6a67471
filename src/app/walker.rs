use crate::app::error::PipeError;
use crate::app::models::{Collision, RenameRecord, RuntimeConfig, WalkReport};
use crate::app::naming;
use ignore::{DirEntry, WalkBuilder};
use pathdiff::diff_paths;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Depth-first copy of every eligible file under `root` into the flat `target` folder.
pub struct Walker<'a> {
    root: PathBuf,
    target: PathBuf,
    target_canonical: Option<PathBuf>,
    config: &'a RuntimeConfig,
    filter: Option<String>,
}

impl<'a> Walker<'a> {
    pub fn new(
        root: impl Into<PathBuf>,
        target: impl Into<PathBuf>,
        config: &'a RuntimeConfig,
        filter: Option<&str>,
    ) -> Self {
        let target = target.into();
        Self {
            root: root.into(),
            target_canonical: fs::canonicalize(&target).ok(),
            target,
            config,
            filter: filter.map(str::to_string),
        }
    }

    pub fn walk(&self) -> WalkReport {
        let mut report = WalkReport::default();
        let pruned = Arc::new(AtomicUsize::new(0));

        // An unreadable directory surfaces as one Err and only its subtree is lost.
        for result in self.build_walker(Arc::clone(&pruned)) {
            match result {
                Ok(entry) => self.process_entry(&entry, &mut report),
                Err(err) => {
                    let err = classify_error(err);
                    log::warn!("{}", err);
                    report.errors.push(err);
                }
            }
        }

        report.ignored += pruned.load(Ordering::Relaxed);
        report
    }

    /// No gitignore or hidden-file rules: only `ignored_folders` and the target itself are pruned.
    fn build_walker(&self, pruned: Arc<AtomicUsize>) -> ignore::Walk {
        let root = self.root.clone();
        let ignored_folders = self.config.ignored_folders.clone();
        let folder_match = self.config.folder_match;
        let target = self.target.clone();
        let target_canonical = self.target_canonical.clone();

        let mut builder = WalkBuilder::new(&self.root);
        builder
            .standard_filters(false)
            .follow_links(true)
            .sort_by_file_name(|a, b| a.cmp(b))
            .filter_entry(move |entry| {
                let name = entry.file_name().to_string_lossy();
                let parent = parent_segments(&root, entry.path());

                if naming::is_ignored_folder(&name, &parent, &ignored_folders, folder_match) {
                    log::info!("Skipping ignored folder: {}", entry.path().display());
                    pruned.fetch_add(1, Ordering::Relaxed);
                    return false;
                }

                if is_dir(entry) && is_same_dir(entry.path(), &target, target_canonical.as_deref()) {
                    log::debug!("Skipping destination folder: {}", entry.path().display());
                    return false;
                }

                true
            });

        builder.build()
    }

    fn process_entry(&self, entry: &DirEntry, report: &mut WalkReport) {
        if is_dir(entry) {
            log::debug!("Processing directory: {}", entry.path().display());
        } else if entry.file_type().map_or(false, |t| t.is_file()) {
            let segments = parent_segments(&self.root, entry.path());
            let name = entry.file_name().to_string_lossy();
            self.copy_file(entry.path().to_path_buf(), &name, &segments, report);
        } else {
            log::debug!("Skipping non-regular entry: {}", entry.path().display());
        }
    }

    fn copy_file(&self, source: PathBuf, file_name: &str, segments: &[String], report: &mut WalkReport) {
        if naming::is_ignored_file(
            file_name,
            &self.config.ignored_files,
            &self.config.ignored_patterns,
        ) {
            log::info!("Skipping ignored file: {}", source.display());
            report.ignored += 1;
            return;
        }

        if !naming::matches_filter(segments, file_name, self.filter.as_deref()) {
            log::info!("Skipping file not matching filter: {}", source.display());
            report.filtered_out += 1;
            return;
        }

        let dest_name =
            naming::destination_name(segments, file_name, &self.config.extensions_to_append_txt);
        let dest_path = self.target.join(&dest_name);

        if let Err(err) = fs::copy(&source, &dest_path) {
            let err = PipeError::Copy {
                from: source,
                to: dest_path,
                source: err,
            };
            log::warn!("{}", err);
            report.errors.push(err);
            return;
        }

        if let Some(previous) = report.written.insert(dest_name.clone(), source.clone()) {
            log::warn!(
                "Name collision: {} overwrote {} as {}",
                source.display(),
                previous.display(),
                dest_name
            );
            // Only the file left on disk stays in the copied list.
            report.copied.retain(|r| r.dest_name != dest_name);
            report.collisions.push(Collision {
                dest_name: dest_name.clone(),
                overwritten: previous,
                winner: source.clone(),
            });
        }

        let record = RenameRecord {
            source,
            segments: segments.to_vec(),
            dest_name,
            dest_path,
        };
        log::info!(
            "Copied: {} -> {}",
            record.source.display(),
            record.dest_path.display()
        );
        report.copied.push(record);
    }
}

fn is_dir(entry: &DirEntry) -> bool {
    entry.file_type().map_or(false, |t| t.is_dir())
}

/// Root-relative folder segments of the directory holding `path`.
fn parent_segments(root: &Path, path: &Path) -> Vec<String> {
    path.parent()
        .and_then(|parent| diff_paths(parent, root))
        .map(|relative| naming::relative_segments(&relative))
        .unwrap_or_default()
}

fn is_same_dir(dir: &Path, target: &Path, target_canonical: Option<&Path>) -> bool {
    match target_canonical {
        Some(canonical) => fs::canonicalize(dir).map_or(false, |d| d == canonical),
        None => dir == target,
    }
}

fn error_path(err: &ignore::Error) -> Option<PathBuf> {
    match err {
        ignore::Error::WithPath { path, .. } => Some(path.clone()),
        ignore::Error::Loop { child, .. } => Some(child.clone()),
        ignore::Error::WithDepth { err, .. } | ignore::Error::WithLineNumber { err, .. } => {
            error_path(err)
        }
        ignore::Error::Partial(errs) => errs.iter().find_map(error_path),
        _ => None,
    }
}

/// A failure on a path that is still a directory means its listing failed;
/// anything else (a dangling link, a vanished file) is a failed stat of that entry.
fn classify_error(err: ignore::Error) -> PipeError {
    let path = error_path(&err).unwrap_or_default();
    let message = err.to_string();
    let source = err
        .into_io_error()
        .unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, message));

    if path.is_dir() {
        PipeError::DirectoryList { path, source }
    } else {
        PipeError::Stat { path, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::FolderMatch;
    use crate::app::output_dir;
    use std::collections::BTreeSet;
    use tempfile::{tempdir, TempDir};

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn project() -> TempDir {
        let dir = tempdir().unwrap();
        let root = dir.path();
        write(root, "README.md", "readme");
        write(root, "main.js", "console.log(1)");
        write(root, "functions/fetchTournaments/fetchTournaments.js", "fetch()");
        write(root, "functions/deploy/index.js", "deploy()");
        write(root, "rules/foo.rules", "allow read;");
        write(root, "scripts/run", "#!/bin/sh");
        write(root, "logs/app.log", "noise");
        write(root, "node_modules/pkg/index.js", "dep");
        write(root, "distribution/notes.md", "loose prefix");
        dir
    }

    fn run(root: &Path, config: &RuntimeConfig, filter: Option<&str>) -> (WalkReport, BTreeSet<String>) {
        let target = root.join(&config.target_folder);
        output_dir::reset(&target).unwrap();
        let report = Walker::new(root, &target, config, filter).walk();
        let names = fs::read_dir(&target)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        (report, names)
    }

    #[test]
    fn flattens_with_default_rules() {
        let dir = project();
        let (report, names) = run(dir.path(), &RuntimeConfig::default(), None);

        let expected: BTreeSet<String> = [
            "main.js",
            "functions_fetchTournaments_fetchTournaments.js",
            "functions_deploy_index.js",
            "rules_foo.rules.txt",
            "scripts_run.txt",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        assert_eq!(names, expected);
        assert_eq!(report.copied.len(), 5);
        assert!(report.errors.is_empty());
        assert!(report.collisions.is_empty());
    }

    #[test]
    fn copies_are_byte_identical() {
        let dir = project();
        let bytes: Vec<u8> = (0u8..=255).collect();
        fs::write(dir.path().join("blob.bin"), &bytes).unwrap();

        let (_, names) = run(dir.path(), &RuntimeConfig::default(), None);
        assert!(names.contains("blob.bin"));
        assert_eq!(fs::read(dir.path().join("pipe").join("blob.bin")).unwrap(), bytes);
        assert_eq!(
            fs::read_to_string(dir.path().join("pipe").join("rules_foo.rules.txt")).unwrap(),
            "allow read;"
        );
    }

    #[test]
    fn filter_keeps_only_matching_paths() {
        let dir = project();
        let (report, names) = run(dir.path(), &RuntimeConfig::default(), Some("FETCH"));

        assert_eq!(
            names.into_iter().collect::<Vec<_>>(),
            vec!["functions_fetchTournaments_fetchTournaments.js".to_string()]
        );
        assert!(report.filtered_out >= 4);
    }

    #[test]
    fn prefix_and_segment_folder_matching() {
        let dir = project();
        let mut config = RuntimeConfig::default();
        config.ignored_folders = vec!["dist".to_string(), "pipe".to_string()];

        let (_, names) = run(dir.path(), &config, None);
        assert!(!names.contains("distribution_notes.md"));

        config.folder_match = FolderMatch::Segment;
        let (_, names) = run(dir.path(), &config, None);
        assert!(names.contains("distribution_notes.md"));
        // node_modules is no longer ignored in this config.
        assert!(names.contains("node_modules_pkg_index.js"));
    }

    #[test]
    fn never_walks_into_its_own_target() {
        let dir = project();
        let mut config = RuntimeConfig::default();
        config.target_folder = "flat".to_string();

        let (_, names) = run(dir.path(), &config, None);
        let (_, again) = run(dir.path(), &config, None);

        assert!(names.iter().all(|n| !n.starts_with("flat_")));
        assert_eq!(names, again);
    }

    #[test]
    fn collisions_are_reported_and_last_sorted_source_wins() {
        let dir = tempdir().unwrap();
        write(dir.path(), "a_b.txt", "root");
        write(dir.path(), "a/b.txt", "nested");

        let (report, names) = run(dir.path(), &RuntimeConfig::default(), None);

        assert_eq!(names.len(), 1);
        assert_eq!(report.collisions.len(), 1);
        assert_eq!(report.collisions[0].dest_name, "a_b.txt");
        // "a" sorts before "a_b.txt", so the root file is copied last.
        assert_eq!(
            fs::read_to_string(dir.path().join("pipe").join("a_b.txt")).unwrap(),
            "root"
        );
        // Only the surviving file is counted as copied.
        assert_eq!(report.copied.len(), 1);
        assert_eq!(report.copied[0].source, dir.path().join("a_b.txt"));
        assert!(report.copied[0].segments.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_subtree_does_not_stop_siblings() {
        use std::os::unix::fs::PermissionsExt;

        let dir = project();
        let locked = dir.path().join("functions").join("locked");
        fs::create_dir_all(&locked).unwrap();
        fs::write(locked.join("secret.js"), "x").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Privileged users can still list it; nothing to observe then.
        let listable = fs::read_dir(&locked).is_ok();

        let (report, names) = run(dir.path(), &RuntimeConfig::default(), None);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        assert!(names.contains("functions_deploy_index.js"));
        assert!(names.contains("scripts_run.txt"));
        if !listable {
            assert_eq!(report.errors.len(), 1);
            assert!(matches!(report.errors[0], PipeError::DirectoryList { .. }));
            assert!(!names.contains("functions_locked_secret.js"));
        }
    }

    #[cfg(unix)]
    #[test]
    fn dangling_symlink_is_a_stat_error() {
        let dir = tempdir().unwrap();
        write(dir.path(), "src/main.rs", "fn main() {}");
        std::os::unix::fs::symlink(dir.path().join("gone.txt"), dir.path().join("src/link.txt"))
            .unwrap();

        let (report, names) = run(dir.path(), &RuntimeConfig::default(), None);

        assert!(names.contains("src_main.rs"));
        assert!(!names.contains("src_link.txt"));
        assert_eq!(report.errors.len(), 1);
        match &report.errors[0] {
            PipeError::Stat { path, .. } => assert!(path.ends_with("link.txt")),
            other => panic!("expected a stat error, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn copy_failures_are_recorded_and_walk_continues() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        write(dir.path(), "a.txt", "A");
        write(dir.path(), "b/c.txt", "C");
        let target = dir.path().join("pipe");
        output_dir::reset(&target).unwrap();
        fs::set_permissions(&target, fs::Permissions::from_mode(0o555)).unwrap();

        // Privileged users can still write into it; nothing to observe then.
        let writable = fs::write(target.join(".check"), "").is_ok();
        let report = Walker::new(dir.path(), &target, &RuntimeConfig::default(), None).walk();
        fs::set_permissions(&target, fs::Permissions::from_mode(0o755)).unwrap();

        if !writable {
            assert_eq!(report.errors.len(), 2);
            assert!(report
                .errors
                .iter()
                .all(|e| matches!(e, PipeError::Copy { .. })));
            assert!(report.copied.is_empty());
        }
    }
}
