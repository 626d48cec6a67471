use std::fs;
use std::path::Path;
use std::process::Command;

// Helper function to get the binary command
#[allow(dead_code)]
pub fn piedpiper_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("piedpiper"))
}

#[allow(dead_code)]
pub fn create_file(
    dir_path: &Path,
    relative_path: &str,
    content: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let file_path = dir_path.join(relative_path);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file_path, content)?;
    Ok(())
}

/// Names of everything in `dir`, sorted.
#[allow(dead_code)]
pub fn listing(dir: &Path) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        names.push(entry?.file_name().to_string_lossy().to_string());
    }
    names.sort();
    Ok(names)
}

/// A small project in the shape the tool is usually pointed at.
#[allow(dead_code)]
pub fn sample_project(root: &Path) -> Result<(), Box<dyn std::error::Error>> {
    create_file(root, "README.md", "# project")?;
    create_file(root, "package.json", "{}")?;
    create_file(root, "package-lock.json", "{}")?;
    create_file(root, ".env", "SECRET=1")?;
    create_file(root, "firestore.rules", "allow read;")?;
    create_file(root, "functions/fetchTournaments/fetchTournaments.js", "fetch()")?;
    create_file(root, "functions/deploy/index.js", "deploy()")?;
    create_file(root, "src/App.jsx", "<App />")?;
    create_file(root, "src/logo.svg", "<svg/>")?;
    create_file(root, "scripts/run", "#!/bin/sh")?;
    create_file(root, "debug.log", "noise")?;
    create_file(root, "node_modules/left-pad/index.js", "pad")?;
    create_file(root, ".git/HEAD", "ref: refs/heads/main")?;
    create_file(root, "dist/bundle.js", "min")?;
    Ok(())
}
