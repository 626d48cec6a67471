use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Flatten a project tree into a single folder of path-encoded files for LLMs"
)]
pub struct Cli {
    /// Only copy files whose flattened name contains this text (case-insensitive)
    pub filter: Option<String>,

    /// Read configuration from this file instead of ./.piedpiper.json
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Exit with status 2 if any file or directory was skipped because of an error
    #[arg(long)]
    pub strict: bool,

    /// Print debug information
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// The filter token, with an empty argument treated as no filter.
    pub fn filter_token(&self) -> Option<&str> {
        self.filter.as_deref().filter(|f| !f.is_empty())
    }
}
