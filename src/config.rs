use std::io;
use std::path::PathBuf;

use crate::cli::Args;

/// Resolved run configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadConfig {
    pub target_dir: PathBuf,
    pub list: Option<PathBuf>,
    pub urls: Vec<String>,
}

impl DownloadConfig {
    /// Builds the configuration, defaulting the target directory to the current working directory.
    pub fn from_args(args: Args) -> io::Result<Self> {
        let target_dir = match args.dir {
            Some(dir) => dir,
            None => std::env::current_dir()?,
        };

        Ok(DownloadConfig {
            target_dir,
            list: args.list,
            urls: args.urls,
        })
    }
}
