use std::path::{Path, PathBuf};
use url::Url;

use crate::error::{DownloadError, Result};

/// Returns `(file name with extension, file name without extension)` for the last
/// segment of a `/`-separated path. Trailing slashes are ignored.
pub fn parse_file_name(path: &str) -> (String, String) {
    let trimmed = path.trim_end_matches('/');
    let file_name = trimmed.rsplit('/').next().unwrap_or(trimmed);
    let stem = file_name
        .rsplit_once('.')
        .map_or(file_name, |(stem, _extension)| stem);

    (file_name.to_string(), stem.to_string())
}

/// Where a single URL is saved: `<root>/<stem>/<file_name>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub root: PathBuf,
    pub stem: String,
    pub file_name: String,
}

impl Target {
    pub fn resolve(root: &Path, url: &Url) -> Result<Self> {
        let (file_name, stem) = parse_file_name(url.path());
        if file_name.is_empty() {
            return Err(DownloadError::MissingFileName(url.to_string()));
        }

        Ok(Target {
            root: root.to_path_buf(),
            stem,
            file_name,
        })
    }

    pub fn directory(&self) -> PathBuf {
        self.root.join(&self.stem)
    }

    pub fn file_path(&self) -> PathBuf {
        self.directory().join(&self.file_name)
    }
}
