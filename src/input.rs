use std::fs;
use std::io;
use std::path::Path;
use tracing::debug;
use url::Url;

use crate::config::DownloadConfig;

/// URLs read from a list file, split into accepted and rejected lines.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct UrlList {
    pub urls: Vec<String>,
    pub rejected: Vec<String>,
}

impl UrlList {
    /// Parses newline-delimited URLs. Blank lines are ignored; every other line
    /// is kept exactly as written.
    pub fn parse(content: &str) -> Self {
        let mut list = UrlList::default();

        for line in content.lines() {
            if line.trim().is_empty() {
                continue;
            }
            if url_is_valid(line) {
                list.urls.push(line.to_string());
            } else {
                list.rejected.push(line.to_string());
            }
        }

        list
    }
}

/// Parses `candidate` as an absolute URL with both a scheme and a host.
/// Surrounding whitespace makes the candidate malformed.
pub fn parse_valid_url(candidate: &str) -> Option<Url> {
    if candidate.trim() != candidate {
        return None;
    }
    Url::parse(candidate).ok().filter(|url| url.has_host())
}

pub fn url_is_valid(candidate: &str) -> bool {
    parse_valid_url(candidate).is_some()
}

/// Returns true when `path` points at an existing file or directory.
pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref().exists()
}

/// Reads the valid URLs from a list file, printing a warning for every malformed line.
pub fn parse_urls_from_text_file<P: AsRef<Path>>(path: P) -> io::Result<Vec<String>> {
    let content = fs::read_to_string(path.as_ref())?;
    let list = UrlList::parse(&content);

    for line in &list.rejected {
        println!("\"{}\" is not a valid URL.", line);
    }
    if list.urls.is_empty() {
        println!("No valid URLs were provided in the list - no files were downloaded.");
    }
    debug!(
        "read {} URL(s) from {} ({} rejected)",
        list.urls.len(),
        path.as_ref().display(),
        list.rejected.len()
    );

    Ok(list.urls)
}

/// Positional URLs first, then the entries of the list file when one is configured and exists.
pub fn collect_urls(config: &DownloadConfig) -> Vec<String> {
    let mut urls = config.urls.clone();

    if let Some(list_path) = &config.list {
        if !file_exists(list_path) {
            debug!("URL list {} does not exist, ignoring it", list_path.display());
            return urls;
        }
        match parse_urls_from_text_file(list_path) {
            Ok(from_list) => urls.extend(from_list),
            Err(e) => {
                println!("Cannot read URL list \"{}\": {}", list_path.display(), e);
            }
        }
    }

    urls
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const PATTON: &str = "https://upload.wikimedia.org/wikipedia/commons/f/f1/Paul_E._Patton_2013.jpg";
    const SMIRNOV: &str =
        "https://upload.wikimedia.org/wikipedia/commons/8/84/Dmitri_N_Smirnov_%C2%A9Kompozitor.jpg";

    fn write_list(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn valid_urls() {
        assert!(url_is_valid("https://www.google.com/"));
        assert!(url_is_valid("http://localhost:8080/file.bin"));
        assert!(url_is_valid(PATTON));
    }

    #[test]
    fn invalid_urls() {
        assert!(!url_is_valid("fish"));
        assert!(!url_is_valid(""));
        assert!(!url_is_valid("/relative/path.txt"));
        assert!(!url_is_valid("mailto:someone@example.com"));
        assert!(!url_is_valid("http://"));
        assert!(!url_is_valid(" https://www.google.com/"));
        assert!(!url_is_valid("https://www.google.com/\t"));
    }

    #[test]
    fn existing_paths() {
        let wd = std::env::current_dir().unwrap();
        assert!(file_exists(&wd));
        assert!(file_exists("Cargo.toml"));
        assert!(!file_exists("hello world"));
    }

    #[test]
    fn only_valid_urls_are_returned_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_list(&dir, "only-valid-urls.txt", &format!("{}\n{}\n", PATTON, SMIRNOV));

        let urls = parse_urls_from_text_file(&path).unwrap();
        assert_eq!(urls, vec![PATTON, SMIRNOV]);
    }

    #[test]
    fn malformed_lines_are_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let content = format!("fish\n{}\nnot a url\n{}\n", PATTON, SMIRNOV);
        let path = write_list(&dir, "valid-and-invalid-urls.txt", &content);

        let urls = parse_urls_from_text_file(&path).unwrap();
        assert_eq!(urls, vec![PATTON, SMIRNOV]);

        let list = UrlList::parse(&content);
        assert_eq!(list.rejected, vec!["fish", "not a url"]);
    }

    #[test]
    fn only_invalid_urls_yield_empty_list() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_list(&dir, "only-invalid-urls.txt", "fish\nchips\n");

        let urls = parse_urls_from_text_file(&path).unwrap();
        assert!(urls.is_empty());
    }

    #[test]
    fn missing_list_file_is_not_found() {
        let err = parse_urls_from_text_file("fish").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn blank_lines_and_crlf_are_ignored() {
        let list = UrlList::parse("\r\nhttps://example.com/a.zip\r\n\n   \nhttps://example.com/b.zip");
        assert_eq!(list.urls, vec!["https://example.com/a.zip", "https://example.com/b.zip"]);
        assert!(list.rejected.is_empty());
    }

    #[test]
    fn lines_are_kept_unchanged() {
        let content = format!("{}\n  {}  \n", PATTON, SMIRNOV);
        let list = UrlList::parse(&content);
        assert_eq!(list.urls, vec![PATTON]);
        assert_eq!(list.rejected, vec![format!("  {}  ", SMIRNOV)]);
    }

    #[test]
    fn arguments_come_before_list_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_list(&dir, "urls.txt", &format!("{}\nfish\n", SMIRNOV));
        let config = DownloadConfig {
            target_dir: dir.path().to_path_buf(),
            list: Some(path),
            urls: vec![PATTON.to_string(), "not validated here".to_string()],
        };

        assert_eq!(
            collect_urls(&config),
            vec![PATTON, "not validated here", SMIRNOV]
        );
    }

    #[test]
    fn missing_list_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let config = DownloadConfig {
            target_dir: dir.path().to_path_buf(),
            list: Some(dir.path().join("nope.txt")),
            urls: vec![PATTON.to_string()],
        };

        assert_eq!(collect_urls(&config), vec![PATTON]);
        assert!(!dir.path().join("nope.txt").exists());
    }
}
