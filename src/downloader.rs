use futures::StreamExt;
use reqwest::header::{HeaderMap, CONTENT_LENGTH};
use reqwest::Client;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, warn};
use url::Url;

use crate::error::{DownloadError, Result};
use crate::input::parse_valid_url;
use crate::progress::{BarProgress, CountingWriter, NullProgress, ProgressSink, TransferCounter};
use crate::target::Target;

pub const TMP_FILE_EXT: &str = ".tmp";

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Creates `dir` and any missing ancestors. Succeeds when it already exists.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)?;
    Ok(())
}

/// `path` with [`TMP_FILE_EXT`] appended to its file name.
pub fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(TMP_FILE_EXT);
    PathBuf::from(tmp)
}

/// `Content-Length` as a byte count, or `None` when absent or malformed.
pub fn content_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok())
}

/// Temporary download file, removed on drop unless it was persisted.
struct TempFile {
    path: PathBuf,
    persisted: bool,
}

impl TempFile {
    fn new(path: PathBuf) -> Self {
        TempFile {
            path,
            persisted: false,
        }
    }

    async fn persist(mut self, dest: &Path) -> Result<()> {
        tokio::fs::rename(&self.path, dest).await?;
        self.persisted = true;
        debug!("renamed {} to {}", self.path.display(), dest.display());
        Ok(())
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        if self.persisted {
            return;
        }
        match fs::remove_file(&self.path) {
            Ok(()) => debug!("removed {}", self.path.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to remove {}: {}", self.path.display(), e),
        }
    }
}

/// Outcome of a batch run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub downloaded: usize,
    pub skipped: usize,
}

pub struct Downloader {
    client: Client,
    show_progress: bool,
}

impl Downloader {
    pub fn new() -> Result<Self> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Downloader::with_client(client))
    }

    pub fn with_client(client: Client) -> Self {
        Downloader {
            client,
            show_progress: true,
        }
    }

    /// Turns the terminal progress bars on or off.
    pub fn show_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    fn progress_for(&self, target: &Target) -> Box<dyn ProgressSink> {
        if self.show_progress {
            Box::new(BarProgress::new(target.file_name.clone()))
        } else {
            Box::new(NullProgress)
        }
    }

    /// GETs `url` into `path + ".tmp"` and renames it to `path` once the whole body
    /// is on disk. Returns the number of bytes written. The temporary file is
    /// removed on every failure path, including when this future is dropped.
    pub async fn download_file<S>(&self, path: &Path, url: &Url, sink: S) -> Result<u64>
    where
        S: ProgressSink + Unpin,
    {
        let tmp = TempFile::new(tmp_path(path));

        debug!("GET {}", url);
        let response = self.client.get(url.as_str()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::HttpStatus {
                url: url.to_string(),
                status,
            });
        }

        let total = content_length(response.headers());
        debug!("{} answered {}, content length {:?}", url, status, total);

        let file = File::create(&tmp.path).await?;
        let counter = TransferCounter::start(sink, total);
        let mut writer = CountingWriter::new(file, counter);

        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            writer.write_all(&chunk?).await?;
        }
        writer.flush().await?;

        let (file, counter) = writer.into_parts();
        file.sync_all().await?;
        drop(file);
        let written = counter.finish();

        tmp.persist(path).await?;
        Ok(written)
    }

    /// Downloads every URL in order into `<target_dir>/<stem>/<file name>`.
    ///
    /// Invalid URLs and URLs without a file name are skipped with a warning.
    /// Any failure of an actual transfer stops the batch and is returned.
    pub async fn download_all(&self, urls: &[String], target_dir: &Path) -> Result<BatchSummary> {
        let mut summary = BatchSummary::default();

        for raw in urls {
            let Some(url) = parse_valid_url(raw) else {
                println!("Cannot download file from \"{}\" as it is not a valid URL.", raw);
                summary.skipped += 1;
                continue;
            };

            let target = match Target::resolve(target_dir, &url) {
                Ok(target) => target,
                Err(e) => {
                    println!("Cannot download file from \"{}\": {}", raw, e);
                    summary.skipped += 1;
                    continue;
                }
            };

            println!("Downloading: {}", target.file_name);
            ensure_dir(&target.directory())?;

            let file_path = target.file_path();
            let written = self
                .download_file(&file_path, &url, self.progress_for(&target))
                .await
                .map_err(|e| {
                    error!("Failed to download {}: {}", url, e);
                    e
                })?;

            debug!("wrote {} bytes to {}", written, file_path.display());
            println!("Finished downloading: {}", target.file_name);
            summary.downloaded += 1;
        }

        Ok(summary)
    }
}
