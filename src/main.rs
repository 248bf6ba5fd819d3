use anyhow::{Context, Result};
use file_downloader::logging::init_logging;
use file_downloader::{collect_urls, Args, DownloadConfig, DownloadError, Downloader};
use tracing::debug;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse_args();
    init_logging(args.verbose);

    let config = DownloadConfig::from_args(args).context("Failed to resolve the working directory")?;
    let urls = collect_urls(&config);
    if urls.is_empty() {
        println!("No URL(s) provided. Closing file-downloader.");
        return Ok(());
    }

    let downloader = Downloader::new().context("Failed to build HTTP client")?;

    // Dropping the batch on Ctrl-C removes the in-flight .tmp file.
    let summary = tokio::select! {
        result = downloader.download_all(&urls, &config.target_dir) => {
            result.context("Download failed")?
        }
        _ = tokio::signal::ctrl_c() => {
            return Err(DownloadError::Interrupted.into());
        }
    };

    debug!(
        "downloaded {} file(s), skipped {} URL(s)",
        summary.downloaded, summary.skipped
    );
    Ok(())
}
