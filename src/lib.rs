pub mod cli;
pub mod config;
pub mod downloader;
pub mod error;
pub mod input;
pub mod logging;
pub mod progress;
pub mod target;

pub use cli::Args;
pub use config::DownloadConfig;
pub use downloader::{BatchSummary, Downloader};
pub use error::{DownloadError, Result};
pub use input::{collect_urls, file_exists, parse_urls_from_text_file, url_is_valid};
pub use progress::{BarProgress, NullProgress, ProgressSink};
pub use target::{parse_file_name, Target};
