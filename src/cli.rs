use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

/// Long flags that are also accepted with a single leading dash.
const LEGACY_FLAGS: [&str; 2] = ["dir", "list"];

#[derive(Parser, Debug)]
#[command(name = "file-downloader")]
#[command(about = "Download files from a list of URLs into per-file directories")]
pub struct Args {
    #[arg(long, value_name = "PATH", help = "The directory you want the files downloaded to [default: current directory]")]
    pub dir: Option<PathBuf>,
    #[arg(long, value_name = "PATH", help = "A text file containing a list of URLs, one per line")]
    pub list: Option<PathBuf>,
    #[arg(short, long, help = "Print debug logging to stderr")]
    pub verbose: bool,
    #[arg(help = "URLs to download")]
    pub urls: Vec<String>,
}

impl Args {
    /// Parses the process arguments, accepting `-dir`/`-list` as well as `--dir`/`--list`.
    pub fn parse_args() -> Self {
        Args::parse_from(normalize_legacy_flags(std::env::args_os()))
    }
}

/// Rewrites `-dir`, `-dir=x`, `-list` and `-list=x` to their double-dash form.
/// Everything after a bare `--` is left untouched.
pub fn normalize_legacy_flags<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut out = Vec::new();
    let mut positional_only = false;

    for arg in args {
        if positional_only {
            out.push(arg);
            continue;
        }
        if arg == "--" {
            positional_only = true;
            out.push(arg);
            continue;
        }

        let rewritten = arg.to_str().and_then(|s| {
            let rest = s.strip_prefix('-').filter(|r| !r.starts_with('-'))?;
            let name = rest.split_once('=').map_or(rest, |(name, _)| name);
            LEGACY_FLAGS
                .contains(&name)
                .then(|| OsString::from(format!("-{}", s)))
        });
        out.push(rewritten.unwrap_or(arg));
    }

    out
}
