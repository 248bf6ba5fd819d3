//! Progress reporting for a single transfer.
//!
//! The downloader only talks to [`ProgressSink`]; [`BarProgress`] renders it
//! with indicatif. [`CountingWriter`] sits on the write path and feeds a
//! [`TransferCounter`] with every byte the inner writer accepted, so the bytes
//! that reach the file are never touched by progress reporting.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::io::AsyncWrite;

/// Redraw rate of the terminal bar, ~100 ms between frames.
pub const REFRESH_HZ: u8 = 10;

/// Receives the cumulative byte count of one transfer.
pub trait ProgressSink {
    /// Called once before the first byte is written. `total` is `None` when unknown.
    fn start(&mut self, total: Option<u64>);
    /// Called with the new cumulative number of bytes written.
    fn update(&mut self, transferred: u64);
    /// Called once after the body has been fully written.
    fn finish(&mut self);
}

impl<S: ProgressSink + ?Sized> ProgressSink for &mut S {
    fn start(&mut self, total: Option<u64>) {
        (**self).start(total)
    }

    fn update(&mut self, transferred: u64) {
        (**self).update(transferred)
    }

    fn finish(&mut self) {
        (**self).finish()
    }
}

impl<S: ProgressSink + ?Sized> ProgressSink for Box<S> {
    fn start(&mut self, total: Option<u64>) {
        (**self).start(total)
    }

    fn update(&mut self, transferred: u64) {
        (**self).update(transferred)
    }

    fn finish(&mut self) {
        (**self).finish()
    }
}

/// Displays nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn start(&mut self, _total: Option<u64>) {}
    fn update(&mut self, _transferred: u64) {}
    fn finish(&mut self) {}
}

/// Terminal progress bar on stderr.
pub struct BarProgress {
    label: String,
    bar: Option<ProgressBar>,
}

impl BarProgress {
    pub fn new(label: impl Into<String>) -> Self {
        BarProgress {
            label: label.into(),
            bar: None,
        }
    }
}

fn bar_style(total: Option<u64>) -> ProgressStyle {
    match total {
        Some(_) => ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta}) {msg}",
        )
        .map(|style| style.progress_chars("#>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar()),
        None => ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] {bytes} ({bytes_per_sec}) {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    }
}

impl ProgressSink for BarProgress {
    fn start(&mut self, total: Option<u64>) {
        let bar = ProgressBar::with_draw_target(total, ProgressDrawTarget::stderr_with_hz(REFRESH_HZ));
        bar.set_style(bar_style(total));
        bar.set_message(self.label.clone());
        self.bar = Some(bar);
    }

    fn update(&mut self, transferred: u64) {
        if let Some(bar) = &self.bar {
            bar.set_position(transferred);
        }
    }

    fn finish(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish();
        }
    }
}

impl Drop for BarProgress {
    fn drop(&mut self) {
        // Failed transfers never reach `finish`; leave the bar where it stopped.
        if let Some(bar) = self.bar.take() {
            bar.abandon();
        }
    }
}

/// Monotonic byte counter for one in-flight transfer.
pub struct TransferCounter<S: ProgressSink> {
    transferred: u64,
    sink: S,
}

impl<S: ProgressSink> TransferCounter<S> {
    /// Creates the counter and starts the sink.
    pub fn start(mut sink: S, total: Option<u64>) -> Self {
        sink.start(total);
        TransferCounter {
            transferred: 0,
            sink,
        }
    }

    pub fn record(&mut self, bytes: u64) {
        self.transferred += bytes;
        self.sink.update(self.transferred);
    }

    pub fn transferred(&self) -> u64 {
        self.transferred
    }

    /// Finishes the sink and returns the final byte count.
    pub fn finish(mut self) -> u64 {
        self.sink.finish();
        self.transferred
    }
}

/// Writer adapter that counts every byte accepted by `inner`.
pub struct CountingWriter<W, S: ProgressSink> {
    inner: W,
    counter: TransferCounter<S>,
}

impl<W, S: ProgressSink> CountingWriter<W, S> {
    pub fn new(inner: W, counter: TransferCounter<S>) -> Self {
        CountingWriter { inner, counter }
    }

    pub fn transferred(&self) -> u64 {
        self.counter.transferred()
    }

    pub fn into_parts(self) -> (W, TransferCounter<S>) {
        (self.inner, self.counter)
    }
}

impl<W, S> AsyncWrite for CountingWriter<W, S>
where
    W: AsyncWrite + Unpin,
    S: ProgressSink + Unpin,
{
    fn poll_write(self: Pin<&mut Self>, cx: &mut Context<'_>, buf: &[u8]) -> Poll<io::Result<usize>> {
        let this = self.get_mut();
        match Pin::new(&mut this.inner).poll_write(cx, buf) {
            Poll::Ready(Ok(written)) => {
                this.counter.record(written as u64);
                Poll::Ready(Ok(written))
            }
            other => other,
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().inner).poll_flush(cx)
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().inner).poll_shutdown(cx)
    }
}
