//! Byte-level progress reporting and cancellation for response bodies.

use std::fmt;
use std::io::{self, Read};

use crate::cancel::CancellationToken;
use crate::error::ScryfallError;

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

/// Snapshot of a download: bytes read so far and the declared total, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub current: u64,
    /// `None` when the server did not declare a content length.
    pub total: Option<u64>,
}

impl Progress {
    /// Fraction of the download completed, in `0.0..=1.0`, when the total is known.
    pub fn fraction(&self) -> Option<f64> {
        match self.total {
            Some(total) if total > 0 => Some((self.current as f64 / total as f64).min(1.0)),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// ProgressReader
// ---------------------------------------------------------------------------

/// Wraps a reader and reports a [`Progress`] after every successful read,
/// including the final zero-length read at end of stream.
///
/// Bytes and errors from the inner reader pass through unchanged.
pub struct ProgressReader<R, F> {
    inner: R,
    current: u64,
    total: Option<u64>,
    on_read: F,
}

impl<R, F> ProgressReader<R, F>
where
    F: FnMut(Progress),
{
    /// Wrap `inner`. `total` is the expected length, if known, and is passed
    /// through unchanged in every [`Progress`].
    pub fn new(inner: R, total: Option<u64>, on_read: F) -> Self {
        Self {
            inner,
            current: 0,
            total,
            on_read,
        }
    }

    /// Bytes read through this wrapper so far.
    pub fn bytes_read(&self) -> u64 {
        self.current
    }

    /// Unwrap, returning the inner reader.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read, F: FnMut(Progress)> Read for ProgressReader<R, F> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.current += n as u64;
        (self.on_read)(Progress {
            current: self.current,
            total: self.total,
        });
        Ok(n)
    }
}

impl<R, F> fmt::Debug for ProgressReader<R, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressReader")
            .field("current", &self.current)
            .field("total", &self.total)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Cancellable
// ---------------------------------------------------------------------------

/// Marker carried inside the `io::Error` produced when a read is cancelled.
#[derive(Debug)]
pub(crate) struct ReadCancelled;

impl fmt::Display for ReadCancelled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("read cancelled")
    }
}

impl std::error::Error for ReadCancelled {}

/// Fails every read once the token has been cancelled.
#[derive(Debug)]
pub(crate) struct Cancellable<R> {
    inner: R,
    cancel: CancellationToken,
}

impl<R> Cancellable<R> {
    pub(crate) fn new(inner: R, cancel: CancellationToken) -> Self {
        Self { inner, cancel }
    }
}

impl<R: Read> Read for Cancellable<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.cancel.is_cancelled() {
            return Err(io::Error::other(ReadCancelled));
        }
        self.inner.read(buf)
    }
}

/// Map an I/O error to [`ScryfallError::Cancelled`] if it came from a
/// cancelled read, or to [`ScryfallError::Io`] otherwise.
pub(crate) fn classify_io(err: io::Error) -> ScryfallError {
    if err
        .get_ref()
        .is_some_and(|inner| inner.is::<ReadCancelled>())
    {
        ScryfallError::Cancelled
    } else {
        ScryfallError::Io(err)
    }
}
