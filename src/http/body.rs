//! Streaming file body
//!
//! Reads an open file in fixed-size chunks as hyper polls for frames, so a
//! transfer never holds more than one chunk in memory. Reads are paced by
//! the client: hyper only polls again once the previous chunk was written.

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use hyper::body::{Body, Bytes, Frame, SizeHint};
use tokio::fs::File;
use tokio::io::{AsyncRead, ReadBuf};

use crate::logger::{self, AccessLogEntry};

/// Bytes read from disk per frame
pub const CHUNK_SIZE: usize = 64 * 1024;

/// A response body backed by an open file.
///
/// Emits exactly `len` bytes (the advertised `Content-Length`). The file
/// handle is released when the transfer completes, fails, or the body is
/// dropped because the client went away.
pub struct FileBody {
    file: Option<File>,
    buf: Box<[u8]>,
    remaining: u64,
    sent: u64,
    /// Request path, for log lines
    path: String,
    access_log: Option<(AccessLogEntry, String)>,
}

impl FileBody {
    pub fn new(file: File, len: u64, path: impl Into<String>) -> Self {
        Self {
            file: Some(file),
            buf: vec![0; CHUNK_SIZE].into_boxed_slice(),
            remaining: len,
            sent: 0,
            path: path.into(),
            access_log: None,
        }
    }

    /// Emit `entry` in `format` once the last byte has been handed to hyper
    #[must_use]
    pub fn with_access_log(mut self, entry: AccessLogEntry, format: impl Into<String>) -> Self {
        self.access_log = Some((entry, format.into()));
        self
    }

    fn finish(&mut self) {
        self.file = None;
        if let Some((mut entry, format)) = self.access_log.take() {
            entry.body_bytes = self.sent;
            logger::log_access(&entry, &format);
        }
    }

    fn fail(&mut self, err: io::Error) -> io::Error {
        self.file = None;
        self.access_log = None;
        logger::log_stream_error(&self.path, &err);
        err
    }
}

impl Body for FileBody {
    type Data = Bytes;
    type Error = io::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        let this = self.get_mut();
        if this.remaining == 0 {
            this.finish();
            return Poll::Ready(None);
        }
        let Some(file) = this.file.as_mut() else {
            return Poll::Ready(None);
        };

        let want = usize::try_from(this.remaining).map_or(CHUNK_SIZE, |r| r.min(CHUNK_SIZE));
        let mut read_buf = ReadBuf::new(&mut this.buf[..want]);

        match Pin::new(file).poll_read(cx, &mut read_buf) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Err(e)) => Poll::Ready(Some(Err(this.fail(e)))),
            Poll::Ready(Ok(())) => {
                let n = read_buf.filled().len();
                if n == 0 {
                    let err = io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        format!("file ended {} bytes early", this.remaining),
                    );
                    return Poll::Ready(Some(Err(this.fail(err))));
                }

                let chunk = Bytes::copy_from_slice(read_buf.filled());
                this.remaining -= n as u64;
                this.sent += n as u64;
                if this.remaining == 0 {
                    this.finish();
                }
                Poll::Ready(Some(Ok(Frame::data(chunk))))
            }
        }
    }

    fn is_end_stream(&self) -> bool {
        self.remaining == 0
    }

    fn size_hint(&self) -> SizeHint {
        SizeHint::with_exact(self.remaining)
    }
}

impl Drop for FileBody {
    fn drop(&mut self) {
        if self.remaining == 0 {
            // Zero-length files may never be polled
            self.finish();
        } else if self.file.is_some() {
            logger::log_transfer_aborted(&self.path, self.sent, self.sent + self.remaining);
        }
    }
}
