//
// Copyright 2017-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

use crate::{CodecError, UnescapeState, Unescaper};
use pin_project_lite::pin_project;
use std::pin::Pin;
use std::task::{Context, Poll, ready};
use tokio::io::{self, AsyncRead, ReadBuf};
use tracing::trace;

pin_project! {
    /// An [`AsyncRead`] adapter that unescapes Telnet data.
    ///
    /// Every read performs one read on the wrapped source into a scratch buffer the size of
    /// the caller's remaining space, then runs the bytes through an [`Unescaper`]. Commands
    /// (`IAC WILL/WONT/DO/DONT <option>`, `IAC SB ... IAC SE`) are dropped and `IAC IAC`
    /// becomes a single 255, so callers must only trust the number of bytes actually filled.
    ///
    /// A chunk made up entirely of commands would look like end-of-stream to `AsyncRead`
    /// users, so in that case the reader goes back to the source instead of returning an
    /// empty read.
    ///
    /// Malformed command sequences surface as an [`io::Error`] of kind
    /// [`InvalidData`](io::ErrorKind::InvalidData) wrapping a [`CodecError`]. Data that
    /// preceded the malformation in the same chunk is returned first and the error on the
    /// next call; bytes after it in that chunk are dropped. The reader stays usable either
    /// way.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use iacnet_codec::DataReader;
    /// use tokio::io::AsyncReadExt;
    ///
    /// # async fn example() -> std::io::Result<()> {
    /// let raw: &[u8] = &[b'h', b'i', 255, 253, 1, 255, 255];
    /// let mut reader = DataReader::new(raw);
    /// let mut data = Vec::new();
    /// reader.read_to_end(&mut data).await?;
    /// assert_eq!(data, vec![b'h', b'i', 255]);
    /// # Ok(())
    /// # }
    /// ```
    #[derive(Debug)]
    pub struct DataReader<R> {
        #[pin]
        inner: R,
        unescaper: Unescaper,
        scratch: Vec<u8>,
        pending_error: Option<CodecError>,
    }
}

impl<R> DataReader<R> {
    /// Wrap a raw Telnet byte source.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            unescaper: Unescaper::new(),
            scratch: Vec::new(),
            pending_error: None,
        }
    }

    /// Current unescape state.
    pub fn state(&self) -> UnescapeState {
        self.unescaper.state()
    }

    /// Borrow the wrapped source.
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Mutably borrow the wrapped source.
    ///
    /// Reading from it directly bypasses the unescaper and will confuse its state.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    /// Unwrap the source, discarding the unescape state.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: AsyncRead> AsyncRead for DataReader<R> {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let mut this = self.project();

        if let Some(error) = this.pending_error.take() {
            return Poll::Ready(Err(error.into()));
        }
        let want = buf.remaining();
        if want == 0 {
            return Poll::Ready(Ok(()));
        }

        loop {
            this.scratch.resize(want, 0);
            let n = {
                let mut raw = ReadBuf::new(&mut this.scratch[..want]);
                ready!(this.inner.as_mut().poll_read(cx, &mut raw))?;
                raw.filled().len()
            };
            if n == 0 {
                return Poll::Ready(Ok(()));
            }

            let result = this
                .unescaper
                .unescape(&this.scratch[..n], buf.initialize_unfilled_to(n));
            buf.advance(result.written);

            match result.error {
                Some(error) if result.written == 0 => {
                    trace!(%error, "malformed telnet command");
                    return Poll::Ready(Err(error.into()));
                }
                Some(error) => {
                    trace!(%error, "malformed telnet command after data");
                    *this.pending_error = Some(error);
                    return Poll::Ready(Ok(()));
                }
                None if result.written > 0 => return Poll::Ready(Ok(())),
                None => trace!(read = n, "chunk held only telnet commands"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{IAC, SB, SE, WILL};
    use tokio::io::AsyncReadExt;

    #[tokio::test]
    async fn test_reader_strips_commands() {
        let raw: &[u8] = &[b'C', IAC, WILL, 24, b'D'];
        let mut reader = DataReader::new(raw);
        let mut out = Vec::new();
        reader.read_to_end(&mut out).await.unwrap();
        assert_eq!(out, b"CD");
    }

    #[tokio::test]
    async fn test_reader_command_only_stream_is_empty() {
        let raw: &[u8] = &[IAC, SB, 24, 1, IAC, SE];
        let mut reader = DataReader::new(raw);
        let mut out = Vec::new();
        assert_eq!(reader.read_to_end(&mut out).await.unwrap(), 0);
        assert!(out.is_empty());
        assert_eq!(reader.state(), UnescapeState::CopyData);
    }

    #[tokio::test]
    async fn test_reader_reports_malformation_after_data() {
        let raw: &[u8] = &[b'o', b'k', IAC, 0x10, b'x'];
        let mut reader = DataReader::new(raw);
        let mut buf = [0u8; 16];

        let n = reader.read(&mut buf).await.unwrap();
        assert_eq!(&buf[..n], b"ok");

        let err = reader.read(&mut buf).await.unwrap_err();
        assert_eq!(
            CodecError::from_io(&err),
            Some(&CodecError::ExpectedCommand { found: 0x10 })
        );

        // Rest of the malformed chunk is gone; the stream is at its end.
        assert_eq!(reader.read(&mut buf).await.unwrap(), 0);
    }
}
