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

use crate::consts::IAC;
use bytes::{Buf, BufMut, BytesMut};
use pin_project_lite::pin_project;
use std::pin::Pin;
use std::task::{Context, Poll, ready};
use tokio::io::{self, AsyncWrite};

/// Escape `data` for transmission as Telnet data, doubling every IAC byte.
///
/// ```
/// use iacnet_codec::escape;
///
/// assert_eq!(&escape(&[1, 255, 2])[..], &[1, 255, 255, 2]);
/// ```
pub fn escape(data: &[u8]) -> BytesMut {
    let mut dst = BytesMut::new();
    escape_into(data, &mut dst);
    dst
}

/// Append the escaped form of `data` to `dst`.
pub fn escape_into(data: &[u8], dst: &mut BytesMut) {
    let escapes = data.iter().filter(|&&b| b == IAC).count();
    dst.reserve(data.len() + escapes);
    for (i, run) in data.split(|&b| b == IAC).enumerate() {
        if i > 0 {
            dst.put_slice(&[IAC, IAC]);
        }
        dst.put_slice(run);
    }
}

pin_project! {
    /// An [`AsyncWrite`] adapter that escapes Telnet data.
    ///
    /// Each write doubles every 255 byte and reports the full length of the caller's
    /// buffer as written. Escaped bytes the sink did not take immediately are kept and
    /// pushed out before the next write, on flush and on shutdown, so callers should
    /// flush when they want data on the wire. The first error from the sink is returned
    /// as-is.
    #[derive(Debug)]
    pub struct DataWriter<W> {
        #[pin]
        inner: W,
        buffer: BytesMut,
    }
}

impl<W> DataWriter<W> {
    /// Wrap a raw Telnet byte sink.
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            buffer: BytesMut::new(),
        }
    }

    /// Borrow the wrapped sink.
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Mutably borrow the wrapped sink.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    /// Unwrap the sink. Escaped bytes not yet written are lost.
    pub fn into_inner(self) -> W {
        self.inner
    }

    /// Escaped bytes waiting for the sink.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }
}

impl<W: AsyncWrite> DataWriter<W> {
    fn poll_drain(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        let mut this = self.project();
        while !this.buffer.is_empty() {
            let n = ready!(this.inner.as_mut().poll_write(cx, &this.buffer[..]))?;
            if n == 0 {
                return Poll::Ready(Err(io::Error::new(
                    io::ErrorKind::WriteZero,
                    "failed to write escaped telnet data",
                )));
            }
            this.buffer.advance(n);
        }
        Poll::Ready(Ok(()))
    }
}

impl<W: AsyncWrite> AsyncWrite for DataWriter<W> {
    fn poll_write(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        ready!(self.as_mut().poll_drain(cx))?;
        if buf.is_empty() {
            return Poll::Ready(Ok(0));
        }
        escape_into(buf, self.as_mut().project().buffer);

        // Push as much as the sink takes now; the rest goes out on the next write or flush.
        match self.poll_drain(cx) {
            Poll::Ready(Err(error)) => Poll::Ready(Err(error)),
            _ => Poll::Ready(Ok(buf.len())),
        }
    }

    fn poll_flush(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        ready!(self.as_mut().poll_drain(cx))?;
        self.project().inner.poll_flush(cx)
    }

    fn poll_shutdown(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        ready!(self.as_mut().poll_drain(cx))?;
        self.project().inner.poll_shutdown(cx)
    }
}
