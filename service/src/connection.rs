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

//! Codec-wrapped connection
//!
//! [`Connection`] splits a raw Telnet transport and wraps each half in the data codec, so
//! reads produce unescaped application bytes and writes are escaped on the way out.

use iacnet_codec::{DataReader, DataWriter};
use pin_project_lite::pin_project;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf, ReadHalf, WriteHalf};

pin_project! {
    /// A Telnet transport carrying clean application data.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use iacnet_service::Connection;
    /// use tokio::io::AsyncWriteExt;
    /// use tokio::net::TcpStream;
    ///
    /// # async fn example() -> std::io::Result<()> {
    /// let stream = TcpStream::connect("127.0.0.1:23").await?;
    /// let mut connection = Connection::new(stream);
    /// connection.write_all(b"look\r\n").await?;
    /// connection.flush().await?;
    /// # Ok(())
    /// # }
    /// ```
    #[derive(Debug)]
    pub struct Connection<S> {
        #[pin]
        reader: DataReader<ReadHalf<S>>,
        #[pin]
        writer: DataWriter<WriteHalf<S>>,
        bytes_received: u64,
        bytes_sent: u64,
    }
}

impl<S: AsyncRead + AsyncWrite> Connection<S> {
    /// Wrap a raw transport
    pub fn new(stream: S) -> Self {
        let (read_half, write_half) = tokio::io::split(stream);
        Self {
            reader: DataReader::new(read_half),
            writer: DataWriter::new(write_half),
            bytes_received: 0,
            bytes_sent: 0,
        }
    }
}

impl<S> Connection<S> {
    /// Split into the decoding reader and the escaping writer
    pub fn split(self) -> (DataReader<ReadHalf<S>>, DataWriter<WriteHalf<S>>) {
        (self.reader, self.writer)
    }

    /// Borrow both halves at once, writer first
    pub fn parts_mut(&mut self) -> (&mut DataWriter<WriteHalf<S>>, &mut DataReader<ReadHalf<S>>) {
        (&mut self.writer, &mut self.reader)
    }

    /// Get the decoding reader
    pub fn reader_mut(&mut self) -> &mut DataReader<ReadHalf<S>> {
        &mut self.reader
    }

    /// Get the escaping writer
    pub fn writer_mut(&mut self) -> &mut DataWriter<WriteHalf<S>> {
        &mut self.writer
    }

    /// Application bytes read so far
    pub fn bytes_received(&self) -> u64 {
        self.bytes_received
    }

    /// Application bytes accepted for writing so far
    pub fn bytes_sent(&self) -> u64 {
        self.bytes_sent
    }
}

impl<S: Unpin> Connection<S> {
    /// Reassemble the raw transport.
    ///
    /// Escaped bytes still buffered in the writer are lost; flush first.
    pub fn into_inner(self) -> S {
        self.reader.into_inner().unsplit(self.writer.into_inner())
    }
}

impl<S: AsyncRead> AsyncRead for Connection<S> {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.project();
        let before = buf.filled().len();
        let result = this.reader.poll_read(cx, buf);
        if let Poll::Ready(Ok(())) = result {
            *this.bytes_received += (buf.filled().len() - before) as u64;
        }
        result
    }
}

impl<S: AsyncWrite> AsyncWrite for Connection<S> {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        let this = self.project();
        let result = this.writer.poll_write(cx, buf);
        if let Poll::Ready(Ok(n)) = result {
            *this.bytes_sent += n as u64;
        }
        result
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        self.project().writer.poll_flush(cx)
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        self.project().writer.poll_shutdown(cx)
    }
}
