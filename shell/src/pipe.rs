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

//! In-memory byte pipes connecting commands to a session

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, AsyncWrite, DuplexStream, ReadBuf};

/// Bytes a pipe buffers before writers have to wait
pub const DEFAULT_PIPE_CAPACITY: usize = 4096;

/// Create a pipe with the default capacity.
///
/// Dropping the writer makes the reader see end-of-stream once buffered bytes are read.
/// Dropping the reader makes further writes fail with `BrokenPipe`.
pub fn pipe() -> (PipeWriter, PipeReader) {
    pipe_with_capacity(DEFAULT_PIPE_CAPACITY)
}

/// Create a pipe that buffers at most `capacity` bytes
pub fn pipe_with_capacity(capacity: usize) -> (PipeWriter, PipeReader) {
    let (write_end, read_end) = tokio::io::duplex(capacity);
    (PipeWriter(write_end), PipeReader(read_end))
}

/// Writing end of a [`pipe`]
#[derive(Debug)]
pub struct PipeWriter(DuplexStream);

/// Reading end of a [`pipe`]
#[derive(Debug)]
pub struct PipeReader(DuplexStream);

impl AsyncWrite for PipeWriter {
    fn poll_write(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        Pin::new(&mut self.0).poll_write(cx, buf)
    }

    fn poll_flush(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.0).poll_flush(cx)
    }

    fn poll_shutdown(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.0).poll_shutdown(cx)
    }
}

impl AsyncRead for PipeReader {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Pin::new(&mut self.0).poll_read(cx, buf)
    }
}
