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

//! Caller contract and the standard terminal caller

use async_trait::async_trait;
use iacnet_codec::CodecError;
use iacnet_service::Context;
use std::io;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, trace, warn};

/// Outbound data stream to the server; everything written is escaped.
pub type DataSink<'a> = dyn AsyncWrite + Send + Unpin + 'a;

/// Inbound data stream from the server with commands already removed.
pub type DataSource<'a> = dyn AsyncRead + Send + Unpin + 'a;

/// The client end of a Telnet connection.
///
/// A caller is the mirror image of a server-side
/// [`Handler`](iacnet_service::Handler), except that it receives streams that already
/// carry the data codec: bytes written to `writer` are escaped on the way out and bytes
/// read from `reader` are unescaped with commands stripped.
#[async_trait]
pub trait Caller: Send + Sync {
    /// Drive one connection until it is done.
    async fn call(&self, ctx: &Context, writer: &mut DataSink<'_>, reader: &mut DataSource<'_>);
}

/// Connects the local terminal to the server.
///
/// Standard input is sent line by line, each line terminated with `\r\n`, and server data
/// is written to standard output as it arrives. See [`StandardCaller::relay`] for the exact
/// rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardCaller;

impl StandardCaller {
    /// Relay between an arbitrary local input/output pair and a connection.
    ///
    /// Only complete lines are sent. A line is terminated by `\n`, optionally preceded by
    /// `\r`, and goes out as `line\r\n`; a fragment left without a terminator when `input`
    /// ends is dropped. Once `input` ends the write side of the connection is shut down.
    ///
    /// Returns when the server closes its side. A malformed command from the server is
    /// logged and skipped.
    pub async fn relay<I, O, W, R>(
        input: I,
        mut output: O,
        writer: &mut W,
        reader: &mut R,
    ) -> io::Result<()>
    where
        I: AsyncRead + Unpin,
        O: AsyncWrite + Unpin,
        W: AsyncWrite + Unpin + ?Sized,
        R: AsyncRead + Unpin + ?Sized,
    {
        let send = send_lines(input, writer);
        let receive = receive(reader, &mut output);
        tokio::pin!(send, receive);

        let mut sending = true;
        loop {
            tokio::select! {
                result = &mut send, if sending => {
                    sending = false;
                    match result {
                        Ok(lines) => debug!(lines, "local input finished"),
                        Err(error) => warn!(%error, "sending to server stopped"),
                    }
                }
                result = &mut receive => {
                    let bytes = result?;
                    debug!(bytes, "server closed the connection");
                    return Ok(());
                }
            }
        }
    }
}

#[async_trait]
impl Caller for StandardCaller {
    async fn call(&self, ctx: &Context, writer: &mut DataSink<'_>, reader: &mut DataSource<'_>) {
        let result =
            StandardCaller::relay(tokio::io::stdin(), tokio::io::stdout(), writer, reader).await;
        if let Err(error) = result {
            warn!(connection_id = %ctx.id(), %error, "terminal relay failed");
        }
    }
}

async fn send_lines<I, W>(input: I, writer: &mut W) -> io::Result<u64>
where
    I: AsyncRead + Unpin,
    W: AsyncWrite + Unpin + ?Sized,
{
    let mut input = BufReader::new(input);
    let mut line = Vec::new();
    let mut sent = 0;

    loop {
        line.clear();
        input.read_until(b'\n', &mut line).await?;
        if line.last() != Some(&b'\n') {
            if !line.is_empty() {
                trace!(bytes = line.len(), "dropping unterminated input");
            }
            writer.shutdown().await?;
            return Ok(sent);
        }

        line.pop();
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        line.extend_from_slice(b"\r\n");
        writer.write_all(&line).await?;
        writer.flush().await?;
        sent += 1;
    }
}

async fn receive<R, O>(reader: &mut R, output: &mut O) -> io::Result<u64>
where
    R: AsyncRead + Unpin + ?Sized,
    O: AsyncWrite + Unpin,
{
    let mut buffer = vec![0u8; 4096];
    let mut total = 0;

    loop {
        let n = match reader.read(&mut buffer).await {
            Ok(0) => {
                output.flush().await?;
                return Ok(total);
            }
            Ok(n) => n,
            Err(error) if CodecError::is_protocol_error(&error) => {
                warn!(%error, "skipping malformed telnet command");
                continue;
            }
            Err(error) => return Err(error),
        };
        output.write_all(&buffer[..n]).await?;
        output.flush().await?;
        total += n as u64;
    }
}
