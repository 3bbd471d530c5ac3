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

//! Handler contract and the echo handler

use crate::Context;
use async_trait::async_trait;
use iacnet_codec::{DataReader, DataWriter};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

/// Raw inbound half of a connection, still carrying Telnet commands and escapes.
pub type RawReader<'a> = dyn AsyncRead + Send + Unpin + 'a;

/// Raw outbound half of a connection; bytes are sent as given.
pub type RawWriter<'a> = dyn AsyncWrite + Send + Unpin + 'a;

/// Per-connection Telnet handler.
///
/// The server calls [`serve`](Handler::serve) once per accepted connection on that
/// connection's own task, and closes the transport when it returns. The streams are raw:
/// a handler that wants application data wraps them in [`DataReader`] and [`DataWriter`].
///
/// # Example
///
/// ```no_run
/// use iacnet_service::{Context, Handler, RawReader, RawWriter};
/// use async_trait::async_trait;
/// use tokio::io::AsyncWriteExt;
///
/// struct Banner;
///
/// #[async_trait]
/// impl Handler for Banner {
///     async fn serve(
///         &self,
///         _ctx: &Context,
///         writer: &mut RawWriter<'_>,
///         _reader: &mut RawReader<'_>,
///     ) {
///         let _ = writer.write_all(b"hello\r\n").await;
///     }
/// }
/// ```
#[async_trait]
pub trait Handler: Send + Sync + 'static {
    /// Serve one connection until it is done.
    async fn serve(&self, ctx: &Context, writer: &mut RawWriter<'_>, reader: &mut RawReader<'_>);
}

/// Copies everything the client sends straight back to it.
///
/// This is the handler a server uses when none is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoHandler;

#[async_trait]
impl Handler for EchoHandler {
    async fn serve(&self, ctx: &Context, writer: &mut RawWriter<'_>, reader: &mut RawReader<'_>) {
        let mut reader = DataReader::new(reader);
        let mut writer = DataWriter::new(writer);

        match tokio::io::copy(&mut reader, &mut writer).await {
            Ok(bytes) => debug!(connection_id = %ctx.id(), bytes, "echo finished"),
            Err(error) => warn!(connection_id = %ctx.id(), %error, "echo stopped"),
        }
        if let Err(error) = writer.flush().await {
            debug!(connection_id = %ctx.id(), %error, "echo flush failed");
        }
    }
}
