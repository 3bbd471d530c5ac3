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

//! Telnet client connection

use crate::{Caller, ClientConfig, ClientError, Result};
use iacnet_service::{Connection, ConnectionId, Context};
use std::io;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::task::Poll;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, ReadBuf};
use tokio::net::TcpStream;
use tracing::{debug, info, instrument};

static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

/// A connected Telnet client.
///
/// Reading yields server data with commands removed; writing escapes IAC bytes. Writes are
/// buffered by the codec until flushed.
///
/// # Example
///
/// ```no_run
/// use iacnet_client::Client;
/// use tokio::io::AsyncWriteExt;
///
/// # async fn example() -> iacnet_client::Result<()> {
/// let mut client = Client::dial_to("127.0.0.1:2323").await?;
/// client.write_all(b"help\r\n").await?;
/// client.flush().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Client {
    connection: Connection<TcpStream>,
    ctx: Context,
    local_addr: SocketAddr,
}

impl Client {
    /// Connect to the Telnet port on the loopback address
    pub async fn dial() -> Result<Self> {
        Self::connect(&ClientConfig::default()).await
    }

    /// Connect to `address` (`host:port`); an empty address means [`Client::dial`]
    pub async fn dial_to(address: &str) -> Result<Self> {
        if address.is_empty() {
            return Self::dial().await;
        }
        Self::connect_to(address, false).await
    }

    /// Connect using a full configuration
    pub async fn connect(config: &ClientConfig) -> Result<Self> {
        Self::connect_to(&config.address(), config.nodelay).await
    }

    #[instrument(level = "debug", skip(nodelay))]
    async fn connect_to(address: &str, nodelay: bool) -> Result<Self> {
        let stream = TcpStream::connect(address)
            .await
            .map_err(|source| ClientError::Connect {
                address: address.to_string(),
                source,
            })?;
        if nodelay {
            stream.set_nodelay(true)?;
        }

        let local_addr = stream.local_addr()?;
        let peer_addr = stream.peer_addr()?;
        let id = ConnectionId::new(NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed));
        info!("Connection {} established to {}", id, peer_addr);

        Ok(Self {
            connection: Connection::new(stream),
            ctx: Context::new(id).with_peer_addr(peer_addr),
            local_addr,
        })
    }

    /// Local socket address
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Remote socket address
    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.ctx.peer_addr()
    }

    /// Connection context handed to callers
    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// Hand the connection to `caller` and flush whatever it left buffered
    pub async fn call(&mut self, caller: &dyn Caller) -> Result<()> {
        let ctx = self.ctx.clone();
        let (writer, reader) = self.connection.parts_mut();
        caller.call(&ctx, &mut *writer, &mut *reader).await;
        writer.flush().await?;
        Ok(())
    }

    /// Shut down the write side of the connection
    pub async fn close(&mut self) -> Result<()> {
        debug!("Closing connection {}", self.ctx.id());
        self.connection.shutdown().await?;
        Ok(())
    }

    /// Unwrap into the codec-wrapped connection
    pub fn into_connection(self) -> Connection<TcpStream> {
        self.connection
    }
}

impl AsyncRead for Client {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Pin::new(&mut self.connection).poll_read(cx, buf)
    }
}

impl AsyncWrite for Client {
    fn poll_write(
        mut self: Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        Pin::new(&mut self.connection).poll_write(cx, buf)
    }

    fn poll_flush(
        mut self: Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
    ) -> Poll<io::Result<()>> {
        Pin::new(&mut self.connection).poll_flush(cx)
    }

    fn poll_shutdown(
        mut self: Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
    ) -> Poll<io::Result<()>> {
        Pin::new(&mut self.connection).poll_shutdown(cx)
    }
}

/// Connect to `address` and run `caller` on the connection
pub async fn dial_to_and_call(address: &str, caller: &dyn Caller) -> Result<()> {
    let mut client = Client::dial_to(address).await?;
    client.call(caller).await
}

/// Connect to the local Telnet port and run `caller` on the connection
pub async fn dial_and_call(caller: &dyn Caller) -> Result<()> {
    let mut client = Client::dial().await?;
    client.call(caller).await
}
