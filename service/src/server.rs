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

//! Telnet server implementation
//!
//! The server owns a listener, accepts connections and runs the configured [`Handler`] for
//! each one on its own task.

use crate::{
    ConnectionId, Context, EchoHandler, Handler, Result, ServerConfig, ServerMetrics,
    ServiceError,
};
use ::metrics::{counter, gauge};
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, error, info, instrument};

/// Telnet server
///
/// # Example
///
/// ```no_run
/// use iacnet_service::{Server, ServerConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let server = Server::new(ServerConfig::new("127.0.0.1:2323".parse()?));
///     server.listen_and_serve().await?;
///     Ok(())
/// }
/// ```
pub struct Server {
    config: ServerConfig,
    handler: Arc<dyn Handler>,
    metrics: Arc<ServerMetrics>,
    next_id: AtomicU64,
}

impl Server {
    /// Create a server that echoes everything back
    pub fn new(config: ServerConfig) -> Self {
        Self::with_handler(config, Arc::new(EchoHandler))
    }

    /// Create a server running `handler` for every connection
    pub fn with_handler(config: ServerConfig, handler: Arc<dyn Handler>) -> Self {
        Self {
            config,
            handler,
            metrics: Arc::new(ServerMetrics::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Get the server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Get the server metrics
    pub fn metrics(&self) -> Arc<ServerMetrics> {
        self.metrics.clone()
    }

    /// Bind the configured address and serve connections on it.
    ///
    /// Only returns on failure.
    pub async fn listen_and_serve(&self) -> Result<()> {
        let address = self.config.bind_address;
        let listener = TcpListener::bind(address)
            .await
            .map_err(|source| ServiceError::Bind { address, source })?;
        self.serve(listener).await
    }

    /// Accept connections from `listener` until accepting fails.
    ///
    /// Each connection runs on its own task; the transport is shut down and dropped once the
    /// handler returns, however it returns. The accept error that ends the loop is handed
    /// back to the caller.
    pub async fn serve(&self, listener: TcpListener) -> Result<()> {
        if let Ok(local) = listener.local_addr() {
            info!("Telnet server listening on {}", local);
        }

        loop {
            let (socket, peer_addr) = match listener.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    error!("Failed to accept connection: {}", e);
                    self.metrics.accept_error();
                    return Err(ServiceError::Accept(e));
                }
            };

            if self.config.nodelay {
                if let Err(e) = socket.set_nodelay(true) {
                    debug!("Failed to set TCP_NODELAY for {}: {}", peer_addr, e);
                }
            }

            let id = ConnectionId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
            let ctx = Context::new(id).with_peer_addr(peer_addr);
            debug!("Accepted connection {} from {}", id, peer_addr);

            self.metrics.connection_opened();
            counter!("iacnet.connections.total").increment(1);
            gauge!("iacnet.connections.active").increment(1.0);

            tokio::spawn(handle_connection(
                self.handler.clone(),
                self.metrics.clone(),
                ctx,
                socket,
            ));
        }
    }
}

impl std::fmt::Debug for Server {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Server")
            .field("config", &self.config)
            .field("metrics", &self.metrics.snapshot())
            .finish()
    }
}

/// Closes the connection's books when its task ends, including by panic.
struct ConnectionGuard {
    metrics: Arc<ServerMetrics>,
    started: Instant,
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        let elapsed = self.started.elapsed();
        self.metrics.connection_closed(elapsed);
        counter!("iacnet.connections.closed").increment(1);
        gauge!("iacnet.connections.active").decrement(1.0);
        debug!("Connection closed after {:?}", elapsed);
    }
}

#[instrument(skip_all, fields(connection_id = %ctx.id()))]
async fn handle_connection(
    handler: Arc<dyn Handler>,
    metrics: Arc<ServerMetrics>,
    ctx: Context,
    socket: TcpStream,
) {
    let _guard = ConnectionGuard {
        metrics,
        started: Instant::now(),
    };
    let (mut read_half, mut write_half) = socket.into_split();

    handler.serve(&ctx, &mut write_half, &mut read_half).await;

    if let Err(e) = write_half.shutdown().await {
        debug!("Shutdown after handler failed: {}", e);
    }
}

/// Bind `address` and serve connections with `handler`, or echo when `handler` is `None`.
pub async fn listen_and_serve(
    address: SocketAddr,
    handler: Option<Arc<dyn Handler>>,
) -> Result<()> {
    server_for(ServerConfig::new(address), handler)
        .listen_and_serve()
        .await
}

/// Serve connections from an existing listener with `handler`, or echo when `handler` is
/// `None`.
pub async fn serve(listener: TcpListener, handler: Option<Arc<dyn Handler>>) -> Result<()> {
    let config = match listener.local_addr() {
        Ok(address) => ServerConfig::new(address),
        Err(_) => ServerConfig::default(),
    };
    server_for(config, handler).serve(listener).await
}

fn server_for(config: ServerConfig, handler: Option<Arc<dyn Handler>>) -> Server {
    match handler {
        Some(handler) => Server::with_handler(config, handler),
        None => Server::new(config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;
    use tracing_test::traced_test;

    #[tokio::test]
    async fn test_bind_failure_is_reported() {
        let occupied = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = occupied.local_addr().unwrap();

        let server = Server::new(ServerConfig::new(address));
        let err = server.listen_and_serve().await.unwrap_err();
        assert!(err.is_bind_error());
    }

    #[test]
    fn test_default_handler_is_echo() {
        let server = Server::new(ServerConfig::default());
        assert_eq!(server.metrics().total_connections(), 0);
        assert_eq!(server.config().bind_address.port(), 23);
    }

    #[tokio::test]
    #[traced_test]
    async fn test_accepted_connection_is_logged() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        let server = Server::new(ServerConfig::new(address));

        let client = async {
            let mut stream = TcpStream::connect(address).await.unwrap();
            stream.shutdown().await.unwrap();
            let mut rest = Vec::new();
            stream.read_to_end(&mut rest).await.unwrap();
        };
        tokio::select! {
            result = server.serve(listener) => panic!("server stopped: {:?}", result),
            () = client => {}
        }

        assert!(logs_contain("Accepted connection conn-1"));
        assert_eq!(server.metrics().total_connections(), 1);
    }
}
