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

//! Integration tests for iacnet-service
//!
//! Each test binds its own ephemeral listener and drives the server over real TCP.

use async_trait::async_trait;
use iacnet_service::{
    Connection, Context, Handler, RawReader, RawWriter, Server, ServerConfig, serve,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

async fn spawn_server(handler: Option<Arc<dyn Handler>>) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(serve(listener, handler));
    address
}

struct Banner {
    served: AtomicUsize,
}

#[async_trait]
impl Handler for Banner {
    async fn serve(&self, ctx: &Context, writer: &mut RawWriter<'_>, _reader: &mut RawReader<'_>) {
        self.served.fetch_add(1, Ordering::SeqCst);
        let line = format!("hello {}\r\n", ctx.id());
        writer.write_all(line.as_bytes()).await.unwrap();
    }
}

#[tokio::test]
async fn test_default_handler_echoes() {
    let address = spawn_server(None).await;
    let mut stream = TcpStream::connect(address).await.unwrap();

    stream
        .write_all(&[b'p', 255, 253, 24, b'i', 255, 255, b'n', b'g'])
        .await
        .unwrap();
    stream.shutdown().await.unwrap();

    let mut echoed = Vec::new();
    stream.read_to_end(&mut echoed).await.unwrap();
    assert_eq!(echoed, vec![b'p', b'i', 255, 255, b'n', b'g']);
}

#[tokio::test]
async fn test_connection_closed_after_handler_returns() {
    let handler = Arc::new(Banner {
        served: AtomicUsize::new(0),
    });
    let address = spawn_server(Some(handler.clone())).await;

    let mut stream = TcpStream::connect(address).await.unwrap();
    let mut received = String::new();
    stream.read_to_string(&mut received).await.unwrap();

    assert!(received.starts_with("hello conn-"));
    assert!(received.ends_with("\r\n"));
    assert_eq!(handler.served.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_each_connection_gets_its_own_task() {
    let handler = Arc::new(Banner {
        served: AtomicUsize::new(0),
    });
    let address = spawn_server(Some(handler.clone())).await;

    let mut tasks = Vec::new();
    for _ in 0..8 {
        tasks.push(tokio::spawn(async move {
            let mut stream = TcpStream::connect(address).await.unwrap();
            let mut received = String::new();
            stream.read_to_string(&mut received).await.unwrap();
            received
        }));
    }

    let mut greetings = Vec::new();
    for task in tasks {
        greetings.push(task.await.unwrap());
    }
    greetings.sort();
    greetings.dedup();

    assert_eq!(greetings.len(), 8);
    assert_eq!(handler.served.load(Ordering::SeqCst), 8);
}

#[tokio::test]
async fn test_server_metrics_track_connections() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    let server = Arc::new(Server::new(ServerConfig::new(address).with_nodelay(true)));

    let running = server.clone();
    tokio::spawn(async move { running.serve(listener).await });

    for _ in 0..3 {
        let mut stream = TcpStream::connect(address).await.unwrap();
        stream.shutdown().await.unwrap();
        let mut rest = Vec::new();
        stream.read_to_end(&mut rest).await.unwrap();
    }

    let metrics = server.metrics();
    for _ in 0..50 {
        if metrics.snapshot().closed_connections == 3 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    let snapshot = metrics.snapshot();
    assert_eq!(snapshot.total_connections, 3);
    assert_eq!(snapshot.closed_connections, 3);
    assert_eq!(snapshot.active_connections, 0);
}

struct Panicking;

#[async_trait]
impl Handler for Panicking {
    async fn serve(
        &self,
        _ctx: &Context,
        _writer: &mut RawWriter<'_>,
        _reader: &mut RawReader<'_>,
    ) {
        panic!("handler gave up");
    }
}

#[tokio::test]
async fn test_panicking_handler_still_closes_connection() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    let config = ServerConfig::new(address);
    let server = Arc::new(Server::with_handler(config, Arc::new(Panicking)));

    let running = server.clone();
    tokio::spawn(async move { running.serve(listener).await });

    let mut stream = TcpStream::connect(address).await.unwrap();
    let mut rest = Vec::new();
    // The peer may see a clean close or a reset.
    let _ = stream.read_to_end(&mut rest).await;
    assert!(rest.is_empty());

    let metrics = server.metrics();
    for _ in 0..50 {
        if metrics.snapshot().closed_connections == 1 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    let snapshot = metrics.snapshot();
    assert_eq!(snapshot.total_connections, 1);
    assert_eq!(snapshot.closed_connections, 1);
    assert_eq!(snapshot.active_connections, 0);
}

#[tokio::test]
async fn test_connection_wrapper_over_tcp() {
    let address = spawn_server(None).await;
    let stream = TcpStream::connect(address).await.unwrap();
    let mut connection = Connection::new(stream);

    connection.write_all(&[0, 255, 1]).await.unwrap();
    connection.flush().await.unwrap();

    let mut echoed = [0u8; 3];
    connection.read_exact(&mut echoed).await.unwrap();
    assert_eq!(echoed, [0, 255, 1]);
}
