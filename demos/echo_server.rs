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

//! Echo Server Example
//!
//! Accepts telnet connections and echoes back every data byte it receives.
//! Telnet negotiation sent by the client is stripped on the way in and any
//! 0xFF data byte is escaped on the way out.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p iacnet-service --example echo_server -- 127.0.0.1:2323
//! telnet localhost 2323
//! ```

use iacnet_service::{Server, ServerConfig};
use std::net::SocketAddr;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing for logging
    tracing_subscriber::fmt::init();

    let address: SocketAddr = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "127.0.0.1:2323".to_string())
        .parse()?;

    let server = Server::new(ServerConfig::new(address));

    println!("Starting echo server on {}", address);
    println!("Press Ctrl+C to stop the server\n");

    tokio::select! {
        result = server.listen_and_serve() => result?,
        _ = tokio::signal::ctrl_c() => println!("\nShutting down server..."),
    }

    let snapshot = server.metrics().snapshot();
    println!(
        "Served {} connections ({} accept errors)",
        snapshot.total_connections, snapshot.accept_errors
    );

    Ok(())
}
