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

//! Shell Server Example
//!
//! Serves a small line-oriented shell over telnet with a handful of commands:
//!
//! - `echo <words>` writes its arguments back
//! - `whoami` prints the connection identifier
//! - `fail` reports an error on stderr
//! - `help` lists every registered command
//! - `exit` closes the session
//!
//! Anything else falls through to a fallback that reports the unknown command.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p iacnet-shell --example shell_server -- 127.0.0.1:2323
//! telnet localhost 2323
//! ```

use iacnet_service::{Server, ServerConfig};
use iacnet_shell::{FnCommand, ShellConfig, ShellError, ShellHandler, help, producer_fn};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let address: SocketAddr = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "127.0.0.1:2323".to_string())
        .parse()?;

    let shell = ShellHandler::with_config(
        ShellConfig::default()
            .with_prompt("iacnet> ")
            .with_welcome_message("Welcome to the iacnet shell. Type 'help' for commands.\r\n"),
    )
    .must_register(
        "echo",
        producer_fn(|_ctx, _name, args| {
            let line = format!("{}\r\n", args.join(" "));
            Some(Box::new(FnCommand::new(move |_stdin, mut stdout, _stderr| async move {
                stdout.write_all(line.as_bytes()).await?;
                Ok(())
            })))
        }),
    )
    .must_register(
        "whoami",
        producer_fn(|ctx, _name, _args| {
            let line = format!("{}\r\n", ctx.id());
            Some(Box::new(FnCommand::new(move |_stdin, mut stdout, _stderr| async move {
                stdout.write_all(line.as_bytes()).await?;
                Ok(())
            })))
        }),
    )
    .must_register(
        "fail",
        producer_fn(|_ctx, _name, _args| {
            Some(Box::new(FnCommand::new(|_stdin, _stdout, mut stderr| async move {
                stderr.write_all(b"fail: this command always fails\r\n").await?;
                Err(ShellError::command("requested failure"))
            })))
        }),
    )
    .must_register_else(producer_fn(|_ctx, name, _args| {
        let line = format!("{}: command not found\r\n", name);
        Some(Box::new(FnCommand::new(move |_stdin, _stdout, mut stderr| async move {
            stderr.write_all(line.as_bytes()).await?;
            Ok(())
        })))
    }));
    shell.register("help", help(&shell));

    let server = Server::with_handler(ServerConfig::new(address), Arc::new(shell));

    println!("Starting shell server on {}", address);
    println!("Press Ctrl+C to stop the server\n");

    tokio::select! {
        result = server.listen_and_serve() => result?,
        _ = tokio::signal::ctrl_c() => println!("\nShutting down server..."),
    }

    Ok(())
}
