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

//! # iacnet Shell
//!
//! A line-oriented command shell that runs as an [`iacnet_service::Handler`]. Commands are
//! registered by name on a [`ShellHandler`] as [`Producer`]s; each dispatched line asks
//! the producer for a fresh [`Command`], which runs with in-memory pipes standing in for
//! standard input, output and error.
//!
//! ```no_run
//! use iacnet_service::{Server, ServerConfig};
//! use iacnet_shell::{FnCommand, ShellHandler, producer_fn};
//! use std::sync::Arc;
//! use tokio::io::AsyncWriteExt;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let shell = ShellHandler::new().must_register(
//!         "echo",
//!         producer_fn(|_ctx, _name, args| {
//!             let line = format!("{}\r\n", args.join(" "));
//!             Some(Box::new(FnCommand::new(move |_stdin, mut stdout, _stderr| async move {
//!                 stdout.write_all(line.as_bytes()).await?;
//!                 Ok(())
//!             })))
//!         }),
//!     );
//!     shell.register("help", shell.help_producer());
//!
//!     let config = ServerConfig::new("0.0.0.0:2323".parse()?);
//!     let server = Server::with_handler(config, Arc::new(shell));
//!     server.listen_and_serve().await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs, future_incompatible, rust_2018_idioms)]

mod command;
mod config;
mod error;
mod handler;
mod help;
mod pipe;
mod producer;

pub use command::{Command, FnCommand, promote};
pub use config::{
    DEFAULT_EXIT_COMMAND_NAME, DEFAULT_EXIT_MESSAGE, DEFAULT_PROMPT, DEFAULT_WELCOME_MESSAGE,
    ShellConfig,
};
pub use error::{ShellError, ShellResult};
pub use handler::ShellHandler;
pub use help::{HelpProducer, help};
pub use iacnet_service::Context;
pub use pipe::{DEFAULT_PIPE_CAPACITY, PipeReader, PipeWriter, pipe, pipe_with_capacity};
pub use producer::{FnProducer, Producer, ProducerFn, producer_fn};
