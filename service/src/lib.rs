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

//! # iacnet Telnet Service
//!
//! Server-side dispatch for Telnet. A [`Server`] accepts TCP connections and hands each
//! one to a [`Handler`] on its own Tokio task. Handlers receive the raw streams and pick
//! the codec layer they need; [`Connection`] bundles the usual choice, a
//! [`DataReader`](iacnet_codec::DataReader) and [`DataWriter`](iacnet_codec::DataWriter)
//! over the two halves of a transport.
//!
//! When no handler is given the server echoes.
//!
//! ```no_run
//! use iacnet_service::{EchoHandler, listen_and_serve};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     listen_and_serve("0.0.0.0:2323".parse()?, Some(Arc::new(EchoHandler))).await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs, future_incompatible, rust_2018_idioms)]

mod config;
mod connection;
mod error;
mod handler;
mod metrics;
mod server;
mod types;

pub use config::{ServerConfig, TELNET_PORT};
pub use connection::Connection;
pub use error::{Result, ServiceError};
pub use handler::{EchoHandler, Handler, RawReader, RawWriter};
pub use self::metrics::{MetricsSnapshot, ServerMetrics};
pub use server::{Server, listen_and_serve, serve};
pub use types::{ConnectionId, Context};
