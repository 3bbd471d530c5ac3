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

//! # iacnet Telnet Client
//!
//! Dials a Telnet server and wraps the connection in the data codec. Programs either use
//! [`Client`] directly as an `AsyncRead + AsyncWrite` of application data, or hand the
//! connection to a [`Caller`]. [`StandardCaller`] connects the local terminal.
//!
//! ```no_run
//! use iacnet_client::{StandardCaller, dial_to_and_call};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     dial_to_and_call("127.0.0.1:2323", &StandardCaller).await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs, future_incompatible, rust_2018_idioms)]

mod caller;
mod client;
mod config;
mod error;

pub use caller::{Caller, DataSink, DataSource, StandardCaller};
pub use client::{Client, dial_and_call, dial_to_and_call};
pub use config::ClientConfig;
pub use error::{ClientError, Result};
