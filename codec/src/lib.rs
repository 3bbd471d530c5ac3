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

//! # iacnet Telnet Data Codec
//!
//! Telnet shares one byte stream between application data and in-band commands. Byte 255
//! (IAC, "interpret as command") introduces a command, and a doubled `IAC IAC` stands for
//! a literal 255 in the data. This crate separates the two:
//!
//! - [`DataReader`] wraps an [`AsyncRead`](tokio::io::AsyncRead) carrying raw Telnet and
//!   yields only application data. `IAC WILL/WONT/DO/DONT <option>` and
//!   `IAC SB ... IAC SE` are parsed just far enough to be dropped; no option state is kept.
//! - [`DataWriter`] wraps an [`AsyncWrite`](tokio::io::AsyncWrite) and doubles every 255
//!   it is given.
//! - [`DataCodec`] offers the same transform as a `tokio_util` codec for `Framed` users.
//! - [`Unescaper`] and [`escape`] are the synchronous building blocks.
//!
//! The unescaper is resumable: a read may end in the middle of any command or
//! subnegotiation and the next read continues where it stopped. Only a state tag is kept
//! between reads.
//!
//! ## Example
//!
//! ```rust,no_run
//! use iacnet_codec::{DataReader, DataWriter};
//! use tokio::io::{AsyncReadExt, AsyncWriteExt};
//! use tokio::net::TcpStream;
//!
//! # async fn example() -> std::io::Result<()> {
//! let stream = TcpStream::connect("127.0.0.1:23").await?;
//! let (read_half, write_half) = stream.into_split();
//! let mut reader = DataReader::new(read_half);
//! let mut writer = DataWriter::new(write_half);
//!
//! writer.write_all(b"hello\r\n").await?;
//! writer.flush().await?;
//!
//! let mut buffer = [0u8; 1024];
//! let n = reader.read(&mut buffer).await?;
//! println!("{}", String::from_utf8_lossy(&buffer[..n]));
//! # Ok(())
//! # }
//! ```
//!
//! ## Subnegotiation payloads
//!
//! Inside `IAC SB ... IAC SE`, an IAC is taken as the possible start of `IAC SE` and
//! anything else after it as more payload. `IAC IAC` is therefore not read as an escaped
//! 255 there; an `IAC IAC SE` inside a subnegotiation does not end it.

#![warn(missing_docs, future_incompatible, rust_2018_idioms)]

pub mod consts;
mod framed;
mod machine;
mod reader;
mod result;
mod writer;

pub use self::framed::DataCodec;
pub use self::machine::{UnescapeState, Unescaped, Unescaper};
pub use self::reader::DataReader;
pub use self::result::CodecError;
pub use self::writer::{DataWriter, escape, escape_into};
