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

//! Telnet Client Example
//!
//! Connects to a telnet server and relays standard input and output. Each line
//! typed is sent with a CRLF terminator; server output has telnet commands
//! removed before it is printed. The client exits when the server closes the
//! connection.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p iacnet-client --example telnet_client -- 127.0.0.1:2323
//! ```

use iacnet_client::{StandardCaller, dial_to_and_call};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let address = std::env::args().nth(1).unwrap_or_default();
    if address.is_empty() {
        eprintln!("Connecting to the default address (127.0.0.1:23)");
    } else {
        eprintln!("Connecting to {}", address);
    }

    dial_to_and_call(&address, &StandardCaller).await?;

    eprintln!("Connection closed");
    Ok(())
}
