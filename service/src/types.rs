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

//! Core types for the Telnet service

use std::fmt;
use std::net::SocketAddr;

/// Unique identifier for a connection (monotonically increasing, never reused)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Create a new connection ID
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the underlying u64 value
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Per-connection context handed to handlers and callers.
///
/// Handlers log through `tracing`; the connection id is attached to the session span so
/// every event a handler emits can be traced back to its connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    id: ConnectionId,
    peer_addr: Option<SocketAddr>,
}

impl Context {
    /// Create a context for the given connection
    pub fn new(id: ConnectionId) -> Self {
        Self {
            id,
            peer_addr: None,
        }
    }

    /// Attach the remote address
    pub fn with_peer_addr(mut self, peer_addr: SocketAddr) -> Self {
        self.peer_addr = Some(peer_addr);
        self
    }

    /// Connection identifier
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Remote address, when the transport has one
    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.peer_addr
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_id_display() {
        assert_eq!(ConnectionId::new(7).to_string(), "conn-7");
        assert_eq!(ConnectionId::new(7).as_u64(), 7);
    }

    #[test]
    fn test_context_peer_addr() {
        let ctx = Context::new(ConnectionId::new(1));
        assert_eq!(ctx.peer_addr(), None);

        let addr: SocketAddr = "10.0.0.1:4000".parse().unwrap();
        let ctx = ctx.with_peer_addr(addr);
        assert_eq!(ctx.peer_addr(), Some(addr));
        assert_eq!(ctx.id(), ConnectionId::new(1));
    }
}
