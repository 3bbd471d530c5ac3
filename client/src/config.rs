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

//! Client configuration

use iacnet_service::TELNET_PORT;

/// Client configuration
///
/// # Example
///
/// ```
/// use iacnet_client::ClientConfig;
///
/// let config = ClientConfig::new("mud.example.org", 4000).with_nodelay(true);
/// assert_eq!(config.address(), "mud.example.org:4000");
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server hostname or IP address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Set `TCP_NODELAY` on the socket
    pub nodelay: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: TELNET_PORT,
            nodelay: false,
        }
    }
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Set the server host
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set the server port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Enable or disable `TCP_NODELAY`
    pub fn with_nodelay(mut self, nodelay: bool) -> Self {
        self.nodelay = nodelay;
        self
    }

    /// Get the server address as `host:port`
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_local_telnet() {
        assert_eq!(ClientConfig::default().address(), "127.0.0.1:23");
    }

    #[test]
    fn test_builder() {
        let config = ClientConfig::default()
            .with_host("localhost")
            .with_port(2323)
            .with_nodelay(true);
        assert_eq!(config.address(), "localhost:2323");
        assert!(config.nodelay);
    }
}
