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

//! Client error types

use thiserror::Error;

/// Result type for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// I/O error on an established connection
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The server could not be reached
    #[error("Failed to connect to {address}: {source}")]
    Connect {
        /// Address that was dialed
        address: String,
        /// Underlying connect failure
        #[source]
        source: std::io::Error,
    },
}

impl ClientError {
    /// Check if the error happened while dialing
    pub fn is_connect_error(&self) -> bool {
        matches!(self, ClientError::Connect { .. })
    }

    /// Check if the connection was refused by the remote host
    pub fn is_refused(&self) -> bool {
        match self {
            ClientError::Connect { source, .. } | ClientError::Io(source) => {
                source.kind() == std::io::ErrorKind::ConnectionRefused
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_connect_error_display() {
        let err = ClientError::Connect {
            address: "127.0.0.1:23".to_string(),
            source: io::Error::new(io::ErrorKind::ConnectionRefused, "refused"),
        };
        assert_eq!(err.to_string(), "Failed to connect to 127.0.0.1:23: refused");
        assert!(err.is_connect_error());
        assert!(err.is_refused());
    }

    #[test]
    fn test_io_error_is_not_connect_error() {
        let err = ClientError::from(io::Error::from(io::ErrorKind::BrokenPipe));
        assert!(!err.is_connect_error());
        assert!(!err.is_refused());
    }
}
