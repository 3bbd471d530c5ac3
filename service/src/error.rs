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

//! Error types for the Telnet service

use std::net::SocketAddr;
use thiserror::Error;

/// Result type for service operations
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Telnet service error types
#[derive(Debug, Error)]
pub enum ServiceError {
    /// I/O error from the underlying TCP stream
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The listen address could not be bound
    #[error("Failed to bind {address}: {source}")]
    Bind {
        /// Address that was requested
        address: SocketAddr,
        /// Underlying bind failure
        #[source]
        source: std::io::Error,
    },

    /// The listener failed while accepting a connection
    #[error("Failed to accept connection: {0}")]
    Accept(#[source] std::io::Error),
}

impl ServiceError {
    /// Check if the error came from setting up the listener
    pub fn is_bind_error(&self) -> bool {
        matches!(self, ServiceError::Bind { .. })
    }

    /// Check if the error ended an accept loop
    pub fn is_accept_error(&self) -> bool {
        matches!(self, ServiceError::Accept(_))
    }

    /// Check if the error wraps a Telnet protocol malformation
    pub fn is_protocol_error(&self) -> bool {
        match self {
            ServiceError::Io(error) => iacnet_codec::CodecError::is_protocol_error(error),
            _ => false,
        }
    }
}
