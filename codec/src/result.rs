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

use thiserror::Error;

/// Protocol malformations detected while unescaping a Telnet data stream.
///
/// These are never fatal to the codec: the state machine has already moved to a state
/// from which the stream can continue when the error is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CodecError {
    /// A byte other than IAC was found where IAC was expected.
    #[error("expected IAC byte, got 0x{found:02X}")]
    ExpectedIac {
        /// The offending byte
        found: u8,
    },

    /// IAC was followed by a byte that is not a recognised command.
    #[error("expected command byte, got 0x{found:02X}")]
    ExpectedCommand {
        /// The offending byte
        found: u8,
    },
}

impl CodecError {
    /// Recover a `CodecError` carried inside an [`std::io::Error`] returned by
    /// [`DataReader`](crate::DataReader).
    ///
    /// Returns `None` for transport errors.
    pub fn from_io(error: &std::io::Error) -> Option<&CodecError> {
        error.get_ref()?.downcast_ref::<CodecError>()
    }

    /// Check whether an I/O error is a protocol malformation rather than a transport failure.
    pub fn is_protocol_error(error: &std::io::Error) -> bool {
        Self::from_io(error).is_some()
    }
}

impl From<CodecError> for std::io::Error {
    fn from(error: CodecError) -> Self {
        std::io::Error::new(std::io::ErrorKind::InvalidData, error)
    }
}
