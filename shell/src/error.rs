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

//! Shell error types

use thiserror::Error;

/// Result type for shell commands
pub type ShellResult<T> = std::result::Result<T, ShellError>;

/// Shell error type
#[derive(Debug, Error)]
pub enum ShellError {
    /// I/O error on a pipe or the connection
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// `run` was called on a command that already ran
    #[error("Command already ran")]
    AlreadyRun,

    /// A pipe endpoint was requested a second time
    #[error("{0} pipe already taken")]
    PipeTaken(&'static str),

    /// A command failed with a message of its own
    #[error("{0}")]
    Command(String),
}

impl ShellError {
    /// Create a command failure from any displayable message
    pub fn command(message: impl Into<String>) -> Self {
        ShellError::Command(message.into())
    }

    /// Check if the error came from misusing a command rather than running it
    pub fn is_usage_error(&self) -> bool {
        matches!(self, ShellError::AlreadyRun | ShellError::PipeTaken(_))
    }
}
