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

//! Resumable unescape state machine.
//!
//! Unescaping removes bytes but never adds any, so a destination at least as long as the
//! source can always absorb a full chunk. Only the state tag survives between calls, which
//! keeps the machine free of partial-sequence buffers: a chunk may end anywhere inside a
//! command or a subnegotiation and the next chunk picks up from the stored state.

use crate::CodecError;
use crate::consts::{DO, DONT, IAC, SB, SE, WILL, WONT};

/// Position of the unescaper within the Telnet byte stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnescapeState {
    /// Copying application data.
    #[default]
    CopyData,
    /// About to consume the IAC that starts a command.
    ConsumeIac,
    /// About to consume the command byte following IAC.
    ConsumeCmd,
    /// About to discard the option code of WILL, WONT, DO or DONT.
    ConsumeWwdd,
    /// Discarding subnegotiation payload.
    ConsumeStatus,
    /// About to consume an IAC found inside a subnegotiation.
    ConsumeStatusIac,
    /// About to consume the byte following an IAC inside a subnegotiation.
    ConsumeStatusCmd,
}

/// Transfer cursor for a single unescape call.
///
/// `written <= read` holds at every step.
struct Machine<'a> {
    from: &'a [u8],
    to: &'a mut [u8],
    read: usize,
    written: usize,
}

impl<'a> Machine<'a> {
    fn new(from: &'a [u8], to: &'a mut [u8]) -> Self {
        Self {
            from,
            to,
            read: 0,
            written: 0,
        }
    }

    /// Offset from the read cursor of the next occurrence of `byte`.
    fn index(&self, byte: u8) -> Option<usize> {
        self.from[self.read..].iter().position(|&b| b == byte)
    }

    /// Copy `n` bytes from the source to the destination, advancing both cursors.
    fn copy(&mut self, n: usize) {
        let src = &self.from[self.read..self.read + n];
        self.to[self.written..self.written + n].copy_from_slice(src);
        self.read += n;
        self.written += n;
    }

    /// Drop `n` source bytes.
    fn skip(&mut self, n: usize) {
        self.read += n;
    }

    fn remaining(&self) -> usize {
        self.from.len() - self.read
    }

    fn write_byte(&mut self, byte: u8) {
        self.to[self.written] = byte;
        self.written += 1;
    }

    fn consume_byte(&mut self) -> u8 {
        let byte = self.from[self.read];
        self.read += 1;
        byte
    }

    fn input_remaining(&self) -> bool {
        self.read < self.from.len()
    }
}

impl UnescapeState {
    /// Run one transition. Every transition consumes at least one source byte or moves to a
    /// state that will.
    fn step(self, mach: &mut Machine<'_>) -> (UnescapeState, Option<CodecError>) {
        match self {
            UnescapeState::CopyData => match mach.index(IAC) {
                None => {
                    let n = mach.remaining();
                    mach.copy(n);
                    (UnescapeState::CopyData, None)
                }
                Some(idx) => {
                    mach.copy(idx);
                    (UnescapeState::ConsumeIac, None)
                }
            },
            UnescapeState::ConsumeIac => match mach.consume_byte() {
                IAC => (UnescapeState::ConsumeCmd, None),
                found => (
                    UnescapeState::CopyData,
                    Some(CodecError::ExpectedIac { found }),
                ),
            },
            UnescapeState::ConsumeCmd => match mach.consume_byte() {
                WILL | WONT | DO | DONT => (UnescapeState::ConsumeWwdd, None),
                IAC => {
                    mach.write_byte(IAC);
                    (UnescapeState::CopyData, None)
                }
                SB => (UnescapeState::ConsumeStatus, None),
                SE => (UnescapeState::CopyData, None),
                found => (
                    UnescapeState::CopyData,
                    Some(CodecError::ExpectedCommand { found }),
                ),
            },
            UnescapeState::ConsumeWwdd => {
                mach.consume_byte();
                (UnescapeState::CopyData, None)
            }
            UnescapeState::ConsumeStatus => match mach.index(IAC) {
                None => {
                    let n = mach.remaining();
                    mach.skip(n);
                    (UnescapeState::ConsumeStatus, None)
                }
                Some(idx) => {
                    mach.skip(idx);
                    (UnescapeState::ConsumeStatusIac, None)
                }
            },
            UnescapeState::ConsumeStatusIac => match mach.consume_byte() {
                IAC => (UnescapeState::ConsumeStatusCmd, None),
                found => (
                    UnescapeState::ConsumeStatus,
                    Some(CodecError::ExpectedIac { found }),
                ),
            },
            // IAC inside a subnegotiation is either the start of IAC SE or more payload.
            // IAC IAC is not treated as an escaped literal here.
            UnescapeState::ConsumeStatusCmd => match mach.consume_byte() {
                SE => (UnescapeState::CopyData, None),
                _ => (UnescapeState::ConsumeStatus, None),
            },
        }
    }
}

/// Outcome of a single [`Unescaper::unescape`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unescaped {
    /// Source bytes consumed.
    pub read: usize,
    /// Application bytes written to the destination.
    pub written: usize,
    /// Malformation that stopped the call early, if any.
    pub error: Option<CodecError>,
}

/// Synchronous Telnet unescaper.
///
/// Strips negotiation commands and subnegotiation blocks from a Telnet byte stream and
/// collapses `IAC IAC` into a single 255 data byte. The unescaper remembers where it is
/// in the stream, so input may be fed in arbitrary pieces.
///
/// # Example
///
/// ```
/// use iacnet_codec::Unescaper;
///
/// let mut unescaper = Unescaper::new();
/// let mut out = [0u8; 8];
/// let result = unescaper.unescape(&[b'C', 255, 251, 24, b'D'], &mut out);
/// assert_eq!(&out[..result.written], b"CD");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Unescaper {
    state: UnescapeState,
}

impl Unescaper {
    /// Create an unescaper positioned at the start of a data stream.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state of the machine.
    pub fn state(&self) -> UnescapeState {
        self.state
    }

    /// Unescape `from` into `to`.
    ///
    /// At most `to.len()` source bytes are processed so the destination can never
    /// overflow. Processing stops at the first malformation; the returned `read` count
    /// includes the offending byte and the stored state is already recovered.
    pub fn unescape(&mut self, from: &[u8], to: &mut [u8]) -> Unescaped {
        let limit = from.len().min(to.len());
        let mut mach = Machine::new(&from[..limit], to);
        let mut error = None;
        while error.is_none() && mach.input_remaining() {
            let (next, err) = self.state.step(&mut mach);
            self.state = next;
            error = err;
        }
        Unescaped {
            read: mach.read,
            written: mach.written,
            error,
        }
    }
}
