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

//! Telnet protocol byte values recognised by the data codec.

/// Interpret As Command. Introduces a command, or doubled, a literal 255 data byte.
pub const IAC: u8 = 255;

/// Request the peer to stop performing an option.
pub const DONT: u8 = 254;

/// Request the peer to start performing an option.
pub const DO: u8 = 253;

/// Refusal to perform, or continue performing, an option.
pub const WONT: u8 = 252;

/// Desire to begin performing an option.
pub const WILL: u8 = 251;

/// Subnegotiation begin.
pub const SB: u8 = 250;

/// Subnegotiation end.
pub const SE: u8 = 240;
