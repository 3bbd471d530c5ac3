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

use crate::{Unescaper, escape_into};
use bytes::{Buf, Bytes, BytesMut};
use tokio_util::codec::{Decoder, Encoder};
use tracing::warn;

/// A [`tokio_util::codec`] codec for Telnet data.
///
/// Decoding yields unescaped application bytes in whatever pieces arrive; commands and
/// subnegotiations never reach the caller. Encoding escapes IAC bytes.
///
/// Unlike [`DataReader`](crate::DataReader), a malformed command does not produce an
/// error, since a decoder error ends a `FramedRead` stream. It is logged at `warn` and
/// decoding carries on with the rest of the buffer.
#[derive(Debug, Clone, Default)]
pub struct DataCodec {
    unescaper: Unescaper,
}

impl DataCodec {
    /// Create a codec positioned at the start of a data stream.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Decoder for DataCodec {
    type Item = BytesMut;
    type Error = std::io::Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if src.is_empty() {
            return Ok(None);
        }

        let mut out = BytesMut::zeroed(src.len());
        let mut read = 0;
        let mut written = 0;
        while read < src.len() {
            let result = self.unescaper.unescape(&src[read..], &mut out[written..]);
            read += result.read;
            written += result.written;
            if let Some(error) = result.error {
                warn!(%error, "discarding malformed telnet command");
            }
        }
        src.advance(read);
        out.truncate(written);

        if out.is_empty() {
            Ok(None)
        } else {
            Ok(Some(out))
        }
    }
}

impl Encoder<&[u8]> for DataCodec {
    type Error = std::io::Error;

    fn encode(&mut self, item: &[u8], dst: &mut BytesMut) -> Result<(), Self::Error> {
        escape_into(item, dst);
        Ok(())
    }
}

impl Encoder<Bytes> for DataCodec {
    type Error = std::io::Error;

    fn encode(&mut self, item: Bytes, dst: &mut BytesMut) -> Result<(), Self::Error> {
        escape_into(&item, dst);
        Ok(())
    }
}
