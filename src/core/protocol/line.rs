// src/core/protocol/line.rs

//! Implements the newline-terminated line framing of the CLI protocol and the
//! corresponding `Encoder` and `Decoder` for network communication.

use crate::core::LmsError;
use crate::core::protocol::escape::percent_decode_in_place;
use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};

/// Default bound on a single inbound line, terminator included.
pub const DEFAULT_MAX_LINE_LEN: usize = 4096;

/// A `tokio_util::codec` implementation for the line-oriented wire format.
///
/// Decoded items are complete lines with the terminator stripped and all
/// percent-escapes resolved. A trailing partial line stays buffered across
/// reads; if it outgrows `max_line_len` before a terminator arrives the
/// decoder fails with [`LmsError::BufferOverflow`] instead of truncating.
#[derive(Debug)]
pub struct LineCodec {
    max_line_len: usize,
}

impl LineCodec {
    pub fn new(max_line_len: usize) -> Self {
        Self { max_line_len }
    }
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LINE_LEN)
    }
}

impl Decoder for LineCodec {
    type Item = String;
    type Error = LmsError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let Some(pos) = src.iter().position(|&b| b == b'\n') else {
            // No complete line yet. Keep the partial segment for the next
            // read, but never let it grow without bound.
            if src.len() > self.max_line_len {
                return Err(LmsError::BufferOverflow {
                    limit: self.max_line_len,
                });
            }
            return Ok(None);
        };

        if pos + 1 > self.max_line_len {
            return Err(LmsError::BufferOverflow {
                limit: self.max_line_len,
            });
        }

        let mut line = src.split_to(pos + 1).to_vec();
        // Drop the terminator and an optional preceding CR.
        line.truncate(pos);
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        percent_decode_in_place(&mut line);
        Ok(Some(String::from_utf8_lossy(&line).into_owned()))
    }
}

impl Encoder<String> for LineCodec {
    type Error = LmsError;

    /// Encodes one outbound command as its bytes plus the line terminator.
    fn encode(&mut self, item: String, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.reserve(item.len() + 1);
        dst.extend_from_slice(item.as_bytes());
        dst.extend_from_slice(b"\n");
        Ok(())
    }
}
