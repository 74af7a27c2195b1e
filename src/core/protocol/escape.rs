// src/core/protocol/escape.rs

//! Percent-decoding for the textual payloads of the CLI protocol.
//!
//! The server escapes payload text (player names in particular) with `%XX`
//! hex escapes and `+` for space. The decoder is deliberately permissive:
//! a `%` that is not followed by two hex digits passes through literally,
//! matching the informal encoding the wire protocol actually uses. This
//! differs from strict RFC 3986 decoding, which is why no URL crate is used.

/// Decodes percent-escapes in place with a single pass.
///
/// `%XX` (two hex digits) becomes the corresponding byte and consumes all
/// three input bytes. A `%` with anything else after it is kept literally
/// and the following byte is processed normally on the next step. `+`
/// becomes a space. Every other byte is copied through unchanged.
///
/// The write index never overtakes the read index, so decoding in place
/// cannot clobber unread input. This function never fails.
pub fn percent_decode_in_place(buf: &mut Vec<u8>) {
    let mut read = 0;
    let mut write = 0;
    while read < buf.len() {
        let byte = buf[read];
        if byte == b'%'
            && read + 2 < buf.len()
            && let (Some(hi), Some(lo)) = (hex_digit(buf[read + 1]), hex_digit(buf[read + 2]))
        {
            buf[write] = (hi << 4) | lo;
            read += 3;
        } else if byte == b'+' {
            buf[write] = b' ';
            read += 1;
        } else {
            buf[write] = byte;
            read += 1;
        }
        write += 1;
    }
    buf.truncate(write);
}

/// Convenience wrapper that decodes a `&str` into an owned `String`,
/// replacing any invalid UTF-8 produced by the escapes.
pub fn percent_decode_str(input: &str) -> String {
    let mut buf = input.as_bytes().to_vec();
    percent_decode_in_place(&mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}

fn hex_digit(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}
