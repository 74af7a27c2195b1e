// src/core/protocol/mod.rs

//! The line-oriented wire protocol: framing and percent-decoding.

pub mod escape;
pub mod line;

pub use escape::{percent_decode_in_place, percent_decode_str};
pub use line::{DEFAULT_MAX_LINE_LEN, LineCodec};
