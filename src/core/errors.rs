// src/core/errors.rs

//! Defines the primary error type for the client.

use std::sync::Arc;
use thiserror::Error;

/// The main error enum, representing all possible failures within the client.
/// Using `thiserror` allows for clean error definitions and automatic `From` trait implementations.
#[derive(Error, Debug)]
pub enum LmsError {
    #[error("IO Error: {0}")]
    Io(Arc<std::io::Error>),

    /// An inbound line grew past the configured bound without a terminator.
    #[error("Inbound line exceeds the {limit} byte limit")]
    BufferOverflow { limit: usize },
}

// Manual implementation of Clone because `std::io::Error` is not cloneable.
// We wrap it in an Arc to allow for cheap, shared cloning.
impl Clone for LmsError {
    fn clone(&self) -> Self {
        match self {
            LmsError::Io(e) => LmsError::Io(Arc::clone(e)),
            LmsError::BufferOverflow { limit } => LmsError::BufferOverflow { limit: *limit },
        }
    }
}

impl PartialEq for LmsError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (LmsError::Io(e1), LmsError::Io(e2)) => e1.to_string() == e2.to_string(),
            (LmsError::BufferOverflow { limit: l1 }, LmsError::BufferOverflow { limit: l2 }) => {
                l1 == l2
            }
            _ => false,
        }
    }
}

impl From<std::io::Error> for LmsError {
    fn from(e: std::io::Error) -> Self {
        LmsError::Io(Arc::new(e))
    }
}
