// src/connection/mod.rs

//! Manages the TCP connection to the server: reconnect pacing and the
//! driver loop that feeds transport events into the client core.

// Declare the private sub-modules of the `connection` module.
mod backoff;
mod handler;

// Publicly re-export the primary types from the sub-modules.
pub use backoff::ReconnectBackoff;
pub use handler::ConnectionHandler;
