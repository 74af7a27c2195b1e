// src/core/mod.rs

//! The central module containing the client core logic and data structures.

pub mod client;
pub mod discovery;
pub mod errors;
pub mod events;
pub mod protocol;
pub mod queue;

pub use client::LmsClient;
pub use errors::LmsError;
