// src/core/events.rs

//! Defines the events exchanged between the transport driver, the client
//! core, and the external tag-sensing collaborator.

/// Transport-level notifications fed into the client core by the driver.
///
/// Modelling the connection lifecycle as an explicit event stream keeps the
/// core independent of callback timing: every state transition happens
/// inside `LmsClient::handle`, one event at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    /// The TCP connection completed.
    Connected,
    /// One complete, percent-decoded protocol line arrived.
    Line(String),
    /// The connection dropped: peer close, transport error, or a failed
    /// connect attempt. All three collapse to the same state transition.
    Disconnected,
}

/// Events delivered by the tag-sensing subsystem. Each event yields at
/// most one enqueued command and is then discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagEvent {
    /// A tag settled on the reader; the payload is the tag id.
    Present(String),
    /// The current tag left the reader.
    Removed,
}
