// src/core/client.rs

//! The client core: connection state, inbound event handling, per-tick
//! command dispatch, and the tag notification operations.
//!
//! The core performs no I/O itself. The transport driver feeds it
//! [`ClientEvent`]s and polls it for outbound commands, so every state
//! transition is a plain, independently testable function call.

use crate::config::Config;
use crate::core::discovery::{DiscoverySession, DiscoveryStage};
use crate::core::events::ClientEvent;
use crate::core::queue::CommandQueue;
use strum_macros::Display;
use tracing::{debug, trace};

/// The lifecycle state of the single server connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

/// Owns the connection state, the outbound queue, and the discovery
/// session for one configured server/player pair.
#[derive(Debug)]
pub struct LmsClient {
    state: ConnectionState,
    queue: CommandQueue,
    discovery: DiscoverySession,
    purge_on_disconnect: bool,
}

impl LmsClient {
    pub fn new(config: &Config) -> Self {
        Self {
            state: ConnectionState::Disconnected,
            queue: CommandQueue::new(config.queue.capacity, config.queue.overflow),
            discovery: DiscoverySession::new(config.player.clone()),
            purge_on_disconnect: config.queue.purge_on_disconnect,
        }
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.state
    }

    pub fn discovery_stage(&self) -> DiscoveryStage {
        self.discovery.stage()
    }

    /// The resolved server-assigned player id, once discovery completes.
    pub fn player_id(&self) -> Option<&str> {
        self.discovery.player_id()
    }

    pub fn queue(&self) -> &CommandQueue {
        &self.queue
    }

    /// Marks the start of a connect attempt.
    pub fn on_connecting(&mut self) {
        self.set_state(ConnectionState::Connecting);
    }

    fn set_state(&mut self, next: ConnectionState) {
        if self.state != next {
            debug!("Connection state {} -> {next}", self.state);
            self.state = next;
        }
    }

    /// Applies one transport event to the state machine.
    pub fn handle(&mut self, event: ClientEvent) {
        match event {
            ClientEvent::Connected => self.on_connected(),
            ClientEvent::Line(line) => self.on_line(&line),
            ClientEvent::Disconnected => self.on_disconnected(),
        }
    }

    fn on_connected(&mut self) {
        self.set_state(ConnectionState::Connected);
        self.discovery.begin(&mut self.queue);
    }

    fn on_disconnected(&mut self) {
        self.set_state(ConnectionState::Disconnected);
        self.discovery.reset();
        if self.purge_on_disconnect {
            // Stale discovery queries must not be replayed against a fresh
            // connection whose player indices may have changed.
            self.queue.clear();
        }
    }

    fn on_line(&mut self, line: &str) {
        trace!("<- {line}");
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.is_empty() {
            return;
        }
        self.discovery.on_response(&tokens, &mut self.queue);
    }

    /// Removes and returns the next outbound command, or `None` when the
    /// queue is empty or no connection is established. The driver calls
    /// this once per tick while the transport is ready, which paces
    /// traffic to a single command in flight.
    pub fn poll_command(&mut self) -> Option<String> {
        if self.state != ConnectionState::Connected {
            return None;
        }
        self.queue.dispatch()
    }

    /// Enqueues a tag-present notification for the resolved player.
    ///
    /// A silent no-op (logged at debug) before the connection is up or the
    /// player id is resolved; the event is dropped, not deferred.
    pub fn send_tag(&mut self, tag_id: &str) {
        if self.state != ConnectionState::Connected {
            debug!("Tag {tag_id} observed while disconnected, dropping");
            return;
        }
        let Some(id) = self.discovery.player_id() else {
            debug!("Tag {tag_id} observed before the player id was resolved, dropping");
            return;
        };
        let command = format!("{id} rfid tag {tag_id}");
        self.queue.enqueue(command);
    }

    /// Enqueues a tag-removed notification, under the same gating as
    /// [`send_tag`](Self::send_tag).
    pub fn send_tag_removed(&mut self) {
        if self.state != ConnectionState::Connected {
            debug!("Tag removal observed while disconnected, dropping");
            return;
        }
        let Some(id) = self.discovery.player_id() else {
            debug!("Tag removal observed before the player id was resolved, dropping");
            return;
        };
        let command = format!("{id} rfid tag removed");
        self.queue.enqueue(command);
    }
}
