// src/core/discovery.rs

//! The discovery state machine that resolves the configured player name to
//! the server-assigned player id.
//!
//! Resolution is a strict request/response exchange: query the player
//! count, query each player's name, then query the id of the player whose
//! name matches the target. Responses that do not fit the shape expected
//! in the current stage are ignored without error; a lost response leaves
//! the session parked in its current stage until the next reconnect.

use crate::core::queue::CommandQueue;
use strum_macros::Display;
use tracing::{debug, info, trace, warn};

/// Where the discovery exchange currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum DiscoveryStage {
    #[default]
    Idle,
    AwaitingCount,
    AwaitingNames,
    AwaitingId,
    Resolved,
}

/// Drives the count -> names -> id exchange for one configured target name.
///
/// Invariant: `player_id` is `Some` exactly when the stage is `Resolved`.
#[derive(Debug)]
pub struct DiscoverySession {
    target: String,
    stage: DiscoveryStage,
    /// Index whose id query is outstanding. Only the id response carrying
    /// this index is accepted (first-match-wins when names collide).
    query_index: Option<u64>,
    player_id: Option<String>,
}

impl DiscoverySession {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            stage: DiscoveryStage::Idle,
            query_index: None,
            player_id: None,
        }
    }

    pub fn stage(&self) -> DiscoveryStage {
        self.stage
    }

    pub fn player_id(&self) -> Option<&str> {
        self.player_id.as_deref()
    }

    /// Starts a fresh exchange; called when a connection is established.
    pub fn begin(&mut self, queue: &mut CommandQueue) {
        self.reset();
        queue.enqueue("player count ?");
        self.stage = DiscoveryStage::AwaitingCount;
    }

    /// Discards all progress. Called on every disconnect, which forces a
    /// full rediscovery after reconnect even if the server has not changed.
    pub fn reset(&mut self) {
        self.stage = DiscoveryStage::Idle;
        self.query_index = None;
        self.player_id = None;
    }

    /// Feeds one decoded, tokenized response line to the state machine.
    pub fn on_response(&mut self, tokens: &[&str], queue: &mut CommandQueue) {
        if tokens.len() < 3 || tokens[0] != "player" {
            return;
        }
        match (self.stage, tokens[1]) {
            (DiscoveryStage::AwaitingCount, "count") => {
                let Ok(count) = tokens[2].parse::<u64>() else {
                    return;
                };
                // A hostile or corrupt count must not spin the fan-out
                // past what the queue can hold; anything beyond the bound
                // would be rejected entry by entry anyway.
                let capacity = queue.capacity() as u64;
                if count > capacity {
                    warn!("Server reports {count} players, clamping name queries to {capacity}");
                }
                debug!("Server reports {count} players, querying names");
                for index in 0..count.min(capacity) {
                    if !queue.enqueue(format!("player name {index} ?")) {
                        break;
                    }
                }
                self.stage = DiscoveryStage::AwaitingNames;
            }
            (DiscoveryStage::AwaitingNames, "name") => {
                let Ok(index) = tokens[2].parse::<u64>() else {
                    return;
                };
                if tokens.len() < 4 {
                    return;
                }
                // Names may be multi-word once percent-decoded; the line
                // tokenizer has already collapsed the escapes.
                let name = tokens[3..].join(" ");
                if name == self.target {
                    debug!("Player \"{name}\" found at index {index}, querying id");
                    queue.enqueue(format!("player id {index} ?"));
                    self.query_index = Some(index);
                    self.stage = DiscoveryStage::AwaitingId;
                } else {
                    trace!("Player \"{name}\" at index {index} does not match target");
                }
            }
            (DiscoveryStage::AwaitingId, "id") => {
                let Ok(index) = tokens[2].parse::<u64>() else {
                    return;
                };
                if self.query_index != Some(index) || tokens.len() < 4 {
                    return;
                }
                let id = tokens[3].to_string();
                info!("Resolved player \"{}\" to id {id}", self.target);
                self.player_id = Some(id);
                self.stage = DiscoveryStage::Resolved;
            }
            _ => {
                trace!("Ignoring response out of stage {}: {tokens:?}", self.stage);
            }
        }
    }
}
