// src/core/queue.rs

//! The ordered outbound command queue.
//!
//! Any component that needs to emit a protocol line appends here; the
//! transport driver removes exactly one head entry per tick. The queue is
//! bounded with an explicit, configurable overflow policy so a stalled
//! connection cannot accumulate commands without limit.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::warn;

/// What `enqueue` does when the queue is already at capacity.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum OverflowPolicy {
    /// Refuse the new command and leave the queue unchanged.
    #[default]
    RejectNew,
    /// Evict the oldest queued command to make room.
    DropOldest,
}

/// FIFO buffer of outbound command strings. Insertion order is send order.
#[derive(Debug)]
pub struct CommandQueue {
    commands: VecDeque<String>,
    capacity: usize,
    policy: OverflowPolicy,
}

impl CommandQueue {
    pub fn new(capacity: usize, policy: OverflowPolicy) -> Self {
        Self {
            commands: VecDeque::with_capacity(capacity.min(64)),
            capacity,
            policy,
        }
    }

    /// Appends a command to the tail. Never blocks; on overflow the
    /// configured policy is applied and the incident is logged. Returns
    /// `false` only when `RejectNew` discarded the command.
    pub fn enqueue(&mut self, command: impl Into<String>) -> bool {
        let command = command.into();
        if self.commands.len() >= self.capacity {
            match self.policy {
                OverflowPolicy::RejectNew => {
                    warn!(
                        "Command queue full ({} entries), rejecting: {command}",
                        self.capacity
                    );
                    return false;
                }
                OverflowPolicy::DropOldest => {
                    if let Some(dropped) = self.commands.pop_front() {
                        warn!(
                            "Command queue full ({} entries), dropping oldest: {dropped}",
                            self.capacity
                        );
                    }
                }
            }
        }
        self.commands.push_back(command);
        true
    }

    /// Removes and returns the head command, if any. The caller is
    /// responsible for pacing (one dispatch per tick) and for checking
    /// that the transport is ready.
    pub fn dispatch(&mut self) -> Option<String> {
        self.commands.pop_front()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Iterates the queued commands in send order without consuming them.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().map(String::as_str)
    }
}
