// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! TTL-bound in-process session store.
//!
//! One session-scoped record (turn log + conversation state) behind a
//! concurrent lookup table, replacing parallel per-concern maps. Each entry
//! carries its own async mutex: holding it for a whole turn is what
//! guarantees that no two turns for the same session are ever processed
//! concurrently. Entries expire lazily on access and via a periodic sweep;
//! sessions are never deleted explicitly.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::debug;

use leadflow_config::model::SessionConfig;
use leadflow_core::types::{Role, Turn};

use crate::state::ConversationState;

/// The session-scoped record: ordered turn log plus conversation state.
#[derive(Debug)]
pub struct SessionEntry {
    turns: VecDeque<Turn>,
    /// Mutable routing state, owned exclusively by the turn orchestrator.
    pub state: ConversationState,
    history_cap: usize,
    last_seen: Instant,
}

impl SessionEntry {
    fn new(history_cap: usize) -> Self {
        Self {
            turns: VecDeque::new(),
            state: ConversationState::default(),
            history_cap,
            last_seen: Instant::now(),
        }
    }

    /// Appends a turn, trimming the oldest beyond the history cap.
    pub fn append_turn(&mut self, role: Role, content: impl Into<String>) {
        self.turns.push_back(Turn::now(role, content));
        while self.turns.len() > self.history_cap {
            self.turns.pop_front();
        }
        self.last_seen = Instant::now();
    }

    /// True before the first turn has been appended.
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Number of retained turns.
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// The most recent `n` turns, oldest first.
    pub fn recent_turns(&self, n: usize) -> Vec<Turn> {
        let skip = self.turns.len().saturating_sub(n);
        self.turns.iter().skip(skip).cloned().collect()
    }

    /// The contents of the most recent `n` turns, oldest first.
    pub fn recent_contents(&self, n: usize) -> Vec<String> {
        self.recent_turns(n)
            .into_iter()
            .map(|t| t.content)
            .collect()
    }

    /// Text of the most recent assistant turn, if any.
    pub fn last_assistant_text(&self) -> Option<String> {
        self.turns
            .iter()
            .rev()
            .find(|t| t.role == Role::Assistant)
            .map(|t| t.content.clone())
    }

    /// Case-insensitive scan of the retained log for a phrase.
    pub fn log_mentions(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.turns
            .iter()
            .any(|t| t.content.to_lowercase().contains(&needle))
    }

    fn is_expired(&self, ttl: Duration) -> bool {
        self.last_seen.elapsed() >= ttl
    }

    #[cfg(test)]
    pub(crate) fn backdate(&mut self, by: Duration) {
        self.last_seen = Instant::now() - by;
    }
}

/// Concurrent session lookup table with TTL-based eviction.
pub struct SessionStore {
    entries: DashMap<String, Arc<Mutex<SessionEntry>>>,
    ttl: Duration,
    history_cap: usize,
}

impl SessionStore {
    /// Creates a store from the session configuration.
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            entries: DashMap::new(),
            ttl: Duration::from_secs(config.ttl_secs),
            history_cap: config.history_cap,
        }
    }

    /// Returns the entry for a session key, creating it lazily.
    ///
    /// An entry whose TTL has elapsed is replaced with a fresh one, so an
    /// expired session key transparently restarts the conversation.
    pub fn entry(&self, session_id: &str) -> Arc<Mutex<SessionEntry>> {
        if let Some(existing) = self.entries.get(session_id) {
            let slot = Arc::clone(&existing);
            drop(existing);
            // A locked entry is mid-turn and therefore not expired.
            let expired = matches!(slot.try_lock().map(|e| e.is_expired(self.ttl)), Ok(true));
            if !expired {
                return slot;
            }
            debug!(session_id, "session expired, starting fresh");
            self.entries.remove(session_id);
        }

        let fresh = Arc::new(Mutex::new(SessionEntry::new(self.history_cap)));
        self.entries
            .entry(session_id.to_string())
            .or_insert(fresh)
            .clone()
    }

    /// Removes all expired sessions. Returns the number evicted.
    ///
    /// Entries whose mutex is held are mid-turn and skipped.
    pub fn purge_expired(&self) -> usize {
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|item| {
                item.value()
                    .try_lock()
                    .map(|e| e.is_expired(self.ttl))
                    .unwrap_or(false)
            })
            .map(|item| item.key().clone())
            .collect();

        for key in &expired {
            self.entries.remove(key);
        }
        if !expired.is_empty() {
            debug!(count = expired.len(), "purged expired sessions");
        }
        expired.len()
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no sessions are live.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
