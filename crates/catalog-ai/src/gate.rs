//! Password gate guarding a chat session.
//!
//! ```text
//! Unattempted --submit(ok)--> Accepted (terminal)
//!      |                         ^
//!      +--submit(bad)--> Rejected-+
//!                          |  ^
//!                          +--+ submit(bad)
//! ```

use std::sync::Arc;

use catalog_common::Credentials;
use tracing::{debug, info, warn};

use crate::ChatError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Unattempted,
    Rejected,
    Accepted,
}

/// Single-secret challenge. Candidates are compared and dropped on the
/// spot; the gate keeps only the resulting state.
#[derive(Debug)]
pub struct AccessGate {
    credentials: Arc<Credentials>,
    state: GateState,
    attempts: u32,
}

impl AccessGate {
    pub fn new(credentials: Arc<Credentials>) -> Self {
        Self {
            credentials,
            state: GateState::Unattempted,
            attempts: 0,
        }
    }

    /// Evaluate a password candidate. Callers re-query `is_unlocked`.
    pub fn submit(&mut self, candidate: String) {
        if self.state == GateState::Accepted {
            debug!("gate already unlocked, ignoring submission");
            return;
        }

        let accepted = self.credentials.password_matches(&candidate);
        drop(candidate);
        self.attempts += 1;

        if accepted {
            self.state = GateState::Accepted;
            info!(attempts = self.attempts, "access granted");
        } else {
            self.state = GateState::Rejected;
            warn!(attempts = self.attempts, "access denied");
        }
    }

    pub fn is_unlocked(&self) -> bool {
        self.state == GateState::Accepted
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    /// Number of evaluated submissions (ignored ones after unlock excluded).
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn ensure_unlocked(&self) -> Result<(), ChatError> {
        match self.state {
            GateState::Accepted => Ok(()),
            GateState::Rejected => Err(ChatError::WrongPassword),
            GateState::Unattempted => Err(ChatError::Locked),
        }
    }
}
