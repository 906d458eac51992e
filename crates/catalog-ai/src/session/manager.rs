//! ChatSession: gate plus transcript for one user.

use std::sync::Arc;

use catalog_common::{Credentials, SessionId};

use crate::gate::{AccessGate, GateState};
use crate::Turn;

use super::conversation::ConversationSession;

/// State owned by exactly one user session.
#[derive(Debug)]
pub struct ChatSession {
    id: SessionId,
    gate: AccessGate,
    conversation: ConversationSession,
}

impl ChatSession {
    pub fn new(credentials: Arc<Credentials>) -> Self {
        Self {
            id: SessionId::new(),
            gate: AccessGate::new(credentials),
            conversation: ConversationSession::new(),
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Submit a password candidate to this session's gate.
    pub fn submit_password(&mut self, candidate: String) {
        self.gate.submit(candidate);
    }

    pub fn is_unlocked(&self) -> bool {
        self.gate.is_unlocked()
    }

    pub fn gate_state(&self) -> GateState {
        self.gate.state()
    }

    pub fn gate(&self) -> &AccessGate {
        &self.gate
    }

    pub fn conversation(&self) -> &ConversationSession {
        &self.conversation
    }

    pub(crate) fn conversation_mut(&mut self) -> &mut ConversationSession {
        &mut self.conversation
    }

    pub fn history(&self) -> &[Turn] {
        self.conversation.history()
    }
}
