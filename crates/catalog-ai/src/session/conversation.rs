//! Append-only chat transcript.

use crate::Turn;

/// Ordered turns of one conversation. There is no removal API.
#[derive(Debug, Default, Clone)]
pub struct ConversationSession {
    turns: Vec<Turn>,
}

impl ConversationSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// The transcript in insertion order.
    pub fn history(&self) -> &[Turn] {
        &self.turns
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Role;

    #[test]
    fn starts_empty() {
        let conversation = ConversationSession::new();
        assert!(conversation.is_empty());
        assert!(conversation.last().is_none());
    }

    #[test]
    fn append_grows_by_one_and_keeps_order() {
        let mut conversation = ConversationSession::new();
        let texts = ["uno", "dos", "tres", "cuatro"];
        for (i, text) in texts.iter().enumerate() {
            let turn = if i % 2 == 0 {
                Turn::user(*text)
            } else {
                Turn::assistant(*text)
            };
            conversation.append(turn);
            assert_eq!(conversation.len(), i + 1);
        }

        let seen: Vec<&str> = conversation.history().iter().map(Turn::text).collect();
        assert_eq!(seen, texts);
        assert_eq!(conversation.history()[1].role(), Role::Assistant);
        assert_eq!(conversation.last().map(Turn::text), Some("cuatro"));
    }
}
