//! Per-user session state.
//!
//! A `ChatSession` bundles the access gate and the transcript for one user.
//! Sessions are never shared; every chat operation takes one explicitly.

mod conversation;
mod manager;

pub use conversation::ConversationSession;
pub use manager::ChatSession;
