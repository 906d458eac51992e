//! Access password and API key shared read-only by every session.

use std::fmt;

/// The two secrets the assistant runs with.
///
/// Both values stay private; `Debug` never prints them.
#[derive(Clone)]
pub struct Credentials {
    password: String,
    api_key: String,
}

impl Credentials {
    pub fn new(password: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            password: password.into(),
            api_key: api_key.into(),
        }
    }

    /// Whether `candidate` is the access password.
    pub fn password_matches(&self, candidate: &str) -> bool {
        // Length leaks, contents don't short-circuit.
        let a = self.password.as_bytes();
        let b = candidate.as_bytes();
        a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("password", &"[REDACTED]")
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}
