// src/services/session.rs
use std::fmt;

use serde::Serialize;
use uuid::Uuid;

const PREFIX: &str = "session_";
const SUFFIX_LEN: usize = 9;

/// Identifier the backend uses to correlate turns of one conversation.
/// Generated once per client and never changed afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn generate() -> Self {
        let random = Uuid::new_v4().simple().to_string();
        Self(format!("{PREFIX}{}", &random[..SUFFIX_LEN]))
    }

    /// Wrap an id issued elsewhere (e.g. restored by a host application).
    pub fn from_raw(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_id_shape() {
        let sid = SessionId::generate();
        let suffix = sid.as_str().strip_prefix("session_").unwrap();
        assert_eq!(suffix.len(), 9);
        assert!(suffix.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn ids_differ_between_clients() {
        assert_ne!(SessionId::generate(), SessionId::generate());
    }
}
