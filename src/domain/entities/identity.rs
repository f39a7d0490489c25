//! Caller identity passed explicitly into every service operation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque user identifier taken from a verified token subject.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Who is making a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Caller {
    Anonymous,
    User(UserId),
}

impl Caller {
    /// Returns the user id, or `None` for anonymous callers.
    pub fn user(&self) -> Option<&UserId> {
        match self {
            Caller::Anonymous => None,
            Caller::User(id) => Some(id),
        }
    }
}

impl From<UserId> for Caller {
    fn from(id: UserId) -> Self {
        Caller::User(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caller_user() {
        let caller = Caller::from(UserId::new("42"));
        assert_eq!(caller.user().map(UserId::as_str), Some("42"));
        assert!(Caller::Anonymous.user().is_none());
    }

    #[test]
    fn test_user_id_serializes_transparently() {
        let json = serde_json::to_string(&UserId::new("alice")).unwrap();
        assert_eq!(json, "\"alice\"");
    }
}
