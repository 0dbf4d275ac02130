//! User domain type cached by the demo service.

use serde::{Deserialize, Serialize};

/// A user profile as resolved by the directory backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Stable user id, also the cache key
    pub id: u32,
    /// Display name
    pub name: String,
}

impl User {
    /// Creates a new user.
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_serde_round_trip() {
        let user = User::new(7, "user:7");

        let json = serde_json::to_string(&user).unwrap();
        let back: User = serde_json::from_str(&json).unwrap();

        assert_eq!(back, user);
    }
}
