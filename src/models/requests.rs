//! Request DTOs for the demo user service
//!
//! Defines the structure of incoming HTTP query parameters.

use serde::Deserialize;

/// Query parameters for the batch user lookup (GET /users?ids=1,2,3)
///
/// # Fields
/// - `ids`: comma-separated list of user ids to resolve
#[derive(Debug, Clone, Deserialize)]
pub struct UsersQuery {
    /// Comma-separated user ids
    pub ids: String,
}

impl UsersQuery {
    /// Parses the id list, preserving order and duplicates.
    ///
    /// Returns an error message if the list is empty or contains a
    /// non-numeric entry.
    pub fn parse_ids(&self) -> Result<Vec<u32>, String> {
        if self.ids.trim().is_empty() {
            return Err("ids cannot be empty".to_string());
        }
        self.ids
            .split(',')
            .map(|part| {
                part.trim()
                    .parse::<u32>()
                    .map_err(|_| format!("invalid user id '{}'", part.trim()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ids_valid() {
        let query = UsersQuery {
            ids: "1,2,3".to_string(),
        };
        assert_eq!(query.parse_ids().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_parse_ids_tolerates_whitespace() {
        let query = UsersQuery {
            ids: " 1, 2 ,3".to_string(),
        };
        assert_eq!(query.parse_ids().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_parse_ids_preserves_duplicates() {
        let query = UsersQuery {
            ids: "1,1,2".to_string(),
        };
        assert_eq!(query.parse_ids().unwrap(), vec![1, 1, 2]);
    }

    #[test]
    fn test_parse_ids_empty_rejected() {
        let query = UsersQuery {
            ids: "  ".to_string(),
        };
        assert!(query.parse_ids().is_err());
    }

    #[test]
    fn test_parse_ids_non_numeric_rejected() {
        let query = UsersQuery {
            ids: "1,x,3".to_string(),
        };
        assert!(query.parse_ids().is_err());
    }
}
