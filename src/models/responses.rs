//! Response DTOs for the demo user service
//!
//! Defines the structure of outgoing HTTP response bodies.

use std::collections::HashMap;

use serde::Serialize;

use crate::models::User;

/// Response body for the single user lookup (GET /users/:id)
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    /// The user id
    pub id: u32,
    /// The user's display name
    pub name: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
        }
    }
}

/// Response body for the batch user lookup (GET /users?ids=...)
#[derive(Debug, Clone, Serialize)]
pub struct UsersResponse {
    /// Number of resolved users
    pub count: usize,
    /// Resolved users, ordered by id
    pub users: Vec<UserResponse>,
}

impl UsersResponse {
    /// Creates a new UsersResponse from a resolved mapping.
    pub fn new(users: HashMap<u32, User>) -> Self {
        let mut users: Vec<UserResponse> = users.into_values().map(UserResponse::from).collect();
        users.sort_by_key(|user| user.id);
        Self {
            count: users.len(),
            users,
        }
    }
}

/// Response body for the single eviction (DELETE /users/:id)
#[derive(Debug, Clone, Serialize)]
pub struct EvictResponse {
    /// Success message
    pub message: String,
    /// The evicted user id
    pub id: u32,
}

impl EvictResponse {
    /// Creates a new EvictResponse
    pub fn new(id: u32) -> Self {
        Self {
            message: format!("User {id} evicted from cache"),
            id,
        }
    }
}

/// Response body for the bulk eviction (DELETE /users)
#[derive(Debug, Clone, Serialize)]
pub struct EvictAllResponse {
    /// Success message
    pub message: String,
}

impl EvictAllResponse {
    /// Creates a new EvictAllResponse
    pub fn new() -> Self {
        Self {
            message: "All cached users evicted".to_string(),
        }
    }
}

impl Default for EvictAllResponse {
    fn default() -> Self {
        Self::new()
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_response_from_user() {
        let resp = UserResponse::from(User::new(1, "user:1"));
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("user:1"));
    }

    #[test]
    fn test_users_response_sorted_by_id() {
        let users = HashMap::from([
            (3, User::new(3, "user:3")),
            (1, User::new(1, "user:1")),
            (2, User::new(2, "user:2")),
        ]);

        let resp = UsersResponse::new(users);
        assert_eq!(resp.count, 3);
        let ids: Vec<u32> = resp.users.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_evict_response_serialize() {
        let resp = EvictResponse::new(5);
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("evicted"));
        assert!(json.contains('5'));
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }

    #[test]
    fn test_error_response_serialize() {
        let resp = ErrorResponse::new("Something went wrong");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("error"));
        assert!(json.contains("Something went wrong"));
    }
}
