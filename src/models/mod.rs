//! Request and Response models for the demo user service
//!
//! This module defines the cached domain type and the DTOs (Data
//! Transfer Objects) used for serializing/deserializing HTTP request and
//! response bodies.

pub mod requests;
pub mod responses;
pub mod user;

// Re-export commonly used types
pub use requests::UsersQuery;
pub use responses::{
    ErrorResponse, EvictAllResponse, EvictResponse, HealthResponse, UserResponse, UsersResponse,
};
pub use user::User;
