//! API Module
//!
//! HTTP handlers and routing for the demo user service, a read-through
//! cache in front of a simulated user directory.
//!
//! # Endpoints
//! - `GET /users/:id` - Resolve a user, loading through the cache
//! - `GET /users?ids=1,2,3` - Resolve a batch of users
//! - `DELETE /users/:id` - Evict a user from the cache
//! - `DELETE /users` - Evict every cached user
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
