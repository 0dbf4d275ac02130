//! Cachefront - a read-through, batch-capable cache layer
//!
//! Sits in front of a pluggable key-value store and a batch loader:
//! namespaced keys, partitioned multi-get, TTL jitter and bulk
//! invalidation through a known-keys index.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod store;

pub use api::AppState;
pub use cache::{BatchCache, CacheBuilder, KeyCodec, MultiLoader};
pub use config::Config;
pub use error::{CacheError, Result};
pub use store::{KvStore, MemoryStore, StoreOp};
