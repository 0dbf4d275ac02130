//! Cache Module
//!
//! The cache-aside core: deterministic key namespacing, batched
//! read-through orchestration and bulk invalidation over a pluggable
//! key-value store.

mod batch;
mod key;
mod loader;


// Re-export public types
pub use batch::{BatchCache, CacheBuilder};
pub use key::{KeyCodec, KeyGenerator};
pub use loader::MultiLoader;

// == Public Constants ==
/// Maximum number of keys per multi-get round trip
pub const BATCH_PARTITION_SIZE: usize = 20;

/// Upper bound (exclusive) of the random TTL jitter, in seconds
pub const TTL_JITTER_SECS: u64 = 60;

/// Reserved suffix of the per-namespace known-keys index name
pub const KNOWN_KEYS_SUFFIX: &str = "$$knownKeys$$";

/// Separator between the namespace prefix and the generated key segment
pub const KEY_SEPARATOR: &str = ":";
