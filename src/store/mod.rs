//! Key-Value Store Module
//!
//! Defines the contract the cache layer expects from its backing store,
//! plus an in-process implementation used by the demo service and tests.
//!
//! The store is an external collaborator: the cache never retries its
//! calls and propagates its errors unchanged.

mod entry;
mod memory;

pub use memory::MemoryStore;

use std::future::Future;

use crate::error::Result;

// == Pipelined Write Operations ==
/// A single write operation inside a [`KvStore::pipeline`] batch.
///
/// `put` pipelines one `SetEx` per entry, one `ZAdd` per entry into the
/// known-keys index, and a trailing `Expire` refreshing the index itself,
/// all in one round trip.
#[derive(Debug, Clone)]
pub enum StoreOp<V> {
    /// Store `value` under `key` with an expiry, overwriting any
    /// previous value (upsert semantics).
    SetEx {
        key: String,
        value: V,
        ttl_secs: u64,
    },
    /// Add `member` with `score` to the ordered set at `key`.
    ZAdd {
        key: String,
        score: f64,
        member: String,
    },
    /// Reset the expiry of `key`.
    Expire { key: String, ttl_secs: u64 },
}

// == KV Store Contract ==
/// External key-value store consumed by the cache layer.
///
/// Implementations must be safe for concurrent use from multiple callers;
/// the cache holds the store behind an `Arc` and only ever invokes it.
/// `multi_get` must return one slot per requested key, in request order.
pub trait KvStore<V>: Send + Sync
where
    V: Clone + Send + Sync + 'static,
{
    /// Fetches the value at `key`, or `None` when absent or expired.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<V>>> + Send;

    /// Fetches many keys at once. The result has the same length and
    /// order as `keys`, with `None` slots for absent entries.
    fn multi_get(&self, keys: &[String]) -> impl Future<Output = Result<Vec<Option<V>>>> + Send;

    /// Stores `value` under `key` with an expiry (upsert).
    fn set(&self, key: &str, value: V, ttl_secs: u64) -> impl Future<Output = Result<()>> + Send;

    /// Deletes all listed keys. Missing keys are not an error.
    fn delete(&self, keys: &[String]) -> impl Future<Output = Result<()>> + Send;

    /// Executes a batch of write operations in one round trip.
    ///
    /// A failure fails the whole batch; no partial-commit guarantees are
    /// assumed by callers.
    fn pipeline(&self, ops: Vec<StoreOp<V>>) -> impl Future<Output = Result<()>> + Send;

    /// Adds `member` with `score` to the ordered set at `key`.
    fn zadd(&self, key: &str, score: f64, member: &str)
        -> impl Future<Output = Result<()>> + Send;

    /// Returns the members of the ordered set at `key` whose score lies
    /// in `[min, max]`, ordered by score then member.
    fn zrange_by_score(
        &self,
        key: &str,
        min: f64,
        max: f64,
    ) -> impl Future<Output = Result<Vec<String>>> + Send;

    /// Removes the listed members from the ordered set at `key`.
    fn zrem(&self, key: &str, members: &[String]) -> impl Future<Output = Result<()>> + Send;

    /// Resets the expiry of `key`. A no-op for missing keys.
    fn expire(&self, key: &str, ttl_secs: u64) -> impl Future<Output = Result<()>> + Send;
}
