//! Batch Cache Module
//!
//! Read-through orchestration over a [`KvStore`]: partitioned multi-get,
//! hit/miss partitioning, batched loader write-back, pipelined puts with
//! TTL jitter, and bulk invalidation through the known-keys index.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tracing::debug;

use crate::cache::key::{KeyCodec, KeyGenerator};
use crate::cache::loader::MultiLoader;
use crate::cache::{BATCH_PARTITION_SIZE, TTL_JITTER_SECS};
use crate::error::{CacheError, Result};
use crate::store::{KvStore, StoreOp};

// == Known-Keys Capability ==
/// Per-namespace bookkeeping of cache keys believed live, selected at
/// construction. The index is a best-effort hint set: store-level expiry
/// does not prune it, so members may outlive their entries.
enum KnownKeys {
    Maintained { index_key: String },
    Disabled,
}

impl KnownKeys {
    /// Index maintenance operations appended to a put pipeline: one zadd
    /// per written key plus a refresh of the index's own expiry, so the
    /// index outlives every member written in the batch.
    fn put_ops<V>(&self, members: &[String], index_ttl_secs: u64) -> Vec<StoreOp<V>> {
        match self {
            KnownKeys::Disabled => Vec::new(),
            KnownKeys::Maintained { index_key } => {
                let mut ops: Vec<StoreOp<V>> = members
                    .iter()
                    .map(|member| StoreOp::ZAdd {
                        key: index_key.clone(),
                        score: 0.0,
                        member: member.clone(),
                    })
                    .collect();
                ops.push(StoreOp::Expire {
                    key: index_key.clone(),
                    ttl_secs: index_ttl_secs,
                });
                ops
            }
        }
    }

    /// Removes evicted members from the index.
    async fn forget<V, S>(&self, store: &S, members: &[String]) -> Result<()>
    where
        V: Clone + Send + Sync + 'static,
        S: KvStore<V>,
    {
        match self {
            KnownKeys::Disabled => Ok(()),
            KnownKeys::Maintained { index_key } => store.zrem(index_key, members).await,
        }
    }

    fn require_index(&self) -> Result<&str> {
        match self {
            KnownKeys::Maintained { index_key } => Ok(index_key),
            KnownKeys::Disabled => Err(CacheError::Unsupported(
                "evict_all requires known-keys maintenance to be enabled".to_string(),
            )),
        }
    }
}

// == Batch Cache ==
/// Read-through, batch-capable cache in front of a [`KvStore`] and a
/// [`MultiLoader`].
///
/// Stateless façade: all configuration is frozen at construction and the
/// only suspension points are store round trips and loader invocations.
/// Safe to share behind an `Arc` across concurrent callers; consistency
/// is at-most last-write-wins per key.
pub struct BatchCache<K, V, S, L> {
    codec: KeyCodec<K>,
    store: Arc<S>,
    loader: L,
    time_to_live: Duration,
    known_keys: KnownKeys,
    _value: PhantomData<fn() -> V>,
}

impl<K, V, S, L> BatchCache<K, V, S, L>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: Clone + Send + Sync + 'static,
    S: KvStore<V>,
    L: MultiLoader<K, V>,
{
    // == Builder ==
    /// Starts building a cache for the given namespace prefix, store and
    /// loader.
    pub fn builder(prefix: impl Into<String>, store: S, loader: L) -> CacheBuilder<K, V, S, L> {
        CacheBuilder {
            prefix: prefix.into(),
            store,
            loader,
            time_to_live: None,
            key_generator: None,
            maintain_known_keys: true,
            _value: PhantomData,
        }
    }

    /// The namespace prefix this cache writes under.
    pub fn prefix(&self) -> &str {
        self.codec.prefix()
    }

    // == Get If Present ==
    /// Returns the cached value for `key`, or `None`. Never invokes the
    /// loader.
    pub async fn get_if_present(&self, key: &K) -> Result<Option<V>> {
        let cache_key = self.codec.build_key(key)?;
        self.store.get(&cache_key).await
    }

    /// Returns the cached values for `keys`, containing only the keys
    /// that were present. Never invokes the loader.
    pub async fn multi_get_if_present(&self, keys: &[K]) -> Result<HashMap<K, V>> {
        self.fetch(keys, false).await
    }

    // == Get Or Load ==
    /// Returns the cached value for `key`, loading and caching it on a
    /// miss. `None` when the loader cannot resolve the key either.
    ///
    /// No stampede protection: concurrent calls for the same missing key
    /// may each invoke the loader and each write back; last write wins.
    pub async fn get_or_load(&self, key: &K) -> Result<Option<V>> {
        let cache_key = self.codec.build_key(key)?;
        if let Some(hit) = self.store.get(&cache_key).await? {
            return Ok(Some(hit));
        }
        let loaded = self.loader.load_one(key).await?;
        if let Some(value) = &loaded {
            self.put(key, value).await?;
        }
        Ok(loaded)
    }

    /// Returns the cached values for `keys`, batch-loading the misses.
    ///
    /// Missed keys are collected in first-seen order, deduplicated, and
    /// passed to the loader in a single call; the loader is not invoked
    /// when there are no misses. Keys the loader omits are absent from
    /// the result. Same write-race caveat as [`Self::get_or_load`].
    pub async fn multi_get_or_load(&self, keys: &[K]) -> Result<HashMap<K, V>> {
        self.fetch(keys, true).await
    }

    async fn fetch(&self, keys: &[K], load_if_absent: bool) -> Result<HashMap<K, V>> {
        let cache_keys = self.codec.build_keys(keys)?;

        // Values come back in request order, one slot per requested key.
        let mut values = Vec::with_capacity(cache_keys.len());
        for partition in cache_keys.chunks(BATCH_PARTITION_SIZE) {
            values.extend(self.store.multi_get(partition).await?);
        }

        let mut found = HashMap::with_capacity(keys.len());
        let mut missed: Vec<K> = Vec::new();
        let mut missed_seen: HashSet<&K> = HashSet::new();
        for (key, value) in keys.iter().zip(values) {
            match value {
                Some(v) => {
                    found.insert(key.clone(), v);
                }
                None => {
                    if missed_seen.insert(key) {
                        missed.push(key.clone());
                    }
                }
            }
        }
        debug!(
            requested = keys.len(),
            hits = found.len(),
            misses = missed.len(),
            "cache lookup"
        );

        if load_if_absent && !missed.is_empty() {
            let loaded = self.loader.load(&missed).await?;
            self.put_all(&loaded).await?;
            found.extend(loaded);
        }

        Ok(found)
    }

    // == Put ==
    /// Caches `value` under `key` with the configured TTL plus jitter.
    pub async fn put(&self, key: &K, value: &V) -> Result<()> {
        let cache_key = self.codec.build_key(key)?;
        self.write_entries(vec![(cache_key, value.clone())]).await
    }

    /// Caches every entry of `entries` in one pipelined round trip.
    /// A pipeline failure fails the whole batch.
    pub async fn put_all(&self, entries: &HashMap<K, V>) -> Result<()> {
        if entries.is_empty() {
            return Ok(());
        }
        let mut batch = Vec::with_capacity(entries.len());
        for (key, value) in entries {
            batch.push((self.codec.build_key(key)?, value.clone()));
        }
        self.write_entries(batch).await
    }

    async fn write_entries(&self, entries: Vec<(String, V)>) -> Result<()> {
        // One jitter sample per batch spreads expiry storms across puts
        // while keeping a batch internally coherent.
        let entry_ttl = self.time_to_live.as_secs() + rand::rng().random_range(0..TTL_JITTER_SECS);
        let mut members = Vec::with_capacity(entries.len());
        let mut ops = Vec::with_capacity(entries.len() * 2 + 1);
        for (cache_key, value) in entries {
            members.push(cache_key.clone());
            ops.push(StoreOp::SetEx {
                key: cache_key,
                value,
                ttl_secs: entry_ttl,
            });
        }
        ops.extend(
            self.known_keys
                .put_ops(&members, self.time_to_live.as_secs() + TTL_JITTER_SECS),
        );
        debug!(
            entries = members.len(),
            ttl_secs = entry_ttl,
            "writing cache entries"
        );
        self.store.pipeline(ops).await
    }

    // == Evict ==
    /// Removes `key` from the cache. Missing keys are a no-op.
    pub async fn evict(&self, key: &K) -> Result<()> {
        let cache_keys = vec![self.codec.build_key(key)?];
        self.store.delete(&cache_keys).await?;
        self.known_keys
            .forget::<V, S>(self.store.as_ref(), &cache_keys)
            .await
    }

    /// Removes every listed key from the cache. Missing keys are a
    /// no-op.
    pub async fn evict_many(&self, keys: &[K]) -> Result<()> {
        if keys.is_empty() {
            return Ok(());
        }
        let cache_keys = self.codec.build_keys(keys)?;
        self.store.delete(&cache_keys).await?;
        self.known_keys
            .forget::<V, S>(self.store.as_ref(), &cache_keys)
            .await
    }

    // == Evict All ==
    /// Removes every key listed in the known-keys index, plus the index
    /// itself.
    ///
    /// The index is best effort: naturally expired members are deleted
    /// again harmlessly, and a put racing the index read may survive or
    /// be swept depending on interleaving. Fails with
    /// [`CacheError::Unsupported`] when the cache was built with
    /// known-keys maintenance disabled.
    pub async fn evict_all(&self) -> Result<()> {
        let index_key = self.known_keys.require_index()?;
        let members = self.store.zrange_by_score(index_key, 0.0, 0.0).await?;
        debug!(members = members.len(), "evicting namespace");
        if !members.is_empty() {
            self.store.delete(&members).await?;
        }
        let index = vec![index_key.to_string()];
        self.store.delete(&index).await
    }
}

// == Cache Builder ==
/// Builds a [`BatchCache`], validating the configuration and freezing it
/// into an immutable instance.
pub struct CacheBuilder<K, V, S, L> {
    prefix: String,
    store: S,
    loader: L,
    time_to_live: Option<Duration>,
    key_generator: Option<KeyGenerator<K>>,
    maintain_known_keys: bool,
    _value: PhantomData<fn() -> V>,
}

impl<K, V, S, L> CacheBuilder<K, V, S, L>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: Clone + Send + Sync + 'static,
    S: KvStore<V>,
    L: MultiLoader<K, V>,
{
    /// Base time-to-live for cached entries. Required, non-zero.
    pub fn time_to_live(mut self, ttl: Duration) -> Self {
        self.time_to_live = Some(ttl);
        self
    }

    /// Custom logical-key-to-string generator. Defaults to the key's
    /// string representation.
    pub fn key_generator(
        mut self,
        generator: impl Fn(&K) -> String + Send + Sync + 'static,
    ) -> Self {
        self.key_generator = Some(Arc::new(generator));
        self
    }

    /// Whether to maintain the known-keys index (default true). When
    /// disabled, `evict_all` is unavailable and puts skip the per-entry
    /// index bookkeeping.
    pub fn maintain_known_keys(mut self, maintain: bool) -> Self {
        self.maintain_known_keys = maintain;
        self
    }

    /// Validates the configuration and builds the cache.
    pub fn build(self) -> Result<BatchCache<K, V, S, L>>
    where
        K: ToString,
    {
        let time_to_live = self.time_to_live.ok_or_else(|| {
            CacheError::InvalidKey("time_to_live is required".to_string())
        })?;
        if time_to_live.is_zero() {
            return Err(CacheError::InvalidKey(
                "time_to_live must be non-zero".to_string(),
            ));
        }
        let codec = match self.key_generator {
            Some(generator) => KeyCodec::from_parts(self.prefix, generator)?,
            None => KeyCodec::new(self.prefix)?,
        };
        let known_keys = if self.maintain_known_keys {
            KnownKeys::Maintained {
                index_key: codec.known_keys_name().to_string(),
            }
        } else {
            KnownKeys::Disabled
        };
        Ok(BatchCache {
            codec,
            store: Arc::new(self.store),
            loader: self.loader,
            time_to_live,
            known_keys,
            _value: PhantomData,
        })
    }
}
