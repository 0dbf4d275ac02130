//! In-Process Store Module
//!
//! A single-keyspace key-value store with plain entries, ordered sets and
//! lazy expiration. Backs the demo service and the test suite; a
//! networked store client can replace it behind the same trait.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::error::{CacheError, Result};
use crate::store::entry::StoredEntry;
use crate::store::{KvStore, StoreOp};

// == Payload ==
/// What a keyspace slot holds: a plain value or an ordered set
/// (member -> score).
#[derive(Debug, Clone)]
enum Payload<V> {
    Value(V),
    SortedSet(BTreeMap<String, f64>),
}

type Keyspace<V> = HashMap<String, StoredEntry<Payload<V>>>;

// == Memory Store ==
/// In-process [`KvStore`] implementation.
///
/// One keyspace serves plain entries and ordered sets, so `delete` and
/// `expire` apply uniformly to both. Expired entries are dropped lazily
/// when a read touches them.
#[derive(Debug, Clone)]
pub struct MemoryStore<V> {
    entries: Arc<RwLock<Keyspace<V>>>,
}

impl<V> MemoryStore<V> {
    // == Constructor ==
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    // == Length ==
    /// Returns the number of live (non-expired) entries.
    pub async fn len(&self) -> usize {
        let entries = self.entries.read().await;
        entries.values().filter(|e| !e.is_expired()).count()
    }

    /// Returns true if the store holds no live entries.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl<V> Default for MemoryStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

// == Keyspace Helpers ==
// Shared between the direct trait methods and `pipeline`, which applies
// every operation under one write lock.

fn drop_if_expired<V>(entries: &mut Keyspace<V>, key: &str) {
    if entries.get(key).is_some_and(|e| e.is_expired()) {
        entries.remove(key);
    }
}

fn apply_set<V>(entries: &mut Keyspace<V>, key: String, value: V, ttl_secs: u64) {
    entries.insert(key, StoredEntry::new(Payload::Value(value), Some(ttl_secs)));
}

fn apply_zadd<V>(entries: &mut Keyspace<V>, key: &str, score: f64, member: String) -> Result<()> {
    drop_if_expired(entries, key);
    let entry = entries
        .entry(key.to_string())
        .or_insert_with(|| StoredEntry::new(Payload::SortedSet(BTreeMap::new()), None));
    match &mut entry.payload {
        Payload::SortedSet(members) => {
            members.insert(member, score);
            Ok(())
        }
        Payload::Value(_) => Err(CacheError::Store(format!(
            "value at '{key}' is not an ordered set"
        ))),
    }
}

fn apply_expire<V>(entries: &mut Keyspace<V>, key: &str, ttl_secs: u64) {
    drop_if_expired(entries, key);
    if let Some(entry) = entries.get_mut(key) {
        entry.expire_in(ttl_secs);
    }
}

fn read_value<V: Clone>(entries: &mut Keyspace<V>, key: &str) -> Option<V> {
    drop_if_expired(entries, key);
    match entries.get(key).map(|e| &e.payload) {
        Some(Payload::Value(v)) => Some(v.clone()),
        _ => None,
    }
}

// == KvStore Implementation ==
impl<V> KvStore<V> for MemoryStore<V>
where
    V: Clone + Send + Sync + 'static,
{
    async fn get(&self, key: &str) -> Result<Option<V>> {
        let mut entries = self.entries.write().await;
        Ok(read_value(&mut entries, key))
    }

    async fn multi_get(&self, keys: &[String]) -> Result<Vec<Option<V>>> {
        let mut entries = self.entries.write().await;
        Ok(keys.iter().map(|k| read_value(&mut entries, k)).collect())
    }

    async fn set(&self, key: &str, value: V, ttl_secs: u64) -> Result<()> {
        let mut entries = self.entries.write().await;
        apply_set(&mut entries, key.to_string(), value, ttl_secs);
        Ok(())
    }

    async fn delete(&self, keys: &[String]) -> Result<()> {
        let mut entries = self.entries.write().await;
        for key in keys {
            entries.remove(key);
        }
        Ok(())
    }

    async fn pipeline(&self, ops: Vec<StoreOp<V>>) -> Result<()> {
        let mut entries = self.entries.write().await;
        for op in ops {
            match op {
                StoreOp::SetEx {
                    key,
                    value,
                    ttl_secs,
                } => apply_set(&mut entries, key, value, ttl_secs),
                StoreOp::ZAdd { key, score, member } => {
                    apply_zadd(&mut entries, &key, score, member)?
                }
                StoreOp::Expire { key, ttl_secs } => apply_expire(&mut entries, &key, ttl_secs),
            }
        }
        Ok(())
    }

    async fn zadd(&self, key: &str, score: f64, member: &str) -> Result<()> {
        let mut entries = self.entries.write().await;
        apply_zadd(&mut entries, key, score, member.to_string())
    }

    async fn zrange_by_score(&self, key: &str, min: f64, max: f64) -> Result<Vec<String>> {
        let mut entries = self.entries.write().await;
        drop_if_expired(&mut entries, key);
        match entries.get(key).map(|e| &e.payload) {
            Some(Payload::SortedSet(members)) => {
                let mut selected: Vec<(&String, f64)> = members
                    .iter()
                    .filter(|(_, score)| min <= **score && **score <= max)
                    .map(|(member, score)| (member, *score))
                    .collect();
                selected.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(b.0)));
                Ok(selected
                    .into_iter()
                    .map(|(member, _)| member.clone())
                    .collect())
            }
            Some(Payload::Value(_)) => Err(CacheError::Store(format!(
                "value at '{key}' is not an ordered set"
            ))),
            None => Ok(Vec::new()),
        }
    }

    async fn zrem(&self, key: &str, members: &[String]) -> Result<()> {
        let mut entries = self.entries.write().await;
        drop_if_expired(&mut entries, key);
        let emptied = match entries.get_mut(key).map(|e| &mut e.payload) {
            Some(Payload::SortedSet(set)) => {
                for member in members {
                    set.remove(member);
                }
                set.is_empty()
            }
            Some(Payload::Value(_)) => {
                return Err(CacheError::Store(format!(
                    "value at '{key}' is not an ordered set"
                )))
            }
            None => false,
        };
        if emptied {
            entries.remove(key);
        }
        Ok(())
    }

    async fn expire(&self, key: &str, ttl_secs: u64) -> Result<()> {
        let mut entries = self.entries.write().await;
        apply_expire(&mut entries, key, ttl_secs);
        Ok(())
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_set_and_get() {
        let store = MemoryStore::new();

        store.set("key1", "value1".to_string(), 300).await.unwrap();
        let value = store.get("key1").await.unwrap();

        assert_eq!(value, Some("value1".to_string()));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let store: MemoryStore<String> = MemoryStore::new();

        assert_eq!(store.get("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let store = MemoryStore::new();

        store.set("key1", "value1".to_string(), 300).await.unwrap();
        store.set("key1", "value2".to_string(), 300).await.unwrap();

        assert_eq!(store.get("key1").await.unwrap(), Some("value2".to_string()));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_entry_expires() {
        let store = MemoryStore::new();

        store.set("key1", "value1".to_string(), 1).await.unwrap();
        assert!(store.get("key1").await.unwrap().is_some());

        tokio::time::sleep(Duration::from_millis(1100)).await;

        assert_eq!(store.get("key1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_multi_get_preserves_order() {
        let store = MemoryStore::new();

        store.set("a", "1".to_string(), 300).await.unwrap();
        store.set("c", "3".to_string(), 300).await.unwrap();

        let keys = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let values = store.multi_get(&keys).await.unwrap();

        assert_eq!(
            values,
            vec![Some("1".to_string()), None, Some("3".to_string())]
        );
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = MemoryStore::new();

        store.set("key1", "value1".to_string(), 300).await.unwrap();
        let keys = vec!["key1".to_string()];
        store.delete(&keys).await.unwrap();
        store.delete(&keys).await.unwrap();

        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_zadd_and_zrange() {
        let store: MemoryStore<String> = MemoryStore::new();

        store.zadd("index", 0.0, "k:2").await.unwrap();
        store.zadd("index", 0.0, "k:1").await.unwrap();
        store.zadd("index", 1.0, "k:3").await.unwrap();

        let members = store.zrange_by_score("index", 0.0, 0.0).await.unwrap();
        assert_eq!(members, vec!["k:1".to_string(), "k:2".to_string()]);

        let all = store.zrange_by_score("index", 0.0, 1.0).await.unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn test_zrange_missing_set_is_empty() {
        let store: MemoryStore<String> = MemoryStore::new();

        let members = store.zrange_by_score("missing", 0.0, 0.0).await.unwrap();
        assert!(members.is_empty());
    }

    #[tokio::test]
    async fn test_zrem_drops_empty_set() {
        let store: MemoryStore<String> = MemoryStore::new();

        store.zadd("index", 0.0, "member").await.unwrap();
        store.zrem("index", &["member".to_string()]).await.unwrap();

        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_zadd_on_plain_value_errors() {
        let store = MemoryStore::new();

        store.set("key1", "value1".to_string(), 300).await.unwrap();
        let result = store.zadd("key1", 0.0, "member").await;

        assert!(matches!(result, Err(CacheError::Store(_))));
    }

    #[tokio::test]
    async fn test_pipeline_applies_all_ops() {
        let store = MemoryStore::new();

        let ops = vec![
            StoreOp::SetEx {
                key: "k:1".to_string(),
                value: "v1".to_string(),
                ttl_secs: 300,
            },
            StoreOp::SetEx {
                key: "k:2".to_string(),
                value: "v2".to_string(),
                ttl_secs: 300,
            },
            StoreOp::ZAdd {
                key: "index".to_string(),
                score: 0.0,
                member: "k:1".to_string(),
            },
            StoreOp::Expire {
                key: "index".to_string(),
                ttl_secs: 360,
            },
        ];
        store.pipeline(ops).await.unwrap();

        assert_eq!(store.get("k:1").await.unwrap(), Some("v1".to_string()));
        assert_eq!(store.get("k:2").await.unwrap(), Some("v2".to_string()));
        let members = store.zrange_by_score("index", 0.0, 0.0).await.unwrap();
        assert_eq!(members, vec!["k:1".to_string()]);
    }

    #[tokio::test]
    async fn test_expire_refreshes_entry() {
        let store = MemoryStore::new();

        store.set("key1", "value1".to_string(), 1).await.unwrap();
        store.expire("key1", 300).await.unwrap();

        tokio::time::sleep(Duration::from_millis(1100)).await;

        assert!(store.get("key1").await.unwrap().is_some());
    }
}
