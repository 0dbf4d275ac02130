//! Loader Module
//!
//! Contract for the authoritative data source behind the cache.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;

use crate::error::Result;

// == Multi Loader Contract ==
/// Batch-capable loader invoked on cache misses.
///
/// `load` is the single required operation; the single-key convenience is
/// derived from it so the two paths cannot diverge. Implementations may
/// omit keys they cannot resolve and must not return keys that were not
/// requested. Errors abort the whole surrounding load call.
pub trait MultiLoader<K, V>: Send + Sync
where
    K: Eq + Hash + Send + Sync,
    V: Send + Sync,
{
    /// Loads values for the given keys from the authoritative source.
    fn load(&self, keys: &[K]) -> impl Future<Output = Result<HashMap<K, V>>> + Send;

    /// Derived single-key load: `load([key])` followed by a lookup.
    /// Returns `None` when the loader cannot resolve the key.
    fn load_one(&self, key: &K) -> impl Future<Output = Result<Option<V>>> + Send {
        async move {
            let mut loaded = self.load(std::slice::from_ref(key)).await?;
            Ok(loaded.remove(key))
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    struct EvenLoader;

    impl MultiLoader<u32, String> for EvenLoader {
        async fn load(&self, keys: &[u32]) -> Result<HashMap<u32, String>> {
            Ok(keys
                .iter()
                .filter(|k| *k % 2 == 0)
                .map(|k| (*k, format!("value:{k}")))
                .collect())
        }
    }

    #[tokio::test]
    async fn test_load_one_resolves_via_batch() {
        let loader = EvenLoader;

        let value = loader.load_one(&4).await.unwrap();
        assert_eq!(value, Some("value:4".to_string()));
    }

    #[tokio::test]
    async fn test_load_one_absent_for_unresolvable_key() {
        let loader = EvenLoader;

        let value = loader.load_one(&3).await.unwrap();
        assert_eq!(value, None);
    }
}
