//! Key Codec Module
//!
//! Deterministic mapping from typed logical keys to namespaced string
//! cache keys.

use std::sync::Arc;

use crate::cache::{KEY_SEPARATOR, KNOWN_KEYS_SUFFIX};
use crate::error::{CacheError, Result};

/// Pluggable logical-key-to-string generator.
///
/// Must be injective within a prefix: distinct logical keys have to
/// produce distinct strings.
pub type KeyGenerator<K> = Arc<dyn Fn(&K) -> String + Send + Sync>;

// == Key Codec ==
/// Builds cache keys of the form `prefix + ":" + generator(key)` and owns
/// the reserved known-keys index name (`prefix + "$$knownKeys$$"`).
pub struct KeyCodec<K> {
    prefix: String,
    known_keys_name: String,
    generator: KeyGenerator<K>,
}

impl<K> KeyCodec<K> {
    // == Constructors ==
    /// Creates a codec using the key's string representation.
    pub fn new(prefix: impl Into<String>) -> Result<Self>
    where
        K: ToString,
    {
        Self::with_generator(prefix, |key: &K| key.to_string())
    }

    /// Creates a codec with a custom key generator, for keys without a
    /// usable canonical string form.
    pub fn with_generator(
        prefix: impl Into<String>,
        generator: impl Fn(&K) -> String + Send + Sync + 'static,
    ) -> Result<Self> {
        Self::from_parts(prefix.into(), Arc::new(generator))
    }

    pub(crate) fn from_parts(prefix: String, generator: KeyGenerator<K>) -> Result<Self> {
        if prefix.is_empty() {
            return Err(CacheError::InvalidKey(
                "key prefix cannot be empty".to_string(),
            ));
        }
        let known_keys_name = format!("{prefix}{KNOWN_KEYS_SUFFIX}");
        Ok(Self {
            prefix,
            known_keys_name,
            generator,
        })
    }

    // == Accessors ==
    /// The namespace prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The reserved known-keys index name for this namespace.
    pub fn known_keys_name(&self) -> &str {
        &self.known_keys_name
    }

    // == Build Key ==
    /// Maps a logical key to its cache key.
    ///
    /// Rejects keys that would collide with the reserved known-keys
    /// index name.
    pub fn build_key(&self, key: &K) -> Result<String> {
        let generated = (self.generator)(key);
        let cache_key = format!("{}{}{}", self.prefix, KEY_SEPARATOR, generated);
        if generated == KNOWN_KEYS_SUFFIX || cache_key == self.known_keys_name {
            return Err(CacheError::InvalidKey(format!(
                "cache key '{cache_key}' collides with the known-keys index name"
            )));
        }
        Ok(cache_key)
    }

    // == Build Keys ==
    /// Maps a sequence of logical keys, preserving order and duplicates.
    /// One output per input.
    pub fn build_keys(&self, keys: &[K]) -> Result<Vec<String>> {
        keys.iter().map(|key| self.build_key(key)).collect()
    }
}

impl<K> Clone for KeyCodec<K> {
    fn clone(&self) -> Self {
        Self {
            prefix: self.prefix.clone(),
            known_keys_name: self.known_keys_name.clone(),
            generator: Arc::clone(&self.generator),
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_key_format() {
        let codec: KeyCodec<u32> = KeyCodec::new("user").unwrap();

        assert_eq!(codec.build_key(&42).unwrap(), "user:42");
    }

    #[test]
    fn test_build_keys_preserves_order_and_duplicates() {
        let codec: KeyCodec<u32> = KeyCodec::new("user").unwrap();

        let keys = codec.build_keys(&[3, 1, 1, 2]).unwrap();
        assert_eq!(keys, vec!["user:3", "user:1", "user:1", "user:2"]);
    }

    #[test]
    fn test_custom_generator() {
        let codec: KeyCodec<(u32, u32)> =
            KeyCodec::with_generator("pair", |(a, b)| format!("{a}-{b}")).unwrap();

        assert_eq!(codec.build_key(&(1, 2)).unwrap(), "pair:1-2");
    }

    #[test]
    fn test_reserved_name_collision_rejected() {
        let codec: KeyCodec<String> =
            KeyCodec::with_generator("user", |key: &String| key.clone()).unwrap();

        let result = codec.build_key(&KNOWN_KEYS_SUFFIX.to_string());
        assert!(matches!(result, Err(CacheError::InvalidKey(_))));
    }

    #[test]
    fn test_empty_prefix_rejected() {
        let result: Result<KeyCodec<u32>> = KeyCodec::new("");
        assert!(matches!(result, Err(CacheError::InvalidKey(_))));
    }

    #[test]
    fn test_known_keys_name() {
        let codec: KeyCodec<u32> = KeyCodec::new("user").unwrap();

        assert_eq!(codec.known_keys_name(), "user$$knownKeys$$");
    }
}
