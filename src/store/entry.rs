//! Stored Entry Module
//!
//! Expiry bookkeeping for entries held by the in-process store.

use std::time::{SystemTime, UNIX_EPOCH};

// == Stored Entry ==
/// A payload with an optional expiration timestamp.
#[derive(Debug, Clone)]
pub(crate) struct StoredEntry<P> {
    /// The stored payload
    pub payload: P,
    /// Expiration timestamp (Unix milliseconds), None = no expiration
    pub expires_at: Option<u64>,
}

impl<P> StoredEntry<P> {
    // == Constructor ==
    /// Creates a new entry with an optional TTL in seconds.
    pub fn new(payload: P, ttl_secs: Option<u64>) -> Self {
        let expires_at = ttl_secs.map(|ttl| current_timestamp_ms() + ttl * 1000);
        Self {
            payload,
            expires_at,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// Boundary condition: an entry is expired when the current time is
    /// greater than or equal to the expiration time.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires) => current_timestamp_ms() >= expires,
            None => false,
        }
    }

    // == Expire In ==
    /// Resets the expiry to `ttl_secs` from now.
    pub fn expire_in(&mut self, ttl_secs: u64) {
        self.expires_at = Some(current_timestamp_ms() + ttl_secs * 1000);
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub(crate) fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as u64
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration;

    #[test]
    fn test_entry_creation_no_ttl() {
        let entry = StoredEntry::new("payload", None);

        assert_eq!(entry.payload, "payload");
        assert!(entry.expires_at.is_none());
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_entry_creation_with_ttl() {
        let entry = StoredEntry::new("payload", Some(60));

        assert!(entry.expires_at.is_some());
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_entry_expiration() {
        let entry = StoredEntry::new("payload", Some(1));

        assert!(!entry.is_expired());

        sleep(Duration::from_millis(1100));

        assert!(entry.is_expired());
    }

    #[test]
    fn test_expire_in_extends_lifetime() {
        let mut entry = StoredEntry::new("payload", Some(1));
        entry.expire_in(60);

        sleep(Duration::from_millis(1100));

        assert!(!entry.is_expired());
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let entry = StoredEntry {
            payload: "payload",
            expires_at: Some(current_timestamp_ms()),
        };

        assert!(entry.is_expired(), "Entry should be expired at boundary");
    }
}
