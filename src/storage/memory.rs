use super::{now_millis, Entry, Storage};
use bytes::Bytes;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// The process-wide keyspace.
///
/// Cloning is cheap and every clone refers to the same map. All access goes
/// through one mutex, held only for the duration of a single operation.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    storage: Arc<Mutex<HashMap<Bytes, Entry>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, including expired ones not yet evicted.
    pub fn len(&self) -> usize {
        self.storage.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.lock().is_empty()
    }

    /// Pre-populate the keyspace before any client connects.
    pub fn seed<I, K, V>(&self, pairs: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Bytes>,
        V: Into<Bytes>,
    {
        let mut storage = self.storage.lock();
        for (key, value) in pairs {
            storage.insert(key.into(), Entry::new(value.into()));
        }
    }

    /// Evict every expired entry and return how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = now_millis();
        let mut storage = self.storage.lock();
        let before = storage.len();
        storage.retain(|_, entry| !entry.is_expired_at(now));
        before - storage.len()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &[u8]) -> Option<Bytes> {
        log::debug!("Getting value for key '{}'", String::from_utf8_lossy(key));
        let now = now_millis();
        let mut storage = self.storage.lock();
        match storage.get(key) {
            Some(entry) if !entry.is_expired_at(now) => return Some(entry.value.clone()),
            Some(_) => {}
            None => return None,
        }
        log::debug!("Key '{}' has expired", String::from_utf8_lossy(key));
        storage.remove(key);
        None
    }

    fn set(&self, key: Bytes, value: Bytes) {
        log::debug!("Setting key '{}'", String::from_utf8_lossy(&key));
        self.storage.lock().insert(key, Entry::new(value));
    }

    fn set_with_expiry(&self, key: Bytes, value: Bytes, ttl_millis: i64) {
        log::debug!(
            "Setting key '{}' with expiry in {}ms",
            String::from_utf8_lossy(&key),
            ttl_millis
        );
        let entry = Entry::with_ttl(value, ttl_millis, now_millis());
        self.storage.lock().insert(key, entry);
    }

    fn has(&self, key: &[u8]) -> bool {
        self.get(key).is_some()
    }

    fn delete(&self, key: &[u8]) -> bool {
        log::debug!("Deleting key '{}'", String::from_utf8_lossy(key));
        let now = now_millis();
        self.storage
            .lock()
            .remove(key)
            .is_some_and(|entry| !entry.is_expired_at(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    fn b(s: &str) -> Bytes {
        Bytes::copy_from_slice(s.as_bytes())
    }

    #[test]
    fn unset_key_is_a_miss() {
        let store = MemoryStorage::new();
        assert_eq!(store.get(b"missing"), None);
        assert!(!store.has(b"missing"));
    }

    #[test]
    fn set_then_get() {
        let store = MemoryStorage::new();
        store.set(b("foo"), b("bar"));
        assert_eq!(store.get(b"foo"), Some(b("bar")));
        assert!(store.has(b"foo"));
    }

    #[test]
    fn overwrite_returns_latest_value() {
        let store = MemoryStorage::new();
        store.set_with_expiry(b("foo"), b("v1"), 10_000);
        store.set(b("foo"), b("v2"));
        assert_eq!(store.get(b"foo"), Some(b("v2")));
    }

    #[test]
    fn overwrite_drops_old_expiry() {
        let store = MemoryStorage::new();
        store.set_with_expiry(b("foo"), b("v1"), 0);
        store.set(b("foo"), b("v2"));
        assert_eq!(store.get(b"foo"), Some(b("v2")));
    }

    #[test]
    fn non_positive_ttl_is_an_immediate_miss() {
        let store = MemoryStorage::new();
        store.set_with_expiry(b("zero"), b("v"), 0);
        store.set_with_expiry(b("negative"), b("v"), -100);
        assert_eq!(store.get(b"zero"), None);
        assert!(!store.has(b"negative"));
    }

    #[test]
    fn value_expires_after_ttl() {
        let store = MemoryStorage::new();
        store.set_with_expiry(b("foo"), b("bar"), 100);
        assert_eq!(store.get(b"foo"), Some(b("bar")));
        thread::sleep(Duration::from_millis(150));
        assert_eq!(store.get(b"foo"), None);
        // The read evicted it.
        assert!(store.is_empty());
    }

    #[test]
    fn delete_reports_only_live_entries() {
        let store = MemoryStorage::new();
        store.set(b("live"), b("v"));
        store.set_with_expiry(b("dead"), b("v"), -1);
        assert!(store.delete(b"live"));
        assert!(!store.delete(b"live"));
        assert!(!store.delete(b"dead"));
        assert!(store.is_empty());
    }

    #[test]
    fn purge_removes_only_expired() {
        let store = MemoryStorage::new();
        store.set(b("keep"), b("v"));
        store.set_with_expiry(b("later"), b("v"), 60_000);
        store.set_with_expiry(b("gone1"), b("v"), 0);
        store.set_with_expiry(b("gone2"), b("v"), -10);
        assert_eq!(store.len(), 4);
        assert_eq!(store.purge_expired(), 2);
        assert_eq!(store.len(), 2);
        assert!(store.has(b"keep"));
        assert!(store.has(b"later"));
    }

    #[test]
    fn seed_inserts_plain_entries() {
        let store = MemoryStorage::new();
        store.seed([("dir", "/tmp/redis"), ("dbfilename", "dump.rdb")]);
        assert_eq!(store.get(b"dir"), Some(b("/tmp/redis")));
        assert_eq!(store.get(b"dbfilename"), Some(b("dump.rdb")));
    }

    #[test]
    fn clones_share_the_keyspace() {
        let store = MemoryStorage::new();
        let other = store.clone();
        other.set(b("foo"), b("bar"));
        assert_eq!(store.get(b"foo"), Some(b("bar")));
    }

    #[test]
    fn concurrent_writers_lose_no_keys() {
        let store = MemoryStorage::new();
        let workers: Vec<_> = (0..8)
            .map(|worker| {
                let store = store.clone();
                thread::spawn(move || {
                    for i in 0..500 {
                        let key = Bytes::from(format!("w{}:k{}", worker, i));
                        let value = Bytes::from(format!("v{}", i));
                        store.set(key.clone(), value.clone());
                        assert_eq!(store.get(&key), Some(value));
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }
        assert_eq!(store.len(), 8 * 500);
    }
}
