pub mod entry;
pub mod memory;

pub use entry::{now_millis, Entry};
pub use memory::MemoryStorage;

use bytes::Bytes;

/// Keyspace operations. Every method takes `&self`: implementations are shared
/// between connections and guard their own state.
pub trait Storage {
    fn get(&self, key: &[u8]) -> Option<Bytes>;
    fn set(&self, key: Bytes, value: Bytes);
    /// `ttl_millis <= 0` stores an entry that is already expired.
    fn set_with_expiry(&self, key: Bytes, value: Bytes, ttl_millis: i64);
    fn has(&self, key: &[u8]) -> bool;
    fn delete(&self, key: &[u8]) -> bool;
}
