//! A bounded, storage-backed ring buffer, grounded in the teacher's own
//! `circular_buffer` package: one `Item`-like metadata slot (head/len/
//! capacity) plus a `Map` of numbered slots, with old entries overwritten
//! in place once the buffer fills rather than growing unbounded.
//!
//! Used for the DEX's per-pool recent-trade cache (spec.md §4.1 MEV guard:
//! "bounded recent-trade cache per pool (size <=100, TTL <=1000 blocks)")
//! and, optionally, an oracle rolling-price window (spec.md §4.2 circuit
//! breaker / diversity rolling windows).

pub mod error;

use cosmwasm_std::{StdResult, Storage};
use cw_storage_plus::Map;
use error::BufferError;
use schemars::JsonSchema;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, JsonSchema)]
pub struct BufferMeta {
    pub head: u64,
    pub len: u64,
    pub capacity: u64,
}

/// A ring buffer of `T`, scoped at call time by an arbitrary byte key (a
/// pool id, an asset name, ...) so one `const` descriptor can back many
/// independent rings, the same way the teacher scopes `Map` entries by a
/// pair address.
pub struct CircularBuffer<T> {
    meta: Map<'static, &'static [u8], BufferMeta>,
    slots: Map<'static, (&'static [u8], u64), T>,
}

impl<T> CircularBuffer<T>
where
    T: Serialize + DeserializeOwned,
{
    pub const fn new(meta_namespace: &'static str, slots_namespace: &'static str) -> Self {
        Self {
            meta: Map::new(meta_namespace),
            slots: Map::new(slots_namespace),
        }
    }

    /// Initializes (or resets) the ring for `scope` with the given
    /// capacity. Idempotent: calling it again clears the ring.
    pub fn init(
        &self,
        storage: &mut dyn Storage,
        scope: &[u8],
        capacity: u64,
    ) -> Result<(), BufferError> {
        if capacity == 0 {
            return Err(BufferError::ZeroCapacity {});
        }
        self.meta.save(
            storage,
            scope,
            &BufferMeta {
                head: 0,
                len: 0,
                capacity,
            },
        )?;
        Ok(())
    }

    fn load_meta(&self, storage: &dyn Storage, scope: &[u8]) -> Result<BufferMeta, BufferError> {
        self.meta
            .may_load(storage, scope)?
            .ok_or(BufferError::NotInitialized {})
    }

    /// Pushes an entry, overwriting the oldest slot once the ring is full.
    pub fn push(&self, storage: &mut dyn Storage, scope: &[u8], item: T) -> Result<(), BufferError> {
        let mut meta = self.load_meta(storage, scope)?;
        let slot = meta.head;
        self.slots.save(storage, (scope, slot), &item)?;
        meta.head = (meta.head + 1) % meta.capacity;
        meta.len = (meta.len + 1).min(meta.capacity);
        self.meta.save(storage, scope, &meta)?;
        Ok(())
    }

    /// Returns every live entry for `scope`, oldest first. Returns an
    /// empty vector (not an error) for a never-initialized scope, since a
    /// pool with no trades yet is a normal state, not a bug.
    pub fn entries(&self, storage: &dyn Storage, scope: &[u8]) -> StdResult<Vec<T>> {
        let meta = match self.meta.may_load(storage, scope)? {
            Some(m) => m,
            None => return Ok(Vec::new()),
        };
        let mut out = Vec::with_capacity(meta.len as usize);
        let start = if meta.len < meta.capacity {
            0
        } else {
            meta.head
        };
        for i in 0..meta.len {
            let slot = (start + i) % meta.capacity;
            if let Some(v) = self.slots.may_load(storage, (scope, slot))? {
                out.push(v);
            }
        }
        Ok(out)
    }

    pub fn clear(&self, storage: &mut dyn Storage, scope: &[u8]) -> Result<(), BufferError> {
        let meta = self.load_meta(storage, scope)?;
        self.meta.save(
            storage,
            scope,
            &BufferMeta {
                head: 0,
                len: 0,
                capacity: meta.capacity,
            },
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmwasm_std::testing::MockStorage;

    const RING: CircularBuffer<u32> = CircularBuffer::new("ring_meta", "ring_slots");

    #[test]
    fn wraps_around_once_full() {
        let mut storage = MockStorage::new();
        RING.init(&mut storage, b"scope-a", 3).unwrap();
        for v in [1, 2, 3, 4, 5] {
            RING.push(&mut storage, b"scope-a", v).unwrap();
        }
        // capacity 3, pushed 1..=5: the ring should hold the last 3 values
        // in insertion order: [3, 4, 5]
        assert_eq!(RING.entries(&storage, b"scope-a").unwrap(), vec![3, 4, 5]);
    }

    #[test]
    fn scopes_are_independent() {
        let mut storage = MockStorage::new();
        RING.init(&mut storage, b"pool-1", 2).unwrap();
        RING.init(&mut storage, b"pool-2", 2).unwrap();
        RING.push(&mut storage, b"pool-1", 10).unwrap();
        RING.push(&mut storage, b"pool-2", 20).unwrap();
        assert_eq!(RING.entries(&storage, b"pool-1").unwrap(), vec![10]);
        assert_eq!(RING.entries(&storage, b"pool-2").unwrap(), vec![20]);
    }

    #[test]
    fn uninitialized_scope_reads_empty_but_push_errors() {
        let mut storage = MockStorage::new();
        assert_eq!(RING.entries(&storage, b"never").unwrap(), Vec::<u32>::new());
        assert_eq!(
            RING.push(&mut storage, b"never", 1).unwrap_err(),
            BufferError::NotInitialized {}
        );
    }
}
