//! The "staged transaction" / "cached context" pattern of spec.md §5:
//! a buffered write session that commits all changes atomically or
//! discards them in a single step. Every multi-step operation that must be
//! all-or-nothing (the three-step escrow lock/release/refund of spec.md
//! §4.3, the timeout-sweep refund, slashing-plus-record in the oracle) opens
//! one [`Staged`], performs every write against it, then calls
//! [`Staged::commit`] or drops it to discard.
//!
//! This is the teacher's `CosmosMsg::reply`/sub-message all-or-nothing
//! pattern adapted to a setting with no cross-contract call boundary: there
//! is nothing to `reply` to, so the overlay is applied in-process instead of
//! relying on the Wasm host to roll back a failed sub-message.

use std::collections::BTreeMap;
use std::ops::Bound;

use cosmwasm_std::{Order, Record, Storage};

/// A buffered overlay over a parent [`Storage`]. Reads check the overlay
/// first and fall through to the parent; writes only ever touch the
/// overlay. `None` in the overlay means "deleted here", distinct from "not
/// yet touched".
pub struct Staged<'a> {
    base: &'a mut dyn Storage,
    overlay: BTreeMap<Vec<u8>, Option<Vec<u8>>>,
}

impl<'a> Staged<'a> {
    pub fn new(base: &'a mut dyn Storage) -> Self {
        Self {
            base,
            overlay: BTreeMap::new(),
        }
    }

    /// Applies every buffered write to the parent store. Consumes `self`
    /// so a caller cannot accidentally keep writing to a staged context
    /// after deciding to commit it.
    pub fn commit(self) {
        for (key, value) in self.overlay {
            match value {
                Some(v) => self.base.set(&key, &v),
                None => self.base.remove(&key),
            }
        }
    }

    /// Drops every buffered write. Equivalent to just letting `self` go
    /// out of scope, spelled out so call sites can document intent.
    pub fn discard(self) {}

    pub fn is_empty(&self) -> bool {
        self.overlay.is_empty()
    }
}

impl<'a> Storage for Staged<'a> {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        match self.overlay.get(key) {
            Some(Some(v)) => Some(v.clone()),
            Some(None) => None,
            None => self.base.get(key),
        }
    }

    fn range<'b>(
        &'b self,
        start: Option<&[u8]>,
        end: Option<&[u8]>,
        order: Order,
    ) -> Box<dyn Iterator<Item = Record> + 'b> {
        let mut merged: BTreeMap<Vec<u8>, Vec<u8>> = self
            .base
            .range(start, end, Order::Ascending)
            .collect::<BTreeMap<_, _>>();

        let lower = match start {
            Some(s) => Bound::Included(s.to_vec()),
            None => Bound::Unbounded,
        };
        let upper = match end {
            Some(e) => Bound::Excluded(e.to_vec()),
            None => Bound::Unbounded,
        };
        for (key, value) in self.overlay.range((lower, upper)) {
            match value {
                Some(v) => {
                    merged.insert(key.clone(), v.clone());
                }
                None => {
                    merged.remove(key);
                }
            }
        }

        let items: Vec<Record> = match order {
            Order::Ascending => merged.into_iter().collect(),
            Order::Descending => merged.into_iter().rev().collect(),
        };
        Box::new(items.into_iter())
    }

    fn set(&mut self, key: &[u8], value: &[u8]) {
        self.overlay.insert(key.to_vec(), Some(value.to_vec()));
    }

    fn remove(&mut self, key: &[u8]) {
        self.overlay.insert(key.to_vec(), None);
    }
}
