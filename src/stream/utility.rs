//! Pass-through and filtering adapters: peek, distinct
use std::collections::HashSet;
use std::hash::Hash;

use crate::cursor::{Characteristics, Cursor};
use crate::error::StreamResult;
use crate::stream_configuration::StreamConfig;

// Peek
pub struct Peek<C, F> {
    pub(crate) upstream: C,
    pub(crate) action: F,
}

impl<C, F> Cursor for Peek<C, F>
where
    C: Cursor,
    F: FnMut(&C::Item),
{
    type Item = C::Item;

    fn try_advance(&mut self) -> StreamResult<Option<C::Item>> {
        let item = self.upstream.try_advance()?;
        if let Some(item) = &item {
            (self.action)(item);
        }
        Ok(item)
    }

    fn estimate_size(&self) -> u64 {
        self.upstream.estimate_size()
    }

    fn characteristics(&self) -> Characteristics {
        self.upstream.characteristics()
    }
}

// Distinct
/// Keeps the first occurrence of every key, in encounter order, in a single
/// upstream pass. The seen-set grows with the number of distinct keys.
pub struct Distinct<C, K, F> {
    pub(crate) upstream: C,
    pub(crate) key: F,
    pub(crate) seen: HashSet<K>,
}

impl<C, K, F> Distinct<C, K, F>
where
    K: Hash + Eq,
{
    pub fn new(upstream: C, key: F, config: StreamConfig) -> Self {
        Self {
            upstream,
            key,
            seen: HashSet::with_capacity(config.initial_capacity),
        }
    }
}

impl<C, K, F> Cursor for Distinct<C, K, F>
where
    C: Cursor,
    K: Hash + Eq,
    F: FnMut(&C::Item) -> K,
{
    type Item = C::Item;

    fn try_advance(&mut self) -> StreamResult<Option<C::Item>> {
        while let Some(item) = self.upstream.try_advance()? {
            if self.seen.insert((self.key)(&item)) {
                return Ok(Some(item));
            }
        }
        Ok(None)
    }

    fn estimate_size(&self) -> u64 {
        self.upstream.estimate_size()
    }

    fn characteristics(&self) -> Characteristics {
        self.upstream.characteristics().without_size() | Characteristics::DISTINCT
    }
}
