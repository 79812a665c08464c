//! Map containers the `to_map` collectors can accumulate into
use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};

use indexmap::IndexMap;

use crate::error::StreamResult;

/// A key/value container supporting insert-or-merge.
pub trait KeyedCollection<K, V> {
    /// Insert `value` under `key`, or replace the existing value with
    /// `merge(key, existing, value)`. Existing entries keep their position
    /// in ordered maps.
    fn merge_entry<F>(&mut self, key: K, value: V, merge: F) -> StreamResult<()>
    where
        F: FnOnce(&K, V, V) -> StreamResult<V>;
}

impl<K, V, S> KeyedCollection<K, V> for HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    fn merge_entry<F>(&mut self, key: K, value: V, merge: F) -> StreamResult<()>
    where
        F: FnOnce(&K, V, V) -> StreamResult<V>,
    {
        match self.remove_entry(&key) {
            Some((key, existing)) => {
                let merged = merge(&key, existing, value)?;
                self.insert(key, merged);
            }
            None => {
                self.insert(key, value);
            }
        }
        Ok(())
    }
}

impl<K, V> KeyedCollection<K, V> for BTreeMap<K, V>
where
    K: Ord,
{
    fn merge_entry<F>(&mut self, key: K, value: V, merge: F) -> StreamResult<()>
    where
        F: FnOnce(&K, V, V) -> StreamResult<V>,
    {
        match self.remove_entry(&key) {
            Some((key, existing)) => {
                let merged = merge(&key, existing, value)?;
                self.insert(key, merged);
            }
            None => {
                self.insert(key, value);
            }
        }
        Ok(())
    }
}

impl<K, V, S> KeyedCollection<K, V> for IndexMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    fn merge_entry<F>(&mut self, key: K, value: V, merge: F) -> StreamResult<()>
    where
        F: FnOnce(&K, V, V) -> StreamResult<V>,
    {
        let Some(index) = self.get_index_of(&key) else {
            self.insert(key, value);
            return Ok(());
        };
        if let Some((key, existing)) = self.swap_remove_index(index) {
            let merged = merge(&key, existing, value)?;
            // swap_remove moved the last entry into `index`; put both back.
            let (last, _) = self.insert_full(key, merged);
            self.swap_indices(index, last);
        }
        Ok(())
    }
}
