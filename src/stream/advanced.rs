//! Advanced adapters: flat_map (lazy nested streams), sorted (full materialization)
use std::cmp::Ordering;
use std::rc::Rc;

use super::core::Pipeline;
use crate::cursor::{BoxCursor, Characteristics, Cursor};
use crate::error::{StreamError, StreamResult};
use crate::stream_configuration::StreamConfig;
use crate::termination::Termination;

// ================================
// FlatMap
// ================================

struct Nested<U> {
    root: Rc<Termination>,
    cursor: Option<BoxCursor<U>>,
}

/// Expands every upstream element into a nested pipeline and drains those one
/// at a time. A nested pipeline is closed as soon as it runs dry.
pub(crate) struct FlatMap<C, F, U> {
    upstream: C,
    f: F,
    active: Option<Nested<U>>,
}

impl<C, F, U> FlatMap<C, F, U> {
    pub(crate) fn new(upstream: C, f: F) -> Self {
        Self { upstream, f, active: None }
    }
}

impl<C, F, U> Cursor for FlatMap<C, F, U>
where
    C: Cursor,
    F: FnMut(C::Item) -> Pipeline<U>,
    U: 'static,
{
    type Item = U;

    fn try_advance(&mut self) -> StreamResult<Option<U>> {
        loop {
            if let Some(nested) = self.active.as_mut() {
                if let Some(cursor) = nested.cursor.as_mut() {
                    if let Some(item) = cursor.try_advance()? {
                        return Ok(Some(item));
                    }
                }
                if let Some(done) = self.active.take() {
                    log::trace!("closing exhausted nested stream");
                    done.root.close()?;
                }
            }

            match self.upstream.try_advance()? {
                Some(item) => {
                    let mut nested = (self.f)(item);
                    let cursor = nested.begin_terminal()?;
                    self.active = Some(Nested {
                        root: Rc::clone(nested.root()),
                        cursor,
                    });
                }
                None => return Ok(None),
            }
        }
    }

    fn characteristics(&self) -> Characteristics {
        Characteristics::empty()
    }
}

// ================================
// Sorted
// ================================

/// Drains the whole upstream on the first advance, sorts once, then serves
/// from the sorted buffer.
pub struct Sorted<C: Cursor, F> {
    pub(crate) upstream: C,
    pub(crate) compare: F,
    pub(crate) config: StreamConfig,
    pub(crate) ordered: Option<std::vec::IntoIter<C::Item>>,
}

impl<C: Cursor, F> Sorted<C, F>
where
    F: FnMut(&C::Item, &C::Item) -> Option<Ordering>,
{
    pub fn new(upstream: C, compare: F, config: StreamConfig) -> Self {
        Self { upstream, compare, config, ordered: None }
    }

    fn materialize(&mut self) -> StreamResult<std::vec::IntoIter<C::Item>> {
        let mut buffer = Vec::with_capacity(self.config.capacity_for(self.upstream.exact_size()));
        while let Some(item) = self.upstream.try_advance()? {
            buffer.push(item);
        }

        let compare = &mut self.compare;
        // Catch the common cases (NaN-like values) before the sort sees them.
        for (i, item) in buffer.iter().enumerate() {
            let next = buffer.get(i + 1).unwrap_or(item);
            if compare(item, item).is_none() || compare(item, next).is_none() {
                return Err(StreamError::Incomparable(format!("element at position {}", i)));
            }
        }

        let mut incomparable = false;
        let mut order = |a: &C::Item, b: &C::Item| {
            compare(a, b).unwrap_or_else(|| {
                incomparable = true;
                Ordering::Equal
            })
        };
        if self.config.stable_sort {
            buffer = merge_sort_by(buffer, &mut order);
        } else {
            buffer.sort_unstable_by(&mut order);
        }
        if incomparable {
            return Err(StreamError::Incomparable("elements met during sort".to_string()));
        }

        log::trace!("sorted stage buffered {} elements", buffer.len());
        Ok(buffer.into_iter())
    }
}

/// Stable top-down merge sort. Unlike `slice::sort_by` it never panics when
/// `compare` is not a total order; the output is then some permutation of
/// the input.
fn merge_sort_by<T, F>(mut items: Vec<T>, compare: &mut F) -> Vec<T>
where
    F: FnMut(&T, &T) -> Ordering,
{
    if items.len() <= 1 {
        return items;
    }
    let right = items.split_off(items.len() / 2);
    let left = merge_sort_by(items, compare);
    let right = merge_sort_by(right, compare);

    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();
    loop {
        // Ties take from the left run.
        let take_right = match (left.peek(), right.peek()) {
            (Some(l), Some(r)) => compare(r, l) == Ordering::Less,
            _ => break,
        };
        if take_right {
            merged.extend(right.next());
        } else {
            merged.extend(left.next());
        }
    }
    merged.extend(left);
    merged.extend(right);
    merged
}

impl<C, F> Cursor for Sorted<C, F>
where
    C: Cursor,
    F: FnMut(&C::Item, &C::Item) -> Option<Ordering>,
{
    type Item = C::Item;

    fn try_advance(&mut self) -> StreamResult<Option<C::Item>> {
        if self.ordered.is_none() {
            self.ordered = Some(self.materialize()?);
        }
        Ok(self.ordered.as_mut().and_then(|ordered| ordered.next()))
    }

    fn estimate_size(&self) -> u64 {
        match &self.ordered {
            Some(ordered) => ordered.len() as u64,
            None => self.upstream.estimate_size(),
        }
    }

    fn characteristics(&self) -> Characteristics {
        self.upstream.characteristics() | Characteristics::SORTED
    }
}
