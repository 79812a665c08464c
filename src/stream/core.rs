//! The generic pipeline skeleton shared by the object and primitive engines,
//! plus the position-counting and 1:1 stage adapters.
//!
//! `Stream<T>` and the three primitive engines are thin typed wrappers around
//! `Pipeline<T>`; every stage operation is implemented once here.

use std::cmp::Ordering;
use std::hash::Hash;
use std::mem;
use std::rc::Rc;

use super::advanced::{FlatMap, Sorted};
use super::utility::{Distinct, Peek};
use crate::bridge::CursorIter;
use crate::collector::Collector;
use crate::cursor::{BoxCursor, Characteristics, Cursor, UNKNOWN_SIZE};
use crate::error::{StreamError, StreamResult};
use crate::stream::constructors::{ConcatCursor, EmptyCursor};
use crate::stream_configuration::StreamConfig;
use crate::termination::Termination;

/// What a stage reads from: a composed cursor, or nothing at all.
pub(crate) enum Source<T> {
    Populated(BoxCursor<T>),
    Empty,
}

pub(crate) struct Pipeline<T> {
    root: Rc<Termination>,
    source: Source<T>,
}

fn check_count(value: i64, name: &str) -> StreamResult<u64> {
    u64::try_from(value)
        .map_err(|_| StreamError::IllegalArgument(format!("{} may not be negative", name)))
}

impl<T: 'static> Pipeline<T> {
    pub(crate) fn from_cursor<C>(cursor: C) -> Self
    where
        C: Cursor<Item = T> + 'static,
    {
        Self {
            root: Termination::new(),
            source: Source::Populated(Box::new(cursor)),
        }
    }

    pub(crate) fn empty() -> Self {
        Self {
            root: Termination::new(),
            source: Source::Empty,
        }
    }

    /// Lazily concatenate two pipelines. Both inputs become consumed; closing
    /// the result closes each of them, `a` first.
    pub(crate) fn concat(mut a: Self, mut b: Self) -> StreamResult<Self> {
        let first = a.begin_terminal()?;
        let second = b.begin_terminal()?;
        let result = if first.is_none() && second.is_none() {
            Pipeline::empty()
        } else {
            Pipeline::from_cursor(ConcatCursor::new(first, second))
        };
        let (left, right) = (Rc::clone(&a.root), Rc::clone(&b.root));
        result.root.on_close(move || left.close());
        result.root.on_close(move || right.close());
        Ok(result)
    }

    pub(crate) fn root(&self) -> &Rc<Termination> {
        &self.root
    }

    pub(crate) fn is_empty_source(&self) -> bool {
        matches!(self.source, Source::Empty)
    }

    // ================================
    // Stage construction
    // ================================

    /// Derive a new stage sharing this pipeline's root.
    ///
    /// `wrap` only runs for a populated source; an empty pipeline stays empty
    /// and no user function is touched.
    pub(crate) fn chain<U, C, W>(self, wrap: W) -> StreamResult<Pipeline<U>>
    where
        U: 'static,
        C: Cursor<Item = U> + 'static,
        W: FnOnce(BoxCursor<T>, StreamConfig) -> C,
    {
        self.root.throw_if_terminated()?;
        let source = match self.source {
            Source::Populated(cursor) => {
                Source::Populated(Box::new(wrap(cursor, self.root.config())))
            }
            Source::Empty => Source::Empty,
        };
        Ok(Pipeline { root: self.root, source })
    }

    /// No-op intermediate: validates the pipeline and hands it back.
    pub(crate) fn retain(self) -> StreamResult<Self> {
        self.root.throw_if_terminated()?;
        Ok(self)
    }

    pub(crate) fn filter<F>(self, predicate: F) -> StreamResult<Self>
    where
        F: FnMut(&T) -> bool + 'static,
    {
        self.chain(|upstream, _| Filter { upstream, predicate })
    }

    pub(crate) fn map<U, F>(self, f: F) -> StreamResult<Pipeline<U>>
    where
        U: 'static,
        F: FnMut(T) -> U + 'static,
    {
        self.chain(|upstream, _| Map { upstream, f })
    }

    pub(crate) fn flat_map<U, F>(self, f: F) -> StreamResult<Pipeline<U>>
    where
        U: 'static,
        F: FnMut(T) -> Pipeline<U> + 'static,
    {
        self.chain(|upstream, _| FlatMap::new(upstream, f))
    }

    pub(crate) fn peek<F>(self, action: F) -> StreamResult<Self>
    where
        F: FnMut(&T) + 'static,
    {
        self.chain(|upstream, _| Peek { upstream, action })
    }

    pub(crate) fn distinct_by<K, F>(self, key: F) -> StreamResult<Self>
    where
        K: Hash + Eq + 'static,
        F: FnMut(&T) -> K + 'static,
    {
        self.chain(|upstream, config| Distinct::new(upstream, key, config))
    }

    pub(crate) fn sorted_by<F>(self, compare: F) -> StreamResult<Self>
    where
        F: FnMut(&T, &T) -> Option<Ordering> + 'static,
    {
        self.chain(|upstream, config| Sorted::new(upstream, compare, config))
    }

    pub(crate) fn limit(self, max_size: i64) -> StreamResult<Self> {
        let limit = check_count(max_size, "max_size")?;
        self.chain(|upstream, _| Limit { upstream, limit, position: 0 })
    }

    pub(crate) fn skip(self, n: i64) -> StreamResult<Self> {
        let remaining = check_count(n, "n")?;
        if remaining == 0 {
            return self.retain();
        }
        self.chain(|upstream, _| Skip { upstream, remaining })
    }

    pub(crate) fn on_close<F>(self, action: F) -> StreamResult<Self>
    where
        F: FnOnce() -> StreamResult<()> + 'static,
    {
        self.root.throw_if_terminated()?;
        self.root.on_close(action);
        Ok(self)
    }

    pub(crate) fn with_config(self, config: StreamConfig) -> StreamResult<Self> {
        self.root.throw_if_terminated()?;
        self.root.set_config(config);
        Ok(self)
    }

    pub(crate) fn close(&self) -> StreamResult<()> {
        self.root.close()
    }

    pub(crate) fn characteristics(&self) -> StreamResult<Characteristics> {
        self.root.throw_if_terminated()?;
        Ok(match &self.source {
            Source::Populated(cursor) => cursor.characteristics(),
            Source::Empty => Characteristics::SIZED | Characteristics::SUBSIZED,
        })
    }

    // ================================
    // Terminal operations
    // ================================

    /// Terminate the pipeline and hand out its cursor, `None` for an empty source.
    pub(crate) fn begin_terminal(&mut self) -> StreamResult<Option<BoxCursor<T>>> {
        self.root.terminate()?;
        Ok(match mem::replace(&mut self.source, Source::Empty) {
            Source::Populated(cursor) => Some(cursor),
            Source::Empty => None,
        })
    }

    pub(crate) fn for_each<F>(&mut self, mut action: F) -> StreamResult<()>
    where
        F: FnMut(T),
    {
        let Some(mut cursor) = self.begin_terminal()? else {
            return Ok(());
        };
        cursor.for_each_remaining(&mut action)
    }

    pub(crate) fn to_vec(&mut self) -> StreamResult<Vec<T>> {
        let Some(mut cursor) = self.begin_terminal()? else {
            return Ok(Vec::new());
        };
        let capacity = self.root.config().capacity_for(cursor.exact_size());
        let mut values = Vec::with_capacity(capacity);
        while let Some(item) = cursor.try_advance()? {
            values.push(item);
        }
        Ok(values)
    }

    pub(crate) fn reduce<F>(&mut self, mut op: F) -> StreamResult<Option<T>>
    where
        F: FnMut(T, T) -> T,
    {
        let Some(mut cursor) = self.begin_terminal()? else {
            return Ok(None);
        };
        let Some(first) = cursor.try_advance()? else {
            return Ok(None);
        };
        let mut acc = first;
        while let Some(item) = cursor.try_advance()? {
            acc = op(acc, item);
        }
        Ok(Some(acc))
    }

    /// Left fold from `identity`; the identity comes back untouched for an
    /// empty pipeline.
    pub(crate) fn fold<U, F>(&mut self, identity: U, mut accumulator: F) -> StreamResult<U>
    where
        F: FnMut(U, T) -> U,
    {
        self.try_fold(identity, |acc, item| Ok(accumulator(acc, item)))
    }

    pub(crate) fn try_fold<U, F>(&mut self, identity: U, mut accumulator: F) -> StreamResult<U>
    where
        F: FnMut(U, T) -> StreamResult<U>,
    {
        let Some(mut cursor) = self.begin_terminal()? else {
            return Ok(identity);
        };
        let mut acc = identity;
        while let Some(item) = cursor.try_advance()? {
            acc = accumulator(acc, item)?;
        }
        Ok(acc)
    }

    /// Reduce through the collector's supplier and accumulator, then finish.
    pub(crate) fn collect<A, R>(&mut self, collector: &Collector<T, A, R>) -> StreamResult<R>
    where
        A: 'static,
        R: 'static,
    {
        let container = self.try_fold(collector.supply(), |mut container, item| {
            collector.accumulate(&mut container, item)?;
            Ok(container)
        })?;
        Ok(collector.finish(container))
    }

    pub(crate) fn count(&mut self) -> StreamResult<u64> {
        let Some(mut cursor) = self.begin_terminal()? else {
            return Ok(0);
        };
        let mut count = 0u64;
        while cursor.try_advance()?.is_some() {
            count += 1;
        }
        Ok(count)
    }

    pub(crate) fn any_match<F>(&mut self, mut predicate: F) -> StreamResult<bool>
    where
        F: FnMut(&T) -> bool,
    {
        let Some(mut cursor) = self.begin_terminal()? else {
            return Ok(false);
        };
        while let Some(item) = cursor.try_advance()? {
            if predicate(&item) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    pub(crate) fn all_match<F>(&mut self, mut predicate: F) -> StreamResult<bool>
    where
        F: FnMut(&T) -> bool,
    {
        Ok(!self.any_match(|item| !predicate(item))?)
    }

    pub(crate) fn none_match<F>(&mut self, predicate: F) -> StreamResult<bool>
    where
        F: FnMut(&T) -> bool,
    {
        Ok(!self.any_match(predicate)?)
    }

    pub(crate) fn find_first(&mut self) -> StreamResult<Option<T>> {
        let Some(mut cursor) = self.begin_terminal()? else {
            return Ok(None);
        };
        cursor.try_advance()
    }

    pub(crate) fn iterator(&mut self) -> StreamResult<CursorIter<T>> {
        Ok(CursorIter::new(self.begin_terminal()?))
    }

    pub(crate) fn into_cursor(&mut self) -> StreamResult<BoxCursor<T>> {
        Ok(self
            .begin_terminal()?
            .unwrap_or_else(|| Box::new(EmptyCursor::new())))
    }
}

// ================================
// Stage adapters
// ================================

pub struct Map<C, F> {
    pub(crate) upstream: C,
    pub(crate) f: F,
}

impl<C, U, F> Cursor for Map<C, F>
where
    C: Cursor,
    F: FnMut(C::Item) -> U,
{
    type Item = U;

    fn try_advance(&mut self) -> StreamResult<Option<U>> {
        Ok(self.upstream.try_advance()?.map(&mut self.f))
    }

    fn estimate_size(&self) -> u64 {
        self.upstream.estimate_size()
    }

    fn characteristics(&self) -> Characteristics {
        self.upstream.characteristics().mapped()
    }
}

pub struct Filter<C, F> {
    pub(crate) upstream: C,
    pub(crate) predicate: F,
}

impl<C, F> Cursor for Filter<C, F>
where
    C: Cursor,
    F: FnMut(&C::Item) -> bool,
{
    type Item = C::Item;

    fn try_advance(&mut self) -> StreamResult<Option<C::Item>> {
        while let Some(item) = self.upstream.try_advance()? {
            if (self.predicate)(&item) {
                return Ok(Some(item));
            }
        }
        Ok(None)
    }

    fn estimate_size(&self) -> u64 {
        self.upstream.estimate_size()
    }

    fn characteristics(&self) -> Characteristics {
        self.upstream.characteristics().without_size()
    }
}

pub struct Skip<C> {
    pub(crate) upstream: C,
    pub(crate) remaining: u64,
}

impl<C: Cursor> Cursor for Skip<C> {
    type Item = C::Item;

    fn try_advance(&mut self) -> StreamResult<Option<C::Item>> {
        while self.remaining > 0 {
            if self.upstream.try_advance()?.is_none() {
                return Ok(None);
            }
            self.remaining -= 1;
        }
        self.upstream.try_advance()
    }

    fn estimate_size(&self) -> u64 {
        if self.upstream.has_characteristics(Characteristics::SIZED) {
            self.upstream.estimate_size().saturating_sub(self.remaining)
        } else {
            UNKNOWN_SIZE
        }
    }

    fn characteristics(&self) -> Characteristics {
        self.upstream.characteristics()
    }
}

pub struct Limit<C> {
    pub(crate) upstream: C,
    pub(crate) limit: u64,
    pub(crate) position: u64,
}

impl<C: Cursor> Cursor for Limit<C> {
    type Item = C::Item;

    fn try_advance(&mut self) -> StreamResult<Option<C::Item>> {
        if self.position >= self.limit {
            return Ok(None);
        }
        let item = self.upstream.try_advance()?;
        self.position += 1;
        Ok(item)
    }

    fn estimate_size(&self) -> u64 {
        let left = self.limit - self.position.min(self.limit);
        if self.upstream.has_characteristics(Characteristics::SIZED) {
            self.upstream.estimate_size().min(left)
        } else {
            UNKNOWN_SIZE
        }
    }

    fn characteristics(&self) -> Characteristics {
        self.upstream.characteristics()
    }
}
