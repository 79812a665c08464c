//! The object engine: `Stream<T>` over arbitrary element types.

use std::cmp::Ordering;
use std::fmt;
use std::hash::Hash;

use super::builder::Builder;
use super::constructors::{GenerateCursor, IterCursor, IterateCursor, VecCursor};
use super::core::Pipeline;
use super::primitive::{DoubleStream, IntStream, LongStream, PrimitiveStream};
use crate::bridge::{AsyncCursorStream, CursorIter};
use crate::collector::Collector;
use crate::cursor::{BoxCursor, Characteristics, Cursor};
use crate::error::StreamResult;
use crate::stream_configuration::StreamConfig;

/// Lazy, single-use pipeline of `T` values.
///
/// Intermediate operations consume the handle and return the next stage;
/// terminal operations drain it. Every stage shares one root, so any stage
/// can be closed and a consumed pipeline rejects further use with
/// `StreamError::IllegalState`.
pub struct Stream<T> {
    pipeline: Pipeline<T>,
}

impl<T: 'static> fmt::Debug for Stream<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stream")
            .field("root", self.pipeline.root())
            .field("empty", &self.pipeline.is_empty_source())
            .finish()
    }
}

impl<T: 'static> Stream<T> {
    pub(crate) fn wrap(pipeline: Pipeline<T>) -> Self {
        Self { pipeline }
    }

    // ================================
    // Sources
    // ================================

    /// Stream over the given values, in order
    pub fn of<I>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        Self::wrap(Pipeline::from_cursor(VecCursor::new(values.into_iter().collect())))
    }

    pub fn of_one(value: T) -> Self {
        Self::wrap(Pipeline::from_cursor(VecCursor::new(vec![value])))
    }

    /// A pipeline with no elements. Its operations never call user functions;
    /// they only check and update the termination state.
    pub fn empty() -> Self {
        Self::wrap(Pipeline::empty())
    }

    /// Lazily pull elements from any iterator
    pub fn from_iter<I>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'static,
    {
        Self::wrap(Pipeline::from_cursor(IterCursor::new(values.into_iter())))
    }

    pub fn from_cursor<C>(cursor: C) -> Self
    where
        C: Cursor<Item = T> + 'static,
    {
        Self::wrap(Pipeline::from_cursor(cursor))
    }

    /// Unbounded stream of `supplier()` results
    pub fn generate<F>(supplier: F) -> Self
    where
        F: FnMut() -> T + 'static,
    {
        Self::from_cursor(GenerateCursor { f: supplier })
    }

    /// Unbounded stream `seed, f(&seed), f(&f(&seed)), ...`
    pub fn iterate<F>(seed: T, f: F) -> Self
    where
        F: FnMut(&T) -> T + 'static,
    {
        Self::from_cursor(IterateCursor { next: Some(seed), f })
    }

    /// Elements of `a` followed by those of `b`. Both inputs count as
    /// consumed; closing the result closes `a` and then `b`.
    pub fn concat(a: Stream<T>, b: Stream<T>) -> StreamResult<Self> {
        Ok(Self::wrap(Pipeline::concat(a.pipeline, b.pipeline)?))
    }

    pub fn builder() -> Builder<T, Self> {
        Builder::new()
    }

    // ================================
    // Intermediate operations
    // ================================

    pub fn filter<F>(self, predicate: F) -> StreamResult<Self>
    where
        F: FnMut(&T) -> bool + 'static,
    {
        Ok(Self::wrap(self.pipeline.filter(predicate)?))
    }

    pub fn map<U, F>(self, f: F) -> StreamResult<Stream<U>>
    where
        U: 'static,
        F: FnMut(T) -> U + 'static,
    {
        Ok(Stream::wrap(self.pipeline.map(f)?))
    }

    pub fn map_to_int<F>(self, f: F) -> StreamResult<IntStream>
    where
        F: FnMut(T) -> i32 + 'static,
    {
        Ok(PrimitiveStream::wrap(self.pipeline.map(f)?))
    }

    pub fn map_to_long<F>(self, f: F) -> StreamResult<LongStream>
    where
        F: FnMut(T) -> i64 + 'static,
    {
        Ok(PrimitiveStream::wrap(self.pipeline.map(f)?))
    }

    pub fn map_to_double<F>(self, f: F) -> StreamResult<DoubleStream>
    where
        F: FnMut(T) -> f64 + 'static,
    {
        Ok(PrimitiveStream::wrap(self.pipeline.map(f)?))
    }

    /// Replace each element with the elements of the stream `f` returns for
    /// it. Nested streams are consumed lazily and each is closed as soon as
    /// it is drained.
    pub fn flat_map<U, F>(self, mut f: F) -> StreamResult<Stream<U>>
    where
        U: 'static,
        F: FnMut(T) -> Stream<U> + 'static,
    {
        Ok(Stream::wrap(self.pipeline.flat_map(move |item| f(item).pipeline)?))
    }

    pub fn flat_map_to_int<F>(self, mut f: F) -> StreamResult<IntStream>
    where
        F: FnMut(T) -> IntStream + 'static,
    {
        Ok(PrimitiveStream::wrap(
            self.pipeline.flat_map(move |item| f(item).into_pipeline())?,
        ))
    }

    pub fn flat_map_to_long<F>(self, mut f: F) -> StreamResult<LongStream>
    where
        F: FnMut(T) -> LongStream + 'static,
    {
        Ok(PrimitiveStream::wrap(
            self.pipeline.flat_map(move |item| f(item).into_pipeline())?,
        ))
    }

    pub fn flat_map_to_double<F>(self, mut f: F) -> StreamResult<DoubleStream>
    where
        F: FnMut(T) -> DoubleStream + 'static,
    {
        Ok(PrimitiveStream::wrap(
            self.pipeline.flat_map(move |item| f(item).into_pipeline())?,
        ))
    }

    /// Keep the first occurrence of each distinct element
    pub fn distinct(self) -> StreamResult<Self>
    where
        T: Hash + Eq + Clone,
    {
        Ok(Self::wrap(self.pipeline.distinct_by(T::clone)?))
    }

    /// Natural order, stable by default
    pub fn sorted(self) -> StreamResult<Self>
    where
        T: Ord,
    {
        Ok(Self::wrap(self.pipeline.sorted_by(|a: &T, b: &T| Some(a.cmp(b)))?))
    }

    /// Sort with `compare`. A comparator that is not a total order yields an
    /// unspecified permutation under the default stable sort.
    pub fn sorted_by<F>(self, mut compare: F) -> StreamResult<Self>
    where
        F: FnMut(&T, &T) -> Ordering + 'static,
    {
        Ok(Self::wrap(
            self.pipeline.sorted_by(move |a: &T, b: &T| Some(compare(a, b)))?,
        ))
    }

    /// Sort a partially ordered element type. Draining the result fails with
    /// `StreamError::Incomparable` if two elements do not compare.
    pub fn sorted_partial(self) -> StreamResult<Self>
    where
        T: PartialOrd,
    {
        Ok(Self::wrap(self.pipeline.sorted_by(|a: &T, b: &T| a.partial_cmp(b))?))
    }

    pub fn peek<F>(self, action: F) -> StreamResult<Self>
    where
        F: FnMut(&T) + 'static,
    {
        Ok(Self::wrap(self.pipeline.peek(action)?))
    }

    /// At most `max_size` elements; a negative size is an argument fault
    pub fn limit(self, max_size: i64) -> StreamResult<Self> {
        Ok(Self::wrap(self.pipeline.limit(max_size)?))
    }

    pub fn skip(self, n: i64) -> StreamResult<Self> {
        Ok(Self::wrap(self.pipeline.skip(n)?))
    }

    pub fn parallel(self) -> StreamResult<Self> {
        Ok(Self::wrap(self.pipeline.retain()?))
    }

    pub fn sequential(self) -> StreamResult<Self> {
        Ok(Self::wrap(self.pipeline.retain()?))
    }

    pub fn unordered(self) -> StreamResult<Self> {
        Ok(Self::wrap(self.pipeline.retain()?))
    }

    /// Always false: pipelines run on the calling thread
    pub fn is_parallel(&self) -> StreamResult<bool> {
        self.pipeline.root().throw_if_terminated()?;
        Ok(false)
    }

    pub fn on_close<F>(self, action: F) -> StreamResult<Self>
    where
        F: FnOnce() -> StreamResult<()> + 'static,
    {
        Ok(Self::wrap(self.pipeline.on_close(action)?))
    }

    /// Replace the pipeline-wide configuration
    pub fn with_config(self, config: StreamConfig) -> StreamResult<Self> {
        Ok(Self::wrap(self.pipeline.with_config(config)?))
    }

    pub fn characteristics(&self) -> StreamResult<Characteristics> {
        self.pipeline.characteristics()
    }

    // ================================
    // Terminal operations
    // ================================

    pub fn for_each<F>(&mut self, action: F) -> StreamResult<()>
    where
        F: FnMut(T),
    {
        self.pipeline.for_each(action)
    }

    pub fn for_each_ordered<F>(&mut self, action: F) -> StreamResult<()>
    where
        F: FnMut(T),
    {
        self.pipeline.for_each(action)
    }

    pub fn to_vec(&mut self) -> StreamResult<Vec<T>> {
        self.pipeline.to_vec()
    }

    pub fn reduce<F>(&mut self, op: F) -> StreamResult<Option<T>>
    where
        F: FnMut(T, T) -> T,
    {
        self.pipeline.reduce(op)
    }

    pub fn reduce_with<F>(&mut self, identity: T, op: F) -> StreamResult<T>
    where
        F: FnMut(T, T) -> T,
    {
        self.pipeline.fold(identity, op)
    }

    /// Fold into a different type. `combiner` is kept for signature
    /// compatibility; a sequential pipeline never calls it.
    pub fn reduce_with_combiner<U, F, C>(&mut self, identity: U, accumulator: F, _combiner: C) -> StreamResult<U>
    where
        F: FnMut(U, T) -> U,
        C: FnMut(U, U) -> U,
    {
        self.pipeline.fold(identity, accumulator)
    }

    pub fn collect<A, R>(&mut self, collector: Collector<T, A, R>) -> StreamResult<R>
    where
        A: 'static,
        R: 'static,
    {
        self.pipeline.collect(&collector)
    }

    pub fn collect_with<R, S, A, C>(&mut self, supplier: S, mut accumulator: A, _combiner: C) -> StreamResult<R>
    where
        S: FnOnce() -> R,
        A: FnMut(&mut R, T),
        C: FnMut(R, R) -> R,
    {
        self.pipeline.fold(supplier(), |mut container, item| {
            accumulator(&mut container, item);
            container
        })
    }

    /// Smallest element under `compare`; the first of several equal minima wins.
    pub fn min_by<F>(&mut self, mut compare: F) -> StreamResult<Option<T>>
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        self.pipeline
            .reduce(|a, b| if compare(&a, &b) != Ordering::Greater { a } else { b })
    }

    /// Largest element under `compare`; the first of several equal maxima wins.
    pub fn max_by<F>(&mut self, mut compare: F) -> StreamResult<Option<T>>
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        self.pipeline
            .reduce(|a, b| if compare(&a, &b) != Ordering::Less { a } else { b })
    }

    pub fn min(&mut self) -> StreamResult<Option<T>>
    where
        T: Ord,
    {
        self.min_by(T::cmp)
    }

    pub fn max(&mut self) -> StreamResult<Option<T>>
    where
        T: Ord,
    {
        self.max_by(T::cmp)
    }

    pub fn count(&mut self) -> StreamResult<u64> {
        self.pipeline.count()
    }

    /// Stops at the first match; elements after it are never pulled.
    pub fn any_match<F>(&mut self, predicate: F) -> StreamResult<bool>
    where
        F: FnMut(&T) -> bool,
    {
        self.pipeline.any_match(predicate)
    }

    pub fn all_match<F>(&mut self, predicate: F) -> StreamResult<bool>
    where
        F: FnMut(&T) -> bool,
    {
        self.pipeline.all_match(predicate)
    }

    pub fn none_match<F>(&mut self, predicate: F) -> StreamResult<bool>
    where
        F: FnMut(&T) -> bool,
    {
        self.pipeline.none_match(predicate)
    }

    pub fn find_first(&mut self) -> StreamResult<Option<T>> {
        self.pipeline.find_first()
    }

    /// Same as `find_first` on a sequential pipeline
    pub fn find_any(&mut self) -> StreamResult<Option<T>> {
        self.pipeline.find_first()
    }

    /// Pull the remaining elements through a standard iterator
    pub fn iterator(&mut self) -> StreamResult<CursorIter<T>> {
        self.pipeline.iterator()
    }

    pub fn into_cursor(&mut self) -> StreamResult<BoxCursor<T>> {
        self.pipeline.into_cursor()
    }

    /// Adapt the remaining elements into a `futures::Stream`
    pub fn to_async_stream(&mut self) -> StreamResult<AsyncCursorStream<T>> {
        Ok(futures::stream::iter(self.pipeline.iterator()?))
    }

    /// Run every close action registered on the pipeline. Closing twice is a
    /// no-op; the pipeline counts as consumed afterwards.
    pub fn close(&self) -> StreamResult<()> {
        self.pipeline.close()
    }
}
