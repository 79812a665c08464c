//! Primitive engines: `IntStream`, `LongStream`, `DoubleStream`.
//!
//! One generic `PrimitiveStream<P>` over the sealed `Primitive` kinds; the
//! kind decides hashing for `distinct`, ordering for `sorted` and the
//! arithmetic behind `summary_statistics`.

use std::cmp::Ordering;
use std::fmt;
use std::hash::Hash;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::builder::Builder;
use super::constructors::{GenerateCursor, IterCursor, IterateCursor, RangeCursor, VecCursor};
use super::core::Pipeline;
use super::object::Stream;
use crate::bridge::{AsyncCursorStream, CursorIter};
use crate::cursor::{BoxCursor, Characteristics, Cursor};
use crate::error::StreamResult;
use crate::statistics::{CompensatedSum, SummaryStatistics};
use crate::stream_configuration::StreamConfig;

mod sealed {
    pub trait Sealed {}
    impl Sealed for i32 {}
    impl Sealed for i64 {}
    impl Sealed for f64 {}
}

/// The element kinds with a dedicated engine
pub trait Primitive:
    Copy
    + PartialOrd
    + Default
    + fmt::Debug
    + fmt::Display
    + Serialize
    + DeserializeOwned
    + sealed::Sealed
    + 'static
{
    /// Equality key used by `distinct`
    type Key: Hash + Eq + 'static;
    /// Running-sum state kept by statistics
    type Sum: Copy + Default + fmt::Debug + PartialEq + Serialize + DeserializeOwned;
    /// Sum reported by statistics
    type Total: Copy + fmt::Debug + fmt::Display + PartialEq;

    /// `Int`, `Long` or `Double`
    const KIND: &'static str;
    /// Starting point for a running minimum
    const MIN_IDENTITY: Self;
    /// Starting point for a running maximum
    const MAX_IDENTITY: Self;

    fn key(self) -> Self::Key;
    fn total_order(&self, other: &Self) -> Ordering;
    fn min_of(self, other: Self) -> Self;
    fn max_of(self, other: Self) -> Self;

    fn add_to_sum(sum: &mut Self::Sum, value: Self);
    fn merge_sums(sum: &mut Self::Sum, other: &Self::Sum);
    fn total(sum: &Self::Sum) -> Self::Total;
    /// Narrow a statistics total back to the element kind
    fn narrow(total: Self::Total) -> Self;
    fn total_as_f64(total: Self::Total) -> f64;
}

impl Primitive for i32 {
    type Key = i32;
    type Sum = i64;
    type Total = i64;

    const KIND: &'static str = "Int";
    const MIN_IDENTITY: Self = i32::MAX;
    const MAX_IDENTITY: Self = i32::MIN;

    fn key(self) -> i32 {
        self
    }

    fn total_order(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }

    fn min_of(self, other: Self) -> Self {
        self.min(other)
    }

    fn max_of(self, other: Self) -> Self {
        self.max(other)
    }

    fn add_to_sum(sum: &mut i64, value: i32) {
        *sum = sum.wrapping_add(i64::from(value));
    }

    fn merge_sums(sum: &mut i64, other: &i64) {
        *sum = sum.wrapping_add(*other);
    }

    fn total(sum: &i64) -> i64 {
        *sum
    }

    fn narrow(total: i64) -> i32 {
        total as i32
    }

    fn total_as_f64(total: i64) -> f64 {
        total as f64
    }
}

impl Primitive for i64 {
    type Key = i64;
    type Sum = i64;
    type Total = i64;

    const KIND: &'static str = "Long";
    const MIN_IDENTITY: Self = i64::MAX;
    const MAX_IDENTITY: Self = i64::MIN;

    fn key(self) -> i64 {
        self
    }

    fn total_order(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }

    fn min_of(self, other: Self) -> Self {
        self.min(other)
    }

    fn max_of(self, other: Self) -> Self {
        self.max(other)
    }

    fn add_to_sum(sum: &mut i64, value: i64) {
        *sum = sum.wrapping_add(value);
    }

    fn merge_sums(sum: &mut i64, other: &i64) {
        *sum = sum.wrapping_add(*other);
    }

    fn total(sum: &i64) -> i64 {
        *sum
    }

    fn narrow(total: i64) -> i64 {
        total
    }

    fn total_as_f64(total: i64) -> f64 {
        total as f64
    }
}

impl Primitive for f64 {
    /// Bit pattern: NaN equals NaN, `0.0` and `-0.0` differ
    type Key = u64;
    type Sum = CompensatedSum;
    type Total = f64;

    const KIND: &'static str = "Double";
    const MIN_IDENTITY: Self = f64::INFINITY;
    const MAX_IDENTITY: Self = f64::NEG_INFINITY;

    fn key(self) -> u64 {
        self.to_bits()
    }

    fn total_order(&self, other: &Self) -> Ordering {
        self.total_cmp(other)
    }

    fn min_of(self, other: Self) -> Self {
        if self.is_nan() || other.is_nan() {
            f64::NAN
        } else if self == other {
            // only distinguishes 0.0 from -0.0
            if self.is_sign_negative() {
                self
            } else {
                other
            }
        } else if self < other {
            self
        } else {
            other
        }
    }

    fn max_of(self, other: Self) -> Self {
        if self.is_nan() || other.is_nan() {
            f64::NAN
        } else if self == other {
            if self.is_sign_positive() {
                self
            } else {
                other
            }
        } else if self > other {
            self
        } else {
            other
        }
    }

    fn add_to_sum(sum: &mut CompensatedSum, value: f64) {
        sum.add(value);
    }

    fn merge_sums(sum: &mut CompensatedSum, other: &CompensatedSum) {
        sum.merge(other);
    }

    fn total(sum: &CompensatedSum) -> f64 {
        sum.value()
    }

    fn narrow(total: f64) -> f64 {
        total
    }

    fn total_as_f64(total: f64) -> f64 {
        total
    }
}

/// Lazy single-use pipeline over one primitive kind
pub struct PrimitiveStream<P: Primitive> {
    pipeline: Pipeline<P>,
}

pub type IntStream = PrimitiveStream<i32>;
pub type LongStream = PrimitiveStream<i64>;
pub type DoubleStream = PrimitiveStream<f64>;

impl<P: Primitive> fmt::Debug for PrimitiveStream<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(&format!("{}Stream", P::KIND))
            .field("root", self.pipeline.root())
            .field("empty", &self.pipeline.is_empty_source())
            .finish()
    }
}

impl<P: Primitive> PrimitiveStream<P> {
    pub(crate) fn wrap(pipeline: Pipeline<P>) -> Self {
        Self { pipeline }
    }

    pub(crate) fn into_pipeline(self) -> Pipeline<P> {
        self.pipeline
    }

    // ================================
    // Sources
    // ================================

    pub fn of<I>(values: I) -> Self
    where
        I: IntoIterator<Item = P>,
    {
        Self::wrap(Pipeline::from_cursor(VecCursor::new(values.into_iter().collect())))
    }

    pub fn of_one(value: P) -> Self {
        Self::of([value])
    }

    /// A pipeline with no elements. Its operations only check termination.
    pub fn empty() -> Self {
        Self::wrap(Pipeline::empty())
    }

    /// Lazily pull values from any iterator
    pub fn from_iter<I>(values: I) -> Self
    where
        I: IntoIterator<Item = P>,
        I::IntoIter: 'static,
    {
        Self::wrap(Pipeline::from_cursor(IterCursor::new(values.into_iter())))
    }

    pub fn from_cursor<C>(cursor: C) -> Self
    where
        C: Cursor<Item = P> + 'static,
    {
        Self::wrap(Pipeline::from_cursor(cursor))
    }

    /// Unbounded: every element comes from a fresh call to `supplier`
    pub fn generate<F>(supplier: F) -> Self
    where
        F: FnMut() -> P + 'static,
    {
        Self::from_cursor(GenerateCursor { f: supplier })
    }

    /// Unbounded: `seed, f(seed), f(f(seed)), ...`
    pub fn iterate<F>(seed: P, mut f: F) -> Self
    where
        F: FnMut(P) -> P + 'static,
    {
        Self::from_cursor(IterateCursor {
            next: Some(seed),
            f: move |value: &P| f(*value),
        })
    }

    /// Elements of `a` followed by those of `b`; closing the result closes both.
    pub fn concat(a: Self, b: Self) -> StreamResult<Self> {
        Ok(Self::wrap(Pipeline::concat(a.pipeline, b.pipeline)?))
    }

    pub fn builder() -> Builder<P, Self> {
        Builder::new()
    }

    // ================================
    // Intermediate operations
    // ================================

    pub fn filter<F>(self, mut predicate: F) -> StreamResult<Self>
    where
        F: FnMut(P) -> bool + 'static,
    {
        Ok(Self::wrap(self.pipeline.filter(move |value: &P| predicate(*value))?))
    }

    pub fn map<F>(self, f: F) -> StreamResult<Self>
    where
        F: FnMut(P) -> P + 'static,
    {
        Ok(Self::wrap(self.pipeline.map(f)?))
    }

    pub fn map_to_obj<U, F>(self, f: F) -> StreamResult<Stream<U>>
    where
        U: 'static,
        F: FnMut(P) -> U + 'static,
    {
        Ok(Stream::wrap(self.pipeline.map(f)?))
    }

    pub fn map_to_int<F>(self, f: F) -> StreamResult<IntStream>
    where
        F: FnMut(P) -> i32 + 'static,
    {
        Ok(PrimitiveStream::wrap(self.pipeline.map(f)?))
    }

    pub fn map_to_long<F>(self, f: F) -> StreamResult<LongStream>
    where
        F: FnMut(P) -> i64 + 'static,
    {
        Ok(PrimitiveStream::wrap(self.pipeline.map(f)?))
    }

    pub fn map_to_double<F>(self, f: F) -> StreamResult<DoubleStream>
    where
        F: FnMut(P) -> f64 + 'static,
    {
        Ok(PrimitiveStream::wrap(self.pipeline.map(f)?))
    }

    /// Replace every value with the elements of the stream `f` returns for
    /// it. Each nested stream is closed once drained.
    pub fn flat_map<F>(self, mut f: F) -> StreamResult<Self>
    where
        F: FnMut(P) -> PrimitiveStream<P> + 'static,
    {
        Ok(Self::wrap(self.pipeline.flat_map(move |value| f(value).pipeline)?))
    }

    /// Drop repeated values, keeping first occurrences
    pub fn distinct(self) -> StreamResult<Self> {
        Ok(Self::wrap(self.pipeline.distinct_by(|value: &P| value.key())?))
    }

    /// Ascending order; doubles use the IEEE total order
    pub fn sorted(self) -> StreamResult<Self> {
        Ok(Self::wrap(
            self.pipeline.sorted_by(|a: &P, b: &P| Some(a.total_order(b)))?,
        ))
    }

    pub fn peek<F>(self, mut action: F) -> StreamResult<Self>
    where
        F: FnMut(P) + 'static,
    {
        Ok(Self::wrap(self.pipeline.peek(move |value: &P| action(*value))?))
    }

    pub fn limit(self, max_size: i64) -> StreamResult<Self> {
        Ok(Self::wrap(self.pipeline.limit(max_size)?))
    }

    pub fn skip(self, n: i64) -> StreamResult<Self> {
        Ok(Self::wrap(self.pipeline.skip(n)?))
    }

    /// The same elements as an object stream
    pub fn boxed(self) -> StreamResult<Stream<P>> {
        Ok(Stream::wrap(self.pipeline.retain()?))
    }

    /// Accepted for compatibility; execution stays sequential.
    pub fn parallel(self) -> StreamResult<Self> {
        Ok(Self::wrap(self.pipeline.retain()?))
    }

    pub fn sequential(self) -> StreamResult<Self> {
        Ok(Self::wrap(self.pipeline.retain()?))
    }

    pub fn unordered(self) -> StreamResult<Self> {
        Ok(Self::wrap(self.pipeline.retain()?))
    }

    pub fn is_parallel(&self) -> StreamResult<bool> {
        self.pipeline.root().throw_if_terminated()?;
        Ok(false)
    }

    /// Register a close action on the whole pipeline
    pub fn on_close<F>(self, action: F) -> StreamResult<Self>
    where
        F: FnOnce() -> StreamResult<()> + 'static,
    {
        Ok(Self::wrap(self.pipeline.on_close(action)?))
    }

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
        F: FnMut(P),
    {
        self.pipeline.for_each(action)
    }

    pub fn for_each_ordered<F>(&mut self, action: F) -> StreamResult<()>
    where
        F: FnMut(P),
    {
        self.pipeline.for_each(action)
    }

    pub fn to_vec(&mut self) -> StreamResult<Vec<P>> {
        self.pipeline.to_vec()
    }

    pub fn reduce<F>(&mut self, op: F) -> StreamResult<Option<P>>
    where
        F: FnMut(P, P) -> P,
    {
        self.pipeline.reduce(op)
    }

    pub fn reduce_with<F>(&mut self, identity: P, op: F) -> StreamResult<P>
    where
        F: FnMut(P, P) -> P,
    {
        self.pipeline.fold(identity, op)
    }

    /// Mutable reduction into a container from `supplier`. The combiner is
    /// accepted for compatibility; a sequential pipeline never calls it.
    pub fn collect_with<R, S, A, C>(&mut self, supplier: S, mut accumulator: A, _combiner: C) -> StreamResult<R>
    where
        S: FnOnce() -> R,
        A: FnMut(&mut R, P),
        C: FnMut(R, R) -> R,
    {
        self.pipeline.fold(supplier(), |mut container, value| {
            accumulator(&mut container, value);
            container
        })
    }

    pub fn summary_statistics(&mut self) -> StreamResult<SummaryStatistics<P>> {
        self.pipeline.fold(SummaryStatistics::new(), |mut stats, value| {
            stats.accept(value);
            stats
        })
    }

    /// Sum of all values; int sums wrap to 32 bits
    pub fn sum(&mut self) -> StreamResult<P> {
        Ok(P::narrow(self.summary_statistics()?.sum()))
    }

    pub fn average(&mut self) -> StreamResult<Option<f64>> {
        let stats = self.summary_statistics()?;
        Ok((stats.count() > 0).then(|| stats.average()))
    }

    pub fn min(&mut self) -> StreamResult<Option<P>> {
        let stats = self.summary_statistics()?;
        Ok((stats.count() > 0).then(|| stats.min()))
    }

    pub fn max(&mut self) -> StreamResult<Option<P>> {
        let stats = self.summary_statistics()?;
        Ok((stats.count() > 0).then(|| stats.max()))
    }

    pub fn count(&mut self) -> StreamResult<u64> {
        self.pipeline.count()
    }

    pub fn any_match<F>(&mut self, mut predicate: F) -> StreamResult<bool>
    where
        F: FnMut(P) -> bool,
    {
        self.pipeline.any_match(|value: &P| predicate(*value))
    }

    pub fn all_match<F>(&mut self, mut predicate: F) -> StreamResult<bool>
    where
        F: FnMut(P) -> bool,
    {
        self.pipeline.all_match(|value: &P| predicate(*value))
    }

    pub fn none_match<F>(&mut self, mut predicate: F) -> StreamResult<bool>
    where
        F: FnMut(P) -> bool,
    {
        self.pipeline.none_match(|value: &P| predicate(*value))
    }

    pub fn find_first(&mut self) -> StreamResult<Option<P>> {
        self.pipeline.find_first()
    }

    pub fn find_any(&mut self) -> StreamResult<Option<P>> {
        self.pipeline.find_first()
    }

    pub fn iterator(&mut self) -> StreamResult<CursorIter<P>> {
        self.pipeline.iterator()
    }

    pub fn into_cursor(&mut self) -> StreamResult<BoxCursor<P>> {
        self.pipeline.into_cursor()
    }

    pub fn to_async_stream(&mut self) -> StreamResult<AsyncCursorStream<P>> {
        Ok(futures::stream::iter(self.pipeline.iterator()?))
    }

    /// Run the pipeline's close actions; the pipeline counts as consumed.
    pub fn close(&self) -> StreamResult<()> {
        self.pipeline.close()
    }
}

// ================================
// Kind-specific operations
// ================================

fn closed_range<P>(start: P, end: P) -> PrimitiveStream<P>
where
    P: Primitive + super::constructors::Integral,
{
    if start > end {
        PrimitiveStream::empty()
    } else {
        PrimitiveStream::from_cursor(RangeCursor::closed(start, end))
    }
}

impl IntStream {
    /// `start, start + 1, ..., end - 1`
    pub fn range(start: i32, end: i32) -> Self {
        if start >= end {
            return Self::empty();
        }
        closed_range(start, end - 1)
    }

    /// `start, start + 1, ..., end`
    pub fn range_closed(start: i32, end: i32) -> Self {
        closed_range(start, end)
    }

    pub fn as_long_stream(self) -> StreamResult<LongStream> {
        self.map_to_long(i64::from)
    }

    pub fn as_double_stream(self) -> StreamResult<DoubleStream> {
        self.map_to_double(f64::from)
    }
}

impl LongStream {
    pub fn range(start: i64, end: i64) -> Self {
        if start >= end {
            return Self::empty();
        }
        closed_range(start, end - 1)
    }

    pub fn range_closed(start: i64, end: i64) -> Self {
        closed_range(start, end)
    }

    pub fn as_double_stream(self) -> StreamResult<DoubleStream> {
        self.map_to_double(|value| value as f64)
    }
}
