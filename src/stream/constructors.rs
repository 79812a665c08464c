//! Source cursors: vector, iterator, range, generate, iterate, concat, empty
use std::marker::PhantomData;

use crate::cursor::{BoxCursor, Characteristics, Cursor, UNKNOWN_SIZE};
use crate::error::StreamResult;

// ================================
// Basic Sources
// ================================

pub struct EmptyCursor<T> {
    pub(crate) _phantom: PhantomData<T>,
}

impl<T> EmptyCursor<T> {
    pub fn new() -> Self {
        Self { _phantom: PhantomData }
    }
}

impl<T> Default for EmptyCursor<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Cursor for EmptyCursor<T> {
    type Item = T;

    fn try_advance(&mut self) -> StreamResult<Option<T>> {
        Ok(None)
    }

    fn estimate_size(&self) -> u64 {
        0
    }

    fn characteristics(&self) -> Characteristics {
        Characteristics::SIZED | Characteristics::SUBSIZED
    }
}

/// Owned values in encounter order
pub struct VecCursor<T> {
    pub(crate) values: std::vec::IntoIter<T>,
}

impl<T> VecCursor<T> {
    pub fn new(values: Vec<T>) -> Self {
        Self { values: values.into_iter() }
    }
}

impl<T> Cursor for VecCursor<T> {
    type Item = T;

    fn try_advance(&mut self) -> StreamResult<Option<T>> {
        Ok(self.values.next())
    }

    fn estimate_size(&self) -> u64 {
        self.values.len() as u64
    }

    fn characteristics(&self) -> Characteristics {
        Characteristics::ORDERED
            | Characteristics::SIZED
            | Characteristics::SUBSIZED
            | Characteristics::IMMUTABLE
    }
}

/// Any `Iterator`, pulled lazily
pub struct IterCursor<I> {
    pub(crate) iter: I,
}

impl<I: Iterator> IterCursor<I> {
    pub fn new(iter: I) -> Self {
        Self { iter }
    }

    fn known_size(&self) -> Option<u64> {
        match self.iter.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(lower as u64),
            _ => None,
        }
    }
}

impl<I: Iterator> Cursor for IterCursor<I> {
    type Item = I::Item;

    fn try_advance(&mut self) -> StreamResult<Option<I::Item>> {
        Ok(self.iter.next())
    }

    fn estimate_size(&self) -> u64 {
        self.known_size().unwrap_or(UNKNOWN_SIZE)
    }

    fn characteristics(&self) -> Characteristics {
        match self.known_size() {
            Some(_) => Characteristics::ORDERED | Characteristics::SIZED,
            None => Characteristics::ORDERED,
        }
    }
}

// ================================
// Function-based Sources
// ================================

/// Unbounded source calling a supplier for every element
pub struct GenerateCursor<F> {
    pub(crate) f: F,
}

impl<T, F> Cursor for GenerateCursor<F>
where
    F: FnMut() -> T,
{
    type Item = T;

    fn try_advance(&mut self) -> StreamResult<Option<T>> {
        Ok(Some((self.f)()))
    }

    fn characteristics(&self) -> Characteristics {
        Characteristics::IMMUTABLE | Characteristics::ORDERED
    }
}

/// Unbounded source `seed, f(seed), f(f(seed)), ...`
pub struct IterateCursor<T, F> {
    pub(crate) next: Option<T>,
    pub(crate) f: F,
}

impl<T, F> Cursor for IterateCursor<T, F>
where
    F: FnMut(&T) -> T,
{
    type Item = T;

    fn try_advance(&mut self) -> StreamResult<Option<T>> {
        let current = self.next.take();
        if let Some(value) = &current {
            self.next = Some((self.f)(value));
        }
        Ok(current)
    }

    fn characteristics(&self) -> Characteristics {
        Characteristics::IMMUTABLE | Characteristics::ORDERED
    }
}

// ================================
// Ranges
// ================================

/// Integral kinds that can drive a range source
pub trait Integral: Copy + PartialOrd + 'static {
    /// `self + 1`, wrapping at the type's maximum
    fn successor(self) -> Self;
    /// Number of values in `start..=end`; `start <= end` is required
    fn span(start: Self, end: Self) -> u64;
}

impl Integral for i32 {
    fn successor(self) -> Self {
        self.wrapping_add(1)
    }

    fn span(start: Self, end: Self) -> u64 {
        (i64::from(end) - i64::from(start)) as u64 + 1
    }
}

impl Integral for i64 {
    fn successor(self) -> Self {
        self.wrapping_add(1)
    }

    fn span(start: Self, end: Self) -> u64 {
        // Saturates only for the full i64 domain, which has 2^64 values.
        (end.wrapping_sub(start) as u64).saturating_add(1)
    }
}

/// Consecutive values of a closed interval, produced without materializing
pub struct RangeCursor<P> {
    pub(crate) next: P,
    pub(crate) remaining: u64,
}

impl<P: Integral> RangeCursor<P> {
    /// `start..=end`; callers guarantee `start <= end`
    pub fn closed(start: P, end: P) -> Self {
        Self { next: start, remaining: P::span(start, end) }
    }
}

impl<P: Integral> Cursor for RangeCursor<P> {
    type Item = P;

    fn try_advance(&mut self) -> StreamResult<Option<P>> {
        if self.remaining == 0 {
            return Ok(None);
        }
        let value = self.next;
        self.remaining -= 1;
        self.next = value.successor();
        Ok(Some(value))
    }

    fn estimate_size(&self) -> u64 {
        self.remaining
    }

    fn characteristics(&self) -> Characteristics {
        Characteristics::IMMUTABLE
            | Characteristics::NONNULL
            | Characteristics::SIZED
            | Characteristics::SUBSIZED
            | Characteristics::ORDERED
            | Characteristics::SORTED
            | Characteristics::DISTINCT
    }
}

// ================================
// Concatenation
// ================================

/// Drains `first`, then `second`. Closing the inputs is left to the close
/// actions of the concatenated pipeline.
pub struct ConcatCursor<T> {
    pub(crate) first: Option<BoxCursor<T>>,
    pub(crate) second: Option<BoxCursor<T>>,
}

impl<T> ConcatCursor<T> {
    pub fn new(first: Option<BoxCursor<T>>, second: Option<BoxCursor<T>>) -> Self {
        Self { first, second }
    }

    fn parts(&self) -> impl Iterator<Item = &BoxCursor<T>> {
        self.first.iter().chain(self.second.iter())
    }
}

impl<T> Cursor for ConcatCursor<T> {
    type Item = T;

    fn try_advance(&mut self) -> StreamResult<Option<T>> {
        if let Some(first) = self.first.as_mut() {
            if let Some(item) = first.try_advance()? {
                return Ok(Some(item));
            }
            self.first = None;
        }
        match self.second.as_mut() {
            Some(second) => second.try_advance(),
            None => Ok(None),
        }
    }

    fn estimate_size(&self) -> u64 {
        self.parts()
            .map(|c| c.estimate_size())
            .fold(0u64, |acc, size| acc.saturating_add(size))
    }

    fn characteristics(&self) -> Characteristics {
        let shared = self
            .parts()
            .map(|c| c.characteristics())
            .fold(Characteristics::ORDERED | Characteristics::SIZED, |acc, c| acc & c);
        shared & (Characteristics::ORDERED | Characteristics::SIZED)
    }
}
