//! The sequential cursor contract every pipeline stage wraps.
//!
//! A cursor lazily enumerates a sequence one element per `try_advance` call,
//! reports a best-effort size estimate and a set of structural
//! characteristics. Sources and stage adapters live in `crate::stream`.

use bitflags::bitflags;

use crate::error::StreamResult;

/// Size estimate reported by cursors that cannot tell how many elements remain.
pub const UNKNOWN_SIZE: u64 = u64::MAX;

bitflags! {
    /// Known structural properties of the elements a cursor has left.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Characteristics: u32 {
        const DISTINCT = 0x0000_0001;
        const SORTED = 0x0000_0004;
        const ORDERED = 0x0000_0010;
        const SIZED = 0x0000_0040;
        const NONNULL = 0x0000_0100;
        const IMMUTABLE = 0x0000_0400;
        const CONCURRENT = 0x0000_1000;
        const SUBSIZED = 0x0000_4000;
    }
}

impl Characteristics {
    /// What a 1:1 transform keeps: the derived type's ordering and equality
    /// are unrelated to the source's.
    pub fn mapped(self) -> Self {
        self - (Characteristics::SORTED | Characteristics::DISTINCT)
    }

    /// What a stage that drops an unknown number of elements keeps.
    pub fn without_size(self) -> Self {
        self - (Characteristics::SIZED | Characteristics::SUBSIZED)
    }
}

/// Sequential cursor - the enumeration primitive behind every stage
pub trait Cursor {
    type Item;

    /// Yield the next unseen element, or `None` once the sequence is exhausted.
    fn try_advance(&mut self) -> StreamResult<Option<Self::Item>>;

    /// Best-effort count of remaining elements; `UNKNOWN_SIZE` when unknown.
    fn estimate_size(&self) -> u64 {
        UNKNOWN_SIZE
    }

    fn characteristics(&self) -> Characteristics;

    fn has_characteristics(&self, wanted: Characteristics) -> bool {
        self.characteristics().contains(wanted)
    }

    /// Exact remaining size when the cursor is `SIZED`.
    fn exact_size(&self) -> Option<u64> {
        if self.has_characteristics(Characteristics::SIZED) {
            Some(self.estimate_size())
        } else {
            None
        }
    }

    /// Partition off a prefix for parallel traversal. The engine never calls
    /// this; it exists so foreign cursors can be adapted unchanged.
    fn try_split(&mut self) -> Option<BoxCursor<Self::Item>> {
        None
    }

    /// Feed every remaining element to `action`.
    fn for_each_remaining(&mut self, action: &mut dyn FnMut(Self::Item)) -> StreamResult<()> {
        while let Some(item) = self.try_advance()? {
            action(item);
        }
        Ok(())
    }
}

/// Type-erased cursor held by a pipeline stage
pub type BoxCursor<T> = Box<dyn Cursor<Item = T>>;

impl<C: Cursor + ?Sized> Cursor for Box<C> {
    type Item = C::Item;

    fn try_advance(&mut self) -> StreamResult<Option<Self::Item>> {
        (**self).try_advance()
    }

    fn estimate_size(&self) -> u64 {
        (**self).estimate_size()
    }

    fn characteristics(&self) -> Characteristics {
        (**self).characteristics()
    }

    fn try_split(&mut self) -> Option<BoxCursor<Self::Item>> {
        (**self).try_split()
    }
}
