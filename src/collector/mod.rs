//! Reduction descriptors.
//!
//! A `Collector` bundles four functions (supplier, accumulator, combiner,
//! finisher) and a characteristic set. Collectors are cheap to clone: the
//! functions sit behind `Rc`, so composing collectors (`grouping_by`,
//! `mapping`, `collecting_and_then`) shares rather than copies them.

pub mod collectors;
pub mod joiner;
pub mod keyed;

use std::fmt;
use std::rc::Rc;

use bitflags::bitflags;

use crate::error::StreamResult;

pub use joiner::StringJoiner;
pub use keyed::KeyedCollection;

bitflags! {
    /// Properties a collector promises about its reduction
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CollectorCharacteristics: u8 {
        /// The accumulator may be called concurrently on one container
        const CONCURRENT = 0b001;
        /// The finisher is the identity and may be skipped
        const IDENTITY_FINISH = 0b010;
        /// The result does not depend on encounter order
        const UNORDERED = 0b100;
    }
}

type Supplier<A> = Rc<dyn Fn() -> A>;
type Accumulator<T, A> = Rc<dyn Fn(&mut A, T) -> StreamResult<()>>;
type Combiner<A> = Rc<dyn Fn(A, A) -> StreamResult<A>>;
type Finisher<A, R> = Rc<dyn Fn(A) -> R>;

pub struct Collector<T, A, R> {
    supplier: Supplier<A>,
    accumulator: Accumulator<T, A>,
    combiner: Combiner<A>,
    finisher: Finisher<A, R>,
    characteristics: CollectorCharacteristics,
}

impl<T, A, R> Clone for Collector<T, A, R> {
    fn clone(&self) -> Self {
        Collector {
            supplier: Rc::clone(&self.supplier),
            accumulator: Rc::clone(&self.accumulator),
            combiner: Rc::clone(&self.combiner),
            finisher: Rc::clone(&self.finisher),
            characteristics: self.characteristics,
        }
    }
}

impl<T, A, R> fmt::Debug for Collector<T, A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collector")
            .field("characteristics", &self.characteristics)
            .finish_non_exhaustive()
    }
}

impl<T: 'static, A: 'static> Collector<T, A, A> {
    /// Collector whose container is its result. `IDENTITY_FINISH` is added
    /// to `characteristics`.
    pub fn of<S, F, C>(
        supplier: S,
        accumulator: F,
        combiner: C,
        characteristics: CollectorCharacteristics,
    ) -> Self
    where
        S: Fn() -> A + 'static,
        F: Fn(&mut A, T) + 'static,
        C: Fn(A, A) -> A + 'static,
    {
        Self::from_parts(
            supplier,
            move |container: &mut A, item: T| {
                accumulator(container, item);
                Ok(())
            },
            move |left: A, right: A| Ok(combiner(left, right)),
            |container: A| container,
            characteristics | CollectorCharacteristics::IDENTITY_FINISH,
        )
    }
}

impl<T: 'static, A: 'static, R: 'static> Collector<T, A, R> {
    pub fn of_with_finisher<S, F, C, Fin>(
        supplier: S,
        accumulator: F,
        combiner: C,
        finisher: Fin,
        characteristics: CollectorCharacteristics,
    ) -> Self
    where
        S: Fn() -> A + 'static,
        F: Fn(&mut A, T) + 'static,
        C: Fn(A, A) -> A + 'static,
        Fin: Fn(A) -> R + 'static,
    {
        Self::from_parts(
            supplier,
            move |container: &mut A, item: T| {
                accumulator(container, item);
                Ok(())
            },
            move |left: A, right: A| Ok(combiner(left, right)),
            finisher,
            characteristics,
        )
    }

    /// Build from fallible accumulator and combiner functions.
    pub(crate) fn from_parts<S, F, C, Fin>(
        supplier: S,
        accumulator: F,
        combiner: C,
        finisher: Fin,
        characteristics: CollectorCharacteristics,
    ) -> Self
    where
        S: Fn() -> A + 'static,
        F: Fn(&mut A, T) -> StreamResult<()> + 'static,
        C: Fn(A, A) -> StreamResult<A> + 'static,
        Fin: Fn(A) -> R + 'static,
    {
        Collector {
            supplier: Rc::new(supplier),
            accumulator: Rc::new(accumulator),
            combiner: Rc::new(combiner),
            finisher: Rc::new(finisher),
            characteristics,
        }
    }

    /// A fresh, empty container
    pub fn supply(&self) -> A {
        (self.supplier)()
    }

    /// Fold one element into `container`
    pub fn accumulate(&self, container: &mut A, item: T) -> StreamResult<()> {
        (self.accumulator)(container, item)
    }

    /// Merge two partial containers. Sequential pipelines never call this;
    /// it is part of the protocol for composed collectors and callers that
    /// split their own input.
    pub fn combine(&self, left: A, right: A) -> StreamResult<A> {
        (self.combiner)(left, right)
    }

    pub fn finish(&self, container: A) -> R {
        (self.finisher)(container)
    }

    pub fn characteristics(&self) -> CollectorCharacteristics {
        self.characteristics
    }

    /// Append a finishing step. The result no longer has an identity finisher.
    pub fn and_then<RR, F>(self, finisher: F) -> Collector<T, A, RR>
    where
        RR: 'static,
        F: Fn(R) -> RR + 'static,
    {
        let inner = self.finisher;
        Collector {
            supplier: self.supplier,
            accumulator: self.accumulator,
            combiner: self.combiner,
            finisher: Rc::new(move |container: A| finisher(inner(container))),
            characteristics: self.characteristics - CollectorCharacteristics::IDENTITY_FINISH,
        }
    }

    /// Feed every element of `items` through the full protocol
    pub fn collect_iter<I>(&self, items: I) -> StreamResult<R>
    where
        I: IntoIterator<Item = T>,
    {
        let mut container = self.supply();
        for item in items {
            self.accumulate(&mut container, item)?;
        }
        Ok(self.finish(container))
    }
}
