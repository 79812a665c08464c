//! Lazy single-use pipelines
//!
//! `Stream<T>` is the object engine; `IntStream`, `LongStream` and
//! `DoubleStream` are the primitive engines. Both are thin typed handles over
//! one generic pipeline skeleton, built from the source cursors in
//! `constructors` and the stage adapters in `core`, `utility` and `advanced`.

pub mod core;
pub mod constructors;
pub mod advanced;
pub mod utility;
pub mod object;
pub mod primitive;
pub mod builder;

// Re-export engine types
pub use object::Stream;
pub use primitive::{DoubleStream, IntStream, LongStream, Primitive, PrimitiveStream};
pub use builder::Builder;

// Re-export source cursors
pub use constructors::{
    ConcatCursor, EmptyCursor, GenerateCursor, Integral, IterCursor, IterateCursor, RangeCursor,
    VecCursor,
};

// Re-export stage adapters
pub use self::core::{Filter, Limit, Map, Skip};
pub use utility::{Distinct, Peek};
pub use advanced::Sorted;
