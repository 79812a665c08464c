pub mod error;
pub mod cursor;
pub mod termination;

pub mod stream;
pub mod collector;
pub mod statistics;

pub mod bridge;
pub mod stream_configuration;

// Re-export the engines and their supporting types at the crate root
pub use stream::{Builder, DoubleStream, IntStream, LongStream, Primitive, PrimitiveStream, Stream};
pub use collector::{collectors, Collector, CollectorCharacteristics, KeyedCollection, StringJoiner};
pub use cursor::{BoxCursor, Characteristics, Cursor, UNKNOWN_SIZE};
pub use error::{StreamError, StreamResult};
pub use statistics::{
    DoubleSummaryStatistics, IntSummaryStatistics, LongSummaryStatistics, SummaryStatistics,
};
pub use stream_configuration::StreamConfig;
pub use termination::Termination;
pub use bridge::{AsyncCursorStream, CursorIter};
