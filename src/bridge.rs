//! Conversions from a terminated pipeline into std and `futures` iteration.

use std::fmt;
use std::iter::FusedIterator;

use crate::cursor::BoxCursor;
use crate::error::StreamResult;

/// `futures::Stream` over the remaining elements of a pipeline
pub type AsyncCursorStream<T> = futures::stream::Iter<CursorIter<T>>;

/// Iterator over the remaining elements of a pipeline.
///
/// A fault raised while advancing is yielded once as `Err`, after which the
/// iterator is exhausted.
pub struct CursorIter<T> {
    cursor: Option<BoxCursor<T>>,
}

impl<T> CursorIter<T> {
    pub(crate) fn new(cursor: Option<BoxCursor<T>>) -> Self {
        Self { cursor }
    }
}

impl<T> fmt::Debug for CursorIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CursorIter")
            .field("exhausted", &self.cursor.is_none())
            .finish()
    }
}

impl<T> Iterator for CursorIter<T> {
    type Item = StreamResult<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let cursor = self.cursor.as_mut()?;
        match cursor.try_advance() {
            Ok(Some(item)) => Some(Ok(item)),
            Ok(None) => {
                self.cursor = None;
                None
            }
            Err(e) => {
                self.cursor = None;
                Some(Err(e))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.cursor {
            None => (0, Some(0)),
            Some(cursor) => match cursor.exact_size().and_then(|n| usize::try_from(n).ok()) {
                Some(n) => (n, Some(n)),
                None => (0, None),
            },
        }
    }
}

impl<T> FusedIterator for CursorIter<T> {}
