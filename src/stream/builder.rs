//! Incremental construction of a stream from pushed values
use std::marker::PhantomData;

use super::core::Pipeline;
use super::constructors::VecCursor;
use super::object::Stream;
use super::primitive::{Primitive, PrimitiveStream};
use crate::error::{StreamError, StreamResult};

/// Collects values, then turns them into a stream exactly once.
///
/// `S` is the stream type `build` produces. Any use after `build` fails with
/// `StreamError::IllegalState`.
pub struct Builder<T, S> {
    items: Option<Vec<T>>,
    _target: PhantomData<fn() -> S>,
}

impl<T, S> Builder<T, S> {
    pub(crate) fn new() -> Self {
        Self {
            items: Some(Vec::new()),
            _target: PhantomData,
        }
    }

    pub fn accept(&mut self, value: T) -> StreamResult<()> {
        match self.items.as_mut() {
            Some(items) => {
                items.push(value);
                Ok(())
            }
            None => Err(already_built()),
        }
    }

    /// `accept` that can be chained
    pub fn add(&mut self, value: T) -> StreamResult<&mut Self> {
        self.accept(value)?;
        Ok(self)
    }

    pub fn is_built(&self) -> bool {
        self.items.is_none()
    }

    fn take_items(&mut self) -> StreamResult<Vec<T>> {
        let items = self.items.take().ok_or_else(already_built)?;
        log::trace!("builder produced a stream of {} elements", items.len());
        Ok(items)
    }
}

fn already_built() -> StreamError {
    StreamError::IllegalState("builder has already been built".to_string())
}

impl<T: 'static> Builder<T, Stream<T>> {
    pub fn build(&mut self) -> StreamResult<Stream<T>> {
        let items = self.take_items()?;
        Ok(Stream::wrap(Pipeline::from_cursor(VecCursor::new(items))))
    }
}

impl<P: Primitive> Builder<P, PrimitiveStream<P>> {
    pub fn build(&mut self) -> StreamResult<PrimitiveStream<P>> {
        let items = self.take_items()?;
        Ok(PrimitiveStream::wrap(Pipeline::from_cursor(VecCursor::new(items))))
    }
}
