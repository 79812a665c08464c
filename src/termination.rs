//! Single-use and close-action bookkeeping shared by every stage of a pipeline.
//!
//! The root of a pipeline owns one `Termination`; every derived stage holds an
//! `Rc` to the same value, so terminating or closing any stage affects the
//! whole chain.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::error::{StreamError, StreamResult};
use crate::stream_configuration::StreamConfig;

/// A cleanup action registered with `on_close`
pub(crate) type CloseAction = Box<dyn FnOnce() -> StreamResult<()>>;

pub struct Termination {
    terminated: Cell<bool>,
    actions: RefCell<Vec<CloseAction>>,
    config: Cell<StreamConfig>,
}

impl fmt::Debug for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Termination")
            .field("terminated", &self.terminated.get())
            .field("close_actions", &self.actions.borrow().len())
            .field("config", &self.config.get())
            .finish()
    }
}

impl Termination {
    /// Create the root state for a new pipeline
    pub fn new() -> Rc<Self> {
        Self::with_config(StreamConfig::default())
    }

    pub fn with_config(config: StreamConfig) -> Rc<Self> {
        Rc::new(Self {
            terminated: Cell::new(false),
            actions: RefCell::new(Vec::new()),
            config: Cell::new(config),
        })
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated.get()
    }

    /// Fail with `IllegalState` if the pipeline was consumed or closed.
    pub fn throw_if_terminated(&self) -> StreamResult<()> {
        if self.terminated.get() {
            return Err(StreamError::terminated());
        }
        Ok(())
    }

    /// Mark the pipeline consumed. A second call fails.
    pub fn terminate(&self) -> StreamResult<()> {
        self.throw_if_terminated()?;
        self.terminated.set(true);
        log::trace!("pipeline terminated");
        Ok(())
    }

    pub fn on_close<F>(&self, action: F)
    where
        F: FnOnce() -> StreamResult<()> + 'static,
    {
        self.actions.borrow_mut().push(Box::new(action));
    }

    pub fn pending_close_actions(&self) -> usize {
        self.actions.borrow().len()
    }

    /// Terminate the pipeline and run every registered close action once.
    ///
    /// Actions run in registration order. A failing action does not stop the
    /// ones after it; failures are returned together once all have run.
    pub fn close(&self) -> StreamResult<()> {
        self.terminated.set(true);
        // Taken out first so an action may register or close without a borrow conflict.
        let actions = std::mem::take(&mut *self.actions.borrow_mut());
        if actions.is_empty() {
            return Ok(());
        }
        log::debug!("running {} close actions", actions.len());
        let failures: Vec<StreamError> = actions
            .into_iter()
            .filter_map(|action| action().err())
            .collect();
        match StreamError::aggregate(failures) {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    pub fn config(&self) -> StreamConfig {
        self.config.get()
    }

    pub fn set_config(&self, config: StreamConfig) {
        self.config.set(config);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminate_twice_fails() {
        let root = Termination::new();
        assert!(root.terminate().is_ok());
        let err = root.terminate().unwrap_err();
        assert!(err.is_illegal_state());
    }

    #[test]
    fn close_runs_actions_in_order_once() {
        let root = Termination::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        for i in 0..3 {
            let log = log.clone();
            root.on_close(move || {
                log.borrow_mut().push(i);
                Ok(())
            });
        }
        root.close().unwrap();
        root.close().unwrap();
        assert_eq!(*log.borrow(), vec![0, 1, 2]);
        assert!(root.is_terminated());
    }

    #[test]
    fn close_aggregates_failures_and_keeps_going() {
        let root = Termination::new();
        let ran = Rc::new(Cell::new(0));
        let r = ran.clone();
        root.on_close(|| Err(StreamError::Custom("first".into())));
        root.on_close(move || {
            r.set(r.get() + 1);
            Ok(())
        });
        root.on_close(|| Err(StreamError::Custom("second".into())));

        let err = root.close().unwrap_err();
        assert_eq!(ran.get(), 1);
        assert_eq!(err.primary(), &StreamError::Custom("first".into()));
        assert_eq!(err.suppressed(), &[StreamError::Custom("second".into())]);
    }

    #[test]
    fn single_failure_is_returned_unwrapped() {
        let root = Termination::new();
        root.on_close(|| Err(StreamError::Custom("only".into())));
        assert_eq!(root.close().unwrap_err(), StreamError::Custom("only".into()));
    }

    #[test]
    fn close_action_may_register_another() {
        let root = Termination::new();
        let inner = root.clone();
        root.on_close(move || {
            inner.on_close(|| Ok(()));
            Ok(())
        });
        root.close().unwrap();
        assert_eq!(root.pending_close_actions(), 1);
    }
}
