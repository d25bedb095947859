//! Apply Lifecycle - One cancellable apply in flight per page
//!
//! Before the assistant leaves a page it asks the page to apply its
//! settings. The page may finish synchronously or later on; either way the
//! completion callback runs exactly once, after the in-flight state has
//! been cleared.

use gtk::gio;
use gtk::prelude::*;
use thiserror::Error;

/// Completion callback, receives whether the page's input was valid
pub type ApplyCallback = Box<dyn FnOnce(bool)>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApplyError {
    #[error("an apply is already in progress")]
    AlreadyApplying,

    #[error("no apply is in progress")]
    NotApplying,
}

/// Bookkeeping for a page's apply
#[derive(Default)]
pub struct ApplyState {
    cancellable: Option<gio::Cancellable>,
    callback: Option<ApplyCallback>,
}

impl ApplyState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_applying(&self) -> bool {
        self.cancellable.is_some()
    }

    /// Start an apply, returning the cancellable the page should honour.
    pub fn begin(&mut self, callback: ApplyCallback) -> Result<gio::Cancellable, ApplyError> {
        if self.is_applying() {
            return Err(ApplyError::AlreadyApplying);
        }

        let cancellable = gio::Cancellable::new();
        self.cancellable = Some(cancellable.clone());
        self.callback = Some(callback);
        Ok(cancellable)
    }

    /// End the in-flight apply and hand back its callback.
    ///
    /// The callback is returned rather than invoked so the caller can drop
    /// any borrow of this state first; callbacks routinely start the next
    /// page's apply.
    pub fn finish(&mut self) -> Result<Option<ApplyCallback>, ApplyError> {
        if self.cancellable.take().is_none() {
            return Err(ApplyError::NotApplying);
        }
        Ok(self.callback.take())
    }

    /// Cancel the in-flight apply, if any. Returns whether one was running.
    pub fn cancel(&self) -> bool {
        match self.cancellable {
            Some(ref cancellable) => {
                cancellable.cancel();
                true
            }
            None => false,
        }
    }
}

impl Drop for ApplyState {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for ApplyState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApplyState")
            .field("applying", &self.is_applying())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder() -> (Rc<RefCell<Vec<bool>>>, ApplyCallback) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let sink = calls.clone();
        (calls, Box::new(move |valid| sink.borrow_mut().push(valid)))
    }

    #[test]
    fn test_begin_then_finish_returns_callback() {
        let mut state = ApplyState::new();
        let (calls, callback) = recorder();

        let cancellable = state.begin(callback).unwrap();
        assert!(state.is_applying());
        assert!(!cancellable.is_cancelled());

        let callback = state.finish().unwrap().unwrap();
        assert!(!state.is_applying());

        callback(true);
        assert_eq!(*calls.borrow(), vec![true]);
    }

    #[test]
    fn test_second_begin_is_rejected() {
        let mut state = ApplyState::new();
        let (_, first) = recorder();
        let (second_calls, second) = recorder();

        state.begin(first).unwrap();
        assert_eq!(state.begin(second).err(), Some(ApplyError::AlreadyApplying));
        assert!(second_calls.borrow().is_empty());
    }

    #[test]
    fn test_finish_without_begin() {
        let mut state = ApplyState::new();
        assert!(matches!(state.finish(), Err(ApplyError::NotApplying)));
    }

    #[test]
    fn test_cancel_trips_the_cancellable() {
        let mut state = ApplyState::new();
        let (_, callback) = recorder();

        assert!(!state.cancel());

        let cancellable = state.begin(callback).unwrap();
        assert!(state.cancel());
        assert!(cancellable.is_cancelled());

        // Cancelling does not end the apply; the page still reports back.
        assert!(state.is_applying());
        assert!(state.finish().is_ok());
    }

    #[test]
    fn test_state_is_reusable_after_finish() {
        let mut state = ApplyState::new();
        let (_, first) = recorder();
        let (_, second) = recorder();

        let old = state.begin(first).unwrap();
        state.finish().unwrap();

        let new = state.begin(second).unwrap();
        assert_ne!(old, new);
    }

    #[test]
    fn test_dropping_state_cancels_in_flight_apply() {
        let mut state = ApplyState::new();
        let (calls, callback) = recorder();

        let cancellable = state.begin(callback).unwrap();
        drop(state);

        assert!(cancellable.is_cancelled());
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn test_weak_callback_lets_owner_drop_while_applying() {
        let owner = Rc::new(RefCell::new(ApplyState::new()));
        let weak_owner = Rc::downgrade(&owner);

        let cancellable = owner
            .borrow_mut()
            .begin(Box::new(move |_| {
                let _ = weak_owner.upgrade();
            }))
            .unwrap();
        let alive = Rc::downgrade(&owner);
        drop(owner);

        assert!(alive.upgrade().is_none());
        assert!(cancellable.is_cancelled());
    }
}
