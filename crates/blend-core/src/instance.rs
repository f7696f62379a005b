//! Instance context supplied at instantiation time
//!
//! The engine does not own instances; instantiation hands it an [`Instance`]
//! so that instance-stage strategies can tell they run for a concrete
//! instance and so that deferred state merges can register new keys with the
//! surrounding reactive system.

use crate::value::{Record, Value};
use std::fmt;
use std::rc::Rc;

/// Key reserved for the reactive system's bookkeeping; never merged.
pub const OBSERVER_KEY: &str = "__ob__";

/// Registers a property on a state record so that it becomes observable
///
/// Implemented by the reactive system. Deep merge calls it for every key the
/// inherited state contributes to the instance's own state.
pub trait PropertyTracker {
    fn define(&self, target: &Record, key: &str, value: Value);
}

/// Tracker that inserts keys without observing them
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTracker;

impl PropertyTracker for PlainTracker {
    fn define(&self, target: &Record, key: &str, value: Value) {
        target.insert(key, value);
    }
}

/// Opaque instance context
#[derive(Clone)]
pub struct Instance {
    tracker: Rc<dyn PropertyTracker>,
}

impl Instance {
    pub fn new(tracker: impl PropertyTracker + 'static) -> Self {
        Self {
            tracker: Rc::new(tracker),
        }
    }

    /// Instance whose state is not observed
    pub fn untracked() -> Self {
        Self::new(PlainTracker)
    }

    pub fn tracker(&self) -> &dyn PropertyTracker {
        self.tracker.as_ref()
    }
}

impl Default for Instance {
    fn default() -> Self {
        Self::untracked()
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance").finish_non_exhaustive()
    }
}
