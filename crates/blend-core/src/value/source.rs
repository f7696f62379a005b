//! Factory-or-value sides of deferred state merges

use super::{Callable, Value};
use crate::instance::Instance;

/// One side of a state-factory merge
///
/// A definition may author per-instance state either as a factory or as a
/// plain value. The distinction is made once, when the merged factory is
/// built, and every later invocation simply evaluates the chosen variant.
#[derive(Debug, Clone)]
pub enum Source {
    Factory(Callable),
    Value(Value),
}

impl Source {
    /// Produce this side's state for `instance`
    pub fn evaluate(&self, instance: &Instance) -> Value {
        match self {
            Source::Factory(factory) => factory.call(instance),
            Source::Value(value) => value.clone(),
        }
    }
}

impl From<Value> for Source {
    fn from(value: Value) -> Self {
        match value {
            Value::Func(factory) => Source::Factory(factory),
            other => Source::Value(other),
        }
    }
}
