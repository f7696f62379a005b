//! Deferred per-instance state: `data` and `provide`
//!
//! Both fields describe values that must be produced fresh for every
//! instance. Merging them never evaluates anything; it builds a new factory
//! that evaluates both sides when invoked and deep-merges the results, the
//! child's result being the primary target.

use super::MergeContext;
use crate::diagnostics::Diagnostic;
use crate::instance::{Instance, OBSERVER_KEY};
use crate::value::{Record, Source, Value};

/// Strategy for `data`
///
/// Same as [`merge_state`], but a plain (non-callable) child authored on a
/// reusable definition is flagged, since its state would be shared between
/// instances.
pub fn merge_data(
    parent: Option<&Value>,
    child: Option<&Value>,
    ctx: &MergeContext<'_>,
    field: &str,
) -> Option<Value> {
    let shared_child = child.is_some_and(|c| c.is_truthy() && !c.is_callable());
    if ctx.instance().is_none() && shared_child && ctx.reporter().is_enabled() {
        ctx.reporter().report(Diagnostic::NonFactoryState {
            option: field.to_string(),
        });
    }
    merge_state(parent, child, ctx, field)
}

/// Strategy for `provide`
pub fn merge_provide(
    parent: Option<&Value>,
    child: Option<&Value>,
    ctx: &MergeContext<'_>,
    field: &str,
) -> Option<Value> {
    merge_state(parent, child, ctx, field)
}

/// Deferred factory merge shared by the state fields
///
/// A falsy contribution on either side counts as absent.
pub fn merge_state(
    parent: Option<&Value>,
    child: Option<&Value>,
    ctx: &MergeContext<'_>,
    _field: &str,
) -> Option<Value> {
    let parent = parent.filter(|p| p.is_truthy());
    let child = child.filter(|c| c.is_truthy());

    let Some(instance) = ctx.instance() else {
        let (parent, child) = match (parent, child) {
            (parent, None) => return parent.cloned(),
            (None, child) => return child.cloned(),
            (Some(parent), Some(child)) => (parent, child),
        };
        let child = Source::from(child.clone());
        let parent = Source::from(parent.clone());
        return Some(Value::func(move |instance| {
            combine(
                child.evaluate(instance),
                Some(parent.evaluate(instance)),
                instance,
            )
        }));
    };

    if parent.is_none() && child.is_none() {
        return None;
    }

    let instance = instance.clone();
    let child = child.cloned().map(Source::from);
    let parent = parent.cloned().map(Source::from);
    Some(Value::func(move |_| {
        let inherited = parent
            .as_ref()
            .map(|p| p.evaluate(&instance))
            .filter(Value::is_truthy);
        match child.as_ref().map(|c| c.evaluate(&instance)) {
            Some(own) if own.is_truthy() => combine(own, inherited, &instance),
            _ => inherited.unwrap_or(Value::Null),
        }
    }))
}

fn combine(primary: Value, secondary: Option<Value>, instance: &Instance) -> Value {
    if let (Value::Record(target), Some(Value::Record(source))) = (&primary, &secondary) {
        deep_merge(target, source, instance);
    }
    primary
}

/// Fold `source` into `target`
///
/// Keys missing from `target` are registered through the instance's property
/// tracker. Keys present on both sides recurse when both values are distinct
/// records; otherwise `target` keeps its value. The observer bookkeeping key
/// is never copied.
pub fn deep_merge(target: &Record, source: &Record, instance: &Instance) {
    for (key, incoming) in source.entries() {
        if key == OBSERVER_KEY {
            continue;
        }
        match target.get(&key) {
            None => instance.tracker().define(target, &key, incoming),
            Some(Value::Record(existing)) => {
                if let Value::Record(nested) = &incoming
                    && !existing.ptr_eq(nested)
                {
                    deep_merge(&existing, nested, instance);
                }
            }
            Some(_) => {}
        }
    }
}
