//! Built-in strategies for non-state fields

use super::MergeContext;
use crate::assets::AssetTable;
use crate::diagnostics::Diagnostic;
use crate::value::{Record, Value};

/// Child overrides parent when present
pub fn default_strategy(
    parent: Option<&Value>,
    child: Option<&Value>,
    _ctx: &MergeContext<'_>,
    _field: &str,
) -> Option<Value> {
    child.or(parent).cloned()
}

/// Instance-only fields: flagged when merged outside instantiation, then
/// merged with the default strategy anyway
pub fn merge_restricted(
    parent: Option<&Value>,
    child: Option<&Value>,
    ctx: &MergeContext<'_>,
    field: &str,
) -> Option<Value> {
    if ctx.instance().is_none() && ctx.reporter().is_enabled() {
        ctx.reporter().report(Diagnostic::RestrictedOption {
            option: field.to_string(),
        });
    }
    default_strategy(parent, child, ctx, field)
}

/// Lifecycle hooks: `parent ++ child`, keeping the first occurrence of each
/// hook so a hook reached through several inheritance paths runs once
///
/// A falsy contribution leaves the other side's sequence unchanged.
pub fn merge_hooks(
    parent: Option<&Value>,
    child: Option<&Value>,
    _ctx: &MergeContext<'_>,
    _field: &str,
) -> Option<Value> {
    let parent = parent.filter(|p| p.is_truthy());
    let child = child.filter(|c| c.is_truthy());
    let combined = match (parent, child) {
        (None, None) => return None,
        (Some(parent), None) => parent.to_sequence(),
        (None, Some(child)) => child.to_sequence(),
        (Some(parent), Some(child)) => {
            let mut hooks = parent.to_sequence();
            hooks.extend(child.to_sequence());
            hooks
        }
    };
    Some(Value::from(dedupe_hooks(combined)))
}

fn dedupe_hooks(hooks: Vec<Value>) -> Vec<Value> {
    let mut unique: Vec<Value> = Vec::with_capacity(hooks.len());
    for hook in hooks {
        if !unique.iter().any(|seen| seen.same(&hook)) {
            unique.push(hook);
        }
    }
    unique
}

/// Asset tables: a new table delegating to the parent's, with the child's own
/// entries on its local layer
///
/// A child that is itself a derived table contributes every layer it does not
/// share with the parent.
pub fn merge_assets(
    parent: Option<&Value>,
    child: Option<&Value>,
    ctx: &MergeContext<'_>,
    field: &str,
) -> Option<Value> {
    let inherited = match parent {
        Some(Value::Assets(parent)) => Some(parent.clone()),
        Some(Value::Record(parent)) => Some(AssetTable::from_record(parent)),
        _ => None,
    };
    let table = inherited
        .as_ref()
        .map(AssetTable::delegating_to)
        .unwrap_or_default();

    match child {
        Some(Value::Record(own)) => {
            for (name, value) in own.entries() {
                table.register(name, value);
            }
        }
        Some(Value::Assets(own)) => {
            for (name, value) in own.entries_outside(inherited.as_ref()) {
                table.register(name, value);
            }
        }
        Some(other) => report_expected_object(ctx, field, other),
        None => {}
    }

    Some(Value::Assets(table))
}

/// Watchers: per key, parent handlers followed by child handlers
pub fn merge_watch(
    parent: Option<&Value>,
    child: Option<&Value>,
    ctx: &MergeContext<'_>,
    field: &str,
) -> Option<Value> {
    if let Some(child) = child.filter(|c| c.as_record().is_none()) {
        report_expected_object(ctx, field, child);
    }

    let merged = Record::new();
    if let Some(parent) = parent.and_then(Value::as_record) {
        for (key, handlers) in parent.entries() {
            merged.insert(key, Value::from(handlers.to_sequence()));
        }
    }
    if let Some(child) = child.and_then(Value::as_record) {
        for (key, handlers) in child.entries() {
            let mut combined = merged
                .get(&key)
                .map(|existing| existing.to_sequence())
                .unwrap_or_default();
            combined.extend(handlers.to_sequence());
            merged.insert(key, Value::from(combined));
        }
    }

    Some(Value::Record(merged))
}

/// Flat tables (props, methods, inject, computed): shallow union, child wins
pub fn merge_table(
    parent: Option<&Value>,
    child: Option<&Value>,
    ctx: &MergeContext<'_>,
    field: &str,
) -> Option<Value> {
    if let Some(child) = child.filter(|c| c.as_record().is_none()) {
        report_expected_object(ctx, field, child);
    }

    let Some(parent) = parent else {
        return child.cloned();
    };

    let merged = Record::new();
    for source in [Some(parent), child].into_iter().flatten() {
        if let Some(record) = source.as_record() {
            for (key, value) in record.entries() {
                merged.insert(key, value);
            }
        }
    }
    Some(Value::Record(merged))
}

fn report_expected_object(ctx: &MergeContext<'_>, field: &str, value: &Value) {
    if ctx.reporter().is_enabled() {
        ctx.reporter().report(Diagnostic::ExpectedObject {
            option: field.to_string(),
            found: value.type_name().to_string(),
        });
    }
}
