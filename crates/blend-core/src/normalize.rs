//! Field normalization
//!
//! Several fields accept more than one authoring syntax. Before a definition
//! is merged, those fields are rewritten into a single canonical shape so
//! that every strategy sees uniform input:
//!
//! | Field        | Accepted                        | Canonical                          |
//! |--------------|---------------------------------|------------------------------------|
//! | `props`      | `["a-b", ...]` or `{name: spec}`| `{aB: {type: ...}}`                |
//! | `inject`     | `["key", ...]` or `{name: spec}`| `{name: {from: key, ...}}`         |
//! | `directives` | `{name: fn}` or `{name: {...}}` | `{name: {bind: fn, update: fn}}`   |
//!
//! Normalization returns a new definition and leaves its input untouched;
//! normalizing a normalized definition yields the same shapes again.

use crate::diagnostics::{Diagnostic, Reporter};
use crate::naming::camelize;
use crate::options::{Options, fields};
use crate::value::{Record, Value};

const PROP_TYPE: &str = "type";
const INJECT_FROM: &str = "from";
const DIRECTIVE_BIND: &str = "bind";
const DIRECTIVE_UPDATE: &str = "update";

/// Normalize the multi-syntax fields of `definition`
pub fn normalize(definition: &Options, reporter: &Reporter) -> Options {
    let normalized = definition.shallow_copy();

    if let Some(props) = definition.get(fields::PROPS).filter(Value::is_truthy) {
        normalized.set(fields::PROPS, normalize_props(&props, reporter));
    }
    if let Some(inject) = definition.get(fields::INJECT).filter(Value::is_truthy) {
        normalized.set(fields::INJECT, normalize_inject(&inject, reporter));
    }
    if let Some(Value::Record(directives)) = definition.get(fields::DIRECTIVES) {
        normalized.set(fields::DIRECTIVES, normalize_directives(&directives));
    }

    normalized
}

fn normalize_props(props: &Value, reporter: &Reporter) -> Value {
    let normalized = Record::new();
    match props {
        Value::List(names) => {
            for entry in names.iter() {
                match entry.as_str() {
                    Some(name) => {
                        normalized.insert(camelize(name), Record::new().with(PROP_TYPE, Value::Null));
                    }
                    None if reporter.is_enabled() => reporter.report(Diagnostic::NonStringProp {
                        found: entry.type_name().to_string(),
                    }),
                    None => {}
                }
            }
        }
        Value::Record(specs) => {
            for (name, spec) in specs.entries() {
                let spec = match spec {
                    Value::Record(_) => spec,
                    other => Value::Record(Record::new().with(PROP_TYPE, other)),
                };
                normalized.insert(camelize(&name), spec);
            }
        }
        other => {
            if reporter.is_enabled() {
                reporter.report(Diagnostic::InvalidOptionShape {
                    option: fields::PROPS.to_string(),
                    found: other.type_name().to_string(),
                });
            }
        }
    }
    Value::Record(normalized)
}

fn normalize_inject(inject: &Value, reporter: &Reporter) -> Value {
    let normalized = Record::new();
    match inject {
        Value::List(keys) => {
            for key in keys.iter().filter_map(Value::as_str) {
                normalized.insert(key, Record::new().with(INJECT_FROM, key));
            }
        }
        Value::Record(specs) => {
            for (name, spec) in specs.entries() {
                let entry = match spec {
                    Value::Record(spec) => {
                        let entry = Record::new().with(INJECT_FROM, name.as_str());
                        for (k, v) in spec.entries() {
                            entry.insert(k, v);
                        }
                        entry
                    }
                    other => Record::new().with(INJECT_FROM, other),
                };
                normalized.insert(name, entry);
            }
        }
        other => {
            if reporter.is_enabled() {
                reporter.report(Diagnostic::InvalidOptionShape {
                    option: fields::INJECT.to_string(),
                    found: other.type_name().to_string(),
                });
            }
        }
    }
    Value::Record(normalized)
}

fn normalize_directives(directives: &Record) -> Value {
    let normalized = Record::new();
    for (name, definition) in directives.entries() {
        let definition = match definition {
            Value::Func(hook) => Value::Record(
                Record::new()
                    .with(DIRECTIVE_BIND, hook.clone())
                    .with(DIRECTIVE_UPDATE, hook),
            ),
            other => other,
        };
        normalized.insert(name, definition);
    }
    Value::Record(normalized)
}
