//! Options merge engine

use crate::composer::Composer;
use crate::instance::Instance;
use crate::normalize::normalize;
use crate::options::{Options, fields};
use crate::strategy::MergeContext;
use crate::value::Value;
use indexmap::IndexMap;
use tracing::trace;

impl Composer {
    /// Merge `child` on top of `parent`
    ///
    /// `child` is normalized first. Unless it is itself a merge output, its
    /// `extends` target and then each of its `mixins` are folded into
    /// `parent` before the main pass, giving the precedence
    /// `parent < extends < mixins (in order) < child`.
    ///
    /// Every field of the folded parent, then every field only `child`
    /// declares, is merged by its registered strategy. The result is a new
    /// merged [`Options`]; neither input is modified.
    ///
    /// `instance` is supplied only when merging at instantiation time.
    pub fn merge(&self, parent: &Options, child: &Options, instance: Option<&Instance>) -> Options {
        if self.reporter().is_enabled() {
            self.check_components(child);
        }

        let child = normalize(child, self.reporter());
        let mut parent = parent.clone();

        if !child.is_merged() {
            if let Some(base) = child.get(fields::EXTENDS).as_ref().and_then(definition_of) {
                parent = self.merge(&parent, &base, instance);
            }
            if let Some(mixins) = child.get(fields::MIXINS) {
                for mixin in mixins.to_sequence().iter().filter_map(definition_of) {
                    parent = self.merge(&parent, &mixin, instance);
                }
            }
        }

        let ctx = MergeContext::new(instance, self.reporter());
        let mut merged = IndexMap::with_capacity(parent.len() + child.len());

        for (field, inherited) in parent.entries() {
            let own = child.get(&field);
            if let Some(value) = self.strategies().apply(&field, Some(&inherited), own.as_ref(), &ctx) {
                merged.insert(field, value);
            }
        }
        for (field, own) in child.entries() {
            if parent.contains_key(&field) {
                continue;
            }
            if let Some(value) = self.strategies().apply(&field, None, Some(&own), &ctx) {
                merged.insert(field, value);
            }
        }

        trace!("Merged {} fields", merged.len());
        Options::merged(merged)
    }

    fn check_components(&self, child: &Options) {
        let names = match child.get(fields::COMPONENTS) {
            Some(Value::Record(table)) => table.keys(),
            Some(Value::Assets(table)) => table.own_names(),
            _ => return,
        };
        for name in names {
            if let Err(diagnostic) = self.validate_name(&name) {
                self.reporter().report(diagnostic);
            }
        }
    }
}

/// The definition contributed by an `extends` or `mixins` entry
fn definition_of(value: &Value) -> Option<Options> {
    match value {
        Value::Options(options) => Some(options.clone()),
        Value::Constructor(_) => value.as_constructor().map(|ctor| ctor.options()),
        _ => None,
    }
}
