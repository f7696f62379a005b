//! Definitions and resolved options
//!
//! Both an author's raw definition and the engine's merged output are
//! [`Options`]: a shared, ordered map from field name to [`Value`]. The only
//! structural difference is the *merged* marker. Every merge output (and the
//! root options returned by [`Composer::base_options`]) carries it, and a
//! merged child's `extends`/`mixins` are not folded again.
//!
//! Resolved options are never mutated in place by the engine. External code
//! may still patch fields with [`Options::set`]; the lineage resolver detects
//! such late edits by identity and carries them across recomputation.
//!
//! [`Composer::base_options`]: crate::Composer::base_options

use crate::value::Value;
use indexmap::IndexMap;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Well-known field names
pub mod fields {
    pub const NAME: &str = "name";
    pub const EXTENDS: &str = "extends";
    pub const MIXINS: &str = "mixins";

    pub const DATA: &str = "data";
    pub const PROVIDE: &str = "provide";

    pub const PROPS: &str = "props";
    pub const INJECT: &str = "inject";
    pub const METHODS: &str = "methods";
    pub const COMPUTED: &str = "computed";
    pub const WATCH: &str = "watch";

    pub const COMPONENTS: &str = "components";
    pub const DIRECTIVES: &str = "directives";
    pub const FILTERS: &str = "filters";

    pub const EL: &str = "el";
    pub const PROPS_DATA: &str = "propsData";
}

#[derive(Default)]
struct OptionsData {
    fields: IndexMap<String, Value>,
    merged: bool,
}

/// Shared handle to a definition or a resolved configuration
#[derive(Clone, Default)]
pub struct Options(Rc<RefCell<OptionsData>>);

impl Options {
    /// Empty, unmerged definition
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge output
    pub(crate) fn merged(fields: IndexMap<String, Value>) -> Self {
        Options(Rc::new(RefCell::new(OptionsData {
            fields,
            merged: true,
        })))
    }

    /// Builder-style field assignment
    pub fn with(self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.0.borrow().fields.get(key).cloned()
    }

    /// Assign a field, returning the previous value
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.borrow_mut().fields.insert(key.into(), value.into())
    }

    pub fn remove(&self, key: &str) -> Option<Value> {
        self.0.borrow_mut().fields.shift_remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.borrow().fields.contains_key(key)
    }

    pub fn keys(&self) -> Vec<String> {
        self.0.borrow().fields.keys().cloned().collect()
    }

    /// Snapshot of all fields in insertion order
    pub fn entries(&self) -> Vec<(String, Value)> {
        self.0
            .borrow()
            .fields
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().fields.is_empty()
    }

    /// Whether these options are the output of a merge
    pub fn is_merged(&self) -> bool {
        self.0.borrow().merged
    }

    /// Declared name, when it is a string
    pub fn name(&self) -> Option<String> {
        self.get(fields::NAME)
            .and_then(|v| v.as_str().map(str::to_string))
    }

    /// New handle with the same fields and marker; field values are shared
    pub fn shallow_copy(&self) -> Options {
        let data = self.0.borrow();
        Options(Rc::new(RefCell::new(OptionsData {
            fields: data.fields.clone(),
            merged: data.merged,
        })))
    }

    pub fn ptr_eq(&self, other: &Options) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.0.borrow();
        f.debug_struct("Options")
            .field("merged", &data.merged)
            .field("fields", &data.fields.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definition_is_not_merged() {
        let def = Options::new().with(fields::NAME, "card");
        assert!(!def.is_merged());
        assert_eq!(def.name(), Some("card".to_string()));
    }

    #[test]
    fn test_shallow_copy_keeps_marker_and_values() {
        let options = Options::merged(IndexMap::new());
        options.set("answer", 42);

        let copy = options.shallow_copy();
        assert!(copy.is_merged());
        assert!(!copy.ptr_eq(&options));
        assert!(copy.get("answer").unwrap().same(&Value::from(42)));

        copy.set("answer", 7);
        assert!(options.get("answer").unwrap().same(&Value::from(42)));
    }

    #[test]
    fn test_non_string_name_is_ignored() {
        let def = Options::new().with(fields::NAME, 3);
        assert_eq!(def.name(), None);
    }
}
