//! Merge strategy registry
//!
//! Each options field is merged by a strategy looked up by field name. A
//! strategy receives the parent's and child's value for that field (either
//! may be absent), the [`MergeContext`] and the field name, and returns the
//! merged value.
//!
//! # Built-in strategies
//!
//! | Fields                                         | Strategy                                   |
//! |------------------------------------------------|--------------------------------------------|
//! | `el`, `propsData`                              | instance-only; flagged outside instantiation |
//! | `data`, `provide`                              | deferred factory with deep merge           |
//! | lifecycle hooks                                | parent ++ child, de-duplicated by identity |
//! | `components`, `directives`, `filters`          | delegating [`AssetTable`]                  |
//! | `watch`                                        | per-key handler concatenation              |
//! | `props`, `methods`, `inject`, `computed`       | shallow union, child wins                  |
//! | anything else                                  | child if present, else parent              |
//!
//! The table is open: [`StrategyRegistry::register`] adds or replaces a
//! field's strategy and [`StrategyRegistry::register_hook`] adds a hook field.
//!
//! [`AssetTable`]: crate::assets::AssetTable

mod builtin;
mod state;

pub use builtin::{
    default_strategy, merge_assets, merge_hooks, merge_restricted, merge_table, merge_watch,
};
pub use state::{deep_merge, merge_data, merge_provide, merge_state};

use crate::assets::AssetKind;
use crate::diagnostics::Reporter;
use crate::instance::Instance;
use crate::options::fields;
use crate::value::Value;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use tracing::debug;

/// Built-in lifecycle hook fields
pub const LIFECYCLE_HOOKS: &[&str] = &[
    "beforeCreate",
    "created",
    "beforeMount",
    "mounted",
    "beforeUpdate",
    "updated",
    "beforeDestroy",
    "destroyed",
    "activated",
    "deactivated",
    "errorCaptured",
    "serverPrefetch",
];

/// Context shared by every strategy call of one merge
#[derive(Debug, Clone, Copy)]
pub struct MergeContext<'a> {
    instance: Option<&'a Instance>,
    reporter: &'a Reporter,
}

impl<'a> MergeContext<'a> {
    pub fn new(instance: Option<&'a Instance>, reporter: &'a Reporter) -> Self {
        Self { instance, reporter }
    }

    /// The instance being created, when merging at instantiation time
    pub fn instance(&self) -> Option<&'a Instance> {
        self.instance
    }

    pub fn reporter(&self) -> &'a Reporter {
        self.reporter
    }
}

/// A per-field merge function
///
/// Returns `None` only when neither side contributes anything.
pub trait MergeStrategy {
    fn merge(
        &self,
        parent: Option<&Value>,
        child: Option<&Value>,
        ctx: &MergeContext<'_>,
        field: &str,
    ) -> Option<Value>;
}

impl<F> MergeStrategy for F
where
    F: Fn(Option<&Value>, Option<&Value>, &MergeContext<'_>, &str) -> Option<Value>,
{
    fn merge(
        &self,
        parent: Option<&Value>,
        child: Option<&Value>,
        ctx: &MergeContext<'_>,
        field: &str,
    ) -> Option<Value> {
        self(parent, child, ctx, field)
    }
}

/// Field name → strategy table
#[derive(Clone)]
pub struct StrategyRegistry {
    strategies: HashMap<String, Rc<dyn MergeStrategy>>,
    fallback: Rc<dyn MergeStrategy>,
}

impl StrategyRegistry {
    /// Registry holding the built-in strategies
    pub fn new() -> Self {
        let mut registry = Self {
            strategies: HashMap::new(),
            fallback: Rc::new(default_strategy),
        };

        registry.register(fields::EL, merge_restricted);
        registry.register(fields::PROPS_DATA, merge_restricted);
        registry.register(fields::DATA, merge_data);
        registry.register(fields::PROVIDE, merge_provide);
        for hook in LIFECYCLE_HOOKS {
            registry.register(*hook, merge_hooks);
        }
        for kind in AssetKind::ALL {
            registry.register(kind.field(), merge_assets);
        }
        registry.register(fields::WATCH, merge_watch);
        for table in [fields::PROPS, fields::METHODS, fields::INJECT, fields::COMPUTED] {
            registry.register(table, merge_table);
        }

        registry
    }

    /// Add or replace the strategy for `field`
    pub fn register(&mut self, field: impl Into<String>, strategy: impl MergeStrategy + 'static) {
        let field = field.into();
        if self.strategies.contains_key(&field) {
            debug!("Replacing merge strategy for '{}'", field);
        }
        self.strategies.insert(field, Rc::new(strategy));
    }

    /// Merge `field` as a lifecycle hook sequence
    pub fn register_hook(&mut self, field: impl Into<String>) {
        self.register(field, merge_hooks);
    }

    /// Whether `field` has a registered strategy (as opposed to the default)
    pub fn contains(&self, field: &str) -> bool {
        self.strategies.contains_key(field)
    }

    /// Strategy for `field`, falling back to the default override strategy
    pub fn get(&self, field: &str) -> &dyn MergeStrategy {
        self.strategies
            .get(field)
            .map(|strategy| strategy.as_ref())
            .unwrap_or(self.fallback.as_ref())
    }

    /// Apply the strategy for `field`
    pub fn apply(
        &self,
        field: &str,
        parent: Option<&Value>,
        child: Option<&Value>,
        ctx: &MergeContext<'_>,
    ) -> Option<Value> {
        self.get(field).merge(parent, child, ctx, field)
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StrategyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut fields: Vec<_> = self.strategies.keys().collect();
        fields.sort();
        f.debug_struct("StrategyRegistry")
            .field("fields", &fields)
            .finish()
    }
}
