//! The composition engine entry point
//!
//! A [`Composer`] owns the strategy registry and the diagnostics reporter.
//! Merging lives in `merge.rs` and lineage resolution in `lineage.rs`; both
//! are implemented as methods on this type.
//!
//! ```rust
//! use blend_core::{Composer, ComposerConfig, Lineage, Options};
//!
//! let composer = Composer::new(ComposerConfig::default());
//! let root = Lineage::root(composer.base_options());
//!
//! let card = composer.extend(&root, &Options::new().with("name", "card"));
//! let resolved = composer.resolve(&card);
//! assert!(resolved.ptr_eq(&composer.resolve(&card)));
//! assert_eq!(resolved.name().as_deref(), Some("card"));
//! ```

use crate::assets::{AssetKind, AssetTable, find_asset};
use crate::config::ComposerConfig;
use crate::diagnostics::{Diagnostic, Reporter};
use crate::naming::validate_component_name;
use crate::options::Options;
use crate::strategy::StrategyRegistry;
use crate::value::Value;
use indexmap::IndexMap;

/// Configuration composition engine
#[derive(Debug, Clone)]
pub struct Composer {
    config: ComposerConfig,
    strategies: StrategyRegistry,
    reporter: Reporter,
}

impl Composer {
    pub fn new(config: ComposerConfig) -> Self {
        let mut strategies = StrategyRegistry::new();
        for hook in &config.hook_names {
            strategies.register_hook(hook.clone());
        }
        let reporter = Reporter::new(config.debug_checks, config.silent);

        Self {
            config,
            strategies,
            reporter,
        }
    }

    /// Route diagnostics to `handler` instead of the log
    pub fn with_warn_handler(mut self, handler: impl Fn(&Diagnostic) + 'static) -> Self {
        self.reporter.set_handler(handler);
        self
    }

    pub fn config(&self) -> &ComposerConfig {
        &self.config
    }

    pub fn strategies(&self) -> &StrategyRegistry {
        &self.strategies
    }

    /// Mutable access for registering custom strategies
    pub fn strategies_mut(&mut self) -> &mut StrategyRegistry {
        &mut self.strategies
    }

    pub fn reporter(&self) -> &Reporter {
        &self.reporter
    }

    /// Root options: one empty asset table per kind, marked as merged
    ///
    /// Host-wide assets are registered on these tables and become visible to
    /// every lineage rooted on them.
    pub fn base_options(&self) -> Options {
        let tables = AssetKind::ALL
            .into_iter()
            .map(|kind| (kind.field().to_string(), Value::Assets(AssetTable::new())))
            .collect::<IndexMap<_, _>>();
        Options::merged(tables)
    }

    /// Check a component name against the naming rule and the reserved names
    pub fn validate_name(&self, name: &str) -> Result<(), Diagnostic> {
        validate_component_name(name, &self.config.reserved_names)
    }

    /// Look up asset `id` of `kind` in resolved `options`
    ///
    /// A miss is reported when `warnMissingAssets` is set and `id` is a name.
    pub fn resolve_asset(&self, options: &Options, kind: AssetKind, id: &Value) -> Option<Value> {
        let found = find_asset(options, kind, id);
        if found.is_none()
            && self.config.warn_missing_assets
            && let Some(id) = id.as_str()
        {
            self.reporter.report(Diagnostic::UnresolvedAsset {
                kind,
                id: id.to_string(),
            });
        }
        found
    }
}

impl Default for Composer {
    fn default() -> Self {
        Self::new(ComposerConfig::default())
    }
}
