//! Blend Core
//!
//! Configuration composition engine. Takes a component's own definition, the
//! configuration inherited from an ancestor and any applied extensions, and
//! produces one resolved configuration:
//!
//! - [`normalize`] rewrites multi-syntax fields into canonical shapes
//! - [`strategy`] holds the per-field merge strategies
//! - [`Composer::merge`] folds `extends`/`mixins` and merges field by field
//! - [`Composer::resolve`] caches resolved options along a [`Lineage`]
//! - [`Composer::resolve_asset`] looks up components, directives and filters
//!
//! The engine is single-threaded; values are shared through `Rc` handles
//! and compared by identity where it matters (see [`value`]).

pub mod assets;
pub mod composer;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod instance;
pub mod lineage;
mod merge;
pub mod naming;
pub mod normalize;
pub mod options;
pub mod result;
pub mod strategy;
pub mod value;

pub use assets::{AssetKind, AssetTable};
pub use composer::Composer;
pub use config::ComposerConfig;
pub use diagnostics::{Diagnostic, Reporter};
pub use error::{BlendError, ErrorKind};
pub use instance::{Instance, PlainTracker, PropertyTracker};
pub use lineage::{Lineage, WeakLineage};
pub use naming::{camelize, capitalize};
pub use options::{Options, fields};
pub use result::Result;
pub use strategy::{LIFECYCLE_HOOKS, MergeContext, MergeStrategy, StrategyRegistry};
pub use value::{Callable, ConstructorRef, Record, Source, Value};

/// Initialize the tracing subscriber for logging
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("blend=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
