//! Composer configuration
//!
//! A [`ComposerConfig`] can be built in code or loaded from a `.json`,
//! `.yaml`/`.yml` or `.toml` file:
//!
//! ```yaml
//! debugChecks: true
//! warnMissingAssets: true
//! reservedNames: [div, span, section]
//! hookNames: [beforeRender]
//! ```

mod composer_config;

pub use composer_config::ComposerConfig;
