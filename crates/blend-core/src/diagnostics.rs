//! Non-fatal diagnostics for misused definitions
//!
//! The engine never rejects a definition. Malformed field shapes, invalid
//! component names and misplaced instance-only fields are reported as a
//! [`Diagnostic`] and the offending contribution is ignored or passed through
//! unchanged.
//!
//! Reporting is a debug-time facility. When [`Reporter::is_enabled`] is false
//! (the default in release builds) callers skip validation altogether, so
//! production merges pay nothing for it.

use crate::assets::AssetKind;
use std::fmt;
use std::rc::Rc;
use thiserror::Error;
use tracing::warn;

/// A detected misuse of a definition
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Diagnostic {
    #[error(
        "Invalid component name: \"{name}\". Component names should start with a letter and contain only letters, digits, '-', '_' or '.'"
    )]
    InvalidComponentName { name: String },

    #[error("Do not use built-in or reserved names as component id: {name}")]
    ReservedComponentName { name: String },

    #[error("props must be strings when using array syntax (got {found})")]
    NonStringProp { found: String },

    #[error("Invalid value for option \"{option}\": expected an Array or an Object, but got {found}")]
    InvalidOptionShape { option: String, found: String },

    #[error("Invalid value for option \"{option}\": expected an Object, but got {found}")]
    ExpectedObject { option: String, found: String },

    #[error("option \"{option}\" can only be used during instance creation")]
    RestrictedOption { option: String },

    #[error(
        "The \"{option}\" option should be a function that returns a per-instance value in component definitions"
    )]
    NonFactoryState { option: String },

    #[error("Failed to resolve {kind}: {id}")]
    UnresolvedAsset { kind: AssetKind, id: String },
}

type WarnHandler = Rc<dyn Fn(&Diagnostic)>;

/// Routes diagnostics to a warn handler or to the log
#[derive(Clone)]
pub struct Reporter {
    enabled: bool,
    silent: bool,
    handler: Option<WarnHandler>,
}

impl Reporter {
    pub fn new(enabled: bool, silent: bool) -> Self {
        Self {
            enabled,
            silent,
            handler: None,
        }
    }

    /// Reporter that never validates
    pub fn disabled() -> Self {
        Self::new(false, true)
    }

    /// Replace log output with `handler`
    pub fn set_handler(&mut self, handler: impl Fn(&Diagnostic) + 'static) {
        self.handler = Some(Rc::new(handler));
    }

    /// Whether validation should run at all
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn report(&self, diagnostic: Diagnostic) {
        if !self.enabled {
            return;
        }
        match &self.handler {
            Some(handler) => handler(&diagnostic),
            None if !self.silent => warn!(target: "blend::diagnostics", "{}", diagnostic),
            None => {}
        }
    }
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new(cfg!(debug_assertions), false)
    }
}

impl fmt::Debug for Reporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reporter")
            .field("enabled", &self.enabled)
            .field("silent", &self.silent)
            .field("handler", &self.handler.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn collecting_reporter(enabled: bool) -> (Reporter, Rc<RefCell<Vec<Diagnostic>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut reporter = Reporter::new(enabled, false);
        reporter.set_handler(move |d| sink.borrow_mut().push(d.clone()));
        (reporter, seen)
    }

    #[test]
    fn test_handler_receives_diagnostics() {
        let (reporter, seen) = collecting_reporter(true);
        reporter.report(Diagnostic::RestrictedOption {
            option: "el".to_string(),
        });

        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(
            seen.borrow()[0].to_string(),
            "option \"el\" can only be used during instance creation"
        );
    }

    #[test]
    fn test_disabled_reporter_drops_everything() {
        let (reporter, seen) = collecting_reporter(false);
        reporter.report(Diagnostic::NonStringProp {
            found: "Number".to_string(),
        });
        assert!(seen.borrow().is_empty());
        assert!(!Reporter::disabled().is_enabled());
    }

    #[test]
    fn test_unresolved_asset_message() {
        let diagnostic = Diagnostic::UnresolvedAsset {
            kind: AssetKind::Component,
            id: "my-widget".to_string(),
        };
        assert_eq!(diagnostic.to_string(), "Failed to resolve component: my-widget");
    }
}
