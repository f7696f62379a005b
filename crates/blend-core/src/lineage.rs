//! Constructor lineages and cached option resolution
//!
//! A [`Lineage`] node is a definition with identity, linked to the node it
//! was derived from. Each node caches:
//!
//! - `extend_options`: its own diff relative to its parent
//! - `super_options`: the parent's resolved options as last observed
//! - `options`: its current resolved options
//! - `sealed_options`: a snapshot of `options` taken right after resolution
//!
//! [`Composer::resolve`] re-merges a node only when the parent's resolved
//! options handle changed since it was cached. Edits applied directly to a
//! node's resolved options after resolution are detected against the sealed
//! snapshot and carried into the recomputed options.

use crate::assets::AssetTable;
use crate::composer::Composer;
use crate::instance::Instance;
use crate::options::{Options, fields};
use crate::value::{ConstructorRef, Value};
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use tracing::{debug, trace};

struct LineageNode {
    parent: Option<Lineage>,
    extend_options: Options,
    super_options: Option<Options>,
    options: Options,
    sealed_options: Options,
}

/// Shared handle to a lineage node
#[derive(Clone)]
pub struct Lineage(Rc<RefCell<LineageNode>>);

/// Non-owning handle to a lineage node
#[derive(Clone)]
pub struct WeakLineage(Weak<RefCell<LineageNode>>);

impl Lineage {
    /// A node without parent, owning `options` as its resolved options
    ///
    /// Usually rooted on [`Composer::base_options`].
    pub fn root(options: Options) -> Self {
        let sealed_options = options.shallow_copy();
        Lineage(Rc::new(RefCell::new(LineageNode {
            parent: None,
            extend_options: Options::new(),
            super_options: None,
            options,
            sealed_options,
        })))
    }

    pub fn parent(&self) -> Option<Lineage> {
        self.0.borrow().parent.clone()
    }

    /// Current resolved options, without checking the parent for changes
    pub fn options(&self) -> Options {
        self.0.borrow().options.clone()
    }

    /// Replace the resolved options wholesale
    ///
    /// Nodes derived from this one notice the new handle on their next
    /// resolution.
    pub fn set_options(&self, options: Options) {
        self.0.borrow_mut().options = options;
    }

    pub fn extend_options(&self) -> Options {
        self.0.borrow().extend_options.clone()
    }

    pub fn cached_super_options(&self) -> Option<Options> {
        self.0.borrow().super_options.clone()
    }

    pub fn sealed_options(&self) -> Options {
        self.0.borrow().sealed_options.clone()
    }

    /// Declared name of the current options
    pub fn name(&self) -> Option<String> {
        self.options().name()
    }

    pub fn ptr_eq(&self, other: &Lineage) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn downgrade(&self) -> WeakLineage {
        WeakLineage(Rc::downgrade(&self.0))
    }

    pub(crate) fn as_ptr(&self) -> *const () {
        Rc::as_ptr(&self.0) as *const ()
    }

    fn update(&self, super_options: Options, options: Options) {
        let mut node = self.0.borrow_mut();
        node.super_options = Some(super_options);
        node.sealed_options = options.shallow_copy();
        node.options = options;
    }
}

impl WeakLineage {
    pub fn upgrade(&self) -> Option<Lineage> {
        self.0.upgrade().map(Lineage)
    }

    pub(crate) fn as_ptr(&self) -> *const () {
        self.0.as_ptr() as *const ()
    }
}

impl fmt::Debug for Lineage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut depth = 0;
        let mut current = self.parent();
        while let Some(node) = current {
            depth += 1;
            current = node.parent();
        }
        f.debug_struct("Lineage")
            .field("name", &self.name())
            .field("depth", &depth)
            .finish()
    }
}

impl fmt::Debug for WeakLineage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.upgrade() {
            Some(lineage) => write!(f, "WeakLineage({:?})", lineage.name()),
            None => f.write_str("WeakLineage(<dropped>)"),
        }
    }
}

impl Composer {
    /// Derive a new lineage node from `parent` with the diff `extend_options`
    ///
    /// A node without a declared name inherits its parent's. A named node is
    /// registered under that name in its own component table.
    pub fn extend(&self, parent: &Lineage, extend_options: &Options) -> Lineage {
        let super_options = parent.options();
        let name = extend_options.name().or_else(|| super_options.name());

        if let Some(name) = &name
            && self.reporter().is_enabled()
            && let Err(diagnostic) = self.validate_name(name)
        {
            self.reporter().report(diagnostic);
        }

        let options = self.merge(&super_options, extend_options, None);
        let node = Lineage(Rc::new(RefCell::new(LineageNode {
            parent: Some(parent.clone()),
            extend_options: extend_options.shallow_copy(),
            super_options: Some(super_options),
            sealed_options: Options::new(),
            options: options.clone(),
        })));

        if let Some(name) = &name {
            register_self(&node, &options, name);
        }
        node.0.borrow_mut().sealed_options = options.shallow_copy();

        debug!("Extended lineage as '{}'", name.as_deref().unwrap_or("<anonymous>"));
        node
    }

    /// Current resolved options of `node`
    ///
    /// Resolves the parent chain first. When the parent's resolved options
    /// are the exact handle cached on `node`, `node`'s options are returned
    /// as they are. Otherwise `node` is re-merged on top of the fresh parent
    /// options; fields edited directly on `node`'s options since the last
    /// resolution are folded into its diff first so they survive.
    pub fn resolve(&self, node: &Lineage) -> Options {
        let Some(parent) = node.parent() else {
            return node.options();
        };

        let fresh = self.resolve(&parent);
        if node
            .cached_super_options()
            .is_some_and(|cached| cached.ptr_eq(&fresh))
        {
            trace!("Lineage {:?} is up to date", node.name());
            return node.options();
        }

        debug!("Parent options of {:?} changed, recomputing", node.name());

        let extend_options = node.extend_options();
        let sealed = node.sealed_options();
        for (field, value) in node.options().entries() {
            let edited = sealed
                .get(&field)
                .is_none_or(|snapshot| !snapshot.same(&value));
            if edited {
                trace!("Carrying late edit of '{}'", field);
                extend_options.set(field, value);
            }
        }

        let options = self.merge(&fresh, &extend_options, None);
        if let Some(name) = options.name() {
            register_self(node, &options, &name);
        }
        node.update(fresh, options.clone());
        options
    }

    /// Apply `mixin` to `node`, replacing its resolved options
    pub fn mixin(&self, node: &Lineage, mixin: &Options) {
        let options = self.merge(&node.options(), mixin, None);
        node.set_options(options);
    }

    /// Options for a new instance of `ctor`
    pub fn instance_options(&self, ctor: &Lineage, options: &Options, instance: &Instance) -> Options {
        let resolved = self.resolve(ctor);
        self.merge(&resolved, options, Some(instance))
    }
}

fn register_self(node: &Lineage, options: &Options, name: &str) {
    let components = match options.get(fields::COMPONENTS) {
        Some(Value::Assets(table)) => table,
        _ => {
            let table = AssetTable::new();
            options.set(fields::COMPONENTS, table.clone());
            table
        }
    };
    components.register(name, Value::Constructor(ConstructorRef::Weak(node.downgrade())));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetKind;
    use crate::config::ComposerConfig;

    fn composer() -> Composer {
        Composer::new(ComposerConfig::production())
    }

    #[test]
    fn test_root_resolves_to_its_options() {
        let composer = composer();
        let root = Lineage::root(composer.base_options());
        assert!(composer.resolve(&root).ptr_eq(&root.options()));
    }

    #[test]
    fn test_extend_inherits_parent_name() {
        let composer = composer();
        let root = Lineage::root(composer.base_options());
        let named = composer.extend(&root, &Options::new().with(fields::NAME, "card"));
        let unnamed = composer.extend(&named, &Options::new());

        assert_eq!(unnamed.name(), Some("card".to_string()));
        assert!(unnamed.parent().unwrap().ptr_eq(&named));
        assert!(named.cached_super_options().unwrap().ptr_eq(&root.options()));
    }

    #[test]
    fn test_self_registration_is_weak() {
        let composer = composer();
        let root = Lineage::root(composer.base_options());
        let card = composer.extend(&root, &Options::new().with(fields::NAME, "card"));

        let found = composer
            .resolve_asset(&card.options(), AssetKind::Component, &Value::from("card"))
            .unwrap();
        assert!(found.as_constructor().unwrap().ptr_eq(&card));
        assert!(found.same(&Value::from(card.clone())));

        let options = card.options();
        drop(card);
        let stale = options.get(fields::COMPONENTS).unwrap();
        let stale = stale.as_assets().unwrap().get_own("card").unwrap();
        assert!(stale.as_constructor().is_none());
    }

    #[test]
    fn test_extend_seals_snapshot() {
        let composer = composer();
        let root = Lineage::root(composer.base_options());
        let node = composer.extend(&root, &Options::new().with(fields::NAME, "card"));

        let sealed = node.sealed_options();
        assert!(!sealed.ptr_eq(&node.options()));
        for (field, value) in node.options().entries() {
            assert!(sealed.get(&field).unwrap().same(&value), "{field}");
        }
    }
}
