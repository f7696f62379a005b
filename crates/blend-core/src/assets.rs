//! Named asset tables and asset lookup
//!
//! Nested components, behavior directives and value transforms are *assets*:
//! named sub-extensions looked up by name at use time. Each kind lives in its
//! own [`AssetTable`], and a table derived during merge keeps an explicit link
//! to the table it was derived from instead of copying it.
//!
//! ```text
//! root.components          { Transition }
//!        ^ delegates to
//! Base.components          { Card }
//!        ^ delegates to
//! Page.components          { PageHeader }
//! ```
//!
//! A lookup checks the local layer first and walks the delegation links on a
//! miss, so a name registered on `root` after `Page` was derived is still
//! visible from `Page`.

use crate::naming::{camelize, capitalize};
use crate::options::{Options, fields};
use crate::value::{Record, Value};
use indexmap::IndexMap;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Kinds of named assets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Component,
    Directive,
    Filter,
}

impl AssetKind {
    pub const ALL: [AssetKind; 3] = [AssetKind::Component, AssetKind::Directive, AssetKind::Filter];

    /// Options field holding this kind's table
    pub fn field(self) -> &'static str {
        match self {
            AssetKind::Component => fields::COMPONENTS,
            AssetKind::Directive => fields::DIRECTIVES,
            AssetKind::Filter => fields::FILTERS,
        }
    }

    /// Asset kind for an options field, if the field is an asset table
    pub fn from_field(field: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.field() == field)
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AssetKind::Component => "component",
            AssetKind::Directive => "directive",
            AssetKind::Filter => "filter",
        };
        f.write_str(name)
    }
}

#[derive(Default)]
struct AssetLayer {
    local: RefCell<IndexMap<String, Value>>,
    parent: Option<AssetTable>,
}

/// A name → implementation table with an optional delegation link
#[derive(Clone, Default)]
pub struct AssetTable(Rc<AssetLayer>);

impl AssetTable {
    /// Empty table without delegation
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty table delegating misses to `parent`
    pub fn delegating_to(parent: &AssetTable) -> Self {
        AssetTable(Rc::new(AssetLayer {
            local: RefCell::default(),
            parent: Some(parent.clone()),
        }))
    }

    /// Table whose local layer holds a copy of `record`'s entries
    pub fn from_record(record: &Record) -> Self {
        let table = Self::new();
        for (name, value) in record.entries() {
            table.register(name, value);
        }
        table
    }

    pub fn parent(&self) -> Option<&AssetTable> {
        self.0.parent.as_ref()
    }

    /// Register an implementation on the local layer
    pub fn register(&self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.local.borrow_mut().insert(name.into(), value.into())
    }

    /// Local-layer lookup
    pub fn get_own(&self, name: &str) -> Option<Value> {
        self.0.local.borrow().get(name).cloned()
    }

    pub fn has_own(&self, name: &str) -> bool {
        self.0.local.borrow().contains_key(name)
    }

    /// Lookup through the local layer and then the delegation chain
    pub fn get(&self, name: &str) -> Option<Value> {
        let mut table = Some(self);
        while let Some(current) = table {
            if let Some(value) = current.get_own(name) {
                return Some(value);
            }
            table = current.parent();
        }
        None
    }

    pub fn own_names(&self) -> Vec<String> {
        self.0.local.borrow().keys().cloned().collect()
    }

    pub fn own_entries(&self) -> Vec<(String, Value)> {
        self.0
            .local
            .borrow()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Flattened entries of every layer in this chain that is not also part
    /// of `shared`'s chain; nearer layers win.
    ///
    /// Used when an already derived table is merged again on top of another
    /// lineage, so that its intermediate layers are not lost.
    pub fn entries_outside(&self, shared: Option<&AssetTable>) -> Vec<(String, Value)> {
        let shared_layers = shared.map(AssetTable::layers).unwrap_or_default();
        let own_layers: Vec<AssetTable> = self
            .layers()
            .into_iter()
            .take_while(|layer| !shared_layers.iter().any(|s| s.ptr_eq(layer)))
            .collect();

        let mut flattened = IndexMap::new();
        for layer in own_layers.iter().rev() {
            flattened.extend(layer.own_entries());
        }
        flattened.into_iter().collect()
    }

    fn layers(&self) -> Vec<AssetTable> {
        let mut layers = vec![self.clone()];
        while let Some(parent) = layers.last().and_then(AssetTable::parent) {
            let parent = parent.clone();
            layers.push(parent);
        }
        layers
    }

    pub fn ptr_eq(&self, other: &AssetTable) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for AssetTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssetTable")
            .field("own", &self.own_names())
            .field("delegates", &self.0.parent.is_some())
            .finish()
    }
}

fn lookup_own(table: &Value, name: &str) -> Option<Value> {
    match table {
        Value::Assets(t) => t.get_own(name),
        Value::Record(r) => r.get(name),
        _ => None,
    }
}

fn lookup_chain(table: &Value, name: &str) -> Option<Value> {
    match table {
        Value::Assets(t) => t.get(name),
        Value::Record(r) => r.get(name),
        _ => None,
    }
}

/// Find the asset `id` of `kind` in `options`
///
/// Tries the local layer for the exact name, then its canonical-case and
/// capitalized forms, and only then the full delegation chain for all three.
/// Non-string identifiers are never found.
pub fn find_asset(options: &Options, kind: AssetKind, id: &Value) -> Option<Value> {
    let id = id.as_str()?;
    let table = options.get(kind.field())?;

    if let Some(found) = lookup_own(&table, id) {
        return Some(found);
    }
    let camelized = camelize(id);
    if let Some(found) = lookup_own(&table, &camelized) {
        return Some(found);
    }
    let capitalized = capitalize(&camelized);
    if let Some(found) = lookup_own(&table, &capitalized) {
        return Some(found);
    }

    [id, camelized.as_str(), capitalized.as_str()]
        .into_iter()
        .find_map(|name| lookup_chain(&table, name))
}
