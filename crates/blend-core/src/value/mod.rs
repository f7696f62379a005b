//! Dynamic configuration values
//!
//! Definitions are authored as loosely shaped data: a field may hold a scalar,
//! a keyed structure, a sequence of hooks, a factory closure, a lookup table or
//! another definition. [`Value`] captures all of these in one tagged type so
//! that every merge strategy sees a uniform input.
//!
//! # Identity
//!
//! Every shared variant (`List`, `Record`, `Func`, `Assets`, `Options`,
//! `Constructor`) is a reference-counted handle. Cloning a `Value` clones the
//! handle, not the data behind it. [`Value::same`] compares these variants by
//! pointer and scalars by value; it is the comparison used for hook
//! de-duplication, late-edit detection and the resolver's fast path.
//!
//! ```rust
//! use blend_core::value::{Record, Value};
//!
//! let data = Record::new().with("count", 1.0);
//! let a = Value::Record(data.clone());
//! let b = Value::Record(data);
//! assert!(a.same(&b));
//!
//! let other = Value::Record(Record::new().with("count", 1.0));
//! assert!(!a.same(&other));
//! ```

mod record;
mod source;

pub use record::Record;
pub use source::Source;

use crate::assets::AssetTable;
use crate::instance::Instance;
use crate::lineage::{Lineage, WeakLineage};
use crate::options::Options;
use std::fmt;
use std::rc::Rc;

/// A configuration value
#[derive(Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    String(Rc<str>),
    /// Immutable ordered sequence (hook lists, watcher handler lists, array props)
    List(Rc<Vec<Value>>),
    /// Interior-mutable keyed structure
    Record(Record),
    /// Callable invoked with the instance context
    Func(Callable),
    /// Named asset table with a delegation link
    Assets(AssetTable),
    /// A definition or a resolved configuration
    Options(Options),
    /// A lineage node used as a value (extends target, registered component)
    Constructor(ConstructorRef),
}

impl Value {
    /// Build a list value from any sequence of values
    pub fn list<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Value::List(Rc::new(items.into_iter().map(Into::into).collect()))
    }

    /// Wrap a closure as a callable value
    pub fn func(f: impl Fn(&Instance) -> Value + 'static) -> Self {
        Value::Func(Callable::new(f))
    }

    /// Identity comparison: pointer equality for shared variants, value
    /// equality for scalars.
    pub fn same(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::List(a), Value::List(b)) => Rc::ptr_eq(a, b),
            (Value::Record(a), Value::Record(b)) => a.ptr_eq(b),
            (Value::Func(a), Value::Func(b)) => a.ptr_eq(b),
            (Value::Assets(a), Value::Assets(b)) => a.ptr_eq(b),
            (Value::Options(a), Value::Options(b)) => a.ptr_eq(b),
            (Value::Constructor(a), Value::Constructor(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    /// Truthiness as the surrounding runtime understands it
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            _ => true,
        }
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Func(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_ref()),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    pub fn as_func(&self) -> Option<&Callable> {
        match self {
            Value::Func(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_assets(&self) -> Option<&AssetTable> {
        match self {
            Value::Assets(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_options(&self) -> Option<&Options> {
        match self {
            Value::Options(o) => Some(o),
            _ => None,
        }
    }

    /// The lineage node behind a constructor value, if it is still alive
    pub fn as_constructor(&self) -> Option<Lineage> {
        match self {
            Value::Constructor(c) => c.upgrade(),
            _ => None,
        }
    }

    /// Coerce to a sequence: lists yield their items, anything else becomes a
    /// single-element sequence.
    pub fn to_sequence(&self) -> Vec<Value> {
        match self {
            Value::List(items) => items.to_vec(),
            other => vec![other.clone()],
        }
    }

    /// Raw type name used in diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Bool(_) => "Boolean",
            Value::Number(_) => "Number",
            Value::String(_) => "String",
            Value::List(_) => "Array",
            Value::Record(_) => "Object",
            Value::Func(_) => "Function",
            Value::Assets(_) => "AssetTable",
            Value::Options(_) => "Options",
            Value::Constructor(_) => "Constructor",
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("Null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::String(s) => write!(f, "{s:?}"),
            Value::List(items) => f.debug_list().entries(items.iter()).finish(),
            Value::Record(r) => fmt::Debug::fmt(r, f),
            Value::Func(c) => fmt::Debug::fmt(c, f),
            Value::Assets(t) => fmt::Debug::fmt(t, f),
            Value::Options(o) => fmt::Debug::fmt(o, f),
            Value::Constructor(c) => fmt::Debug::fmt(c, f),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(Rc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(Rc::from(s))
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(Rc::new(items))
    }
}

impl From<Record> for Value {
    fn from(r: Record) -> Self {
        Value::Record(r)
    }
}

impl From<Callable> for Value {
    fn from(c: Callable) -> Self {
        Value::Func(c)
    }
}

impl From<AssetTable> for Value {
    fn from(t: AssetTable) -> Self {
        Value::Assets(t)
    }
}

impl From<Options> for Value {
    fn from(o: Options) -> Self {
        Value::Options(o)
    }
}

impl From<Lineage> for Value {
    fn from(l: Lineage) -> Self {
        Value::Constructor(ConstructorRef::Strong(l))
    }
}

/// A shared callable
///
/// Hooks, state factories and directive handlers are all callables receiving
/// the instance context they run for. Two callables are the same hook only if
/// they share the same allocation.
#[derive(Clone)]
pub struct Callable(Rc<dyn Fn(&Instance) -> Value>);

impl Callable {
    pub fn new(f: impl Fn(&Instance) -> Value + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn call(&self, instance: &Instance) -> Value {
        (self.0)(instance)
    }

    pub fn ptr_eq(&self, other: &Callable) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Callable({:p})", Rc::as_ptr(&self.0) as *const ())
    }
}

/// Handle to a lineage node stored inside a value
///
/// A node that registers itself in its own component table holds a weak
/// handle, so the node and its options do not keep each other alive.
#[derive(Clone)]
pub enum ConstructorRef {
    Strong(Lineage),
    Weak(WeakLineage),
}

impl ConstructorRef {
    pub fn upgrade(&self) -> Option<Lineage> {
        match self {
            ConstructorRef::Strong(lineage) => Some(lineage.clone()),
            ConstructorRef::Weak(weak) => weak.upgrade(),
        }
    }

    pub fn ptr_eq(&self, other: &ConstructorRef) -> bool {
        self.node_ptr() == other.node_ptr()
    }

    fn node_ptr(&self) -> *const () {
        match self {
            ConstructorRef::Strong(lineage) => lineage.as_ptr(),
            ConstructorRef::Weak(weak) => weak.as_ptr(),
        }
    }
}

impl fmt::Debug for ConstructorRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.upgrade() {
            Some(lineage) => write!(f, "Constructor({:?})", lineage.name()),
            None => f.write_str("Constructor(<dropped>)"),
        }
    }
}
