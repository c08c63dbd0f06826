//! Runtime values checked by specs.
//!
//! # Arc Enforcement
//!
//! Heap-backed variants wrap their payload in [`Heap`], whose constructor is
//! private to this module. Values are built through the factory methods on
//! [`Value`], so every clone shares its payload:
//!
//! ```text
//! let s = Value::string("hello");            // OK
//! let xs = Value::list(vec![Value::int(1)]); // OK
//! let s = Value::Str(Heap::new(...));        // ERROR: Heap::new is private
//! ```
//!
//! # Thread Safety
//!
//! Every payload is immutable behind an `Arc`, and the two open-ended
//! variants (objects and functions) require `Send + Sync`, so values can be
//! stored in the process-wide spec environment.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use hyt_ir::Expr;

/// Shared, immutable heap payload.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Heap<T>(Arc<T>);

impl<T> Heap<T> {
    fn new(value: T) -> Self {
        Heap(Arc::new(value))
    }
}

impl<T> Deref for Heap<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

/// The two named bags a component object exposes besides its fields.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Subcollection {
    Modules,
    Parameters,
}

impl Subcollection {
    pub const fn name(self) -> &'static str {
        match self {
            Subcollection::Modules => "modules",
            Subcollection::Parameters => "parameters",
        }
    }
}

/// Capability for objects with named sub-fields, such as model components.
///
/// `keys` specs read fields through [`get_field`](Self::get_field);
/// `modules` and `parameters` specs read the matching [`Subcollection`].
/// Objects without a subcollection return `None` and those specs fail.
pub trait HasNamedSubfields: fmt::Debug + Send + Sync {
    /// Name used when rendering the object.
    fn type_name(&self) -> &str;

    /// Component field names, in declaration order.
    fn list_fields(&self) -> Vec<Arc<str>>;

    fn get_field(&self, name: &str) -> Option<Value>;

    fn subcollection(&self, _collection: Subcollection) -> Option<Vec<(Arc<str>, Value)>> {
        None
    }
}

/// A record with named fields in declaration order.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordValue {
    pub type_name: Arc<str>,
    fields: Arc<Vec<(Arc<str>, Value)>>,
}

impl RecordValue {
    pub fn new<N: Into<Arc<str>>>(type_name: &str, fields: impl IntoIterator<Item = (N, Value)>) -> Self {
        RecordValue {
            type_name: Arc::from(type_name),
            fields: Arc::new(
                fields
                    .into_iter()
                    .map(|(name, value)| (name.into(), value))
                    .collect(),
            ),
        }
    }

    pub fn get_field(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(field, _)| &**field == name)
            .map(|(_, value)| value)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.fields.iter().map(|(name, _)| &**name)
    }

    pub fn fields(&self) -> &[(Arc<str>, Value)] {
        &self.fields
    }
}

type NativeFn = dyn Fn(&[Value]) -> Value + Send + Sync;

/// A named native function: spec-checked calls and generators.
#[derive(Clone)]
pub struct FunctionValue {
    name: Arc<str>,
    func: Arc<NativeFn>,
}

impl FunctionValue {
    pub fn new(name: &str, func: impl Fn(&[Value]) -> Value + Send + Sync + 'static) -> Self {
        FunctionValue {
            name: Arc::from(name),
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, args: &[Value]) -> Value {
        (self.func)(args)
    }
}

impl fmt::Debug for FunctionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FunctionValue({})", self.name)
    }
}

/// Runtime value.
#[derive(Clone, Debug)]
pub enum Value {
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Heap<String>),
    Keyword(Heap<String>),
    List(Heap<Vec<Value>>),
    Tuple(Heap<Vec<Value>>),
    /// Ordered key/value entries.
    Map(Heap<Vec<(Value, Value)>>),
    Record(RecordValue),
    /// Opaque object with named sub-fields.
    Object(Arc<dyn HasNamedSubfields>),
    Function(FunctionValue),
    /// A quoted expression tree.
    Expr(Expr),
}

// Factory Methods

impl Value {
    #[inline]
    pub fn int(n: i64) -> Self {
        Value::Int(n)
    }

    #[inline]
    pub fn float(f: f64) -> Self {
        Value::Float(f)
    }

    #[inline]
    pub fn bool(b: bool) -> Self {
        Value::Bool(b)
    }

    #[inline]
    pub fn string(s: impl Into<String>) -> Self {
        Value::Str(Heap::new(s.into()))
    }

    /// Keyword value; a leading `:` is dropped.
    #[inline]
    pub fn keyword(name: &str) -> Self {
        Value::Keyword(Heap::new(name.trim_start_matches(':').to_string()))
    }

    #[inline]
    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Heap::new(items))
    }

    #[inline]
    pub fn tuple(items: Vec<Value>) -> Self {
        Value::Tuple(Heap::new(items))
    }

    #[inline]
    pub fn map(entries: Vec<(Value, Value)>) -> Self {
        Value::Map(Heap::new(entries))
    }

    pub fn record<N: Into<Arc<str>>>(type_name: &str, fields: impl IntoIterator<Item = (N, Value)>) -> Self {
        Value::Record(RecordValue::new(type_name, fields))
    }

    pub fn object(object: impl HasNamedSubfields + 'static) -> Self {
        Value::Object(Arc::new(object))
    }

    pub fn function(name: &str, func: impl Fn(&[Value]) -> Value + Send + Sync + 'static) -> Self {
        Value::Function(FunctionValue::new(name, func))
    }

    #[inline]
    pub fn expr(expr: Expr) -> Self {
        Value::Expr(expr)
    }
}

// Value Methods

impl Value {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_expr(&self) -> Option<&Expr> {
        match self {
            Value::Expr(expr) => Some(expr),
            _ => None,
        }
    }

    /// Get the type name for diagnostics.
    pub fn type_name(&self) -> &str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::Keyword(_) => "keyword",
            Value::List(_) => "list",
            Value::Tuple(_) => "tuple",
            Value::Map(_) => "map",
            Value::Record(record) => &*record.type_name,
            Value::Object(object) => object.type_name(),
            Value::Function(_) => "function",
            Value::Expr(_) => "expr",
        }
    }

    /// Elements seen when iterating the value.
    ///
    /// Maps yield their keys, strings their characters, and expression
    /// trees their children. Scalars are not iterable.
    pub fn elements(&self) -> Option<Vec<Value>> {
        match self {
            Value::List(items) | Value::Tuple(items) => Some(items.to_vec()),
            Value::Map(entries) => Some(entries.iter().map(|(key, _)| key.clone()).collect()),
            Value::Str(s) => Some(s.chars().map(Value::string).collect()),
            Value::Expr(expr) if !expr.is_atom() => {
                Some(expr.children().iter().cloned().map(Value::Expr).collect())
            }
            _ => None,
        }
    }

    /// Positional elements of an indexable sequence.
    ///
    /// Unlike [`elements`](Self::elements), maps are excluded: they iterate
    /// but cannot be indexed by position.
    pub fn indexed(&self) -> Option<Vec<Value>> {
        match self {
            Value::Map(_) => None,
            _ => self.elements(),
        }
    }

    /// Look up a named field.
    ///
    /// Records and objects expose their fields; maps expose entries whose
    /// key is a keyword or string with that name.
    pub fn field(&self, name: &str) -> Option<Value> {
        match self {
            Value::Record(record) => record.get_field(name).cloned(),
            Value::Object(object) => object.get_field(name),
            Value::Map(entries) => entries
                .iter()
                .find(|(key, _)| match key {
                    Value::Keyword(key) | Value::Str(key) => key.as_str() == name,
                    _ => false,
                })
                .map(|(_, value)| value.clone()),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Str(a), Value::Str(b)) | (Value::Keyword(a), Value::Keyword(b)) => a == b,
            (Value::List(a), Value::List(b)) | (Value::Tuple(a), Value::Tuple(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Record(a), Value::Record(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => same_allocation(a, b),
            (Value::Function(a), Value::Function(b)) => same_allocation(&a.func, &b.func),
            (Value::Expr(a), Value::Expr(b)) => a == b,
            _ => false,
        }
    }
}

fn same_allocation<T: ?Sized>(a: &Arc<T>, b: &Arc<T>) -> bool {
    Arc::as_ptr(a).cast::<()>() == Arc::as_ptr(b).cast::<()>()
}

fn write_joined(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(" ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => f.write_str("None"),
            Value::Bool(true) => f.write_str("True"),
            Value::Bool(false) => f.write_str("False"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x:?}"),
            Value::Str(s) => write!(f, "{:?}", s.as_str()),
            Value::Keyword(k) => write!(f, ":{}", k.as_str()),
            Value::List(items) => {
                f.write_str("[")?;
                write_joined(f, items)?;
                f.write_str("]")
            }
            Value::Tuple(items) => {
                f.write_str("#(")?;
                write_joined(f, items)?;
                f.write_str(")")
            }
            Value::Map(entries) => {
                f.write_str("{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{key} {value}")?;
                }
                f.write_str("}")
            }
            Value::Record(record) => {
                write!(f, "{}(", record.type_name)?;
                for (i, (name, value)) in record.fields().iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{name}={value}")?;
                }
                f.write_str(")")
            }
            Value::Object(object) => write!(f, "<{}>", object.type_name()),
            Value::Function(func) => write!(f, "<function {}>", func.name()),
            Value::Expr(expr) => write!(f, "'{expr}"),
        }
    }
}

impl From<Expr> for Value {
    fn from(expr: Expr) -> Self {
        Value::Expr(expr)
    }
}
