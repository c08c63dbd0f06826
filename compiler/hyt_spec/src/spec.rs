//! Spec trees and the combinators that build them.
//!
//! A [`Spec`] is an immutable, cheaply clonable predicate tree. Leaves are
//! either references to registered specs ([`Spec::Named`]), native
//! predicates, or structural patterns over quoted expressions; interior
//! nodes combine sub-specs. Specs are evaluated against a
//! [`SpecEnv`](crate::SpecEnv), which resolves names and records traces.
//!
//! ```
//! use hyt_spec::{and, coll_of, named, pred, Value};
//!
//! let even = pred("even?", |v: &Value| v.as_int().is_some_and(|n| n % 2 == 0));
//! let spec = coll_of(and([named(":positive"), even]));
//! assert_eq!(spec.to_string(), "(coll-of (and :positive even?))");
//! ```

use std::fmt;
use std::sync::Arc;

use hyt_expand::Expander;
use hyt_ir::Expr;
use hyt_patterns::Pattern;

use crate::error::SpecResult;
use crate::value::Value;

type PredicateFn = dyn Fn(&Value) -> bool + Send + Sync;

/// A labelled native predicate.
#[derive(Clone)]
pub struct Predicate {
    label: Arc<str>,
    test: Arc<PredicateFn>,
}

impl Predicate {
    pub fn new(label: &str, test: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Self {
        Predicate {
            label: Arc::from(label),
            test: Arc::new(test),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn test(&self, value: &Value) -> bool {
        (self.test)(value)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Predicate({})", self.label)
    }
}

/// `(field, spec)` pairs checked by `keys`, `modules` and `parameters`.
pub type FieldSpecs = Arc<[(Arc<str>, Spec)]>;

#[derive(Clone, Debug)]
pub enum Spec {
    /// Reference to a registered spec. Evaluations are traced.
    Named(Arc<str>),
    Pred(Predicate),
    /// Structural pattern over a quoted expression value.
    Matches(Arc<Pattern>),
    /// Every sub-spec holds. All sub-specs are evaluated.
    And(Arc<[Spec]>),
    /// Some sub-spec holds. All sub-specs are evaluated.
    Or(Arc<[Spec]>),
    /// Not every sub-spec holds. All sub-specs are evaluated.
    Nand(Arc<[Spec]>),
    /// Every key and every value of a map.
    DictOf { key: Arc<Spec>, value: Arc<Spec> },
    /// Every element of an iterable.
    CollOf(Arc<Spec>),
    /// Each field is present and satisfies its spec.
    Keys(FieldSpecs),
    /// An indexable sequence of exactly this many elements, checked
    /// positionally.
    Cat(Arc<[Spec]>),
    /// Like `Keys`, over an object's `modules` subcollection.
    Modules(FieldSpecs),
    /// Like `Keys`, over an object's `parameters` subcollection.
    Parameters(FieldSpecs),
}

/// Strip the keyword colon from a spec name.
pub(crate) fn spec_name(name: &str) -> Arc<str> {
    Arc::from(name.trim_start_matches(':'))
}

impl Spec {
    pub fn named(name: &str) -> Self {
        Spec::Named(spec_name(name))
    }

    /// The referenced name, if this spec is an alias.
    pub fn as_named(&self) -> Option<&str> {
        match self {
            Spec::Named(name) => Some(&**name),
            _ => None,
        }
    }
}

impl From<Predicate> for Spec {
    fn from(predicate: Predicate) -> Self {
        Spec::Pred(predicate)
    }
}

pub fn named(name: &str) -> Spec {
    Spec::named(name)
}

pub fn pred(label: &str, test: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Spec {
    Spec::Pred(Predicate::new(label, test))
}

/// A spec matching quoted expressions against `pattern`.
///
/// The pattern is macro-expanded first, so thread forms may be used to
/// write it.
pub fn pattern(expander: &Expander, pattern: &Expr) -> SpecResult<Spec> {
    let expanded = expander.expand(pattern)?;
    Ok(Spec::Matches(Arc::new(Pattern::new(&expanded))))
}

pub fn and(specs: impl IntoIterator<Item = Spec>) -> Spec {
    Spec::And(specs.into_iter().collect())
}

pub fn or(specs: impl IntoIterator<Item = Spec>) -> Spec {
    Spec::Or(specs.into_iter().collect())
}

pub fn nand(specs: impl IntoIterator<Item = Spec>) -> Spec {
    Spec::Nand(specs.into_iter().collect())
}

pub fn dict_of(key: Spec, value: Spec) -> Spec {
    Spec::DictOf {
        key: Arc::new(key),
        value: Arc::new(value),
    }
}

pub fn coll_of(spec: Spec) -> Spec {
    Spec::CollOf(Arc::new(spec))
}

pub fn cat(specs: impl IntoIterator<Item = Spec>) -> Spec {
    Spec::Cat(specs.into_iter().collect())
}

fn field_specs<'a>(fields: impl IntoIterator<Item = (&'a str, Spec)>) -> FieldSpecs {
    fields
        .into_iter()
        .map(|(name, spec)| (spec_name(name), spec))
        .collect()
}

pub fn keys<'a>(fields: impl IntoIterator<Item = (&'a str, Spec)>) -> Spec {
    Spec::Keys(field_specs(fields))
}

pub fn modules<'a>(fields: impl IntoIterator<Item = (&'a str, Spec)>) -> Spec {
    Spec::Modules(field_specs(fields))
}

pub fn parameters<'a>(fields: impl IntoIterator<Item = (&'a str, Spec)>) -> Spec {
    Spec::Parameters(field_specs(fields))
}

fn write_form(f: &mut fmt::Formatter<'_>, head: &str, specs: &[Spec]) -> fmt::Result {
    write!(f, "({head}")?;
    for spec in specs {
        write!(f, " {spec}")?;
    }
    f.write_str(")")
}

fn write_fields(f: &mut fmt::Formatter<'_>, head: &str, fields: &[(Arc<str>, Spec)]) -> fmt::Result {
    write!(f, "({head}")?;
    for (name, spec) in fields {
        write!(f, " :{name} {spec}")?;
    }
    f.write_str(")")
}

impl fmt::Display for Spec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Spec::Named(name) => write!(f, ":{name}"),
            Spec::Pred(predicate) => f.write_str(predicate.label()),
            Spec::Matches(pattern) => write!(f, "(matches {})", pattern.source()),
            Spec::And(specs) => write_form(f, "and", specs),
            Spec::Or(specs) => write_form(f, "or", specs),
            Spec::Nand(specs) => write_form(f, "nand", specs),
            Spec::DictOf { key, value } => write!(f, "(dict-of {key} {value})"),
            Spec::CollOf(spec) => write!(f, "(coll-of {spec})"),
            Spec::Keys(fields) => write_fields(f, "keys", fields),
            Spec::Cat(specs) => write_form(f, "cat", specs),
            Spec::Modules(fields) => write_fields(f, "modules", fields),
            Spec::Parameters(fields) => write_fields(f, "parameters", fields),
        }
    }
}

/// Argument and return specs for a function.
#[derive(Clone, Debug)]
pub struct FnSpec {
    /// Checked against the argument list as a [`Value::List`].
    pub args: Spec,
    pub ret: Option<Spec>,
}

impl FnSpec {
    pub fn new(args: Spec) -> Self {
        FnSpec { args, ret: None }
    }

    #[must_use]
    pub fn returns(mut self, ret: Spec) -> Self {
        self.ret = Some(ret);
        self
    }
}

impl fmt::Display for FnSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(fn :args {}", self.args)?;
        if let Some(ret) = &self.ret {
            write!(f, " :ret {ret}")?;
        }
        f.write_str(")")
    }
}
