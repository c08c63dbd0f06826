//! Leaf values of an expression tree.

use std::fmt;
use std::sync::Arc;

use crate::type_path::{NodeType, TypePath};

/// Kind tag of an atom. Two atoms are equal only if their kinds agree.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AtomKind {
    Symbol,
    Literal,
    Keyword,
    /// `&rest`: pattern-only.
    Rest,
    /// Typed wildcard: pattern-only.
    Typed,
}

/// Literal payload.
///
/// Floats are stored as their bit pattern so literals are `Eq + Hash`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Lit {
    Int(i64),
    Float(u64),
    Str(Arc<str>),
    Bool(bool),
    Nil,
}

impl Lit {
    pub fn float(value: f64) -> Self {
        Lit::Float(value.to_bits())
    }

    pub fn node_type(&self) -> NodeType {
        match self {
            Lit::Int(_) => NodeType::Integer,
            Lit::Float(_) => NodeType::Float,
            Lit::Str(_) => NodeType::String,
            Lit::Bool(_) => NodeType::Bool,
            Lit::Nil => NodeType::Nil,
        }
    }
}

/// A leaf of an expression tree.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Atom {
    /// Identifier, e.g. `sigmoid`.
    Symbol(Arc<str>),
    /// Keyword tag, e.g. `:dim` (stored without the colon).
    Keyword(Arc<str>),
    Lit(Lit),
    /// Pattern marker swallowing a variable span of siblings.
    Rest,
    /// Pattern marker matching any node whose type satisfies the path.
    Typed(TypePath),
}

impl Atom {
    pub fn kind(&self) -> AtomKind {
        match self {
            Atom::Symbol(_) => AtomKind::Symbol,
            Atom::Keyword(_) => AtomKind::Keyword,
            Atom::Lit(_) => AtomKind::Literal,
            Atom::Rest => AtomKind::Rest,
            Atom::Typed(_) => AtomKind::Typed,
        }
    }

    pub fn node_type(&self) -> NodeType {
        match self {
            Atom::Symbol(_) => NodeType::Symbol,
            Atom::Keyword(_) => NodeType::Keyword,
            Atom::Lit(lit) => lit.node_type(),
            Atom::Rest => NodeType::Rest,
            Atom::Typed(_) => NodeType::Wildcard,
        }
    }

    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Atom::Symbol(name) => Some(&**name),
            _ => None,
        }
    }
}

impl fmt::Display for Lit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lit::Int(n) => write!(f, "{n}"),
            Lit::Float(bits) => write!(f, "{:?}", f64::from_bits(*bits)),
            Lit::Str(s) => write!(f, "{s:?}"),
            Lit::Bool(true) => f.write_str("True"),
            Lit::Bool(false) => f.write_str("False"),
            Lit::Nil => f.write_str("None"),
        }
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Atom::Symbol(name) => f.write_str(name),
            Atom::Keyword(name) => write!(f, ":{name}"),
            Atom::Lit(lit) => write!(f, "{lit}"),
            Atom::Rest => f.write_str("&rest"),
            Atom::Typed(path) => write!(f, "?{path}"),
        }
    }
}
