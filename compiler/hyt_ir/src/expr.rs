//! The expression tree.

use std::fmt;
use std::sync::Arc;

use crate::atom::{Atom, Lit};
use crate::type_path::{NodeType, TypePath};

/// An immutable expression node.
///
/// Cloning is cheap: sequences and call forms share their children.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Expr {
    Atom(Atom),
    /// Ordered parallel branches, written `[a b c]`.
    Seq(Arc<[Expr]>),
    /// Application, written `(op a b)`. The first element is the operator.
    ///
    /// An empty call can be built (it is what a parser yields for `()`),
    /// but every rewrite that needs an operator rejects it.
    Call(Arc<[Expr]>),
}

impl Expr {
    // Atoms

    pub fn symbol(name: impl Into<Arc<str>>) -> Self {
        Expr::Atom(Atom::Symbol(name.into()))
    }

    /// Keyword atom; a leading `:` is stripped.
    pub fn keyword(name: &str) -> Self {
        Expr::Atom(Atom::Keyword(Arc::from(name.trim_start_matches(':'))))
    }

    pub fn int(value: i64) -> Self {
        Expr::Atom(Atom::Lit(Lit::Int(value)))
    }

    pub fn float(value: f64) -> Self {
        Expr::Atom(Atom::Lit(Lit::float(value)))
    }

    pub fn string(value: impl Into<Arc<str>>) -> Self {
        Expr::Atom(Atom::Lit(Lit::Str(value.into())))
    }

    pub fn bool(value: bool) -> Self {
        Expr::Atom(Atom::Lit(Lit::Bool(value)))
    }

    pub fn nil() -> Self {
        Expr::Atom(Atom::Lit(Lit::Nil))
    }

    /// The `&rest` pattern marker.
    pub fn rest() -> Self {
        Expr::Atom(Atom::Rest)
    }

    /// A typed wildcard, e.g. `Expr::typed(":hy:models")`.
    pub fn typed(path: &str) -> Self {
        Expr::Atom(Atom::Typed(TypePath::parse(path)))
    }

    // Compound forms

    /// `(op operands...)`.
    pub fn call(op: Expr, operands: impl IntoIterator<Item = Expr>) -> Self {
        let elements: Vec<Expr> = std::iter::once(op).chain(operands).collect();
        Expr::Call(elements.into())
    }

    /// Call form from its raw elements, operator first. May be empty.
    pub fn call_from(elements: impl Into<Arc<[Expr]>>) -> Self {
        Expr::Call(elements.into())
    }

    pub fn seq(items: impl IntoIterator<Item = Expr>) -> Self {
        let items: Vec<Expr> = items.into_iter().collect();
        Expr::Seq(items.into())
    }

    // Inspection

    pub fn node_type(&self) -> NodeType {
        match self {
            Expr::Atom(atom) => atom.node_type(),
            Expr::Seq(_) => NodeType::List,
            Expr::Call(_) => NodeType::Expression,
        }
    }

    pub fn as_atom(&self) -> Option<&Atom> {
        match self {
            Expr::Atom(atom) => Some(atom),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> Option<&str> {
        self.as_atom().and_then(Atom::as_symbol)
    }

    pub fn is_atom(&self) -> bool {
        matches!(self, Expr::Atom(_))
    }

    pub fn is_seq(&self) -> bool {
        matches!(self, Expr::Seq(_))
    }

    pub fn is_call(&self) -> bool {
        matches!(self, Expr::Call(_))
    }

    /// Whether this is the literal `True`.
    pub fn is_true(&self) -> bool {
        matches!(self, Expr::Atom(Atom::Lit(Lit::Bool(true))))
    }

    /// Whether this is the literal `False`.
    pub fn is_false(&self) -> bool {
        matches!(self, Expr::Atom(Atom::Lit(Lit::Bool(false))))
    }

    /// Sequence items, if this is a sequence.
    pub fn items(&self) -> Option<&[Expr]> {
        match self {
            Expr::Seq(items) => Some(&**items),
            _ => None,
        }
    }

    /// Operator of a non-empty call form.
    pub fn operator(&self) -> Option<&Expr> {
        match self {
            Expr::Call(elements) => elements.first(),
            _ => None,
        }
    }

    /// Operands of a call form; empty for everything else.
    pub fn operands(&self) -> &[Expr] {
        match self {
            Expr::Call(elements) if !elements.is_empty() => &elements[1..],
            _ => &[],
        }
    }

    /// Direct children: sequence items or call elements (operator included).
    pub fn children(&self) -> &[Expr] {
        match self {
            Expr::Atom(_) => &[],
            Expr::Seq(children) | Expr::Call(children) => children,
        }
    }

    /// Rebuild a node of the same shape around new children.
    ///
    /// Atoms have no children and are returned unchanged.
    pub fn with_children(&self, children: Vec<Expr>) -> Expr {
        match self {
            Expr::Atom(_) => self.clone(),
            Expr::Seq(_) => Expr::Seq(children.into()),
            Expr::Call(_) => Expr::Call(children.into()),
        }
    }

    /// Number of nodes in the tree, counted iteratively.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children());
        }
        count
    }
}

impl From<Atom> for Expr {
    fn from(atom: Atom) -> Self {
        Expr::Atom(atom)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn write_all(f: &mut fmt::Formatter<'_>, items: &[Expr]) -> fmt::Result {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{item}")?;
            }
            Ok(())
        }

        match self {
            Expr::Atom(atom) => write!(f, "{atom}"),
            Expr::Seq(items) => {
                f.write_str("[")?;
                write_all(f, items)?;
                f.write_str("]")
            }
            Expr::Call(elements) => {
                f.write_str("(")?;
                write_all(f, elements)?;
                f.write_str(")")
            }
        }
    }
}
