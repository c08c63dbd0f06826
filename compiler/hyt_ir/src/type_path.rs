//! Dotted type names for expression nodes.
//!
//! Every node reports a qualified name such as `hy.models.Symbol`. Typed
//! wildcards carry a [`TypePath`] and match a node when the path is a
//! segment-wise suffix of either the node's full name or its module part:
//!
//! ```text
//! ?hy.models      matches every node (module suffix)
//! ?models          matches every node (module suffix)
//! ?Expression      matches call forms only
//! ?models.Symbol   matches symbols only
//! ?models.List.x   matches nothing
//! ```

use std::fmt;
use std::sync::Arc;

use smallvec::SmallVec;

/// Module path shared by every node type.
pub const MODEL_NAMESPACE: [&str; 2] = ["hy", "models"];

/// Runtime type of an expression node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeType {
    Expression,
    List,
    Symbol,
    Keyword,
    Integer,
    Float,
    String,
    Bool,
    Nil,
    Rest,
    Wildcard,
}

impl NodeType {
    /// Unqualified type name.
    pub const fn name(self) -> &'static str {
        match self {
            NodeType::Expression => "Expression",
            NodeType::List => "List",
            NodeType::Symbol => "Symbol",
            NodeType::Keyword => "Keyword",
            NodeType::Integer => "Integer",
            NodeType::Float => "Float",
            NodeType::String => "String",
            NodeType::Bool => "Bool",
            NodeType::Nil => "Nil",
            NodeType::Rest => "Rest",
            NodeType::Wildcard => "Wildcard",
        }
    }

    /// Qualified name segments, module first.
    pub fn qualified(self) -> [&'static str; 3] {
        [MODEL_NAMESPACE[0], MODEL_NAMESPACE[1], self.name()]
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.qualified().join("."))
    }
}

/// A dotted type path carried by a typed wildcard.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypePath {
    segments: SmallVec<[Arc<str>; 3]>,
}

impl TypePath {
    /// Parse a path from `.` or `:` separated text.
    ///
    /// Empty segments are dropped, so `:hy:models`, `hy.models` and
    /// `hy:models` all name the same path.
    pub fn parse(text: &str) -> Self {
        let segments = text
            .split(['.', ':'])
            .filter(|segment| !segment.is_empty())
            .map(Arc::from)
            .collect();
        TypePath { segments }
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> + '_ {
        self.segments.iter().map(AsRef::as_ref)
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Whether this path is a segment-wise suffix of `qualified`.
    ///
    /// The empty path is a suffix of everything.
    pub fn is_suffix_of(&self, qualified: &[&str]) -> bool {
        if self.segments.len() > qualified.len() {
            return false;
        }
        let offset = qualified.len() - self.segments.len();
        self.segments
            .iter()
            .zip(&qualified[offset..])
            .all(|(want, have)| want.as_ref() == *have)
    }

    /// Whether a node of type `node` satisfies this path.
    pub fn matches(&self, node: NodeType) -> bool {
        let qualified = node.qualified();
        self.is_suffix_of(&qualified) || self.is_suffix_of(&qualified[..MODEL_NAMESPACE.len()])
    }
}

impl fmt::Display for TypePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            f.write_str(segment)?;
        }
        Ok(())
    }
}
