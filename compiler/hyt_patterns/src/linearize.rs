//! Flatten a tree into a token stream.
//!
//! Call forms and sequences produce an open token carrying their arity and
//! a matching close token; atoms produce a single token. Because nesting is
//! explicit, the extent of any subtree can be recovered from the stream by
//! scanning to the balanced close.

use hyt_ir::{Atom, Expr, NodeType};
use smallvec::SmallVec;

/// Shape of a linear token.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Start of a call form with this many elements (operator included).
    CallOpen(usize),
    CallClose,
    /// Start of a sequence with this many items.
    SeqOpen(usize),
    SeqClose,
    Atom(Atom),
}

/// One token of a linearized tree.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LinearToken {
    pub kind: TokenKind,
    /// Type of the node this token belongs to.
    pub node_type: NodeType,
}

impl LinearToken {
    pub fn is_open(&self) -> bool {
        matches!(self.kind, TokenKind::CallOpen(_) | TokenKind::SeqOpen(_))
    }

    pub fn is_close(&self) -> bool {
        matches!(self.kind, TokenKind::CallClose | TokenKind::SeqClose)
    }

    /// Whether two tokens have the same shape.
    ///
    /// Open tokens compare by kind only; their arity is informational, the
    /// close markers already pin down where a container ends.
    pub fn same_shape(&self, other: &LinearToken) -> bool {
        match (&self.kind, &other.kind) {
            (TokenKind::CallOpen(_), TokenKind::CallOpen(_))
            | (TokenKind::SeqOpen(_), TokenKind::SeqOpen(_))
            | (TokenKind::CallClose, TokenKind::CallClose)
            | (TokenKind::SeqClose, TokenKind::SeqClose) => true,
            (TokenKind::Atom(a), TokenKind::Atom(b)) => a == b,
            _ => false,
        }
    }
}

enum Frame<'a> {
    Enter(&'a Expr),
    Close(TokenKind, NodeType),
}

/// Linearize `expr` in pre-order.
pub fn linearize(expr: &Expr) -> Vec<LinearToken> {
    let mut tokens = Vec::new();
    let mut stack: SmallVec<[Frame<'_>; 16]> = SmallVec::new();
    stack.push(Frame::Enter(expr));

    while let Some(frame) = stack.pop() {
        match frame {
            Frame::Enter(node) => {
                let node_type = node.node_type();
                let (open, close) = match node {
                    Expr::Atom(atom) => {
                        tokens.push(LinearToken {
                            kind: TokenKind::Atom(atom.clone()),
                            node_type,
                        });
                        continue;
                    }
                    Expr::Call(elements) => (TokenKind::CallOpen(elements.len()), TokenKind::CallClose),
                    Expr::Seq(items) => (TokenKind::SeqOpen(items.len()), TokenKind::SeqClose),
                };
                tokens.push(LinearToken {
                    kind: open,
                    node_type,
                });
                stack.push(Frame::Close(close, node_type));
                stack.extend(node.children().iter().rev().map(Frame::Enter));
            }
            Frame::Close(kind, node_type) => tokens.push(LinearToken { kind, node_type }),
        }
    }
    tokens
}

/// Index one past the subtree starting at `start`.
///
/// For an open token this is one past its balanced close (or the end of
/// the stream if unbalanced); for any other token it is `start + 1`.
pub fn subtree_end(tokens: &[LinearToken], start: usize) -> usize {
    if !tokens.get(start).is_some_and(LinearToken::is_open) {
        return start + 1;
    }
    let mut depth = 0usize;
    for (offset, token) in tokens[start..].iter().enumerate() {
        if token.is_open() {
            depth += 1;
        } else if token.is_close() {
            depth -= 1;
            if depth == 0 {
                return start + offset + 1;
            }
        }
    }
    tokens.len()
}

/// [`subtree_end`] for every position, in one pass.
pub fn subtree_ends(tokens: &[LinearToken]) -> Vec<usize> {
    let mut ends: Vec<usize> = (1..=tokens.len()).collect();
    let mut open: SmallVec<[usize; 16]> = SmallVec::new();
    for (i, token) in tokens.iter().enumerate() {
        if token.is_open() {
            open.push(i);
        } else if token.is_close() {
            if let Some(start) = open.pop() {
                ends[start] = i + 1;
            }
        }
    }
    for start in open {
        ends[start] = tokens.len();
    }
    ends
}
