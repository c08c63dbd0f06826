//! Structural pattern matching over linear token streams.
//!
//! A pattern is an ordinary tree that may contain two markers:
//! - a typed wildcard (`?path`) consumes exactly one subtree whose node
//!   type satisfies the path;
//! - `&rest` consumes zero or more whole sibling subtrees, stopping at the
//!   first position where the next pattern token can start, or at the close
//!   of the enclosing container.
//!
//! Everything else must match token for token. Matching is anchored at the
//! start of the expression stream; the pattern need not consume all of it.

use hyt_ir::{Atom, Expr};

use crate::linearize::{linearize, subtree_end, LinearToken, TokenKind};

/// A pattern linearized once, for matching against many expressions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pattern {
    source: Expr,
    tokens: Vec<LinearToken>,
}

impl Pattern {
    pub fn new(source: &Expr) -> Self {
        Pattern {
            source: source.clone(),
            tokens: linearize(source),
        }
    }

    pub fn source(&self) -> &Expr {
        &self.source
    }

    pub fn tokens(&self) -> &[LinearToken] {
        &self.tokens
    }

    pub fn matches(&self, expr: &Expr) -> bool {
        match_tokens(&linearize(expr), &self.tokens)
    }
}

/// Whether `pattern` matches `expr`.
pub fn matches(expr: &Expr, pattern: &Expr) -> bool {
    match_tokens(&linearize(expr), &linearize(pattern))
}

/// Match a linearized pattern against a linearized expression.
///
/// A pattern longer than the expression never matches, even when its
/// `&rest` markers could consume nothing.
pub fn match_tokens(expr: &[LinearToken], pattern: &[LinearToken]) -> bool {
    if pattern.len() > expr.len() {
        return false;
    }

    let mut at = 0;
    for (i, want) in pattern.iter().enumerate() {
        match &want.kind {
            TokenKind::Atom(Atom::Rest) => {
                at = realign(expr, at, pattern.get(i + 1));
            }
            TokenKind::Atom(Atom::Typed(path)) => {
                let Some(have) = expr.get(at) else {
                    return false;
                };
                if have.is_close() || !path.matches(have.node_type) {
                    return false;
                }
                at = subtree_end(expr, at);
            }
            _ => {
                let Some(have) = expr.get(at) else {
                    return false;
                };
                if !want.same_shape(have) {
                    return false;
                }
                at += 1;
            }
        }
    }
    true
}

/// Advance past whole subtrees until `next` can start.
///
/// Never crosses a close token, so a rest span stays inside its container.
fn realign(expr: &[LinearToken], mut at: usize, next: Option<&LinearToken>) -> usize {
    while let Some(have) = expr.get(at) {
        if have.is_close() {
            break;
        }
        if next.is_some_and(|next| can_start(next, have)) {
            break;
        }
        at = subtree_end(expr, at);
    }
    at
}

fn can_start(want: &LinearToken, have: &LinearToken) -> bool {
    match &want.kind {
        TokenKind::Atom(Atom::Rest) => true,
        TokenKind::Atom(Atom::Typed(path)) => !have.is_close() && path.matches(have.node_type),
        _ => want.same_shape(have),
    }
}
