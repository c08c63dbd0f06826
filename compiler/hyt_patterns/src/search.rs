//! Pre-order search over expression trees.

use hyt_ir::Expr;
use smallvec::SmallVec;

use crate::linearize::{linearize, subtree_ends};
use crate::matcher::match_tokens;

/// Pre-order iterator over every node of a tree, root first.
#[derive(Clone, Debug)]
pub struct Subtrees<'a> {
    stack: SmallVec<[&'a Expr; 16]>,
}

impl<'a> Iterator for Subtrees<'a> {
    type Item = &'a Expr;

    fn next(&mut self) -> Option<&'a Expr> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children().iter().rev());
        Some(node)
    }
}

pub fn subtrees(expr: &Expr) -> Subtrees<'_> {
    let mut stack = SmallVec::new();
    stack.push(expr);
    Subtrees { stack }
}

/// Collect up to `limit` subtrees of `expr` matching `pattern`, in pre-order.
///
/// `expr` is linearized once. Every non-close token starts exactly one
/// subtree, in the same order [`subtrees`] yields them, so the match at each
/// start runs on the token slice of that subtree alone.
#[tracing::instrument(level = "debug", skip_all, fields(pattern = %pattern))]
pub fn find(expr: &Expr, pattern: &Expr, limit: Option<usize>) -> Vec<Expr> {
    let limit = limit.unwrap_or(usize::MAX);
    let mut hits = Vec::new();
    if limit == 0 {
        return hits;
    }

    let tokens = linearize(expr);
    let pattern_tokens = linearize(pattern);
    let ends = subtree_ends(&tokens);
    let starts = (0..tokens.len()).filter(|&i| !tokens[i].is_close());

    for (start, node) in starts.zip(subtrees(expr)) {
        if match_tokens(&tokens[start..ends[start]], &pattern_tokens) {
            hits.push(node.clone());
            if hits.len() == limit {
                break;
            }
        }
    }
    tracing::debug!(hits = hits.len(), "search finished");
    hits
}
