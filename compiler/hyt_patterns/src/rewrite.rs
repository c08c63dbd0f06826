//! Tree rewriting: generic substitution passes and pattern refactoring.

use hyt_expand::Expander;
use hyt_ir::{Expr, ExprError, ExprResult};

use crate::matcher::Pattern;

/// Traversal order for a rewrite pass.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Order {
    /// Test a node before its children. A replaced node is not descended into.
    PreOrder,
    /// Test a node after its children have been rewritten (innermost first).
    PostOrder,
}

enum Frame<'a> {
    Enter(&'a Expr),
    Exit(&'a Expr),
}

/// Rewrite `expr` in one pass.
///
/// `f` returns `Some(replacement)` to substitute a node, `None` to keep it.
/// In post-order `f` sees the node with its children already rewritten.
/// Each node is offered to `f` exactly once; replacements are never
/// revisited. The input tree is not modified.
pub fn rewrite<E>(
    expr: &Expr,
    order: Order,
    mut f: impl FnMut(&Expr) -> Result<Option<Expr>, E>,
) -> Result<Expr, E> {
    let mut stack = vec![Frame::Enter(expr)];
    let mut done: Vec<Expr> = Vec::new();

    while let Some(frame) = stack.pop() {
        let node = match frame {
            Frame::Enter(node) => {
                if order == Order::PreOrder {
                    if let Some(replacement) = f(node)? {
                        done.push(replacement);
                        continue;
                    }
                }
                if !node.children().is_empty() {
                    stack.push(Frame::Exit(node));
                    stack.extend(node.children().iter().rev().map(Frame::Enter));
                    continue;
                }
                node.clone()
            }
            Frame::Exit(node) => {
                let children = done.split_off(done.len() - node.children().len());
                node.with_children(children)
            }
        };

        match order {
            Order::PreOrder => done.push(node),
            Order::PostOrder => {
                let replacement = f(&node)?;
                done.push(replacement.unwrap_or(node));
            }
        }
    }

    Ok(done.pop().unwrap_or_else(|| expr.clone()))
}

/// Apply `(pattern, replacement)` pairs in order, each as one pre-order pass.
pub fn refactor(expander: &Expander, expr: &Expr, rules: &[(Expr, Expr)]) -> ExprResult {
    refactor_with(expander, expr, rules, Order::PreOrder)
}

/// [`refactor`] with an explicit traversal order.
///
/// Each replacement is macro-expanded once before its pass. Every node
/// matching the pair's pattern is replaced; replacements are not searched
/// again within the same pass, but later pairs see them.
pub fn refactor_with(
    expander: &Expander,
    expr: &Expr,
    rules: &[(Expr, Expr)],
    order: Order,
) -> ExprResult {
    let mut current = expr.clone();
    for (pattern, replacement) in rules {
        let pattern = Pattern::new(pattern);
        let replacement = expander.expand(replacement)?;
        let mut replaced = 0usize;
        current = rewrite(&current, order, |node| {
            if pattern.matches(node) {
                replaced += 1;
                Ok::<_, ExprError>(Some(replacement.clone()))
            } else {
                Ok(None)
            }
        })?;
        tracing::debug!(pattern = %pattern.source(), replaced, "refactor pass");
    }
    Ok(current)
}
