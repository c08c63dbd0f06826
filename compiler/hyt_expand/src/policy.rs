//! Threading policies as pure tree rewrites.
//!
//! Each policy folds an ordered list of forms into an accumulated
//! expression. The single-step functions ([`thread`], [`broadcast`],
//! [`parallel`]) take the accumulator `R` and the next form `F`; the
//! `*_all` functions fold a whole form list. None of them expand macros:
//! callers pass forms that are already expanded (see [`crate::Expander`]).

use hyt_ir::{Expr, ExprError, ExprResult};
use hyt_stack::ensure_sufficient_stack;

/// Block form emitted by accumulating threading.
pub const BLOCK_SYMBOL: &str = "do";
/// Binding form emitted by accumulating threading.
pub const BIND_SYMBOL: &str = "setv";
/// Conditional form emitted by conditional threading.
pub const IF_SYMBOL: &str = "if";

/// Where the accumulator is inserted into a call form.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Position {
    First,
    Last,
}

/// How forms are folded into the accumulator.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Policy {
    Plain,
    Broadcast,
    Parallel,
    Accumulate,
    Conditional,
}

/// Insert `acc` into `form`.
///
/// A call form `(op a b)` becomes `(op acc a b)` or `(op a b acc)`; any
/// other form `f` becomes `(f acc)`.
pub fn thread(acc: &Expr, form: &Expr, position: Position) -> ExprResult {
    match form {
        Expr::Call(elements) => {
            let Some((op, operands)) = elements.split_first() else {
                return Err(ExprError::malformed(format!(
                    "cannot thread `{acc}` into an empty call form"
                )));
            };
            let mut out = Vec::with_capacity(elements.len() + 1);
            out.push(op.clone());
            match position {
                Position::First => {
                    out.push(acc.clone());
                    out.extend(operands.iter().cloned());
                }
                Position::Last => {
                    out.extend(operands.iter().cloned());
                    out.push(acc.clone());
                }
            }
            Ok(Expr::call_from(out))
        }
        _ => Ok(Expr::call(form.clone(), [acc.clone()])),
    }
}

/// Distribute across whichever side is a sequence.
///
/// - both sequences: lengths must agree, then branch `i` is broadcast into
///   form `i`.
/// - `R` a sequence: each branch is threaded into `F` on its own.
/// - `F` a sequence: the same `R` is broadcast into every element of `F`.
/// - otherwise: plain [`thread`].
pub fn broadcast(acc: &Expr, form: &Expr, position: Position) -> ExprResult {
    ensure_sufficient_stack(|| match (acc, form) {
        (Expr::Seq(branches), Expr::Seq(forms)) => {
            if branches.len() != forms.len() {
                return Err(ExprError::dimension_mismatch(forms.len(), branches.len()));
            }
            let items = branches
                .iter()
                .zip(forms.iter())
                .map(|(branch, each)| broadcast(branch, each, position))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Expr::seq(items))
        }
        (Expr::Seq(branches), _) => map_seq(branches, |branch| thread(branch, form, position)),
        (_, Expr::Seq(forms)) => map_seq(forms, |each| broadcast(acc, each, position)),
        _ => thread(acc, form, position),
    })
}

/// Combine pointwise.
///
/// - both sequences: lengths must agree, then element `i` of `R` is
///   threaded into element `i` of `F`, recursively.
/// - only `F` a sequence: `R` is threaded into every element of `F`.
/// - only `R` a sequence: every branch goes into its own copy of `F`.
/// - otherwise: plain [`thread`].
pub fn parallel(acc: &Expr, form: &Expr, position: Position) -> ExprResult {
    ensure_sufficient_stack(|| match (acc, form) {
        (Expr::Seq(branches), Expr::Seq(forms)) => {
            if branches.len() != forms.len() {
                return Err(ExprError::dimension_mismatch(forms.len(), branches.len()));
            }
            let items = branches
                .iter()
                .zip(forms.iter())
                .map(|(branch, each)| parallel(branch, each, position))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Expr::seq(items))
        }
        (_, Expr::Seq(forms)) => map_seq(forms, |each| parallel(acc, each, position)),
        (Expr::Seq(branches), _) => map_seq(branches, |branch| thread(branch, form, position)),
        _ => thread(acc, form, position),
    })
}

fn map_seq(items: &[Expr], f: impl FnMut(&Expr) -> ExprResult) -> ExprResult {
    let items = items.iter().map(f).collect::<Result<Vec<_>, _>>()?;
    Ok(Expr::seq(items))
}

fn fold(
    head: &Expr,
    forms: &[Expr],
    mut step: impl FnMut(&Expr, &Expr) -> ExprResult,
) -> ExprResult {
    forms.iter().try_fold(head.clone(), |acc, form| {
        tracing::trace!(form = %form, "fold step");
        step(&acc, form)
    })
}

/// Fold `forms` into `head` with [`thread`].
pub fn thread_all(head: &Expr, forms: &[Expr], position: Position) -> ExprResult {
    fold(head, forms, |acc, form| thread(acc, form, position))
}

pub fn thread_first(head: &Expr, forms: &[Expr]) -> ExprResult {
    thread_all(head, forms, Position::First)
}

pub fn thread_last(head: &Expr, forms: &[Expr]) -> ExprResult {
    thread_all(head, forms, Position::Last)
}

/// Fold `forms` into `head` with [`broadcast`].
pub fn broadcast_all(head: &Expr, forms: &[Expr], position: Position) -> ExprResult {
    fold(head, forms, |acc, form| broadcast(acc, form, position))
}

/// Fold `forms` into `head` with [`parallel`].
pub fn parallel_all(head: &Expr, forms: &[Expr], position: Position) -> ExprResult {
    fold(head, forms, |acc, form| parallel(acc, form, position))
}

/// Thread against a materialised binding instead of re-embedding `head`.
///
/// ```text
/// (do (setv b head)
///     (setv b (f1 b ..))
///     ...
///     b)
/// ```
pub fn set_thread(head: &Expr, forms: &[Expr], position: Position, binding: &Expr) -> ExprResult {
    let setv = |value: Expr| Expr::call(Expr::symbol(BIND_SYMBOL), [binding.clone(), value]);

    let mut block = Vec::with_capacity(forms.len() + 3);
    block.push(Expr::symbol(BLOCK_SYMBOL));
    block.push(setv(head.clone()));
    for form in forms {
        block.push(setv(thread(binding, form, position)?));
    }
    block.push(binding.clone());
    Ok(Expr::call_from(block))
}

/// Thread `(condition, transform)` pairs, gating each transform.
///
/// Stages `r0 = head`, `rk = thread(r(k-1), tk)` are built first, then
/// nested right to left:
///
/// ```text
/// (cond-> x c1 t1 c2 t2)  =>  (if c1 (if c2 r2 r1) r0)
/// ```
///
/// so a false `c1` yields `x` whatever `c2` is. Literal `True`/`False`
/// conditions are resolved here instead of emitting an `if`.
pub fn cond_thread(head: &Expr, clauses: &[Expr], position: Position) -> ExprResult {
    if clauses.len() % 2 != 0 {
        return Err(ExprError::malformed(format!(
            "conditional threading takes condition/form pairs, got {} forms",
            clauses.len()
        )));
    }

    let pairs: Vec<(&Expr, &Expr)> = clauses
        .chunks_exact(2)
        .map(|pair| (&pair[0], &pair[1]))
        .collect();

    let mut stages = Vec::with_capacity(pairs.len() + 1);
    stages.push(head.clone());
    for (_, transform) in &pairs {
        let previous = &stages[stages.len() - 1];
        let next = thread(previous, transform, position)?;
        stages.push(next);
    }

    let Some(mut gated) = stages.last().cloned() else {
        return Ok(head.clone());
    };
    for (k, (condition, _)) in pairs.iter().enumerate().rev() {
        let fallback = &stages[k];
        gated = if condition.is_true() {
            gated
        } else if condition.is_false() {
            fallback.clone()
        } else {
            Expr::call(
                Expr::symbol(IF_SYMBOL),
                [(*condition).clone(), gated, fallback.clone()],
            )
        };
    }
    Ok(gated)
}
