//! Hyt Patterns - structural matching over expression trees.
//!
//! This crate provides:
//! - [`linearize`]: pre-order token streams with explicit open/close markers
//! - [`Pattern`] / [`matches`]: typed-wildcard and `&rest` matching over
//!   those streams
//! - [`find`] / [`subtrees`]: pre-order search for matching subtrees
//! - [`rewrite`] / [`refactor`]: substitution passes over a tree
//!
//! Every traversal here runs on an explicit work stack, so tree depth is
//! bounded by memory, not by the native stack.
//!
//! # Matching Semantics
//!
//! Matching is greedy and never backtracks. A `&rest` marker swallows
//! whole sibling subtrees until the next pattern token can start at the
//! current position; that first realignment is final. Patterns with several
//! possible realignments are not explored further.
//!
//! ```
//! use hyt_ir::build::{call, sym, typed};
//! use hyt_patterns::matches;
//!
//! let expr = call("sigmoid", [call("linear", [sym("a"), sym("b")])]);
//! assert!(matches(&expr, &call("sigmoid", [typed(":hy:models")])));
//! ```

mod linearize;
mod matcher;
mod rewrite;
mod search;

pub use linearize::{linearize, subtree_end, subtree_ends, LinearToken, TokenKind};
pub use matcher::{match_tokens, matches, Pattern};
pub use rewrite::{refactor, refactor_with, rewrite, Order};
pub use search::{find, subtrees, Subtrees};
