//! Hyt IR - expression trees for macro expansion and structural matching.
//!
//! This crate contains the data model every other `hyt_*` crate works on:
//! - [`Expr`]: an immutable tree of atoms, sequences (`[a b]`) and call
//!   forms (`(op a b)`)
//! - [`Atom`] / [`Lit`]: leaves, including the two pattern-only atoms
//!   (`&rest` and typed wildcards)
//! - [`NodeType`] / [`TypePath`]: the dotted type names wildcards match on
//! - [`ExprError`]: the structural errors raised by rewrites
//!
//! # Design Philosophy
//!
//! - **Immutable**: every rewrite builds a new tree; children are shared
//!   through `Arc`, so earlier trees stay valid.
//! - **No parsing**: trees are built programmatically (see [`build`]).
//! - **Hashable**: floats are stored as bits so `Expr: Eq + Hash`.

mod atom;
pub mod build;
mod error;
mod expr;
mod type_path;

pub use atom::{Atom, AtomKind, Lit};
pub use error::{ExprError, ExprResult};
pub use expr::Expr;
pub use type_path::{NodeType, TypePath, MODEL_NAMESPACE};
