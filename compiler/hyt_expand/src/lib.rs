//! Hyt Expand - macro pre-expansion and the thread macros.
//!
//! This crate provides:
//! - The eight threading policies as pure tree rewrites ([`policy`])
//! - `MacroDefinition`, the trait every expandable form implements
//! - `MacroRegistry`, mapping operator symbols to macro definitions
//! - `Expander`, the normalisation pass that resolves every nested macro
//!   form before it is used as a rewrite rule
//!
//! # Thread Macros
//!
//! | Symbol          | Policy         | Inserts at |
//! |-----------------|----------------|------------|
//! | `->` / `->>`     | plain          | first / last |
//! | `*->` / `*->>`   | broadcast      | first / last |
//! | `\|->` / `\|->>` | parallel       | first / last |
//! | `set->` / `set->>` | accumulating | first / last |
//! | `cond->` / `cond->>` | conditional | first / last |
//!
//! ```
//! use hyt_expand::Expander;
//! use hyt_ir::build::{call, call0, sym};
//!
//! let form = call("->", [sym("x"), call0("inc"), call0("sigmoid")]);
//! let expanded = Expander::new().expand(&form).unwrap();
//! assert_eq!(expanded.to_string(), "(sigmoid (inc x))");
//! ```

mod expander;
pub mod policy;
mod registry;

pub use expander::{Expander, MAX_ROOT_EXPANSIONS};
pub use policy::{Policy, Position};
pub use registry::{MacroDefinition, MacroRegistry, ThreadMacro};
