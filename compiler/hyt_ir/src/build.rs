//! Terse constructors for building trees in code and tests.
//!
//! ```
//! use hyt_ir::build::{call, seq, sym};
//!
//! let form = call("sigmoid", [call("linear", [sym("a"), sym("b")])]);
//! assert_eq!(form.to_string(), "(sigmoid (linear a b))");
//! assert_eq!(seq([sym("x"), sym("y")]).to_string(), "[x y]");
//! ```

use crate::Expr;

pub fn sym(name: &str) -> Expr {
    Expr::symbol(name)
}

pub fn kw(name: &str) -> Expr {
    Expr::keyword(name)
}

pub fn int(value: i64) -> Expr {
    Expr::int(value)
}

pub fn string(value: &str) -> Expr {
    Expr::string(value)
}

/// `(op args...)` with a symbol operator.
pub fn call(op: &str, args: impl IntoIterator<Item = Expr>) -> Expr {
    Expr::call(Expr::symbol(op), args)
}

/// `(op)`: a call with no operands.
pub fn call0(op: &str) -> Expr {
    Expr::call(Expr::symbol(op), [])
}

pub fn seq(items: impl IntoIterator<Item = Expr>) -> Expr {
    Expr::seq(items)
}

pub fn rest() -> Expr {
    Expr::rest()
}

pub fn typed(path: &str) -> Expr {
    Expr::typed(path)
}
