//! Structural errors raised while rewriting expression trees.

use thiserror::Error;

/// Result alias for fallible tree rewrites.
pub type ExprResult<T = crate::Expr> = Result<T, ExprError>;

/// A rewrite could not be performed on the given trees.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ExprError {
    /// A call form has no operator where one is required, or a macro form
    /// is missing mandatory arguments.
    #[error("malformed form: {context}")]
    MalformedForm { context: String },

    /// Two sequences threaded pointwise have different lengths.
    #[error("dimension mismatch: {expected} forms for {found} branches")]
    DimensionMismatch { expected: usize, found: usize },
}

impl ExprError {
    #[cold]
    pub fn malformed(context: impl Into<String>) -> Self {
        ExprError::MalformedForm {
            context: context.into(),
        }
    }

    #[cold]
    pub fn dimension_mismatch(expected: usize, found: usize) -> Self {
        ExprError::DimensionMismatch { expected, found }
    }
}
