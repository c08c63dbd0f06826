//! Errors raised by spec registration and checking.

use std::sync::Arc;

use hyt_ir::ExprError;
use thiserror::Error;

use crate::trace::ConformTrace;

/// Result alias for spec operations.
pub type SpecResult<T> = Result<T, SpecError>;

#[derive(Clone, Debug, PartialEq, Error)]
pub enum SpecError {
    /// Data failed a spec. The message is the rendered trace.
    #[error("{trace}")]
    Conformance { trace: ConformTrace },

    #[error("no generator defined for :{name}")]
    GeneratorNotDefined { name: Arc<str> },

    /// A required component was neither supplied nor defaulted.
    #[error("missing component `{name}` with no default")]
    MissingComponent { name: Arc<str> },

    #[error("unknown spec :{name}")]
    UnknownSpec { name: Arc<str> },

    /// Defining `name` would close a chain of aliases back onto itself.
    #[error("cyclic spec alias: {}", render_cycle(.cycle))]
    CyclicSpec { cycle: Vec<Arc<str>> },

    #[error(transparent)]
    Expr(#[from] ExprError),
}

fn render_cycle(cycle: &[Arc<str>]) -> String {
    cycle
        .iter()
        .map(|name| format!(":{name}"))
        .collect::<Vec<_>>()
        .join(" -> ")
}

impl SpecError {
    #[cold]
    pub fn unknown(name: &str) -> Self {
        SpecError::UnknownSpec {
            name: Arc::from(name),
        }
    }

    /// The failed trace, if this is a conformance failure.
    pub fn trace(&self) -> Option<&ConformTrace> {
        match self {
            SpecError::Conformance { trace } => Some(trace),
            _ => None,
        }
    }
}
