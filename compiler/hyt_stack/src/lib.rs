//! Stack growth for recursive tree passes.
//!
//! Macro expansion and the threading policies recurse once per nesting level
//! of the input forms, and spec evaluation once per level of spec and data
//! nesting. Inputs can be arbitrarily deep, so every recursive entry point in
//! the workspace goes through
//! [`ensure_sufficient_stack`], which grows the native stack on demand.
//!
//! Linearization, matching, searching and rewriting do not need this: they
//! run on explicit work stacks.
//!
//! # Platform Support
//!
//! - **Native targets**: `stacker::maybe_grow`.
//! - **WASM targets**: plain call.

/// Remaining stack below which a new segment is allocated (128KB).
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated stack segment (2MB).
const SEGMENT_SIZE: usize = 2 * 1024 * 1024;

/// Run `f`, first growing the stack if less than [`RED_ZONE`] remains.
///
/// ```text
/// fn expand(&self, form: &Expr) -> Result<Expr, ExprError> {
///     ensure_sufficient_stack(|| self.expand_inner(form))
/// }
/// ```
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
