//! The pre-expansion pass.
//!
//! Every form is normalised before it is used as a rewrite rule: a call
//! whose operator names a registered macro is handed to that macro, every
//! other call or sequence has its children expanded, atoms pass through.

use std::sync::atomic::{AtomicUsize, Ordering};

use hyt_ir::{Expr, ExprError, ExprResult};
use hyt_stack::ensure_sufficient_stack;

use crate::registry::{MacroDefinition, MacroRegistry};

/// Upper bound on macro rewrites applied at the root of a single form.
///
/// Reaching it means a macro keeps producing another macro call.
pub const MAX_ROOT_EXPANSIONS: usize = 256;

/// Counter for fresh binding names, shared by every expander.
///
/// Expansions from different expanders may be spliced into one scope, so
/// names must be unique per process.
static GENSYM: AtomicUsize = AtomicUsize::new(0);

/// Expands macro forms using a [`MacroRegistry`].
#[derive(Debug, Default)]
pub struct Expander {
    registry: MacroRegistry,
}

impl Expander {
    /// Create an expander that knows the built-in thread macros.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_registry(registry: MacroRegistry) -> Self {
        Expander { registry }
    }

    pub fn registry(&self) -> &MacroRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut MacroRegistry {
        &mut self.registry
    }

    /// A symbol no earlier call in this process has returned.
    pub fn gensym(&self, stem: &str) -> Expr {
        let n = GENSYM.fetch_add(1, Ordering::Relaxed);
        Expr::symbol(format!("_hyt_{stem}_{n}"))
    }

    /// Fully expand `form`.
    ///
    /// Macro output is expanded again while its root is still a macro
    /// call; macros are responsible for expanding their own operands.
    #[tracing::instrument(level = "trace", skip_all, fields(form = %form))]
    pub fn expand(&self, form: &Expr) -> ExprResult {
        ensure_sufficient_stack(|| self.expand_node(form))
    }

    /// Expand every form of a list.
    pub fn expand_all(&self, forms: &[Expr]) -> ExprResult<Vec<Expr>> {
        forms.iter().map(|form| self.expand(form)).collect()
    }

    fn macro_for(&self, form: &Expr) -> Option<&dyn MacroDefinition> {
        let name = form.operator()?.as_symbol()?;
        self.registry.get(name)
    }

    fn expand_node(&self, form: &Expr) -> ExprResult {
        match form {
            Expr::Atom(_) => return Ok(form.clone()),
            Expr::Seq(items) => return self.expand_children(form, items),
            Expr::Call(_) => {}
        }

        let mut current = form.clone();
        let mut steps = 0;
        while let Some(definition) = self.macro_for(&current) {
            if steps == MAX_ROOT_EXPANSIONS {
                return Err(ExprError::malformed(format!(
                    "expansion of `{form}` did not settle after {MAX_ROOT_EXPANSIONS} rewrites"
                )));
            }
            steps += 1;
            tracing::trace!(name = definition.name(), step = steps, "macro rewrite");
            current = definition.expand(self, current.operands())?;
        }

        if steps == 0 {
            self.expand_children(form, form.children())
        } else {
            Ok(current)
        }
    }

    fn expand_children(&self, form: &Expr, children: &[Expr]) -> ExprResult {
        let children = self.expand_all(children)?;
        Ok(form.with_children(children))
    }
}
