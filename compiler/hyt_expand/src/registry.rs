//! Macro registry for looking up macro definitions by operator symbol.

use std::fmt;
use std::sync::Arc;

use hyt_ir::{Expr, ExprError, ExprResult};
use rustc_hash::FxHashMap;

use crate::expander::Expander;
use crate::policy::{self, Policy, Position};

/// A form that the expander rewrites when it appears in operator position.
pub trait MacroDefinition: Send + Sync {
    /// The operator symbol, e.g. `"->"`.
    fn name(&self) -> &str;

    /// Rewrite the operands of `(name operands...)`.
    ///
    /// Operands arrive unexpanded; the macro decides what to expand.
    fn expand(&self, expander: &Expander, operands: &[Expr]) -> ExprResult;
}

/// One of the built-in thread macros.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ThreadMacro {
    name: &'static str,
    policy: Policy,
    position: Position,
}

impl ThreadMacro {
    pub const fn new(name: &'static str, policy: Policy, position: Position) -> Self {
        ThreadMacro {
            name,
            policy,
            position,
        }
    }

    pub fn policy(&self) -> Policy {
        self.policy
    }

    pub fn position(&self) -> Position {
        self.position
    }
}

impl MacroDefinition for ThreadMacro {
    fn name(&self) -> &str {
        self.name
    }

    fn expand(&self, expander: &Expander, operands: &[Expr]) -> ExprResult {
        let Some((head, forms)) = operands.split_first() else {
            return Err(ExprError::malformed(format!(
                "`{}` needs an expression to thread",
                self.name
            )));
        };

        // Forms are rewrite rules themselves: resolve nested macros first.
        let head = expander.expand(head)?;
        let forms = forms
            .iter()
            .map(|form| expander.expand(form))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(
            name = self.name,
            forms = forms.len(),
            "expanding thread macro"
        );

        match self.policy {
            Policy::Plain => policy::thread_all(&head, &forms, self.position),
            Policy::Broadcast => policy::broadcast_all(&head, &forms, self.position),
            Policy::Parallel => policy::parallel_all(&head, &forms, self.position),
            Policy::Accumulate => {
                let binding = expander.gensym("acc");
                policy::set_thread(&head, &forms, self.position, &binding)
            }
            Policy::Conditional => policy::cond_thread(&head, &forms, self.position),
        }
    }
}

// Static macro instances for 'static lifetime references
static THREAD_FIRST: ThreadMacro = ThreadMacro::new("->", Policy::Plain, Position::First);
static THREAD_LAST: ThreadMacro = ThreadMacro::new("->>", Policy::Plain, Position::Last);
static BROADCAST_FIRST: ThreadMacro = ThreadMacro::new("*->", Policy::Broadcast, Position::First);
static BROADCAST_LAST: ThreadMacro = ThreadMacro::new("*->>", Policy::Broadcast, Position::Last);
static PARALLEL_FIRST: ThreadMacro = ThreadMacro::new("|->", Policy::Parallel, Position::First);
static PARALLEL_LAST: ThreadMacro = ThreadMacro::new("|->>", Policy::Parallel, Position::Last);
static SET_FIRST: ThreadMacro = ThreadMacro::new("set->", Policy::Accumulate, Position::First);
static SET_LAST: ThreadMacro = ThreadMacro::new("set->>", Policy::Accumulate, Position::Last);
static COND_FIRST: ThreadMacro = ThreadMacro::new("cond->", Policy::Conditional, Position::First);
static COND_LAST: ThreadMacro = ThreadMacro::new("cond->>", Policy::Conditional, Position::Last);

static BUILTINS: [&ThreadMacro; 10] = [
    &THREAD_FIRST,
    &THREAD_LAST,
    &BROADCAST_FIRST,
    &BROADCAST_LAST,
    &PARALLEL_FIRST,
    &PARALLEL_LAST,
    &SET_FIRST,
    &SET_LAST,
    &COND_FIRST,
    &COND_LAST,
];

/// Registry mapping operator symbols to macro definitions.
///
/// Built-in thread macros are resolved by direct dispatch on the symbol;
/// user macros live in a map and shadow built-ins of the same name.
#[derive(Default)]
pub struct MacroRegistry {
    user: FxHashMap<Arc<str>, Arc<dyn MacroDefinition>>,
}

impl MacroRegistry {
    /// Create a registry holding only the built-in thread macros.
    pub fn new() -> Self {
        Self::default()
    }

    fn builtin(name: &str) -> Option<&'static ThreadMacro> {
        match name {
            "->" => Some(&THREAD_FIRST),
            "->>" => Some(&THREAD_LAST),
            "*->" => Some(&BROADCAST_FIRST),
            "*->>" => Some(&BROADCAST_LAST),
            "|->" => Some(&PARALLEL_FIRST),
            "|->>" => Some(&PARALLEL_LAST),
            "set->" => Some(&SET_FIRST),
            "set->>" => Some(&SET_LAST),
            "cond->" => Some(&COND_FIRST),
            "cond->>" => Some(&COND_LAST),
            _ => None,
        }
    }

    /// Register a user macro, replacing any previous one of the same name.
    pub fn register(&mut self, definition: Arc<dyn MacroDefinition>) {
        let name: Arc<str> = Arc::from(definition.name());
        tracing::debug!(name = %name, "registering macro");
        self.user.insert(name, definition);
    }

    /// Remove a user macro. Built-ins cannot be removed.
    pub fn unregister(&mut self, name: &str) -> bool {
        self.user.remove(name).is_some()
    }

    /// Look up the macro for an operator symbol.
    pub fn get(&self, name: &str) -> Option<&dyn MacroDefinition> {
        if let Some(user) = self.user.get(name) {
            return Some(user.as_ref());
        }
        Self::builtin(name).map(|builtin| builtin as &dyn MacroDefinition)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Names of every registered macro, built-ins first.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        BUILTINS
            .iter()
            .map(|builtin| builtin.name)
            .filter(|name| !self.user.contains_key(*name))
            .chain(self.user.keys().map(|name| &**name))
    }

    pub fn len(&self) -> usize {
        self.names().count()
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

impl fmt::Debug for MacroRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

#[cfg(test)]
mod tests;
