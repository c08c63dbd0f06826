//! Conformance, generation and tree operators.
//!
//! Top-level operators that report a trace (`conform`, `explain`, `assert`,
//! and the checked-call family) reset it first and take it on every exit, so
//! no entries outlive the call. `valid` evaluates without recording.

use hyt_ir::Expr;
use hyt_patterns::{rewrite, subtrees, Order};

use crate::env::SpecEnv;
use crate::eval::Mode;
use crate::error::{SpecError, SpecResult};
use crate::spec::{spec_name, Spec};
use crate::trace::ConformTrace;
use crate::value::{FunctionValue, Value};

impl SpecEnv {
    /// Whether `data` satisfies `spec`.
    pub fn valid(&self, spec: &Spec, data: &Value) -> SpecResult<bool> {
        self.eval(spec, data, Mode::Silent)
    }

    /// `data` itself if it satisfies `spec`, otherwise a
    /// [`SpecError::Conformance`] carrying the full trace.
    #[tracing::instrument(level = "debug", skip_all, fields(spec = %spec))]
    pub fn conform(&self, spec: &Spec, data: &Value) -> SpecResult<Value> {
        let (passed, trace) = self.traced(spec, data);
        if passed? {
            Ok(data.clone())
        } else {
            tracing::debug!(entries = trace.len(), "conformance failed");
            Err(SpecError::Conformance { trace })
        }
    }

    /// The trace of checking `data` against `spec`, pass or fail.
    pub fn explain(&self, spec: &Spec, data: &Value) -> SpecResult<ConformTrace> {
        let (passed, trace) = self.traced(spec, data);
        passed?;
        Ok(trace)
    }

    /// One recorded evaluation. The trace is taken whatever the outcome.
    fn traced(&self, spec: &Spec, data: &Value) -> (SpecResult<bool>, ConformTrace) {
        self.reset_trace();
        let passed = self.eval(spec, data, Mode::Traced);
        (passed, self.take_trace())
    }

    /// [`conform`](Self::conform) without the result. When asserts are
    /// disabled nothing is evaluated.
    pub fn assert(&self, spec: &Spec, data: &Value) -> SpecResult<()> {
        if !self.check_asserts() {
            return Ok(());
        }
        self.conform(spec, data).map(drop)
    }

    /// Render `spec`. Named specs render their registered definition.
    pub fn describe(&self, spec: &Spec) -> SpecResult<String> {
        match spec {
            Spec::Named(name) => Ok(self.resolve(name)?.to_string()),
            _ => Ok(spec.to_string()),
        }
    }

    /// Run the generator registered under `name`.
    ///
    /// If a data spec is registered under the same name, the generated
    /// value must conform to it.
    #[tracing::instrument(level = "debug", skip(self, args))]
    pub fn generate(&self, name: &str, args: &[Value]) -> SpecResult<Value> {
        let generator = self
            .generator(name)
            .ok_or_else(|| SpecError::GeneratorNotDefined {
                name: spec_name(name),
            })?;
        let value = generator.call(args);
        if self.is_defined(name) {
            return self.conform(&Spec::named(name), &value);
        }
        Ok(value)
    }

    /// Whether `args` satisfy the argument spec registered for `name`.
    pub fn valid_call(&self, name: &str, args: &[Value]) -> SpecResult<bool> {
        let spec = self.fn_spec(name).ok_or_else(|| SpecError::unknown(name))?;
        self.valid(&spec.args, &Value::list(args.to_vec()))
    }

    /// `args` if they conform to the argument spec registered for `name`.
    pub fn conform_call(&self, name: &str, args: &[Value]) -> SpecResult<Vec<Value>> {
        let spec = self.fn_spec(name).ok_or_else(|| SpecError::unknown(name))?;
        self.conform(&spec.args, &Value::list(args.to_vec()))?;
        Ok(args.to_vec())
    }

    /// Call `func` under the function spec registered for its name:
    /// arguments are conformed before the call and the result after it.
    #[tracing::instrument(level = "debug", skip_all, fields(function = func.name()))]
    pub fn call(&self, func: &FunctionValue, args: &[Value]) -> SpecResult<Value> {
        let spec = self
            .fn_spec(func.name())
            .ok_or_else(|| SpecError::unknown(func.name()))?;
        self.conform(&spec.args, &Value::list(args.to_vec()))?;
        let result = func.call(args);
        match &spec.ret {
            Some(ret) => self.conform(ret, &result),
            None => Ok(result),
        }
    }

    /// Subtrees of `tree` satisfying `spec`, lazily, in pre-order.
    ///
    /// Each subtree is checked as a [`Value::Expr`].
    pub fn search<'a>(
        &'a self,
        spec: &'a Spec,
        tree: &'a Expr,
    ) -> impl Iterator<Item = SpecResult<Expr>> + 'a {
        subtrees(tree).filter_map(move |node| match self.valid(spec, &Value::Expr(node.clone())) {
            Ok(true) => Some(Ok(node.clone())),
            Ok(false) => None,
            Err(err) => Some(Err(err)),
        })
    }

    /// Replace every subtree of `tree` satisfying `spec`, innermost first.
    pub fn replace(&self, spec: &Spec, tree: &Expr, replacement: &Expr) -> SpecResult<Expr> {
        rewrite(tree, Order::PostOrder, |node: &Expr| -> SpecResult<Option<Expr>> {
            let hit = self.valid(spec, &Value::Expr(node.clone()))?;
            Ok(hit.then(|| replacement.clone()))
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
