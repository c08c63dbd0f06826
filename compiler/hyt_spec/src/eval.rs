//! Spec evaluation.
//!
//! `and`, `or` and `nand` evaluate every sub-spec before combining, so a
//! trace shows each named check even after the outcome is decided.
//! Quantifiers (`coll-of`, `dict-of`, `keys`, `cat`, `modules`,
//! `parameters`) stop at the first failing element.
//!
//! Named evaluations are appended to the environment's trace only in
//! `Mode::Traced`, which the diagnostic operators use.

use hyt_stack::ensure_sufficient_stack;

use crate::env::SpecEnv;
use crate::error::SpecResult;
use crate::spec::{FieldSpecs, Spec};
use crate::value::{Subcollection, Value};

/// Whether an evaluation records named checks into the trace.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Mode {
    Silent,
    Traced,
}

impl SpecEnv {
    /// Evaluate `spec` against `value`.
    pub(crate) fn eval(&self, spec: &Spec, value: &Value, mode: Mode) -> SpecResult<bool> {
        ensure_sufficient_stack(|| self.eval_inner(spec, value, mode))
    }

    fn eval_inner(&self, spec: &Spec, value: &Value, mode: Mode) -> SpecResult<bool> {
        match spec {
            Spec::Named(name) => {
                let resolved = self.resolve(name)?;
                let passed = self.eval(&resolved, value, mode)?;
                if mode == Mode::Traced {
                    self.record(name.clone(), passed, value);
                }
                Ok(passed)
            }
            Spec::Pred(predicate) => Ok(predicate.test(value)),
            Spec::Matches(pattern) => Ok(value.as_expr().is_some_and(|expr| pattern.matches(expr))),
            Spec::And(specs) => Ok(self.eval_each(specs, value, mode)?.iter().all(|&passed| passed)),
            Spec::Or(specs) => Ok(self.eval_each(specs, value, mode)?.iter().any(|&passed| passed)),
            Spec::Nand(specs) => Ok(!self.eval_each(specs, value, mode)?.iter().all(|&passed| passed)),
            Spec::DictOf { key, value: val } => {
                let Value::Map(entries) = value else {
                    return Ok(false);
                };
                for (k, v) in entries.iter() {
                    if !self.eval(key, k, mode)? || !self.eval(val, v, mode)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Spec::CollOf(element) => {
                let Some(elements) = value.elements() else {
                    return Ok(false);
                };
                self.all(elements.iter().map(|item| (&**element, item)), mode)
            }
            Spec::Keys(fields) => self.eval_fields(fields, |name| value.field(name), mode),
            Spec::Cat(specs) => {
                let Some(elements) = value.indexed() else {
                    return Ok(false);
                };
                if elements.len() != specs.len() {
                    return Ok(false);
                }
                self.all(specs.iter().zip(&elements), mode)
            }
            Spec::Modules(fields) => {
                self.eval_subcollection(fields, value, Subcollection::Modules, mode)
            }
            Spec::Parameters(fields) => {
                self.eval_subcollection(fields, value, Subcollection::Parameters, mode)
            }
        }
    }

    fn eval_each(&self, specs: &[Spec], value: &Value, mode: Mode) -> SpecResult<Vec<bool>> {
        specs.iter().map(|spec| self.eval(spec, value, mode)).collect()
    }

    fn all<'a>(
        &self,
        checks: impl IntoIterator<Item = (&'a Spec, &'a Value)>,
        mode: Mode,
    ) -> SpecResult<bool> {
        for (spec, value) in checks {
            if !self.eval(spec, value, mode)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn eval_fields(
        &self,
        fields: &FieldSpecs,
        lookup: impl Fn(&str) -> Option<Value>,
        mode: Mode,
    ) -> SpecResult<bool> {
        for (name, spec) in fields.iter() {
            let Some(field) = lookup(&**name) else {
                tracing::trace!(field = %name, "missing field");
                return Ok(false);
            };
            if !self.eval(spec, &field, mode)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Fails closed when `value` is not an object exposing `collection`.
    fn eval_subcollection(
        &self,
        fields: &FieldSpecs,
        value: &Value,
        collection: Subcollection,
        mode: Mode,
    ) -> SpecResult<bool> {
        let Value::Object(object) = value else {
            return Ok(false);
        };
        let Some(bag) = object.subcollection(collection) else {
            tracing::trace!(collection = collection.name(), "no subcollection");
            return Ok(false);
        };
        self.eval_fields(
            fields,
            |name| {
                bag.iter()
                    .find(|(field, _)| &**field == name)
                    .map(|(_, value)| value.clone())
            },
            mode,
        )
    }
}
