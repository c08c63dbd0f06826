//! Hyt Spec - runtime specifications for values and expression trees.
//!
//! This crate provides:
//! - [`Value`]: the runtime values specs are checked against, including
//!   records, component objects ([`HasNamedSubfields`]) and quoted trees
//! - [`Spec`] and its combinators ([`and`], [`or`], [`nand`], [`dict_of`],
//!   [`coll_of`], [`keys`], [`cat`], [`modules`], [`parameters`])
//! - [`SpecEnv`]: the registries of data specs, function specs and
//!   generators, plus the conformance trace
//! - the operators on [`SpecEnv`]: `valid`, `conform`, `explain`, `assert`,
//!   `describe`, `generate`, `valid_call`, `conform_call`, `call`, `search`
//!   and `replace`
//!
//! # Example
//!
//! ```
//! use hyt_spec::{pred, Spec, SpecEnv, Value};
//!
//! let env = SpecEnv::new();
//! env.define(":even", pred("even?", |v: &Value| v.as_int().is_some_and(|n| n % 2 == 0)))
//!     .unwrap();
//!
//! let even = Spec::named(":even");
//! assert!(env.valid(&even, &Value::int(4)).unwrap());
//!
//! let err = env.conform(&even, &Value::int(3)).unwrap_err();
//! assert_eq!(err.to_string(), "Failed :even, Found: 3");
//! ```

mod component;
mod env;
mod error;
mod eval;
mod ops;
mod spec;
mod trace;
mod value;

pub use component::{bind_components, ComponentSpec};
pub use env::SpecEnv;
pub use error::{SpecError, SpecResult};
pub use spec::{
    and, cat, coll_of, dict_of, keys, modules, named, nand, or, parameters, pattern, pred,
    FieldSpecs, FnSpec, Predicate, Spec,
};
pub use trace::{ConformTrace, TraceEntry};
pub use value::{FunctionValue, HasNamedSubfields, Heap, RecordValue, Subcollection, Value};
