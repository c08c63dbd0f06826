//! The spec environment: registries, trace and assert switch.
//!
//! A [`SpecEnv`] bundles the four registries specs are checked against:
//!
//! | Registry | Maps a name to |
//! |----------|----------------|
//! | data     | a data [`Spec`] (or an alias of another name) |
//! | fun      | a [`FnSpec`] for checked calls |
//! | gen      | a generator [`FunctionValue`] |
//! | trace    | the [`ConformTrace`] of the current top-level check |
//!
//! Registries sit behind `parking_lot` locks, so one environment may be
//! shared across threads. The trace is shared too: concurrent top-level
//! checks on the same environment interleave their entries.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use parking_lot::{Mutex, RwLock};
use rustc_hash::FxHashMap;

use crate::error::{SpecError, SpecResult};
use crate::spec::{spec_name, FnSpec, Spec};
use crate::trace::{ConformTrace, TraceEntry};
use crate::value::{FunctionValue, Value};

type Registry<T> = FxHashMap<Arc<str>, T>;

pub struct SpecEnv {
    data: RwLock<Registry<Spec>>,
    fun: RwLock<Registry<FnSpec>>,
    gen: RwLock<Registry<FunctionValue>>,
    trace: Mutex<ConformTrace>,
    next_trace_id: AtomicU64,
    check_asserts: AtomicBool,
}

static GLOBAL: OnceLock<SpecEnv> = OnceLock::new();

impl SpecEnv {
    /// An empty, isolated environment with asserts enabled.
    pub fn new() -> Self {
        SpecEnv {
            data: RwLock::new(FxHashMap::default()),
            fun: RwLock::new(FxHashMap::default()),
            gen: RwLock::new(FxHashMap::default()),
            trace: Mutex::new(ConformTrace::new()),
            next_trace_id: AtomicU64::new(0),
            check_asserts: AtomicBool::new(true),
        }
    }

    /// The process-wide environment, created on first use.
    pub fn global() -> &'static SpecEnv {
        GLOBAL.get_or_init(SpecEnv::new)
    }

    pub fn check_asserts(&self) -> bool {
        self.check_asserts.load(Ordering::Relaxed)
    }

    pub fn set_check_asserts(&self, enabled: bool) {
        self.check_asserts.store(enabled, Ordering::Relaxed);
    }

    // Data registry

    /// Register one data spec.
    pub fn define(&self, name: &str, spec: Spec) -> SpecResult<()> {
        self.define_many([(name, spec)])
    }

    /// Register several data specs atomically.
    ///
    /// Entries are validated in order against a staged copy of the
    /// registry, so later entries may alias earlier ones. If any entry
    /// fails, nothing is registered.
    ///
    /// An entry that is itself a [`Spec::Named`] is stored as an alias. The
    /// aliased name must already be defined, and the alias chain it starts
    /// must not lead back to the name being defined.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn define_many<'a>(&self, entries: impl IntoIterator<Item = (&'a str, Spec)>) -> SpecResult<()> {
        let mut data = self.data.write();
        let mut staged = data.clone();
        for (name, spec) in entries {
            let name = spec_name(name);
            if let Some(target) = spec.as_named() {
                check_alias(&staged, &name, target)?;
            }
            tracing::debug!(name = %name, spec = %spec, "define spec");
            staged.insert(name, spec);
        }
        *data = staged;
        Ok(())
    }

    /// Register argument/return specs for calls of `name`.
    pub fn define_fn(&self, name: &str, spec: FnSpec) {
        tracing::debug!(name, spec = %spec, "define function spec");
        self.fun.write().insert(spec_name(name), spec);
    }

    /// Register a generator for `name`.
    pub fn define_gen(&self, name: &str, generator: FunctionValue) {
        tracing::debug!(name, generator = generator.name(), "define generator");
        self.gen.write().insert(spec_name(name), generator);
    }

    /// Remove `name` from every registry. Returns whether anything was
    /// removed. Aliases of `name` are left dangling.
    pub fn undefine(&self, name: &str) -> bool {
        let name = spec_name(name);
        let data = self.data.write().remove(&name).is_some();
        let fun = self.fun.write().remove(&name).is_some();
        let gen = self.gen.write().remove(&name).is_some();
        data || fun || gen
    }

    /// Whether a data spec is registered under `name`.
    pub fn is_defined(&self, name: &str) -> bool {
        self.data.read().contains_key(&*spec_name(name))
    }

    /// Registered data spec names, sorted.
    pub fn names(&self) -> Vec<Arc<str>> {
        let mut names: Vec<Arc<str>> = self.data.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// The spec registered under `name`, with aliases followed.
    pub fn resolve(&self, name: &str) -> SpecResult<Spec> {
        let data = self.data.read();
        let mut current = spec_name(name);
        // A chain longer than the registry must have revisited a name.
        for _ in 0..=data.len() {
            match data.get(&current) {
                Some(Spec::Named(next)) => current = next.clone(),
                Some(spec) => return Ok(spec.clone()),
                None => return Err(SpecError::unknown(&current)),
            }
        }
        Err(SpecError::CyclicSpec {
            cycle: vec![current],
        })
    }

    pub fn fn_spec(&self, name: &str) -> Option<FnSpec> {
        self.fun.read().get(&*spec_name(name)).cloned()
    }

    pub fn generator(&self, name: &str) -> Option<FunctionValue> {
        self.gen.read().get(&*spec_name(name)).cloned()
    }

    // Trace

    /// Entries recorded so far by a diagnostic check still in progress.
    ///
    /// Every top-level operator takes the trace before returning, so this is
    /// empty between calls.
    pub fn trace(&self) -> ConformTrace {
        self.trace.lock().clone()
    }

    pub(crate) fn reset_trace(&self) {
        self.trace.lock().clear();
    }

    pub(crate) fn take_trace(&self) -> ConformTrace {
        std::mem::take(&mut *self.trace.lock())
    }

    pub(crate) fn record(&self, spec: Arc<str>, passed: bool, value: &Value) {
        let id = self.next_trace_id.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(id, spec = %spec, passed, "spec evaluated");
        self.trace.lock().push(TraceEntry {
            id,
            spec,
            passed,
            value: value.clone(),
        });
    }
}

impl Default for SpecEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SpecEnv {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpecEnv")
            .field("data", &self.data.read().len())
            .field("fun", &self.fun.read().len())
            .field("gen", &self.gen.read().len())
            .field("check_asserts", &self.check_asserts())
            .finish_non_exhaustive()
    }
}

/// Validate that `name` may alias `target` in `staged`.
fn check_alias(staged: &Registry<Spec>, name: &Arc<str>, target: &str) -> SpecResult<()> {
    let mut chain = vec![name.clone()];
    let mut current: Arc<str> = Arc::from(target);
    loop {
        if current == *name {
            chain.push(current);
            return Err(SpecError::CyclicSpec { cycle: chain });
        }
        chain.push(current.clone());
        match staged.get(&current) {
            Some(Spec::Named(next)) => current = next.clone(),
            Some(_) => return Ok(()),
            None => return Err(SpecError::unknown(&current)),
        }
        // Cycles not passing through `name` were rejected when defined.
        if chain.len() > staged.len() + 1 {
            return Err(SpecError::CyclicSpec { cycle: chain });
        }
    }
}
