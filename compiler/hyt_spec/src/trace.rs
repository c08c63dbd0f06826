//! Conformance traces: the record of every named spec evaluation.
//!
//! Each evaluation of a named spec appends one [`TraceEntry`]. A failing
//! `conform` reports the whole trace, rendered one entry per line:
//!
//! ```text
//! Passed :positive, Found: 4
//! Failed :even, Found: 3
//! ```

use std::fmt;
use std::sync::Arc;

use crate::value::Value;

/// One named spec evaluation.
#[derive(Clone, Debug, PartialEq)]
pub struct TraceEntry {
    /// Monotonic id, unique within one [`SpecEnv`](crate::SpecEnv).
    pub id: u64,
    pub spec: Arc<str>,
    pub passed: bool,
    pub value: Value,
}

impl fmt::Display for TraceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let outcome = if self.passed { "Passed" } else { "Failed" };
        write!(f, "{outcome} :{}, Found: {}", self.spec, self.value)
    }
}

/// Trace entries in evaluation order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConformTrace {
    entries: Vec<TraceEntry>,
}

impl ConformTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, entry: TraceEntry) {
        self.entries.push(entry);
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    pub fn get(&self, id: u64) -> Option<&TraceEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn failures(&self) -> impl Iterator<Item = &TraceEntry> + '_ {
        self.entries.iter().filter(|entry| !entry.passed)
    }

    /// Rendered entries, one per evaluation.
    pub fn lines(&self) -> Vec<String> {
        self.entries.iter().map(ToString::to_string).collect()
    }
}

impl fmt::Display for ConformTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{entry}")?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a ConformTrace {
    type Item = &'a TraceEntry;
    type IntoIter = std::slice::Iter<'a, TraceEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
