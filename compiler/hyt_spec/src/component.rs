//! Component binding for model-like objects.

use std::sync::Arc;

use crate::error::{SpecError, SpecResult};
use crate::value::Value;

/// A declared component, optionally with a default.
#[derive(Clone, Debug, PartialEq)]
pub struct ComponentSpec {
    pub name: Arc<str>,
    pub default: Option<Value>,
}

impl ComponentSpec {
    pub fn required(name: &str) -> Self {
        ComponentSpec {
            name: Arc::from(name),
            default: None,
        }
    }

    pub fn with_default(name: &str, default: Value) -> Self {
        ComponentSpec {
            name: Arc::from(name),
            default: Some(default),
        }
    }
}

/// Bind declared components to supplied values, in declaration order.
///
/// A supplied value wins over the default. Supplied names that were not
/// declared are ignored.
pub fn bind_components(
    components: &[ComponentSpec],
    supplied: &[(&str, Value)],
) -> SpecResult<Vec<(Arc<str>, Value)>> {
    components
        .iter()
        .map(|component| {
            let value = supplied
                .iter()
                .find(|(name, _)| **name == *component.name)
                .map(|(_, value)| value)
                .or(component.default.as_ref())
                .ok_or_else(|| SpecError::MissingComponent {
                    name: component.name.clone(),
                })?;
            Ok((component.name.clone(), value.clone()))
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
