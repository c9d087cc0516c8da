// Path: crates/pact-policy/src/context.rs
//! The runtime context a Policy-v4 condition tree is evaluated against: a
//! mapping from the closed [`Field`] set to a resolved [`ConditionValue`].

use pact_types::{ConditionValue, Field};
use std::collections::HashMap;

/// Negotiation/settlement state, resolved per spec.md §4.5's closed field
/// set. A field absent from the map resolves to "unknown" during
/// evaluation, which makes any `Comparison` referencing it fail (not error).
#[derive(Debug, Clone, Default)]
pub struct PolicyContext {
    values: HashMap<Field, ConditionValue>,
}

impl PolicyContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the resolved value for `field`, replacing any prior value.
    pub fn set(mut self, field: Field, value: ConditionValue) -> Self {
        self.values.insert(field, value);
        self
    }

    pub fn set_number(self, field: Field, value: f64) -> Self {
        self.set(field, ConditionValue::Number(value))
    }

    pub fn set_string(self, field: Field, value: impl Into<String>) -> Self {
        self.set(field, ConditionValue::String(value.into()))
    }

    /// Resolves `field` against this context, returning `None` when unset.
    pub fn get(&self, field: Field) -> Option<&ConditionValue> {
        self.values.get(&field)
    }
}
