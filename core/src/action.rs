//! Action - The Immutable Intent Record
//!
//! An action carries a mandatory `kind` tag (the dispatch discriminant,
//! serialized as `type`) plus optional payload and meta values. Actions are
//! never mutated after construction; the builder methods consume and return.

use crate::tree::StateValue;
use serde::{Deserialize, Serialize};

/// An immutable description of an intent to change state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// The type tag update functions dispatch on.
    #[serde(rename = "type")]
    pub kind: String,
    /// Optional action data (`Null` when absent).
    #[serde(default, skip_serializing_if = "StateValue::is_null")]
    pub payload: StateValue,
    /// Optional metadata (`Null` when absent).
    #[serde(default, skip_serializing_if = "StateValue::is_null")]
    pub meta: StateValue,
}

impl Action {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            payload: StateValue::null(),
            meta: StateValue::null(),
        }
    }

    pub fn with_payload(mut self, payload: impl Into<StateValue>) -> Self {
        self.payload = payload.into();
        self
    }

    pub fn with_meta(mut self, meta: impl Into<StateValue>) -> Self {
        self.meta = meta.into();
        self
    }

    /// Does this action carry the given kind tag?
    pub fn is(&self, kind: &str) -> bool {
        self.kind == kind
    }
}
