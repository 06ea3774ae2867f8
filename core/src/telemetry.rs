//! Telemetry: observability decorators for update functions.
//!
//! Wrapping is opt-in and purely additive: the decorated function has the
//! same signature and the same semantics, plus trace events. The library
//! never installs a subscriber; that belongs to the application.

use crate::action::Action;
use crate::branch::UpdateFn;
use crate::tree::StateValue;
use std::sync::Arc;
use tracing::{debug, trace_span};

/// Wrap an update function with trace-level timing and change events.
///
/// The label lands on every event as `dendrite.update`, so a composition
/// of traced slots reads as a per-slot timeline under the dispatch span.
pub fn traced<F>(label: impl Into<String>, update: F) -> UpdateFn
where
    F: Fn(Option<StateValue>, &Action) -> Option<StateValue> + Send + Sync + 'static,
{
    let label = label.into();
    Arc::new(move |state, action| {
        let span = trace_span!("update", dendrite.update = %label, dendrite.action = %action.kind);
        let _guard = span.enter();
        let start = std::time::Instant::now();

        let prev = state.clone();
        let next = update(state, action);

        let changed = match (&prev, &next) {
            (None, None) => false,
            (Some(a), Some(b)) => !StateValue::same(a, b),
            _ => true,
        };
        debug!(changed, duration = ?start.elapsed(), "update completed");
        next
    })
}
