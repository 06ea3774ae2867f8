/*!
# Counter Demo

A minimal unidirectional-data-flow loop built on Dendrite:

1. **One tree**: the whole application state is a single immutable value.
2. **Named slices**: a path-derived branch owns `counter`, a plain update
   function owns `log`.
3. **One entry point**: every action goes through the combined `Trunk`;
   when nothing matches, the exact same tree comes back.

Run with `RUST_LOG=trace` to watch the dispatch spans.
*/

use dendrite::prelude::*;
use serde_json::json;
use tracing::info;

fn counter_branch() -> Branch {
    let branch = Branch::at("COUNTER").expect("static path");
    let inc = branch.action("INC");
    let reset = branch.action("RESET");
    branch.with_update(move |state, action| {
        let value = state
            .as_ref()
            .and_then(|s| s.get("value"))
            .and_then(|v| v.as_int())
            .unwrap_or(0);
        match &action.kind {
            kind if *kind == inc => {
                let step = action.payload.as_int().unwrap_or(1);
                Some(StateValue::from_pairs([(
                    "value",
                    StateValue::from(value + step),
                )]))
            }
            kind if *kind == reset => {
                Some(StateValue::from_pairs([("value", StateValue::from(0))]))
            }
            _ => state,
        }
    })
}

// Plain update function: appends every counter action kind to a list.
fn log_update(state: Option<StateValue>, action: &Action) -> Option<StateValue> {
    if action.is("/LOG/CLEAR") {
        return Some(StateValue::list([]));
    }
    if !action.kind.starts_with("/COUNTER/") {
        return state;
    }
    let mut kinds: Vec<StateValue> = state.iter().flat_map(|s| s.items()).cloned().collect();
    kinds.push(StateValue::from(action.kind.as_str()));
    Some(StateValue::list(kinds))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let counter = counter_branch();
    let inc = counter.action("INC");
    let reset = counter.action("RESET");

    let trunk = Composer::new()
        .branch("counter", counter)
        .slot("log", traced("log", log_update))
        .combine()?;

    let mut state = Some(StateValue::from(json!({
        "counter": {"value": 0},
        "log": [],
    })));

    for action in [
        Action::new(inc.clone()).with_payload(1),
        Action::new(inc.clone()).with_payload(10),
        Action::new("UNRELATED"),
        Action::new(reset.clone()),
    ] {
        let before = state.clone();
        state = trunk.apply(state, &action);
        let unchanged = match (&before, &state) {
            (Some(a), Some(b)) => StateValue::same(a, b),
            (None, None) => true,
            _ => false,
        };
        info!(action = %action.kind, unchanged, "dispatched");
        if let Some(tree) = &state {
            println!("{} -> {tree}", action.kind);
        }
    }

    Ok(())
}
