use criterion::{Criterion, black_box, criterion_group, criterion_main};
use dendrite_core::prelude::*;
use serde_json::json;

fn build_trunk() -> Trunk {
    let mut composer = Composer::new();
    for i in 0..8 {
        let kind = format!("/SLOT_{i}/BUMP");
        composer = composer.update(format!("slot{i}"), move |state, action| {
            if action.is(&kind) {
                let x = state
                    .as_ref()
                    .and_then(|s| s.get("x"))
                    .and_then(|v| v.as_int())
                    .unwrap_or(0);
                Some(StateValue::from_pairs([("x", StateValue::from(x + 1))]))
            } else {
                state
            }
        });
    }
    composer.combine().unwrap()
}

fn build_state() -> StateValue {
    let mut tree = json!({});
    for i in 0..8 {
        tree[format!("slot{i}")] = json!({"x": 0});
    }
    StateValue::from(tree)
}

fn bench_dispatch(c: &mut Criterion) {
    let trunk = build_trunk();
    let state = build_state();

    c.bench_function("dispatch_noop", |b| {
        let action = Action::new("UNKNOWN");
        b.iter(|| black_box(trunk.apply(Some(state.clone()), black_box(&action))))
    });

    c.bench_function("dispatch_one_slot_changed", |b| {
        let action = Action::new("/SLOT_3/BUMP");
        b.iter(|| black_box(trunk.apply(Some(state.clone()), black_box(&action))))
    });
}

criterion_group!(benches, bench_dispatch);
criterion_main!(benches);
