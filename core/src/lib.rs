//! Dendrite core - composable state-tree modules for unidirectional data
//! flow.
//!
//! Pure Rust: no HTTP, no IO, no async. An application holds one immutable
//! [`StateValue`] tree and moves it forward by dispatching [`Action`]s
//! through a single [`Trunk`] - the update function combined out of named
//! [`Branch`]es and plain update functions by a [`Composer`].
//!
//! ```rust
//! use dendrite_core::prelude::*;
//! use serde_json::json;
//!
//! let counter = Branch::at("COUNTER").unwrap();
//! let inc = counter.action("INC");
//! let counter = counter.with_update(move |state, action| {
//!     if action.is(&inc) {
//!         let x = state.as_ref().and_then(|s| s.get("x")).and_then(|v| v.as_int()).unwrap_or(0);
//!         Some(StateValue::from_pairs([("x", StateValue::from(x + 1))]))
//!     } else {
//!         state
//!     }
//! });
//!
//! let trunk = Composer::new().branch("counter", counter).combine().unwrap();
//! let state = StateValue::from(json!({"counter": {"x": 0}}));
//! let next = trunk.apply(Some(state), &Action::new("/COUNTER/INC")).unwrap();
//! assert_eq!(next.at(&["counter", "x"]).and_then(|v| v.as_int()), Some(1));
//! ```

pub mod action;
pub mod branch;
pub mod compose;
pub mod path;
pub mod telemetry;
pub mod tree;

pub use action::Action;
pub use branch::{Branch, Locator, UpdateFn, identity};
pub use compose::{ComposeError, Composer, Trunk, Updater};
pub use path::{PathError, camel_case, derive_locator, fix_prefix, state_path};
pub use telemetry::traced;
pub use tree::StateValue;

pub mod prelude {
    pub use crate::action::Action;
    pub use crate::branch::{Branch, Locator, UpdateFn, identity};
    pub use crate::compose::{ComposeError, Composer, Trunk, Updater};
    pub use crate::path::{PathError, camel_case, derive_locator, fix_prefix, state_path};
    pub use crate::telemetry::traced;
    pub use crate::tree::StateValue;
}
