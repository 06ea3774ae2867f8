//! Dendrite facade crate.
//!
//! Re-exports the core crate with a single entry point. `dendrite` stays a
//! library for structuring state updates, not a framework: the application
//! owns the state and the dispatch loop.

pub use dendrite_core as core;

pub use dendrite_core::{
    Action, Branch, ComposeError, Composer, PathError, StateValue, Trunk, Updater,
};

pub mod prelude {
    pub use dendrite_core::prelude::*;
}
