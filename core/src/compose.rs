//! Composition - One Update Function Over the Whole Tree
//!
//! `Composer` collects named slots, each holding either a plain update
//! function or a [`Branch`], and combines them into a single [`Trunk`].
//! The trunk dispatches every action to every slot's update function and
//! tracks changes by identity: if nothing changed, the caller gets the
//! exact same tree back (referential stability); if anything changed, a
//! new tree is built and unchanged slices ride along by reference.
//!
//! A `Trunk` has the shape of an update function itself, so a combined
//! tree can be a slot inside a larger composition.

use crate::action::Action;
use crate::branch::{Branch, UpdateFn};
use crate::tree::StateValue;
use std::sync::Arc;
use thiserror::Error;
use tracing::{trace, trace_span};

#[derive(Error, Debug, PartialEq)]
pub enum ComposeError {
    #[error("composition slot name is empty")]
    EmptySlotName,
    #[error("composition slot \"{slot}\" is declared twice")]
    DuplicateSlot { slot: String },
}

/// One slot of a composition: a plain update function or a whole branch.
///
/// The distinction is carried in the type, so composition never probes the
/// shape of its inputs at run time.
#[derive(Clone)]
pub enum Updater {
    Fn(UpdateFn),
    Branch(Branch),
}

impl Updater {
    fn call(&self, state: Option<StateValue>, action: &Action) -> Option<StateValue> {
        match self {
            Updater::Fn(update) => update(state, action),
            Updater::Branch(branch) => branch.update(state, action),
        }
    }
}

impl From<Branch> for Updater {
    fn from(branch: Branch) -> Self {
        Updater::Branch(branch)
    }
}

impl From<UpdateFn> for Updater {
    fn from(update: UpdateFn) -> Self {
        Updater::Fn(update)
    }
}

impl From<Trunk> for Updater {
    fn from(trunk: Trunk) -> Self {
        Updater::Fn(Arc::new(move |state, action| trunk.apply(state, action)))
    }
}

/// Insertion-ordered builder for a [`Trunk`].
#[derive(Default)]
pub struct Composer {
    slots: Vec<(String, Updater)>,
}

impl Composer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount a branch under `name`.
    pub fn branch(self, name: impl Into<String>, branch: Branch) -> Self {
        self.slot(name, Updater::Branch(branch))
    }

    /// Mount a plain update function under `name`.
    pub fn update<F>(self, name: impl Into<String>, update: F) -> Self
    where
        F: Fn(Option<StateValue>, &Action) -> Option<StateValue> + Send + Sync + 'static,
    {
        self.slot(name, Updater::Fn(Arc::new(update)))
    }

    /// Mount any updater (including a nested [`Trunk`]) under `name`.
    pub fn slot(mut self, name: impl Into<String>, updater: impl Into<Updater>) -> Self {
        self.slots.push((name.into(), updater.into()));
        self
    }

    /// Combine the slots into one whole-tree update function.
    ///
    /// Fails fast, naming the offending slot, when a slot name is empty or
    /// declared twice.
    pub fn combine(self) -> Result<Trunk, ComposeError> {
        for (i, (name, _)) in self.slots.iter().enumerate() {
            if name.is_empty() {
                return Err(ComposeError::EmptySlotName);
            }
            if self.slots[..i].iter().any(|(prior, _)| prior == name) {
                return Err(ComposeError::DuplicateSlot { slot: name.clone() });
            }
        }
        Ok(Trunk {
            slots: self.slots.into(),
        })
    }
}

/// The combined whole-tree update function.
#[derive(Clone)]
pub struct Trunk {
    slots: Arc<[(String, Updater)]>,
}

impl std::fmt::Debug for Trunk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Trunk")
            .field(
                "slots",
                &self.slots.iter().map(|(name, _)| name).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Trunk {
    /// Dispatch one action against the whole tree.
    ///
    /// Every slot's update function is called with its previous slice (a
    /// missing key, or a non-map whole state, reads as `None`). If no slot
    /// changed - by identity, not deep equality - the input comes back
    /// untouched. Otherwise the result is a new map holding exactly the
    /// composed slots; unchanged slices are shared by reference, and slots
    /// whose update returned `None` are left out.
    pub fn apply(&self, state: Option<StateValue>, action: &Action) -> Option<StateValue> {
        let span = trace_span!("dispatch", dendrite.action = %action.kind);
        let _guard = span.enter();

        let mut changed = false;
        let mut next: Vec<(String, Option<StateValue>)> = Vec::with_capacity(self.slots.len());
        for (name, updater) in self.slots.iter() {
            let prev = state.as_ref().and_then(|whole| whole.get(name));
            let out = updater.call(prev.clone(), action);
            if !same_slice(&prev, &out) {
                trace!(dendrite.slot = %name, "slot changed");
                changed = true;
            }
            next.push((name.clone(), out));
        }
        if !changed {
            trace!("no slot changed, returning input tree");
            return state;
        }
        Some(StateValue::from_pairs(
            next.into_iter()
                .filter_map(|(name, slice)| slice.map(|slice| (name, slice))),
        ))
    }

    /// Number of composed slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// The slot names, in insertion order.
    pub fn slots(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().map(|(name, _)| name.as_str())
    }
}

fn same_slice(prev: &Option<StateValue>, next: &Option<StateValue>) -> bool {
    match (prev, next) {
        (None, None) => true,
        (Some(a), Some(b)) => StateValue::same(a, b),
        _ => false,
    }
}
