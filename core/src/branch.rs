//! Branch - One Named Slice of the State Tree
//!
//! A branch owns a slice of the whole state tree: a normalized action
//! prefix, an optional locator that finds its slice, and the update
//! function that moves the slice forward. All three are plain values
//! captured at construction - no subclassing, no method binding. A branch
//! holds no mutable state and is safe to share across threads.

use crate::action::Action;
use crate::path::{PathError, derive_locator, fix_prefix};
use crate::tree::StateValue;
use std::sync::Arc;

/// Finds a branch's slice inside the whole state tree.
pub type Locator = Arc<dyn Fn(&StateValue) -> Option<StateValue> + Send + Sync>;

/// A pure state transition: `(current slice, action) -> next slice`.
///
/// `None` is the absent slice (a missing key in the whole tree); update
/// functions supply their own default when they see it.
pub type UpdateFn = Arc<dyn Fn(Option<StateValue>, &Action) -> Option<StateValue> + Send + Sync>;

/// The stock update function: returns the input unchanged for any action.
///
/// Every branch starts with this, and custom update functions fall back to
/// the same behavior (`_ => state`) for unrecognized action kinds, so
/// unknown actions are always a no-op.
pub fn identity() -> UpdateFn {
    Arc::new(|state, _action| state)
}

#[derive(Clone)]
pub struct Branch {
    prefix: String,
    locator: Option<Locator>,
    update: UpdateFn,
}

impl Branch {
    /// A branch with an explicit prefix and no locator.
    ///
    /// The prefix is normalized through [`fix_prefix`]; an empty prefix is
    /// rejected. Supply a locator with [`Branch::with_locator`] if the
    /// branch is read through [`Branch::slice`].
    pub fn new(prefix: &str) -> Result<Self, PathError> {
        Ok(Self {
            prefix: fix_prefix(prefix)?,
            locator: None,
            update: identity(),
        })
    }

    /// A path-derived branch: both the prefix and the locator come from one
    /// slash path, e.g. `Branch::at("MODULE_A/SUBMODULE_B")` reads its
    /// slice at `whole.moduleA.submoduleB` and prefixes its actions with
    /// `/MODULE_A/SUBMODULE_B/`.
    pub fn at(path: &str) -> Result<Self, PathError> {
        Ok(Self {
            prefix: fix_prefix(path)?,
            locator: Some(derive_locator(path)?),
            update: identity(),
        })
    }

    /// Replace the locator with an explicit one (used verbatim).
    pub fn with_locator<F>(mut self, locator: F) -> Self
    where
        F: Fn(&StateValue) -> Option<StateValue> + Send + Sync + 'static,
    {
        self.locator = Some(Arc::new(locator));
        self
    }

    /// Supply the transition logic. Match on the action kind and return the
    /// input unchanged for anything unrecognized.
    pub fn with_update<F>(mut self, update: F) -> Self
    where
        F: Fn(Option<StateValue>, &Action) -> Option<StateValue> + Send + Sync + 'static,
    {
        self.update = Arc::new(update);
        self
    }

    /// The normalized action prefix (always `/.../`).
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Locate this branch's slice in the whole tree. `None` when no locator
    /// was supplied or any path step is missing.
    pub fn slice(&self, whole: &StateValue) -> Option<StateValue> {
        self.locator.as_ref().and_then(|locate| locate(whole))
    }

    /// Apply this branch's update function.
    pub fn update(&self, state: Option<StateValue>, action: &Action) -> Option<StateValue> {
        (self.update)(state, action)
    }

    /// Fully qualified action kind: `prefix + name`, stripping one leading
    /// `/` from `name` so separators never double up.
    pub fn action(&self, name: &str) -> String {
        let name = name.strip_prefix('/').unwrap_or(name);
        format!("{}{}", self.prefix, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_normalizes_prefix() {
        let branch = Branch::new("A/B").unwrap();
        assert_eq!(branch.prefix(), "/A/B/");
    }

    #[test]
    fn test_empty_prefix_rejected() {
        assert!(matches!(Branch::new(""), Err(PathError::Empty)));
        assert!(matches!(Branch::at(""), Err(PathError::Empty)));
    }

    #[test]
    fn test_action_naming() {
        let branch = Branch::new("/PARENT_MODULE/TEST_MODULE/").unwrap();
        assert_eq!(branch.action("INC"), "/PARENT_MODULE/TEST_MODULE/INC");
        assert_eq!(branch.action("/INC"), "/PARENT_MODULE/TEST_MODULE/INC");
    }

    #[test]
    fn test_default_update_is_identity() {
        let branch = Branch::new("/X/").unwrap();
        let state = StateValue::from(json!({"x": 1}));
        let next = branch
            .update(Some(state.clone()), &Action::new("ANYTHING"))
            .unwrap();
        assert!(StateValue::same(&state, &next));
        assert_eq!(branch.update(None, &Action::new("ANYTHING")), None);
    }

    #[test]
    fn test_slice_without_locator_is_none() {
        let branch = Branch::new("/X/").unwrap();
        assert_eq!(branch.slice(&StateValue::from(json!({"x": 1}))), None);
    }

    #[test]
    fn test_path_derived_slice() {
        let branch = Branch::at("PARENT_MODULE/TEST_MODULE").unwrap();
        assert_eq!(branch.prefix(), "/PARENT_MODULE/TEST_MODULE/");
        let whole = StateValue::from(json!({"parentModule": {"testModule": {"x": 5}}}));
        assert_eq!(branch.slice(&whole), Some(StateValue::from(json!({"x": 5}))));
    }

    #[test]
    fn test_explicit_locator_overrides_derived() {
        let branch = Branch::at("A/B")
            .unwrap()
            .with_locator(|whole| whole.get("elsewhere"));
        let whole = StateValue::from(json!({"a": {"b": 1}, "elsewhere": 2}));
        assert_eq!(branch.slice(&whole).and_then(|v| v.as_int()), Some(2));
    }

    #[test]
    fn test_unknown_action_falls_through() {
        let branch = Branch::new("/COUNTER/").unwrap().with_update(|state, action| {
            match action.kind.as_str() {
                "/COUNTER/RESET" => Some(StateValue::from(0)),
                _ => state,
            }
        });
        let state = StateValue::from(7);
        let next = branch
            .update(Some(state.clone()), &Action::new("UNRELATED"))
            .unwrap();
        assert!(StateValue::same(&state, &next));
    }
}
