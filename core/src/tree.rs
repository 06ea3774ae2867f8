//! StateValue - The Immutable State Tree
//!
//! The whole application state and every branch slice are `StateValue`s:
//! Arc-shared, recursively nested, never mutated in place. Cloning is an
//! Arc bump, so an update function either hands back the value it received
//! (a no-op, detected by identity) or builds a new value whose unchanged
//! children are shared by reference.

use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// An immutable, JSON-shaped state tree value.
///
/// `Clone` is O(1). Two clones of the same value are `same` (identity);
/// `PartialEq` is structural and independent of identity.
#[derive(Clone)]
pub struct StateValue(Arc<Node>);

#[derive(Debug, PartialEq)]
enum Node {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<StateValue>),
    Map(BTreeMap<String, StateValue>),
}

impl StateValue {
    /// The null value (the encoding of an absent payload/meta).
    pub fn null() -> Self {
        StateValue(Arc::new(Node::Null))
    }

    /// Build a list value.
    pub fn list(items: impl IntoIterator<Item = StateValue>) -> Self {
        StateValue(Arc::new(Node::List(items.into_iter().collect())))
    }

    /// Build a map value from key/value pairs.
    pub fn from_pairs<K, I>(pairs: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, StateValue)>,
    {
        StateValue(Arc::new(Node::Map(
            pairs.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        )))
    }

    /// Identity comparison: do `a` and `b` point at the same allocation?
    ///
    /// This is the no-op detector used by composition. It is deliberately
    /// not `PartialEq` - two structurally equal trees built separately are
    /// `==` but not `same`.
    pub fn same(a: &StateValue, b: &StateValue) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }

    pub fn is_null(&self) -> bool {
        matches!(self.0.as_ref(), Node::Null)
    }

    pub fn is_map(&self) -> bool {
        matches!(self.0.as_ref(), Node::Map(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.0.as_ref() {
            Node::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self.0.as_ref() {
            Node::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self.0.as_ref() {
            Node::Float(f) => Some(*f),
            Node::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self.0.as_ref() {
            Node::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Look up a direct child by key.
    ///
    /// Returns `None` for a missing key and for any non-map value, never
    /// an error. The returned child shares the tree (Arc bump).
    pub fn get(&self, key: &str) -> Option<StateValue> {
        match self.0.as_ref() {
            Node::Map(map) => map.get(key).cloned(),
            _ => None,
        }
    }

    /// Safe nested lookup along a segment path.
    ///
    /// Missing intermediate keys yield `None`; nothing panics.
    pub fn at<S: AsRef<str>>(&self, path: &[S]) -> Option<StateValue> {
        let mut current = self.clone();
        for segment in path {
            current = current.get(segment.as_ref())?;
        }
        Some(current)
    }

    /// A new map with `key` set to `value`; every other entry is shared
    /// by reference. A non-map receiver yields a single-entry map.
    pub fn with(&self, key: impl Into<String>, value: StateValue) -> StateValue {
        let mut map = match self.0.as_ref() {
            Node::Map(map) => map.clone(),
            _ => BTreeMap::new(),
        };
        map.insert(key.into(), value);
        StateValue(Arc::new(Node::Map(map)))
    }

    /// Iterate the items of a list value (empty for non-lists).
    pub fn items(&self) -> impl Iterator<Item = &StateValue> {
        let list = match self.0.as_ref() {
            Node::List(items) => Some(items),
            _ => None,
        };
        list.into_iter().flatten()
    }

    /// Iterate the entries of a map value (empty for non-maps).
    pub fn entries(&self) -> impl Iterator<Item = (&str, &StateValue)> {
        let map = match self.0.as_ref() {
            Node::Map(map) => Some(map),
            _ => None,
        };
        map.into_iter().flatten().map(|(k, v)| (k.as_str(), v))
    }

    /// Convert to a `serde_json::Value` (deep copy).
    pub fn to_json(&self) -> serde_json::Value {
        match self.0.as_ref() {
            Node::Null => serde_json::Value::Null,
            Node::Bool(b) => serde_json::Value::Bool(*b),
            Node::Int(i) => serde_json::Value::from(*i),
            Node::Float(f) => serde_json::Value::from(*f),
            Node::Str(s) => serde_json::Value::String(s.clone()),
            Node::List(items) => {
                serde_json::Value::Array(items.iter().map(StateValue::to_json).collect())
            }
            Node::Map(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

impl Default for StateValue {
    fn default() -> Self {
        StateValue::null()
    }
}

impl PartialEq for StateValue {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0 == other.0
    }
}

impl fmt::Debug for StateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Display for StateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

impl From<bool> for StateValue {
    fn from(v: bool) -> Self {
        StateValue(Arc::new(Node::Bool(v)))
    }
}

impl From<i64> for StateValue {
    fn from(v: i64) -> Self {
        StateValue(Arc::new(Node::Int(v)))
    }
}

impl From<i32> for StateValue {
    fn from(v: i32) -> Self {
        StateValue(Arc::new(Node::Int(v as i64)))
    }
}

impl From<f64> for StateValue {
    fn from(v: f64) -> Self {
        StateValue(Arc::new(Node::Float(v)))
    }
}

impl From<&str> for StateValue {
    fn from(v: &str) -> Self {
        StateValue(Arc::new(Node::Str(v.to_string())))
    }
}

impl From<String> for StateValue {
    fn from(v: String) -> Self {
        StateValue(Arc::new(Node::Str(v)))
    }
}

impl From<serde_json::Value> for StateValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => StateValue::null(),
            serde_json::Value::Bool(b) => b.into(),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => i.into(),
                None => n.as_f64().unwrap_or(0.0).into(),
            },
            serde_json::Value::String(s) => s.into(),
            serde_json::Value::Array(items) => {
                StateValue::list(items.into_iter().map(StateValue::from))
            }
            serde_json::Value::Object(map) => {
                StateValue::from_pairs(map.into_iter().map(|(k, v)| (k, StateValue::from(v))))
            }
        }
    }
}

impl Serialize for StateValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0.as_ref() {
            Node::Null => serializer.serialize_unit(),
            Node::Bool(b) => serializer.serialize_bool(*b),
            Node::Int(i) => serializer.serialize_i64(*i),
            Node::Float(f) => serializer.serialize_f64(*f),
            Node::Str(s) => serializer.serialize_str(s),
            Node::List(items) => serializer.collect_seq(items),
            Node::Map(map) => serializer.collect_map(map),
        }
    }
}

impl<'de> Deserialize<'de> for StateValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(StateValue::from(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_clone_is_same_identity() {
        let tree = StateValue::from_pairs([("x", StateValue::from(1))]);
        let copy = tree.clone();
        assert!(StateValue::same(&tree, &copy));
    }

    #[test]
    fn test_equal_but_not_same() {
        let a = StateValue::from_pairs([("x", StateValue::from(1))]);
        let b = StateValue::from_pairs([("x", StateValue::from(1))]);
        assert_eq!(a, b);
        assert!(!StateValue::same(&a, &b));
    }

    #[test]
    fn test_safe_nested_lookup() {
        let tree = StateValue::from(json!({"a": {"b": {"c": 5}}}));
        assert_eq!(tree.at(&["a", "b", "c"]).and_then(|v| v.as_int()), Some(5));
        assert_eq!(tree.at(&["a", "missing", "c"]), None);
        assert_eq!(StateValue::from(3).at(&["a"]), None);
    }

    #[test]
    fn test_get_on_non_map_is_none() {
        assert_eq!(StateValue::from("text").get("key"), None);
        assert_eq!(StateValue::null().get("key"), None);
    }

    #[test]
    fn test_with_shares_untouched_children() {
        let child = StateValue::from_pairs([("y", StateValue::from(0))]);
        let tree = StateValue::from_pairs([
            ("a", StateValue::from(1)),
            ("b", child.clone()),
        ]);
        let next = tree.with("a", StateValue::from(2));
        assert!(!StateValue::same(&tree, &next));
        assert!(StateValue::same(&next.get("b").unwrap(), &child));
        assert_eq!(next.get("a").and_then(|v| v.as_int()), Some(2));
    }

    #[test]
    fn test_serde_shape() {
        let tree = StateValue::from(json!({"n": 1, "s": "hi", "l": [true, null]}));
        let text = serde_json::to_string(&tree).unwrap();
        let back: StateValue = serde_json::from_str(&text).unwrap();
        assert_eq!(back, tree);
        assert_eq!(tree.to_json(), json!({"n": 1, "s": "hi", "l": [true, null]}));
    }
}
