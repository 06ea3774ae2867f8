//! Slash-path algorithms: prefix normalization and slice addressing.
//!
//! A branch can be addressed by a single slash-delimited path such as
//! `"MODULE_A/SUBMODULE_B"`. The functions here derive everything else from
//! it: the normalized action prefix (`/MODULE_A/SUBMODULE_B/`) and the
//! camel-cased lookup path into the state tree (`moduleA.submoduleB`).
//!
//! Normalization and camel-casing are deliberately independent, each pure
//! and testable in isolation.

use crate::branch::Locator;
use crate::tree::StateValue;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum PathError {
    #[error("invalid module path: empty")]
    Empty,
}

/// Normalize an action prefix: must be non-empty, and the result always
/// starts and ends with `/`. Idempotent; inner separators are untouched.
pub fn fix_prefix(path: &str) -> Result<String, PathError> {
    if path.is_empty() {
        return Err(PathError::Empty);
    }
    let mut result = path.to_string();
    if !result.ends_with('/') {
        result.push('/');
    }
    if !result.starts_with('/') {
        result.insert(0, '/');
    }
    Ok(result)
}

/// Convert one path segment to a camelCase identifier.
///
/// Words split on non-alphanumeric characters, lower-to-upper transitions,
/// letter/digit transitions, and acronym tails: `MODULE_A` -> `moduleA`,
/// `foo-bar` -> `fooBar`, `XMLHttpRequest` -> `xmlHttpRequest`.
pub fn camel_case(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    let mut first_word = true;
    for word in split_words(segment) {
        let mut chars = word.chars();
        let Some(head) = chars.next() else { continue };
        if first_word {
            out.push(head.to_ascii_lowercase());
            first_word = false;
        } else {
            out.push(head.to_ascii_uppercase());
        }
        for c in chars {
            out.push(c.to_ascii_lowercase());
        }
    }
    out
}

fn split_words(input: &str) -> Vec<String> {
    let chars: Vec<char> = input.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();
    for (i, &c) in chars.iter().enumerate() {
        if !c.is_ascii_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        if !current.is_empty() {
            // current is non-empty, so chars[i - 1] is the alphanumeric
            // character it ends with.
            let prev = chars[i - 1];
            let acronym_tail = prev.is_ascii_uppercase()
                && c.is_ascii_uppercase()
                && chars.get(i + 1).is_some_and(|n| n.is_ascii_lowercase());
            let boundary = (prev.is_ascii_lowercase() && c.is_ascii_uppercase())
                || (prev.is_ascii_alphabetic() && c.is_ascii_digit())
                || (prev.is_ascii_digit() && c.is_ascii_alphabetic())
                || acronym_tail;
            if boundary {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// The lookup path a slash path addresses: normalize, strip the outer
/// separators, split on `/`, camel-case each segment.
pub fn state_path(path: &str) -> Result<Vec<String>, PathError> {
    let normalized = fix_prefix(path)?;
    // "/" normalizes to itself; there is nothing between the separators
    let inner = if normalized.len() <= 1 {
        ""
    } else {
        &normalized[1..normalized.len() - 1]
    };
    if inner.is_empty() {
        return Ok(Vec::new());
    }
    Ok(inner.split('/').map(camel_case).collect())
}

/// Derive a slice locator from a slash path: a safe nested lookup along
/// `state_path(path)`. Missing intermediate keys yield `None`.
///
/// The degenerate path `"/"` addresses nothing, so its locator always
/// returns `None`.
pub fn derive_locator(path: &str) -> Result<Locator, PathError> {
    let segments = state_path(path)?;
    Ok(Arc::new(move |whole: &StateValue| {
        if segments.is_empty() {
            return None;
        }
        whole.at(&segments)
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fix_prefix_examples() {
        assert_eq!(fix_prefix("A/B").unwrap(), "/A/B/");
        assert_eq!(fix_prefix("/A/B").unwrap(), "/A/B/");
        assert_eq!(fix_prefix("A/B/").unwrap(), "/A/B/");
        assert_eq!(fix_prefix("/A/B/").unwrap(), "/A/B/");
    }

    #[test]
    fn test_fix_prefix_idempotent() {
        for input in ["A", "A/B", "/A/B/", "MODULE_A/SUBMODULE_B"] {
            let once = fix_prefix(input).unwrap();
            let twice = fix_prefix(&once).unwrap();
            assert_eq!(once, twice);
            assert!(once.starts_with('/') && once.ends_with('/'));
        }
    }

    #[test]
    fn test_fix_prefix_empty_is_error() {
        assert_eq!(fix_prefix(""), Err(PathError::Empty));
    }

    #[test]
    fn test_camel_case() {
        assert_eq!(camel_case("MODULE_A"), "moduleA");
        assert_eq!(camel_case("foo-bar"), "fooBar");
        assert_eq!(camel_case("fooBar"), "fooBar");
        assert_eq!(camel_case("Foo Bar"), "fooBar");
        assert_eq!(camel_case("XMLHttpRequest"), "xmlHttpRequest");
        assert_eq!(camel_case("v2Engine"), "v2Engine");
        assert_eq!(camel_case(""), "");
    }

    #[test]
    fn test_state_path() {
        assert_eq!(
            state_path("PARENT_MODULE/TEST_MODULE").unwrap(),
            vec!["parentModule", "testModule"]
        );
        assert_eq!(state_path("/A/").unwrap(), vec!["a"]);
        assert_eq!(state_path("/").unwrap(), Vec::<String>::new());
    }

    #[test]
    fn test_derived_locator() {
        let locator = derive_locator("PARENT_MODULE/TEST_MODULE").unwrap();
        let whole = StateValue::from(json!({"parentModule": {"testModule": {"x": 5}}}));
        let slice = locator(&whole).unwrap();
        assert_eq!(slice, StateValue::from(json!({"x": 5})));
        assert_eq!(locator(&StateValue::from(json!({"other": 1}))), None);
    }

    #[test]
    fn test_root_path_locator_is_none() {
        let locator = derive_locator("/").unwrap();
        assert_eq!(locator(&StateValue::from(json!({"a": 1}))), None);
    }
}
