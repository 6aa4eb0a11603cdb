//! Recursively combine two [`PathDict`]s.

use std::fmt;

use log::trace;
use thiserror::Error;

use crate::{Key, Path, PathDict, Value};

/// A key is a mapping on one side of a merge and a leaf on the other.
#[derive(Debug, Clone, Error)]
#[error(
    "can't merge {left:?} with {right:?} at {path:?}, only one of them is a mapping"
)]
pub struct MergeError<K: fmt::Debug, V: fmt::Debug> {
    /// Path to the conflicting key, the key included.
    pub path: Path<K>,
    pub left: Value<K, V>,
    pub right: Value<K, V>,
}
impl<K: Key, V: fmt::Debug + PartialEq> PartialEq for MergeError<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path && self.left == other.left && self.right == other.right
    }
}

/// A new mapping: `left` with `right` recursively merged into it.
///
/// For each key of `right`:
/// - absent from `left`: it is added after the keys of `left`,
/// - a mapping on both sides: both mappings are merged,
/// - a leaf on both sides: the leaf of `right` replaces the one of `left`,
/// - otherwise, fails with a [`MergeError`].
///
/// Neither `left` nor `right` are modified.
///
/// ```rust
/// use pathdict::{merge, pathdict};
///
/// let left = pathdict! { "x" => 1, "y" => { "a" => 1 } };
/// let right = pathdict! { "y" => { "b" => 2 }, "z" => 3 };
///
/// let merged = merge(&left, &right).unwrap();
/// assert_eq!(merged, pathdict! { "x" => 1, "y" => { "a" => 1, "b" => 2 }, "z" => 3 });
/// ```
pub fn merge<K, V>(
    left: &PathDict<K, V>,
    right: &PathDict<K, V>,
) -> Result<PathDict<K, V>, MergeError<K, V>>
where
    K: Key,
    V: Clone + fmt::Debug,
{
    let mut merged = left.clone();
    fold(&mut merged, right, &mut Vec::new())?;
    Ok(merged)
}

/// Like [`merge`], but merge `right` directly into `left`.
///
/// `left` is left untouched if the merge fails.
pub fn inplace_merge<'a, K, V>(
    left: &'a mut PathDict<K, V>,
    right: &PathDict<K, V>,
) -> Result<&'a mut PathDict<K, V>, MergeError<K, V>>
where
    K: Key,
    V: Clone + fmt::Debug,
{
    check(left, right, &mut Vec::new())?;
    fold(left, right, &mut Vec::new())?;
    Ok(left)
}

fn conflict<K, V>(at: &[K], key: &K, left: &Value<K, V>, right: &Value<K, V>) -> MergeError<K, V>
where
    K: Key,
    V: Clone + fmt::Debug,
{
    let path = at.iter().chain([key]).cloned().collect();
    MergeError {
        path,
        left: left.clone(),
        right: right.clone(),
    }
}

/// Fail with the first conflict [`fold`] would run into.
fn check<K, V>(
    left: &PathDict<K, V>,
    right: &PathDict<K, V>,
    at: &mut Vec<K>,
) -> Result<(), MergeError<K, V>>
where
    K: Key,
    V: Clone + fmt::Debug,
{
    for (key, right_value) in right {
        match (left.get(key), right_value) {
            (Some(Value::Dict(left)), Value::Dict(right)) => {
                at.push(key.clone());
                check(left, right, at)?;
                at.pop();
            }
            (Some(Value::Leaf(_)), Value::Leaf(_)) | (None, _) => {}
            (Some(left_value), right_value) => {
                return Err(conflict(at, key, left_value, right_value));
            }
        }
    }
    Ok(())
}

/// Merge `right` into `left`, `at` is the path of `left` from the root.
fn fold<K, V>(
    left: &mut PathDict<K, V>,
    right: &PathDict<K, V>,
    at: &mut Vec<K>,
) -> Result<(), MergeError<K, V>>
where
    K: Key,
    V: Clone + fmt::Debug,
{
    for (key, right_value) in right {
        match (left.get_mut(key), right_value) {
            (Some(Value::Dict(left)), Value::Dict(right)) => {
                at.push(key.clone());
                trace!("merging mappings at {at:?}");
                fold(left, right, at)?;
                at.pop();
            }
            (Some(slot @ Value::Leaf(_)), Value::Leaf(_)) => *slot = right_value.clone(),
            (None, _) => {
                left.insert(key.clone(), right_value.clone());
            }
            (Some(left_value), right_value) => {
                return Err(conflict(at, key, left_value, right_value));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pathdict;
    use pretty_assertions::assert_eq;

    type Dict = PathDict<&'static str, i32>;

    #[test]
    fn merge_nested() {
        let left: Dict = pathdict! { "x" => 1, "y" => { "a" => 1 } };
        let right: Dict = pathdict! { "y" => { "b" => 2 }, "z" => 3 };
        let expected = pathdict! { "x" => 1, "y" => { "a" => 1, "b" => 2 }, "z" => 3 };
        assert_eq!(merge(&left, &right), Ok(expected));
    }
    #[test]
    fn right_wins_on_leaves() {
        let left: Dict = pathdict! { "x" => 1, "y" => { "a" => 1 } };
        let right: Dict = pathdict! { "y" => { "a" => 5 }, "x" => 2 };
        let merged = merge(&left, &right).unwrap();
        assert_eq!(merged, pathdict! { "x" => 2, "y" => { "a" => 5 } });
    }
    #[test]
    fn merge_keeps_left_order() {
        let left: Dict = pathdict! { "b" => 1, "a" => 2 };
        let right: Dict = pathdict! { "c" => 3, "a" => 4 };
        let merged = merge(&left, &right).unwrap();
        assert_eq!(merged.keys().copied().collect::<Vec<_>>(), ["b", "a", "c"]);
    }
    #[test]
    fn merge_with_empty() {
        let value: Dict = pathdict! { "x" => 1, "y" => { "a" => 1 } };
        assert_eq!(merge(&value, &Dict::new()).as_ref(), Ok(&value));
        assert_eq!(merge(&Dict::new(), &value).as_ref(), Ok(&value));
    }
    #[test]
    fn merge_is_associative() {
        let a: Dict = pathdict! { "x" => { "a" => 1 } };
        let b: Dict = pathdict! { "x" => { "b" => 2 }, "y" => 3 };
        let c: Dict = pathdict! { "x" => { "c" => 4 }, "z" => 5 };
        let left_first = merge(&merge(&a, &b).unwrap(), &c).unwrap();
        let right_first = merge(&a, &merge(&b, &c).unwrap()).unwrap();
        assert_eq!(left_first, right_first);
    }
    #[test]
    fn conflict_carries_both_values() {
        let left: Dict = pathdict! { "x" => 1 };
        let right: Dict = pathdict! { "x" => { "y" => 2 } };
        let expected = MergeError {
            path: Path::from(["x"]),
            left: Value::Leaf(1),
            right: Value::Dict(pathdict! { "y" => 2 }),
        };
        assert_eq!(merge(&left, &right), Err(expected));
        assert_eq!(left, pathdict! { "x" => 1 });
        assert_eq!(right, pathdict! { "x" => { "y" => 2 } });
    }
    #[test]
    fn nested_conflict_path() {
        let left: Dict = pathdict! { "a" => { "b" => { "c" => 1 } } };
        let right: Dict = pathdict! { "a" => { "b" => 2 } };
        let err = merge(&left, &right).unwrap_err();
        assert_eq!(err.path, Path::from(["a", "b"]));
        assert_eq!(err.right, Value::Leaf(2));
    }
    #[test]
    fn inplace_merge_mutates_left() {
        let mut left: Dict = pathdict! { "x" => 1, "y" => { "a" => 1 } };
        let right: Dict = pathdict! { "y" => { "b" => 2 }, "z" => 3 };
        inplace_merge(&mut left, &right).unwrap();
        let expected = pathdict! { "x" => 1, "y" => { "a" => 1, "b" => 2 }, "z" => 3 };
        assert_eq!(left, expected);
    }
    #[test]
    fn failed_inplace_merge_commits_nothing() {
        let mut left: Dict = pathdict! { "a" => 1, "b" => 2 };
        let right: Dict = pathdict! { "a" => 10, "new" => 3, "b" => { "c" => 4 } };
        let before = left.clone();
        assert!(inplace_merge(&mut left, &right).is_err());
        assert_eq!(left, before);
    }
    #[test]
    fn method_shorthands() {
        let mut left: Dict = pathdict! { "x" => 1 };
        let right: Dict = pathdict! { "y" => 2 };
        let merged = left.merge(&right).unwrap();
        left.merge_in_place(&right).unwrap();
        assert_eq!(merged, left);
    }
}
