//! Key paths and the errors of walking them.

use std::{any, fmt, hash::Hash, ops::Deref};

use thiserror::Error;

use crate::ChainError;

/// What a [`PathDict`](crate::PathDict) can be keyed by.
pub trait Key: Hash + Eq + Clone + fmt::Debug {}
impl<T: Hash + Eq + Clone + fmt::Debug> Key for T {}

/// An immutable sequence of keys, one per nesting level.
///
/// The empty path is the root mapping.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Path<K>(Box<[K]>);

impl<K> Path<K> {
    pub fn root() -> Self {
        Path(Box::new([]))
    }
}
impl<K> Default for Path<K> {
    fn default() -> Self {
        Path::root()
    }
}
impl<K> Deref for Path<K> {
    type Target = [K];

    fn deref(&self) -> &[K] {
        &self.0
    }
}
impl<K: fmt::Debug> fmt::Debug for Path<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}
impl<K> From<Vec<K>> for Path<K> {
    fn from(keys: Vec<K>) -> Self {
        Path(keys.into_boxed_slice())
    }
}
impl<K, const N: usize> From<[K; N]> for Path<K> {
    fn from(keys: [K; N]) -> Self {
        Path(Box::new(keys))
    }
}
impl<K: Clone> From<&[K]> for Path<K> {
    fn from(keys: &[K]) -> Self {
        Path(keys.into())
    }
}
impl<K> FromIterator<K> for Path<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        Path(iter.into_iter().collect())
    }
}

/// Error of a [`PathDict`](crate::PathDict) operation.
///
/// `path` is how far the traversal went before it broke, `full_path`
/// is the path the operation was called with.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error<K> {
    #[error("path is empty")]
    EmptyPath,

    #[error(
        "key {key:?} not found in mapping at {path:?} (full path: {full_path:?})"
    )]
    KeyNotFound {
        key: K,
        path: Path<K>,
        full_path: Path<K>,
    },

    #[error(
        "expected mapping at {key:?} in {path:?}, got {found} instead (full path: {full_path:?})"
    )]
    NotAMapping {
        key: K,
        /// Type name of the leaf found at `key`.
        found: &'static str,
        path: Path<K>,
        full_path: Path<K>,
    },

    #[error("no attribute `{0}`")]
    NoAttribute(Box<str>),

    #[error(transparent)]
    Chain(#[from] ChainError),
}

/// Where a traversal stopped, relative to the path it was walking.
///
/// Converted to an [`Error`] with [`Broken::within`] by the operation that
/// knows the full requested path.
#[derive(Debug)]
pub(crate) struct Broken<K> {
    depth: usize,
    key: K,
    mismatch: Option<&'static str>,
}
impl<K: Key> Broken<K> {
    pub(crate) fn missing(depth: usize, key: &K) -> Self {
        Broken {
            depth,
            key: key.clone(),
            mismatch: None,
        }
    }
    pub(crate) fn not_a_mapping<V>(depth: usize, key: &K) -> Self {
        let found = any::type_name::<V>();
        Broken {
            depth,
            key: key.clone(),
            mismatch: Some(found),
        }
    }
    pub(crate) const fn is_missing(&self) -> bool {
        self.mismatch.is_none()
    }
    /// `full_path` must start with the path that was walked.
    pub(crate) fn within(self, full_path: &[K]) -> Error<K> {
        let Broken {
            depth,
            key,
            mismatch,
        } = self;
        let path = Path::from(&full_path[..depth]);
        let full_path = Path::from(full_path);
        match mismatch {
            None => Error::KeyNotFound {
                key,
                path,
                full_path,
            },
            Some(found) => Error::NotAMapping {
                key,
                found,
                path,
                full_path,
            },
        }
    }
}

/// Split `path` into its branch and final key.
pub(crate) fn split<K>(path: &[K]) -> Result<(&[K], &K), Error<K>> {
    match path.split_last() {
        Some((last, branch)) => Ok((branch, last)),
        None => Err(Error::EmptyPath),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn broken_keeps_partial_and_full_path() {
        let full = ["root", "branch", "leaf"];
        let error = Broken::missing(1, &"branch").within(&full);
        let expected = Error::KeyNotFound {
            key: "branch",
            path: Path::from(["root"]),
            full_path: Path::from(full),
        };
        assert_eq!(error, expected);

        let error = Broken::not_a_mapping::<i32>(0, &"root").within(&full);
        let expected = Error::NotAMapping {
            key: "root",
            found: "i32",
            path: Path::root(),
            full_path: Path::from(full),
        };
        assert_eq!(error, expected);
    }
    #[test]
    fn split_rejects_empty() {
        assert_eq!(split::<&str>(&[]), Err(Error::EmptyPath));
        assert_eq!(split(&["a", "b"]), Ok((&["a"][..], &"b")));
    }
    #[test]
    fn debug_is_a_list() {
        assert_eq!(format!("{:?}", Path::from(["a", "b"])), r#"["a", "b"]"#);
    }
}
