//! A nested mapping addressable by key paths.

mod access;

pub use access::{GetIn, HasIn, PopIn, SetDefaultIn, SetIn};

use std::{borrow::Borrow, fmt, hash::Hash};

use indexmap::{map, Equivalent, IndexMap};
use log::trace;

use crate::merge::{inplace_merge, merge, MergeError};
use crate::path::{split, Broken};
use crate::{Error, Key, Value};

/// A mapping whose nested mappings are `PathDict`s as well.
///
/// Use the single-key methods ([`PathDict::get`], [`PathDict::insert`],
/// [`PathDict::pop`]…) to act on the top level, and the `*_path` methods to
/// reach into nested mappings. The `*_in` accessors ([`PathDict::get_in`]…)
/// build the path one key at a time.
///
/// Any mapping inserted in a `PathDict` is converted into a `PathDict`, key
/// by key. Keys keep their insertion order.
///
/// ```rust
/// use pathdict::{pathdict, Value};
///
/// let mut config = pathdict! { "name" => 1 };
/// config.set_path(&["server", "port"], Value::Leaf(8080)).unwrap();
///
/// assert_eq!(config.get_path(&["server", "port"]), Ok(Some(&Value::Leaf(8080))));
/// assert_eq!(config, pathdict! { "name" => 1, "server" => { "port" => 8080 } });
/// ```
#[derive(Clone)]
pub struct PathDict<K, V> {
    entries: IndexMap<K, Value<K, V>>,
}
impl<K, V> Default for PathDict<K, V> {
    fn default() -> Self {
        PathDict {
            entries: IndexMap::default(),
        }
    }
}
impl<K: Key, V: PartialEq> PartialEq for PathDict<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}
impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for PathDict<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PathDict(")?;
        f.debug_map().entries(self.entries.iter()).finish()?;
        f.write_str(")")
    }
}

impl<K: Key, V> PathDict<K, V> {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
    pub fn iter(&self) -> map::Iter<'_, K, Value<K, V>> {
        self.entries.iter()
    }
    pub fn keys(&self) -> map::Keys<'_, K, Value<K, V>> {
        self.entries.keys()
    }
    pub fn values(&self) -> map::Values<'_, K, Value<K, V>> {
        self.entries.values()
    }
    pub fn values_mut(&mut self) -> map::ValuesMut<'_, K, Value<K, V>> {
        self.entries.values_mut()
    }
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    // Single-key operations

    pub fn get<Q: ?Sized + Hash + Equivalent<K>>(&self, key: &Q) -> Option<&Value<K, V>> {
        self.entries.get(key)
    }
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut Value<K, V>>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.entries.get_mut(key)
    }
    pub fn has<Q: ?Sized + Hash + Equivalent<K>>(&self, key: &Q) -> bool {
        self.entries.contains_key(key)
    }
    /// Set `key` to `value`, returning the value it replaces.
    ///
    /// Mappings are converted into `PathDict`.
    pub fn insert(&mut self, key: K, value: impl Into<Value<K, V>>) -> Option<Value<K, V>> {
        self.entries.insert(key, value.into())
    }
    /// The value at `key`, after setting it to `value` if it was absent.
    pub fn setdefault(&mut self, key: K, value: impl Into<Value<K, V>>) -> &mut Value<K, V> {
        self.entries.entry(key).or_insert_with(|| value.into())
    }
    /// Remove `key`, keeping the order of the remaining keys.
    pub fn pop<Q: ?Sized + Hash + Equivalent<K>>(&mut self, key: &Q) -> Option<Value<K, V>> {
        self.entries.shift_remove(key)
    }

    // Attribute-style access

    /// The value of key `name`.
    pub fn attr(&self, name: &str) -> Result<&Value<K, V>, Error<K>>
    where
        K: Borrow<str>,
    {
        self.get(name).ok_or_else(|| Error::NoAttribute(name.into()))
    }
    pub fn set_attr(&mut self, name: &str, value: impl Into<Value<K, V>>) -> Option<Value<K, V>>
    where
        K: for<'a> From<&'a str>,
    {
        self.insert(K::from(name), value)
    }

    // Traversal

    /// The mapping at `branch`, the root if `branch` is empty.
    fn branch(&self, branch: &[K]) -> Result<&Self, Broken<K>> {
        let mut mapping = self;
        for (depth, key) in branch.iter().enumerate() {
            mapping = match mapping.entries.get(key) {
                Some(Value::Dict(dict)) => dict,
                Some(Value::Leaf(_)) => return Err(Broken::not_a_mapping::<V>(depth, key)),
                None => return Err(Broken::missing(depth, key)),
            };
        }
        Ok(mapping)
    }
    fn branch_mut(&mut self, branch: &[K]) -> Result<&mut Self, Broken<K>> {
        let mut mapping = self;
        for (depth, key) in branch.iter().enumerate() {
            mapping = match mapping.entries.get_mut(key) {
                Some(Value::Dict(dict)) => dict,
                Some(Value::Leaf(_)) => return Err(Broken::not_a_mapping::<V>(depth, key)),
                None => return Err(Broken::missing(depth, key)),
            };
        }
        Ok(mapping)
    }
    /// Like [`Self::branch_mut`], but missing mappings are created.
    ///
    /// Once a mapping is created, all following ones are new and empty, so
    /// this never fails after modifying `self`.
    fn branch_or_insert(&mut self, branch: &[K]) -> Result<&mut Self, Broken<K>> {
        let mut mapping = self;
        for (depth, key) in branch.iter().enumerate() {
            let value = mapping.entries.entry(key.clone()).or_insert_with(|| {
                trace!("creating mapping at {:?}", &branch[..=depth]);
                Value::Dict(PathDict::new())
            });
            mapping = match value {
                Value::Dict(dict) => dict,
                Value::Leaf(_) => return Err(Broken::not_a_mapping::<V>(depth, key)),
            };
        }
        Ok(mapping)
    }

    // Path operations

    /// The value at `path`.
    ///
    /// `None` if the last key of `path` is missing. Fails if any other key
    /// is missing or isn't a mapping.
    pub fn get_path(&self, path: &[K]) -> Result<Option<&Value<K, V>>, Error<K>> {
        let (branch, key) = split(path)?;
        let mapping = self.branch(branch).map_err(|broken| broken.within(path))?;
        Ok(mapping.get(key))
    }
    /// The value at `path`, `default` if the last key of `path` is missing.
    pub fn get_path_or<'a>(
        &'a self,
        path: &[K],
        default: &'a Value<K, V>,
    ) -> Result<&'a Value<K, V>, Error<K>> {
        Ok(self.get_path(path)?.unwrap_or(default))
    }
    /// Set the value at `path`, creating missing mappings on the way.
    ///
    /// Returns the value it replaces.
    pub fn set_path(
        &mut self,
        path: &[K],
        value: impl Into<Value<K, V>>,
    ) -> Result<Option<Value<K, V>>, Error<K>> {
        let (branch, key) = split(path)?;
        let mapping = self
            .branch_or_insert(branch)
            .map_err(|broken| broken.within(path))?;
        Ok(mapping.insert(key.clone(), value))
    }
    /// The value at `path`, after setting it to `value` if it was absent.
    pub fn setdefault_path(
        &mut self,
        path: &[K],
        value: impl Into<Value<K, V>>,
    ) -> Result<&mut Value<K, V>, Error<K>> {
        let (branch, key) = split(path)?;
        let mapping = self
            .branch_or_insert(branch)
            .map_err(|broken| broken.within(path))?;
        Ok(mapping.setdefault(key.clone(), value))
    }
    /// Remove the value at `path`.
    ///
    /// Fails if any key of `path` is missing, `self` is left untouched.
    pub fn pop_path(&mut self, path: &[K]) -> Result<Value<K, V>, Error<K>> {
        self.pop_path_inner(path, None)
    }
    /// Remove the value at `path`, `default` if any key of `path` is missing.
    ///
    /// Still fails if a key before the last isn't a mapping.
    pub fn pop_path_or(
        &mut self,
        path: &[K],
        default: impl Into<Value<K, V>>,
    ) -> Result<Value<K, V>, Error<K>> {
        self.pop_path_inner(path, Some(default.into()))
    }
    fn pop_path_inner(
        &mut self,
        path: &[K],
        default: Option<Value<K, V>>,
    ) -> Result<Value<K, V>, Error<K>> {
        let (branch, key) = split(path)?;
        let mapping = match self.branch_mut(branch) {
            Ok(mapping) => mapping,
            Err(broken) => match default {
                Some(default) if broken.is_missing() => return Ok(default),
                _ => return Err(broken.within(path)),
            },
        };
        match (mapping.pop(key), default) {
            (Some(value), _) | (None, Some(value)) => Ok(value),
            (None, None) => Err(Broken::missing(branch.len(), key).within(path)),
        }
    }
    /// Whether there is a value at `path`.
    ///
    /// Missing keys are not an error, but fails if a key before the last
    /// isn't a mapping.
    pub fn has_path(&self, path: &[K]) -> Result<bool, Error<K>> {
        match self.get_path(path) {
            Ok(value) => Ok(value.is_some()),
            Err(Error::KeyNotFound { .. }) => Ok(false),
            Err(error) => Err(error),
        }
    }

    // Merge

    /// A new `PathDict`, `other` recursively merged into `self`.
    ///
    /// See [`merge`](crate::merge()).
    pub fn merge(&self, other: &Self) -> Result<Self, MergeError<K, V>>
    where
        V: Clone + fmt::Debug,
    {
        merge(self, other)
    }
    /// Recursively merge `other` into `self`.
    ///
    /// See [`inplace_merge`](crate::inplace_merge()).
    pub fn merge_in_place(&mut self, other: &Self) -> Result<&mut Self, MergeError<K, V>>
    where
        V: Clone + fmt::Debug,
    {
        inplace_merge(self, other)
    }
}

impl<K: Key, V, T: Into<Value<K, V>>> FromIterator<(K, T)> for PathDict<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, T)>>(iter: I) -> Self {
        let mut dict = PathDict::new();
        dict.extend(iter);
        dict
    }
}
impl<K: Key, V, T: Into<Value<K, V>>> Extend<(K, T)> for PathDict<K, V> {
    fn extend<I: IntoIterator<Item = (K, T)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}
impl<K, V> IntoIterator for PathDict<K, V> {
    type Item = (K, Value<K, V>);
    type IntoIter = map::IntoIter<K, Value<K, V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
impl<'a, K, V> IntoIterator for &'a PathDict<K, V> {
    type Item = (&'a K, &'a Value<K, V>);
    type IntoIter = map::Iter<'a, K, Value<K, V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
