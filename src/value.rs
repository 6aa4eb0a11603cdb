use std::collections::{BTreeMap, HashMap};
use std::{fmt, hash::BuildHasher};

use indexmap::IndexMap;

use crate::{Key, PathDict};

/// A value stored in a [`PathDict`]: either a leaf or a nested mapping.
#[derive(Clone)]
pub enum Value<K, V> {
    Leaf(V),
    Dict(PathDict<K, V>),
}
impl<K, V> Value<K, V> {
    pub const fn is_dict(&self) -> bool {
        matches!(self, Value::Dict(_))
    }
    pub const fn as_dict(&self) -> Option<&PathDict<K, V>> {
        match self {
            Value::Dict(dict) => Some(dict),
            Value::Leaf(_) => None,
        }
    }
    pub fn as_dict_mut(&mut self) -> Option<&mut PathDict<K, V>> {
        match self {
            Value::Dict(dict) => Some(dict),
            Value::Leaf(_) => None,
        }
    }
    pub const fn as_leaf(&self) -> Option<&V> {
        match self {
            Value::Leaf(leaf) => Some(leaf),
            Value::Dict(_) => None,
        }
    }
    pub fn into_leaf(self) -> Option<V> {
        match self {
            Value::Leaf(leaf) => Some(leaf),
            Value::Dict(_) => None,
        }
    }
}
impl<K: Key, V: PartialEq> PartialEq for Value<K, V> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Leaf(left), Value::Leaf(right)) => left == right,
            (Value::Dict(left), Value::Dict(right)) => left == right,
            _ => false,
        }
    }
}
impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Value<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Leaf(leaf) => fmt::Debug::fmt(leaf, f),
            Value::Dict(dict) => fmt::Debug::fmt(dict, f),
        }
    }
}

// Adopting a mapping: every mapping stored in a `PathDict` becomes a
// `PathDict` itself, one level at a time, through `FromIterator`.

impl<K, V> From<PathDict<K, V>> for Value<K, V> {
    fn from(dict: PathDict<K, V>) -> Self {
        Value::Dict(dict)
    }
}
macro_rules! adopt_mapping {
    ($( [$($generics:tt)*] $mapping:ty ),* $(,)?) => {$(
        impl<K: Key, V, T: Into<Value<K, V>>, $($generics)*> From<$mapping> for PathDict<K, V> {
            fn from(mapping: $mapping) -> Self {
                mapping.into_iter().collect()
            }
        }
        impl<K: Key, V, T: Into<Value<K, V>>, $($generics)*> From<$mapping> for Value<K, V> {
            fn from(mapping: $mapping) -> Self {
                Value::Dict(mapping.into())
            }
        }
    )*};
}
adopt_mapping! {
    [S: BuildHasher] HashMap<K, T, S>,
    [S: BuildHasher] IndexMap<K, T, S>,
    [] BTreeMap<K, T>,
}
