//! Per-key hooks on top of [`PathDict`].
//!
//! A [`Schema`] associates a [`Field`] to each key it knows about. Reading,
//! writing and deleting a key of a [`TypedPathDict`] goes through that
//! key's field, which can transform, validate or reject the operation.
//!
//! Path operations and [`merge`](crate::merge()) do not go through fields,
//! access them through [`TypedPathDict::raw`].

use std::{fmt, marker::PhantomData, ops::Deref};

use thiserror::Error;

use crate::{Key, PathDict, Value};

pub use anyhow;

/// Failure to access a field of a [`TypedPathDict`].
#[derive(Debug, Error)]
pub enum FieldError<K> {
    #[error("{0:?} is not a field of this schema")]
    UnknownField(K),

    #[error("field {0:?} is not set")]
    Missing(K),

    #[error("field {key:?} rejected the operation")]
    Hook { key: K, source: anyhow::Error },
}
impl<K: Clone> FieldError<K> {
    fn hook(key: &K) -> impl FnOnce(anyhow::Error) -> Self + '_ {
        move |source| FieldError::Hook {
            key: key.clone(),
            source,
        }
    }
}

/// Hooks for a single key of a [`Schema`].
///
/// Every hook defaults to acting on the raw storage.
pub trait Field<K: Key, V>: Sync {
    fn get<'a>(
        &self,
        raw: &'a PathDict<K, V>,
        key: &K,
    ) -> anyhow::Result<Option<&'a Value<K, V>>> {
        Ok(raw.get(key))
    }
    fn set(
        &self,
        raw: &mut PathDict<K, V>,
        key: K,
        value: Value<K, V>,
    ) -> anyhow::Result<()> {
        raw.insert(key, value);
        Ok(())
    }
    fn delete(
        &self,
        raw: &mut PathDict<K, V>,
        key: &K,
    ) -> anyhow::Result<Option<Value<K, V>>> {
        Ok(raw.pop(key))
    }
}

/// A [`Field`] with every hook defaulted.
#[derive(Debug, Clone, Copy, Default)]
pub struct Plain;
impl<K: Key, V> Field<K, V> for Plain {}

/// The fields of a [`TypedPathDict`].
///
/// Implemented on a marker type: fields belong to the schema, not to a
/// specific `TypedPathDict`.
pub trait Schema<K: Key + 'static, V: 'static> {
    /// The field for `key`, `None` if `key` is not part of this schema.
    fn field(key: &K) -> Option<&'static dyn Field<K, V>>;
}

/// A [`PathDict`] whose top-level keys are accessed through `S`'s fields.
///
/// ```rust
/// use pathdict::typed::{anyhow, Field, Schema, TypedPathDict, Plain};
/// use pathdict::Value;
///
/// struct Positive;
/// impl Field<&'static str, i32> for Positive {
///     fn set(
///         &self,
///         raw: &mut pathdict::PathDict<&'static str, i32>,
///         key: &'static str,
///         value: Value<&'static str, i32>,
///     ) -> anyhow::Result<()> {
///         match value {
///             Value::Leaf(n) if n < 0 => anyhow::bail!("{n} is negative"),
///             value => raw.insert(key, value),
///         };
///         Ok(())
///     }
/// }
/// struct Account;
/// impl Schema<&'static str, i32> for Account {
///     fn field(key: &&'static str) -> Option<&'static dyn Field<&'static str, i32>> {
///         match *key {
///             "balance" => Some(&Positive),
///             "id" => Some(&Plain),
///             _ => None,
///         }
///     }
/// }
/// let mut account = TypedPathDict::<Account, &str, i32>::new();
/// account.set("balance", Value::Leaf(10)).unwrap();
/// assert!(account.set("balance", Value::Leaf(-3)).is_err());
/// assert!(account.set("nickname", Value::Leaf(0)).is_err());
/// assert_eq!(account.get(&"balance").unwrap(), Some(&Value::Leaf(10)));
/// ```
pub struct TypedPathDict<S, K, V> {
    raw: PathDict<K, V>,
    _schema: PhantomData<fn() -> S>,
}
impl<S, K: Clone, V: Clone> Clone for TypedPathDict<S, K, V> {
    fn clone(&self) -> Self {
        TypedPathDict {
            raw: self.raw.clone(),
            _schema: PhantomData,
        }
    }
}
impl<S, K: fmt::Debug, V: fmt::Debug> fmt::Debug for TypedPathDict<S, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypedPathDict").field(&self.raw).finish()
    }
}
impl<S, K, V> Default for TypedPathDict<S, K, V> {
    fn default() -> Self {
        TypedPathDict {
            raw: PathDict::default(),
            _schema: PhantomData,
        }
    }
}
impl<S, K, V> Deref for TypedPathDict<S, K, V> {
    type Target = PathDict<K, V>;

    fn deref(&self) -> &Self::Target {
        &self.raw
    }
}
impl<S, K, V> TypedPathDict<S, K, V>
where
    S: Schema<K, V>,
    K: Key + 'static,
    V: 'static,
{
    pub fn new() -> Self {
        Self::default()
    }
    /// Wrap `raw`, its existing keys are not checked against `S`.
    pub const fn from_raw(raw: PathDict<K, V>) -> Self {
        TypedPathDict {
            raw,
            _schema: PhantomData,
        }
    }
    pub const fn raw(&self) -> &PathDict<K, V> {
        &self.raw
    }
    pub fn raw_mut(&mut self) -> &mut PathDict<K, V> {
        &mut self.raw
    }
    pub fn into_raw(self) -> PathDict<K, V> {
        self.raw
    }
    fn field(key: &K) -> Result<&'static dyn Field<K, V>, FieldError<K>> {
        S::field(key).ok_or_else(|| FieldError::UnknownField(key.clone()))
    }
    pub fn get(&self, key: &K) -> Result<Option<&Value<K, V>>, FieldError<K>> {
        let field = Self::field(key)?;
        field.get(&self.raw, key).map_err(FieldError::hook(key))
    }
    pub fn set(&mut self, key: K, value: impl Into<Value<K, V>>) -> Result<(), FieldError<K>> {
        let field = Self::field(&key)?;
        let result = field.set(&mut self.raw, key.clone(), value.into());
        result.map_err(FieldError::hook(&key))
    }
    /// Remove `key`, fails if it wasn't set.
    pub fn delete(&mut self, key: &K) -> Result<Value<K, V>, FieldError<K>> {
        let field = Self::field(key)?;
        let deleted = field.delete(&mut self.raw, key);
        let deleted = deleted.map_err(FieldError::hook(key))?;
        deleted.ok_or_else(|| FieldError::Missing(key.clone()))
    }
}
