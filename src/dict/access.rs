//! Chained accessors: build a path one key at a time, then call.
//!
//! ```rust
//! use pathdict::{pathdict, Value};
//!
//! let mut dict = pathdict! { "root" => { "leaf" => 1 } };
//!
//! let leaf = dict.get_in().key("root").key("leaf").call(());
//! assert_eq!(leaf, Ok(Some(&Value::Leaf(1))));
//!
//! dict.set_in().key("root").assign("other", Value::Leaf(2)).unwrap();
//! assert_eq!(dict, pathdict! { "root" => { "leaf" => 1, "other" => 2 } });
//! ```
use std::convert::Infallible;

use functor::{Binding, PathFunctor};

use crate::path::Broken;
use crate::{Error, Key, PathDict, Value};

/// Chained [`PathDict::get_path`], bare call is [`PathDict::get`].
pub type GetIn<'a, K, V> =
    PathFunctor<&'a PathDict<K, V>, K, (), K, Result<Option<&'a Value<K, V>>, Error<K>>>;

/// Chained [`PathDict::has_path`], bare call is [`PathDict::has`].
pub type HasIn<'a, K, V> = PathFunctor<&'a PathDict<K, V>, K, (), K, Result<bool, Error<K>>>;

/// Chained [`PathDict::set_path`], supports assignment.
///
/// There is no bare call, use [`PathDict::insert`].
pub type SetIn<'a, K, V> = PathFunctor<
    &'a mut PathDict<K, V>,
    K,
    Value<K, V>,
    Infallible,
    Result<Option<Value<K, V>>, Error<K>>,
>;

/// Chained [`PathDict::setdefault_path`], bare call is [`PathDict::setdefault`].
pub type SetDefaultIn<'a, K, V> = PathFunctor<
    &'a mut PathDict<K, V>,
    K,
    Value<K, V>,
    (K, Value<K, V>),
    Result<&'a mut Value<K, V>, Error<K>>,
>;

/// Chained [`PathDict::pop_path`] and [`PathDict::pop_path_or`].
///
/// The argument is the optional default. The bare call pops a single key.
pub type PopIn<'a, K, V> = PathFunctor<
    &'a mut PathDict<K, V>,
    K,
    Option<Value<K, V>>,
    (K, Option<Value<K, V>>),
    Result<Value<K, V>, Error<K>>,
>;

fn get_path<'a, K: Key, V>(
    dict: &'a PathDict<K, V>,
    path: &[K],
    (): (),
) -> Result<Option<&'a Value<K, V>>, Error<K>> {
    dict.get_path(path)
}
fn get<K: Key, V>(
    dict: &PathDict<K, V>,
    key: K,
) -> Result<Option<&Value<K, V>>, Error<K>> {
    Ok(dict.get(&key))
}
fn has_path<K: Key, V>(
    dict: &PathDict<K, V>,
    path: &[K],
    (): (),
) -> Result<bool, Error<K>> {
    dict.has_path(path)
}
fn has<K: Key, V>(dict: &PathDict<K, V>, key: K) -> Result<bool, Error<K>> {
    Ok(dict.has(&key))
}
fn set_path<K: Key, V>(
    dict: &mut PathDict<K, V>,
    path: &[K],
    value: Value<K, V>,
) -> Result<Option<Value<K, V>>, Error<K>> {
    dict.set_path(path, value)
}
fn setdefault_path<'a, K: Key, V>(
    dict: &'a mut PathDict<K, V>,
    path: &[K],
    value: Value<K, V>,
) -> Result<&'a mut Value<K, V>, Error<K>> {
    dict.setdefault_path(path, value)
}
fn setdefault<K: Key, V>(
    dict: &mut PathDict<K, V>,
    (key, value): (K, Value<K, V>),
) -> Result<&mut Value<K, V>, Error<K>> {
    Ok(dict.setdefault(key, value))
}
fn pop_path<K: Key, V>(
    dict: &mut PathDict<K, V>,
    path: &[K],
    default: Option<Value<K, V>>,
) -> Result<Value<K, V>, Error<K>> {
    match default {
        Some(default) => dict.pop_path_or(path, default),
        None => dict.pop_path(path),
    }
}
fn pop<K: Key, V>(
    dict: &mut PathDict<K, V>,
    (key, default): (K, Option<Value<K, V>>),
) -> Result<Value<K, V>, Error<K>> {
    match dict.pop(&key).or(default) {
        Some(value) => Ok(value),
        None => Err(Broken::missing(0, &key).within(&[key])),
    }
}

impl<K: Key, V> PathDict<K, V> {
    /// Read a value, see [`GetIn`].
    pub fn get_in(&self) -> GetIn<'_, K, V> {
        let binding = Binding::new("get_path", get_path::<K, V>);
        let binding = binding.or_bare("get", get::<K, V>);
        PathFunctor::new(self, binding)
    }
    /// Check a value exists, see [`HasIn`].
    pub fn has_in(&self) -> HasIn<'_, K, V> {
        let binding = Binding::new("has_path", has_path::<K, V>);
        let binding = binding.or_bare("has", has::<K, V>);
        PathFunctor::new(self, binding)
    }
    /// Write a value, see [`SetIn`].
    pub fn set_in(&mut self) -> SetIn<'_, K, V> {
        let binding = Binding::new("set_path", set_path::<K, V>).assignable();
        PathFunctor::new(self, binding)
    }
    /// Read or initialize a value, see [`SetDefaultIn`].
    pub fn setdefault_in(&mut self) -> SetDefaultIn<'_, K, V> {
        let binding = Binding::new("setdefault_path", setdefault_path::<K, V>)
            .or_bare("setdefault", setdefault::<K, V>);
        PathFunctor::new(self, binding)
    }
    /// Remove a value, see [`PopIn`].
    pub fn pop_in(&mut self) -> PopIn<'_, K, V> {
        let binding = Binding::new("pop_path", pop_path::<K, V>);
        let binding = binding.or_bare("pop", pop::<K, V>);
        PathFunctor::new(self, binding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{pathdict, ChainError, Operation, Path, Restricted};
    use pretty_assertions::assert_eq;

    type Dict = PathDict<&'static str, i32>;

    const fn leaf(value: i32) -> Value<&'static str, i32> {
        Value::Leaf(value)
    }

    #[test]
    fn get_in_chain() {
        let x: Dict = pathdict! { "root" => { "branch" => 1 } };
        let root = x.get("root");
        let branch = x.get_in().key("root").key("branch").call(());
        let unknown = x.get_in().key("root").key("unknown").call(());
        assert_eq!(x.get_in().key("root").call(()), Ok(root));
        assert_eq!(branch, Ok(Some(&leaf(1))));
        assert_eq!(unknown, Ok(None));
        assert_eq!(x.get_in().call_bare("root"), Ok(root));
    }
    #[test]
    fn get_in_requires_path() {
        let x: Dict = pathdict! { "root" => 1 };
        let expected = ChainError::BareCallRequired {
            operation: "get_path",
            bare: "get",
        };
        assert_eq!(x.get_in().call(()), Err(Error::Chain(expected)));
    }
    #[test]
    fn set_in_requires_path() {
        let mut x: Dict = pathdict! { "root" => 1 };
        let expected = ChainError::PathRequired {
            operation: "set_path",
        };
        assert_eq!(x.set_in().call(leaf(2)), Err(Error::Chain(expected)));
        assert_eq!(x, pathdict! { "root" => 1 });
    }
    #[test]
    fn get_in_attr_syntax() {
        let x: Dict = pathdict! { "root" => { "leaf" => 1 } };
        let chain = x.get_in().attr("root").unwrap().attr("leaf").unwrap();
        assert_eq!(chain.call(()), Ok(Some(&leaf(1))));
        assert!(x.get_in().attr("_private").is_err());
    }
    #[test]
    fn get_in_no_assign() {
        let x: Dict = pathdict! { "root" => 1 };
        let err = x.get_in().assign("root", ()).unwrap_err();
        let expected = ChainError::AssignDisallowed {
            operation: "get_path",
            key: "\"root\"".into(),
            value: "()".into(),
        };
        assert_eq!(err, Error::Chain(expected));
    }
    #[test]
    fn set_in_assign() {
        let mut x: Dict = pathdict! { "root" => 1 };
        x.set_in().assign("another", leaf(1)).unwrap();
        x.set_in().key("third").assign("one", leaf(1)).unwrap();
        x.set_in().key("third").key("two").call(leaf(2)).unwrap();
        let expected = pathdict! {
            "root" => 1,
            "another" => 1,
            "third" => { "one" => 1, "two" => 2 },
        };
        assert_eq!(x, expected);
    }
    #[test]
    fn set_in_through_leaf() {
        let mut x: Dict = pathdict! { "root" => 1 };
        let err = x.set_in().key("root").assign("child", leaf(2)).unwrap_err();
        assert!(matches!(err, Error::NotAMapping { key: "root", .. }));
    }
    #[test]
    fn setdefault_in() {
        let mut x: Dict = pathdict! { "root" => { "leaf" => 1 } };
        let existing = x.setdefault_in().key("root").key("leaf").call(leaf(5));
        assert_eq!(existing, Ok(&mut leaf(1)));
        let created = x.setdefault_in().key("root").key("new").call(leaf(5));
        assert_eq!(created, Ok(&mut leaf(5)));
        let bare = x.setdefault_in().call_bare(("top", leaf(6)));
        assert_eq!(bare, Ok(&mut leaf(6)));
        let expected = pathdict! { "root" => { "leaf" => 1, "new" => 5 }, "top" => 6 };
        assert_eq!(x, expected);
    }
    #[test]
    fn pop_in() {
        let mut x: Dict = pathdict! { "root" => { "leaf" => 1 }, "top" => 2 };
        let popped = x.pop_in().key("root").key("leaf").call(None);
        assert_eq!(popped, Ok(leaf(1)));
        let defaulted = x.pop_in().key("root").key("leaf").call(Some(leaf(9)));
        assert_eq!(defaulted, Ok(leaf(9)));
        assert_eq!(x.pop_in().call_bare(("top", None)), Ok(leaf(2)));
        assert_eq!(x.pop_in().call_bare(("top", Some(leaf(3)))), Ok(leaf(3)));

        let err = x.pop_in().call_bare(("top", None)).unwrap_err();
        let expected = Error::KeyNotFound {
            key: "top",
            path: Path::root(),
            full_path: Path::from(["top"]),
        };
        assert_eq!(err, expected);
        assert_eq!(x, pathdict! { "root" => {} });
    }
    #[test]
    fn has_in() {
        let x: Dict = pathdict! { "root" => { "leaf" => 1 } };
        let present = x.has_in().key("root").key("leaf").call(());
        let absent = x.has_in().key("missing").key("leaf").call(());
        assert_eq!(present, Ok(true));
        assert_eq!(absent, Ok(false));
        assert_eq!(x.has_in().call_bare("root"), Ok(true));
        assert_eq!(x.has_in().call_bare("leaf"), Ok(false));
    }
    #[test]
    fn accessors_are_independent() {
        let x: Dict = pathdict! { "a" => 1, "b" => 2 };
        let first = x.get_in().key("a");
        let second = x.get_in().key("b");
        assert_eq!(first.path(), ["a"]);
        assert_eq!(second.path(), ["b"]);
        assert_eq!(first.call(()), Ok(Some(&leaf(1))));
        assert_eq!(second.call(()), Ok(Some(&leaf(2))));
    }
    #[test]
    fn accessor_repr() {
        let x: Dict = pathdict! {};
        let expected = "<PathFunctor around get_path and get>".to_string();
        assert_eq!(x.get_in().repr(), Ok(expected));
        let violation = x.get_in().key("a").repr().unwrap_err();
        assert_eq!(violation.operation, Operation::Represent);
        assert!(x.get_in().access(Operation::Iter, &[]).is_err());
    }
}
