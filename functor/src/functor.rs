//! Accumulate a key path, then dispatch it to an operation of the bound value.

use std::fmt;

use log::trace;
use smallvec::SmallVec;
use thiserror::Error;

use crate::guard::{AccessGuard, AccessViolation, Operation, Restricted};

/// A [`PathFunctor`] was used in a way its [`Binding`] doesn't support.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    #[error("{operation} doesn't support calling without path")]
    PathRequired { operation: &'static str },

    #[error(
        "{operation} needs a path, use `call_bare` to call {bare} without path"
    )]
    BareCallRequired {
        operation: &'static str,
        bare: &'static str,
    },

    #[error("{operation} takes no path, but {len} keys were accumulated")]
    PathGiven { operation: &'static str, len: usize },

    #[error(
        "{operation} doesn't support assignment syntax (tried to set {key} to {value})"
    )]
    AssignDisallowed {
        operation: &'static str,
        key: String,
        value: String,
    },

    #[error("`{0}` is reserved and can't be a path element")]
    NoAttribute(Box<str>),

    #[error(transparent)]
    Access(#[from] AccessViolation),
}

type WithPath<T, K, A, R> = fn(T, &[K], A) -> R;
type NoPath<T, B, R> = fn(T, B) -> R;

/// How a [`PathFunctor`] dispatches once it is called.
///
/// - `with_path` is called when at least one key was accumulated, with the
///   path as first argument, followed by `A`.
/// - `no_path`, if any, is called when no key was accumulated, with `B`.
/// - `assign` enables [`PathFunctor::assign`].
///
/// Bindings are made of function pointers and names, they are `Copy` and
/// cheap to build on each access.
pub struct Binding<T, K, A, B, R> {
    operation: &'static str,
    with_path: WithPath<T, K, A, R>,
    no_path: Option<(&'static str, NoPath<T, B, R>)>,
    assign: bool,
}
impl<T, K, A, B, R> Clone for Binding<T, K, A, B, R> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T, K, A, B, R> Copy for Binding<T, K, A, B, R> {}

impl<T, K, A, B, R> Binding<T, K, A, B, R> {
    pub const fn new(operation: &'static str, with_path: WithPath<T, K, A, R>) -> Self {
        Binding {
            operation,
            with_path,
            no_path: None,
            assign: false,
        }
    }
    /// Also dispatch calls without path to `no_path`.
    pub fn or_bare(mut self, operation: &'static str, no_path: NoPath<T, B, R>) -> Self {
        self.no_path = Some((operation, no_path));
        self
    }
    /// Allow [`PathFunctor::assign`].
    pub fn assignable(mut self) -> Self {
        self.assign = true;
        self
    }
    pub const fn operation(&self) -> &'static str {
        self.operation
    }
    pub fn bare_operation(&self) -> Option<&'static str> {
        self.no_path.map(|(name, _)| name)
    }
}

/// A chained accessor bound to `target`.
///
/// Each [`PathFunctor::key`] or [`PathFunctor::attr`] appends one key to the
/// path. The terminal methods consume the functor:
///
/// - [`PathFunctor::call`] dispatches the path operation,
/// - [`PathFunctor::call_bare`] dispatches the bare operation when no key was
///   accumulated,
/// - [`PathFunctor::assign`] appends a last key and dispatches the path
///   operation with the assigned value.
///
/// A functor should never be stored and reused: vend a new one per access
/// expression, so that two chains built from the same value never share a
/// path.
///
/// ```rust
/// use pathdict_functor::{Binding, ChainError, PathFunctor};
///
/// type Find<'a> = PathFunctor<&'a Registry, &'a str, char, char, Result<String, ChainError>>;
///
/// struct Registry(Vec<String>);
/// impl Registry {
///     fn lookup(&self, path: &[&str], sep: char) -> Result<String, ChainError> {
///         Ok(path.join(&sep.to_string()))
///     }
///     fn names(&self, sep: char) -> Result<String, ChainError> {
///         Ok(self.0.join(&sep.to_string()))
///     }
///     fn find(&self) -> Find<'_> {
///         let binding = Binding::new("lookup", Self::lookup);
///         PathFunctor::new(self, binding.or_bare("names", Self::names))
///     }
/// }
/// let registry = Registry(vec!["a".into(), "b".into()]);
///
/// assert_eq!(registry.find().key("x").key("y").call('/'), Ok("x/y".into()));
/// assert_eq!(registry.find().call_bare(','), Ok("a,b".into()));
/// ```
pub struct PathFunctor<T, K, A, B, R> {
    target: T,
    binding: Binding<T, K, A, B, R>,
    path: SmallVec<[K; 4]>,
}
impl<T, K, A, B, R> PathFunctor<T, K, A, B, R> {
    pub fn new(target: T, binding: Binding<T, K, A, B, R>) -> Self {
        PathFunctor {
            target,
            binding,
            path: SmallVec::new(),
        }
    }
    /// Append `key` to the path (index access).
    #[must_use]
    pub fn key(mut self, key: K) -> Self {
        self.path.push(key);
        self
    }
    /// Append `name` to the path (attribute access).
    ///
    /// Names starting with `_` are reserved for the functor's own
    /// bookkeeping, they are never appended.
    pub fn attr<N>(self, name: N) -> Result<Self, ChainError>
    where
        N: AsRef<str> + Into<K>,
    {
        if name.as_ref().starts_with('_') {
            return Err(ChainError::NoAttribute(name.as_ref().into()));
        }
        Ok(self.key(name.into()))
    }
    pub fn path(&self) -> &[K] {
        &self.path
    }
    pub const fn binding(&self) -> &Binding<T, K, A, B, R> {
        &self.binding
    }
    fn representation(&self) -> String {
        let operation = self.binding.operation;
        match self.binding.bare_operation() {
            Some(bare) => format!("<PathFunctor around {operation} and {bare}>"),
            None => format!("<PathFunctor around {operation}>"),
        }
    }
    /// Render the bound operations.
    ///
    /// Only allowed before any key is accumulated.
    pub fn repr(&self) -> Result<String, AccessViolation> {
        self.access(Operation::Represent, &[])?;
        Ok(self.representation())
    }
}
impl<T, K, A, B, R> Restricted for PathFunctor<T, K, A, B, R> {
    fn guard(&self) -> AccessGuard {
        let chain = Operation::Call | Operation::GetItem;
        let attributes = Operation::GetAttr | Operation::SetAttr;
        let render = Operation::Represent | Operation::Str;
        let guard = AccessGuard::exempting(chain | attributes | render);
        if self.path.is_empty() {
            guard
        } else {
            guard.revoke(Operation::Represent).revoke(Operation::Str)
        }
    }
    fn describe(&self) -> String {
        self.representation()
    }
}
impl<T, K, A, B, X, E> PathFunctor<T, K, A, B, Result<X, E>>
where
    E: From<ChainError>,
{
    /// Call the path operation with the accumulated path and `args`.
    ///
    /// Fails if no key was accumulated, even if the binding has a bare
    /// operation: use [`PathFunctor::call_bare`] for it.
    pub fn call(self, args: A) -> Result<X, E> {
        let (target, binding, path) = (self.target, self.binding, self.path);
        let operation = binding.operation;
        if path.is_empty() {
            let error = match binding.bare_operation() {
                Some(bare) => ChainError::BareCallRequired { operation, bare },
                None => ChainError::PathRequired { operation },
            };
            return Err(error.into());
        }
        trace!("{operation}: dispatching with a {}-keys path", path.len());
        (binding.with_path)(target, &path, args)
    }
    /// Call the bare operation with `args`.
    pub fn call_bare(self, args: B) -> Result<X, E> {
        let (target, binding, path) = (self.target, self.binding, self.path);
        let Some((operation, no_path)) = binding.no_path else {
            let operation = binding.operation;
            return Err(ChainError::PathRequired { operation }.into());
        };
        if !path.is_empty() {
            let len = path.len();
            return Err(ChainError::PathGiven { operation, len }.into());
        }
        trace!("dispatching {operation} without path");
        no_path(target, args)
    }
    /// Set `key` to `value`: append `key` to the path and call the path
    /// operation with `value` as sole argument.
    pub fn assign(self, key: K, value: A) -> Result<X, E>
    where
        K: fmt::Debug,
        A: fmt::Debug,
    {
        if !self.binding.assign {
            let error = ChainError::AssignDisallowed {
                operation: self.binding.operation,
                key: format!("{key:?}"),
                value: format!("{value:?}"),
            };
            return Err(error.into());
        }
        self.key(key).call(value)
    }
}
