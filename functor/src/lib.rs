#![warn(clippy::nursery)]
#![allow(clippy::use_self)]
//! Chained-accessor proxies.
//!
//! A [`PathFunctor`] records keys one at a time (`.key(k)`, `.attr("name")`)
//! then dispatches a single call to an operation of the object it was built
//! from, passing the recorded keys as a path. The functor only answers to
//! that small surface: every other [`Operation`] of the catalog is rejected
//! by its [`AccessGuard`] with an [`AccessViolation`].

mod functor;
mod guard;

pub use functor::{Binding, ChainError, PathFunctor};
pub use guard::{AccessGuard, AccessViolation, Operation, Restricted, UnknownOperation};
