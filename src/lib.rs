#![warn(clippy::nursery)]
#![allow(clippy::use_self)]
#![doc = include_str!("../README.md")]

mod dict;
mod merge;
mod path;
#[cfg(feature = "typed")]
pub mod typed;
mod value;

pub use dict::{GetIn, HasIn, PathDict, PopIn, SetDefaultIn, SetIn};
pub use functor::{
    AccessGuard, AccessViolation, Binding, ChainError, Operation, PathFunctor, Restricted,
    UnknownOperation,
};
pub use merge::{inplace_merge, merge, MergeError};
pub use path::{Error, Key, Path};
pub use value::Value;

/// Build a [`PathDict`] from `key => value` pairs.
///
/// Values in braces are nested mappings, anything else is a leaf.
///
/// ```rust
/// use pathdict::{pathdict, Value};
///
/// let dict = pathdict! {
///     "name" => "cuicui",
///     "size" => { "width" => "10px", "height" => "auto" },
/// };
/// assert_eq!(dict.get_path(&["size", "width"]), Ok(Some(&Value::Leaf("10px"))));
/// ```
#[macro_export]
macro_rules! pathdict {
    (@value { $($inner:tt)* }) => {
        $crate::Value::Dict($crate::pathdict! { $($inner)* })
    };
    (@value $leaf:expr) => {
        $crate::Value::Leaf($leaf)
    };
    ($($key:expr => $value:tt),* $(,)?) => {{
        #[allow(unused_mut)]
        let mut dict = $crate::PathDict::new();
        $( dict.insert($key, $crate::pathdict!(@value $value)); )*
        dict
    }};
}
