//! Restrict a value to an explicit allow-list of protocol operations.

use std::{fmt, str::FromStr};

use enumset::{EnumSet, EnumSetType};
use thiserror::Error;

/// An operation name that isn't part of the [`Operation`] catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("`{0}` is not an operation of the catalog")]
pub struct UnknownOperation(pub Box<str>);

/// A catalog [`Operation`] was used on a [`Restricted`] value that doesn't
/// allow it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "`{operation}` is not allowed on {}, called with {args:?}",
    .context.as_deref().unwrap_or("a restricted value")
)]
pub struct AccessViolation {
    pub operation: Operation,
    /// `Debug` rendering of each argument the operation was invoked with.
    pub args: Box<[String]>,
    /// Representation of the value the operation was attempted on.
    pub context: Option<Box<str>>,
}
impl AccessViolation {
    pub fn new(operation: Operation, args: &[&dyn fmt::Debug]) -> Self {
        let args = args.iter().map(|arg| format!("{arg:?}")).collect();
        AccessViolation {
            operation,
            args,
            context: None,
        }
    }
    #[must_use]
    pub fn within(mut self, context: impl Into<Box<str>>) -> Self {
        self.context = Some(context.into());
        self
    }
}

macro_rules! catalog {
    ($( $(#[$meta:meta])* $variant:ident => $name:literal ),* $(,)?) => {
        /// Every operation a value may be asked to perform when driven
        /// dynamically: operators, comparisons, conversions, container and
        /// iteration protocol, attribute protocol, representation and
        /// serialization hooks.
        #[derive(EnumSetType, Debug)]
        pub enum Operation {
            $( $(#[$meta])* $variant, )*
        }
        impl Operation {
            /// The catalog name of this operation, as accepted by
            /// [`AccessGuard::new`].
            pub const fn name(self) -> &'static str {
                match self {
                    $( Operation::$variant => $name, )*
                }
            }
        }
        impl FromStr for Operation {
            type Err = UnknownOperation;

            fn from_str(name: &str) -> Result<Self, Self::Err> {
                match name {
                    $( $name => Ok(Operation::$variant), )*
                    unknown => Err(UnknownOperation(unknown.into())),
                }
            }
        }
    };
}
catalog! {
    // arithmetic
    Neg => "neg", Pos => "pos", Abs => "abs", Invert => "invert",
    Add => "add", Sub => "sub", Mul => "mul", Div => "div", FloorDiv => "floor_div",
    Rem => "rem", DivRem => "div_rem", Pow => "pow",
    BitAnd => "bit_and", BitOr => "bit_or", BitXor => "bit_xor", Shl => "shl", Shr => "shr",
    AddAssign => "add_assign", SubAssign => "sub_assign", MulAssign => "mul_assign",
    DivAssign => "div_assign", FloorDivAssign => "floor_div_assign", RemAssign => "rem_assign",
    PowAssign => "pow_assign", BitAndAssign => "bit_and_assign", BitOrAssign => "bit_or_assign",
    BitXorAssign => "bit_xor_assign", ShlAssign => "shl_assign", ShrAssign => "shr_assign",
    /// Any arithmetic operator with swapped operands.
    Reflected => "reflected",
    // comparison
    Eq => "eq", Ne => "ne", Lt => "lt", Le => "le", Gt => "gt", Ge => "ge", Cmp => "cmp",
    Hash => "hash",
    // conversion
    Bool => "bool", Int => "int", Float => "float", Complex => "complex", Index => "index",
    Hex => "hex", Oct => "oct",
    // container & iteration
    Len => "len", Contains => "contains", Iter => "iter", Reversed => "reversed",
    GetItem => "get_item", SetItem => "set_item", DelItem => "del_item", Missing => "missing",
    GetSlice => "get_slice", SetSlice => "set_slice", DelSlice => "del_slice",
    // attribute protocol
    GetAttr => "get_attr", GetAttribute => "get_attribute", SetAttr => "set_attr",
    DelAttr => "del_attr",
    // descriptor protocol
    Get => "get", Set => "set", Delete => "delete",
    // calling & scoping
    Call => "call", Enter => "enter", Exit => "exit",
    // representation
    Represent => "repr", Str => "str",
    // type checks
    InstanceCheck => "instance_check", SubclassCheck => "subclass_check",
    // serialization hooks
    GetState => "get_state", SetState => "set_state", Reduce => "reduce",
    ReduceEx => "reduce_ex",
}
impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Rejects every [`Operation`] except an exempted set.
///
/// Exempted operations are the ones the guarded type implements itself.
///
/// ```rust
/// use pathdict_functor::{AccessGuard, Operation};
///
/// let guard = AccessGuard::new(["call", "get_attr"]).unwrap();
/// assert!(guard.check(Operation::Call, &[]).is_ok());
///
/// let violation = guard.check(Operation::Add, &[&1]).unwrap_err();
/// assert_eq!(violation.operation, Operation::Add);
/// assert_eq!(&*violation.args, ["1".to_string()]);
///
/// assert!(AccessGuard::new(["frobnicate"]).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AccessGuard {
    exempt: EnumSet<Operation>,
}
impl AccessGuard {
    /// Guard against everything but the operations named in `exempt`.
    ///
    /// Fails if any name isn't in the catalog.
    pub fn new<'a>(exempt: impl IntoIterator<Item = &'a str>) -> Result<Self, UnknownOperation> {
        let exempt = exempt
            .into_iter()
            .map(str::parse::<Operation>)
            .collect::<Result<_, _>>()?;
        Ok(AccessGuard { exempt })
    }
    pub const fn exempting(exempt: EnumSet<Operation>) -> Self {
        AccessGuard { exempt }
    }
    pub const fn exempt(&self) -> EnumSet<Operation> {
        self.exempt
    }
    pub fn allows(&self, operation: Operation) -> bool {
        self.exempt.contains(operation)
    }
    /// This guard, also rejecting `operation`.
    #[must_use]
    pub fn revoke(mut self, operation: Operation) -> Self {
        self.exempt.remove(operation);
        self
    }
    pub fn check(
        &self,
        operation: Operation,
        args: &[&dyn fmt::Debug],
    ) -> Result<(), AccessViolation> {
        if self.allows(operation) {
            Ok(())
        } else {
            Err(AccessViolation::new(operation, args))
        }
    }
}

/// A value that only answers to the operations its [`AccessGuard`] exempts.
///
/// Dynamic front-ends (scripting bridges, generic visitors) should route
/// every protocol operation through [`Restricted::access`] before acting on
/// the value.
pub trait Restricted {
    fn guard(&self) -> AccessGuard;

    /// How to name `self` in an [`AccessViolation`].
    fn describe(&self) -> String;

    fn access(
        &self,
        operation: Operation,
        args: &[&dyn fmt::Debug],
    ) -> Result<(), AccessViolation> {
        let violation = |violation: AccessViolation| violation.within(self.describe());
        self.guard().check(operation, args).map_err(violation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn names_round_trip_through_catalog() {
        for operation in EnumSet::<Operation>::all() {
            assert_eq!(operation.name().parse::<Operation>(), Ok(operation));
        }
    }
    #[test]
    fn unknown_exemption_fails_construction() {
        let err = AccessGuard::new(["call", "__call__"]).unwrap_err();
        assert_eq!(err, UnknownOperation("__call__".into()));
    }
    #[test]
    fn default_guard_rejects_everything() {
        let guard = AccessGuard::default();
        for operation in EnumSet::<Operation>::all() {
            assert!(guard.check(operation, &[]).is_err());
        }
    }
    #[test]
    fn violation_carries_operation_and_args() {
        let guard = AccessGuard::new(["len"]).unwrap();
        assert_eq!(guard.check(Operation::Len, &[]), Ok(()));

        let violation = guard.check(Operation::SetItem, &[&"key", &42]);
        let violation = violation.unwrap_err();
        assert_eq!(
            violation,
            AccessViolation {
                operation: Operation::SetItem,
                args: vec!["\"key\"".to_string(), "42".to_string()].into(),
                context: None,
            }
        );
    }
    #[test]
    fn revoke_removes_exemption() {
        let guard = AccessGuard::new(["repr", "call"]).unwrap();
        let guard = guard.revoke(Operation::Represent);
        assert!(!guard.allows(Operation::Represent));
        assert!(guard.allows(Operation::Call));
    }

    struct Sealed;
    impl Restricted for Sealed {
        fn guard(&self) -> AccessGuard {
            AccessGuard::exempting(Operation::Represent | Operation::Str)
        }
        fn describe(&self) -> String {
            "<Sealed>".to_string()
        }
    }
    #[test]
    fn restricted_access_names_the_value() {
        assert_eq!(Sealed.access(Operation::Str, &[]), Ok(()));

        let violation = Sealed.access(Operation::Iter, &[]).unwrap_err();
        assert_eq!(violation.context.as_deref(), Some("<Sealed>"));
        assert_eq!(
            violation.to_string(),
            "`iter` is not allowed on <Sealed>, called with []"
        );
    }
}
