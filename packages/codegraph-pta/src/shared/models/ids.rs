//! Typed identifiers for program entities
//!
//! Uses the Newtype Pattern so a `MethodId` can never be passed where a
//! `VarId` is expected. Every id is a dense `u32` index into the arena that
//! owns the entity.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl $name {
            /// Arena index of this id
            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            #[inline]
            pub(crate) fn from_index(index: usize) -> Self {
                Self(index as u32)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

define_id!(
    /// Class or interface
    ClassId,
    "class#"
);
define_id!(
    /// Method (concrete or abstract)
    MethodId,
    "method#"
);
define_id!(
    /// Static or instance field
    FieldId,
    "field#"
);
define_id!(
    /// Local variable, parameter or `this`
    VarId,
    "var#"
);
define_id!(
    /// Invocation statement (call site)
    InvokeId,
    "invoke#"
);

pub(crate) use define_id;
