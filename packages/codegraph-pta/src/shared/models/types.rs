//! Types, subsignatures and method references

use super::ids::ClassId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared type of an allocation or variable
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Type {
    /// Class or interface type
    Class(ClassId),
    /// Array type with the given element type
    Array(Box<Type>),
}

impl Type {
    /// Array of `elem`
    pub fn array_of(elem: Type) -> Self {
        Type::Array(Box::new(elem))
    }

    /// Class for class types, `None` for arrays
    pub fn as_class(&self) -> Option<ClassId> {
        match self {
            Type::Class(c) => Some(*c),
            Type::Array(_) => None,
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Type::Array(_))
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Class(c) => write!(f, "{}", c),
            Type::Array(elem) => write!(f, "{}[]", elem),
        }
    }
}

/// Method name plus descriptor, e.g. `"void foo(A,B)"`.
///
/// Two methods with equal subsignatures in related classes override each
/// other; dispatch is keyed by this value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Subsignature(String);

impl Subsignature {
    pub fn new(sig: impl Into<String>) -> Self {
        Self(sig.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Subsignature {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl fmt::Display for Subsignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Symbolic reference to a method as written at a call site
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodRef {
    /// Declaring class named by the call site
    pub class: ClassId,
    pub subsignature: Subsignature,
}

impl MethodRef {
    pub fn new(class: ClassId, subsignature: impl Into<Subsignature>) -> Self {
        Self {
            class,
            subsignature: subsignature.into(),
        }
    }
}

impl fmt::Display for MethodRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}: {}>", self.class, self.subsignature)
    }
}
