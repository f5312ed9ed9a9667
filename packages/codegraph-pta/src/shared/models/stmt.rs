//! Pointer-relevant statements
//!
//! Only the statement kinds that move references are modelled. Anything
//! else a front end lowers (arithmetic, branches, literals) becomes `Nop`.

use super::ids::{FieldId, InvokeId, MethodId, VarId};
use super::types::{MethodRef, Type};
use serde::{Deserialize, Serialize};

/// Field operand of a load or store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldAccess {
    /// `T.f`
    Static(FieldId),
    /// `base.f`
    Instance { base: VarId, field: FieldId },
}

impl FieldAccess {
    pub fn field(&self) -> FieldId {
        match self {
            FieldAccess::Static(f) => *f,
            FieldAccess::Instance { field, .. } => *field,
        }
    }

    pub fn is_static(&self) -> bool {
        matches!(self, FieldAccess::Static(_))
    }
}

/// Statement of a method body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stmt {
    /// `lhs = new T()`
    New { lhs: VarId, ty: Type },
    /// `lhs = rhs`
    Copy { lhs: VarId, rhs: VarId },
    /// `lhs = T.f` / `lhs = base.f`
    LoadField { lhs: VarId, access: FieldAccess },
    /// `T.f = rhs` / `base.f = rhs`
    StoreField { access: FieldAccess, rhs: VarId },
    /// `lhs = base[i]`
    LoadArray { lhs: VarId, base: VarId },
    /// `base[i] = rhs`
    StoreArray { base: VarId, rhs: VarId },
    /// Call site, details live in the program's invoke table
    Invoke(InvokeId),
    /// `return var` / `return`
    Return(Option<VarId>),
    Nop,
}

/// Dispatch flavour written at the call site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvokeKind {
    /// `invokestatic`
    Static,
    /// Constructors, private and `super` calls
    Special,
    /// `invokevirtual`
    Virtual,
    /// `invokeinterface`
    Interface,
}

/// Call site
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoke {
    pub kind: InvokeKind,
    pub method_ref: MethodRef,
    /// Receiver variable; `None` for static calls
    pub receiver: Option<VarId>,
    pub args: Vec<VarId>,
    /// Variable receiving the return value, if any
    pub result: Option<VarId>,
    /// Method containing this call site
    pub container: MethodId,
    /// Position of the call statement in the container's body
    pub index: usize,
}

impl Invoke {
    pub fn is_static(&self) -> bool {
        self.kind == InvokeKind::Static
    }
}
