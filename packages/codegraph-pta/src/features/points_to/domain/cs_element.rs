//! Context-sensitive elements and pointers
//!
//! All of these are interned by the
//! [`CsManager`](crate::features::points_to::infrastructure::CsManager):
//! the `*Id` newtypes are dense indices into its arenas.

use super::context::ContextId;
use super::heap::ObjId;
use crate::shared::models::ids::define_id;
use crate::shared::models::{FieldId, InvokeId, MethodId, VarId};
use serde::{Deserialize, Serialize};
use std::fmt;

define_id!(
    /// (heap context, object)
    CsObjId,
    "csobj#"
);
define_id!(
    /// (context, method)
    CsMethodId,
    "csmethod#"
);
define_id!(
    /// (context, call site)
    CsCallSiteId,
    "cscallsite#"
);
define_id!(
    /// Interned [`PointerKey`]
    PointerId,
    "ptr#"
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CsObj {
    pub context: ContextId,
    pub obj: ObjId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CsMethod {
    pub context: ContextId,
    pub method: MethodId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CsCallSite {
    pub context: ContextId,
    pub invoke: InvokeId,
}

/// Storage location owning one points-to set
///
/// Instance fields and array indexes are keyed by the context-sensitive
/// object only; the accessing variable's context does not take part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerKey {
    Var { context: ContextId, var: VarId },
    StaticField(FieldId),
    InstanceField { base: CsObjId, field: FieldId },
    /// All indexes of one array object collapse to this pointer
    ArrayIndex(CsObjId),
}

impl PointerKey {
    pub fn is_var(&self) -> bool {
        matches!(self, PointerKey::Var { .. })
    }
}

impl fmt::Display for PointerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointerKey::Var { context, var } => write!(f, "{}:{}", context, var),
            PointerKey::StaticField(field) => write!(f, "static {}", field),
            PointerKey::InstanceField { base, field } => write!(f, "{}.{}", base, field),
            PointerKey::ArrayIndex(base) => write!(f, "{}[*]", base),
        }
    }
}
