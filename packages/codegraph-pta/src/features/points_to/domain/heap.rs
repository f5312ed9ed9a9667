//! Abstract heap objects
//!
//! Concrete heap addresses are abstracted to allocation sites. Which
//! allocation statements share an object is the heap model's policy (see
//! [`HeapModel`](crate::features::points_to::ports::HeapModel)); the solver
//! only sees opaque [`ObjId`]s.

use crate::shared::models::ids::define_id;
use crate::shared::models::{ClassId, MethodId, Type};
use serde::{Deserialize, Serialize};
use std::fmt;

define_id!(
    /// Abstract object
    ObjId,
    "obj#"
);

/// `new` statement: method plus statement index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AllocSite {
    pub method: MethodId,
    pub index: usize,
}

impl fmt::Display for AllocSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.method, self.index)
    }
}

/// Abstract object representing one allocation site
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Obj {
    pub id: ObjId,
    pub site: AllocSite,
    /// Allocated type; virtual calls dispatch on it
    pub ty: Type,
    /// Class declaring the allocating method (the type-sensitivity element)
    pub container_class: ClassId,
}

impl Obj {
    pub fn container_method(&self) -> MethodId {
        self.site.method
    }
}

impl fmt::Display for Obj {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "new {} @ {}", self.ty, self.site)
    }
}
