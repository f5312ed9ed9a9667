//! Domain layer for points-to analysis
//!
//! Contexts, abstract objects, context-sensitive elements, pointers and
//! points-to sets. Pure data; no solver logic.

pub mod context;
pub mod cs_element;
pub mod heap;
pub mod points_to_set;

pub use context::{ContextElement, ContextId, ContextTable};
pub use cs_element::{
    CsCallSite, CsCallSiteId, CsMethod, CsMethodId, CsObj, CsObjId, PointerId, PointerKey,
};
pub use heap::{AllocSite, Obj, ObjId};
pub use points_to_set::PointsToSet;
