//! Ports (Interfaces) for Points-to Analysis
//!
//! The solver is parameterised over two policies it treats as opaque:
//! - **HeapModel**: which abstract object an allocation statement creates
//! - **ContextSelector**: which context a callee or a new object gets
//!
//! Both are trait objects injected at construction time;
//! [`PTAFactory`] builds the selector named by a [`ContextStrategy`].

use crate::config::ContextStrategy;
use crate::features::points_to::domain::{
    ContextId, ContextTable, CsCallSite, CsMethod, CsObj, Obj, ObjId,
};
use crate::features::points_to::infrastructure::context_selector::{
    CallSiteSelector, ContextInsensitiveSelector, ObjectSelector, TypeSelector,
};
use crate::shared::models::{MethodId, Program, Type};

// ============================================================================
// Heap model
// ============================================================================

/// Maps allocation statements to abstract objects
pub trait HeapModel: Send + Sync {
    /// Object allocated by statement `index` of `method` with type `ty`.
    ///
    /// Must return the same id every time for the same statement.
    fn obj_of(&mut self, program: &Program, method: MethodId, index: usize, ty: &Type) -> ObjId;

    fn obj(&self, id: ObjId) -> &Obj;

    /// All objects created so far, in id order
    fn objects(&self) -> &[Obj];
}

// ============================================================================
// Context selection
// ============================================================================

/// Context sensitivity policy
///
/// Selectors intern the contexts they build in the solver's
/// [`ContextTable`], so a selector itself is stateless.
pub trait ContextSelector: Send + Sync {
    fn empty_context(&self) -> ContextId {
        ContextId::EMPTY
    }

    /// Context for the target of a static call
    fn select_context(
        &self,
        contexts: &mut ContextTable,
        call_site: CsCallSite,
        callee: MethodId,
    ) -> ContextId;

    /// Context for the target of an instance call on `recv`
    fn select_instance_context(
        &self,
        contexts: &mut ContextTable,
        call_site: CsCallSite,
        recv: CsObj,
        recv_obj: &Obj,
        callee: MethodId,
    ) -> ContextId;

    /// Heap context for `obj` allocated inside `method`
    fn select_heap_context(
        &self,
        contexts: &mut ContextTable,
        method: CsMethod,
        obj: &Obj,
    ) -> ContextId;

    /// Short name (`ci`, `2-obj`, ...) for logs and summaries
    fn name(&self) -> String;
}

// ============================================================================
// Factory
// ============================================================================

/// Factory for context selectors
pub struct PTAFactory;

impl PTAFactory {
    /// Selector for `strategy`. `heap_depth` overrides the default heap
    /// context depth of `k - 1`.
    pub fn create_selector(
        strategy: ContextStrategy,
        heap_depth: Option<usize>,
    ) -> Box<dyn ContextSelector> {
        let hk = |k: usize| heap_depth.unwrap_or(k.saturating_sub(1));
        match strategy {
            ContextStrategy::Insensitive => Box::new(ContextInsensitiveSelector),
            ContextStrategy::CallSite { k } => Box::new(CallSiteSelector::new(k, hk(k))),
            ContextStrategy::Object { k } => Box::new(ObjectSelector::new(k, hk(k))),
            ContextStrategy::Type { k } => Box::new(TypeSelector::new(k, hk(k))),
        }
    }
}
