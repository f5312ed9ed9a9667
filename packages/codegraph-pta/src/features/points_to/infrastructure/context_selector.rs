//! Context selectors
//!
//! - **ci**: every method and object in the empty context
//! - **k-call**: last k call sites (k-CFA)
//! - **k-obj**: allocation sites of the receiver chain
//! - **k-type**: classes declaring those allocation sites
//!
//! Heap contexts are the allocating method's context cut to its last `hk`
//! elements. Under object and type sensitivity a static call inherits the
//! caller's context.
//!
//! # References
//! - Milanova et al. "Parameterized Object Sensitivity" (TOSEM 2005)
//! - Smaragdakis et al. "Pick Your Contexts Well" (POPL 2011)

use crate::features::points_to::domain::{
    ContextElement, ContextId, ContextTable, CsCallSite, CsMethod, CsObj, Obj,
};
use crate::features::points_to::ports::ContextSelector;
use crate::shared::models::MethodId;

/// Everything in the empty context
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextInsensitiveSelector;

impl ContextSelector for ContextInsensitiveSelector {
    fn select_context(&self, _: &mut ContextTable, _: CsCallSite, _: MethodId) -> ContextId {
        ContextId::EMPTY
    }

    fn select_instance_context(
        &self,
        _: &mut ContextTable,
        _: CsCallSite,
        _: CsObj,
        _: &Obj,
        _: MethodId,
    ) -> ContextId {
        ContextId::EMPTY
    }

    fn select_heap_context(&self, _: &mut ContextTable, _: CsMethod, _: &Obj) -> ContextId {
        ContextId::EMPTY
    }

    fn name(&self) -> String {
        "ci".to_string()
    }
}

/// k-limited call-string sensitivity
#[derive(Debug, Clone, Copy)]
pub struct CallSiteSelector {
    k: usize,
    hk: usize,
}

impl CallSiteSelector {
    pub fn new(k: usize, hk: usize) -> Self {
        Self { k, hk }
    }
}

impl ContextSelector for CallSiteSelector {
    fn select_context(
        &self,
        contexts: &mut ContextTable,
        call_site: CsCallSite,
        _callee: MethodId,
    ) -> ContextId {
        contexts.append(
            call_site.context,
            ContextElement::CallSite(call_site.invoke),
            self.k,
        )
    }

    fn select_instance_context(
        &self,
        contexts: &mut ContextTable,
        call_site: CsCallSite,
        _recv: CsObj,
        _recv_obj: &Obj,
        callee: MethodId,
    ) -> ContextId {
        self.select_context(contexts, call_site, callee)
    }

    fn select_heap_context(&self, contexts: &mut ContextTable, method: CsMethod, _: &Obj) -> ContextId {
        contexts.truncate(method.context, self.hk)
    }

    fn name(&self) -> String {
        format!("{}-call", self.k)
    }
}

/// k-limited object sensitivity
#[derive(Debug, Clone, Copy)]
pub struct ObjectSelector {
    k: usize,
    hk: usize,
}

impl ObjectSelector {
    pub fn new(k: usize, hk: usize) -> Self {
        Self { k, hk }
    }
}

impl ContextSelector for ObjectSelector {
    fn select_context(&self, _: &mut ContextTable, call_site: CsCallSite, _: MethodId) -> ContextId {
        call_site.context
    }

    fn select_instance_context(
        &self,
        contexts: &mut ContextTable,
        _call_site: CsCallSite,
        recv: CsObj,
        _recv_obj: &Obj,
        _callee: MethodId,
    ) -> ContextId {
        contexts.append(recv.context, ContextElement::Object(recv.obj), self.k)
    }

    fn select_heap_context(&self, contexts: &mut ContextTable, method: CsMethod, _: &Obj) -> ContextId {
        contexts.truncate(method.context, self.hk)
    }

    fn name(&self) -> String {
        format!("{}-obj", self.k)
    }
}

/// k-limited type sensitivity
#[derive(Debug, Clone, Copy)]
pub struct TypeSelector {
    k: usize,
    hk: usize,
}

impl TypeSelector {
    pub fn new(k: usize, hk: usize) -> Self {
        Self { k, hk }
    }
}

impl ContextSelector for TypeSelector {
    fn select_context(&self, _: &mut ContextTable, call_site: CsCallSite, _: MethodId) -> ContextId {
        call_site.context
    }

    fn select_instance_context(
        &self,
        contexts: &mut ContextTable,
        _call_site: CsCallSite,
        recv: CsObj,
        recv_obj: &Obj,
        _callee: MethodId,
    ) -> ContextId {
        contexts.append(
            recv.context,
            ContextElement::Type(recv_obj.container_class),
            self.k,
        )
    }

    fn select_heap_context(&self, contexts: &mut ContextTable, method: CsMethod, _: &Obj) -> ContextId {
        contexts.truncate(method.context, self.hk)
    }

    fn name(&self) -> String {
        format!("{}-type", self.k)
    }
}
