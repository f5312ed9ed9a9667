//! Context-sensitive element manager
//!
//! Canonicalising arenas for pointers, CS objects, CS methods and CS call
//! sites. Structurally equal keys always yield the same id, and each
//! pointer owns exactly one [`PointsToSet`].

use crate::features::points_to::domain::{
    ContextId, CsCallSite, CsCallSiteId, CsMethod, CsMethodId, CsObj, CsObjId, ObjId, PointerId,
    PointerKey, PointsToSet,
};
use crate::shared::models::{FieldId, InvokeId, MethodId, VarId};
use rustc_hash::FxHashMap;
use std::hash::Hash;

/// Arena with structural lookup
#[derive(Debug, Clone)]
struct Interner<K> {
    items: Vec<K>,
    index: FxHashMap<K, u32>,
}

impl<K: Copy + Eq + Hash> Interner<K> {
    fn new() -> Self {
        Self {
            items: Vec::new(),
            index: FxHashMap::default(),
        }
    }

    /// (index, newly created)
    fn intern(&mut self, key: K) -> (u32, bool) {
        if let Some(i) = self.index.get(&key) {
            return (*i, false);
        }
        let i = self.items.len() as u32;
        self.items.push(key);
        self.index.insert(key, i);
        (i, true)
    }

    fn get(&self, key: &K) -> Option<u32> {
        self.index.get(key).copied()
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}

#[derive(Debug, Clone)]
pub struct CsManager {
    pointers: Interner<PointerKey>,
    points_to: Vec<PointsToSet>,
    objs: Interner<CsObj>,
    methods: Interner<CsMethod>,
    call_sites: Interner<CsCallSite>,
}

impl Default for CsManager {
    fn default() -> Self {
        Self::new()
    }
}

impl CsManager {
    pub fn new() -> Self {
        Self {
            pointers: Interner::new(),
            points_to: Vec::new(),
            objs: Interner::new(),
            methods: Interner::new(),
            call_sites: Interner::new(),
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Pointers
    // ═══════════════════════════════════════════════════════════════════════

    pub fn pointer(&mut self, key: PointerKey) -> PointerId {
        let (i, created) = self.pointers.intern(key);
        if created {
            self.points_to.push(PointsToSet::new());
        }
        PointerId(i)
    }

    pub fn cs_var(&mut self, context: ContextId, var: VarId) -> PointerId {
        self.pointer(PointerKey::Var { context, var })
    }

    pub fn static_field(&mut self, field: FieldId) -> PointerId {
        self.pointer(PointerKey::StaticField(field))
    }

    pub fn instance_field(&mut self, base: CsObjId, field: FieldId) -> PointerId {
        self.pointer(PointerKey::InstanceField { base, field })
    }

    pub fn array_index(&mut self, base: CsObjId) -> PointerId {
        self.pointer(PointerKey::ArrayIndex(base))
    }

    /// Lookup without creating
    pub fn find_pointer(&self, key: &PointerKey) -> Option<PointerId> {
        self.pointers.get(key).map(PointerId)
    }

    pub fn pointer_key(&self, pointer: PointerId) -> PointerKey {
        self.pointers.items[pointer.index()]
    }

    pub fn points_to_set(&self, pointer: PointerId) -> &PointsToSet {
        &self.points_to[pointer.index()]
    }

    pub(crate) fn points_to_set_mut(&mut self, pointer: PointerId) -> &mut PointsToSet {
        &mut self.points_to[pointer.index()]
    }

    pub fn pointers(&self) -> impl Iterator<Item = (PointerId, PointerKey)> + '_ {
        self.pointers
            .items
            .iter()
            .enumerate()
            .map(|(i, k)| (PointerId::from_index(i), *k))
    }

    pub fn cs_vars(&self) -> impl Iterator<Item = (PointerId, ContextId, VarId)> + '_ {
        self.pointers().filter_map(|(id, key)| match key {
            PointerKey::Var { context, var } => Some((id, context, var)),
            _ => None,
        })
    }

    pub fn static_fields(&self) -> impl Iterator<Item = (PointerId, FieldId)> + '_ {
        self.pointers().filter_map(|(id, key)| match key {
            PointerKey::StaticField(field) => Some((id, field)),
            _ => None,
        })
    }

    pub fn instance_fields(&self) -> impl Iterator<Item = (PointerId, CsObjId, FieldId)> + '_ {
        self.pointers().filter_map(|(id, key)| match key {
            PointerKey::InstanceField { base, field } => Some((id, base, field)),
            _ => None,
        })
    }

    pub fn array_indexes(&self) -> impl Iterator<Item = (PointerId, CsObjId)> + '_ {
        self.pointers().filter_map(|(id, key)| match key {
            PointerKey::ArrayIndex(base) => Some((id, base)),
            _ => None,
        })
    }

    pub fn num_pointers(&self) -> usize {
        self.pointers.len()
    }

    // ═══════════════════════════════════════════════════════════════════════
    // CS objects, methods, call sites
    // ═══════════════════════════════════════════════════════════════════════

    pub fn cs_obj(&mut self, context: ContextId, obj: ObjId) -> CsObjId {
        CsObjId(self.objs.intern(CsObj { context, obj }).0)
    }

    pub fn cs_obj_of(&self, id: CsObjId) -> CsObj {
        self.objs.items[id.index()]
    }

    pub fn num_cs_objs(&self) -> usize {
        self.objs.len()
    }

    pub fn cs_method(&mut self, context: ContextId, method: MethodId) -> CsMethodId {
        CsMethodId(self.methods.intern(CsMethod { context, method }).0)
    }

    pub fn cs_method_of(&self, id: CsMethodId) -> CsMethod {
        self.methods.items[id.index()]
    }

    pub fn find_cs_method(&self, context: ContextId, method: MethodId) -> Option<CsMethodId> {
        self.methods.get(&CsMethod { context, method }).map(CsMethodId)
    }

    pub fn num_cs_methods(&self) -> usize {
        self.methods.len()
    }

    pub fn cs_call_site(&mut self, context: ContextId, invoke: InvokeId) -> CsCallSiteId {
        CsCallSiteId(self.call_sites.intern(CsCallSite { context, invoke }).0)
    }

    pub fn cs_call_site_of(&self, id: CsCallSiteId) -> CsCallSite {
        self.call_sites.items[id.index()]
    }
}
