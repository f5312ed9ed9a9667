//! Allocation-site heap abstraction: one abstract object per `new`
//! statement.

use crate::features::points_to::domain::{AllocSite, Obj, ObjId};
use crate::features::points_to::ports::HeapModel;
use crate::shared::models::{MethodId, Program, Type};
use rustc_hash::FxHashMap;

#[derive(Debug, Default)]
pub struct AllocationSiteHeapModel {
    objects: Vec<Obj>,
    by_site: FxHashMap<AllocSite, ObjId>,
}

impl AllocationSiteHeapModel {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HeapModel for AllocationSiteHeapModel {
    fn obj_of(&mut self, program: &Program, method: MethodId, index: usize, ty: &Type) -> ObjId {
        let site = AllocSite { method, index };
        if let Some(id) = self.by_site.get(&site) {
            return *id;
        }
        let id = ObjId::from_index(self.objects.len());
        self.objects.push(Obj {
            id,
            site,
            ty: ty.clone(),
            container_class: program.method(method).class,
        });
        self.by_site.insert(site, id);
        id
    }

    fn obj(&self, id: ObjId) -> &Obj {
        &self.objects[id.index()]
    }

    fn objects(&self) -> &[Obj] {
        &self.objects
    }
}
