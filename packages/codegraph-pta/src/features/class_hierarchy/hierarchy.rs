//! Class hierarchy queries and method dispatch
//!
//! Inverts the `super_class`/`interfaces` links of the program into direct
//! subclass, subinterface and implementor tables, and answers the lookups
//! the call-graph builders need.

use crate::shared::models::{ClassId, MethodId, MethodRef, Program, Subsignature, Type};
use rustc_hash::FxHashSet;
use std::collections::VecDeque;

/// Class hierarchy derived from a [`Program`]
#[derive(Debug)]
pub struct ClassHierarchy<'p> {
    program: &'p Program,
    direct_subclasses: Vec<Vec<ClassId>>,
    direct_subinterfaces: Vec<Vec<ClassId>>,
    direct_implementors: Vec<Vec<ClassId>>,
}

impl<'p> ClassHierarchy<'p> {
    pub fn new(program: &'p Program) -> Self {
        let n = program.num_classes();
        let mut direct_subclasses = vec![Vec::new(); n];
        let mut direct_subinterfaces = vec![Vec::new(); n];
        let mut direct_implementors = vec![Vec::new(); n];

        for (id, class) in program.classes() {
            if let Some(sup) = class.super_class {
                direct_subclasses[sup.index()].push(id);
            }
            for iface in &class.interfaces {
                if class.is_interface {
                    direct_subinterfaces[iface.index()].push(id);
                } else {
                    direct_implementors[iface.index()].push(id);
                }
            }
        }

        Self {
            program,
            direct_subclasses,
            direct_subinterfaces,
            direct_implementors,
        }
    }

    pub fn program(&self) -> &'p Program {
        self.program
    }

    pub fn super_class_of(&self, class: ClassId) -> Option<ClassId> {
        self.program.class(class).super_class
    }

    pub fn direct_subclasses_of(&self, class: ClassId) -> &[ClassId] {
        &self.direct_subclasses[class.index()]
    }

    pub fn direct_subinterfaces_of(&self, interface: ClassId) -> &[ClassId] {
        &self.direct_subinterfaces[interface.index()]
    }

    pub fn direct_implementors_of(&self, interface: ClassId) -> &[ClassId] {
        &self.direct_implementors[interface.index()]
    }

    pub fn is_interface(&self, class: ClassId) -> bool {
        self.program.class(class).is_interface
    }

    /// Method declared by `class` itself
    pub fn declared_method(&self, class: ClassId, subsig: &Subsignature) -> Option<MethodId> {
        self.program.class(class).methods.get(subsig).copied()
    }

    /// Whether `sub` equals `sup` or inherits from it
    pub fn is_subtype(&self, sub: ClassId, sup: ClassId) -> bool {
        let mut queue = VecDeque::from([sub]);
        let mut seen = FxHashSet::default();
        while let Some(c) = queue.pop_front() {
            if c == sup {
                return true;
            }
            if !seen.insert(c) {
                continue;
            }
            let class = self.program.class(c);
            queue.extend(class.super_class);
            queue.extend(class.interfaces.iter().copied());
        }
        false
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Resolution
    // ═══════════════════════════════════════════════════════════════════════

    /// Resolve a symbolic reference: declared lookup in the named class,
    /// then up the superclass chain. Abstract methods qualify.
    pub fn resolve_method(&self, method_ref: &MethodRef) -> Option<MethodId> {
        let mut current = Some(method_ref.class);
        while let Some(c) = current {
            if let Some(m) = self.declared_method(c, &method_ref.subsignature) {
                return Some(m);
            }
            current = self.super_class_of(c);
        }
        None
    }

    /// Most-derived concrete method for `subsig` starting at `class`.
    ///
    /// Walks the superclass chain first; if no class declares a
    /// non-abstract method, falls back to default methods of the
    /// interfaces implemented along the chain.
    pub fn dispatch(&self, class: ClassId, subsig: &Subsignature) -> Option<MethodId> {
        let mut current = Some(class);
        while let Some(c) = current {
            if let Some(m) = self.declared_method(c, subsig) {
                if !self.program.method(m).is_abstract {
                    return Some(m);
                }
            }
            current = self.super_class_of(c);
        }
        self.dispatch_default(class, subsig)
    }

    /// Callee of a static call: declared lookup, static methods only
    pub fn resolve_static(&self, method_ref: &MethodRef) -> Option<MethodId> {
        self.resolve_method(method_ref)
            .filter(|m| self.program.method(*m).is_static)
    }

    /// Callee of a special call (constructor, private or super call):
    /// dispatch on the declaring class, independent of the receiver
    pub fn resolve_special(&self, method_ref: &MethodRef) -> Option<MethodId> {
        self.dispatch(method_ref.class, &method_ref.subsignature)
    }

    /// Dispatch on the runtime type of an object
    pub fn dispatch_on_type(&self, ty: &Type, subsig: &Subsignature) -> Option<MethodId> {
        match ty {
            Type::Class(c) => self.dispatch(*c, subsig),
            Type::Array(_) => self
                .program
                .object_class()
                .and_then(|root| self.dispatch(root, subsig)),
        }
    }

    fn dispatch_default(&self, class: ClassId, subsig: &Subsignature) -> Option<MethodId> {
        let mut queue: VecDeque<ClassId> = VecDeque::new();
        let mut current = Some(class);
        while let Some(c) = current {
            queue.extend(self.program.class(c).interfaces.iter().copied());
            current = self.super_class_of(c);
        }
        let mut seen = FxHashSet::default();
        while let Some(iface) = queue.pop_front() {
            if !seen.insert(iface) {
                continue;
            }
            if let Some(m) = self.declared_method(iface, subsig) {
                if !self.program.method(m).is_abstract {
                    return Some(m);
                }
            }
            queue.extend(self.program.class(iface).interfaces.iter().copied());
        }
        None
    }

    /// `class` and every class/interface below it, breadth-first
    pub fn all_subtypes_of(&self, class: ClassId) -> Vec<ClassId> {
        let mut out = Vec::new();
        let mut seen = FxHashSet::default();
        let mut queue = VecDeque::from([class]);
        while let Some(c) = queue.pop_front() {
            if !seen.insert(c) {
                continue;
            }
            out.push(c);
            if self.is_interface(c) {
                queue.extend(self.direct_implementors_of(c).iter().copied());
                queue.extend(self.direct_subinterfaces_of(c).iter().copied());
            } else {
                queue.extend(self.direct_subclasses_of(c).iter().copied());
            }
        }
        out
    }
}
