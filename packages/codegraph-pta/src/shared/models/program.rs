//! Program IR
//!
//! Read-only view of the analysed program: classes, fields, methods,
//! variables and call sites, all addressed by typed ids. Built once by
//! [`ProgramBuilder`](super::builder::ProgramBuilder) and shared immutably by
//! every analysis afterwards.

use super::ids::{ClassId, FieldId, InvokeId, MethodId, VarId};
use super::stmt::{Invoke, Stmt};
use super::types::{Subsignature, Type};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Class or interface declaration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Class {
    pub name: String,
    pub super_class: Option<ClassId>,
    /// Directly implemented interfaces (or extended ones, for interfaces)
    pub interfaces: Vec<ClassId>,
    pub is_interface: bool,
    pub is_abstract: bool,
    /// Declared methods by subsignature
    pub methods: FxHashMap<Subsignature, MethodId>,
    pub fields: Vec<FieldId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub class: ClassId,
    pub is_static: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Method {
    pub name: String,
    pub class: ClassId,
    pub subsignature: Subsignature,
    pub is_static: bool,
    pub is_abstract: bool,
    /// `this` variable; present for every non-static method
    pub this: Option<VarId>,
    pub params: Vec<VarId>,
    /// Variables appearing in `return` statements
    pub return_vars: Vec<VarId>,
    pub stmts: Vec<Stmt>,
}

impl Method {
    pub fn param(&self, i: usize) -> Option<VarId> {
        self.params.get(i).copied()
    }
}

/// Statements that use a variable as base or receiver.
///
/// The solver revisits exactly these when a new object reaches the
/// variable, so they are indexed up front.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VarUses {
    /// `var.f = rhs` as `(f, rhs)`
    pub store_fields: Vec<(FieldId, VarId)>,
    /// `lhs = var.f` as `(f, lhs)`
    pub load_fields: Vec<(FieldId, VarId)>,
    /// `var[*] = rhs`
    pub store_arrays: Vec<VarId>,
    /// `lhs = var[*]`
    pub load_arrays: Vec<VarId>,
    /// Instance invocations with `var` as receiver
    pub invokes: Vec<InvokeId>,
}

impl VarUses {
    pub fn is_empty(&self) -> bool {
        self.store_fields.is_empty()
            && self.load_fields.is_empty()
            && self.store_arrays.is_empty()
            && self.load_arrays.is_empty()
            && self.invokes.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Var {
    pub name: String,
    pub method: MethodId,
    pub uses: VarUses,
}

/// Whole-program IR
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Program {
    pub(crate) classes: Vec<Class>,
    pub(crate) fields: Vec<Field>,
    pub(crate) methods: Vec<Method>,
    pub(crate) vars: Vec<Var>,
    pub(crate) invokes: Vec<Invoke>,
    pub(crate) entry_methods: Vec<MethodId>,
    /// Root class used to dispatch calls on array objects
    pub(crate) object_class: Option<ClassId>,
}

impl Program {
    // ═══════════════════════════════════════════════════════════════════════
    // Entity access
    // ═══════════════════════════════════════════════════════════════════════

    #[inline]
    pub fn class(&self, id: ClassId) -> &Class {
        &self.classes[id.index()]
    }

    #[inline]
    pub fn field(&self, id: FieldId) -> &Field {
        &self.fields[id.index()]
    }

    #[inline]
    pub fn method(&self, id: MethodId) -> &Method {
        &self.methods[id.index()]
    }

    #[inline]
    pub fn var(&self, id: VarId) -> &Var {
        &self.vars[id.index()]
    }

    #[inline]
    pub fn invoke(&self, id: InvokeId) -> &Invoke {
        &self.invokes[id.index()]
    }

    #[inline]
    pub fn var_uses(&self, id: VarId) -> &VarUses {
        &self.vars[id.index()].uses
    }

    pub fn classes(&self) -> impl Iterator<Item = (ClassId, &Class)> + '_ {
        self.classes
            .iter()
            .enumerate()
            .map(|(i, c)| (ClassId::from_index(i), c))
    }

    pub fn methods(&self) -> impl Iterator<Item = (MethodId, &Method)> + '_ {
        self.methods
            .iter()
            .enumerate()
            .map(|(i, m)| (MethodId::from_index(i), m))
    }

    pub fn vars(&self) -> impl Iterator<Item = (VarId, &Var)> + '_ {
        self.vars
            .iter()
            .enumerate()
            .map(|(i, v)| (VarId::from_index(i), v))
    }

    /// Call sites of `method`, in statement order
    pub fn invokes_in(&self, method: MethodId) -> impl Iterator<Item = InvokeId> + '_ {
        self.method(method).stmts.iter().filter_map(|s| match s {
            Stmt::Invoke(id) => Some(*id),
            _ => None,
        })
    }

    pub fn entry_methods(&self) -> &[MethodId] {
        &self.entry_methods
    }

    pub fn object_class(&self) -> Option<ClassId> {
        self.object_class
    }

    pub fn num_classes(&self) -> usize {
        self.classes.len()
    }

    pub fn num_methods(&self) -> usize {
        self.methods.len()
    }

    pub fn num_vars(&self) -> usize {
        self.vars.len()
    }

    pub fn num_invokes(&self) -> usize {
        self.invokes.len()
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Lookup by name
    // ═══════════════════════════════════════════════════════════════════════

    pub fn find_class(&self, name: &str) -> Option<ClassId> {
        self.classes
            .iter()
            .position(|c| c.name == name)
            .map(ClassId::from_index)
    }

    pub fn find_method(&self, class_name: &str, subsignature: &str) -> Option<MethodId> {
        let class = self.find_class(class_name)?;
        self.class(class)
            .methods
            .get(&Subsignature::new(subsignature))
            .copied()
    }

    pub fn find_field(&self, class_name: &str, field_name: &str) -> Option<FieldId> {
        let class = self.find_class(class_name)?;
        self.class(class)
            .fields
            .iter()
            .copied()
            .find(|f| self.field(*f).name == field_name)
    }

    /// Variable named `name` declared in `method`
    pub fn find_var(&self, method: MethodId, name: &str) -> Option<VarId> {
        self.vars
            .iter()
            .position(|v| v.method == method && v.name == name)
            .map(VarId::from_index)
    }

    /// `Class.method/var` style name for diagnostics
    pub fn var_display(&self, id: VarId) -> String {
        let var = self.var(id);
        format!("{}/{}", self.method_display(var.method), var.name)
    }

    pub fn method_display(&self, id: MethodId) -> String {
        let method = self.method(id);
        format!("{}.{}", self.class(method.class).name, method.name)
    }

    /// Class names instead of ids, `[]` per array dimension
    pub fn type_display(&self, ty: &Type) -> String {
        match ty {
            Type::Class(c) => self.class(*c).name.clone(),
            Type::Array(elem) => format!("{}[]", self.type_display(elem)),
        }
    }
}
