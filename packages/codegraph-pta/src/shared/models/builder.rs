//! Program builder
//!
//! Front ends lower their input into a [`Program`] through this builder.
//! `build()` validates the structural preconditions the solver relies on
//! and derives the per-variable use index and return variables.
//!
//! # Example
//! ```
//! use codegraph_pta::shared::models::{InvokeKind, MethodRef, ProgramBuilder, Type};
//!
//! let mut b = ProgramBuilder::new();
//! let object = b.add_class("Object", None);
//! let a = b.add_class("A", Some(object));
//! let foo = b.add_method(a, "void foo()", false, &[]);
//! let main = b.add_method(object, "void main()", true, &[]);
//!
//! let x = b.var(main, "a");
//! b.new_object(main, x, Type::Class(a));
//! b.invoke(main, InvokeKind::Virtual, MethodRef::new(a, "void foo()"), Some(x), &[], None);
//! b.add_entry_method(main);
//!
//! let program = b.build().unwrap();
//! assert_eq!(program.num_methods(), 2);
//! # let _ = foo;
//! ```

use super::ids::{ClassId, FieldId, InvokeId, MethodId, VarId};
use super::program::{Class, Field, Method, Program, Var, VarUses};
use super::stmt::{FieldAccess, Invoke, InvokeKind, Stmt};
use super::types::{MethodRef, Subsignature, Type};
use crate::errors::{PtaError, Result};
use rustc_hash::FxHashMap;

/// Incremental constructor for [`Program`]
#[derive(Debug, Default)]
pub struct ProgramBuilder {
    program: Program,
    /// (method, name) → var, for get-or-create lookups
    var_names: FxHashMap<(MethodId, String), VarId>,
}

impl ProgramBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Declarations
    // ═══════════════════════════════════════════════════════════════════════

    pub fn add_class(&mut self, name: impl Into<String>, super_class: Option<ClassId>) -> ClassId {
        self.push_class(name.into(), super_class, Vec::new(), false, false)
    }

    pub fn add_abstract_class(
        &mut self,
        name: impl Into<String>,
        super_class: Option<ClassId>,
    ) -> ClassId {
        self.push_class(name.into(), super_class, Vec::new(), false, true)
    }

    pub fn add_interface(&mut self, name: impl Into<String>, super_interfaces: &[ClassId]) -> ClassId {
        self.push_class(name.into(), None, super_interfaces.to_vec(), true, true)
    }

    /// Record that `class` implements `interface`
    pub fn add_implements(&mut self, class: ClassId, interface: ClassId) {
        let interfaces = &mut self.program.classes[class.index()].interfaces;
        if !interfaces.contains(&interface) {
            interfaces.push(interface);
        }
    }

    /// Root class used when dispatching on array objects
    pub fn set_object_class(&mut self, class: ClassId) {
        self.program.object_class = Some(class);
    }

    pub fn add_field(&mut self, class: ClassId, name: impl Into<String>, is_static: bool) -> FieldId {
        let id = FieldId::from_index(self.program.fields.len());
        self.program.fields.push(Field {
            name: name.into(),
            class,
            is_static,
        });
        self.program.classes[class.index()].fields.push(id);
        id
    }

    /// Declare a concrete method. Non-static methods get a `this` variable.
    pub fn add_method(
        &mut self,
        class: ClassId,
        subsignature: impl Into<Subsignature>,
        is_static: bool,
        params: &[&str],
    ) -> MethodId {
        self.push_method(class, subsignature.into(), is_static, false, params)
    }

    /// Declare an abstract (bodiless, non-dispatchable) method
    pub fn add_abstract_method(
        &mut self,
        class: ClassId,
        subsignature: impl Into<Subsignature>,
        params: &[&str],
    ) -> MethodId {
        self.push_method(class, subsignature.into(), false, true, params)
    }

    pub fn add_entry_method(&mut self, method: MethodId) {
        if !self.program.entry_methods.contains(&method) {
            self.program.entry_methods.push(method);
        }
    }

    /// Variable `name` of `method`, created on first use
    pub fn var(&mut self, method: MethodId, name: &str) -> VarId {
        if let Some(id) = self.var_names.get(&(method, name.to_string())) {
            return *id;
        }
        self.push_var(method, name.to_string())
    }

    pub fn this_var(&self, method: MethodId) -> Option<VarId> {
        self.program.methods[method.index()].this
    }

    pub fn param(&self, method: MethodId, i: usize) -> Option<VarId> {
        self.program.methods[method.index()].param(i)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Statements
    // ═══════════════════════════════════════════════════════════════════════

    /// `lhs = new ty`
    pub fn new_object(&mut self, method: MethodId, lhs: VarId, ty: Type) {
        self.add_stmt(method, Stmt::New { lhs, ty });
    }

    /// `lhs = rhs`
    pub fn copy(&mut self, method: MethodId, lhs: VarId, rhs: VarId) {
        self.add_stmt(method, Stmt::Copy { lhs, rhs });
    }

    /// `lhs = base.field`
    pub fn load_field(&mut self, method: MethodId, lhs: VarId, base: VarId, field: FieldId) {
        let access = FieldAccess::Instance { base, field };
        self.add_stmt(method, Stmt::LoadField { lhs, access });
    }

    /// `base.field = rhs`
    pub fn store_field(&mut self, method: MethodId, base: VarId, field: FieldId, rhs: VarId) {
        let access = FieldAccess::Instance { base, field };
        self.add_stmt(method, Stmt::StoreField { access, rhs });
    }

    /// `lhs = T.field`
    pub fn load_static(&mut self, method: MethodId, lhs: VarId, field: FieldId) {
        let access = FieldAccess::Static(field);
        self.add_stmt(method, Stmt::LoadField { lhs, access });
    }

    /// `T.field = rhs`
    pub fn store_static(&mut self, method: MethodId, field: FieldId, rhs: VarId) {
        let access = FieldAccess::Static(field);
        self.add_stmt(method, Stmt::StoreField { access, rhs });
    }

    /// `lhs = base[i]`
    pub fn load_array(&mut self, method: MethodId, lhs: VarId, base: VarId) {
        self.add_stmt(method, Stmt::LoadArray { lhs, base });
    }

    /// `base[i] = rhs`
    pub fn store_array(&mut self, method: MethodId, base: VarId, rhs: VarId) {
        self.add_stmt(method, Stmt::StoreArray { base, rhs });
    }

    /// `[result =] receiver.m(args)` / `[result =] T.m(args)`
    pub fn invoke(
        &mut self,
        method: MethodId,
        kind: InvokeKind,
        method_ref: MethodRef,
        receiver: Option<VarId>,
        args: &[VarId],
        result: Option<VarId>,
    ) -> InvokeId {
        let id = InvokeId::from_index(self.program.invokes.len());
        let index = self.program.methods[method.index()].stmts.len();
        self.program.invokes.push(Invoke {
            kind,
            method_ref,
            receiver,
            args: args.to_vec(),
            result,
            container: method,
            index,
        });
        self.add_stmt(method, Stmt::Invoke(id));
        id
    }

    /// `return var`
    pub fn ret(&mut self, method: MethodId, var: Option<VarId>) {
        self.add_stmt(method, Stmt::Return(var));
    }

    /// Append a raw statement. `Stmt::Invoke` ids must come from [`Self::invoke`].
    pub fn add_stmt(&mut self, method: MethodId, stmt: Stmt) {
        self.program.methods[method.index()].stmts.push(stmt);
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Finalization
    // ═══════════════════════════════════════════════════════════════════════

    /// Validate and index the program
    pub fn build(mut self) -> Result<Program> {
        self.validate()?;
        self.index_uses();
        Ok(self.program)
    }

    fn validate(&self) -> Result<()> {
        let p = &self.program;
        self.validate_classes()?;
        for (mid, method) in p.methods() {
            if method.is_abstract && !method.stmts.is_empty() {
                return Err(PtaError::invalid_program(format!(
                    "abstract method {} has a body",
                    p.method_display(mid)
                )));
            }
            for stmt in &method.stmts {
                if let Stmt::Invoke(id) = stmt {
                    if id.index() >= p.invokes.len() || p.invoke(*id).container != mid {
                        return Err(PtaError::invalid_program(format!(
                            "{} in {} was not created by this builder",
                            id,
                            p.method_display(mid)
                        )));
                    }
                }
                for var in stmt_vars(p, stmt) {
                    if var.index() >= p.vars.len() || p.var(var).method != mid {
                        return Err(PtaError::invalid_program(format!(
                            "{} uses {} which belongs to another method",
                            p.method_display(mid),
                            var
                        )));
                    }
                }
                let at = || p.method_display(mid);
                match stmt {
                    Stmt::New { ty, .. } => check_type(p, ty, at)?,
                    Stmt::LoadField { access, .. } | Stmt::StoreField { access, .. } => {
                        check_field(p, access.field(), at)?
                    }
                    _ => {}
                }
                if let Stmt::Invoke(id) = stmt {
                    let invoke = p.invoke(*id);
                    check_class(p, invoke.method_ref.class, at)?;
                    if invoke.is_static() != invoke.receiver.is_none() {
                        return Err(PtaError::invalid_program(format!(
                            "{} in {} has {:?} kind but receiver {:?}",
                            id,
                            p.method_display(mid),
                            invoke.kind,
                            invoke.receiver
                        )));
                    }
                }
            }
        }
        for entry in &p.entry_methods {
            if entry.index() >= p.methods.len() {
                return Err(PtaError::invalid_program(format!(
                    "entry {} is not declared",
                    entry
                )));
            }
        }
        Ok(())
    }

    /// Class references in range, no class or interface among its own
    /// supertypes
    fn validate_classes(&self) -> Result<()> {
        let p = &self.program;
        for class in &p.classes {
            for sup in supertype_ids(class) {
                check_class(p, sup, || class.name.clone())?;
            }
        }
        if let Some(root) = p.object_class {
            check_class(p, root, || "set_object_class".to_string())?;
        }

        #[derive(Clone, Copy, PartialEq, Eq)]
        enum Mark {
            Unvisited,
            OnStack,
            Done,
        }
        let mut marks = vec![Mark::Unvisited; p.classes.len()];
        for (root, _) in p.classes() {
            if marks[root.index()] != Mark::Unvisited {
                continue;
            }
            marks[root.index()] = Mark::OnStack;
            let mut stack: Vec<(ClassId, usize)> = vec![(root, 0)];
            while let Some(frame) = stack.last_mut() {
                let (class, next) = *frame;
                frame.1 += 1;
                match supertype_ids(p.class(class)).nth(next) {
                    Some(sup) => match marks[sup.index()] {
                        Mark::OnStack => {
                            return Err(PtaError::invalid_program(format!(
                                "cyclic inheritance: {} is its own supertype",
                                p.class(sup).name
                            )));
                        }
                        Mark::Unvisited => {
                            marks[sup.index()] = Mark::OnStack;
                            stack.push((sup, 0));
                        }
                        Mark::Done => {}
                    },
                    None => {
                        marks[class.index()] = Mark::Done;
                        stack.pop();
                    }
                }
            }
        }
        Ok(())
    }

    fn index_uses(&mut self) {
        let p = &mut self.program;
        let mut uses: Vec<VarUses> = vec![VarUses::default(); p.vars.len()];
        for method in &mut p.methods {
            method.return_vars.clear();
            for stmt in &method.stmts {
                match stmt {
                    Stmt::StoreField {
                        access: FieldAccess::Instance { base, field },
                        rhs,
                    } => uses[base.index()].store_fields.push((*field, *rhs)),
                    Stmt::LoadField {
                        lhs,
                        access: FieldAccess::Instance { base, field },
                    } => uses[base.index()].load_fields.push((*field, *lhs)),
                    Stmt::StoreArray { base, rhs } => uses[base.index()].store_arrays.push(*rhs),
                    Stmt::LoadArray { lhs, base } => uses[base.index()].load_arrays.push(*lhs),
                    Stmt::Invoke(id) => {
                        if let Some(recv) = p.invokes[id.index()].receiver {
                            uses[recv.index()].invokes.push(*id);
                        }
                    }
                    Stmt::Return(Some(var)) => {
                        if !method.return_vars.contains(var) {
                            method.return_vars.push(*var);
                        }
                    }
                    _ => {}
                }
            }
        }
        for (var, u) in p.vars.iter_mut().zip(uses) {
            var.uses = u;
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Internals
    // ═══════════════════════════════════════════════════════════════════════

    fn push_class(
        &mut self,
        name: String,
        super_class: Option<ClassId>,
        interfaces: Vec<ClassId>,
        is_interface: bool,
        is_abstract: bool,
    ) -> ClassId {
        let id = ClassId::from_index(self.program.classes.len());
        self.program.classes.push(Class {
            name,
            super_class,
            interfaces,
            is_interface,
            is_abstract,
            methods: FxHashMap::default(),
            fields: Vec::new(),
        });
        id
    }

    fn push_method(
        &mut self,
        class: ClassId,
        subsignature: Subsignature,
        is_static: bool,
        is_abstract: bool,
        params: &[&str],
    ) -> MethodId {
        let id = MethodId::from_index(self.program.methods.len());
        self.program.methods.push(Method {
            name: method_name(&subsignature),
            class,
            subsignature: subsignature.clone(),
            is_static,
            is_abstract,
            this: None,
            params: Vec::new(),
            return_vars: Vec::new(),
            stmts: Vec::new(),
        });
        if !is_static {
            let this = self.push_var(id, "this".to_string());
            self.program.methods[id.index()].this = Some(this);
        }
        let params: Vec<VarId> = params
            .iter()
            .map(|name| self.push_var(id, (*name).to_string()))
            .collect();
        self.program.methods[id.index()].params = params;
        self.program.classes[class.index()]
            .methods
            .insert(subsignature, id);
        id
    }

    fn push_var(&mut self, method: MethodId, name: String) -> VarId {
        let id = VarId::from_index(self.program.vars.len());
        self.var_names.insert((method, name.clone()), id);
        self.program.vars.push(Var {
            name,
            method,
            uses: VarUses::default(),
        });
        id
    }
}

/// `"void foo(A)"` → `"foo"`
fn method_name(subsignature: &Subsignature) -> String {
    let sig = subsignature.as_str();
    let head = sig.split('(').next().unwrap_or(sig);
    head.rsplit(' ').next().unwrap_or(head).to_string()
}

/// Superclass first, then direct interfaces
fn supertype_ids(class: &Class) -> impl Iterator<Item = ClassId> + '_ {
    class.super_class.iter().chain(&class.interfaces).copied()
}

fn check_class(p: &Program, class: ClassId, at: impl FnOnce() -> String) -> Result<()> {
    if class.index() < p.classes.len() {
        return Ok(());
    }
    Err(PtaError::invalid_program(format!(
        "{} referenced by {} is not declared",
        class,
        at()
    )))
}

fn check_field(p: &Program, field: FieldId, at: impl FnOnce() -> String) -> Result<()> {
    if field.index() < p.fields.len() {
        return Ok(());
    }
    Err(PtaError::invalid_program(format!(
        "{} referenced by {} is not declared",
        field,
        at()
    )))
}

fn check_type(p: &Program, ty: &Type, at: impl FnOnce() -> String) -> Result<()> {
    match ty {
        Type::Class(c) => check_class(p, *c, at),
        Type::Array(elem) => check_type(p, elem, at),
    }
}

/// Every variable a statement mentions
fn stmt_vars(p: &Program, stmt: &Stmt) -> Vec<VarId> {
    match stmt {
        Stmt::New { lhs, .. } => vec![*lhs],
        Stmt::Copy { lhs, rhs } => vec![*lhs, *rhs],
        Stmt::LoadField { lhs, access } => match access {
            FieldAccess::Static(_) => vec![*lhs],
            FieldAccess::Instance { base, .. } => vec![*lhs, *base],
        },
        Stmt::StoreField { access, rhs } => match access {
            FieldAccess::Static(_) => vec![*rhs],
            FieldAccess::Instance { base, .. } => vec![*base, *rhs],
        },
        Stmt::LoadArray { lhs, base } => vec![*lhs, *base],
        Stmt::StoreArray { base, rhs } => vec![*base, *rhs],
        Stmt::Invoke(id) => {
            let invoke = p.invoke(*id);
            invoke
                .receiver
                .iter()
                .chain(invoke.args.iter())
                .chain(invoke.result.iter())
                .copied()
                .collect()
        }
        Stmt::Return(var) => var.iter().copied().collect(),
        Stmt::Nop => Vec::new(),
    }
}
