//! Calling contexts
//!
//! A context is a short sequence of call sites, allocation sites or types
//! depending on the selector in use:
//! - **Call-string (k-CFA)**: k most recent call sites
//! - **Object sensitivity**: allocation sites of the receiver chain
//! - **Type sensitivity**: classes containing those allocation sites
//!
//! Contexts are interned in a [`ContextTable`]; structurally equal
//! sequences always map to the same [`ContextId`], so contexts compare and
//! hash as plain integers.

use super::heap::ObjId;
use crate::shared::models::ids::define_id;
use crate::shared::models::{ClassId, InvokeId};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

define_id!(
    /// Interned context
    ContextId,
    "ctx#"
);

impl ContextId {
    /// The empty context, always interned first
    pub const EMPTY: ContextId = ContextId(0);

    pub fn is_empty(self) -> bool {
        self == Self::EMPTY
    }
}

/// One element of a context sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ContextElement {
    CallSite(InvokeId),
    Object(ObjId),
    Type(ClassId),
}

impl fmt::Display for ContextElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextElement::CallSite(cs) => write!(f, "{}", cs),
            ContextElement::Object(o) => write!(f, "{}", o),
            ContextElement::Type(t) => write!(f, "{}", t),
        }
    }
}

/// Interning table for contexts
#[derive(Debug, Clone)]
pub struct ContextTable {
    contexts: Vec<Vec<ContextElement>>,
    index: FxHashMap<Vec<ContextElement>, ContextId>,
}

impl Default for ContextTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextTable {
    pub fn new() -> Self {
        let mut table = Self {
            contexts: Vec::new(),
            index: FxHashMap::default(),
        };
        let empty = table.intern(Vec::new());
        debug_assert_eq!(empty, ContextId::EMPTY);
        table
    }

    /// Canonical id for `elements`
    pub fn intern(&mut self, elements: Vec<ContextElement>) -> ContextId {
        if let Some(id) = self.index.get(&elements) {
            return *id;
        }
        let id = ContextId::from_index(self.contexts.len());
        self.contexts.push(elements.clone());
        self.index.insert(elements, id);
        id
    }

    pub fn elements(&self, context: ContextId) -> &[ContextElement] {
        &self.contexts[context.index()]
    }

    pub fn depth(&self, context: ContextId) -> usize {
        self.contexts[context.index()].len()
    }

    /// `parent ++ [elem]`, keeping only the last `limit` elements
    pub fn append(&mut self, parent: ContextId, elem: ContextElement, limit: usize) -> ContextId {
        if limit == 0 {
            return ContextId::EMPTY;
        }
        let parent_elems = self.elements(parent);
        let keep = parent_elems.len().min(limit - 1);
        let mut elements = Vec::with_capacity(keep + 1);
        elements.extend_from_slice(&parent_elems[parent_elems.len() - keep..]);
        elements.push(elem);
        self.intern(elements)
    }

    /// Last `limit` elements of `context`
    pub fn truncate(&mut self, context: ContextId, limit: usize) -> ContextId {
        let elems = self.elements(context);
        if elems.len() <= limit {
            return context;
        }
        let suffix = elems[elems.len() - limit..].to_vec();
        self.intern(suffix)
    }

    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }

    /// `[e1, e2]` rendering for diagnostics
    pub fn display(&self, context: ContextId) -> String {
        let parts: Vec<String> = self.elements(context).iter().map(|e| e.to_string()).collect();
        format!("[{}]", parts.join(", "))
    }
}
