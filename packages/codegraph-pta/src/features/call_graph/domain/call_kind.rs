//! Call edge classification

use crate::shared::models::{Invoke, InvokeKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Dispatch kind of a call edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallKind {
    /// Direct call, unique target
    Static,
    /// Constructor/private/super call, resolved on the declaring class
    Special,
    /// Dispatch on the receiver's runtime class
    Virtual,
    /// Same resolution as `Virtual`, kept apart for reporting
    Interface,
}

impl CallKind {
    pub fn of(invoke: &Invoke) -> Self {
        invoke.kind.into()
    }

    /// Whether the callee depends on the receiver's runtime type
    pub fn is_dynamic(&self) -> bool {
        matches!(self, CallKind::Virtual | CallKind::Interface)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CallKind::Static => "static",
            CallKind::Special => "special",
            CallKind::Virtual => "virtual",
            CallKind::Interface => "interface",
        }
    }
}

impl From<InvokeKind> for CallKind {
    fn from(kind: InvokeKind) -> Self {
        match kind {
            InvokeKind::Static => CallKind::Static,
            InvokeKind::Special => CallKind::Special,
            InvokeKind::Virtual => CallKind::Virtual,
            InvokeKind::Interface => CallKind::Interface,
        }
    }
}

impl fmt::Display for CallKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
