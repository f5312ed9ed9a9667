//! Shared models: the program IR consumed by every analysis

pub mod builder;
pub mod ids;
pub mod program;
pub mod stmt;
pub mod types;

pub use builder::ProgramBuilder;
pub use ids::{ClassId, FieldId, InvokeId, MethodId, VarId};
pub use program::{Class, Field, Method, Program, Var, VarUses};
pub use stmt::{FieldAccess, Invoke, InvokeKind, Stmt};
pub use types::{MethodRef, Subsignature, Type};
