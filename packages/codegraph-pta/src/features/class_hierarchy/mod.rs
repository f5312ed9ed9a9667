//! Class hierarchy
//!
//! Subtype tables and dispatch over the program IR. Construction from
//! bytecode is a front-end concern; this module only derives lookups from
//! the declared `super_class`/`interfaces` links.

pub mod hierarchy;

pub use hierarchy::ClassHierarchy;
