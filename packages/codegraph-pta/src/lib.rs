/*
 * Codegraph PTA - Pointer Analysis Engine
 *
 * Feature-First Hexagonal Architecture:
 * - shared/      : Program IR (classes, methods, statements) + builder
 * - features/    : Vertical slices (class_hierarchy → call_graph → points_to)
 * - config/      : Presets, YAML loading, validation
 * - errors       : Crate error type
 *
 * The points-to solver is single-threaded per program; rayon is used only
 * to analyse independent programs side by side.
 */

// Crate-level lint configuration
#![allow(clippy::new_without_default)] // Default impl not always needed
#![allow(clippy::module_inception)] // Module naming intentional
#![allow(clippy::len_without_is_empty)] // Arena sizes, never empty-checked

/// Shared models (program IR)
pub mod shared;

/// Feature modules
pub mod features;

/// Configuration system
pub mod config;

/// Error types
pub mod errors;

// ═══════════════════════════════════════════════════════════════════════════
// Re-exports for Public API
// ═══════════════════════════════════════════════════════════════════════════

pub use config::{ContextStrategy, PTAConfig, Preset};
pub use errors::{PtaError, Result};
pub use features::call_graph::{CallEdge, CallGraph, CallKind, ChaBuilder};
pub use features::class_hierarchy::ClassHierarchy;
pub use features::points_to::{analyze_batch, PointerAnalysis, PointerAnalysisResult};
pub use shared::models::{Program, ProgramBuilder};
