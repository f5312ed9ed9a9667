//! High-Level Points-to Analyzer
//!
//! # Usage
//! ```
//! use codegraph_pta::config::{PTAConfig, Preset};
//! use codegraph_pta::features::points_to::PointerAnalysis;
//! use codegraph_pta::shared::models::{InvokeKind, MethodRef, ProgramBuilder, Type};
//!
//! let mut b = ProgramBuilder::new();
//! let a = b.add_class("A", None);
//! b.add_method(a, "void foo()", false, &[]);
//! let main = b.add_method(a, "void main()", true, &[]);
//! let x = b.var(main, "a");
//! b.new_object(main, x, Type::Class(a));
//! b.invoke(main, InvokeKind::Virtual, MethodRef::new(a, "void foo()"), Some(x), &[], None);
//! b.add_entry_method(main);
//! let program = b.build().unwrap();
//!
//! let analysis = PointerAnalysis::new(PTAConfig::from_preset(Preset::Fast)).unwrap();
//! let result = analysis.analyze(&program).unwrap();
//! assert_eq!(result.points_to(x).len(), 1);
//! assert_eq!(result.ci_call_graph().num_edges(), 1);
//! ```

use super::result::PointerAnalysisResult;
use crate::config::{PTAConfig, Preset};
use crate::errors::Result;
use crate::features::points_to::infrastructure::{AllocationSiteHeapModel, Solver};
use crate::features::points_to::ports::{HeapModel, PTAFactory};
use crate::shared::models::Program;
use rayon::prelude::*;
use tracing::info;

/// Configured pointer analysis, reusable across programs
#[derive(Debug, Clone)]
pub struct PointerAnalysis {
    config: PTAConfig,
}

impl Default for PointerAnalysis {
    fn default() -> Self {
        Self {
            config: PTAConfig::default(),
        }
    }
}

impl PointerAnalysis {
    /// Validates `config`
    pub fn new(config: PTAConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn from_preset(preset: Preset) -> Self {
        Self {
            config: PTAConfig::from_preset(preset),
        }
    }

    pub fn config(&self) -> &PTAConfig {
        &self.config
    }

    /// Solver for `program` with the configured context selector and the
    /// allocation-site heap model. Not yet run.
    pub fn solver<'p>(&self, program: &'p Program) -> Solver<'p> {
        self.solver_with_heap_model(program, Box::new(AllocationSiteHeapModel::new()))
    }

    pub fn solver_with_heap_model<'p>(
        &self,
        program: &'p Program,
        heap_model: Box<dyn HeapModel>,
    ) -> Solver<'p> {
        let selector =
            PTAFactory::create_selector(self.config.context, self.config.heap_context_depth);
        Solver::new(program, selector, heap_model)
    }

    /// Run to fixpoint
    pub fn analyze<'p>(&self, program: &'p Program) -> Result<PointerAnalysisResult<'p>> {
        let mut solver = self.solver(program);
        solver.solve()?;
        Ok(PointerAnalysisResult::from_solver(solver, self.config.collect_stats))
    }

    /// Run with a custom heap model
    pub fn analyze_with_heap_model<'p>(
        &self,
        program: &'p Program,
        heap_model: Box<dyn HeapModel>,
    ) -> Result<PointerAnalysisResult<'p>> {
        let mut solver = self.solver_with_heap_model(program, heap_model);
        solver.solve()?;
        Ok(PointerAnalysisResult::from_solver(solver, self.config.collect_stats))
    }
}

/// Analyse independent programs in parallel
///
/// Each program gets its own single-threaded solver; results come back in
/// input order.
pub fn analyze_batch<'p>(
    analysis: &PointerAnalysis,
    programs: &'p [Program],
) -> Vec<Result<PointerAnalysisResult<'p>>> {
    info!(
        "Batch points-to analysis: {} programs on {} threads",
        programs.len(),
        rayon::current_num_threads()
    );
    programs
        .par_iter()
        .map(|program| analysis.analyze(program))
        .collect()
}
