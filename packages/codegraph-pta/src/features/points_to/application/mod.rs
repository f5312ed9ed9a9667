//! Application layer for Points-to Analysis
//!
//! - **PointerAnalysis**: configured entry point (config → solver → result)
//! - **analyze_batch**: independent programs in parallel
//! - **PointerAnalysisResult**: CS and CI queries, call graphs, summary

pub mod analyzer;
pub mod result;

pub use analyzer::{analyze_batch, PointerAnalysis};
pub use result::{AnalysisSummary, CallEdgeSummary, PointerAnalysisResult, VarPointsTo};
