//! Configuration System
//!
//! Two levels:
//! - Level 1: Preset, a one-liner covering the common cases
//! - Level 2: YAML/builder overrides for complete control
//!
//! # Examples
//!
//! ```rust
//! use codegraph_pta::config::{ContextStrategy, PTAConfig, Preset};
//!
//! let config = PTAConfig::from_preset(Preset::Thorough);
//! assert!(config.validate().is_ok());
//!
//! let config = PTAConfig::default().context("1-call".parse::<ContextStrategy>().unwrap());
//! assert_eq!(config.context, ContextStrategy::CallSite { k: 1 });
//! ```

pub mod error;
pub mod io;
pub mod preset;
pub mod pta_config;
pub mod validation;

// Re-exports
pub use error::{ConfigError, ConfigResult};
pub use io::ConfigExportV1;
pub use preset::Preset;
pub use pta_config::{ContextStrategy, PTAConfig, MAX_CONTEXT_DEPTH};
pub use validation::Validatable;
