//! Configuration validation

use super::error::ConfigResult;
use super::pta_config::PTAConfig;

/// Trait for validatable configuration objects
///
/// # Example
/// ```rust,ignore
/// fn build<C: Validatable>(config: C) -> Result<Analysis, ConfigError> {
///     config.validate()?;
///     // ...
/// }
/// ```
pub trait Validatable {
    /// Returns `Ok(())` if valid, `Err(ConfigError)` with details if invalid.
    fn validate(&self) -> ConfigResult<()>;

    /// Configuration name for error messages
    fn config_name(&self) -> &'static str {
        "Config"
    }
}

impl Validatable for PTAConfig {
    fn validate(&self) -> ConfigResult<()> {
        PTAConfig::validate(self)
    }

    fn config_name(&self) -> &'static str {
        "pta"
    }
}
