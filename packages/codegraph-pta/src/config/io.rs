//! Configuration I/O (YAML)
//!
//! ```yaml
//! version: 1
//! preset: balanced
//! pta:
//!   context: 2-obj
//!   heap_context_depth: 1
//! ```
//!
//! `pta` overrides the preset entirely when present.

use super::error::{ConfigError, ConfigResult};
use super::preset::Preset;
use super::pta_config::PTAConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Supported schema versions
pub const SUPPORTED_VERSIONS: &[u32] = &[1];

/// YAML Schema v1
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigExportV1 {
    /// Schema version (always 1 for v1)
    pub version: Option<u32>,

    /// Base preset
    #[serde(default)]
    pub preset: Option<String>,

    /// Full override of the preset's analysis settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pta: Option<PTAConfig>,
}

impl PTAConfig {
    /// Load and validate a configuration file
    pub fn from_yaml(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Parse and validate YAML text
    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let export: ConfigExportV1 = serde_yaml::from_str(content)?;

        let version = export.version.ok_or(ConfigError::MissingVersion)?;
        if !SUPPORTED_VERSIONS.contains(&version) {
            return Err(ConfigError::UnsupportedVersion {
                found: version,
                supported: SUPPORTED_VERSIONS.to_vec(),
            });
        }

        let preset = match export.preset.as_deref() {
            Some(name) => name.parse::<Preset>()?,
            None => Preset::default(),
        };
        let config = export.pta.unwrap_or_else(|| Self::from_preset(preset));
        config.validate()?;
        Ok(config)
    }

    /// Serialise as a v1 document with `preset: custom`
    pub fn to_yaml(&self) -> ConfigResult<String> {
        let export = ConfigExportV1 {
            version: Some(1),
            preset: Some(Preset::Custom.to_string()),
            pta: Some(self.clone()),
        };
        serde_yaml::to_string(&export).map_err(ConfigError::Yaml)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ContextStrategy;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_yaml_roundtrip() {
        let config = PTAConfig::default().context(ContextStrategy::CallSite { k: 2 });

        let yaml = config.to_yaml().unwrap();
        assert!(yaml.contains("version: 1"));
        assert!(yaml.contains("context: 2-call"));
        assert_eq!(PTAConfig::from_yaml_str(&yaml).unwrap(), config);
    }

    #[test]
    fn test_yaml_loading() {
        let yaml_content = r#"
version: 1
pta:
  context: 1-type
  heap_context_depth: 0
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(yaml_content.as_bytes()).unwrap();

        let config = PTAConfig::from_yaml(temp_file.path()).unwrap();
        assert_eq!(config.context, ContextStrategy::Type { k: 1 });
        assert_eq!(config.heap_context_depth, Some(0));
        assert!(config.collect_stats);
    }

    #[test]
    fn test_yaml_preset_only() {
        let config = PTAConfig::from_yaml_str("version: 1\npreset: thorough\n").unwrap();
        assert_eq!(config, PTAConfig::from_preset(Preset::Thorough));
    }

    #[test]
    fn test_yaml_missing_version() {
        let result = PTAConfig::from_yaml_str("preset: fast\n");
        assert!(matches!(result, Err(ConfigError::MissingVersion)));
    }

    #[test]
    fn test_yaml_unsupported_version() {
        let result = PTAConfig::from_yaml_str("version: 2\n");
        assert!(matches!(result, Err(ConfigError::UnsupportedVersion { found: 2, .. })));
    }

    #[test]
    fn test_yaml_bad_strategy() {
        let result = PTAConfig::from_yaml_str("version: 1\npta:\n  context: 2-heap\n");
        assert!(matches!(result, Err(ConfigError::Yaml(_))));
    }

    #[test]
    fn test_yaml_invalid_values_rejected() {
        let result = PTAConfig::from_yaml_str("version: 1\npta:\n  context: 1-obj\n  heap_context_depth: 3\n");
        assert!(matches!(result, Err(ConfigError::Range { .. })));
    }
}
