//! Points-to analysis configuration

use super::error::{ConfigError, ConfigResult};
use super::preset::Preset;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Deepest context the presets and validation accept
pub const MAX_CONTEXT_DEPTH: usize = 8;

/// Context sensitivity strategy
///
/// Serialised as its short name (`ci`, `1-call`, `2-obj`, `1-type`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ContextStrategy {
    /// Context-insensitive
    #[default]
    Insensitive,

    /// k-limiting call-string sensitivity (k-CFA)
    CallSite { k: usize },

    /// Receiver allocation-site sensitivity
    Object { k: usize },

    /// Sensitivity to the classes declaring receiver allocation sites
    Type { k: usize },
}

impl ContextStrategy {
    /// Context depth (0 when insensitive)
    pub fn k(&self) -> usize {
        match self {
            Self::Insensitive => 0,
            Self::CallSite { k } | Self::Object { k } | Self::Type { k } => *k,
        }
    }
}

impl fmt::Display for ContextStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Insensitive => write!(f, "ci"),
            Self::CallSite { k } => write!(f, "{}-call", k),
            Self::Object { k } => write!(f, "{}-obj", k),
            Self::Type { k } => write!(f, "{}-type", k),
        }
    }
}

impl FromStr for ContextStrategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        if lower == "ci" || lower == "insensitive" {
            return Ok(Self::Insensitive);
        }
        let unknown = || ConfigError::UnknownStrategy(s.to_string());
        let (k, kind) = lower.split_once('-').ok_or_else(unknown)?;
        let k: usize = k.parse().map_err(|_| unknown())?;
        match kind {
            "call" | "cfa" => Ok(Self::CallSite { k }),
            "obj" | "object" => Ok(Self::Object { k }),
            "type" => Ok(Self::Type { k }),
            _ => Err(unknown()),
        }
    }
}

impl TryFrom<String> for ContextStrategy {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ContextStrategy> for String {
    fn from(value: ContextStrategy) -> Self {
        value.to_string()
    }
}

/// Points-to analysis configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PTAConfig {
    /// Context sensitivity strategy
    pub context: ContextStrategy,

    /// Heap context depth (None = k - 1)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heap_context_depth: Option<usize>,

    /// Attach solver statistics to the result
    #[serde(default = "default_collect_stats")]
    pub collect_stats: bool,
}

fn default_collect_stats() -> bool {
    true
}

impl PTAConfig {
    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        let k = self.context.k();
        if !matches!(self.context, ContextStrategy::Insensitive) && !(1..=MAX_CONTEXT_DEPTH).contains(&k) {
            return Err(ConfigError::range_with_hint(
                "context.k",
                k,
                1,
                MAX_CONTEXT_DEPTH,
                "Use 'ci' for a context-insensitive run",
            ));
        }
        if let Some(hk) = self.heap_context_depth {
            if hk > k {
                return Err(ConfigError::range_with_hint(
                    "heap_context_depth",
                    hk,
                    0,
                    k,
                    "Heap contexts cannot be deeper than method contexts",
                ));
            }
        }
        Ok(())
    }

    /// Builder: Set context strategy
    pub fn context(mut self, v: ContextStrategy) -> Self {
        self.context = v;
        self
    }

    /// Builder: Set heap_context_depth
    pub fn heap_context_depth(mut self, v: Option<usize>) -> Self {
        self.heap_context_depth = v;
        self
    }

    /// Builder: Set collect_stats
    pub fn collect_stats(mut self, v: bool) -> Self {
        self.collect_stats = v;
        self
    }

    /// Get preset configuration
    pub fn from_preset(preset: Preset) -> Self {
        match preset {
            Preset::Fast => Self {
                context: ContextStrategy::Insensitive,
                heap_context_depth: None,
                collect_stats: false,
            },
            Preset::Balanced => Self {
                context: ContextStrategy::Object { k: 1 },
                heap_context_depth: None,
                collect_stats: true,
            },
            Preset::Thorough => Self {
                context: ContextStrategy::Object { k: 2 },
                heap_context_depth: Some(1),
                collect_stats: true,
            },
            Preset::Custom => Self {
                context: ContextStrategy::Insensitive,
                heap_context_depth: None,
                collect_stats: true,
            },
        }
    }
}

impl Default for PTAConfig {
    fn default() -> Self {
        Self::from_preset(Preset::Balanced)
    }
}
