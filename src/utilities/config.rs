//! Composer configuration.
//!
//! Sources, lowest to highest precedence: built-in defaults, an optional
//! YAML file, then `LEIA_STRICT` / `LEIA_OUTPUT` / `LEIA_PRETTY` environment
//! variables.

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::resolver::error::LeiaError;

/// Environment variable toggling strict mode.
pub const ENV_STRICT: &str = "LEIA_STRICT";
/// Environment variable selecting the output format.
pub const ENV_OUTPUT: &str = "LEIA_OUTPUT";
/// Environment variable toggling pretty-printed output.
pub const ENV_PRETTY: &str = "LEIA_PRETTY";

/// Serialization format for composed output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

impl FromStr for OutputFormat {
    type Err = LeiaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            other => Err(LeiaError::Config(format!("unknown output format '{}'", other))),
        }
    }
}

impl OutputFormat {
    /// Render a value in this format.
    pub fn render<T: Serialize>(&self, value: &T, pretty: bool) -> Result<String, LeiaError> {
        match self {
            Self::Json if pretty => Ok(serde_json::to_string_pretty(value)?),
            Self::Json => Ok(serde_json::to_string(value)?),
            Self::Yaml => Ok(serde_yaml::to_string(value)?),
        }
    }
}

/// Settings for [`crate::resolver::LeiaComposer`] and the `leia` binary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComposerConfig {
    /// Fail a composition that recorded any diagnostic.
    pub strict: bool,
    pub output: OutputFormat,
    pub pretty: bool,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            strict: false,
            output: OutputFormat::Json,
            pretty: true,
        }
    }
}

impl ComposerConfig {
    /// Parse a configuration from YAML. Missing keys take their defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self, LeiaError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, LeiaError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Defaults, then the optional file, then the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, LeiaError> {
        let config = match path {
            Some(path) => Self::from_yaml_file(path)?,
            None => Self::default(),
        };
        config.with_env_overrides(std::env::vars())
    }

    /// Apply `LEIA_*` overrides from the given variables; others are ignored.
    pub fn with_env_overrides<I>(mut self, vars: I) -> Result<Self, LeiaError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            match key.as_str() {
                ENV_STRICT => self.strict = parse_bool(&key, &value)?,
                ENV_PRETTY => self.pretty = parse_bool(&key, &value)?,
                ENV_OUTPUT => self.output = value.parse()?,
                _ => {}
            }
        }
        Ok(self)
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, LeiaError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(LeiaError::Config(format!(
            "{} must be a boolean, got '{}'",
            key, other
        ))),
    }
}
