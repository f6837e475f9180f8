//! Dispatcher configuration.
//!
//! This module reads type-code bindings and the nesting limit from a YAML
//! file and environment variables, and builds a [`Dispatcher`] from them.
//!
//! ```yaml
//! stack:
//!   max_depth: 16
//!   bindings:
//!     "0xC0DE": ppp
//!     "49153": raw
//! ```

use crate::dispatch::{Dispatcher, DEFAULT_MAX_DEPTH};
use crate::pdu::PduType;
use crate::ppp::Ppp;
use crate::raw::RawPdu;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

/// Environment variable overriding `max_depth`
pub const ENV_MAX_DEPTH: &str = "PDU_MAX_DEPTH";

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// YAML could not be parsed
    #[error("invalid yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Binding key is not a 16-bit type code
    #[error("invalid type code {0:?}")]
    InvalidCode(String),

    /// Nesting limit of zero would leave even the outermost layer undecoded
    #[error("max_depth must be at least 1")]
    ZeroMaxDepth,

    /// Two binding keys name the same type code
    #[error("type code {0:#06x} bound more than once")]
    DuplicateCode(u16),

    /// Layer kind has no built-in decoder
    #[error("no built-in decoder for {kind} (code {code:#06x})")]
    UnsupportedKind {
        /// Type code being bound
        code: u16,
        /// Kind it was bound to
        kind: PduType,
    },
}

/// Dispatcher configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StackConfig {
    /// Nesting limit handed to the dispatcher
    pub max_depth: usize,
    /// Type code (decimal or `0x` hex) to layer kind
    pub bindings: BTreeMap<String, PduType>,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            bindings: BTreeMap::new(),
        }
    }
}

/// Root of the configuration file
#[derive(Debug, Deserialize)]
struct RootConfig {
    stack: Option<StackConfig>,
}

impl StackConfig {
    /// Load configuration from file and environment variables.
    ///
    /// A missing or unparsable file falls back to defaults with a warning.
    /// The result is validated, so a file with a bad type code or a zero
    /// `max_depth` is an error.
    pub fn load_from_file<P: AsRef<Path>>(config_path: P) -> Result<Self, ConfigError> {
        let path = config_path.as_ref();
        let mut config = match std::fs::read_to_string(path) {
            Ok(content) => match Self::from_yaml(&content) {
                Ok(config) => {
                    info!("Loaded stack configuration from {:?}", path);
                    config
                }
                Err(e) => {
                    warn!("Failed to parse config file {:?} ({}), using defaults", path, e);
                    Self::default()
                }
            },
            Err(_) => {
                warn!("Config file {:?} not found, using defaults", path);
                Self::default()
            }
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        info!(
            "Final stack configuration: max_depth={}, bindings={}",
            config.max_depth,
            config.bindings.len()
        );
        Ok(config)
    }

    /// Parse the `stack` section of a YAML document
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let root: RootConfig = serde_yaml::from_str(content)?;
        Ok(root.stack.unwrap_or_default())
    }

    /// Apply overrides looked up by variable name
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_MAX_DEPTH) {
            match value.parse::<usize>() {
                Ok(0) => warn!("Ignoring {}=0, max_depth must be at least 1", ENV_MAX_DEPTH),
                Ok(depth) => {
                    self.max_depth = depth;
                    info!("Max depth overridden by environment: {}", depth);
                }
                Err(_) => warn!("Ignoring {}={:?}, not a number", ENV_MAX_DEPTH, value),
            }
        }
    }

    /// Check the nesting limit and every binding
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::ZeroMaxDepth);
        }
        self.parsed_bindings().map(|_| ())
    }

    /// Bindings with their keys parsed, in ascending code order
    pub fn parsed_bindings(&self) -> Result<Vec<(u16, PduType)>, ConfigError> {
        let mut parsed: Vec<(u16, PduType)> = Vec::with_capacity(self.bindings.len());
        for (key, kind) in &self.bindings {
            parsed.push((parse_code(key)?, *kind));
        }
        parsed.sort_unstable_by_key(|(code, _)| *code);

        if let Some(pair) = parsed.windows(2).find(|pair| pair[0].0 == pair[1].0) {
            return Err(ConfigError::DuplicateCode(pair[0].0));
        }
        Ok(parsed)
    }
}

/// Parse a type code written as decimal or `0x`-prefixed hex
pub fn parse_code(key: &str) -> Result<u16, ConfigError> {
    let trimmed = key.trim();
    let parsed = match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => trimmed.parse::<u16>(),
    };
    parsed.map_err(|_| ConfigError::InvalidCode(key.to_string()))
}

impl Dispatcher {
    /// Build a registry from configured bindings
    pub fn from_config(config: &StackConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut dispatcher = Dispatcher::new().with_max_depth(config.max_depth);
        for (code, kind) in config.parsed_bindings()? {
            match kind {
                PduType::Ppp => dispatcher.register::<Ppp>(code),
                PduType::Raw => dispatcher.register::<RawPdu>(code),
                PduType::UserDefined(_) => {
                    return Err(ConfigError::UnsupportedKind { code, kind });
                }
            };
        }
        Ok(dispatcher)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = StackConfig::default();
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
        assert!(config.bindings.is_empty());
        assert!(Dispatcher::from_config(&config).unwrap().is_empty());
    }

    #[test]
    fn test_parse_code() {
        assert_eq!(parse_code("0xC0DE").unwrap(), 0xC0DE);
        assert_eq!(parse_code("0x0021").unwrap(), 0x0021);
        assert_eq!(parse_code(" 33 ").unwrap(), 33);
        assert!(matches!(parse_code("0x10000"), Err(ConfigError::InvalidCode(_))));
        assert!(matches!(parse_code("ppp"), Err(ConfigError::InvalidCode(_))));
    }

    #[test]
    fn test_load_from_file() {
        let yaml_content = r#"
stack:
  max_depth: 8
  bindings:
    "0xC0DE": ppp
    "49153": raw
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(yaml_content.as_bytes()).unwrap();

        let config = StackConfig::load_from_file(temp_file.path()).unwrap();
        assert_eq!(config.max_depth, 8);
        assert_eq!(
            config.parsed_bindings().unwrap(),
            vec![(0xC001, PduType::Raw), (0xC0DE, PduType::Ppp)]
        );

        let dispatcher = Dispatcher::from_config(&config).unwrap();
        assert_eq!(dispatcher.codes(), vec![0xC001, 0xC0DE]);
        assert_eq!(dispatcher.max_depth(), 8);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = StackConfig::load_from_file(dir.path().join("absent.yaml")).unwrap();
        assert!(config.bindings.is_empty());
    }

    #[test]
    fn test_missing_section_uses_defaults() {
        let config = StackConfig::from_yaml("other: 1\n").unwrap();
        assert_eq!(config, StackConfig::default());
    }

    #[test]
    fn test_duplicate_code_rejected() {
        let config = StackConfig::from_yaml(
            "stack:\n  bindings:\n    \"0x21\": ppp\n    \"33\": raw\n",
        )
        .unwrap();
        assert!(matches!(
            config.parsed_bindings(),
            Err(ConfigError::DuplicateCode(0x21))
        ));
    }

    #[test]
    fn test_user_defined_kind_unsupported() {
        let mut config = StackConfig::default();
        config
            .bindings
            .insert("7".to_string(), PduType::UserDefined(1));
        assert!(matches!(
            Dispatcher::from_config(&config),
            Err(ConfigError::UnsupportedKind { code: 7, .. })
        ));
    }

    #[test]
    fn test_overrides() {
        let mut config = StackConfig::default();
        config.apply_overrides(|key| (key == ENV_MAX_DEPTH).then(|| "3".to_string()));
        assert_eq!(config.max_depth, 3);

        config.apply_overrides(|_| Some("deep".to_string()));
        assert_eq!(config.max_depth, 3);

        config.apply_overrides(|_| Some("0".to_string()));
        assert_eq!(config.max_depth, 3);
    }

    #[test]
    fn test_zero_max_depth_rejected() {
        let config = StackConfig::from_yaml("stack:\n  max_depth: 0\n").unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::ZeroMaxDepth)));
        assert!(matches!(
            Dispatcher::from_config(&config),
            Err(ConfigError::ZeroMaxDepth)
        ));

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"stack:\n  max_depth: 0\n").unwrap();
        assert!(matches!(
            StackConfig::load_from_file(temp_file.path()),
            Err(ConfigError::ZeroMaxDepth)
        ));
    }
}
