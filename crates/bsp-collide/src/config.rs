//! File-backed configuration.
//!
//! Values are loaded once and passed explicitly to the code that needs them.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::BspError;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Serialized formats understood by [`ConfigFile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
}

impl Format {
    /// Picks the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("ron") => Ok(Format::Ron),
            Some("toml") => Ok(Format::Toml),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Parses `contents` in this format.
    pub fn parse<T: DeserializeOwned>(self, contents: &str) -> Result<T, ConfigError> {
        match self {
            Format::Ron => ron::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string())),
            Format::Toml => toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string())),
        }
    }

    /// Renders `value` in this format.
    pub fn render<T: Serialize>(self, value: &T) -> Result<String, ConfigError> {
        match self {
            Format::Ron => ron::ser::to_string_pretty(value, Default::default())
                .map_err(|e| ConfigError::Serialize(e.to_string())),
            Format::Toml => {
                toml::to_string_pretty(value).map_err(|e| ConfigError::Serialize(e.to_string()))
            }
        }
    }
}

/// A serde type that can be stored as `.ron` or `.toml`.
pub trait ConfigFile: Serialize + DeserializeOwned + Default {
    /// Load from file, choosing the format by extension.
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let format = Format::from_path(path)?;
        let contents = std::fs::read_to_string(path)?;
        log::debug!("Loading {} as {:?}", path.display(), format);
        format.parse(&contents)
    }

    /// Save to file, choosing the format by extension.
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = Format::from_path(path)?.render(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Loads from `path` if given, otherwise returns the defaults.
    fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Ok(Self::default()),
        }
    }
}

/// Checks applied when a tree asset is loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Largest accepted deviation of a plane normal's length from 1. Must lie in `[0, 1)`.
    pub normal_tolerance: f32,
    /// Accept nodes that cannot be reached from the root (logged as a warning).
    pub allow_unreachable: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            normal_tolerance: 1e-3,
            allow_unreachable: true,
        }
    }
}

impl ValidationConfig {
    /// Rejects settings that would let a degenerate normal through.
    pub fn check(&self) -> Result<(), BspError> {
        if (0.0..1.0).contains(&self.normal_tolerance) {
            Ok(())
        } else {
            Err(BspError::InvalidTolerance {
                tolerance: self.normal_tolerance,
            })
        }
    }
}

impl ConfigFile for ValidationConfig {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("bsp-collide-{}-{}", std::process::id(), name))
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(Format::from_path(Path::new("a/b.ron")).unwrap(), Format::Ron);
        assert_eq!(Format::from_path(Path::new("b.toml")).unwrap(), Format::Toml);
        assert!(matches!(
            Format::from_path(Path::new("b.json")),
            Err(ConfigError::UnsupportedFormat(_))
        ));
        assert!(Format::from_path(Path::new("no_extension")).is_err());
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: ValidationConfig = Format::Ron.parse("(allow_unreachable: false)").unwrap();
        assert!(!config.allow_unreachable);
        assert_eq!(config.normal_tolerance, ValidationConfig::default().normal_tolerance);

        let config: ValidationConfig = Format::Toml.parse("normal_tolerance = 0.5").unwrap();
        assert_eq!(config.normal_tolerance, 0.5);
        assert!(config.allow_unreachable);
    }

    #[test]
    fn parse_error_is_reported() {
        let result: Result<ValidationConfig, _> = Format::Ron.parse("(normal_tolerance: \"x\")");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn save_and_load_both_formats() {
        let config = ValidationConfig {
            normal_tolerance: 0.25,
            allow_unreachable: false,
        };

        for name in ["validation.ron", "validation.toml"] {
            let path = temp_path(name);
            config.save_to_file(&path).unwrap();
            let loaded = ValidationConfig::load_from_file(&path).unwrap();
            std::fs::remove_file(&path).unwrap();
            assert_eq!(loaded, config);
        }
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let result = ValidationConfig::load_from_file(temp_path("missing.ron"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn tolerance_must_be_below_one() {
        assert!(ValidationConfig::default().check().is_ok());
        for tolerance in [0.0, 0.5] {
            let config = ValidationConfig {
                normal_tolerance: tolerance,
                ..Default::default()
            };
            assert!(config.check().is_ok());
        }
        for tolerance in [1.0, -1e-3, f32::NAN] {
            let config = ValidationConfig {
                normal_tolerance: tolerance,
                ..Default::default()
            };
            assert!(matches!(config.check(), Err(BspError::InvalidTolerance { .. })));
        }
    }

    #[test]
    fn load_or_default_without_path() {
        let config = ValidationConfig::load_or_default(None).unwrap();
        assert_eq!(config, ValidationConfig::default());
    }
}
