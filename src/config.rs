//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. TOML file passed to [`Settings::load`]
//! 3. Environment variables: `APITREE__*` prefix (`__` separates nested keys)

use std::path::Path;

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::{RequestMethod, TreeScanner, ALL_REQUEST_METHODS, DEFAULT_MAX_DEPTH};

/// Documentation rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DocumentationConfig {
    /// Indentation for nested lists and maps (default: four spaces)
    pub indent: String,
    /// Accept value of the JSON documentation view
    pub json_accept: String,
    /// Renderer name of the JSON documentation view
    pub json_renderer: String,
}

impl Default for DocumentationConfig {
    fn default() -> Self {
        Self {
            indent: "    ".into(),
            json_accept: "application/json".into(),
            json_renderer: "json".into(),
        }
    }
}

/// Unified configuration for apitree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Methods a view without a request-method predicate answers to
    pub request_methods: Vec<String>,
    /// Maximum branch nesting accepted by the scanner
    pub max_depth: usize,
    /// Documentation settings
    pub documentation: DocumentationConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            request_methods: ALL_REQUEST_METHODS.iter().map(|m| m.to_string()).collect(),
            max_depth: DEFAULT_MAX_DEPTH,
            documentation: DocumentationConfig::default(),
        }
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

impl Settings {
    /// The standard method set as a predicate value.
    pub fn standard_methods(&self) -> RequestMethod {
        RequestMethod::new(self.request_methods.iter().cloned())
    }

    /// A scanner honouring `max_depth`.
    pub fn scanner(&self) -> TreeScanner {
        TreeScanner::with_max_depth(self.max_depth)
    }

    /// Parse TOML content over the compiled defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ApplicationError> {
        toml::from_str(content).map_err(|e| ApplicationError::Config {
            message: format!("parse settings: {}", e),
        })
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `path` - Optional TOML file; it must exist when given
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. `path`
    /// 3. Environment variables: `APITREE__*` (e.g. `APITREE__MAX_DEPTH=32`,
    ///    `APITREE__REQUEST_METHODS=GET,POST`)
    pub fn load(path: Option<&Path>) -> Result<Self, ApplicationError> {
        let defaults = Settings::default();
        let mut builder = Config::builder()
            .set_default("request_methods", defaults.request_methods.clone())
            .map_err(config_err)?
            .set_default("max_depth", defaults.max_depth as i64)
            .map_err(config_err)?
            .set_default("documentation.indent", defaults.documentation.indent.clone())
            .map_err(config_err)?
            .set_default(
                "documentation.json_accept",
                defaults.documentation.json_accept.clone(),
            )
            .map_err(config_err)?
            .set_default(
                "documentation.json_renderer",
                defaults.documentation.json_renderer.clone(),
            )
            .map_err(config_err)?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("APITREE")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("request_methods")
                .try_parsing(true),
        );

        let config = builder.build().map_err(config_err)?;
        config.try_deserialize().map_err(config_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.standard_methods(), RequestMethod::all());
        assert_eq!(settings.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(settings.documentation.indent, "    ");
    }

    #[test]
    fn test_from_toml_str_keeps_unspecified_defaults() {
        let settings = Settings::from_toml_str(
            r#"
max_depth = 8

[documentation]
indent = "  "
"#,
        )
        .unwrap();

        assert_eq!(settings.max_depth, 8);
        assert_eq!(settings.documentation.indent, "  ");
        assert_eq!(settings.documentation.json_renderer, "json");
        assert_eq!(settings.request_methods.len(), 5);
    }

    #[test]
    fn test_from_toml_str_rejects_bad_types() {
        let err = Settings::from_toml_str("max_depth = \"deep\"").unwrap_err();
        assert!(matches!(err, ApplicationError::Config { .. }));
    }
}
