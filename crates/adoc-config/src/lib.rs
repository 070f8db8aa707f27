//! Configuration management for the `adoc` converter.
//!
//! Parses `adoc.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `document.attributes.*`
//! - `document.filename`
//! - `include.base_dir`

mod expand;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "adoc.toml";

const DEFAULT_MAX_INCLUDE_DEPTH: usize = 10;
const MAX_INCLUDE_DEPTH_LIMIT: usize = 64;

/// CLI settings that override configuration file values.
///
/// Only non-None values override the loaded config. Attributes are merged
/// over the configured ones.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Extra document attributes (`-a name=value`).
    pub attributes: Vec<(String, String)>,
    /// Override the include base directory.
    pub base_dir: Option<PathBuf>,
    /// Override the include depth limit.
    pub max_include_depth: Option<usize>,
    /// Override standalone page output.
    pub standalone: Option<bool>,
}

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Document defaults.
    pub document: DocumentConfig,
    /// Include settings (paths are relative strings from TOML).
    include: IncludeConfigRaw,
    /// Output settings.
    pub output: OutputConfig,

    /// Resolved include configuration (set after loading).
    #[serde(skip)]
    pub include_resolved: IncludeConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// `[document]` section.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    /// Attributes every document starts with. Front matter and header
    /// entries override them.
    pub attributes: BTreeMap<String, String>,
    /// Name reported in diagnostics when the source is read from stdin.
    pub filename: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct IncludeConfigRaw {
    base_dir: Option<String>,
    max_depth: Option<usize>,
}

/// Resolved include configuration with absolute paths.
#[derive(Debug)]
pub struct IncludeConfig {
    /// Directory include paths are resolved against. `None` means the
    /// directory of the converted file.
    pub base_dir: Option<PathBuf>,
    /// Maximum nesting of include directives.
    pub max_depth: usize,
}

impl Default for IncludeConfig {
    fn default() -> Self {
        Self {
            base_dir: None,
            max_depth: DEFAULT_MAX_INCLUDE_DEPTH,
        }
    }
}

/// `[output]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Wrap the body in a complete HTML page.
    pub standalone: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { standalone: true }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`include.base_dir`").
        field: String,
        /// Error message (e.g., "${`DOCS_ROOT`} not set").
        message: String,
    },
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `adoc.toml` in current directory and parents,
    /// falling back to defaults.
    ///
    /// CLI settings are applied after loading and path resolution.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails
    /// or the resulting values are invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        for (name, value) in &settings.attributes {
            self.document.attributes.insert(name.clone(), value.clone());
        }
        if let Some(base_dir) = &settings.base_dir {
            self.include_resolved.base_dir = Some(base_dir.clone());
        }
        if let Some(max_depth) = settings.max_include_depth {
            self.include_resolved.max_depth = max_depth;
        }
        if let Some(standalone) = settings.standalone {
            self.output.standalone = standalone;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the include depth is out of range
    /// or an attribute name is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let depth = self.include_resolved.max_depth;
        if !(1..=MAX_INCLUDE_DEPTH_LIMIT).contains(&depth) {
            return Err(ConfigError::Validation(format!(
                "include.max_depth must be between 1 and {MAX_INCLUDE_DEPTH_LIMIT}, got {depth}"
            )));
        }
        if self.document.attributes.keys().any(|name| name.trim().is_empty()) {
            return Err(ConfigError::Validation(
                "document.attributes names cannot be empty".to_owned(),
            ));
        }
        Ok(())
    }

    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        for (name, value) in &mut self.document.attributes {
            *value = expand::expand_env(value, &format!("document.attributes.{name}"))?;
        }
        if let Some(filename) = &self.document.filename {
            self.document.filename = Some(expand::expand_env(filename, "document.filename")?);
        }
        if let Some(base_dir) = &self.include.base_dir {
            self.include.base_dir = Some(expand::expand_env(base_dir, "include.base_dir")?);
        }
        Ok(())
    }

    /// Resolve the include base directory against the config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.include_resolved = IncludeConfig {
            base_dir: self.include.base_dir.as_deref().map(|d| config_dir.join(d)),
            max_depth: self.include.max_depth.unwrap_or(DEFAULT_MAX_INCLUDE_DEPTH),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn assert_validation_error(config: &Config, expected_substrings: &[&str]) {
        let err = config.validate().unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(_)),
            "Expected ConfigError::Validation, got {err:?}"
        );
        let msg = err.to_string();
        for s in expected_substrings {
            assert!(msg.contains(s), "Expected error to contain '{s}', got: {msg}");
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.document.attributes.is_empty());
        assert!(config.output.standalone);
        assert_eq!(config.include_resolved.max_depth, 10);
        assert!(config.include_resolved.base_dir.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_sections() {
        let toml = r#"
[document]
filename = "book.adoc"

[document.attributes]
product = "Widget"
icons = "font"

[include]
base_dir = "chapters"
max_depth = 4

[output]
standalone = false
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(config.document.filename.as_deref(), Some("book.adoc"));
        assert_eq!(
            config.document.attributes.get("product").map(String::as_str),
            Some("Widget")
        );
        assert_eq!(
            config.include_resolved.base_dir,
            Some(PathBuf::from("/project/chapters"))
        );
        assert_eq!(config.include_resolved.max_depth, 4);
        assert!(!config.output.standalone);
    }

    #[test]
    fn test_load_from_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("adoc.toml");
        std::fs::write(&path, "[include]\nmax_depth = 3\n").unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.include_resolved.max_depth, 3);
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(Some(&dir.path().join("missing.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_rejects_invalid_depth() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("adoc.toml");
        std::fs::write(&path, "[include]\nmax_depth = 0\n").unwrap();

        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(err.to_string().contains("include.max_depth"));
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config = Config::default();
        config
            .document
            .attributes
            .insert("product".to_owned(), "Widget".to_owned());
        let overrides = CliSettings {
            attributes: vec![
                ("product".to_owned(), "Gadget".to_owned()),
                ("toc".to_owned(), String::new()),
            ],
            base_dir: Some(PathBuf::from("/docs")),
            max_include_depth: Some(5),
            standalone: Some(false),
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.document.attributes["product"], "Gadget");
        assert_eq!(config.document.attributes["toc"], "");
        assert_eq!(config.include_resolved.base_dir, Some(PathBuf::from("/docs")));
        assert_eq!(config.include_resolved.max_depth, 5);
        assert!(!config.output.standalone);
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config = Config::default();
        config.apply_cli_settings(&CliSettings::default());
        assert!(config.output.standalone);
        assert_eq!(config.include_resolved.max_depth, 10);
    }

    #[test]
    fn test_expand_env_vars() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("ADOC_TEST_PRODUCT", "Widget");
            std::env::set_var("ADOC_TEST_ROOT", "/srv/docs");
        }

        let toml = r#"
[document.attributes]
product = "${ADOC_TEST_PRODUCT}"
version = "${ADOC_TEST_VERSION_UNSET:-1.0}"

[include]
base_dir = "${ADOC_TEST_ROOT}/shared"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();

        assert_eq!(config.document.attributes["product"], "Widget");
        assert_eq!(config.document.attributes["version"], "1.0");
        assert_eq!(config.include.base_dir.as_deref(), Some("/srv/docs/shared"));

        unsafe {
            std::env::remove_var("ADOC_TEST_PRODUCT");
            std::env::remove_var("ADOC_TEST_ROOT");
        }
    }

    #[test]
    fn test_expand_env_vars_missing_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("ADOC_TEST_MISSING");
        }
        let toml = r#"
[document.attributes]
product = "${ADOC_TEST_MISSING}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        let err = config.expand_env_vars().unwrap_err();
        assert!(err.to_string().contains("document.attributes.product"));
    }

    #[test]
    fn test_validate_depth_range() {
        let mut config = Config::default();
        config.include_resolved.max_depth = 65;
        assert_validation_error(&config, &["include.max_depth", "64"]);
        config.include_resolved.max_depth = 64;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_attribute_name() {
        let mut config = Config::default();
        config.document.attributes.insert(" ".to_owned(), "x".to_owned());
        assert_validation_error(&config, &["attributes", "empty"]);
    }
}
