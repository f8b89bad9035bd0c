//! Folio configuration system
//!
//! This crate provides centralized configuration for the folio tools,
//! loading settings from `folio.toml` as an alternative to environment
//! variables.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for folio
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FolioConfig {
    /// Network settings for stylesheet fetching
    pub fetch: FetchConfig,
    /// Rewrite dictionary settings
    pub rewrite: RewriteConfig,
}

/// Network settings for stylesheet fetching
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// Rewrite dictionary settings. Extension entries are applied after the
/// built-in paged-media tables, or alone when `use_defaults` is off.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RewriteConfig {
    /// Start from the built-in paged-media dictionary
    pub use_defaults: bool,
    /// Extra property renames as `[property, replacement]` pairs
    pub properties: Vec<(String, String)>,
    /// Extra at-rule renames as `[name, selector]` pairs
    pub at_rules: Vec<(String, String)>,
    /// Extra value renames
    pub values: Vec<ValueRenameConfig>,
    /// Rewrite `#id` selectors into `[data-id="id"]` attribute selectors
    pub rewrite_ids: bool,
}

/// One configured value rename, optionally scoped to a property
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValueRenameConfig {
    pub value: String,
    pub replacement: String,
    #[serde(default)]
    pub property: Option<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { timeout_secs: 15 }
    }
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            use_defaults: true,
            properties: Vec::new(),
            at_rules: Vec::new(),
            values: Vec::new(),
            rewrite_ids: false,
        }
    }
}

impl FolioConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {}", e))
    }

    /// Load configuration from the default location (folio.toml in the
    /// current directory) or return default configuration if the file
    /// doesn't exist
    pub fn load_or_default() -> Self {
        Self::load_from_file("folio.toml").unwrap_or_default()
    }

    /// Merge configuration with environment variables
    ///
    /// Environment variables take precedence over configuration file
    /// values, allowing temporary overrides without editing the file.
    pub fn merge_with_env(&mut self) {
        if let Ok(val) = std::env::var("FOLIO_TIMEOUT_SECS") {
            if let Ok(secs) = val.parse::<u64>() {
                self.fetch.timeout_secs = secs;
            }
        }
        if let Ok(val) = std::env::var("FOLIO_USE_DEFAULT_DICTIONARY") {
            self.rewrite.use_defaults = val == "1" || val.eq_ignore_ascii_case("true");
        }
        if let Ok(val) = std::env::var("FOLIO_REWRITE_IDS") {
            self.rewrite.rewrite_ids = val == "1" || val.eq_ignore_ascii_case("true");
        }
    }

    /// Load configuration with environment variable overrides
    ///
    /// 1. Load from folio.toml (or use defaults if not found)
    /// 2. Override with environment variables if present
    pub fn load() -> Self {
        let mut config = Self::load_or_default();
        config.merge_with_env();
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FolioConfig::default();
        assert_eq!(config.fetch.timeout_secs, 15);
        assert!(config.rewrite.use_defaults);
        assert!(config.rewrite.properties.is_empty());
        assert!(!config.rewrite.rewrite_ids);
    }

    #[test]
    fn test_toml_serialization() {
        let config = FolioConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: FolioConfig = toml::from_str(&toml_str).unwrap();
        assert!(parsed.rewrite.use_defaults);
        assert_eq!(parsed.fetch.timeout_secs, 15);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("folio.toml");
        std::fs::write(
            &path,
            r#"
[fetch]
timeout_secs = 30

[rewrite]
properties = [["chaussette", "--paged-chaussette"]]

[[rewrite.values]]
value = "bottom"
replacement = "var(--paged-bottom)"
property = "float"
"#,
        )
        .unwrap();

        let config = FolioConfig::load_from_file(&path).unwrap();
        assert_eq!(config.fetch.timeout_secs, 30);
        assert_eq!(
            config.rewrite.properties,
            vec![("chaussette".to_owned(), "--paged-chaussette".to_owned())]
        );
        assert_eq!(config.rewrite.values.len(), 1);
        assert_eq!(config.rewrite.values[0].property.as_deref(), Some("float"));
        // Unset keys keep their defaults.
        assert!(config.rewrite.use_defaults);
    }

    #[test]
    fn test_load_from_missing_file_fails() {
        assert!(FolioConfig::load_from_file("definitely-not-here.toml").is_err());
    }

    #[test]
    fn test_merge_with_env() {
        unsafe {
            std::env::set_var("FOLIO_TIMEOUT_SECS", "45");
            std::env::set_var("FOLIO_REWRITE_IDS", "true");
        }

        let mut config = FolioConfig::default();
        config.merge_with_env();

        assert_eq!(config.fetch.timeout_secs, 45);
        assert!(config.rewrite.rewrite_ids);

        unsafe {
            std::env::remove_var("FOLIO_TIMEOUT_SECS");
            std::env::remove_var("FOLIO_REWRITE_IDS");
        }
    }
}
