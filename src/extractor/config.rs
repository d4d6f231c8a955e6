//! Extractor configuration
//!
//! Every setting has a default, so a TOML file only needs the values it
//! changes:
//!
//! ```toml
//! versionId = "KXVER42"
//! relationCap = 10
//!
//! [fetch]
//! requestDelayMs = 250
//! maxConcurrent = 2
//!
//! [inference]
//! maxUniqueValues = 40
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use crate::inference::InferenceConfig;

/// Type discovery settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DiscoveryConfig {
    /// Items requested from the item listing
    pub list_limit: usize,
    /// Items whose records are sampled for type tags
    pub sample_items: usize,
    /// Records scanned per type for a short name
    pub short_name_scan: usize,
    /// Longest accepted short name
    pub max_short_name_len: usize,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            list_limit: 100,
            sample_items: 50,
            short_name_scan: 20,
            max_short_name_len: 6,
        }
    }
}

/// Record retrieval settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FetchConfig {
    /// Records requested per type query
    pub page_size: usize,
    /// Pause before each source call
    pub request_delay_ms: u64,
    /// Type queries allowed in flight at once
    pub max_concurrent: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            page_size: 1000,
            request_delay_ms: 100,
            max_concurrent: 4,
        }
    }
}

/// Main extractor configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtractorConfig {
    /// Version the document describes (latest released when unset)
    pub version_id: Option<String>,
    pub discovery: DiscoveryConfig,
    pub fetch: FetchConfig,
    pub inference: InferenceConfig,
    /// Relation types kept in the catalog
    pub relation_cap: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            version_id: None,
            discovery: DiscoveryConfig::default(),
            fetch: FetchConfig::default(),
            inference: InferenceConfig::default(),
            relation_cap: 20,
        }
    }
}

impl ExtractorConfig {
    /// Create a new extractor config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the version the document describes
    pub fn with_version(mut self, version_id: impl Into<String>) -> Self {
        self.version_id = Some(version_id.into());
        self
    }

    /// Set the pause before each source call
    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.fetch.request_delay_ms = delay.as_millis() as u64;
        self
    }

    /// Set the number of concurrent type queries
    pub fn with_max_concurrent(mut self, max: usize) -> Self {
        self.fetch.max_concurrent = max;
        self
    }

    /// Set the inference configuration
    pub fn with_inference(mut self, inference: InferenceConfig) -> Self {
        self.inference = inference;
        self
    }

    /// Set the relation catalog cap
    pub fn with_relation_cap(mut self, cap: usize) -> Self {
        self.relation_cap = cap;
        self
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.fetch.request_delay_ms)
    }

    /// Parse and validate a TOML configuration
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fetch.page_size == 0 {
            return Err(ConfigError::Invalid(
                "fetch.pageSize must be greater than zero".to_string(),
            ));
        }
        if self.fetch.max_concurrent == 0 {
            return Err(ConfigError::Invalid(
                "fetch.maxConcurrent must be greater than zero".to_string(),
            ));
        }
        if self.discovery.list_limit == 0 || self.discovery.sample_items == 0 {
            return Err(ConfigError::Invalid(
                "discovery limits must be greater than zero".to_string(),
            ));
        }
        self.inference
            .validate()
            .map_err(|e| ConfigError::Invalid(format!("inference.{}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = ExtractorConfig::default();
        assert_eq!(config.discovery.sample_items, 50);
        assert_eq!(config.fetch.page_size, 1000);
        assert_eq!(config.request_delay(), Duration::from_millis(100));
        assert_eq!(config.relation_cap, 20);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_toml_partial() {
        let config = ExtractorConfig::from_toml_str(
            r#"
            versionId = "KXVER42"
            relationCap = 10

            [fetch]
            requestDelayMs = 0

            [inference]
            maxUniqueValues = 40
            "#,
        )
        .unwrap();

        assert_eq!(config.version_id.as_deref(), Some("KXVER42"));
        assert_eq!(config.relation_cap, 10);
        assert_eq!(config.fetch.request_delay_ms, 0);
        assert_eq!(config.fetch.max_concurrent, 4);
        assert_eq!(config.inference.max_unique_values, 40);
        assert_eq!(config.inference.max_example_values, 5);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let result = ExtractorConfig::from_toml_str("[fetch]\nmaxConcurrent = 0\n");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));

        let result = ExtractorConfig::from_toml_str("[inference]\nmaxValueLength = 0\n");
        assert!(matches!(result, Err(ConfigError::Invalid(msg)) if msg.contains("maxValueLength")));

        let result = ExtractorConfig::from_toml_str("relationCap = \"many\"");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_load_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[discovery]\nsampleItems = 5").unwrap();

        let config = ExtractorConfig::load(file.path()).unwrap();
        assert_eq!(config.discovery.sample_items, 5);

        let missing = ExtractorConfig::load("/nonexistent/extractor.toml");
        assert!(matches!(missing, Err(ConfigError::IoError { .. })));
    }
}
