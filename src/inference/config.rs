//! Configuration for field inference

use serde::{Deserialize, Serialize};

/// Configuration for field inference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InferenceConfig {
    /// Largest distinct-value count still reported as an enumerated domain
    pub max_unique_values: usize,

    /// Number of example values reported for high-cardinality fields
    pub max_example_values: usize,

    /// Character limit applied to string values before deduplication
    pub max_value_length: usize,

    /// Number of leading values inspected for markup or long text
    pub rich_text_scan_limit: usize,

    /// Values longer than this (in characters) mark a field as rich text
    pub rich_text_min_length: usize,

    /// Sample records projected per item type
    pub max_sample_records: usize,

    /// Character limit for sample record titles
    pub sample_title_length: usize,

    /// Character limit for sample record field values
    pub sample_value_length: usize,

    /// Custom fields included per sample record
    pub sample_field_limit: usize,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            max_unique_values: 25,
            max_example_values: 5,
            max_value_length: 100,
            rich_text_scan_limit: 10,
            rich_text_min_length: 500,
            max_sample_records: 3,
            sample_title_length: 80,
            sample_value_length: 60,
            sample_field_limit: 4,
        }
    }
}

impl InferenceConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for custom configuration
    pub fn builder() -> InferenceConfigBuilder {
        InferenceConfigBuilder::default()
    }

    /// Check that every limit is usable
    pub fn validate(&self) -> Result<(), String> {
        let limits = [
            ("maxUniqueValues", self.max_unique_values),
            ("maxExampleValues", self.max_example_values),
            ("maxValueLength", self.max_value_length),
            ("sampleTitleLength", self.sample_title_length),
            ("sampleValueLength", self.sample_value_length),
        ];
        for (name, value) in limits {
            if value == 0 {
                return Err(format!("{} must be greater than zero", name));
            }
        }
        Ok(())
    }
}

/// Builder for InferenceConfig
#[derive(Debug, Default)]
pub struct InferenceConfigBuilder {
    config: InferenceConfig,
}

impl InferenceConfigBuilder {
    /// Set the enumerated-domain threshold
    pub fn max_unique_values(mut self, max: usize) -> Self {
        self.config.max_unique_values = max;
        self
    }

    /// Set the number of example values
    pub fn max_example_values(mut self, max: usize) -> Self {
        self.config.max_example_values = max;
        self
    }

    /// Set the value truncation length
    pub fn max_value_length(mut self, len: usize) -> Self {
        self.config.max_value_length = len;
        self
    }

    /// Set how many values are scanned for rich text
    pub fn rich_text_scan_limit(mut self, limit: usize) -> Self {
        self.config.rich_text_scan_limit = limit;
        self
    }

    /// Set the length above which a value counts as rich text
    pub fn rich_text_min_length(mut self, len: usize) -> Self {
        self.config.rich_text_min_length = len;
        self
    }

    /// Set the number of sample records per type
    pub fn max_sample_records(mut self, max: usize) -> Self {
        self.config.max_sample_records = max;
        self
    }

    /// Set the number of custom fields per sample record
    pub fn sample_field_limit(mut self, limit: usize) -> Self {
        self.config.sample_field_limit = limit;
        self
    }

    /// Build the configuration
    pub fn build(self) -> InferenceConfig {
        self.config
    }
}
