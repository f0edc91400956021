//! Configuration types for the booking pipeline.
//!
//! Only operational knobs live here. The cleaning rules themselves (fill
//! values, valid ranges, month table) are fixed and not configurable.

use crate::aggregate::StatisticsOptions;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default source location, relative to the working directory.
pub const DEFAULT_SOURCE_PATH: &str = "data/hotel_bookings.csv";

/// Configuration for the booking pipeline.
///
/// Use [`PipelineConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use hotel_demand::PipelineConfig;
///
/// let config = PipelineConfig::builder()
///     .source_path("data/hotel_bookings.csv")
///     .top_n(5)
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// CSV file to ingest.
    /// Default: "data/hotel_bookings.csv"
    pub source_path: PathBuf,

    /// Rows scanned to infer column types. `None` scans the whole file.
    /// Default: None
    pub infer_schema_length: Option<usize>,

    /// Whether [`crate::Pipeline::run`] goes through the process-wide
    /// dataset cache.
    /// Default: true
    pub use_cache: bool,

    /// Number of entries kept in ranking metrics (top countries).
    /// Default: 10
    pub top_n: usize,

    /// Number of equal-width bins in distribution metrics.
    /// Default: 50
    pub histogram_bins: usize,

    /// Only daily rates below this value enter the rate distribution.
    /// Default: 500.0
    pub adr_histogram_ceiling: f64,

    /// Directory for exported files. `None` disables export.
    /// Default: None
    pub output_dir: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source_path: PathBuf::from(DEFAULT_SOURCE_PATH),
            infer_schema_length: None,
            use_cache: true,
            top_n: 10,
            histogram_bins: 50,
            adr_histogram_ceiling: 500.0,
            output_dir: None,
        }
    }
}

impl PipelineConfig {
    /// Create a new configuration builder.
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.source_path.as_os_str().is_empty() {
            return Err(ConfigValidationError::EmptySourcePath);
        }

        if self.infer_schema_length == Some(0) {
            return Err(ConfigValidationError::ZeroValue("infer_schema_length"));
        }

        if self.top_n == 0 {
            return Err(ConfigValidationError::ZeroValue("top_n"));
        }

        if self.histogram_bins == 0 {
            return Err(ConfigValidationError::ZeroValue("histogram_bins"));
        }

        if !(self.adr_histogram_ceiling.is_finite() && self.adr_histogram_ceiling > 0.0) {
            return Err(ConfigValidationError::InvalidCeiling(
                self.adr_histogram_ceiling,
            ));
        }

        Ok(())
    }

    /// Options for [`crate::aggregate::DerivedStatistics::compute`].
    pub fn statistics_options(&self) -> StatisticsOptions {
        StatisticsOptions {
            top_n: self.top_n,
            histogram_bins: self.histogram_bins,
            adr_histogram_ceiling: self.adr_histogram_ceiling,
            ..StatisticsOptions::default()
        }
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Source path must not be empty")]
    EmptySourcePath,

    #[error("Invalid value for '{0}': must be at least 1")]
    ZeroValue(&'static str),

    #[error("Invalid histogram ceiling: {0} (must be a positive number)")]
    InvalidCeiling(f64),
}

impl From<ConfigValidationError> for crate::error::PipelineError {
    fn from(err: ConfigValidationError) -> Self {
        crate::error::PipelineError::InvalidConfig(err.to_string())
    }
}

/// Builder for [`PipelineConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct PipelineConfigBuilder {
    source_path: Option<PathBuf>,
    infer_schema_length: Option<usize>,
    use_cache: Option<bool>,
    top_n: Option<usize>,
    histogram_bins: Option<usize>,
    adr_histogram_ceiling: Option<f64>,
    output_dir: Option<PathBuf>,
}

impl PipelineConfigBuilder {
    /// Set the CSV file to ingest.
    pub fn source_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.source_path = Some(path.into());
        self
    }

    /// Limit schema inference to the first `rows` rows.
    pub fn infer_schema_length(mut self, rows: usize) -> Self {
        self.infer_schema_length = Some(rows);
        self
    }

    /// Enable or disable the process-wide dataset cache.
    pub fn use_cache(mut self, use_cache: bool) -> Self {
        self.use_cache = Some(use_cache);
        self
    }

    /// Set the number of entries kept in ranking metrics.
    pub fn top_n(mut self, n: usize) -> Self {
        self.top_n = Some(n);
        self
    }

    /// Set the number of bins in distribution metrics.
    pub fn histogram_bins(mut self, bins: usize) -> Self {
        self.histogram_bins = Some(bins);
        self
    }

    /// Set the exclusive upper bound of the rate distribution.
    pub fn adr_histogram_ceiling(mut self, ceiling: f64) -> Self {
        self.adr_histogram_ceiling = Some(ceiling);
        self
    }

    /// Set the output directory for exported files.
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `PipelineConfig` or an error if validation fails.
    pub fn build(self) -> Result<PipelineConfig, ConfigValidationError> {
        let defaults = PipelineConfig::default();
        let config = PipelineConfig {
            source_path: self.source_path.unwrap_or(defaults.source_path),
            infer_schema_length: self.infer_schema_length.or(defaults.infer_schema_length),
            use_cache: self.use_cache.unwrap_or(defaults.use_cache),
            top_n: self.top_n.unwrap_or(defaults.top_n),
            histogram_bins: self.histogram_bins.unwrap_or(defaults.histogram_bins),
            adr_histogram_ceiling: self
                .adr_histogram_ceiling
                .unwrap_or(defaults.adr_histogram_ceiling),
            output_dir: self.output_dir.or(defaults.output_dir),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.source_path, PathBuf::from("data/hotel_bookings.csv"));
        assert_eq!(config.infer_schema_length, None);
        assert_eq!(config.top_n, 10);
        assert_eq!(config.histogram_bins, 50);
        assert_eq!(config.adr_histogram_ceiling, 500.0);
        assert!(config.use_cache);
        assert!(config.output_dir.is_none());
    }

    #[test]
    fn test_builder_defaults_match_default() {
        let config = PipelineConfig::builder().build().unwrap();
        assert_eq!(config, PipelineConfig::default());
    }

    #[test]
    fn test_builder_custom_values() {
        let config = PipelineConfig::builder()
            .source_path("bookings.csv")
            .infer_schema_length(1000)
            .use_cache(false)
            .top_n(5)
            .output_dir("out")
            .build()
            .unwrap();

        assert_eq!(config.source_path, PathBuf::from("bookings.csv"));
        assert_eq!(config.infer_schema_length, Some(1000));
        assert!(!config.use_cache);
        assert_eq!(config.top_n, 5);
        assert_eq!(config.output_dir, Some(PathBuf::from("out")));
    }

    #[test]
    fn test_validation_rejects_zero_top_n() {
        let result = PipelineConfig::builder().top_n(0).build();
        assert_eq!(result.unwrap_err(), ConfigValidationError::ZeroValue("top_n"));
    }

    #[test]
    fn test_validation_rejects_bad_ceiling() {
        let result = PipelineConfig::builder()
            .adr_histogram_ceiling(f64::NAN)
            .build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidCeiling(_)
        ));
    }

    #[test]
    fn test_validation_rejects_empty_source() {
        let result = PipelineConfig::builder().source_path("").build();
        assert_eq!(result.unwrap_err(), ConfigValidationError::EmptySourcePath);
    }

    #[test]
    fn test_config_statistics_options() {
        let config = PipelineConfig::builder().top_n(3).histogram_bins(20).build().unwrap();
        let options = config.statistics_options();
        assert_eq!(options.top_n, 3);
        assert_eq!(options.histogram_bins, 20);
    }

    #[test]
    fn test_config_from_json() {
        let json = r#"{
            "source_path": "custom.csv",
            "top_n": 7,
            "output_dir": "exports"
        }"#;

        let config: PipelineConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.source_path, PathBuf::from("custom.csv"));
        assert_eq!(config.top_n, 7);
        assert_eq!(config.output_dir, Some(PathBuf::from("exports")));
        assert_eq!(config.histogram_bins, 50);
    }
}
