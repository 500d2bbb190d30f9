//! Runtime validation of loaded configuration.

use crate::schema::Config;
use vgsales_common::{Result, SalesError};

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates a configuration, reporting the first offending field.
    ///
    /// # Errors
    ///
    /// Returns [`SalesError::Validation`] with the field path set.
    pub fn validate(config: &Config) -> Result<()> {
        if config.dataset.path.as_os_str().is_empty() {
            return Err(SalesError::validation_field(
                "Dataset path cannot be empty",
                "dataset.path",
            ));
        }

        if !config.dataset.delimiter.is_ascii() {
            return Err(SalesError::validation_field(
                format!(
                    "Delimiter must be a single ASCII character, got '{}'",
                    config.dataset.delimiter
                ),
                "dataset.delimiter",
            ));
        }

        if config.dashboard.language.trim().is_empty() {
            return Err(SalesError::validation_field(
                "Language cannot be empty",
                "dashboard.language",
            ));
        }

        if config.dashboard.top_n == 0 {
            return Err(SalesError::validation_field(
                "Top-N size must be at least 1",
                "dashboard.top_n",
            ));
        }

        let threshold = config.dashboard.others_threshold_percent;
        if !(0.0..100.0).contains(&threshold) {
            return Err(SalesError::validation_field(
                format!("OTHERS threshold must be in [0, 100), got {threshold}"),
                "dashboard.others_threshold_percent",
            ));
        }

        if let Some(range) = config.dashboard.year_range {
            if range.min > range.max {
                return Err(SalesError::validation_field(
                    format!("Year range is inverted: {} > {}", range.min, range.max),
                    "dashboard.year_range",
                ));
            }
        }

        if config.output.width == 0 || config.output.height == 0 {
            return Err(SalesError::validation_field(
                "Chart dimensions must be positive",
                "output.width",
            ));
        }

        if config.output.palette.is_empty() {
            return Err(SalesError::validation_field(
                "Palette needs at least one color",
                "output.palette",
            ));
        }

        if let Some(bad) = std::iter::once(&config.output.background)
            .chain(config.output.palette.iter())
            .find(|color| !is_hex_color(color))
        {
            return Err(SalesError::validation_field(
                format!("Invalid color '{bad}', expected #rrggbb"),
                "output.palette",
            ));
        }

        if config.cache.enabled && config.cache.max_capacity == 0 {
            return Err(SalesError::validation_field(
                "Cache capacity must be positive when the cache is enabled",
                "cache.max_capacity",
            ));
        }

        Ok(())
    }
}

fn is_hex_color(value: &str) -> bool {
    value
        .strip_prefix('#')
        .is_some_and(|hex| hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()))
}
