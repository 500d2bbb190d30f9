//! Configuration loading utilities

use crate::schema::{Config, OutputFormat};
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};
use vgsales_common::{Result as SalesResult, SalesError};

/// Environment variable naming the configuration file.
pub const CONFIG_PATH_ENV: &str = "VGSALES_CONFIG_PATH";

/// File names probed in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILES: [&str; 3] = ["dashboard.yaml", "dashboard.yml", "dashboard.toml"];

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading configuration file
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML configuration: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("Failed to parse TOML configuration: {0}")]
    TomlError(#[from] toml::de::Error),

    /// File extension is neither YAML nor TOML
    #[error("Unsupported configuration format: {0}")]
    UnsupportedFormat(PathBuf),

    /// Environment variable parsing error
    #[error("Failed to parse environment variable '{var}': {message}")]
    EnvParseError {
        /// Variable name.
        var: String,
        /// Why the value was rejected.
        message: String,
    },
}

impl From<ConfigError> for SalesError {
    fn from(err: ConfigError) -> Self {
        SalesError::config_with_source("Configuration loading failed", err)
    }
}

/// Configuration loader for the application
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from the first available source: `explicit` path,
    /// then `VGSALES_CONFIG_PATH`, then a default file in the working
    /// directory, then built-in defaults. Environment overrides are applied
    /// and the result is validated.
    ///
    /// # Errors
    ///
    /// Fails when a named file cannot be read or parsed, an override is
    /// malformed, or validation fails.
    pub fn load(explicit: Option<&Path>) -> SalesResult<Config> {
        let (config, report) = Self::load_with_report(explicit)?;
        report.log();
        Ok(config)
    }

    /// Same as [`ConfigLoader::load`], but returns what was loaded instead of
    /// logging it, for callers that install the subscriber from the loaded
    /// configuration.
    ///
    /// # Errors
    ///
    /// Same as [`ConfigLoader::load`].
    pub fn load_with_report(explicit: Option<&Path>) -> SalesResult<(Config, LoadReport)> {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| env::var_os(CONFIG_PATH_ENV).map(PathBuf::from))
            .or_else(|| {
                DEFAULT_CONFIG_FILES
                    .into_iter()
                    .map(PathBuf::from)
                    .find(|candidate| candidate.exists())
            });

        let mut config = match &path {
            Some(path) => Self::parse_file(path)?,
            None => Config::default(),
        };

        let overrides = Self::apply_overrides(&mut config, |var| env::var(var).ok())?;
        config.validate()?;
        Ok((
            config,
            LoadReport {
                source: path,
                overrides,
            },
        ))
    }

    /// Load configuration from a specific file, with environment overrides
    /// and validation.
    ///
    /// # Errors
    ///
    /// Same as [`ConfigLoader::load`].
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> SalesResult<Config> {
        Self::load(Some(path.as_ref()))
    }

    /// Parse a YAML or TOML file chosen by extension, without overrides.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read, has an unknown extension, or does
    /// not parse.
    pub fn parse_file(path: &Path) -> Result<Config, ConfigError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        let content = std::fs::read_to_string(path)?;
        match extension.as_deref() {
            Some("yaml" | "yml") => Self::from_yaml_str(&content),
            Some("toml") => Self::from_toml_str(&content),
            _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    /// Parse a YAML document; missing sections take their defaults.
    ///
    /// # Errors
    ///
    /// Fails on malformed YAML or mistyped values.
    pub fn from_yaml_str(content: &str) -> Result<Config, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Parse a TOML document; missing sections take their defaults.
    ///
    /// # Errors
    ///
    /// Fails on malformed TOML or mistyped values.
    pub fn from_toml_str(content: &str) -> Result<Config, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Apply environment variable overrides to configuration
    ///
    /// # Errors
    ///
    /// Fails when `VGSALES_OUTPUT_FORMAT` holds an unknown format.
    pub fn apply_env_overrides(config: &mut Config) -> Result<(), ConfigError> {
        for var in Self::apply_overrides(config, |var| env::var(var).ok())? {
            debug!("Applied {} from environment", var);
        }
        Ok(())
    }

    /// Apply overrides from an arbitrary variable source, returning the names
    /// of the variables that were applied.
    fn apply_overrides<F>(config: &mut Config, lookup: F) -> Result<Vec<&'static str>, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut applied = Vec::new();

        if let Some(path) = lookup("VGSALES_DATASET") {
            config.dataset.path = PathBuf::from(path);
            applied.push("VGSALES_DATASET");
        }

        if let Some(language) = lookup("VGSALES_LANGUAGE") {
            config.dashboard.language = language;
            applied.push("VGSALES_LANGUAGE");
        }

        if let Some(directory) = lookup("VGSALES_OUTPUT_DIR") {
            config.output.directory = PathBuf::from(directory);
            applied.push("VGSALES_OUTPUT_DIR");
        }

        if let Some(format) = lookup("VGSALES_OUTPUT_FORMAT") {
            config.output.format = match format.trim().to_ascii_lowercase().as_str() {
                "png" => OutputFormat::Png,
                "svg" => OutputFormat::Svg,
                "json" => OutputFormat::Json,
                other => {
                    return Err(ConfigError::EnvParseError {
                        var: "VGSALES_OUTPUT_FORMAT".to_string(),
                        message: format!("unknown format '{other}', expected png, svg or json"),
                    })
                }
            };
            applied.push("VGSALES_OUTPUT_FORMAT");
        }

        if let Some(level) = lookup("VGSALES_LOG_LEVEL") {
            config.logging.level = level;
            applied.push("VGSALES_LOG_LEVEL");
        }

        Ok(applied)
    }
}

/// Where a loaded configuration came from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoadReport {
    /// File the configuration was read from; `None` for built-in defaults.
    pub source: Option<PathBuf>,
    /// Environment variables that overrode file or default values.
    pub overrides: Vec<&'static str>,
}

impl LoadReport {
    /// Logs the source and the applied overrides.
    pub fn log(&self) {
        match &self.source {
            Some(path) => info!("Loaded configuration from {}", path.display()),
            None => info!("No configuration file found, using defaults"),
        }
        for var in &self.overrides {
            debug!("Applied {} from environment", var);
        }
    }
}
