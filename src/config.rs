use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{EnricherError, Result};
use crate::pipeline::ingestion::{InputFormat, LoadOptions};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "LEAD_ENRICHER_CONFIG";
/// Config file picked up from the working directory when present
pub const DEFAULT_CONFIG_FILE: &str = "lead_enricher.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub input: InputConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Prospect table used when no `--input` is given
    pub path: Option<PathBuf>,
    pub format: InputFormat,
    /// CSV field delimiter (single ASCII character)
    pub delimiter: char,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            path: None,
            format: InputFormat::Auto,
            delimiter: ',',
        }
    }
}

impl InputConfig {
    pub fn load_options(&self) -> Result<LoadOptions> {
        if !self.delimiter.is_ascii() {
            return Err(EnricherError::Config(format!(
                "delimiter must be a single ASCII character, got '{}'",
                self.delimiter
            )));
        }
        Ok(LoadOptions {
            format: self.format,
            delimiter: self.delimiter as u8,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Directory for rolling JSON log files; `None` logs to the console only
    pub directory: Option<PathBuf>,
    pub file_name: String,
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub filter: String,
    pub json_file: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: None,
            file_name: "lead_enricher.log".to_string(),
            filter: "lead_enricher=info".to_string(),
            json_file: true,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            EnricherError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.input.load_options()?;
        Ok(config)
    }

    /// Resolve the config source: explicit path, then `LEAD_ENRICHER_CONFIG`,
    /// then `lead_enricher.toml` in the working directory, else defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            if !path.trim().is_empty() {
                return Self::load(Path::new(&path));
            }
        }
        let default_path = Path::new(DEFAULT_CONFIG_FILE);
        if default_path.exists() {
            return Self::load(default_path);
        }
        Ok(Self::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.input.delimiter, ',');
        assert_eq!(config.input.format, InputFormat::Auto);
        assert_eq!(config.logging.filter, "lead_enricher=info");
        assert!(config.logging.directory.is_none());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config = Config::from_toml(
            r#"
            [input]
            path = "data/prospects.csv"
            delimiter = ";"

            [logging]
            directory = "logs"
            "#,
        )
        .unwrap();

        assert_eq!(config.input.path, Some(PathBuf::from("data/prospects.csv")));
        assert_eq!(config.input.load_options().unwrap().delimiter, b';');
        assert_eq!(config.input.format, InputFormat::Auto);
        assert_eq!(config.logging.directory, Some(PathBuf::from("logs")));
        assert_eq!(config.logging.file_name, "lead_enricher.log");
    }

    #[test]
    fn test_format_is_lowercase() {
        let config = Config::from_toml("[input]\nformat = \"json\"\n").unwrap();
        assert_eq!(config.input.format, InputFormat::Json);
        assert!(Config::from_toml("[input]\nformat = \"xlsx\"\n").is_err());
    }

    #[test]
    fn test_non_ascii_delimiter_rejected() {
        let err = Config::from_toml("[input]\ndelimiter = \"§\"\n").unwrap_err();
        assert!(matches!(err, EnricherError::Config(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, EnricherError::Config(_)));
    }
}
