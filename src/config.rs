use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::almanac::{Almanac, MonthKeying};
use crate::data::DataError;
use crate::messages::MessageCatalog;
use crate::range::CalendarDateRange;

/// Settings read from a JSON file. Every field is optional.
///
/// ```json
/// {
///   "month_keying": "calendar_first",
///   "supported_range": "1900-01-01/2033-12-31",
///   "data_dir": "/usr/share/kanshi"
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Key order for month-table lookups.
    #[serde(default)]
    pub month_keying:    MonthKeying,
    /// Dates the wizard accepts.
    #[serde(default)]
    pub supported_range: CalendarDateRange,
    /// Directory to read tables from instead of the bundled ones.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir:        Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", .path.display())]
    Io {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

impl Config {
    /// # Errors
    /// Returns `ConfigError::Json` for malformed JSON or unknown fields.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// # Errors
    /// Returns `ConfigError` if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&json)?;
        debug!("loaded config from {}: {config:?}", path.display());
        Ok(config)
    }

    /// Shorthand for [`Almanac::from_config`].
    ///
    /// # Errors
    /// Returns `DataError` if the tables cannot be loaded.
    pub fn load_almanac(&self) -> Result<Almanac, DataError> {
        Almanac::from_config(self)
    }

    /// Shorthand for [`MessageCatalog::from_config`].
    ///
    /// # Errors
    /// Returns `DataError` if the catalog cannot be loaded.
    pub fn load_messages(&self) -> Result<MessageCatalog, DataError> {
        MessageCatalog::from_config(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_json("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.month_keying, MonthKeying::SolarWithFallback);
        assert_eq!(config.supported_range, CalendarDateRange::tabulated());
        assert_eq!(config.data_dir, None);
    }

    #[test]
    fn test_full_config() {
        let config = Config::from_json(
            r#"{
                "month_keying": "solar",
                "supported_range": "1950-01-01/2000-12-31",
                "data_dir": "/tmp/tables"
            }"#,
        )
        .unwrap();
        assert_eq!(config.month_keying, MonthKeying::Solar);
        assert_eq!(config.supported_range.to_string(), "1950-01-01/2000-12-31");
        assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/tables")));
    }

    #[test]
    fn test_rejects_bad_config() {
        struct TestCase {
            json:        &'static str,
            description: &'static str,
        }

        let cases = [
            TestCase {
                json:        r#"{"keying": "solar"}"#,
                description: "unknown field",
            },
            TestCase {
                json:        r#"{"month_keying": "lunar"}"#,
                description: "unknown keying",
            },
            TestCase {
                json:        r#"{"supported_range": "2033-12-31/1900-01-01"}"#,
                description: "reversed range",
            },
            TestCase {
                json:        "month_keying = solar",
                description: "not json",
            },
        ];

        for case in &cases {
            let result = Config::from_json(case.json);
            assert!(matches!(result, Err(ConfigError::Json(_))), "{}", case.description);
        }
    }

    #[test]
    fn test_from_file_missing() {
        let result = Config::from_file("/nonexistent/kanshi.json");
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_serde_round_trip() {
        let config = Config {
            month_keying: MonthKeying::CalendarFirst,
            ..Config::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(
            json,
            r#"{"month_keying":"calendar_first","supported_range":"1900-01-01/2033-12-31"}"#
        );
        assert_eq!(Config::from_json(&json).unwrap(), config);
    }
}
