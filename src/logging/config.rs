//! Logging configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const VALID_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Global log level (trace, debug, info, warn, error)
    pub global_level: String,

    /// Enable console output
    pub console_output: bool,

    /// Directory for JSON log files (None = no file logging)
    pub log_directory: Option<PathBuf>,

    /// Include file location in console logs
    pub include_file_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            global_level: "info".to_string(),
            console_output: true,
            log_directory: None,
            include_file_location: false,
        }
    }
}

impl LoggingConfig {
    /// Map a `-v` count onto a level, starting from `warn`.
    pub fn with_verbosity(mut self, verbose: u8) -> Self {
        self.global_level = match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
        .to_string();
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if !VALID_LEVELS.contains(&self.global_level.as_str()) {
            return Err(format!(
                "Invalid global_level: {}. Must be one of: {:?}",
                self.global_level, VALID_LEVELS
            ));
        }

        if let Some(ref log_dir) = self.log_directory {
            if let Some(parent) = log_dir.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    return Err(format!("Log directory parent does not exist: {:?}", parent));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LoggingConfig::default();
        assert_eq!(config.global_level, "info");
        assert!(config.console_output);
        assert!(config.log_directory.is_none());
        assert!(!config.include_file_location);
    }

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(LoggingConfig::default().with_verbosity(0).global_level, "warn");
        assert_eq!(LoggingConfig::default().with_verbosity(2).global_level, "debug");
        assert_eq!(LoggingConfig::default().with_verbosity(9).global_level, "trace");
    }

    #[test]
    fn test_config_validation() {
        let mut config = LoggingConfig::default();
        assert!(config.validate().is_ok());

        config.global_level = "loud".to_string();
        assert!(config.validate().is_err());

        config.global_level = "warn".to_string();
        config.log_directory = Some(PathBuf::from("/definitely/missing/parent/logs"));
        assert!(config.validate().is_err());
    }
}
