//! Service settings loaded from `config.toml` and the environment.
//!
//! Every key is optional. Values from the file are applied first, then the
//! `DATABASE_URL`, `BIND_ADDRESS` and `UPLOAD_DIR` environment variables (usually
//! populated from `.env`) override them.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Settings for the HTTP service
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Address the HTTP listener binds to
    pub bind_address: String,
    /// `SeaORM` connection string
    pub database_url: String,
    /// Directory photos are written to; `None` disables uploads
    pub upload_dir: Option<PathBuf>,
    /// Default look-ahead for the upcoming reminders view, in days
    pub upcoming_window_days: u32,
    /// Largest accepted request body for plant forms, in bytes
    pub max_upload_bytes: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
            database_url: super::database::DEFAULT_DATABASE_URL.to_string(),
            upload_dir: Some(PathBuf::from("uploads")),
            upcoming_window_days: 7,
            max_upload_bytes: 5 * 1024 * 1024,
        }
    }
}

impl Settings {
    /// Applies environment overrides on top of the current values.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("DATABASE_URL") {
            self.database_url = url;
        }
        if let Ok(addr) = std::env::var("BIND_ADDRESS") {
            self.bind_address = addr;
        }
        if let Ok(dir) = std::env::var("UPLOAD_DIR") {
            self.upload_dir = if dir.trim().is_empty() {
                None
            } else {
                Some(PathBuf::from(dir))
            };
        }
        self
    }
}

/// Parses settings from a TOML string.
pub fn parse_settings(contents: &str) -> Result<Settings> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads settings from a TOML file.
///
/// # Errors
/// Returns an error if the file cannot be read or the TOML is invalid.
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path = path.as_ref();
    debug!("Loading settings from {:?}", path);
    let contents = std::fs::read_to_string(path).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path.display()),
    })?;
    parse_settings(&contents)
}

/// Loads `./config.toml` when present, falls back to defaults otherwise, and
/// applies environment overrides in both cases.
pub fn load_default_settings() -> Result<Settings> {
    let path = Path::new("config.toml");
    let settings = if path.exists() {
        load_settings(path)?
    } else {
        info!("No config.toml found, using default settings");
        Settings::default()
    };
    Ok(settings.with_env_overrides())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_full_settings() {
        let toml_str = r#"
            bind_address = "127.0.0.1:8080"
            database_url = "sqlite::memory:"
            upload_dir = "/var/lib/garden/photos"
            upcoming_window_days = 14
            max_upload_bytes = 1024
        "#;

        let settings = parse_settings(toml_str).unwrap();
        assert_eq!(settings.bind_address, "127.0.0.1:8080");
        assert_eq!(settings.database_url, "sqlite::memory:");
        assert_eq!(
            settings.upload_dir,
            Some(PathBuf::from("/var/lib/garden/photos"))
        );
        assert_eq!(settings.upcoming_window_days, 14);
        assert_eq!(settings.max_upload_bytes, 1024);
    }

    #[test]
    fn test_missing_keys_use_defaults() {
        let settings = parse_settings("bind_address = \"127.0.0.1:9000\"").unwrap();
        assert_eq!(settings.bind_address, "127.0.0.1:9000");
        assert_eq!(settings.upcoming_window_days, 7);
        assert_eq!(settings.upload_dir, Some(PathBuf::from("uploads")));
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let result = parse_settings("upcoming_window_days = \"soon\"");
        assert!(matches!(result, Err(Error::Config { .. })));
    }
}
