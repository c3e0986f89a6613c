use std::{env, fs, path::Path};

use chrono_tz::Tz;
use serde::Deserialize;

use crate::error::{AppError, Result};

pub const CONFIG_PATH_VAR: &str = "OPEN_NOW_CONFIG";
pub const BIND_VAR: &str = "OPEN_NOW_BIND";
pub const DEFAULT_TZ_VAR: &str = "OPEN_NOW_DEFAULT_TZ";

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    pub bind_address: String,
    /// Zone used for venues that carry neither a zone name nor a UTC offset.
    pub default_time_zone: String,
    pub max_body_bytes: usize,
    pub log_json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:7878".to_string(),
            default_time_zone: "UTC".to_string(),
            max_body_bytes: 1024 * 1024,
            log_json: false,
        }
    }
}

impl Config {
    pub fn from_config(config: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(config).map_err(|err| AppError::Config {
            message: format!("Could not deserialize.\n{}", err),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref()).map_err(|err| AppError::Config {
            message: format!("Could not read {}: {}", path.as_ref().display(), err),
        })?;
        Self::from_config(&text)
    }

    /// Reads the file named by `OPEN_NOW_CONFIG` if set, then applies the
    /// single-value environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = match env::var(CONFIG_PATH_VAR) {
            Ok(path) => Self::from_file(path)?,
            Err(_) => Self::default(),
        };
        if let Ok(bind) = env::var(BIND_VAR) {
            config.bind_address = bind;
        }
        if let Ok(zone) = env::var(DEFAULT_TZ_VAR) {
            config.default_time_zone = zone;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.bind_address.trim().is_empty() {
            return Err(AppError::Config {
                message: "bind_address must not be empty".to_string(),
            });
        }
        if self.max_body_bytes == 0 {
            return Err(AppError::Config {
                message: "max_body_bytes must be positive".to_string(),
            });
        }
        self.default_tz()?;
        Ok(())
    }

    pub fn default_tz(&self) -> Result<Tz> {
        self.default_time_zone
            .parse::<Tz>()
            .map_err(|_| AppError::Config {
                message: format!("Unknown time zone '{}'", self.default_time_zone),
            })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config = Config::from_config(r#"{ "default_time_zone": "Europe/London" }"#).unwrap();
        assert_eq!(config.bind_address, "127.0.0.1:7878");
        assert_eq!(config.default_tz().unwrap(), chrono_tz::Europe::London);
        assert_eq!(config.max_body_bytes, 1024 * 1024);
    }

    #[test]
    fn rejects_unknown_zone() {
        let err = Config::from_config(r#"{ "default_time_zone": "Mars/Olympus" }"#).unwrap_err();
        assert!(matches!(err, AppError::Config { .. }));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(Config::from_config("{ not json").is_err());
    }

    #[test]
    fn reads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "bind_address": "0.0.0.0:8080", "log_json": true }}"#).unwrap();
        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.bind_address, "0.0.0.0:8080");
        assert!(config.log_json);
    }
}
