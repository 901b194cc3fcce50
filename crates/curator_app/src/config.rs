use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use curator_engine::ApiSettings;
use curator_logging::curator_info;
use serde::{Deserialize, Serialize};

use crate::persistence::SESSION_FILENAME;

pub const DEFAULT_CONFIG_FILE: &str = "curator.ron";

/// Settings read from `curator.ron`. Every field may be omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub page_size: u32,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub success_codes: Vec<String>,
    pub api_key: Option<String>,
    pub max_concurrent_previews: usize,
    pub session_file: PathBuf,
    /// How long one command waits for outstanding fetches.
    pub settle_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        let api = ApiSettings::default();
        Self {
            base_url: api.base_url,
            page_size: api.page_size,
            connect_timeout_secs: api.connect_timeout.as_secs(),
            request_timeout_secs: api.request_timeout.as_secs(),
            success_codes: api.success_codes,
            api_key: api.api_key,
            max_concurrent_previews: api.max_concurrent_previews,
            session_file: PathBuf::from(SESSION_FILENAME),
            settle_timeout_secs: 60,
        }
    }
}

impl AppConfig {
    /// Reads `explicit` if given, else `./curator.ron` if it exists, else defaults.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        match explicit {
            Some(path) => Self::read(path),
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Self::read(path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn read(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::parse(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        curator_info!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn parse(text: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(text)
    }

    /// Command-line and environment values win over the file.
    pub fn with_overrides(mut self, base_url: Option<String>, api_key: Option<String>) -> Self {
        if let Some(base_url) = base_url {
            self.base_url = base_url;
        }
        if api_key.is_some() {
            self.api_key = api_key;
        }
        self
    }

    pub fn settle_timeout(&self) -> Duration {
        Duration::from_secs(self.settle_timeout_secs)
    }

    pub fn api_settings(&self) -> ApiSettings {
        ApiSettings {
            base_url: self.base_url.clone(),
            page_size: self.page_size.max(1),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            success_codes: self.success_codes.clone(),
            api_key: self.api_key.clone(),
            max_concurrent_previews: self.max_concurrent_previews,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_fields_take_defaults() {
        let config = AppConfig::parse(r#"(base_url: "https://api.example", page_size: 20)"#).unwrap();
        assert_eq!(config.base_url, "https://api.example");
        assert_eq!(config.page_size, 20);
        assert_eq!(config.success_codes, vec!["200-4".to_string()]);
        assert_eq!(config.session_file, PathBuf::from(SESSION_FILENAME));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppConfig::load(Some(&dir.path().join("absent.ron"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn explicit_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("curator.ron");
        fs::write(&path, r#"(api_key: Some("k"), request_timeout_secs: 5)"#).unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();
        let api = config.api_settings();
        assert_eq!(api.api_key.as_deref(), Some("k"));
        assert_eq!(api.request_timeout, Duration::from_secs(5));
        assert_eq!(api.connect_timeout, Duration::from_secs(10));
    }

    #[test]
    fn malformed_file_reports_parse_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("curator.ron");
        fs::write(&path, "(page_size: \"ten\")").unwrap();

        let err = AppConfig::load(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn overrides_replace_only_given_values() {
        let config = AppConfig {
            api_key: Some("file-key".to_string()),
            ..AppConfig::default()
        }
        .with_overrides(Some("http://other:9000".to_string()), None);

        assert_eq!(config.base_url, "http://other:9000");
        assert_eq!(config.api_key.as_deref(), Some("file-key"));
    }
}
