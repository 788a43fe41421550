use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::{fs, path::PathBuf};
use tracing::debug;

pub const DEFAULT_BASE_RATE: &str = "EUR";

const ENV_EXCHANGE_ENDPOINT: &str = "EXCHANGE_ENDPOINT";
const ENV_APP_ID: &str = "APP_ID";
const ENV_BASE_RATE: &str = "BASE_RATE";
const ENV_S3_BUCKET: &str = "S3_BUCKET";
const ENV_STORAGE_BACKEND: &str = "STORAGE_BACKEND";
const ENV_DATA_PATH: &str = "DATA_PATH";

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    S3,
    Disk,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "s3" => Ok(StorageBackend::S3),
            "disk" => Ok(StorageBackend::Disk),
            other => Err(anyhow!("Unknown storage backend: {other}")),
        }
    }
}

fn default_base_rate() -> String {
    DEFAULT_BASE_RATE.to_string()
}

/// Settings for a single invocation. Built once and passed down by reference.
#[derive(Deserialize, Serialize, Clone, PartialEq)]
pub struct AppConfig {
    pub exchange_endpoint: String,
    pub app_id: String,
    #[serde(default = "default_base_rate")]
    pub base_rate: String,
    pub storage_bucket: String,
    #[serde(default)]
    pub storage_backend: StorageBackend,
    pub data_path: Option<String>,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("exchange_endpoint", &self.exchange_endpoint)
            .field("app_id", &"<redacted>")
            .field("base_rate", &self.base_rate)
            .field("storage_bucket", &self.storage_bucket)
            .field("storage_backend", &self.storage_backend)
            .field("data_path", &self.data_path)
            .finish()
    }
}

impl AppConfig {
    /// Resolves configuration from an explicit file, the environment, or the
    /// default config file, in that order.
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        Self::resolve(
            config_path,
            |key| std::env::var(key).ok(),
            Self::default_config_path,
        )
    }

    /// The environment wins as soon as any required key is set. Without one,
    /// the default config file is used if present; otherwise the environment
    /// error names the first missing key.
    fn resolve<F, D>(config_path: Option<&str>, lookup: F, default_path: D) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
        D: FnOnce() -> Result<PathBuf>,
    {
        if let Some(path) = config_path {
            return Self::load_from_path(path);
        }

        let env_configured = [ENV_EXCHANGE_ENDPOINT, ENV_APP_ID, ENV_S3_BUCKET]
            .into_iter()
            .any(|key| lookup(key).is_some());
        if env_configured {
            debug!("Loading config from environment");
            return Self::from_lookup(lookup);
        }

        match default_path() {
            Ok(path) if path.exists() => {
                debug!("Loading default config");
                Self::load_from_path(&path)
            }
            _ => Self::from_lookup(lookup),
        }
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| anyhow!("Missing required environment variable: {key}"))
        };

        let storage_backend = match lookup(ENV_STORAGE_BACKEND) {
            Some(value) => value
                .parse()
                .with_context(|| format!("Invalid value for {ENV_STORAGE_BACKEND}"))?,
            None => StorageBackend::default(),
        };

        Ok(Self {
            exchange_endpoint: required(ENV_EXCHANGE_ENDPOINT)?,
            app_id: required(ENV_APP_ID)?,
            base_rate: lookup(ENV_BASE_RATE)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(default_base_rate),
            storage_bucket: required(ENV_S3_BUCKET)?,
            storage_backend,
            data_path: lookup(ENV_DATA_PATH),
        })
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("io", "fxsnap", "fxsnap")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn default_data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        let proj_dirs = ProjectDirs::from("io", "fxsnap", "fxsnap")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
exchange_endpoint: "https://openexchangerates.org/api/latest.json"
app_id: "secret"
base_rate: "USD"
storage_bucket: "rates"
storage_backend: disk
data_path: "/tmp/fxsnap"
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(
            config.exchange_endpoint,
            "https://openexchangerates.org/api/latest.json"
        );
        assert_eq!(config.app_id, "secret");
        assert_eq!(config.base_rate, "USD");
        assert_eq!(config.storage_bucket, "rates");
        assert_eq!(config.storage_backend, StorageBackend::Disk);
        assert_eq!(config.data_path.as_deref(), Some("/tmp/fxsnap"));

        let minimal = r#"
exchange_endpoint: "http://example.com/latest.json"
app_id: "abc"
storage_bucket: "rates"
"#;
        let config: AppConfig = serde_yaml::from_str(minimal).unwrap();
        assert_eq!(config.base_rate, "EUR");
        assert_eq!(config.storage_backend, StorageBackend::S3);
        assert!(config.data_path.is_none());
    }

    #[test]
    fn test_from_lookup_reads_all_keys() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("EXCHANGE_ENDPOINT", "http://example.com/latest.json"),
            ("APP_ID", "abc"),
            ("BASE_RATE", "GBP"),
            ("S3_BUCKET", "rates"),
            ("STORAGE_BACKEND", "Disk"),
            ("DATA_PATH", "/var/lib/fxsnap"),
        ]))
        .unwrap();

        assert_eq!(config.exchange_endpoint, "http://example.com/latest.json");
        assert_eq!(config.app_id, "abc");
        assert_eq!(config.base_rate, "GBP");
        assert_eq!(config.storage_bucket, "rates");
        assert_eq!(config.storage_backend, StorageBackend::Disk);
        assert_eq!(config.data_path.as_deref(), Some("/var/lib/fxsnap"));
    }

    #[test]
    fn test_from_lookup_defaults_base_rate_and_backend() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("EXCHANGE_ENDPOINT", "http://example.com/latest.json"),
            ("APP_ID", "abc"),
            ("S3_BUCKET", "rates"),
        ]))
        .unwrap();

        assert_eq!(config.base_rate, DEFAULT_BASE_RATE);
        assert_eq!(config.storage_backend, StorageBackend::S3);
    }

    #[test]
    fn test_from_lookup_missing_required_key() {
        let result = AppConfig::from_lookup(lookup_from(&[
            ("EXCHANGE_ENDPOINT", "http://example.com/latest.json"),
            ("S3_BUCKET", "rates"),
        ]));
        assert_eq!(
            result.unwrap_err().to_string(),
            "Missing required environment variable: APP_ID"
        );
    }

    #[test]
    fn test_from_lookup_rejects_unknown_backend() {
        let result = AppConfig::from_lookup(lookup_from(&[
            ("EXCHANGE_ENDPOINT", "http://example.com/latest.json"),
            ("APP_ID", "abc"),
            ("S3_BUCKET", "rates"),
            ("STORAGE_BACKEND", "gcs"),
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn test_debug_redacts_app_id() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("EXCHANGE_ENDPOINT", "http://example.com/latest.json"),
            ("APP_ID", "very-secret-token"),
            ("S3_BUCKET", "rates"),
        ]))
        .unwrap();

        let rendered = format!("{config:?}");
        assert!(!rendered.contains("very-secret-token"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_resolve_partial_env_names_missing_key() {
        let default_path = tempfile::tempdir().unwrap().path().join("config.yaml");
        let result = AppConfig::resolve(
            None,
            lookup_from(&[("APP_ID", "abc"), ("S3_BUCKET", "rates")]),
            || Ok(default_path),
        );
        assert_eq!(
            result.unwrap_err().to_string(),
            "Missing required environment variable: EXCHANGE_ENDPOINT"
        );
    }

    #[test]
    fn test_resolve_prefers_env_over_default_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let default_path = dir.path().join("config.yaml");
        fs::write(
            &default_path,
            "exchange_endpoint: http://file.example\napp_id: file\nstorage_bucket: file-bucket\n",
        )?;

        let config = AppConfig::resolve(
            None,
            lookup_from(&[
                ("EXCHANGE_ENDPOINT", "http://env.example"),
                ("APP_ID", "env"),
                ("S3_BUCKET", "env-bucket"),
            ]),
            || Ok(default_path),
        )?;
        assert_eq!(config.storage_bucket, "env-bucket");
        Ok(())
    }

    #[test]
    fn test_resolve_uses_default_file_without_env() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let default_path = dir.path().join("config.yaml");
        fs::write(
            &default_path,
            "exchange_endpoint: http://file.example\napp_id: file\nstorage_bucket: file-bucket\n",
        )?;

        let config = AppConfig::resolve(None, lookup_from(&[]), || Ok(default_path))?;
        assert_eq!(config.storage_bucket, "file-bucket");
        Ok(())
    }

    #[test]
    fn test_resolve_without_env_or_file_reports_env_error() {
        let default_path = tempfile::tempdir().unwrap().path().join("config.yaml");
        let result = AppConfig::resolve(None, lookup_from(&[]), || Ok(default_path));
        assert_eq!(
            result.unwrap_err().to_string(),
            "Missing required environment variable: EXCHANGE_ENDPOINT"
        );
    }

    #[test]
    fn test_load_from_path() -> Result<()> {
        let file = tempfile::NamedTempFile::new()?;
        fs::write(
            file.path(),
            "exchange_endpoint: http://example.com\napp_id: abc\nstorage_bucket: rates\n",
        )?;

        let config = AppConfig::load(file.path().to_str())?;
        assert_eq!(config.storage_bucket, "rates");
        Ok(())
    }
}
