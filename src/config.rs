//! Configuration handling for sales-board.
//!
//! Settings are resolved in this order: command line flag or environment variable, then the
//! optional JSON configuration file passed with `--config`, then the built-in default. The record
//! store connection string has no default and must be provided.

use crate::args::Common;
use crate::error::{ErrorType, IntoResult, Res};
use crate::Result;
use anyhow::{ensure, Context};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

const APP_NAME: &str = "sales-board";
const CONFIG_VERSION: u8 = 1;
const DEFAULT_DATASET_URL: &str = "https://s3.amazonaws.com/roxiler.com/product_transaction.json";
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;

/// The resolved configuration of the app.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Config {
    database_url: String,
    dataset_url: Url,
    fetch_timeout: Duration,
    host: String,
    port: u16,
}

impl Config {
    /// Creates a configuration that uses `database_url` and the defaults for everything else.
    pub fn new(database_url: impl Into<String>) -> Result<Self> {
        Self::resolve(Some(database_url.into()), None, None, None, None)
            .pub_result(ErrorType::Config)
    }

    /// Resolves the configuration from `common`, reading the config file it names (if any).
    ///
    /// # Errors
    /// - The config file cannot be read or parsed, or has the wrong `app_name`
    /// - No database URL was provided
    /// - The dataset URL is not a valid URL
    pub async fn load(common: &Common) -> Result<Self> {
        Self::load_inner(common).await.pub_result(ErrorType::Config)
    }

    async fn load_inner(common: &Common) -> Res<Self> {
        let file = match common.config() {
            Some(path) => ConfigFile::load(path).await?,
            None => ConfigFile::default(),
        };
        Self::resolve(
            common.database_url().map(String::from).or(file.database_url),
            common.dataset_url().map(String::from).or(file.dataset_url),
            common.fetch_timeout_secs().or(file.fetch_timeout_secs),
            common.host().map(String::from).or(file.host),
            common.port().or(file.port),
        )
    }

    fn resolve(
        database_url: Option<String>,
        dataset_url: Option<String>,
        fetch_timeout_secs: Option<u64>,
        host: Option<String>,
        port: Option<u16>,
    ) -> Res<Self> {
        let database_url = database_url.context(
            "No record store connection string was provided, set DATABASE_URL or --database-url",
        )?;
        let dataset_url = dataset_url.unwrap_or_else(|| DEFAULT_DATASET_URL.to_string());
        let dataset_url = Url::parse(&dataset_url)
            .with_context(|| format!("Invalid dataset URL '{dataset_url}'"))?;
        let fetch_timeout_secs = fetch_timeout_secs.unwrap_or(DEFAULT_FETCH_TIMEOUT_SECS);
        ensure!(
            fetch_timeout_secs > 0,
            "The fetch timeout must be at least one second"
        );

        Ok(Self {
            database_url,
            dataset_url,
            fetch_timeout: Duration::from_secs(fetch_timeout_secs),
            host: host.unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: port.unwrap_or(DEFAULT_PORT),
        })
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn dataset_url(&self) -> &Url {
        &self.dataset_url
    }

    pub fn fetch_timeout(&self) -> Duration {
        self.fetch_timeout
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// The `host:port` the service binds to.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "sales-board",
///   "config_version": 1,
///   "database_url": "sqlite:/var/lib/sales-board/sales.sqlite",
///   "dataset_url": "https://s3.amazonaws.com/roxiler.com/product_transaction.json",
///   "fetch_timeout_secs": 30,
///   "host": "127.0.0.1",
///   "port": 5000
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "sales-board"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    database_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    dataset_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    fetch_timeout_secs: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    host: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    port: Option<u16>,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            database_url: None,
            dataset_url: None,
            fetch_timeout_secs: None,
            host: None,
            port: None,
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile asynchronously from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed
    async fn load(path: impl AsRef<Path>) -> Res<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file at {}", path.display()))?;

        let config: ConfigFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file at {}", path.display()))?;

        ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );

        Ok(config)
    }

    #[cfg(test)]
    async fn save(&self, path: impl AsRef<Path>) -> Res<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        tokio::fs::write(p, data)
            .await
            .with_context(|| format!("Unable to write config file {}", p.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tracing_subscriber::filter::LevelFilter;

    fn common() -> Common {
        Common::new(LevelFilter::INFO)
    }

    #[test]
    fn test_config_new_uses_defaults() {
        let config = Config::new("sqlite:x.sqlite").unwrap();
        assert_eq!(config.database_url(), "sqlite:x.sqlite");
        assert_eq!(config.dataset_url().as_str(), DEFAULT_DATASET_URL);
        assert_eq!(config.fetch_timeout(), Duration::from_secs(30));
        assert_eq!(config.listen_addr(), "0.0.0.0:5000");
    }

    #[tokio::test]
    async fn test_config_requires_database_url() {
        let e = Config::load(&common()).await.unwrap_err();
        assert_eq!(e.error_type(), ErrorType::Config);
        assert!(e.to_string().contains("DATABASE_URL"));
    }

    #[tokio::test]
    async fn test_config_file_values_are_used() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        let file = ConfigFile {
            database_url: Some("sqlite:from-file.sqlite".into()),
            dataset_url: Some("http://localhost:9999/data.json".into()),
            fetch_timeout_secs: Some(3),
            host: Some("127.0.0.1".into()),
            port: Some(7000),
            ..ConfigFile::default()
        };
        file.save(&path).await.unwrap();

        let config = Config::load(&common().with_config(&path)).await.unwrap();

        assert_eq!(config.database_url(), "sqlite:from-file.sqlite");
        assert_eq!(
            config.dataset_url().as_str(),
            "http://localhost:9999/data.json"
        );
        assert_eq!(config.fetch_timeout(), Duration::from_secs(3));
        assert_eq!(config.listen_addr(), "127.0.0.1:7000");
    }

    #[tokio::test]
    async fn test_flags_override_config_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        let file = ConfigFile {
            database_url: Some("sqlite:from-file.sqlite".into()),
            port: Some(7000),
            ..ConfigFile::default()
        };
        file.save(&path).await.unwrap();

        let common = common()
            .with_config(&path)
            .with_database_url("sqlite:from-flag.sqlite")
            .with_port(8000);
        let config = Config::load(&common).await.unwrap();

        assert_eq!(config.database_url(), "sqlite:from-flag.sqlite");
        assert_eq!(config.port(), 8000);
    }

    #[tokio::test]
    async fn test_config_file_load_with_minimal_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        tokio::fs::write(&path, r#"{"app_name": "sales-board", "config_version": 1}"#)
            .await
            .unwrap();
        let file = ConfigFile::load(&path).await.unwrap();
        assert_eq!(file, ConfigFile::default());
    }

    #[tokio::test]
    async fn test_config_file_load_invalid_app_name() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        tokio::fs::write(&path, r#"{"app_name": "some-other-app", "config_version": 1}"#)
            .await
            .unwrap();
        let result = ConfigFile::load(&path).await;
        assert!(result.unwrap_err().to_string().contains("Invalid app_name"));
    }

    #[test]
    fn test_invalid_dataset_url() {
        let e = Config::resolve(Some("sqlite:x".into()), Some("not a url".into()), None, None, None)
            .unwrap_err();
        assert!(e.to_string().contains("Invalid dataset URL"));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        assert!(Config::resolve(Some("sqlite:x".into()), None, Some(0), None, None).is_err());
    }

    #[test]
    fn test_config_file_serialization_omits_none_fields() {
        let json = serde_json::to_string(&ConfigFile::default()).unwrap();
        assert!(!json.contains("database_url"));
        assert!(!json.contains("port"));
    }
}
