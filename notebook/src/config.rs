//! Configuration management for Notebook
//!
//! Settings are layered, later sources overriding earlier ones:
//!
//! 1. Built-in defaults (data directory `~/.notebook`, 10 second request
//!    timeout, no remote store)
//! 2. `config.yaml` inside the data directory
//! 3. `NOTEBOOK_*` environment variables
//! 4. An explicit data directory passed by the caller (the CLI `--data-dir`)
//!
//! The remote store is all-or-nothing: unless every connection parameter is
//! present the application runs against local storage only.

use crate::common::env_loader::EnvLoader;
use crate::error::{NotebookError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Prefix shared by every Notebook environment variable
pub const ENV_PREFIX: &str = "NOTEBOOK";

/// Name of the YAML configuration file inside the data directory
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Default remote request timeout
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

const DEFAULT_DATA_DIR_NAME: &str = ".notebook";

/// Connection parameters for the hosted realtime database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Web API key
    pub api_key: String,
    /// Authentication domain
    pub auth_domain: String,
    /// Project identifier; also names the default database host
    pub project_id: String,
    /// Storage bucket
    pub storage_bucket: String,
    /// Messaging sender id
    pub messaging_sender_id: String,
    /// Application id
    pub app_id: String,
    /// Explicit database URL, for non-default regions or emulators
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_url: Option<String>,
}

impl RemoteConfig {
    /// Base URL of the realtime database
    pub fn database_url(&self) -> String {
        match &self.database_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://{}-default-rtdb.firebaseio.com", self.project_id),
        }
    }

    /// Assemble a remote configuration from possibly incomplete parts
    ///
    /// Returns `None` unless every required parameter is present. A missing
    /// project id is the normal way to run local-only and is only logged at
    /// debug level; any other gap is reported as a warning.
    pub fn from_parts(parts: RemoteConfigParts) -> Option<Self> {
        if parts.is_empty() {
            tracing::debug!("No remote store configured, running local-only");
            return None;
        }

        let missing = parts.missing_fields();
        if missing.contains(&"project_id") {
            tracing::debug!("Remote project id not set, running local-only");
            return None;
        }
        if !missing.is_empty() {
            tracing::warn!(
                "Incomplete remote store configuration (missing {}), running local-only",
                missing.join(", ")
            );
            return None;
        }

        Some(Self {
            api_key: parts.api_key?,
            auth_domain: parts.auth_domain?,
            project_id: parts.project_id?,
            storage_bucket: parts.storage_bucket?,
            messaging_sender_id: parts.messaging_sender_id?,
            app_id: parts.app_id?,
            database_url: parts.database_url,
        })
    }
}

/// Remote connection parameters as read from one configuration source
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RemoteConfigParts {
    /// Web API key
    pub api_key: Option<String>,
    /// Authentication domain
    pub auth_domain: Option<String>,
    /// Project identifier
    pub project_id: Option<String>,
    /// Storage bucket
    pub storage_bucket: Option<String>,
    /// Messaging sender id
    pub messaging_sender_id: Option<String>,
    /// Application id
    pub app_id: Option<String>,
    /// Explicit database URL
    pub database_url: Option<String>,
}

impl RemoteConfigParts {
    /// Read the `NOTEBOOK_FIREBASE_*` variables
    pub fn from_env(loader: &EnvLoader) -> Self {
        Self {
            api_key: loader.load_string("FIREBASE_API_KEY"),
            auth_domain: loader.load_string("FIREBASE_AUTH_DOMAIN"),
            project_id: loader.load_string("FIREBASE_PROJECT_ID"),
            storage_bucket: loader.load_string("FIREBASE_STORAGE_BUCKET"),
            messaging_sender_id: loader.load_string("FIREBASE_MESSAGING_SENDER_ID"),
            app_id: loader.load_string("FIREBASE_APP_ID"),
            database_url: loader.load_string("FIREBASE_DATABASE_URL"),
        }
    }

    /// Field-by-field merge; values present in `other` win
    pub fn merge(self, other: Self) -> Self {
        Self {
            api_key: other.api_key.or(self.api_key),
            auth_domain: other.auth_domain.or(self.auth_domain),
            project_id: other.project_id.or(self.project_id),
            storage_bucket: other.storage_bucket.or(self.storage_bucket),
            messaging_sender_id: other.messaging_sender_id.or(self.messaging_sender_id),
            app_id: other.app_id.or(self.app_id),
            database_url: other.database_url.or(self.database_url),
        }
    }

    /// Drop blank values so they count as missing
    fn normalized(self) -> Self {
        fn present(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        Self {
            api_key: present(self.api_key),
            auth_domain: present(self.auth_domain),
            project_id: present(self.project_id),
            storage_bucket: present(self.storage_bucket),
            messaging_sender_id: present(self.messaging_sender_id),
            app_id: present(self.app_id),
            database_url: present(self.database_url),
        }
    }

    /// True when no parameter at all is set
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Names of the required parameters that are absent
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("api_key", &self.api_key),
            ("auth_domain", &self.auth_domain),
            ("project_id", &self.project_id),
            ("storage_bucket", &self.storage_bucket),
            ("messaging_sender_id", &self.messaging_sender_id),
            ("app_id", &self.app_id),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_none())
        .map(|(name, _)| name)
        .collect()
    }
}

/// Contents of `config.yaml`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct YamlConfig {
    /// Remote connection parameters
    pub remote: Option<RemoteConfigParts>,
    /// Remote request timeout in seconds
    pub request_timeout_secs: Option<u64>,
}

impl YamlConfig {
    /// Load the file at `path`; a missing file yields the empty configuration
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No configuration file at {}", path.display());
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(NotebookError::Config(format!(
                    "Failed to read configuration file {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        tracing::debug!("Loading configuration from {}", path.display());
        serde_yaml::from_str(&content).map_err(|e| {
            NotebookError::Config(format!(
                "Invalid YAML in {}: {}\n\nHint: Check for proper indentation and key names",
                path.display(),
                e
            ))
        })
    }
}

/// Resolved application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotebookConfig {
    /// Directory holding `config.yaml`, the session and local notes
    pub data_dir: PathBuf,
    /// Remote store connection, when fully configured
    pub remote: Option<RemoteConfig>,
    /// Timeout applied to each remote request
    pub request_timeout: Duration,
}

impl NotebookConfig {
    /// Default data directory: `~/.notebook`, or `./.notebook` without a home
    pub fn default_data_dir() -> PathBuf {
        dirs::home_dir()
            .map(|home| home.join(DEFAULT_DATA_DIR_NAME))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR_NAME))
    }

    /// Local-only configuration rooted at `data_dir`
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            remote: None,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }

    /// Load configuration from the default sources
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration, optionally forcing the data directory
    pub fn load_from(data_dir: Option<PathBuf>) -> Result<Self> {
        let loader = EnvLoader::new(ENV_PREFIX);
        let data_dir = data_dir
            .or_else(|| loader.load_string("HOME").map(PathBuf::from))
            .unwrap_or_else(Self::default_data_dir);

        let mut config = Self::with_data_dir(data_dir);
        let yaml = YamlConfig::load_from_file(config.config_path())?;

        if let Some(secs) = yaml.request_timeout_secs {
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = loader.load_optional::<u64>("REQUEST_TIMEOUT_SECS") {
            config.request_timeout = Duration::from_secs(secs);
        }
        if config.request_timeout.is_zero() {
            return Err(NotebookError::Config(
                "request timeout must be at least one second".to_string(),
            ));
        }

        let parts = yaml
            .remote
            .unwrap_or_default()
            .merge(RemoteConfigParts::from_env(&loader))
            .normalized();
        config.remote = RemoteConfig::from_parts(parts);

        Ok(config)
    }

    /// Path of the YAML configuration file
    pub fn config_path(&self) -> PathBuf {
        self.data_dir.join(CONFIG_FILE_NAME)
    }
}
