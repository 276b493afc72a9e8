use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf, time::Duration};

pub const ENV_API_BASE_URL: &str = "DATASPACE_API_BASE_URL";
pub const ENV_DATA_DEFINITION_VIEWER_URL: &str = "DATA_DEFINITION_VIEWER_URL";
pub const ENV_SANDBOX_DATASPACE_URL: &str = "IOXIO_SANDBOX_DATASPACE_URL";
pub const ENV_HTTP_SIG_SOURCE: &str = "HTTP_SIG_SOURCE";
pub const ENV_SESSION_COOKIE: &str = "DATASPACE_SESSION_COOKIE";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "DATASPACE_REQUEST_TIMEOUT_SECS";

/// Runtime configuration, stored on disk as TOML.
///
/// Example TOML:
/// ```toml
/// api_base_url = "http://127.0.0.1:8080"
/// http_sig_source = "ioxio"
/// session_cookie = "id_token=..."
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Origin of the backend that proxies `/api/*` to the product gateway.
    pub api_base_url: String,

    /// Base URL of the data definition viewer used in attribution links.
    pub data_definition_viewer_url: String,

    pub sandbox_dataspace_url: String,

    /// Source used for signature-protected data product requests.
    pub http_sig_source: String,

    /// Raw `Cookie` header value carrying the login session, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_cookie: Option<String>,

    /// No timeout unless set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8080".to_string(),
            data_definition_viewer_url: "https://definitions.sandbox.ioxio-dataspace.com"
                .to_string(),
            sandbox_dataspace_url: "https://sandbox.ioxio-dataspace.com".to_string(),
            http_sig_source: "ioxio".to_string(),
            session_cookie: None,
            request_timeout_secs: None,
        }
    }
}

impl Settings {
    /// Load settings from the default config file, then apply environment
    /// overrides.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        let mut settings = Self::load_from(&path)?;
        settings.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(settings)
    }

    /// Load settings from `path`, or return defaults if it doesn't exist yet.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, use defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(settings)
    }

    /// Save settings to the default config file.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;
        self.save_to(&path)
    }

    /// Save settings to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("com", "ioxio", "dataspace-demo")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Override fields from variables returned by `lookup`. Empty values are
    /// treated as unset.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get(ENV_API_BASE_URL) {
            self.api_base_url = v;
        }
        if let Some(v) = get(ENV_DATA_DEFINITION_VIEWER_URL) {
            self.data_definition_viewer_url = v;
        }
        if let Some(v) = get(ENV_SANDBOX_DATASPACE_URL) {
            self.sandbox_dataspace_url = v;
        }
        if let Some(v) = get(ENV_HTTP_SIG_SOURCE) {
            self.http_sig_source = v;
        }
        if let Some(v) = get(ENV_SESSION_COOKIE) {
            self.session_cookie = Some(v);
        }
        if let Some(v) = get(ENV_REQUEST_TIMEOUT_SECS) {
            let secs = v.trim().parse::<u64>().with_context(|| {
                format!("{ENV_REQUEST_TIMEOUT_SECS} must be a whole number of seconds, got '{v}'")
            })?;
            self.request_timeout_secs = Some(secs);
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// `api_base_url` without a trailing slash.
    pub fn api_origin(&self) -> &str {
        self.api_base_url.trim_end_matches('/')
    }
}
