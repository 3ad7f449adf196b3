use crate::config::{
    DEFAULT_API_BASE_URL, DEFAULT_STORAGE_DIR, DEFAULT_STORAGE_KEY, DEFAULT_TIMEOUT_SECONDS,
};
use crate::core::{ConfigProvider, NoticeMessages};
use crate::utils::error::{CartError, Result};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

/// File configuration. Every section and key is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub api: Option<ApiConfig>,
    pub storage: Option<StorageConfig>,
    pub messages: Option<NoticeMessages>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    pub dir: Option<String>,
    pub key: Option<String>,
}

static DEFAULT_MESSAGES: OnceLock<NoticeMessages> = OnceLock::new();

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CartError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Parses TOML after replacing `${VAR}` with the environment value.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| CartError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    // Unset variables are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| CartError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        use crate::utils::validation::*;

        validate_url("api.base_url", self.api_base_url())?;
        validate_range("api.timeout_seconds", self.timeout_seconds(), 1, 300)?;
        validate_path("storage.dir", self.storage_dir())?;
        validate_non_empty_string("storage.key", self.storage_key())?;

        if let Some(messages) = &self.messages {
            validate_non_empty_string("messages.add_failed", &messages.add_failed)?;
            validate_non_empty_string("messages.remove_failed", &messages.remove_failed)?;
            validate_non_empty_string("messages.out_of_stock", &messages.out_of_stock)?;
            validate_non_empty_string("messages.update_failed", &messages.update_failed)?;
        }

        Ok(())
    }

    pub fn timeout_seconds(&self) -> u64 {
        self.api
            .as_ref()
            .and_then(|api| api.timeout_seconds)
            .unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    }
}

impl ConfigProvider for TomlConfig {
    fn api_base_url(&self) -> &str {
        self.api
            .as_ref()
            .and_then(|api| api.base_url.as_deref())
            .unwrap_or(DEFAULT_API_BASE_URL)
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds())
    }

    fn storage_dir(&self) -> &str {
        self.storage
            .as_ref()
            .and_then(|storage| storage.dir.as_deref())
            .unwrap_or(DEFAULT_STORAGE_DIR)
    }

    fn storage_key(&self) -> &str {
        self.storage
            .as_ref()
            .and_then(|storage| storage.key.as_deref())
            .unwrap_or(DEFAULT_STORAGE_KEY)
    }

    fn messages(&self) -> &NoticeMessages {
        match &self.messages {
            Some(messages) => messages,
            None => DEFAULT_MESSAGES.get_or_init(NoticeMessages::default),
        }
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
