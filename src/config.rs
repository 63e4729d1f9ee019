use crate::storage::{JsonStorage, LoadPolicy, StorageError};
use crate::store::TodoStore;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable that overrides the configuration file location.
pub const CONFIG_ENV_VAR: &str = "TODO_LISTS_CONFIG";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Invalid key: {0}")]
    InvalidKey(String),
}

impl From<StorageError> for ConfigError {
    fn from(error: StorageError) -> Self {
        ConfigError::Storage(error.to_string())
    }
}

const KEYS: &[&str] = &["storage.path", "storage.on-corrupt", "log-level"];
const VALID_CORRUPT_POLICIES: &[&str] = &["empty", "error"];
const VALID_LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

fn validate_storage_path(path: &str) -> Result<PathBuf, ConfigError> {
    // Check for null bytes and other invalid characters
    if path.contains('\0') {
        return Err(ConfigError::InvalidConfig(
            "Path contains invalid characters".to_string(),
        ));
    }

    if path.trim().is_empty() {
        return Err(ConfigError::InvalidConfig(
            "Path cannot be empty".to_string(),
        ));
    }

    let path = shellexpand::tilde(path);
    let path = PathBuf::from(path.as_ref());

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.exists() {
            return Err(ConfigError::InvalidConfig(format!(
                "Parent directory does not exist: {}",
                parent.display()
            )));
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::MetadataExt;
            if let Ok(metadata) = parent.metadata() {
                if metadata.mode() & 0o200 == 0 {
                    return Err(ConfigError::InvalidConfig(format!(
                        "Directory is not writable: {}",
                        parent.display()
                    )));
                }
            }
        }
    }

    Ok(path)
}

fn validate_corrupt_policy(value: &str) -> Result<(), ConfigError> {
    if !VALID_CORRUPT_POLICIES.contains(&value) {
        return Err(ConfigError::InvalidConfig(format!(
            "storage.on-corrupt must be one of: {}",
            VALID_CORRUPT_POLICIES.join(", ")
        )));
    }
    Ok(())
}

fn validate_log_level(value: &str) -> Result<(), ConfigError> {
    if !VALID_LOG_LEVELS.contains(&value) {
        return Err(ConfigError::InvalidConfig(format!(
            "log-level must be one of: {}",
            VALID_LOG_LEVELS.join(", ")
        )));
    }
    Ok(())
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    #[serde(default)]
    pub storage_path: Option<String>,
    #[serde(default)]
    pub on_corrupt: Option<String>,
    #[serde(default)]
    pub log_level: Option<String>,
}

impl Config {
    pub fn with_defaults() -> Self {
        Self {
            storage_path: default_storage_path(),
            on_corrupt: default_on_corrupt(),
            log_level: default_log_level(),
        }
    }

    /// Fills every unset field from `with_defaults`.
    pub fn resolved(&self) -> Self {
        let defaults = Self::with_defaults();
        Self {
            storage_path: self.storage_path.clone().or(defaults.storage_path),
            on_corrupt: self.on_corrupt.clone().or(defaults.on_corrupt),
            log_level: self.log_level.clone().or(defaults.log_level),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(ref path) = self.storage_path {
            validate_storage_path(path)?;
        }
        if let Some(ref policy) = self.on_corrupt {
            validate_corrupt_policy(policy)?;
        }
        if let Some(ref level) = self.log_level {
            validate_log_level(level)?;
        }
        Ok(())
    }

    pub fn load_policy(&self) -> LoadPolicy {
        self.on_corrupt
            .as_deref()
            .and_then(LoadPolicy::from_str)
            .unwrap_or_default()
    }
}

fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config").join("todo-lists"))
}

fn default_storage_path() -> Option<String> {
    config_dir().map(|dir| dir.join("data.json").to_string_lossy().to_string())
}

fn default_on_corrupt() -> Option<String> {
    Some(LoadPolicy::default().to_str().to_string())
}

fn default_log_level() -> Option<String> {
    Some("warn".to_string())
}

/// Reads and writes the configuration file. Values that were never set fall
/// back to `Config::with_defaults`.
pub struct ConfigManager {
    path: PathBuf,
    config: Config,
}

impl ConfigManager {
    pub fn new(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match config_path {
            Some(p) => p.to_path_buf(),
            None => config_dir()
                .map(|dir| dir.join("config.json"))
                .ok_or_else(|| {
                    ConfigError::InvalidConfig("Could not determine home directory".to_string())
                })?,
        };

        let config = Self::read(&path)?;
        Ok(Self { path, config })
    }

    /// Uses `$TODO_LISTS_CONFIG` when set, the default location otherwise.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::new(Some(Path::new(&path))),
            None => Self::new(None),
        }
    }

    fn read(path: &Path) -> Result<Config, ConfigError> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let contents = std::fs::read_to_string(path)?;
        // If the file is empty, return default config
        if contents.trim().is_empty() {
            return Ok(Config::default());
        }

        Ok(serde_json::from_str(&contents)?)
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        // Create parent directories if they don't exist
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(&self.config)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> Config {
        self.config.resolved()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        let config = self.config();
        match key {
            "storage.path" => config.storage_path,
            "storage.on-corrupt" => config.on_corrupt,
            "log-level" => config.log_level,
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut config = self.config.clone();

        match key {
            "storage.path" => {
                let path = validate_storage_path(value)?;
                config.storage_path = Some(path.to_string_lossy().to_string());
            }
            "storage.on-corrupt" => {
                validate_corrupt_policy(value)?;
                config.on_corrupt = Some(value.to_string());
            }
            "log-level" => {
                validate_log_level(value)?;
                config.log_level = Some(value.to_string());
            }
            _ => {
                return Err(ConfigError::InvalidKey(key.to_string()));
            }
        }
        config.validate()?;
        self.config = config;
        self.save()
    }

    pub fn unset(&mut self, key: &str) -> Result<(), ConfigError> {
        match key {
            "storage.path" => self.config.storage_path = None,
            "storage.on-corrupt" => self.config.on_corrupt = None,
            "log-level" => self.config.log_level = None,
            _ => return Err(ConfigError::InvalidKey(key.to_string())),
        }
        self.save()
    }

    /// Every known key with its effective value and whether that value is the default.
    pub fn list(&self) -> Vec<(String, String, bool)> {
        let explicit = [
            self.config.storage_path.is_some(),
            self.config.on_corrupt.is_some(),
            self.config.log_level.is_some(),
        ];

        KEYS.iter()
            .zip(explicit)
            .map(|(key, is_set)| {
                let value = self.get(key).unwrap_or_else(|| "null".to_string());
                (key.to_string(), value, !is_set)
            })
            .collect()
    }

    /// Opens the store at the configured document location.
    pub fn create_store(&self) -> Result<TodoStore, ConfigError> {
        self.create_store_at(None)
    }

    /// Like `create_store`, with `path` taking precedence over `storage.path`.
    pub fn create_store_at(&self, path: Option<&Path>) -> Result<TodoStore, ConfigError> {
        let mut config = self.config();
        if let Some(path) = path {
            config.storage_path = Some(path.to_string_lossy().to_string());
        }
        if config.storage_path.is_none() {
            return Err(ConfigError::Storage(
                "Storage path not configured".to_string(),
            ));
        }

        let storage = JsonStorage::new(&config)?;
        Ok(TodoStore::new(Box::new(storage)))
    }
}
