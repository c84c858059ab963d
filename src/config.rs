use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::services::{API_KEY_ENTRY, CredentialStore};

const APP_DIR_NAME: &str = "jts";
const CONFIG_FILE_NAME: &str = "config.json";

pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";
pub const DEFAULT_MAX_PROMPT_CHARS: usize = 10_000;
pub const DEFAULT_TEMPERATURE: f32 = 0.3;
pub const DEFAULT_MAX_TOKENS: u32 = 800;

const ENV_API_KEY: &str = "JTS_GROQ_API_KEY";
const ENV_MODEL: &str = "JTS_GROQ_MODEL";
const ENV_BASE_URL: &str = "JTS_GROQ_BASE_URL";

pub fn config_directory() -> AppResult<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .ok_or_else(|| AppError::Configuration("no configuration directory available".to_string()))
}

pub fn config_file_path() -> AppResult<PathBuf> {
    Ok(config_directory()?.join(CONFIG_FILE_NAME))
}

/// Settings persisted in the local config file. Unset values fall back to defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groq_model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groq_base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_prompt_chars: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl StoredConfig {
    pub fn load() -> AppResult<Self> {
        Self::load_from(&config_file_path()?)
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        match fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents)
                .map_err(|err| AppError::Configuration(format!("invalid config file: {err}"))),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            Err(err) => Err(AppError::Io(err)),
        }
    }

    pub fn save(&self) -> AppResult<()> {
        self.save_to(&config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(self)
            .map_err(|err| AppError::Configuration(format!("failed to write config: {err}")))?;
        fs::write(path, data)?;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub groq_api_key: Option<String>,
    pub groq_model: String,
    pub groq_base_url: String,
    pub max_prompt_chars: usize,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl AppConfig {
    pub fn load(credentials: &dyn CredentialStore) -> AppResult<Self> {
        let stored = StoredConfig::load()?;
        Self::resolve(stored, credentials, |name| env::var(name).ok())
    }

    /// Layers environment overrides and the stored API key over file settings.
    pub fn resolve(
        stored: StoredConfig,
        credentials: &dyn CredentialStore,
        lookup_env: impl Fn(&str) -> Option<String>,
    ) -> AppResult<Self> {
        let non_empty = |name: &str| lookup_env(name).filter(|value| !value.trim().is_empty());

        let groq_api_key = match non_empty(ENV_API_KEY) {
            Some(key) => Some(key),
            None => credentials.get(API_KEY_ENTRY)?,
        };

        Ok(Self {
            groq_api_key,
            groq_model: non_empty(ENV_MODEL)
                .or(stored.groq_model)
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            groq_base_url: non_empty(ENV_BASE_URL)
                .or(stored.groq_base_url)
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            max_prompt_chars: stored.max_prompt_chars.unwrap_or(DEFAULT_MAX_PROMPT_CHARS),
            temperature: stored.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            max_tokens: stored.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct MemoryStore(Mutex<HashMap<String, String>>);

    impl CredentialStore for MemoryStore {
        fn get(&self, key: &str) -> AppResult<Option<String>> {
            Ok(self.0.lock().unwrap().get(key).cloned())
        }
        fn set(&self, key: &str, value: &str) -> AppResult<()> {
            self.0
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }
        fn remove(&self, key: &str) -> AppResult<()> {
            self.0.lock().unwrap().remove(key);
            Ok(())
        }
    }

    #[test]
    fn defaults_without_file_or_env() {
        let store = MemoryStore::default();
        let config = AppConfig::resolve(StoredConfig::default(), &store, |_| None).unwrap();

        assert_eq!(config.groq_api_key, None);
        assert_eq!(config.groq_model, DEFAULT_MODEL);
        assert_eq!(config.groq_base_url, DEFAULT_BASE_URL);
        assert_eq!(config.max_prompt_chars, 10_000);
        assert_eq!(config.max_tokens, 800);
    }

    #[test]
    fn env_key_wins_over_store() {
        let store = MemoryStore::default();
        store.set(API_KEY_ENTRY, "stored-key").unwrap();

        let from_store = AppConfig::resolve(StoredConfig::default(), &store, |_| None).unwrap();
        assert_eq!(from_store.groq_api_key.as_deref(), Some("stored-key"));

        let from_env = AppConfig::resolve(StoredConfig::default(), &store, |name| {
            (name == ENV_API_KEY).then(|| "env-key".to_string())
        })
        .unwrap();
        assert_eq!(from_env.groq_api_key.as_deref(), Some("env-key"));
    }

    #[test]
    fn stored_settings_apply() {
        let stored = StoredConfig {
            groq_model: Some("llama-3.1-8b-instant".to_string()),
            max_prompt_chars: Some(500),
            ..StoredConfig::default()
        };
        let config = AppConfig::resolve(stored, &MemoryStore::default(), |_| None).unwrap();
        assert_eq!(config.groq_model, "llama-3.1-8b-instant");
        assert_eq!(config.max_prompt_chars, 500);
    }

    #[test]
    fn round_trips_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);

        assert_eq!(StoredConfig::load_from(&path).unwrap(), StoredConfig::default());

        let stored = StoredConfig {
            groq_base_url: Some("http://localhost:8080".to_string()),
            ..StoredConfig::default()
        };
        stored.save_to(&path).unwrap();
        assert_eq!(StoredConfig::load_from(&path).unwrap(), stored);
    }

    #[test]
    fn rejects_malformed_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "{ not json").unwrap();

        let err = StoredConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));
    }
}
