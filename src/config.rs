use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_service_url")]
    pub service_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub ignored_words: Option<PathBuf>,

    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,

    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    #[serde(default = "default_require_arabic")]
    pub require_arabic: bool,
}

fn default_service_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_suggestions() -> usize {
    5
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_poll_interval_ms() -> u64 {
    500
}

fn default_require_arabic() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_url: default_service_url(),
            timeout_secs: default_timeout_secs(),
            ignored_words: None,
            max_suggestions: default_max_suggestions(),
            debounce_ms: default_debounce_ms(),
            poll_interval_ms: default_poll_interval_ms(),
            require_arabic: default_require_arabic(),
        }
    }
}

impl Config {
    /// Load configuration with priority: CLI args > local config > global config > defaults
    pub fn load(service_url: Option<String>, ignored_words: Option<PathBuf>) -> Result<Self> {
        let mut config = Self::default();

        // Load global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                let global_config = Self::from_file(&global_path)?;
                config = config.merge(global_config);
            }
        }

        // Load local config (overrides global)
        let local_path = PathBuf::from(".imlaa.toml");
        if local_path.exists() {
            let local_config = Self::from_file(&local_path)?;
            config = config.merge(local_config);
        }

        // Apply CLI overrides
        if let Some(url) = service_url {
            config.service_url = url;
        }
        if let Some(path) = ignored_words {
            config.ignored_words = Some(path);
        }

        if config.ignored_words.is_none() {
            config.ignored_words = Self::default_ignored_words_path();
        }

        // Ensure the ignored words file exists
        if let Some(path) = &config.ignored_words {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).context("Failed to create ignored words directory")?;
            }
            if !path.exists() {
                fs::write(path, "").context("Failed to create ignored words file")?;
            }
        }

        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    fn merge(mut self, other: Self) -> Self {
        // Merge logic: other's values override self's if they differ from defaults
        if other.service_url != default_service_url() {
            self.service_url = other.service_url;
        }
        if other.timeout_secs != default_timeout_secs() {
            self.timeout_secs = other.timeout_secs;
        }
        if other.ignored_words.is_some() {
            self.ignored_words = other.ignored_words;
        }
        if other.max_suggestions != default_max_suggestions() {
            self.max_suggestions = other.max_suggestions;
        }
        if other.debounce_ms != default_debounce_ms() {
            self.debounce_ms = other.debounce_ms;
        }
        if other.poll_interval_ms != default_poll_interval_ms() {
            self.poll_interval_ms = other.poll_interval_ms;
        }
        if other.require_arabic != default_require_arabic() {
            self.require_arabic = other.require_arabic;
        }
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn global_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "imlaa").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    pub fn default_ignored_words_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "imlaa").map(|dirs| dirs.config_dir().join("ignored.txt"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.service_url, "http://127.0.0.1:5000");
        assert_eq!(config.max_suggestions, 5);
        assert_eq!(config.debounce(), Duration::from_millis(300));
        assert!(config.require_arabic);
    }

    #[test]
    fn test_merge_configs() {
        let base = Config::default();
        let override_config = Config {
            service_url: "https://imlaa.example".to_string(),
            require_arabic: false,
            ..Default::default()
        };

        let merged = base.merge(override_config);
        assert_eq!(merged.service_url, "https://imlaa.example");
        assert_eq!(merged.timeout_secs, 30);
        assert!(!merged.require_arabic);
    }

    #[test]
    fn test_local_config_without_key_keeps_global_require_arabic() {
        let global: Config = toml::from_str("require_arabic = false\n").unwrap();
        let local: Config = toml::from_str("service_url = \"https://imlaa.example\"\n").unwrap();

        let merged = Config::default().merge(global).merge(local);
        assert!(!merged.require_arabic);
        assert_eq!(merged.service_url, "https://imlaa.example");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: Config = toml::from_str("debounce_ms = 150\n").unwrap();
        assert_eq!(config.debounce_ms, 150);
        assert_eq!(config.poll_interval_ms, 500);
        assert_eq!(config.service_url, default_service_url());
    }
}
