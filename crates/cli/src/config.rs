//! Configuration management for Mission CLI
//!
//! Handles loading and saving configuration from ~/.mission/config.toml

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Configuration for Mission CLI
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_url")]
    pub url: String,
}

fn default_server_url() -> String {
    "http://localhost:8000".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: default_server_url(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AuthConfig {
    /// Shared access code expected at startup. Empty disables the gate.
    #[serde(default)]
    pub access_code: Option<String>,

    /// Set after a successful unlock so later sessions skip the prompt.
    #[serde(default)]
    pub authenticated: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_mode")]
    pub default_mode: String,

    #[serde(default = "default_true")]
    pub auto_connect_events: bool,
}

fn default_mode() -> String {
    "storytelling".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_mode: default_mode(),
            auto_connect_events: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_theme")]
    pub theme: String,

    #[serde(default = "default_true")]
    pub show_status_bar: bool,
}

fn default_theme() -> String {
    "dark".to_string()
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            show_status_bar: true,
        }
    }
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".mission")
            .join("config.toml")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &PathBuf) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get a configuration value by key path (e.g., "server.url")
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["server", "url"] => Some(self.server.url.clone()),
            ["auth", "access_code"] => self.auth.access_code.clone(),
            ["auth", "authenticated"] => Some(self.auth.authenticated.to_string()),
            ["session", "default_mode"] => Some(self.session.default_mode.clone()),
            ["session", "auto_connect_events"] => {
                Some(self.session.auto_connect_events.to_string())
            }
            ["display", "theme"] => Some(self.display.theme.clone()),
            ["display", "show_status_bar"] => Some(self.display.show_status_bar.to_string()),
            _ => None,
        }
    }

    /// Set a configuration value by key path
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["server", "url"] => self.server.url = value.to_string(),
            ["auth", "access_code"] => self.auth.access_code = Some(value.to_string()),
            ["auth", "authenticated"] => {
                self.auth.authenticated = value.parse().unwrap_or(false)
            }
            ["session", "default_mode"] => self.session.default_mode = value.to_string(),
            ["session", "auto_connect_events"] => {
                self.session.auto_connect_events = value.parse().unwrap_or(true)
            }
            ["display", "theme"] => self.display.theme = value.to_string(),
            ["display", "show_status_bar"] => {
                self.display.show_status_bar = value.parse().unwrap_or(true)
            }
            _ => anyhow::bail!("Unknown configuration key: {}", key),
        }

        self.save()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = Config::default();
        assert_eq!(config.server.url, "http://localhost:8000");
        assert_eq!(config.session.default_mode, "storytelling");
        assert!(!config.auth.authenticated);
        assert!(config.auth.access_code.is_none());
    }

    #[test]
    fn roundtrip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.server.url = "http://studio:9000".to_string();
        config.auth.access_code = Some("letmein".to_string());
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.server.url, "http://studio:9000");
        assert_eq!(loaded.auth.access_code.as_deref(), Some("letmein"));
    }

    #[test]
    fn get_and_set_dotted_keys() {
        let config = Config::default();
        assert_eq!(config.get("server.url").as_deref(), Some("http://localhost:8000"));
        assert_eq!(config.get("display.theme").as_deref(), Some("dark"));
        assert!(config.get("nope.nothing").is_none());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.server.url, "http://localhost:8000");
    }
}
