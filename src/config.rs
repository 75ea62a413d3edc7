use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::quiz::timer::DEFAULT_DURATION_SECS;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_timer_seconds")]
    pub timer_seconds: u32,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default)]
    pub question_file: Option<String>,
    #[serde(default)]
    pub shuffle_options: bool,
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
    #[serde(default = "default_toast_duration_ms")]
    pub toast_duration_ms: u64,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_timer_seconds() -> u32 {
    DEFAULT_DURATION_SECS
}
fn default_theme() -> String {
    "catppuccin-mocha".to_string()
}
fn default_tick_rate_ms() -> u64 {
    100
}
fn default_toast_duration_ms() -> u64 {
    3000
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timer_seconds: default_timer_seconds(),
            theme: default_theme(),
            question_file: None,
            shuffle_options: false,
            tick_rate_ms: default_tick_rate_ms(),
            toast_duration_ms: default_toast_duration_ms(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.validate();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("clozer")
            .join("config.toml")
    }

    /// Clamp numeric fields into usable ranges.
    pub fn validate(&mut self) {
        self.timer_seconds = self.timer_seconds.clamp(5, 600);
        self.tick_rate_ms = self.tick_rate_ms.clamp(16, 1000);
        self.toast_duration_ms = self.toast_duration_ms.clamp(500, 30_000);
        if self.theme.trim().is_empty() {
            self.theme = default_theme();
        }
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms)
    }

    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_duration_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serde_defaults_from_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.timer_seconds, 30);
        assert_eq!(config.theme, "catppuccin-mocha");
        assert!(config.question_file.is_none());
        assert!(!config.shuffle_options);
        assert_eq!(config.tick_rate_ms, 100);
    }

    #[test]
    fn test_config_partial_file_keeps_other_defaults() {
        let toml_str = r#"
timer_seconds = 45
question_file = "/tmp/questions.json"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.timer_seconds, 45);
        assert_eq!(config.question_file.as_deref(), Some("/tmp/questions.json"));
        assert_eq!(config.toast_duration_ms, 3000);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = Config::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(config.timer_seconds, deserialized.timer_seconds);
        assert_eq!(config.theme, deserialized.theme);
        assert_eq!(config.shuffle_options, deserialized.shuffle_options);
    }

    #[test]
    fn test_validate_clamps_values() {
        let mut config = Config::default();
        config.timer_seconds = 0;
        config.tick_rate_ms = 5000;
        config.toast_duration_ms = 1;
        config.theme = "  ".to_string();
        config.validate();
        assert_eq!(config.timer_seconds, 5);
        assert_eq!(config.tick_rate_ms, 1000);
        assert_eq!(config.toast_duration_ms, 500);
        assert_eq!(config.theme, "catppuccin-mocha");
    }
}
