use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Supabase project URL, e.g. `https://proj.supabase.co`. Empty means
    /// no backend is configured and the app runs offline.
    #[serde(default = "default_backend_url")]
    pub backend_url: String,
    #[serde(default = "default_backend_anon_key")]
    pub backend_anon_key: String,
    #[serde(default = "default_theme")]
    pub theme: String,
}

fn default_backend_url() -> String {
    String::new()
}
fn default_backend_anon_key() -> String {
    String::new()
}
fn default_theme() -> String {
    "indigo".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            backend_anon_key: default_backend_anon_key(),
            theme: default_theme(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    #[allow(dead_code)]
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("flashbear")
            .join("config.toml")
    }

    pub fn has_backend(&self) -> bool {
        !self.backend_url.trim().is_empty() && !self.backend_anon_key.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serde_defaults_from_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.backend_url, "");
        assert_eq!(config.backend_anon_key, "");
        assert_eq!(config.theme, "indigo");
    }

    #[test]
    fn test_config_serde_partial_file() {
        let toml_str = r#"
backend_url = "https://proj.supabase.co"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.backend_url, "https://proj.supabase.co");
        // Missing fields fall back to defaults
        assert_eq!(config.backend_anon_key, "");
        assert_eq!(config.theme, "indigo");
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let mut config = Config::default();
        config.backend_url = "https://proj.supabase.co".to_string();
        config.backend_anon_key = "anon".to_string();
        config.theme = "catppuccin-mocha".to_string();

        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(config.backend_url, deserialized.backend_url);
        assert_eq!(config.backend_anon_key, deserialized.backend_anon_key);
        assert_eq!(config.theme, deserialized.theme);
    }

    #[test]
    fn test_has_backend_requires_both_fields() {
        let mut config = Config::default();
        assert!(!config.has_backend());
        config.backend_url = "https://proj.supabase.co".to_string();
        assert!(!config.has_backend());
        config.backend_anon_key = "anon".to_string();
        assert!(config.has_backend());
        config.backend_url = "   ".to_string();
        assert!(!config.has_backend());
    }
}
