use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Page sizes offered by the list view
pub const PAGE_SIZE_OPTIONS: [u32; 3] = [5, 10, 20];

/// Main configuration structure
///
/// Loaded from a TOML file under the user config dir; anything missing
/// falls back to defaults so a partial file is fine.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

impl Config {
    /// Load config from the default location, or defaults if there is none
    pub fn load() -> crate::Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&contents)
                .map_err(|e| crate::Error::ConfigError(format!("Failed to parse config: {}", e)))?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to disk
    pub fn save(&self) -> crate::Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| crate::Error::ConfigError(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(&config_path, contents)?;
        Ok(())
    }

    fn config_path() -> crate::Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| crate::Error::ConfigError("Could not find config directory".into()))?
            .join("pokescout");

        Ok(config_dir.join("config.toml"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Catalog API base URL (a mirror can be pointed at here)
    #[serde(default = "default_api_base")]
    pub base_url: String,

    /// Base URL the sprite images are served from
    #[serde(default = "default_sprite_base")]
    pub sprite_base_url: String,
}

fn default_api_base() -> String {
    "https://pokeapi.co/api/v2".to_string()
}

fn default_sprite_base() -> String {
    "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_base(),
            sprite_base_url: default_sprite_base(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Rows per catalog page
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// How long the search box waits after the last keystroke
    #[serde(default = "default_debounce_ms")]
    pub search_debounce_ms: u64,

    /// Enable mouse support in the TUI
    #[serde(default = "default_mouse")]
    pub mouse_enabled: bool,
}

fn default_page_size() -> u32 {
    10
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_mouse() -> bool {
    true
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            search_debounce_ms: default_debounce_ms(),
            mouse_enabled: default_mouse(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.ui.page_size, 10);
        assert_eq!(config.ui.search_debounce_ms, 300);
        assert!(config.api.base_url.starts_with("https://pokeapi.co"));
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml = toml::to_string(&config).unwrap();
        assert!(toml.contains("page_size"));
        assert!(toml.contains("base_url"));
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let config: Config = toml::from_str(
            r#"
            [ui]
            page_size = 20
            "#,
        )
        .unwrap();

        assert_eq!(config.ui.page_size, 20);
        assert_eq!(config.ui.search_debounce_ms, 300);
        assert_eq!(config.api.base_url, default_api_base());
    }
}
