use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable that overrides the configured API key.
pub const API_KEY_ENV: &str = "DRIVEFOLIO_API_KEY";

/// Environment variable that overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "DRIVEFOLIO_CONFIG";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub drive: DriveConfig,

    #[serde(default = "default_categories")]
    pub categories: Vec<CategoryConfig>,

    #[serde(default)]
    pub thumbnails: ThumbnailConfig,

    #[serde(default)]
    pub preview: PreviewConfig,

    /// Text shown by the Info entry
    #[serde(default = "default_info_text")]
    pub info_text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriveConfig {
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_root_folder_id")]
    pub root_folder_id: String,

    #[serde(default = "default_api_base")]
    pub api_base: String,

    #[serde(default = "default_thumbnail_base")]
    pub thumbnail_base: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_root_folder_id() -> String {
    "1ZDYPViPemR14Xgv8vQZHQSGmWjeqkr1Z".to_string()
}

fn default_api_base() -> String {
    "https://www.googleapis.com/drive/v3".to_string()
}

fn default_thumbnail_base() -> String {
    "https://drive.google.com/thumbnail".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            root_folder_id: default_root_folder_id(),
            api_base: default_api_base(),
            thumbnail_base: default_thumbnail_base(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl DriveConfig {
    /// The effective API key: environment first, then the config file.
    /// Blank values count as missing.
    pub fn resolved_api_key(&self) -> Option<String> {
        std::env::var(API_KEY_ENV)
            .ok()
            .or_else(|| self.api_key.clone())
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
    }
}

/// A top-level folder under the root that gets its own navigation entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryConfig {
    pub name: String,

    /// Load this category's folders as books (cover + pages)
    #[serde(default)]
    pub book: bool,
}

fn default_categories() -> Vec<CategoryConfig> {
    vec![
        CategoryConfig {
            name: "Projects".to_string(),
            book: false,
        },
        CategoryConfig {
            name: "Books".to_string(),
            book: true,
        },
    ]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThumbnailConfig {
    #[serde(default = "default_grid_width")]
    pub grid_width: u32,

    #[serde(default = "default_book_width")]
    pub book_width: u32,

    #[serde(default = "default_cover_width")]
    pub cover_width: u32,

    #[serde(default = "default_lightbox_width")]
    pub lightbox_width: u32,

    #[serde(default = "default_cache_enabled")]
    pub cache_enabled: bool,

    #[serde(default = "default_thumb_cache_path")]
    pub path: PathBuf,
}

fn default_grid_width() -> u32 {
    400
}

fn default_book_width() -> u32 {
    800
}

fn default_cover_width() -> u32 {
    600
}

fn default_lightbox_width() -> u32 {
    1200
}

fn default_cache_enabled() -> bool {
    true
}

fn default_thumb_cache_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from(".cache"))
        .join("drivefolio/thumbnails")
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            grid_width: default_grid_width(),
            book_width: default_book_width(),
            cover_width: default_cover_width(),
            lightbox_width: default_lightbox_width(),
            cache_enabled: default_cache_enabled(),
            path: default_thumb_cache_path(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ImageProtocol {
    #[default]
    Auto,
    Sixel,
    Kitty,
    ITerm2,
    Halfblocks,
    None,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PreviewConfig {
    #[serde(default)]
    pub protocol: ImageProtocol,
}

fn default_info_text() -> String {
    "Contact info and other details here.".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            drive: DriveConfig::default(),
            categories: default_categories(),
            thumbnails: ThumbnailConfig::default(),
            preview: PreviewConfig::default(),
            info_text: default_info_text(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load from an explicit path, writing defaults there if it doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            let config: Config = toml::from_str(&content)
                .with_context(|| format!("Invalid config {}", path.display()))?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("drivefolio")
    }

    /// Default config location, honouring `DRIVEFOLIO_CONFIG`.
    pub fn config_path() -> PathBuf {
        match std::env::var_os(CONFIG_PATH_ENV) {
            Some(path) => PathBuf::from(path),
            None => Self::config_dir().join("config.toml"),
        }
    }

    pub fn category(&self, name: &str) -> Option<&CategoryConfig> {
        self.categories.iter().find(|c| c.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_config_is_created_with_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/config.toml");

        let config = Config::load_from(&path).unwrap();

        assert!(path.exists());
        assert_eq!(config.thumbnails.grid_width, 400);
        assert_eq!(config.thumbnails.book_width, 800);
        assert_eq!(config.categories.len(), 2);
        assert!(config.category("Books").unwrap().book);
        assert!(!config.category("Projects").unwrap().book);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
info_text = "hello"

[drive]
api_key = "abc"
root_folder_id = "root"

[[categories]]
name = "Zines"
book = true
"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.drive.api_key.as_deref(), Some("abc"));
        assert_eq!(config.drive.root_folder_id, "root");
        assert_eq!(config.drive.timeout_secs, 30);
        assert_eq!(config.info_text, "hello");
        assert_eq!(config.categories.len(), 1);
        assert!(config.category("Zines").unwrap().book);
        assert!(config.category("Books").is_none());
    }

    #[test]
    fn test_save_round_trips_key() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.drive.api_key = Some("secret".to_string());
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.drive.api_key.as_deref(), Some("secret"));
    }
}
