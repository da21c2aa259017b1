/// Application configuration
///
/// Read from `<config_dir>/graph-gallery/config.toml`:
/// - Linux: ~/.config/graph-gallery/config.toml
/// - macOS: ~/Library/Application Support/graph-gallery/config.toml
/// - Windows: %APPDATA%\graph-gallery\config.toml
///
/// Every key is optional. `GRAPH_GALLERY_SERVER` overrides `server_url`.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::ConfigError;

/// Port the gallery service listens on out of the box
pub const DEFAULT_SERVER_URL: &str = "http://localhost:18001";

/// Environment variable overriding the configured server
pub const SERVER_ENV: &str = "GRAPH_GALLERY_SERVER";

const DEFAULT_THUMBNAIL_SIZE: u32 = 180;
const MIN_THUMBNAIL_SIZE: u32 = 64;
const MAX_THUMBNAIL_SIZE: u32 = 512;

/// On-disk representation, before validation
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    server_url: Option<String>,
    thumbnail_size: Option<u32>,
    lazy_thumbnails: Option<bool>,
}

/// Validated configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Base URL of the image listing service
    pub server_url: Url,
    /// Edge of a gallery cell in logical pixels
    pub thumbnail_size: u32,
    /// Defer thumbnail requests until they scroll into view
    pub lazy_thumbnails: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: Url::parse(DEFAULT_SERVER_URL).expect("default server URL is valid"),
            thumbnail_size: DEFAULT_THUMBNAIL_SIZE,
            lazy_thumbnails: true,
        }
    }
}

impl Config {
    /// Load the configuration from the user's config directory.
    ///
    /// Never fails: a broken file is reported and the defaults are used.
    pub fn load() -> Self {
        let mut config = match Self::config_path() {
            Some(path) => match Self::from_path(&path) {
                Ok(config) => config,
                Err(err) => {
                    tracing::warn!(error = %err, "using default configuration");
                    Config::default()
                }
            },
            None => Config::default(),
        };

        if let Ok(value) = std::env::var(SERVER_ENV) {
            match Url::parse(&value) {
                Ok(url) => config.server_url = url,
                Err(err) => tracing::warn!(value = %value, error = %err, "ignoring {}", SERVER_ENV),
            }
        }

        config
    }

    /// Get the path where the config file is expected
    pub fn config_path() -> Option<PathBuf> {
        let mut path = dirs::config_dir()?;
        path.push("graph-gallery");
        path.push("config.toml");
        Some(path)
    }

    /// Read a config file; a missing file yields the defaults
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file");
                return Ok(Config::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let file: ConfigFile = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let config = Self::from_file(file)?;
        tracing::info!(path = %path.display(), server = %config.server_url, "configuration loaded");
        Ok(config)
    }

    fn from_file(file: ConfigFile) -> Result<Self, ConfigError> {
        let defaults = Config::default();

        let server_url = match file.server_url {
            Some(value) => Url::parse(&value)
                .map_err(|source| ConfigError::InvalidServerUrl { value, source })?,
            None => defaults.server_url,
        };

        let thumbnail_size = file
            .thumbnail_size
            .unwrap_or(defaults.thumbnail_size)
            .clamp(MIN_THUMBNAIL_SIZE, MAX_THUMBNAIL_SIZE);

        Ok(Config {
            server_url,
            thumbnail_size,
            lazy_thumbnails: file.lazy_thumbnails.unwrap_or(defaults.lazy_thumbnails),
        })
    }
}
