//! Configuration management
//!
//! Layered the usual way: defaults, then an optional `config.toml` in the
//! platform config directory, then `STUMP_`-prefixed environment variables
//! (`STUMP_SERVER__URL`, `STUMP_READER__TRACK_ELAPSED_TIME`, ...). Two flat
//! legacy variables are honored for convenience: `STUMP_SERVER_URL` and
//! `STUMP_API_TOKEN`.

use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub reader: ReaderPreferences,
}

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    pub url: String,
    #[serde(default)]
    pub api_token: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: default_server_url(),
            api_token: None,
        }
    }
}

fn default_server_url() -> String {
    // Stump's default port
    "http://localhost:10801".to_string()
}

/// Per-reader preferences consumed by the session engine
#[derive(Debug, Clone, Deserialize)]
pub struct ReaderPreferences {
    /// Gates the session timer; a disabled timer never accumulates
    #[serde(default = "default_true")]
    pub track_elapsed_time: bool,

    /// Seed the image reader with server-side thumbnails (height=600)
    #[serde(default)]
    pub prefer_small_images: bool,
}

impl Default for ReaderPreferences {
    fn default() -> Self {
        Self {
            track_elapsed_time: true,
            prefer_small_images: false,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Get config directory (XDG_CONFIG_HOME or platform default)
pub fn get_config_dir() -> std::path::PathBuf {
    if let Ok(dir) = std::env::var("STUMP_CONFIG_DIR") {
        return std::path::PathBuf::from(dir);
    }

    #[cfg(target_os = "macos")]
    {
        if let Ok(home) = std::env::var("HOME") {
            return std::path::PathBuf::from(home).join("Library/Application Support/stump-reader");
        }
    }

    #[cfg(target_os = "linux")]
    {
        if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
            return std::path::PathBuf::from(xdg).join("stump-reader");
        }
        if let Ok(home) = std::env::var("HOME") {
            return std::path::PathBuf::from(home).join(".config/stump-reader");
        }
    }

    #[cfg(target_os = "windows")]
    {
        if let Ok(appdata) = std::env::var("APPDATA") {
            return std::path::PathBuf::from(appdata).join("stump-reader");
        }
    }

    // Fallback to current directory
    std::path::PathBuf::from(".")
}

pub fn load_config() -> Result<Config> {
    let config_dir = get_config_dir();

    let mut builder = ::config::Config::builder()
        // Start with defaults
        .set_default("server.url", default_server_url())?
        .set_default("reader.track_elapsed_time", true)?
        .set_default("reader.prefer_small_images", false)?
        // Load from config file if it exists
        .add_source(
            ::config::File::with_name(&config_dir.join("config").to_string_lossy()).required(false),
        )
        // Override with environment variables (STUMP_SERVER__URL, etc.)
        .add_source(
            ::config::Environment::with_prefix("STUMP")
                .separator("__")
                .try_parsing(true),
        );

    // Flat legacy variables take precedence over the nested forms
    if let Ok(url) = std::env::var("STUMP_SERVER_URL") {
        builder = builder.set_override("server.url", url)?;
    }
    if let Ok(token) = std::env::var("STUMP_API_TOKEN") {
        builder = builder.set_override("server.api_token", token)?;
    }

    let config = builder.build()?;

    Ok(config.try_deserialize()?)
}
