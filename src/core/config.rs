//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.elizabeth/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ElizabethConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Opening bot message. An empty string disables it.
    pub greeting: Option<String>,
    pub max_query_chars: Option<usize>,
    pub max_response_bytes: Option<usize>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ServiceConfig {
    pub base_url: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct CatalogConfig {
    pub base_url: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_SERVICE_BASE_URL: &str = "http://127.0.0.1:8080";
pub const DEFAULT_CATALOG_BASE_URL: &str = "https://anilist.co/anime";
pub const DEFAULT_MAX_QUERY_CHARS: usize = 2000;
pub const DEFAULT_MAX_RESPONSE_BYTES: usize = 1024 * 1024;
pub const DEFAULT_GREETING: &str =
    "Hi, I'm Elizabeth! Tell me a show you liked and I'll find you something to watch next.";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub service_base_url: String,
    pub catalog_base_url: String,
    pub greeting: Option<String>,
    pub max_query_chars: usize,
    pub max_response_bytes: usize,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            service_base_url: DEFAULT_SERVICE_BASE_URL.to_string(),
            catalog_base_url: DEFAULT_CATALOG_BASE_URL.to_string(),
            greeting: Some(DEFAULT_GREETING.to_string()),
            max_query_chars: DEFAULT_MAX_QUERY_CHARS,
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.elizabeth/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".elizabeth").join("config.toml"))
}

/// Load config from `~/.elizabeth/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `ElizabethConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<ElizabethConfig, ConfigError> {
    let Some(path) = config_path() else {
        warn!("Could not determine home directory, using default config");
        return Ok(ElizabethConfig::default());
    };
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<ElizabethConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(ElizabethConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: ElizabethConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

const DEFAULT_CONFIG_FILE: &str = r#"# Elizabeth Configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# greeting = "Hi, I'm Elizabeth!"    # "" disables the opening message
# max_query_chars = 2000             # longer queries are cut before sending
# max_response_bytes = 1048576       # larger replies are treated as errors

# [service]
# base_url = "http://127.0.0.1:8080" # Or set ELIZABETH_SERVICE_URL

# [catalog]
# base_url = "https://anilist.co/anime" # Or set ELIZABETH_CATALOG_URL
"#;

fn generate_default_config(path: &Path) {
    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, DEFAULT_CONFIG_FILE) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Flags from the command line. `None` means "not given".
#[derive(Debug, Default)]
pub struct CliOverrides<'a> {
    pub service_url: Option<&'a str>,
    pub catalog_url: Option<&'a str>,
}

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &ElizabethConfig, cli: &CliOverrides<'_>) -> ResolvedConfig {
    resolve_with_env(config, cli, |key| std::env::var(key).ok())
}

fn resolve_with_env(
    config: &ElizabethConfig,
    cli: &CliOverrides<'_>,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    let service_base_url = cli
        .service_url
        .map(str::to_string)
        .or_else(|| env("ELIZABETH_SERVICE_URL"))
        .or_else(|| config.service.base_url.clone())
        .unwrap_or_else(|| DEFAULT_SERVICE_BASE_URL.to_string());

    let catalog_base_url = cli
        .catalog_url
        .map(str::to_string)
        .or_else(|| env("ELIZABETH_CATALOG_URL"))
        .or_else(|| config.catalog.base_url.clone())
        .unwrap_or_else(|| DEFAULT_CATALOG_BASE_URL.to_string());

    let greeting = match config.general.greeting.as_deref() {
        Some(text) if text.trim().is_empty() => None,
        Some(text) => Some(text.to_string()),
        None => Some(DEFAULT_GREETING.to_string()),
    };

    let max_query_chars = config
        .general
        .max_query_chars
        .filter(|n| *n > 0)
        .unwrap_or(DEFAULT_MAX_QUERY_CHARS);
    let max_response_bytes = config
        .general
        .max_response_bytes
        .filter(|n| *n > 0)
        .unwrap_or(DEFAULT_MAX_RESPONSE_BYTES);

    info!(
        "Resolved config: service={}, catalog={}",
        service_base_url, catalog_base_url
    );

    ResolvedConfig {
        service_base_url,
        catalog_base_url,
        greeting,
        max_query_chars,
        max_response_bytes,
    }
}
