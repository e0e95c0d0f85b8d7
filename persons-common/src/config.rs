//! Configuration loading and resolution
//!
//! Every setting is resolved in priority order:
//! 1. Command-line flag (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! A missing config file is not an error. Environment values that fail to
//! parse are ignored with a warning so the next tier applies.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn, Level};

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_LOG_LEVEL: Level = Level::INFO;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 3;
pub const DEFAULT_DATABASE_URL: &str = "sqlite://persons.db?mode=rwc";
pub const DEFAULT_AGE_URL: &str = "https://api.agify.io/";
pub const DEFAULT_GENDER_URL: &str = "https://api.genderize.io/";
pub const DEFAULT_NATIONALITY_URL: &str = "https://api.nationalize.io/";
pub const DEFAULT_ENRICHMENT_TIMEOUT_SECS: u64 = 2;

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "PERSONS_CONFIG";

/// On-disk TOML configuration; every key is optional
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub port: Option<u16>,
    pub log_level: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub database_url: Option<String>,
    #[serde(default)]
    pub enrichment: EnrichmentToml,
}

/// `[enrichment]` table of the TOML config
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnrichmentToml {
    pub age_url: Option<String>,
    pub gender_url: Option<String>,
    pub nationality_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Values supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub port: Option<u16>,
    pub log_level: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub database_url: Option<String>,
}

/// Endpoints and time bound for the name-inference lookups
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichmentConfig {
    pub age_url: String,
    pub gender_url: String,
    pub nationality_url: String,
    pub timeout: Duration,
}

/// Fully resolved service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub port: u16,
    pub log_level: Level,
    pub request_timeout: Duration,
    pub database_url: String,
    pub enrichment: EnrichmentConfig,
}

impl ServiceConfig {
    /// Resolve every setting from flags, environment, TOML and defaults
    pub fn resolve(cli: &ConfigOverrides, toml: &TomlConfig) -> Self {
        let port = cli
            .port
            .or_else(|| env_parsed::<u16>("PORT"))
            .or(toml.port)
            .unwrap_or(DEFAULT_PORT);

        let log_level = cli
            .log_level
            .clone()
            .or_else(|| env_value("LOG_LEVEL"))
            .or_else(|| toml.log_level.clone())
            .map(|raw| parse_log_level(&raw))
            .unwrap_or(DEFAULT_LOG_LEVEL);

        let request_timeout_secs = cli
            .request_timeout_secs
            .or_else(|| env_parsed::<u64>("TIMEOUT_TIME"))
            .or(toml.request_timeout_secs)
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

        let database_url = cli
            .database_url
            .clone()
            .or_else(|| env_value("DATABASE_URL"))
            .or_else(|| toml.database_url.clone())
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let enrichment_timeout_secs = env_parsed::<u64>("ENRICHMENT_TIMEOUT")
            .or(toml.enrichment.timeout_secs)
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_ENRICHMENT_TIMEOUT_SECS);

        let enrichment = EnrichmentConfig {
            age_url: env_value("AGIFY_URL")
                .or_else(|| toml.enrichment.age_url.clone())
                .unwrap_or_else(|| DEFAULT_AGE_URL.to_string()),
            gender_url: env_value("GENDERIZE_URL")
                .or_else(|| toml.enrichment.gender_url.clone())
                .unwrap_or_else(|| DEFAULT_GENDER_URL.to_string()),
            nationality_url: env_value("NATIONALIZE_URL")
                .or_else(|| toml.enrichment.nationality_url.clone())
                .unwrap_or_else(|| DEFAULT_NATIONALITY_URL.to_string()),
            timeout: Duration::from_secs(enrichment_timeout_secs),
        };

        Self {
            port,
            log_level,
            request_timeout: Duration::from_secs(request_timeout_secs),
            database_url,
            enrichment,
        }
    }

    /// Resolve the config file location, read it if present, and merge
    pub fn load(cli: &ConfigOverrides, config_path: Option<&Path>) -> Result<Self> {
        let toml = match resolve_config_path(config_path) {
            Some(path) => load_toml_config(&path)?.unwrap_or_default(),
            None => TomlConfig::default(),
        };
        Ok(Self::resolve(cli, &toml))
    }
}

/// Map a textual level to a tracing level; unknown values resolve to INFO
pub fn parse_log_level(raw: &str) -> Level {
    match raw.trim().to_ascii_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        other => {
            warn!("Unknown log level '{}', using info", other);
            DEFAULT_LOG_LEVEL
        }
    }
}

/// Config file location: explicit path, then `PERSONS_CONFIG`, then the
/// per-user config directory
pub fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if let Some(path) = env_value(CONFIG_PATH_ENV) {
        return Some(PathBuf::from(path));
    }
    default_config_path()
}

/// `<config dir>/persons/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("persons").join("config.toml"))
}

/// Read a TOML config file
///
/// Returns `Ok(None)` when the file does not exist. A file that exists but
/// cannot be read or parsed is a configuration error.
pub fn load_toml_config(path: &Path) -> Result<Option<TomlConfig>> {
    if !path.exists() {
        info!("No config file at {}, using defaults", path.display());
        return Ok(None);
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    let config = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))?;

    info!("Loaded config file {}", path.display());
    Ok(Some(config))
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_parsed<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = env_value(name)?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring unparseable {}={}", name, raw);
            None
        }
    }
}
