//! Configuration loader
//!
//! Loads application configuration from files and environment variables.
//!
//! ## Loading Strategy
//! 1. Start from a config file if one is found, otherwise from defaults
//! 2. Apply environment variable overrides
//! 3. Validate the result
//!
//! ## Environment Variables
//! - `EMPLOYEE_CONSOLE_CONFIG`: Explicit config file path
//! - `CONSOLE_API_URL`: Backend base URL
//! - `CONSOLE_API_TIMEOUT_SECS`: Per-request timeout in seconds
//! - `CONSOLE_POLL_INTERVAL_MS`: Needs-action, approvals and dashboard poll interval
//! - `CONSOLE_VAULT_POLL_INTERVAL_MS`: Vault status poll interval
//! - `CONSOLE_HEALTH_POLL_INTERVAL_MS`: Health poll interval
//! - `CONSOLE_LOG_LEVEL`: Default log filter
//! - `CONSOLE_LOG_JSON`: Emit JSON logs (true/false)
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./employee-console.toml` or `./employee-console.json`
//! 2. `./config.toml` or `./config.json`
//! 3. The same names in the parent and grandparent directories
//! 4. The same names next to the executable

use std::path::{Path, PathBuf};

use console_domain::{Config, ConsoleError, ConsoleResult};
use url::Url;

use crate::errors::InfraError;

pub const CONFIG_PATH_VAR: &str = "EMPLOYEE_CONSOLE_CONFIG";

const CONFIG_FILE_NAMES: [&str; 4] =
    ["employee-console.toml", "employee-console.json", "config.toml", "config.json"];

/// Load configuration with automatic fallback strategy
///
/// Reads the file named by `EMPLOYEE_CONSOLE_CONFIG` or the first probed
/// config file, falling back to defaults when none exists, then applies
/// environment overrides and validates.
///
/// # Errors
/// Returns `ConsoleError::Config` if:
/// - An explicitly named file is missing or unreadable
/// - File format is invalid
/// - An override or the final configuration is invalid
pub fn load() -> ConsoleResult<Config> {
    let explicit = std::env::var(CONFIG_PATH_VAR).ok().filter(|p| !p.trim().is_empty());

    let base = match explicit {
        Some(path) => read_file(&PathBuf::from(path))?,
        None => match probe_config_paths() {
            Some(path) => read_file(&path)?,
            None => {
                tracing::debug!("No config file found, using defaults");
                Config::default()
            }
        },
    };

    let config = apply_env_overrides(base)?;
    validate(&config)?;
    tracing::info!(base_url = %config.api.base_url, "Configuration loaded");
    Ok(config)
}

/// Load configuration from defaults and environment variables only
///
/// # Errors
/// Returns `ConsoleError::Config` if a variable has an invalid value.
pub fn load_from_env() -> ConsoleResult<Config> {
    let config = apply_env_overrides(Config::default())?;
    validate(&config)?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
/// Missing sections and fields take their defaults.
///
/// # Errors
/// Returns `ConsoleError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - The configuration fails validation
pub fn load_from_file(path: Option<PathBuf>) -> ConsoleResult<Config> {
    let config_path = match path {
        Some(p) => p,
        None => probe_config_paths().ok_or_else(|| {
            ConsoleError::config("No config file found in any of the standard locations")
        })?,
    };

    let config = read_file(&config_path)?;
    validate(&config)?;
    Ok(config)
}

fn read_file(path: &Path) -> ConsoleResult<Config> {
    if !path.exists() {
        return Err(ConsoleError::config(format!("Config file not found: {}", path.display())));
    }

    tracing::info!(path = %path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(path)
        .map_err(|e| ConsoleError::config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> ConsoleResult<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match extension {
        "toml" => toml::from_str(contents).map_err(|e| InfraError::from(e).into()),
        "json" => serde_json::from_str(contents)
            .map_err(|e| ConsoleError::config(format!("Invalid JSON format: {e}"))),
        _ => Err(ConsoleError::config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        dirs.extend(cwd.ancestors().take(3).map(Path::to_path_buf));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            dirs.push(exe_dir.to_path_buf());
        }
    }

    dirs.iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.is_file())
}

/// Apply `CONSOLE_*` environment overrides on top of `config`.
fn apply_env_overrides(mut config: Config) -> ConsoleResult<Config> {
    if let Some(url) = env_string("CONSOLE_API_URL") {
        config.api.base_url = url;
    }
    if let Some(secs) = env_u64("CONSOLE_API_TIMEOUT_SECS")? {
        config.api.timeout_secs = secs;
    }
    if let Some(ms) = env_u64("CONSOLE_POLL_INTERVAL_MS")? {
        config.polling.interval_ms = ms;
    }
    if let Some(ms) = env_u64("CONSOLE_VAULT_POLL_INTERVAL_MS")? {
        config.polling.vault_interval_ms = ms;
    }
    if let Some(ms) = env_u64("CONSOLE_HEALTH_POLL_INTERVAL_MS")? {
        config.polling.health_interval_ms = ms;
    }
    if let Some(level) = env_string("CONSOLE_LOG_LEVEL") {
        config.logging.level = level;
    }
    config.logging.json = env_bool("CONSOLE_LOG_JSON", config.logging.json);

    Ok(config)
}

/// Check that the configuration can drive a console session.
///
/// # Errors
/// Returns `ConsoleError::Config` naming the first invalid field.
pub fn validate(config: &Config) -> ConsoleResult<()> {
    let url = Url::parse(&config.api.base_url).map_err(|e| {
        ConsoleError::config(format!("Invalid api.base_url '{}': {e}", config.api.base_url))
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConsoleError::config(format!(
            "api.base_url must use http or https, got '{}'",
            url.scheme()
        )));
    }

    let durations = [
        ("api.timeout_secs", config.api.timeout_secs),
        ("polling.interval_ms", config.polling.interval_ms),
        ("polling.vault_interval_ms", config.polling.vault_interval_ms),
        ("polling.health_interval_ms", config.polling.health_interval_ms),
    ];
    if let Some((name, _)) = durations.iter().find(|(_, value)| *value == 0) {
        return Err(ConsoleError::config(format!("{name} must be greater than zero")));
    }

    Ok(())
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn env_u64(key: &str) -> ConsoleResult<Option<u64>> {
    env_string(key)
        .map(|s| {
            s.parse::<u64>().map_err(|e| ConsoleError::config(format!("Invalid {key}: {e}")))
        })
        .transpose()
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
