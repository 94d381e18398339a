//! Configuration loading and settings resolution.
//!
//! Settings come from three layers, highest priority first:
//! 1. Command-line flags ([`SettingsOverrides`])
//! 2. The TOML config file ([`FileConfig`])
//! 3. Built-in defaults

use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::document::LocalizerOptions;
use crate::download::ClientOptions;
use crate::rewrite::FailurePolicy;

const APP_DIR: &str = "imagelocalizer";
const CONFIG_FILE: &str = "config.toml";

/// Accepted range for timeout values, in seconds.
const TIMEOUT_RANGE: std::ops::RangeInclusive<u64> = 1..=3600;

/// Upper bound for `max_redirects`.
const MAX_REDIRECTS_LIMIT: usize = 20;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file exists but could not be read.
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML or has unknown keys.
    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A value is outside its accepted range.
    #[error("invalid config value for `{field}`: {value}. Expected range: {expected}")]
    OutOfRange {
        field: &'static str,
        value: u64,
        expected: &'static str,
    },
}

/// Supported config verbosity labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerbositySetting {
    #[default]
    Default,
    Verbose,
    Quiet,
    Debug,
}

impl VerbositySetting {
    /// Log filter directive for this verbosity.
    #[must_use]
    pub fn filter_directive(self) -> &'static str {
        match self {
            Self::Default => "info",
            Self::Verbose => "debug",
            Self::Quiet => "error",
            Self::Debug => "trace",
        }
    }
}

/// TOML-backed file configuration. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// What replaces references whose download failed.
    pub on_failure: Option<FailurePolicy>,
    /// HTTP connect timeout in seconds.
    pub connect_timeout_secs: Option<u64>,
    /// Whole-request timeout in seconds.
    pub read_timeout_secs: Option<u64>,
    /// Redirect hops followed per request (0 disables following).
    pub max_redirects: Option<usize>,
    /// Default verbosity when no CLI flag is given.
    pub verbosity: Option<VerbositySetting>,
}

impl FileConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML or unknown keys, and
    /// [`ConfigError::OutOfRange`] for invalid values.
    pub fn from_toml(raw: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Validates config values against runtime constraints.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::OutOfRange`] for the first invalid value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_timeout_secs("connect_timeout_secs", self.connect_timeout_secs)?;
        validate_timeout_secs("read_timeout_secs", self.read_timeout_secs)?;
        if let Some(max_redirects) = self.max_redirects
            && max_redirects > MAX_REDIRECTS_LIMIT
        {
            return Err(ConfigError::OutOfRange {
                field: "max_redirects",
                value: max_redirects as u64,
                expected: "0..=20",
            });
        }
        Ok(())
    }
}

fn validate_timeout_secs(field: &'static str, value: Option<u64>) -> Result<(), ConfigError> {
    let Some(value) = value else {
        return Ok(());
    };
    if !TIMEOUT_RANGE.contains(&value) {
        return Err(ConfigError::OutOfRange {
            field,
            value,
            expected: "1..=3600",
        });
    }
    Ok(())
}

/// Loaded config metadata.
#[derive(Debug, Clone, Default)]
pub struct LoadedConfig {
    /// Config path that was consulted, if any could be determined.
    pub path: Option<PathBuf>,
    /// Parsed file config when a config file exists.
    pub config: Option<FileConfig>,
}

/// Resolves the default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/imagelocalizer/config.toml`
/// 2. `$HOME/.config/imagelocalizer/config.toml`
#[must_use]
pub fn resolve_default_config_path() -> Option<PathBuf> {
    config_path_from(env_var_non_empty_os("XDG_CONFIG_HOME"), env_var_non_empty_os("HOME"))
}

fn config_path_from(xdg_config_home: Option<OsString>, home: Option<OsString>) -> Option<PathBuf> {
    if let Some(xdg_config_home) = xdg_config_home {
        return Some(PathBuf::from(xdg_config_home).join(APP_DIR).join(CONFIG_FILE));
    }
    let home = home?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join(APP_DIR)
            .join(CONFIG_FILE),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

/// Loads configuration.
///
/// With `explicit` set, that file must exist. Otherwise the default path is
/// consulted and a missing file simply yields no config.
///
/// # Errors
///
/// Returns [`ConfigError`] if a config file cannot be read, parsed, or validated.
pub fn load_config(explicit: Option<&Path>) -> Result<LoadedConfig, ConfigError> {
    if let Some(path) = explicit {
        let config = load_file_config(path)?;
        return Ok(LoadedConfig {
            path: Some(path.to_path_buf()),
            config: Some(config),
        });
    }

    let path = resolve_default_config_path();
    let config = match path.as_deref() {
        Some(path) if path.exists() => Some(load_file_config(path)?),
        _ => None,
    };
    Ok(LoadedConfig { path, config })
}

fn load_file_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    FileConfig::from_toml(&raw, path)
}

/// Values given on the command line; `None` means "not specified".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettingsOverrides {
    /// `--on-failure`.
    pub on_failure: Option<FailurePolicy>,
    /// `--connect-timeout`, in seconds.
    pub connect_timeout_secs: Option<u64>,
    /// `--timeout`, in seconds.
    pub read_timeout_secs: Option<u64>,
    /// `--max-redirects`.
    pub max_redirects: Option<usize>,
}

/// Fully resolved settings handed to the library.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Settings {
    /// Pipeline behavior.
    pub localizer: LocalizerOptions,
    /// Network settings.
    pub client: ClientOptions,
}

impl Settings {
    /// Merges CLI overrides over file config over defaults.
    #[must_use]
    pub fn resolve(file: Option<&FileConfig>, overrides: &SettingsOverrides) -> Self {
        let file = file.cloned().unwrap_or_default();
        let defaults = ClientOptions::default();
        Self {
            localizer: LocalizerOptions {
                failure_policy: overrides
                    .on_failure
                    .or(file.on_failure)
                    .unwrap_or_default(),
            },
            client: ClientOptions {
                connect_timeout_secs: overrides
                    .connect_timeout_secs
                    .or(file.connect_timeout_secs)
                    .unwrap_or(defaults.connect_timeout_secs),
                read_timeout_secs: overrides
                    .read_timeout_secs
                    .or(file.read_timeout_secs)
                    .unwrap_or(defaults.read_timeout_secs),
                max_redirects: overrides
                    .max_redirects
                    .or(file.max_redirects)
                    .unwrap_or(defaults.max_redirects),
            },
        }
    }
}
