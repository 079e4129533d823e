//! # DSRCallback Configuration Module
//!
//! This module provides configuration management for the DSR callback receiver:
//! - Loading configuration from an optional YAML file
//! - Merging with the embedded default configuration
//! - Environment variable overrides (`DSRCALLBACK_CONFIG__SECTION__KEY` and `PORT`)
//! - Type-safe getters with defaults
//! - Thread-safe singleton access pattern
//!
//! ## Usage
//!
//! ```no_run
//! use dsrconfig::get_config;
//!
//! let config = get_config();
//! let port = config.get_http_port();
//! let level = config.get_log_min_level();
//! ```

use anyhow::{anyhow, Result};
use dirs::home_dir;
use lazy_static::lazy_static;
use serde_yaml::{Mapping, Value};
use std::{
    env, fs,
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing::{info, warn};

// Configuration par défaut intégrée
const DEFAULT_CONFIG: &str = include_str!("dsrcallback.yaml");

lazy_static! {
    static ref CONFIG: Arc<Config> = Arc::new(Config::load_config("").unwrap_or_else(|err| {
        let mut config = Config::embedded();
        config
            .warnings
            .push(format!("Failed to load configuration ({err}), using embedded defaults"));
        config
    }));
}

const ENV_CONFIG_DIR: &str = "DSRCALLBACK_CONFIG";
const ENV_PREFIX: &str = "DSRCALLBACK_CONFIG__";
const ENV_PORT: &str = "PORT";
const CONFIG_DIR_NAME: &str = ".dsrcallback";
const CONFIG_FILE_NAME: &str = "config.yaml";

// Default values for configuration
const DEFAULT_HTTP_PORT: u16 = 3000;
const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";
const DEFAULT_SERVER_NAME: &str = "DSR-Callback-Receiver";
const DEFAULT_LOG_MIN_LEVEL: &str = "INFO";
const DEFAULT_LOG_ENABLE_CONSOLE: bool = true;
const DEFAULT_LOG_ANSI: bool = true;

/// Macro to generate getters for bool values with default
macro_rules! impl_bool_config {
    ($getter:ident, $path:expr, $default:expr) => {
        pub fn $getter(&self) -> bool {
            match self.get_value($path) {
                Ok(Value::Bool(b)) => b,
                _ => $default,
            }
        }
    };
}

/// Macro to generate getters for non-empty string values with default
macro_rules! impl_string_config {
    ($getter:ident, $path:expr, $default:expr) => {
        pub fn $getter(&self) -> String {
            match self.get_value($path) {
                Ok(Value::String(s)) if !s.trim().is_empty() => s,
                Ok(_) | Err(_) => $default.to_string(),
            }
        }
    };
}

/// Configuration manager for the callback receiver
///
/// The configuration is resolved once, at startup, from a prioritized list of sources
/// (lowest to highest priority):
///
/// 1. the embedded `dsrcallback.yaml`
/// 2. `config.yaml` in the configuration directory, if present
/// 3. `DSRCALLBACK_CONFIG__SECTION__KEY=value` environment variables
/// 4. the `PORT` environment variable, for the listening port only
///
/// Nothing is ever written back to disk.
///
/// Loading usually happens before logging is initialised, so problems met while
/// loading are kept in the configuration and emitted later by
/// [`log_load_report`](Config::log_load_report).
#[derive(Debug)]
pub struct Config {
    config_dir: PathBuf,
    loaded_file: Option<PathBuf>,
    data: Value,
    warnings: Vec<String>,
}

impl Config {
    /// Finds a config directory by trying different locations in order
    fn find_config_dir(directory: &str) -> PathBuf {
        // 1. Try provided directory
        if !directory.is_empty() {
            return PathBuf::from(directory);
        }

        // 2. Try environment variable
        if let Ok(env_path) = env::var(ENV_CONFIG_DIR) {
            return PathBuf::from(env_path);
        }

        // 3. Try current directory
        if Path::new(CONFIG_DIR_NAME).exists() {
            return PathBuf::from(CONFIG_DIR_NAME);
        }

        // 4. Try home directory
        if let Some(home) = home_dir() {
            let home_config = home.join(CONFIG_DIR_NAME);
            if home_config.exists() {
                return home_config;
            }
        }

        PathBuf::from(CONFIG_DIR_NAME)
    }

    /// Loads the configuration, reading overrides from the process environment
    ///
    /// The directory is searched in the following order:
    /// 1. The provided `directory` parameter if not empty
    /// 2. The `DSRCALLBACK_CONFIG` environment variable
    /// 3. `.dsrcallback` in the current directory
    /// 4. `.dsrcallback` in the user's home directory
    ///
    /// A missing directory or `config.yaml` is not an error.
    pub fn load_config(directory: &str) -> Result<Self> {
        Self::load_with_env(directory, env::vars())
    }

    /// Loads the configuration with an explicit set of environment variables
    pub fn load_with_env<I>(directory: &str, vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config_dir = Self::find_config_dir(directory);

        let mut config_value: Value = serde_yaml::from_str(DEFAULT_CONFIG)?;

        let config_file = config_dir.join(CONFIG_FILE_NAME);
        let loaded_file = if config_file.is_file() {
            let yaml_data = fs::read(&config_file)?;
            let external_value: Value = serde_yaml::from_slice(&yaml_data)
                .map_err(|e| anyhow!("Invalid YAML in {}: {}", config_file.display(), e))?;
            merge_yaml(&mut config_value, &Self::lower_keys_value(external_value));
            Some(config_file)
        } else {
            None
        };

        let mut config_value = Self::lower_keys_value(config_value);
        let mut warnings = Vec::new();
        Self::apply_env_overrides(&mut config_value, vars, &mut warnings);

        Ok(Config {
            config_dir,
            loaded_file,
            data: config_value,
            warnings,
        })
    }

    /// Configuration built from the embedded defaults only
    pub fn embedded() -> Self {
        let data = serde_yaml::from_str(DEFAULT_CONFIG).unwrap_or(Value::Mapping(Mapping::new()));
        Config {
            config_dir: PathBuf::from(CONFIG_DIR_NAME),
            loaded_file: None,
            data: Self::lower_keys_value(data),
            warnings: Vec::new(),
        }
    }

    /// Directory the configuration was looked up in
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Problems met while loading (ignored overrides, invalid `PORT`...)
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Logs where the configuration came from and every loading warning
    ///
    /// Call it once the tracing subscriber is installed.
    pub fn log_load_report(&self) {
        info!(config_dir = %self.config_dir.display(), "Using config directory");
        match &self.loaded_file {
            Some(file) => info!(config_file = %file.display(), "Loaded config file"),
            None => info!("Config file not found, using default embedded config"),
        }
        for warning in &self.warnings {
            warn!("⚠️ {}", warning);
        }
    }

    /// Gets a configuration value at the specified path
    ///
    /// # Arguments
    ///
    /// * `path` - Array of keys representing the path (e.g., `&["host", "http_port"]`)
    ///
    /// # Returns
    ///
    /// Returns a `Result` containing the YAML value or an error if the path doesn't exist
    pub fn get_value(&self, path: &[&str]) -> Result<Value> {
        Self::get_value_internal(&self.data, path)
    }

    fn get_value_internal(data: &Value, path: &[&str]) -> Result<Value> {
        let mut current = data;
        for (i, key) in path.iter().enumerate() {
            if let Value::Mapping(map) = current {
                let key = key.to_lowercase();

                if let Some(next) = map.get(&Value::String(key)) {
                    current = next;
                } else {
                    return Err(anyhow!("Path {} does not exist", path[..=i].join(".")));
                }
            } else {
                return Err(anyhow!("Path {} is not a Config", path[..i].join(".")));
            }
        }
        Ok(current.clone())
    }

    fn set_value_internal(data: &mut Value, path: &[&str], value: Value) -> Result<()> {
        if path.is_empty() {
            *data = value;
            return Ok(());
        }
        if let Value::Mapping(map) = data {
            let key_value = Value::String(path[0].to_lowercase());
            if path.len() == 1 {
                map.insert(key_value, value);
            } else {
                let entry = map
                    .entry(key_value)
                    .or_insert(Value::Mapping(Mapping::new()));
                Self::set_value_internal(entry, &path[1..], value)?;
            }
            Ok(())
        } else {
            Err(anyhow!("Current node is not a map"))
        }
    }

    fn apply_env_overrides<I>(config: &mut Value, vars: I, warnings: &mut Vec<String>)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut port_override = None;

        for (key, value) in vars {
            if let Some(stripped) = key.strip_prefix(ENV_PREFIX) {
                let key_path = stripped.split("__").collect::<Vec<_>>();
                let yaml_value = Self::convert_env_value(&value);
                if let Err(err) = Self::set_value_internal(config, &key_path, yaml_value) {
                    warnings.push(format!("Ignoring environment override {key}: {err}"));
                }
            } else if key == ENV_PORT {
                port_override = Some(value);
            }
        }

        // PORT a la priorité la plus haute
        if let Some(port) = port_override {
            match port.trim().parse::<u16>() {
                Ok(port) => {
                    let path = ["host", "http_port"];
                    if let Err(err) =
                        Self::set_value_internal(config, &path, Value::Number(port.into()))
                    {
                        warnings.push(format!("Ignoring {ENV_PORT}={port}: {err}"));
                    }
                }
                Err(_) => warnings.push(format!("Invalid {ENV_PORT} '{port}', ignored")),
            }
        }
    }

    fn convert_env_value(value: &str) -> Value {
        if let Ok(parsed) = serde_yaml::from_str::<Value>(value) {
            return parsed;
        }
        Value::String(value.to_string())
    }

    fn lower_keys_value(value: Value) -> Value {
        match value {
            Value::Mapping(map) => {
                let mut new_map = Mapping::new();
                for (k, v) in map {
                    if let Value::String(s) = k {
                        new_map.insert(Value::String(s.to_lowercase()), Self::lower_keys_value(v));
                    } else {
                        new_map.insert(k, Self::lower_keys_value(v));
                    }
                }
                Value::Mapping(new_map)
            }
            Value::Sequence(seq) => {
                Value::Sequence(seq.into_iter().map(Self::lower_keys_value).collect())
            }
            _ => value,
        }
    }

    /// Gets the HTTP port from configuration
    ///
    /// Returns the configured HTTP port, or the default port (3000) if not configured or invalid.
    pub fn get_http_port(&self) -> u16 {
        match self.get_value(&["host", "http_port"]) {
            Ok(Value::Number(n)) => match n.as_u64().and_then(|p| u16::try_from(p).ok()) {
                Some(port) => port,
                None => {
                    warn!("Invalid HTTP port '{}', using default {}", n, DEFAULT_HTTP_PORT);
                    DEFAULT_HTTP_PORT
                }
            },
            Ok(Value::String(s)) => match s.trim().parse::<u16>() {
                Ok(port) => port,
                Err(_) => {
                    warn!("Invalid HTTP port '{}', using default {}", s, DEFAULT_HTTP_PORT);
                    DEFAULT_HTTP_PORT
                }
            },
            Ok(_) => {
                warn!(
                    "HTTP port not a number or string, using default {}",
                    DEFAULT_HTTP_PORT
                );
                DEFAULT_HTTP_PORT
            }
            Err(err) => {
                warn!(
                    "Failed to get HTTP port: {}, using default {}",
                    err, DEFAULT_HTTP_PORT
                );
                DEFAULT_HTTP_PORT
            }
        }
    }

    impl_string_config!(
        get_bind_address,
        &["host", "bind_address"],
        DEFAULT_BIND_ADDRESS
    );

    impl_string_config!(
        get_server_name,
        &["host", "server_name"],
        DEFAULT_SERVER_NAME
    );

    impl_string_config!(
        get_log_min_level,
        &["host", "logger", "min_level"],
        DEFAULT_LOG_MIN_LEVEL
    );

    impl_bool_config!(
        get_log_enable_console,
        &["host", "logger", "enable_console"],
        DEFAULT_LOG_ENABLE_CONSOLE
    );

    impl_bool_config!(get_log_ansi, &["host", "logger", "ansi"], DEFAULT_LOG_ANSI);
}

/// Returns the global configuration instance
///
/// The configuration is lazily loaded on first access.
pub fn get_config() -> Arc<Config> {
    CONFIG.clone()
}

/// Merges external YAML configuration into default configuration
///
/// - For mappings, keys from `external` are merged into `default` recursively
/// - For scalars and sequences, external values replace default values
fn merge_yaml(default: &mut Value, external: &Value) {
    match (default, external) {
        (Value::Mapping(dmap), Value::Mapping(emap)) => {
            for (k, v) in emap {
                match dmap.get_mut(k) {
                    Some(dv) => merge_yaml(dv, v),
                    None => {
                        dmap.insert(k.clone(), v.clone());
                    }
                }
            }
        }
        (d, e) => *d = e.clone(),
    }
}
