//! Configuration loading and parsing for jsscope
//!
//! Provides functionality to load and parse `jsscope.toml` configuration files.

use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::semantic::{BuildOptions, Environment};

pub const CONFIG_FILENAME: &str = "jsscope.toml";

const KNOWN_TOP_LEVEL_KEYS: &[&str] = &["include", "exclude", "globals"];
const KNOWN_GLOBALS_KEYS: &[&str] = &["environments", "names"];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid TOML in '{path}': {message}")]
    ParseError { path: PathBuf, message: String },
}

#[derive(Debug, Clone, Default)]
pub struct ConfigResult {
    pub config: Config,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub globals: GlobalsConfig,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct GlobalsConfig {
    pub environments: Vec<Environment>,
    pub names: Vec<String>,
}

impl From<&GlobalsConfig> for BuildOptions {
    fn from(globals: &GlobalsConfig) -> Self {
        Self {
            environments: globals.environments.clone(),
            globals: globals.names.clone(),
        }
    }
}

impl Config {
    pub fn build_options(&self) -> BuildOptions {
        BuildOptions::from(&self.globals)
    }
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();
    loop {
        let config_path = current.join(CONFIG_FILENAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if !current.pop() {
            return None;
        }
    }
}

fn read_config(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })
}

fn parse_config(path: &Path, content: &str) -> Result<Config, ConfigError> {
    toml::from_str(content).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        message: e.message().to_string(),
    })
}

pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = read_config(path)?;
    parse_config(path, &content)
}

pub fn load_config_with_warnings(path: &Path) -> Result<ConfigResult, ConfigError> {
    let content = read_config(path)?;
    let config = parse_config(path, &content)?;
    let warnings = detect_unknown_keys(&content);

    Ok(ConfigResult { config, warnings })
}

fn detect_unknown_keys(content: &str) -> Vec<String> {
    let mut warnings = Vec::new();

    let table: toml::Table = match content.parse() {
        Ok(t) => t,
        Err(_) => return warnings,
    };

    let known_top: HashSet<&str> = KNOWN_TOP_LEVEL_KEYS.iter().copied().collect();
    for key in table.keys() {
        if !known_top.contains(key.as_str()) {
            warnings.push(format!("Unknown config option: '{}'", key));
        }
    }

    if let Some(toml::Value::Table(globals)) = table.get("globals") {
        let known_globals: HashSet<&str> = KNOWN_GLOBALS_KEYS.iter().copied().collect();
        for key in globals.keys() {
            if !known_globals.contains(key.as_str()) {
                warnings.push(format!("Unknown config option in [globals]: '{}'", key));
            }
        }
    }

    warnings
}

pub fn load_config_or_default(start_dir: &Path) -> Config {
    find_config_file(start_dir)
        .and_then(|path| load_config(&path).ok())
        .unwrap_or_default()
}

pub fn load_config_or_default_with_warnings(start_dir: &Path) -> ConfigResult {
    match find_config_file(start_dir) {
        Some(path) => load_config_with_warnings(&path).unwrap_or_default(),
        None => ConfigResult::default(),
    }
}
