// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Configuration module

use crate::credentials::Mode;
use crate::http::HttpConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const LOCAL_CONFIG: &str = ".reporter/config.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub http: HttpConfig,

    #[serde(default)]
    pub defaults: Defaults,
}

/// Values used when the matching flag is not given
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Defaults {
    pub userid: Option<String>,
    pub account: Option<u64>,
    pub mode: Option<Mode>,
}

impl Config {
    /// Load configuration from an explicit path, `.reporter/config.toml`, or
    /// the user config directory, in that order
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => {
                if !path.exists() {
                    anyhow::bail!("Config file not found: {}", path.display());
                }
                Some(path.to_path_buf())
            }
            None => default_paths().into_iter().find(|p| p.exists()),
        };

        let Some(path) = path else {
            return Ok(Config::default());
        };

        tracing::debug!(path = %path.display(), "loading configuration");
        Self::from_file(&path)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let content = resolve_env_vars(&content);
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }
}

fn default_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(LOCAL_CONFIG)];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("reporter").join("config.toml"));
    }
    paths
}

/// Resolve ${VAR} references to environment variables
fn resolve_env_vars(value: &str) -> String {
    let mut result = value.to_string();

    // Match ${VAR_NAME} pattern
    let re = regex::Regex::new(r"\$\{([^}]+)\}").expect("static pattern");

    for cap in re.captures_iter(value) {
        let var_name = &cap[1];
        let full_match = &cap[0];

        if let Ok(env_value) = std::env::var(var_name) {
            result = result.replace(full_match, &env_value);
        }
    }

    result
}
