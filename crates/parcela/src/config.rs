//! Layered configuration
//!
//! Sources, lowest precedence first:
//! 1. built-in defaults
//! 2. user config: `<config dir>/parcela/parcela.toml`
//! 3. project config: `parcela.toml` in the working directory
//! 4. an explicit `--config` file
//! 5. environment variables (`PARCELA_TARGET`, `PARCELA_DEDUPE_MODULES`)
//!
//! CLI flags are applied on top by the binary.

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow};
use etcetera::{BaseStrategy, choose_base_strategy};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::transformer::DEFAULT_TARGET;

/// File name of both the project and the user configuration file
pub const CONFIG_FILE_NAME: &str = "parcela.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    /// ECMAScript target of the syntax lowering pass
    pub target: String,
    /// Build each resolved path once and share its id between importers
    pub dedupe_modules: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target: DEFAULT_TARGET.to_owned(),
            dedupe_modules: false,
        }
    }
}

/// A configuration file where every key is optional
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialConfig {
    target: Option<String>,
    dedupe_modules: Option<bool>,
}

impl Config {
    /// Load the layered configuration for the current working directory
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(user_config) = user_config_path() {
            config.merge_file_if_exists(&user_config)?;
        }
        config.merge_file_if_exists(Path::new(CONFIG_FILE_NAME))?;

        if let Some(path) = explicit {
            let partial = read_partial(path)?;
            config.merge(partial);
        }

        config.apply_env()?;
        debug!("Effective configuration: {config:?}");
        Ok(config)
    }

    fn merge_file_if_exists(&mut self, path: &Path) -> Result<()> {
        if !path.is_file() {
            return Ok(());
        }
        let partial = read_partial(path)?;
        self.merge(partial);
        Ok(())
    }

    fn merge(&mut self, partial: PartialConfig) {
        if let Some(target) = partial.target {
            self.target = target;
        }
        if let Some(dedupe_modules) = partial.dedupe_modules {
            self.dedupe_modules = dedupe_modules;
        }
    }

    /// Apply `PARCELA_*` environment overrides
    pub fn apply_env(&mut self) -> Result<()> {
        if let Ok(target) = env::var("PARCELA_TARGET") {
            if target.is_empty() {
                warn!("Ignoring empty PARCELA_TARGET");
            } else {
                self.target = target;
            }
        }
        if let Ok(value) = env::var("PARCELA_DEDUPE_MODULES") {
            self.dedupe_modules = parse_bool(&value)
                .ok_or_else(|| anyhow!("invalid PARCELA_DEDUPE_MODULES value '{value}'"))?;
        }
        Ok(())
    }
}

fn read_partial(path: &Path) -> Result<PartialConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let partial = toml::from_str(&text)
        .with_context(|| format!("failed to parse config file {}", path.display()))?;
    debug!("Loaded configuration from {}", path.display());
    Ok(partial)
}

fn user_config_path() -> Option<PathBuf> {
    let strategy = choose_base_strategy().ok()?;
    Some(strategy.config_dir().join("parcela").join(CONFIG_FILE_NAME))
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
