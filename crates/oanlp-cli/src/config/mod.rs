//! Configuration loading for oanlp.
//! Reads oanlp.toml from the current directory or the path in the OANLP_CONFIG env var.

use anyhow::Context;
use oanlp_search::backend::PLOS_SEARCH_URL;
use oanlp_search::request::{DEFAULT_CHUNK_SIZE, DEFAULT_LIMIT};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

pub const CONFIG_ENV: &str = "OANLP_CONFIG";
pub const API_KEY_ENV: &str = "OANLP_API_KEY";
pub const DEFAULT_CONFIG_FILE: &str = "oanlp.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub corpus: CorpusConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_endpoint()     -> String { PLOS_SEARCH_URL.to_string() }
fn default_chunk_size()   -> usize { DEFAULT_CHUNK_SIZE }
fn default_limit()        -> usize { DEFAULT_LIMIT }
fn default_timeout_secs() -> u64 { 30 }

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key: String::new(),
            chunk_size: default_chunk_size(),
            limit: default_limit(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl SearchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusConfig {
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,
    #[serde(default = "default_description")]
    pub description: String,
    #[serde(default = "default_train")]
    pub train: usize,
}

fn default_out_dir()     -> PathBuf { PathBuf::from("new-corpus") }
fn default_description() -> String { "Based on PLOS main corpus.".to_string() }
fn default_train()       -> usize { 10 }

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            out_dir: default_out_dir(),
            description: default_description(),
            train: default_train(),
        }
    }
}

impl Config {
    /// Load from `$OANLP_CONFIG` or `./oanlp.toml`, then apply `$OANLP_API_KEY`.
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        let mut config = Self::load_from(Path::new(&path))?;
        config.apply_api_key(std::env::var(API_KEY_ENV).ok());
        Ok(config)
    }

    /// A missing file yields the defaults.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            warn!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// The environment key only fills an empty configured key.
    pub fn apply_api_key(&mut self, key: Option<String>) {
        if self.search.api_key.is_empty() {
            if let Some(key) = key.filter(|k| !k.trim().is_empty()) {
                self.search.api_key = key;
            }
        }
    }
}
