//! Configuration parsing and validation.
//!
//! The harness is configured through a single TOML file (by default
//! `config/onboard.toml`). Every section except `[db]` is optional.
//!
//! ```toml
//! [db]
//! path = "./data/onboard.sqlite"
//!
//! [server]
//! bind = "127.0.0.1:7331"
//!
//! [import]
//! root = "./knowledge"
//! include_globs = ["**/*.json"]
//! exclude_globs = []
//!
//! [logging]
//! level = "info"
//!
//! [agents.inline.release-buddy]
//! description = "Walks new hires through the release process"
//! tools = ["search_documentation", "find_wiki_content"]
//! system_prompt = "You help new engineers ship their first release."
//! ```

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub db: DbConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub import: ImportConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub agents: AgentsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:7331".to_string()
}

/// Where `onboard import` looks for knowledge documents.
#[derive(Debug, Deserialize, Clone)]
pub struct ImportConfig {
    #[serde(default = "default_import_root")]
    pub root: PathBuf,
    #[serde(default = "default_include_globs")]
    pub include_globs: Vec<String>,
    #[serde(default)]
    pub exclude_globs: Vec<String>,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            root: default_import_root(),
            include_globs: default_include_globs(),
            exclude_globs: Vec::new(),
        }
    }
}

fn default_import_root() -> PathBuf {
    PathBuf::from("./knowledge")
}

fn default_include_globs() -> Vec<String> {
    vec!["**/*.json".to_string()]
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Fallback filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AgentsConfig {
    #[serde(default)]
    pub inline: BTreeMap<String, InlineAgentConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct InlineAgentConfig {
    pub description: String,
    #[serde(default)]
    pub tools: Vec<String>,
    pub system_prompt: String,
}

impl Config {
    /// Defaults for commands that run without a config file.
    pub fn minimal() -> Self {
        Self {
            db: DbConfig {
                path: PathBuf::from("./data/onboard.sqlite"),
            },
            server: ServerConfig::default(),
            import: ImportConfig::default(),
            logging: LoggingConfig::default(),
            agents: AgentsConfig::default(),
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_config(&content)
}

/// Parse and validate configuration text.
pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).with_context(|| "Failed to parse config file")?;

    if config.db.path.as_os_str().is_empty() {
        bail!("db.path must not be empty");
    }

    if config.server.bind.parse::<SocketAddr>().is_err() {
        bail!(
            "server.bind must be a socket address like 127.0.0.1:7331, got '{}'",
            config.server.bind
        );
    }

    if config.import.include_globs.is_empty() {
        bail!("import.include_globs must list at least one pattern");
    }

    for (name, agent) in &config.agents.inline {
        if agent.system_prompt.trim().is_empty() {
            bail!("agents.inline.{}.system_prompt must not be empty", name);
        }
    }

    Ok(config)
}
