use anyhow::Result;
use serde::Deserialize;

/// Server settings, read from `HN_`-prefixed environment variables
/// (`HN_PORT`, `HN_NUM_STORIES`), each with a default.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_num_stories")]
    pub num_stories: usize,
}

fn default_port() -> u16 {
    3000
}

fn default_num_stories() -> usize {
    30
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let config: Config = envy::prefixed("HN_").from_env()?;
        anyhow::ensure!(config.num_stories > 0, "HN_NUM_STORIES must be positive");
        Ok(config)
    }
}
