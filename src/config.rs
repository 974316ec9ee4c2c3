use anyhow::{Context, Error};
use std::net::SocketAddr;
use std::path::PathBuf;

const DEFAULT_GITHUB_API_BASE_URL: &str = "https://api.github.com";
const DEFAULT_STORE_PATH: &str = "github-explorer.json";
const DEFAULT_ADDR: &str = "127.0.0.1:3000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub github_api_base_url: String,
    pub github_token: Option<String>,
    pub store_path: PathBuf,
    pub addr: SocketAddr,
}

impl Config {
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from `lookup`; empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let addr = var("GITHUB_EXPLORER_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr = addr
            .parse()
            .with_context(|| format!("Invalid GITHUB_EXPLORER_ADDR: {addr}"))?;

        Ok(Self {
            github_api_base_url: var("GITHUB_API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_GITHUB_API_BASE_URL.to_string()),
            github_token: var("GITHUB_TOKEN"),
            store_path: var("GITHUB_EXPLORER_STORE_PATH")
                .map_or_else(|| PathBuf::from(DEFAULT_STORE_PATH), PathBuf::from),
            addr,
        })
    }
}
