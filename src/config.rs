use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Environment variable holding the PageSpeed API key
pub const API_KEY_VAR: &str = "PAGESPEED_API_KEY";
/// Environment variable overriding the PageSpeed endpoint
pub const ENDPOINT_VAR: &str = "PAGESPEED_ENDPOINT";
/// Environment variable overriding the listen address
pub const LISTEN_ADDR_VAR: &str = "LISTEN_ADDR";

pub const MISSING_API_KEY_MESSAGE: &str =
    "Chave da API do PageSpeed não configurada (PAGESPEED_API_KEY).";

/// Configuration for the report server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the HTTP server binds to
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// URL of the `runPagespeed` endpoint
    #[serde(default = "default_api_endpoint")]
    pub api_endpoint: String,

    /// API key sent with every upstream call
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

/// Default value for listen_addr
fn default_listen_addr() -> String {
    "127.0.0.1:3000".to_string()
}

/// Default value for api_endpoint
fn default_api_endpoint() -> String {
    "https://www.googleapis.com/pagespeedonline/v5/runPagespeed".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            api_endpoint: default_api_endpoint(),
            api_key: None,
        }
    }
}

impl ServerConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Config(format!("Configuração inválida: {}", e)))
    }

    /// Override settings from the process environment
    pub fn with_env(self) -> Self {
        self.with_env_from(|name| std::env::var(name).ok())
    }

    /// Override settings from the given variable lookup; empty values are ignored
    pub fn with_env_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let lookup = |name: &str| lookup(name).filter(|value| !value.is_empty());

        if let Some(key) = lookup(API_KEY_VAR) {
            self.api_key = Some(key);
        }
        if let Some(endpoint) = lookup(ENDPOINT_VAR) {
            self.api_endpoint = endpoint;
        }
        if let Some(addr) = lookup(LISTEN_ADDR_VAR) {
            self.listen_addr = addr;
        }
        self
    }

    /// The API key, or a configuration error when none is set
    pub fn require_api_key(&self) -> Result<&str> {
        match self.api_key.as_deref() {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(Error::Config(MISSING_API_KEY_MESSAGE.to_string())),
        }
    }
}
