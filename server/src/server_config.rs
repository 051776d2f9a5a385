use std::net::SocketAddr;

use common::config::Validate;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_FILE: &str = "kalah_server.yaml";

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_address: String,
    /// Served under `/assets` when set.
    pub static_files_path: Option<String>,
    pub log_prefix: Option<String>,
    pub verbose: bool,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        self.listen_address
            .parse()
            .map_err(|e| format!("Invalid listen address '{}': {}", self.listen_address, e))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: "0.0.0.0:9000".to_string(),
            static_files_path: None,
            log_prefix: None,
            verbose: false,
        }
    }
}

impl Validate for ServerConfig {
    fn validate(&self) -> Result<(), String> {
        self.socket_addr()?;
        if let Some(path) = &self.static_files_path {
            if path.trim().is_empty() {
                return Err("Static files path must not be empty".to_string());
            }
        }
        Ok(())
    }
}
