//! Server configuration.
//!
//! Configuration is loaded from (in order of precedence):
//! 1. Environment variables (PATIENTS_API_*)
//! 2. Config file (./patients-api.toml)
//! 3. Default values

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Name of the optional config file, looked up in the working directory.
pub const CONFIG_FILE: &str = "patients-api.toml";

/// Prefix of the environment variables that override configuration.
pub const ENV_PREFIX: &str = "PATIENTS_API_";

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    /// JSON file holding the patient records.
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,

    /// Listen host.
    #[serde(default = "default_host")]
    pub host: IpAddr,

    /// Listen port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Log filter used when RUST_LOG is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit logs as JSON lines.
    #[serde(default)]
    pub json_logs: bool,
}

fn default_data_file() -> PathBuf {
    PathBuf::from("patients.json")
}

fn default_host() -> IpAddr {
    IpAddr::from([127, 0, 0, 1])
}

fn default_port() -> u16 {
    8000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            json_logs: false,
        }
    }
}

impl ServerConfig {
    /// Loads configuration from all sources.
    pub fn load() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }

    /// The layered configuration sources.
    pub fn figment() -> Figment {
        Figment::new()
            .merge(Serialized::defaults(ServerConfig::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    /// Socket address to bind.
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
