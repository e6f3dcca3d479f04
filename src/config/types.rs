use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub engine: EngineConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Assets location used when a call does not name one.
    #[serde(default = "default_assets_dir")]
    pub assets_dir: String,
    /// Directory for generated output file names.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_protocol_version")]
    pub protocol_version: String,
    #[serde(default)]
    pub logs: LogsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogsConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Worker threads for the inference engine; 0 means automatic.
    #[serde(default)]
    pub num_threads: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            assets_dir: default_assets_dir(),
            output_dir: default_output_dir(),
            protocol_version: default_protocol_version(),
            logs: LogsConfig::default(),
        }
    }
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_assets_dir() -> String {
    "assets".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("mcp_outputs")
}

fn default_protocol_version() -> String {
    "2024-11-05".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}
