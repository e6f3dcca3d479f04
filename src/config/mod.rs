mod types;

pub use types::*;

use crate::{Error, Result};
use std::env;
use std::path::Path;
use tracing::debug;

const DEFAULT_CONFIG_PATH: &str = "sd-mcp.yaml";

/// Env vars consulted for the engine thread count, in order.
const THREAD_ENV_VARS: [&str; 2] = ["SD_NUM_THREADS", "NUM_THREADS"];

/// Loads the configuration file.
///
/// An explicit `path` (or `CONFIG_PATH`) must exist. When neither is given the
/// default file is optional and built-in defaults are used in its absence.
pub async fn load(path: Option<&Path>) -> Result<Config> {
    let explicit = path
        .map(|p| p.to_path_buf())
        .or_else(|| env::var_os("CONFIG_PATH").map(Into::into));

    let config_path = match explicit {
        Some(p) => p,
        None => {
            let default = Path::new(DEFAULT_CONFIG_PATH);
            if !tokio::fs::try_exists(default).await.unwrap_or(false) {
                debug!("No {} found, using built-in defaults", DEFAULT_CONFIG_PATH);
                return Ok(Config::default());
            }
            default.to_path_buf()
        }
    };

    debug!("Loading configuration from: {}", config_path.display());

    let config_str = tokio::fs::read_to_string(&config_path).await.map_err(|e| {
        Error::config(format!("failed to read {}: {}", config_path.display(), e))
    })?;
    parse(&config_str)
}

pub fn parse(yaml: &str) -> Result<Config> {
    // An empty document deserializes to unit, not to a map.
    if yaml.trim().is_empty() {
        return Ok(Config::default());
    }
    Ok(serde_yaml::from_str(yaml)?)
}

/// Resolves the engine thread count: the configured value when positive,
/// otherwise the first env var holding an integer >= 1, otherwise 0 (automatic).
pub fn resolve_num_threads(engine: &EngineConfig) -> usize {
    if engine.num_threads > 0 {
        return engine.num_threads;
    }
    threads_from_values(THREAD_ENV_VARS.iter().map(|name| env::var(name).ok()))
}

fn threads_from_values<I>(values: I) -> usize
where
    I: IntoIterator<Item = Option<String>>,
{
    for value in values {
        let Some(value) = value else { continue };
        if value.is_empty() {
            continue;
        }
        // A malformed value means automatic; later vars are not consulted.
        return match value.parse::<usize>() {
            Ok(n) if n >= 1 => n,
            _ => 0,
        };
    }
    0
}
