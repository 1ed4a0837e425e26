//! Gateway config loader (strict parsing).

pub mod schema;

use std::fs;
use std::io::ErrorKind;

use greeter_core::error::{GreeterError, Result};

pub use schema::{GatewayConfig, ServerSection};

/// File read when no path is given on the command line.
pub const DEFAULT_CONFIG_PATH: &str = "greeter.yaml";

pub fn load_from_file(path: &str) -> Result<GatewayConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| GreeterError::Internal(format!("read config failed ({path}): {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<GatewayConfig> {
    let cfg: GatewayConfig = serde_yaml::from_str(s)
        .map_err(|e| GreeterError::BadRequest(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Load the config the binary should run with.
///
/// An explicit path must exist. Without one, `greeter.yaml` is read if present
/// and built-in defaults are used otherwise.
pub fn load(explicit: Option<&str>) -> Result<GatewayConfig> {
    if let Some(path) = explicit {
        return load_from_file(path);
    }

    match fs::read_to_string(DEFAULT_CONFIG_PATH) {
        Ok(s) => load_from_str(&s),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::info!(path = DEFAULT_CONFIG_PATH, "config file not found, using defaults");
            Ok(GatewayConfig::default())
        }
        Err(e) => Err(GreeterError::Internal(format!(
            "read config failed ({DEFAULT_CONFIG_PATH}): {e}"
        ))),
    }
}
