//! Services file loading and validation.
//!
//! The services file is a JSON document listing every CDN service whose
//! routing flag should be switched. [`load`] reads it asynchronously,
//! parses it into [`Config`](model::Config), and validates it.

pub mod model;
pub mod validation;

use std::path::Path;

use crate::error::SwitchError;
use model::Config;

pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// Parse a services file from a string without validating it.
pub fn parse_config_str(content: &str, path_display: &str) -> Result<Config, SwitchError> {
    serde_json::from_str(content).map_err(|e| SwitchError::ConfigParse {
        path: path_display.to_string(),
        source: e,
    })
}

/// Read, parse, and validate the services file at `path`.
pub async fn load(path: &Path) -> Result<Config, SwitchError> {
    let content = tokio::fs::read_to_string(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            SwitchError::ConfigFileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            SwitchError::Io(e)
        }
    })?;

    let config = parse_config_str(&content, &path.display().to_string())?;

    if let Err(errors) = validation::validate(&config) {
        return Err(SwitchError::ConfigValidation { errors });
    }

    Ok(config)
}
