use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::model::config::InteractionConfig;

/// Error type for config loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
    #[error("could not serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),
}

/// Load the interaction config. A missing file means "all defaults"; any
/// table or key left out of the file also falls back to its default.
pub fn load_config(path: &Path) -> Result<InteractionConfig, ConfigError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::debug!("no config at {}, using defaults", path.display());
            return Ok(InteractionConfig::default());
        }
        Err(e) => {
            return Err(ConfigError::ReadError {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };
    let config: InteractionConfig = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;
    validate(&config)?;
    Ok(config)
}

/// Reject values the state machines cannot work with.
pub fn validate(config: &InteractionConfig) -> Result<(), ConfigError> {
    let g = &config.gesture;
    let non_negative = [
        ("gesture.max_travel_px", g.max_travel_px),
        ("gesture.velocity_threshold", g.velocity_threshold),
        ("gesture.scroll_ratio", g.scroll_ratio),
        ("gesture.suppress_scroll_px", g.suppress_scroll_px),
        ("long_press.move_tolerance_px", config.long_press.move_tolerance_px),
    ];
    for (field, value) in non_negative {
        if !value.is_finite() {
            return Err(ConfigError::Invalid {
                field,
                reason: "must be a finite number",
            });
        }
        if value < 0.0 {
            return Err(ConfigError::Invalid {
                field,
                reason: "must not be negative",
            });
        }
    }
    if !g.threshold_px.is_finite() || g.threshold_px <= 0.0 {
        return Err(ConfigError::Invalid {
            field: "gesture.threshold_px",
            reason: "must be a positive number",
        });
    }
    if config.toast.max_visible == 0 {
        return Err(ConfigError::Invalid {
            field: "toast.max_visible",
            reason: "must be at least 1",
        });
    }
    Ok(())
}

/// Render the effective config as TOML.
pub fn config_to_toml(config: &InteractionConfig) -> Result<String, ConfigError> {
    Ok(toml::to_string_pretty(config)?)
}
