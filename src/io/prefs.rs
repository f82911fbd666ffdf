use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

pub const PREFS_FILE: &str = ".taskdeck-prefs.json";

#[derive(Debug, thiserror::Error)]
pub enum PrefsError {
    #[error("could not write preferences: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not serialize preferences: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// User preference flags (written to .taskdeck-prefs.json)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    /// Vibrate on swipe commit, threshold crossing and long-press
    #[serde(default = "default_true")]
    pub haptics_enabled: bool,
    /// Whether the one-time swipe hint was already shown
    #[serde(default)]
    pub gesture_hint_shown: bool,
}

fn default_true() -> bool {
    true
}

impl Default for Preferences {
    fn default() -> Self {
        Preferences {
            haptics_enabled: true,
            gesture_hint_shown: false,
        }
    }
}

/// Read preferences from the given directory. A missing or unreadable file
/// yields defaults.
pub fn read_prefs(dir: &Path) -> Preferences {
    let path = dir.join(PREFS_FILE);
    let Ok(content) = fs::read_to_string(&path) else {
        return Preferences::default();
    };
    match serde_json::from_str(&content) {
        Ok(prefs) => prefs,
        Err(e) => {
            log::warn!("ignoring malformed {}: {e}", path.display());
            Preferences::default()
        }
    }
}

/// Write preferences to the given directory
pub fn write_prefs(dir: &Path, prefs: &Preferences) -> Result<(), PrefsError> {
    let content = serde_json::to_string_pretty(prefs)?;
    fs::write(dir.join(PREFS_FILE), content)?;
    Ok(())
}
