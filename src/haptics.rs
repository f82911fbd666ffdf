use std::rc::Rc;

use crate::io::prefs::Preferences;

/// Named vibration patterns the host maps to platform feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HapticPattern {
    /// Swipe-complete committed.
    Success,
    /// Destructive threshold crossed or swipe-delete committed.
    Warning,
    /// Long press fired.
    Impact,
}

impl HapticPattern {
    pub fn as_str(&self) -> &'static str {
        match self {
            HapticPattern::Success => "success",
            HapticPattern::Warning => "warning",
            HapticPattern::Impact => "impact",
        }
    }
}

/// Fire-and-forget feedback. Implementations must not block.
pub trait Haptics {
    fn trigger(&self, pattern: HapticPattern);
}

/// Used when the platform has no vibration support.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHaptics;

impl Haptics for NoHaptics {
    fn trigger(&self, _pattern: HapticPattern) {}
}

/// Shared handle that honours the user's `haptics_enabled` preference.
#[derive(Clone)]
pub struct HapticsHandle {
    inner: Option<Rc<dyn Haptics>>,
    enabled: bool,
}

impl HapticsHandle {
    pub fn new(inner: Rc<dyn Haptics>, enabled: bool) -> Self {
        HapticsHandle {
            inner: Some(inner),
            enabled,
        }
    }

    pub fn from_prefs(inner: Rc<dyn Haptics>, prefs: &Preferences) -> Self {
        Self::new(inner, prefs.haptics_enabled)
    }

    pub fn disabled() -> Self {
        HapticsHandle {
            inner: None,
            enabled: false,
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn trigger(&self, pattern: HapticPattern) {
        if !self.enabled {
            return;
        }
        if let Some(inner) = &self.inner {
            inner.trigger(pattern);
        }
    }
}

impl Default for HapticsHandle {
    fn default() -> Self {
        Self::disabled()
    }
}
