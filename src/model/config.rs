use serde::{Deserialize, Serialize};
use web_time::Duration;

use super::toast::Severity;

/// Configuration from taskdeck.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InteractionConfig {
    #[serde(default)]
    pub gesture: GestureConfig,
    #[serde(default)]
    pub long_press: LongPressConfig,
    #[serde(default)]
    pub swipe: SwipeConfig,
    #[serde(default)]
    pub toast: ToastConfig,
}

/// Thresholds for classifying a single-pointer touch stream.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GestureConfig {
    /// Horizontal distance (px) past which a released swipe commits.
    #[serde(default = "default_threshold_px")]
    pub threshold_px: f32,
    /// Horizontal delta is clamped to ±this while swiping.
    #[serde(default = "default_max_travel_px")]
    pub max_travel_px: f32,
    /// Release velocity (px/ms) past which a swipe commits regardless of distance.
    #[serde(default = "default_velocity_threshold")]
    pub velocity_threshold: f32,
    /// Window after touch-start during which a vertical drag locks the session into scrolling.
    #[serde(default = "default_direction_lock_ms")]
    pub direction_lock_ms: u64,
    /// |dy| must exceed this multiple of |dx| to lock into scrolling.
    #[serde(default = "default_scroll_ratio")]
    pub scroll_ratio: f32,
    /// |dx| past which the host should suppress native scrolling.
    #[serde(default = "default_suppress_scroll_px")]
    pub suppress_scroll_px: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        GestureConfig {
            threshold_px: default_threshold_px(),
            max_travel_px: default_max_travel_px(),
            velocity_threshold: default_velocity_threshold(),
            direction_lock_ms: default_direction_lock_ms(),
            scroll_ratio: default_scroll_ratio(),
            suppress_scroll_px: default_suppress_scroll_px(),
        }
    }
}

impl GestureConfig {
    pub fn direction_lock(&self) -> Duration {
        Duration::from_millis(self.direction_lock_ms)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LongPressConfig {
    #[serde(default = "default_long_press_ms")]
    pub duration_ms: u64,
    /// Movement from the origin (either axis) that cancels the press.
    #[serde(default = "default_move_tolerance_px")]
    pub move_tolerance_px: f32,
}

impl Default for LongPressConfig {
    fn default() -> Self {
        LongPressConfig {
            duration_ms: default_long_press_ms(),
            move_tolerance_px: default_move_tolerance_px(),
        }
    }
}

impl LongPressConfig {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwipeConfig {
    /// How long a swipe-delete (or unschedule) stays cancellable before the
    /// request is actually sent.
    #[serde(default = "default_grace_ms")]
    pub grace_ms: u64,
    /// Rate-limit waits at or under this are retried automatically.
    #[serde(default = "default_auto_retry_max_ms")]
    pub auto_retry_max_ms: u64,
}

impl Default for SwipeConfig {
    fn default() -> Self {
        SwipeConfig {
            grace_ms: default_grace_ms(),
            auto_retry_max_ms: default_auto_retry_max_ms(),
        }
    }
}

impl SwipeConfig {
    pub fn grace(&self) -> Duration {
        Duration::from_millis(self.grace_ms)
    }

    pub fn auto_retry_max(&self) -> Duration {
        Duration::from_millis(self.auto_retry_max_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToastConfig {
    #[serde(default = "default_max_visible")]
    pub max_visible: usize,
    #[serde(default = "default_max_pending")]
    pub max_pending: usize,
    #[serde(default = "default_undo_ms")]
    pub undo_ms: u64,
    #[serde(default)]
    pub durations: DurationTable,
}

impl Default for ToastConfig {
    fn default() -> Self {
        ToastConfig {
            max_visible: default_max_visible(),
            max_pending: default_max_pending(),
            undo_ms: default_undo_ms(),
            durations: DurationTable::default(),
        }
    }
}

/// Auto-dismiss durations per severity. `None` means the toast stays until
/// dismissed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DurationTable {
    #[serde(default = "default_success_durations")]
    pub success: SeverityDurations,
    #[serde(default = "default_info_durations")]
    pub info: SeverityDurations,
    #[serde(default = "default_warning_durations")]
    pub warning: SeverityDurations,
    #[serde(default = "default_error_durations")]
    pub error: SeverityDurations,
}

impl Default for DurationTable {
    fn default() -> Self {
        DurationTable {
            success: default_success_durations(),
            info: default_info_durations(),
            warning: default_warning_durations(),
            error: default_error_durations(),
        }
    }
}

impl DurationTable {
    pub fn for_severity(&self, severity: Severity) -> &SeverityDurations {
        match severity {
            Severity::Success => &self.success,
            Severity::Info => &self.info,
            Severity::Warning => &self.warning,
            Severity::Error => &self.error,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeverityDurations {
    #[serde(default)]
    pub default_ms: Option<u64>,
    #[serde(default)]
    pub with_action_ms: Option<u64>,
}

impl SeverityDurations {
    pub fn resolve(&self, has_action: bool) -> Option<Duration> {
        let ms = if has_action {
            self.with_action_ms
        } else {
            self.default_ms
        };
        ms.map(Duration::from_millis)
    }
}

fn default_threshold_px() -> f32 {
    100.0
}

fn default_max_travel_px() -> f32 {
    120.0
}

fn default_velocity_threshold() -> f32 {
    0.5
}

fn default_direction_lock_ms() -> u64 {
    50
}

fn default_scroll_ratio() -> f32 {
    1.5
}

fn default_suppress_scroll_px() -> f32 {
    10.0
}

fn default_long_press_ms() -> u64 {
    400
}

fn default_move_tolerance_px() -> f32 {
    10.0
}

fn default_grace_ms() -> u64 {
    5000
}

fn default_auto_retry_max_ms() -> u64 {
    10_000
}

fn default_max_visible() -> usize {
    3
}

fn default_max_pending() -> usize {
    5
}

fn default_undo_ms() -> u64 {
    5000
}

fn default_success_durations() -> SeverityDurations {
    SeverityDurations {
        default_ms: Some(3000),
        with_action_ms: Some(5000),
    }
}

fn default_info_durations() -> SeverityDurations {
    SeverityDurations {
        default_ms: Some(4000),
        with_action_ms: Some(8000),
    }
}

fn default_warning_durations() -> SeverityDurations {
    SeverityDurations {
        default_ms: Some(5000),
        with_action_ms: Some(8000),
    }
}

fn default_error_durations() -> SeverityDurations {
    SeverityDurations {
        default_ms: Some(6000),
        with_action_ms: None,
    }
}
