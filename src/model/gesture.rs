use serde::Serialize;
use web_time::Instant;

/// One pointer position, produced per touch event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchSample {
    pub x: f32,
    pub y: f32,
    pub t: Instant,
}

impl TouchSample {
    pub fn new(x: f32, y: f32, t: Instant) -> Self {
        TouchSample { x, y, t }
    }
}

/// Classification state of a gesture session. Every state other than
/// `Undetermined` is terminal for the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GesturePhase {
    Undetermined,
    Scrolling,
    Swiping,
    Disabled,
}

/// Result of feeding a move sample to the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum MoveAction {
    /// Nothing to do: disabled, abandoned, or no movement yet.
    None,
    /// Native vertical scrolling owns this gesture.
    Scroll,
    /// Horizontal drag. `delta_x` is clamped to the max travel.
    Swipe {
        delta_x: f32,
        progress: f32,
        /// The host should suppress default scrolling for this event.
        suppress_scroll: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SwipeDirection {
    Left,
    Right,
}

/// Result of ending a gesture session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum EndAction {
    None,
    /// Below both thresholds; the element animates back to rest.
    Cancel { velocity: f32 },
    SwipeLeft { velocity: f32 },
    SwipeRight { velocity: f32 },
}

impl EndAction {
    pub fn direction(&self) -> Option<SwipeDirection> {
        match self {
            EndAction::SwipeLeft { .. } => Some(SwipeDirection::Left),
            EndAction::SwipeRight { .. } => Some(SwipeDirection::Right),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EndAction::None => "none",
            EndAction::Cancel { .. } => "cancel",
            EndAction::SwipeLeft { .. } => "swipe-left",
            EndAction::SwipeRight { .. } => "swipe-right",
        }
    }
}
