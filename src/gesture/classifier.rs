use log::debug;
use web_time::Instant;

use crate::model::config::GestureConfig;
use crate::model::gesture::{EndAction, GesturePhase, MoveAction, TouchSample};

/// Per-interaction state, created on touch-start and consumed on touch-end.
#[derive(Debug, Clone)]
pub struct GestureSession {
    start: TouchSample,
    last: TouchSample,
    phase: GesturePhase,
    /// Sign of the vertical travel that locked the session into scrolling.
    scroll_sign: f32,
    last_delta_x: f32,
    /// Time of the first sample that moved; the lock window starts here.
    moved_at: Option<Instant>,
}

impl GestureSession {
    pub fn phase(&self) -> GesturePhase {
        self.phase
    }

    pub fn start_sample(&self) -> TouchSample {
        self.start
    }

    pub fn last_sample(&self) -> TouchSample {
        self.last
    }

    /// Unclamped horizontal travel at the most recent sample.
    pub fn last_delta_x(&self) -> f32 {
        self.last_delta_x
    }

    pub fn is_swiping(&self) -> bool {
        self.phase == GesturePhase::Swiping
    }
}

/// Turns a single-pointer touch stream into scroll / swipe / cancel intents.
///
/// The classifier holds only configuration; all per-gesture state lives in the
/// [`GestureSession`] the caller owns.
#[derive(Debug, Clone, Copy, Default)]
pub struct GestureClassifier {
    config: GestureConfig,
}

impl GestureClassifier {
    pub fn new(config: GestureConfig) -> Self {
        GestureClassifier { config }
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Open a session. `blocked` is the host's verdict on whether the touch
    /// target sits inside a no-swipe zone (horizontal scrollers, controls).
    pub fn start(&self, sample: TouchSample, contacts: usize, blocked: bool) -> GestureSession {
        let phase = if blocked || contacts > 1 {
            debug!("gesture disabled at start (blocked={blocked}, contacts={contacts})");
            GesturePhase::Disabled
        } else {
            GesturePhase::Undetermined
        };
        GestureSession {
            start: sample,
            last: sample,
            phase,
            scroll_sign: 0.0,
            last_delta_x: 0.0,
            moved_at: None,
        }
    }

    pub fn update(
        &self,
        session: &mut GestureSession,
        sample: TouchSample,
        contacts: usize,
    ) -> MoveAction {
        if contacts > 1 {
            session.phase = GesturePhase::Disabled;
        }
        session.last = sample;
        let dx = sample.x - session.start.x;
        let dy = sample.y - session.start.y;

        match session.phase {
            GesturePhase::Disabled => MoveAction::None,
            GesturePhase::Scrolling => {
                if dy * session.scroll_sign < 0.0 {
                    debug!("scroll reversed, abandoning gesture");
                    session.phase = GesturePhase::Disabled;
                    return MoveAction::None;
                }
                MoveAction::Scroll
            }
            GesturePhase::Undetermined => {
                if dx == 0.0 && dy == 0.0 {
                    return MoveAction::None;
                }
                let moved_at = *session.moved_at.get_or_insert(sample.t);
                let elapsed = sample.t.saturating_duration_since(moved_at);
                if elapsed <= self.config.direction_lock()
                    && dy.abs() > self.config.scroll_ratio * dx.abs()
                {
                    debug!("direction lock: scrolling (dx={dx}, dy={dy})");
                    session.phase = GesturePhase::Scrolling;
                    session.scroll_sign = dy.signum();
                    return MoveAction::Scroll;
                }
                debug!("direction lock: swiping (dx={dx}, dy={dy})");
                session.phase = GesturePhase::Swiping;
                self.swipe_feedback(session, dx)
            }
            GesturePhase::Swiping => self.swipe_feedback(session, dx),
        }
    }

    fn swipe_feedback(&self, session: &mut GestureSession, dx: f32) -> MoveAction {
        session.last_delta_x = dx;
        let max = self.config.max_travel_px;
        // f32::clamp panics on NaN or inverted bounds
        let clamped = dx.max(-max).min(max);
        MoveAction::Swipe {
            delta_x: clamped,
            progress: clamped.abs() / self.config.threshold_px,
            suppress_scroll: dx.abs() > self.config.suppress_scroll_px,
        }
    }

    /// Close the session and decide whether the swipe commits.
    pub fn end(&self, session: GestureSession, final_delta_x: f32, now: Instant) -> EndAction {
        if session.phase != GesturePhase::Swiping {
            return EndAction::None;
        }
        let elapsed_ms = now
            .saturating_duration_since(session.start.t)
            .as_secs_f32()
            * 1000.0;
        let velocity = final_delta_x.abs() / elapsed_ms.max(1.0);
        let triggered = final_delta_x.abs() > self.config.threshold_px
            || velocity > self.config.velocity_threshold;

        let action = if !triggered {
            EndAction::Cancel { velocity }
        } else if final_delta_x > 0.0 {
            EndAction::SwipeRight { velocity }
        } else {
            EndAction::SwipeLeft { velocity }
        };
        debug!(
            "gesture end: {} (dx={final_delta_x}, velocity={velocity:.3}px/ms)",
            action.as_str()
        );
        action
    }
}
