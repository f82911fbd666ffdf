use log::debug;
use web_time::{Duration, Instant};

use crate::haptics::{HapticPattern, HapticsHandle};
use crate::model::config::LongPressConfig;
use crate::model::gesture::TouchSample;

#[derive(Debug, Clone, Copy)]
struct Press {
    origin: TouchSample,
    /// `None` once the timer fired or was cancelled.
    deadline: Option<Instant>,
    triggered: bool,
}

/// What the host should do when the finger lifts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PressRelease {
    /// The long press fired; the synthetic click that follows must be swallowed.
    pub suppress_click: bool,
}

/// Dwell-timer recognizer bound to one element.
pub struct LongPressDetector<K> {
    element: K,
    duration: Duration,
    move_tolerance_px: f32,
    on_fire: Box<dyn FnMut(&K)>,
    haptics: HapticsHandle,
    press: Option<Press>,
}

impl<K> LongPressDetector<K> {
    pub fn attach(element: K, on_fire: impl FnMut(&K) + 'static, duration: Duration) -> Self {
        LongPressDetector {
            element,
            duration,
            move_tolerance_px: LongPressConfig::default().move_tolerance_px,
            on_fire: Box::new(on_fire),
            haptics: HapticsHandle::disabled(),
            press: None,
        }
    }

    pub fn from_config(element: K, on_fire: impl FnMut(&K) + 'static, config: &LongPressConfig) -> Self {
        let mut detector = Self::attach(element, on_fire, config.duration());
        detector.move_tolerance_px = config.move_tolerance_px;
        detector
    }

    pub fn with_haptics(mut self, haptics: HapticsHandle) -> Self {
        self.haptics = haptics;
        self
    }

    pub fn element(&self) -> &K {
        &self.element
    }

    /// When the host should next call [`tick`](Self::tick).
    pub fn next_deadline(&self) -> Option<Instant> {
        self.press.and_then(|p| p.deadline)
    }

    pub fn touch_start(&mut self, sample: TouchSample, contacts: usize) {
        if contacts > 1 {
            self.press = None;
            return;
        }
        self.press = Some(Press {
            origin: sample,
            deadline: Some(sample.t + self.duration),
            triggered: false,
        });
    }

    pub fn touch_move(&mut self, sample: TouchSample) {
        let tolerance = self.move_tolerance_px;
        if let Some(press) = &mut self.press {
            let dx = (sample.x - press.origin.x).abs();
            let dy = (sample.y - press.origin.y).abs();
            if (dx > tolerance || dy > tolerance) && press.deadline.take().is_some() {
                debug!("long press cancelled by movement ({dx}, {dy})");
            }
        }
    }

    /// Fire the press if its timer elapsed. Returns true on the tick that fired.
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(press) = &mut self.press else {
            return false;
        };
        match press.deadline {
            Some(deadline) if now >= deadline => {
                press.deadline = None;
                press.triggered = true;
            }
            _ => return false,
        }
        debug!("long press fired");
        self.haptics.trigger(HapticPattern::Impact);
        (self.on_fire)(&self.element);
        true
    }

    pub fn touch_end(&mut self, now: Instant) -> PressRelease {
        self.tick(now);
        let triggered = self.press.take().is_some_and(|p| p.triggered);
        PressRelease {
            suppress_click: triggered,
        }
    }

    pub fn touch_cancel(&mut self) {
        self.press = None;
    }
}
