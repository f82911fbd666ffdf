use std::cell::Cell;
use std::rc::Rc;

use log::info;
use web_time::Instant;

use crate::haptics::{HapticPattern, HapticsHandle};
use crate::model::gesture::{EndAction, MoveAction, TouchSample};

use super::classifier::{GestureClassifier, GestureSession};

/// Advisory "something is being swiped" flag shared by every controller on a
/// page. Hosts use it to suppress ancestor scrolling; it is not a lock.
#[derive(Debug, Clone, Default)]
pub struct SwipeActivity(Rc<Cell<usize>>);

impl SwipeActivity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_swiping(&self) -> bool {
        self.0.get() > 0
    }

    fn enter(&self) {
        self.0.set(self.0.get() + 1);
    }

    fn leave(&self) {
        self.0.set(self.0.get().saturating_sub(1));
    }
}

/// The two things a committed swipe can do to a task row.
pub trait SwipeActions<K> {
    /// Swipe right. Optimistic: the row flips to completed before the request.
    fn complete(&mut self, element: &K, now: Instant);
    /// Swipe left. Grace-period delete: the row leaves now, the request later.
    fn delete(&mut self, element: &K, now: Instant);
}

/// Visual feedback for one move event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SwipeFeedback {
    /// Leave the row alone.
    Idle,
    /// Native scroll owns the gesture.
    Scroll,
    Drag {
        translate_x: f32,
        progress: f32,
        /// Progress reached 1.0: releasing now commits.
        armed: bool,
        suppress_scroll: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeOutcome {
    /// No swipe happened.
    None,
    /// Released under threshold; animate the row back to rest.
    SnapBack,
    Completed,
    Deleted,
}

/// Binds gesture sessions to one list row.
pub struct SwipeController<K> {
    element: K,
    classifier: GestureClassifier,
    activity: SwipeActivity,
    haptics: HapticsHandle,
    session: Option<GestureSession>,
    counted: bool,
    armed: bool,
}

impl<K> SwipeController<K> {
    pub fn new(element: K, classifier: GestureClassifier, activity: SwipeActivity) -> Self {
        SwipeController {
            element,
            classifier,
            activity,
            haptics: HapticsHandle::disabled(),
            session: None,
            counted: false,
            armed: false,
        }
    }

    pub fn with_haptics(mut self, haptics: HapticsHandle) -> Self {
        self.haptics = haptics;
        self
    }

    pub fn element(&self) -> &K {
        &self.element
    }

    pub fn session(&self) -> Option<&GestureSession> {
        self.session.as_ref()
    }

    pub fn touch_start(&mut self, sample: TouchSample, contacts: usize, blocked: bool) {
        self.reset();
        self.session = Some(self.classifier.start(sample, contacts, blocked));
    }

    pub fn touch_move(&mut self, sample: TouchSample, contacts: usize) -> SwipeFeedback {
        let Some(session) = &mut self.session else {
            return SwipeFeedback::Idle;
        };
        match self.classifier.update(session, sample, contacts) {
            MoveAction::None => {
                if self.counted && !session.is_swiping() {
                    self.counted = false;
                    self.activity.leave();
                }
                SwipeFeedback::Idle
            }
            MoveAction::Scroll => SwipeFeedback::Scroll,
            MoveAction::Swipe {
                delta_x,
                progress,
                suppress_scroll,
            } => {
                if !self.counted {
                    self.counted = true;
                    self.activity.enter();
                }
                let armed = progress >= 1.0;
                if armed && !self.armed && delta_x < 0.0 {
                    self.haptics.trigger(HapticPattern::Warning);
                }
                self.armed = armed;
                SwipeFeedback::Drag {
                    translate_x: delta_x,
                    progress,
                    armed,
                    suppress_scroll,
                }
            }
        }
    }

    /// Finish the gesture and run the matching action.
    pub fn touch_end(&mut self, now: Instant, actions: &mut dyn SwipeActions<K>) -> SwipeOutcome {
        let Some(session) = self.session.take() else {
            return SwipeOutcome::None;
        };
        let final_dx = session.last_delta_x();
        let action = self.classifier.end(session, final_dx, now);
        self.reset();
        match action {
            EndAction::None => SwipeOutcome::None,
            EndAction::Cancel { .. } => SwipeOutcome::SnapBack,
            EndAction::SwipeRight { .. } => {
                info!("swipe-right commit");
                self.haptics.trigger(HapticPattern::Success);
                actions.complete(&self.element, now);
                SwipeOutcome::Completed
            }
            EndAction::SwipeLeft { .. } => {
                info!("swipe-left commit");
                self.haptics.trigger(HapticPattern::Warning);
                actions.delete(&self.element, now);
                SwipeOutcome::Deleted
            }
        }
    }

    pub fn touch_cancel(&mut self) {
        self.session = None;
        self.reset();
    }

    fn reset(&mut self) {
        if self.counted {
            self.activity.leave();
        }
        self.counted = false;
        self.armed = false;
    }
}
