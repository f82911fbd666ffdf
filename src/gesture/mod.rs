//! Touch gesture recognition for task rows.
//!
//! - [`classifier`] turns a touch stream into scroll / swipe / cancel intents
//! - [`long_press`] fires after a dwell time when the finger stays put
//! - [`swipe`] binds classifier sessions to one row and runs complete / delete

pub mod classifier;
pub mod long_press;
pub mod swipe;

pub use classifier::{GestureClassifier, GestureSession};
pub use long_press::{LongPressDetector, PressRelease};
pub use swipe::{SwipeActions, SwipeActivity, SwipeController, SwipeFeedback, SwipeOutcome};
