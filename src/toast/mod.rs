//! Toast notification engine.
//!
//! - [`queue`] - `ToastQueue`: pending list, visible stack, per-toast timers
//! - [`renderer`] - `ToastRenderer` boundary plus a text renderer for headless hosts

pub mod queue;
pub mod renderer;

pub use queue::{ToastEntry, ToastKey, ToastQueue};
pub use renderer::{TextRenderer, ToastRenderer};
