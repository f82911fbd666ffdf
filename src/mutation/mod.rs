//! Task mutations driven by gestures: optimistic updates with rollback,
//! grace-period deletes with undo, and error routing to toasts.

pub mod actions;
pub mod api;
pub mod error;
pub mod grace;

pub use actions::{TaskActions, TaskOp};
pub use api::{ElementPosition, Surface, TaskMutations, TaskView};
pub use error::MutationError;
pub use grace::{GraceEvent, GraceKind, GraceScheduler, PendingOp, UndoToken};
