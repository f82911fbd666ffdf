use super::error::MutationError;

/// Server-side task mutations. Each call is one request; the server owns the
/// request and response shapes.
///
/// | method       | request                                   |
/// |--------------|-------------------------------------------|
/// | `complete`   | `POST /tasks/{id}/complete`               |
/// | `uncomplete` | `POST /tasks/{id}/uncomplete`             |
/// | `delete`     | `DELETE /tasks/{id}`                      |
/// | `restore`    | `POST /tasks/{id}/restore`                |
/// | `unschedule` | `PUT /tasks/{id}` with a null date & time |
pub trait TaskMutations {
    /// Checked before any optimistic change.
    fn is_online(&self) -> bool {
        true
    }
    fn complete(&mut self, task_id: &str) -> Result<(), MutationError>;
    fn uncomplete(&mut self, task_id: &str) -> Result<(), MutationError>;
    fn delete(&mut self, task_id: &str) -> Result<(), MutationError>;
    fn restore(&mut self, task_id: &str) -> Result<(), MutationError>;
    fn unschedule(&mut self, task_id: &str) -> Result<(), MutationError>;
}

/// Where an element sat among its siblings, captured before it is detached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementPosition {
    pub parent: String,
    pub previous_sibling: Option<String>,
    pub next_sibling: Option<String>,
}

/// Which on-screen representation of a task a patch targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Surface {
    /// Row in the task list.
    List,
    /// Card on the calendar.
    Calendar,
}

/// Local patches that keep every representation of a task in sync without
/// a page reload.
pub trait TaskView {
    fn position(&self, surface: Surface, task_id: &str) -> Option<ElementPosition>;
    fn detach(&mut self, surface: Surface, task_id: &str);
    /// Put the element back exactly where `position` says.
    fn restore(&mut self, surface: Surface, task_id: &str, position: &ElementPosition);
    /// Flip completed styling (list row, calendar card, completed section).
    fn set_completed(&mut self, task_id: &str, completed: bool);
}
