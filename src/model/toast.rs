use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use web_time::Duration;

/// Toast severity, ordered by priority: `Error > Warning > Info > Success`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }

    /// Lenient parse: anything unrecognised falls back to `Info`.
    pub fn parse_lossy(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "success" => Severity::Success,
            "warning" | "warn" => Severity::Warning,
            "error" => Severity::Error,
            _ => Severity::Info,
        }
    }
}

/// Unknown severities deserialize as `Info`.
impl From<String> for Severity {
    fn from(s: String) -> Self {
        Severity::parse_lossy(&s)
    }
}

/// An action button on a toast. The callback runs on the UI thread when the
/// user clicks it.
#[derive(Clone)]
pub struct ToastAction {
    pub label: String,
    pub callback: Rc<dyn Fn()>,
}

impl ToastAction {
    pub fn new(label: impl Into<String>, callback: impl Fn() + 'static) -> Self {
        ToastAction {
            label: label.into(),
            callback: Rc::new(callback),
        }
    }

    pub fn invoke(&self) {
        (self.callback)()
    }
}

impl fmt::Debug for ToastAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToastAction")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// How long a toast stays up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToastDuration {
    /// Look up the severity table (with-action vs. plain).
    #[default]
    Auto,
    Fixed(Duration),
    /// No timer; only a click or an explicit dismiss removes it.
    Persistent,
}

/// One notification as submitted by a caller.
#[derive(Debug, Clone)]
pub struct ToastRecord {
    /// Dedup key. At most one live toast (visible or queued) carries a given id.
    pub id: Option<String>,
    pub message: String,
    pub severity: Severity,
    pub action: Option<ToastAction>,
    pub duration: ToastDuration,
}

impl ToastRecord {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        ToastRecord {
            id: None,
            message: message.into(),
            severity,
            action: None,
            duration: ToastDuration::Auto,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(Severity::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Severity::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_action(mut self, action: ToastAction) -> Self {
        self.action = Some(action);
        self
    }

    pub fn with_duration(mut self, duration: ToastDuration) -> Self {
        self.duration = duration;
        self
    }

    pub fn persistent(self) -> Self {
        self.with_duration(ToastDuration::Persistent)
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn severity_priority_order() {
        assert!(Severity::Error > Severity::Warning);
        assert!(Severity::Warning > Severity::Info);
        assert!(Severity::Info > Severity::Success);
    }

    #[test]
    fn unknown_severity_falls_back_to_info() {
        assert_eq!(Severity::parse_lossy("critical"), Severity::Info);
        assert_eq!(Severity::parse_lossy(" Error "), Severity::Error);
        let s: Severity = serde_json::from_str("\"fatal\"").unwrap();
        assert_eq!(s, Severity::Info);
        let s: Severity = serde_json::from_str("\"warning\"").unwrap();
        assert_eq!(s, Severity::Warning);
        assert_eq!(serde_json::to_string(&Severity::Error).unwrap(), "\"error\"");
        // Priority order survives the lenient parse
        assert!(Severity::Error > Severity::Warning);
        assert!(Severity::Info > Severity::Success);
    }

    #[test]
    fn action_invokes_callback() {
        let hits = Rc::new(Cell::new(0));
        let counter = hits.clone();
        let action = ToastAction::new("Undo", move || counter.set(counter.get() + 1));
        action.invoke();
        action.clone().invoke();
        assert_eq!(hits.get(), 2);
        assert_eq!(format!("{:?}", action), "ToastAction { label: \"Undo\", .. }");
    }
}
