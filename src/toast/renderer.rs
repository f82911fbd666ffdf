use crate::model::toast::ToastRecord;

use super::queue::ToastKey;

/// Paints toasts. The queue never touches rendering primitives itself.
///
/// `remove` is the exit transition; it is called exactly once per created
/// handle.
pub trait ToastRenderer {
    type Handle;

    fn create(&mut self, key: ToastKey, record: &ToastRecord) -> Self::Handle;
    fn update(&mut self, handle: &Self::Handle, record: &ToastRecord);
    fn remove(&mut self, handle: Self::Handle);
}

/// Renderer for headless hosts: keeps the text of what would be on screen.
#[derive(Debug, Default)]
pub struct TextRenderer {
    lines: Vec<(ToastKey, String)>,
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Visible toasts, oldest first, formatted as `[severity] message (action)`.
    pub fn lines(&self) -> Vec<&str> {
        self.lines.iter().map(|(_, l)| l.as_str()).collect()
    }

    fn format(record: &ToastRecord) -> String {
        match &record.action {
            Some(action) => format!(
                "[{}] {} ({})",
                record.severity.as_str(),
                record.message,
                action.label
            ),
            None => format!("[{}] {}", record.severity.as_str(), record.message),
        }
    }
}

impl ToastRenderer for TextRenderer {
    type Handle = ToastKey;

    fn create(&mut self, key: ToastKey, record: &ToastRecord) -> ToastKey {
        self.lines.push((key, Self::format(record)));
        key
    }

    fn update(&mut self, handle: &ToastKey, record: &ToastRecord) {
        if let Some(line) = self.lines.iter_mut().find(|(k, _)| k == handle) {
            line.1 = Self::format(record);
        }
    }

    fn remove(&mut self, handle: ToastKey) {
        self.lines.retain(|(k, _)| *k != handle);
    }
}
