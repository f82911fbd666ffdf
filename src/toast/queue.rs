use std::collections::VecDeque;
use std::fmt;

use log::debug;
use web_time::{Duration, Instant};

use crate::model::config::ToastConfig;
use crate::model::toast::{ToastAction, ToastDuration, ToastRecord};

use super::renderer::ToastRenderer;

/// Identity of one managed toast, stable across in-place updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ToastKey(u64);

impl fmt::Display for ToastKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "toast-{}", self.0)
    }
}

struct Queued {
    key: ToastKey,
    record: ToastRecord,
    created_at: Instant,
}

struct Shown<H> {
    key: ToastKey,
    record: ToastRecord,
    created_at: Instant,
    handle: H,
    /// `None` for persistent toasts.
    deadline: Option<Instant>,
}

/// Read-only view of a managed toast.
#[derive(Debug, Clone, Copy)]
pub struct ToastEntry<'a> {
    pub key: ToastKey,
    pub record: &'a ToastRecord,
    pub created_at: Instant,
    pub visible: bool,
    pub deadline: Option<Instant>,
}

/// Bounded notification engine: a pending list plus a stack of visible
/// toasts, each visible toast with its own dismiss timer.
///
/// Capacity rules:
/// - errors jump to the front of a non-empty pending list
/// - when pending overflows, the oldest non-error entry is dropped; errors
///   are never evicted, so an all-error backlog may exceed the cap
///
/// Action callbacks run while the queue is mutably borrowed and must not
/// call back into it.
pub struct ToastQueue<R: ToastRenderer> {
    renderer: R,
    config: ToastConfig,
    pending: VecDeque<Queued>,
    visible: Vec<Shown<R::Handle>>,
    next_key: u64,
}

impl<R: ToastRenderer> ToastQueue<R> {
    pub fn new(renderer: R, config: ToastConfig) -> Self {
        ToastQueue {
            renderer,
            config,
            pending: VecDeque::new(),
            visible: Vec::new(),
            next_key: 0,
        }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn config(&self) -> &ToastConfig {
        &self.config
    }

    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_empty() && self.pending.is_empty()
    }

    /// Visible toasts (oldest first) followed by pending ones in queue order.
    pub fn entries(&self) -> Vec<ToastEntry<'_>> {
        let shown = self.visible.iter().map(|s| ToastEntry {
            key: s.key,
            record: &s.record,
            created_at: s.created_at,
            visible: true,
            deadline: s.deadline,
        });
        let queued = self.pending.iter().map(|q| ToastEntry {
            key: q.key,
            record: &q.record,
            created_at: q.created_at,
            visible: false,
            deadline: None,
        });
        shown.chain(queued).collect()
    }

    pub fn find_by_id(&self, id: &str) -> Option<ToastEntry<'_>> {
        self.entries()
            .into_iter()
            .find(|e| e.record.id.as_deref() == Some(id))
    }

    /// Earliest dismiss deadline among visible toasts.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.visible.iter().filter_map(|s| s.deadline).min()
    }

    /// Resolve how long a record stays visible. `None` means persistent.
    pub fn resolve_duration(&self, record: &ToastRecord) -> Option<Duration> {
        match record.duration {
            ToastDuration::Fixed(d) => Some(d),
            ToastDuration::Persistent => None,
            ToastDuration::Auto => self
                .config
                .durations
                .for_severity(record.severity)
                .resolve(record.action.is_some()),
        }
    }

    /// Add a toast, or update the live one with the same id.
    ///
    /// The returned key may already be dead: a non-error record arriving
    /// while the pending list is full of errors is the one evicted, so
    /// `dismiss` on its key returns false.
    pub fn enqueue(&mut self, record: ToastRecord, now: Instant) -> ToastKey {
        let key = self.place(record, now);
        self.promote(now);
        key
    }

    /// Enqueue several records, promoting only once they are all placed.
    /// Overflow is therefore resolved against the whole batch.
    pub fn enqueue_batch(
        &mut self,
        records: impl IntoIterator<Item = ToastRecord>,
        now: Instant,
    ) -> Vec<ToastKey> {
        let keys = records
            .into_iter()
            .map(|record| self.place(record, now))
            .collect();
        self.promote(now);
        keys
    }

    /// Success toast with an "Undo" button.
    pub fn undo(&mut self, message: impl Into<String>, callback: impl Fn() + 'static, now: Instant) -> ToastKey {
        let record = ToastRecord::success(message)
            .with_action(ToastAction::new("Undo", callback))
            .with_duration(ToastDuration::Fixed(Duration::from_millis(self.config.undo_ms)));
        self.enqueue(record, now)
    }

    fn place(&mut self, record: ToastRecord, now: Instant) -> ToastKey {
        if let Some(id) = record.id.clone() {
            if let Some(pos) = self
                .visible
                .iter()
                .position(|s| s.record.id.as_deref() == Some(id.as_str()))
            {
                let deadline = self.resolve_duration(&record).map(|d| now + d);
                let shown = &mut self.visible[pos];
                shown.record = record;
                shown.deadline = deadline;
                self.renderer.update(&shown.handle, &shown.record);
                debug!("toast {} updated in place (id={id})", shown.key);
                return shown.key;
            }

            if let Some(pos) = self
                .pending
                .iter()
                .position(|q| q.record.id.as_deref() == Some(id.as_str()))
            {
                let upgraded = record.is_error() && !self.pending[pos].record.is_error();
                self.pending[pos].record = record;
                let key = self.pending[pos].key;
                if upgraded && pos > 0 {
                    if let Some(entry) = self.pending.remove(pos) {
                        self.pending.push_front(entry);
                    }
                }
                debug!("pending toast {key} replaced (id={id})");
                return key;
            }
        }

        let key = ToastKey(self.next_key);
        self.next_key += 1;
        let entry = Queued {
            key,
            record,
            created_at: now,
        };
        if entry.record.is_error() && !self.pending.is_empty() {
            self.pending.push_front(entry);
        } else {
            self.pending.push_back(entry);
        }

        while self.pending.len() > self.config.max_pending {
            match self.pending.iter().position(|q| !q.record.is_error()) {
                Some(idx) => {
                    if let Some(dropped) = self.pending.remove(idx) {
                        debug!("toast {} evicted: {}", dropped.key, dropped.record.message);
                    }
                }
                None => break,
            }
        }
        key
    }

    fn promote(&mut self, now: Instant) {
        while self.visible.len() < self.config.max_visible {
            let Some(next) = self.pending.pop_front() else {
                break;
            };
            let deadline = self.resolve_duration(&next.record).map(|d| now + d);
            let handle = self.renderer.create(next.key, &next.record);
            debug!("toast {} shown: {}", next.key, next.record.message);
            self.visible.push(Shown {
                key: next.key,
                record: next.record,
                created_at: next.created_at,
                handle,
                deadline,
            });
        }
    }

    /// Remove a toast. Safe to call repeatedly; returns false when the key is
    /// no longer managed.
    pub fn dismiss(&mut self, key: ToastKey, now: Instant) -> bool {
        if let Some(pos) = self.visible.iter().position(|s| s.key == key) {
            let shown = self.visible.remove(pos);
            self.renderer.remove(shown.handle);
            debug!("toast {key} dismissed");
            self.promote(now);
            return true;
        }
        if let Some(pos) = self.pending.iter().position(|q| q.key == key) {
            self.pending.remove(pos);
            return true;
        }
        false
    }

    /// The user clicked a toast's action button: dismiss it, then run the
    /// callback. Returns false if the toast is gone or has no action.
    pub fn click_action(&mut self, key: ToastKey, now: Instant) -> bool {
        let action = self
            .visible
            .iter()
            .find(|s| s.key == key)
            .and_then(|s| s.record.action.clone());
        let Some(action) = action else {
            return false;
        };
        self.dismiss(key, now);
        action.invoke();
        true
    }

    /// Dismiss every visible toast whose timer has elapsed.
    pub fn tick(&mut self, now: Instant) -> usize {
        let expired: Vec<ToastKey> = self
            .visible
            .iter()
            .filter(|s| s.deadline.is_some_and(|d| d <= now))
            .map(|s| s.key)
            .collect();
        for key in &expired {
            self.dismiss(*key, now);
        }
        expired.len()
    }

    /// Dismiss all visible toasts and drop everything pending.
    pub fn clear(&mut self) {
        self.pending.clear();
        for shown in self.visible.drain(..) {
            self.renderer.remove(shown.handle);
        }
    }
}
