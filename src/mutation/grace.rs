use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use log::debug;
use web_time::{Duration, Instant};

use super::api::{ElementPosition, Surface};

const PENDING: u8 = 0;
const UNDONE: u8 = 1;
const FIRED: u8 = 2;

/// One-shot race between "undo" and "fire". Whichever claims the token first
/// wins; the loser's claim returns false. Atomic so the guarantee holds even
/// if a host drives timers from another thread.
#[derive(Debug, Clone, Default)]
pub struct UndoToken(Arc<AtomicU8>);

impl UndoToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel the delayed operation. False if it already fired (or was
    /// already undone).
    pub fn undo(&self) -> bool {
        self.transition(UNDONE)
    }

    /// Claim the right to run the delayed operation. False if undone first.
    pub fn claim_fire(&self) -> bool {
        self.transition(FIRED)
    }

    pub fn is_undone(&self) -> bool {
        self.0.load(Ordering::Acquire) == UNDONE
    }

    pub fn is_fired(&self) -> bool {
        self.0.load(Ordering::Acquire) == FIRED
    }

    fn transition(&self, to: u8) -> bool {
        self.0
            .compare_exchange(PENDING, to, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

/// A destructive operation held back for the grace window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraceKind {
    Delete,
    Unschedule,
}

impl GraceKind {
    /// The representation that leaves the screen while the operation waits.
    pub fn surface(&self) -> Surface {
        match self {
            GraceKind::Delete => Surface::List,
            GraceKind::Unschedule => Surface::Calendar,
        }
    }

    pub fn past_tense(&self) -> &'static str {
        match self {
            GraceKind::Delete => "deleted",
            GraceKind::Unschedule => "unscheduled",
        }
    }
}

#[derive(Debug, Clone)]
pub struct PendingOp {
    pub task_id: String,
    pub kind: GraceKind,
    /// `None` when the element was not on screen at schedule time.
    pub position: Option<ElementPosition>,
    pub deadline: Instant,
    pub token: UndoToken,
}

#[derive(Debug, Clone)]
pub enum GraceEvent {
    /// Grace window elapsed; the caller must now issue the request.
    Fire(PendingOp),
    /// Undo won; the caller must restore the element.
    Undone(PendingOp),
}

/// Delayed destructive operations, each cancellable until its deadline.
#[derive(Debug)]
pub struct GraceScheduler {
    grace: Duration,
    pending: Vec<PendingOp>,
}

impl GraceScheduler {
    pub fn new(grace: Duration) -> Self {
        GraceScheduler {
            grace,
            pending: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn is_pending(&self, task_id: &str, kind: GraceKind) -> bool {
        self.pending
            .iter()
            .any(|op| op.task_id == task_id && op.kind == kind)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.iter().map(|op| op.deadline).min()
    }

    pub fn schedule(
        &mut self,
        task_id: &str,
        kind: GraceKind,
        position: Option<ElementPosition>,
        now: Instant,
    ) -> UndoToken {
        let token = UndoToken::new();
        debug!("{kind:?} of {task_id} scheduled in {:?}", self.grace);
        self.pending.push(PendingOp {
            task_id: task_id.to_string(),
            kind,
            position,
            deadline: now + self.grace,
            token: token.clone(),
        });
        token
    }

    /// Undo directly. Returns the operation if undo won the race.
    pub fn undo(&mut self, task_id: &str, kind: GraceKind) -> Option<PendingOp> {
        let idx = self
            .pending
            .iter()
            .position(|op| op.task_id == task_id && op.kind == kind)?;
        if !self.pending[idx].token.undo() && !self.pending[idx].token.is_undone() {
            return None;
        }
        Some(self.pending.remove(idx))
    }

    /// Drain everything that resolved: undone tokens, and operations whose
    /// deadline passed (claimed for firing).
    pub fn take_due(&mut self, now: Instant) -> Vec<GraceEvent> {
        let mut events = Vec::new();
        let mut kept = Vec::with_capacity(self.pending.len());
        for op in self.pending.drain(..) {
            if op.token.is_undone() {
                events.push(GraceEvent::Undone(op));
            } else if op.deadline <= now && op.token.claim_fire() {
                events.push(GraceEvent::Fire(op));
            } else if op.token.is_undone() {
                // Lost the claim to an undo that landed in between
                events.push(GraceEvent::Undone(op));
            } else {
                kept.push(op);
            }
        }
        self.pending = kept;
        events
    }
}
