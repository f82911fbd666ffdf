use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use log::{info, warn};
use web_time::{Duration, Instant};

use crate::gesture::swipe::SwipeActions;
use crate::model::config::SwipeConfig;
use crate::model::toast::{ToastAction, ToastDuration, ToastRecord};
use crate::toast::{ToastQueue, ToastRenderer};

use super::api::{TaskMutations, TaskView};
use super::error::MutationError;
use super::grace::{GraceEvent, GraceKind, GraceScheduler, PendingOp, UndoToken};

/// A task operation that toast buttons and retries can re-issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOp {
    Complete(String),
    Uncomplete(String),
    Delete(String),
    Unschedule(String),
    Restore(String),
}

impl TaskOp {
    fn task_id(&self) -> &str {
        match self {
            TaskOp::Complete(id)
            | TaskOp::Uncomplete(id)
            | TaskOp::Delete(id)
            | TaskOp::Unschedule(id)
            | TaskOp::Restore(id) => id,
        }
    }
}

/// Requests posted by toast buttons, handled on the next `tick`.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Run(TaskOp),
    Refresh,
}

#[derive(Debug, Clone, Default)]
struct CommandInbox(Rc<RefCell<VecDeque<Command>>>);

impl CommandInbox {
    fn push(&self, command: Command) {
        self.0.borrow_mut().push_back(command);
    }

    fn drain(&self) -> Vec<Command> {
        self.0.borrow_mut().drain(..).collect()
    }
}

#[derive(Debug, Clone)]
struct ScheduledRetry {
    op: TaskOp,
    deadline: Instant,
}

/// Coordinates swipe results, server mutations, local view patches and
/// user feedback. Every optimistic change has a rollback.
pub struct TaskActions<A: TaskMutations, V: TaskView, R: ToastRenderer> {
    api: A,
    view: V,
    toasts: ToastQueue<R>,
    grace: GraceScheduler,
    config: SwipeConfig,
    inbox: CommandInbox,
    retries: Vec<ScheduledRetry>,
    refresh: Option<Rc<dyn Fn()>>,
}

impl<A: TaskMutations, V: TaskView, R: ToastRenderer> TaskActions<A, V, R> {
    pub fn new(api: A, view: V, toasts: ToastQueue<R>, config: SwipeConfig) -> Self {
        TaskActions {
            api,
            view,
            toasts,
            grace: GraceScheduler::new(config.grace()),
            config,
            inbox: CommandInbox::default(),
            retries: Vec::new(),
            refresh: None,
        }
    }

    /// Hook behind the "Refresh" button shown when the session expired.
    pub fn with_refresh(mut self, refresh: impl Fn() + 'static) -> Self {
        self.refresh = Some(Rc::new(refresh));
        self
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn api_mut(&mut self) -> &mut A {
        &mut self.api
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn toasts(&self) -> &ToastQueue<R> {
        &self.toasts
    }

    pub fn toasts_mut(&mut self) -> &mut ToastQueue<R> {
        &mut self.toasts
    }

    pub fn grace(&self) -> &GraceScheduler {
        &self.grace
    }

    /// Earliest moment `tick` has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        [
            self.grace.next_deadline(),
            self.retries.iter().map(|r| r.deadline).min(),
            self.toasts.next_deadline(),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    fn ensure_online(&mut self, now: Instant) -> Result<(), MutationError> {
        if self.api.is_online() {
            return Ok(());
        }
        let err = MutationError::NetworkUnavailable;
        self.toasts
            .enqueue(ToastRecord::warning(err.user_message()).with_id("offline"), now);
        Err(err)
    }

    pub fn complete(&mut self, task_id: &str, now: Instant) -> Result<(), MutationError> {
        self.ensure_online(now)?;
        self.view.set_completed(task_id, true);
        match self.api.complete(task_id) {
            Ok(()) => {
                info!("task {task_id} completed");
                let undo = self.run_action("Undo", TaskOp::Uncomplete(task_id.to_string()));
                let shown_for = Duration::from_millis(self.toasts.config().undo_ms);
                self.toasts.enqueue(
                    ToastRecord::success("Task completed")
                        .with_id(task_id)
                        .with_action(undo)
                        .with_duration(ToastDuration::Fixed(shown_for)),
                    now,
                );
                Ok(())
            }
            Err(err) => {
                self.view.set_completed(task_id, false);
                self.report_failure(&err, TaskOp::Complete(task_id.to_string()), now);
                Err(err)
            }
        }
    }

    pub fn uncomplete(&mut self, task_id: &str, now: Instant) -> Result<(), MutationError> {
        self.ensure_online(now)?;
        self.view.set_completed(task_id, false);
        match self.api.uncomplete(task_id) {
            Ok(()) => {
                info!("task {task_id} reopened");
                self.toasts
                    .enqueue(ToastRecord::info("Task reopened").with_id(task_id), now);
                Ok(())
            }
            Err(err) => {
                self.view.set_completed(task_id, true);
                self.report_failure(&err, TaskOp::Uncomplete(task_id.to_string()), now);
                Err(err)
            }
        }
    }

    /// Remove the row now, send `DELETE` after the grace window unless undone.
    pub fn delete(&mut self, task_id: &str, now: Instant) -> Result<UndoToken, MutationError> {
        self.hold_back(task_id, GraceKind::Delete, now)
    }

    /// Pull the calendar card now, clear the schedule after the grace window
    /// unless undone.
    pub fn unschedule(&mut self, task_id: &str, now: Instant) -> Result<UndoToken, MutationError> {
        self.hold_back(task_id, GraceKind::Unschedule, now)
    }

    fn hold_back(
        &mut self,
        task_id: &str,
        kind: GraceKind,
        now: Instant,
    ) -> Result<UndoToken, MutationError> {
        self.ensure_online(now)?;
        if let Some(op) = self.grace.undo(task_id, kind) {
            // Same operation requested twice: restart its window.
            self.restore(&op);
        }
        let surface = kind.surface();
        let position = self.view.position(surface, task_id);
        self.view.detach(surface, task_id);
        let token = self.grace.schedule(task_id, kind, position, now);

        let undo_token = token.clone();
        let message = match kind {
            GraceKind::Delete => "Task deleted",
            GraceKind::Unschedule => "Task unscheduled",
        };
        let record = ToastRecord::success(message)
            .with_id(task_id)
            .with_action(ToastAction::new("Undo", move || {
                undo_token.undo();
            }))
            .with_duration(ToastDuration::Fixed(self.config.grace()));
        self.toasts.enqueue(record, now);
        Ok(token)
    }

    /// Bring back a task whose delete already reached the server. The host
    /// re-renders the row from the server response.
    pub fn restore_deleted(&mut self, task_id: &str, now: Instant) -> Result<(), MutationError> {
        self.ensure_online(now)?;
        match self.api.restore(task_id) {
            Ok(()) => {
                info!("task {task_id} restored");
                self.toasts
                    .enqueue(ToastRecord::success("Task restored").with_id(task_id), now);
                Ok(())
            }
            Err(err) => {
                self.report_failure(&err, TaskOp::Restore(task_id.to_string()), now);
                Err(err)
            }
        }
    }

    /// Undo a held-back operation immediately. False if it already fired.
    pub fn undo(&mut self, task_id: &str, kind: GraceKind, now: Instant) -> bool {
        let Some(op) = self.grace.undo(task_id, kind) else {
            return false;
        };
        self.restore(&op);
        if let Some(key) = self.toasts.find_by_id(task_id).map(|e| e.key) {
            self.toasts.dismiss(key, now);
        }
        true
    }

    fn restore(&mut self, op: &PendingOp) {
        info!("{:?} of {} undone", op.kind, op.task_id);
        if let Some(position) = &op.position {
            self.view.restore(op.kind.surface(), &op.task_id, position);
        }
    }

    /// Advance timers: run posted commands, fire or restore held-back
    /// operations, run due retries, expire toasts.
    pub fn tick(&mut self, now: Instant) {
        for command in self.inbox.drain() {
            match command {
                Command::Run(op) => {
                    self.retries.retain(|r| r.op != op);
                    self.run(op, now);
                }
                Command::Refresh => {
                    if let Some(refresh) = &self.refresh {
                        refresh();
                    }
                }
            }
        }

        for event in self.grace.take_due(now) {
            match event {
                GraceEvent::Undone(op) => self.restore(&op),
                GraceEvent::Fire(op) => self.fire(op, now),
            }
        }

        let (due, later): (Vec<_>, Vec<_>) =
            self.retries.drain(..).partition(|r| r.deadline <= now);
        self.retries = later;
        for retry in due {
            self.run(retry.op, now);
        }

        self.toasts.tick(now);
    }

    fn fire(&mut self, op: PendingOp, now: Instant) {
        let result = match op.kind {
            GraceKind::Delete => self.api.delete(&op.task_id),
            GraceKind::Unschedule => self.api.unschedule(&op.task_id),
        };
        match result {
            Ok(()) => info!("task {} {}", op.task_id, op.kind.past_tense()),
            Err(err) => {
                self.restore(&op);
                let retry = match op.kind {
                    GraceKind::Delete => TaskOp::Delete(op.task_id.clone()),
                    GraceKind::Unschedule => TaskOp::Unschedule(op.task_id.clone()),
                };
                self.report_failure(&err, retry, now);
            }
        }
    }

    fn run(&mut self, op: TaskOp, now: Instant) {
        let result = match &op {
            TaskOp::Complete(id) => self.complete(id, now),
            TaskOp::Uncomplete(id) => self.uncomplete(id, now),
            TaskOp::Delete(id) => self.delete(id, now).map(|_| ()),
            TaskOp::Unschedule(id) => self.unschedule(id, now).map(|_| ()),
            TaskOp::Restore(id) => self.restore_deleted(id, now),
        };
        if let Err(err) = result {
            warn!("retry of {:?} failed: {err}", op);
        }
    }

    fn report_failure(&mut self, err: &MutationError, op: TaskOp, now: Instant) {
        warn!("{:?} failed: {err}", op);
        let id = op.task_id().to_string();
        let record = match err {
            MutationError::NetworkUnavailable => ToastRecord::warning(err.user_message()),
            MutationError::MutationFailed { .. } => {
                ToastRecord::error(err.user_message()).with_action(self.run_action("Retry", op))
            }
            MutationError::ValidationFailed(_) => ToastRecord::error(err.user_message()).persistent(),
            MutationError::SessionExpired => {
                let record = ToastRecord::error(err.user_message()).persistent();
                if self.refresh.is_some() {
                    let inbox = self.inbox.clone();
                    record.with_action(ToastAction::new("Refresh", move || {
                        inbox.push(Command::Refresh)
                    }))
                } else {
                    record
                }
            }
            MutationError::RateLimited { retry_after } => {
                if *retry_after <= self.config.auto_retry_max() {
                    self.retries.retain(|r| r.op != op);
                    self.retries.push(ScheduledRetry {
                        op: op.clone(),
                        deadline: now + *retry_after,
                    });
                    ToastRecord::warning(err.user_message())
                        .with_action(self.run_action("Retry now", op))
                        .with_duration(ToastDuration::Fixed(*retry_after))
                } else {
                    ToastRecord::error("Too many requests. Try again later.")
                        .with_action(self.run_action("Retry", op))
                }
            }
        };
        self.toasts.enqueue(record.with_id(id), now);
    }

    fn run_action(&self, label: &str, op: TaskOp) -> ToastAction {
        let inbox = self.inbox.clone();
        ToastAction::new(label, move || inbox.push(Command::Run(op.clone())))
    }

    /// True while the task's element is detached awaiting `kind`.
    pub fn is_held_back(&self, task_id: &str, kind: GraceKind) -> bool {
        self.grace.is_pending(task_id, kind)
    }
}

impl<A: TaskMutations, V: TaskView, R: ToastRenderer> SwipeActions<String> for TaskActions<A, V, R> {
    fn complete(&mut self, element: &String, now: Instant) {
        let _ = TaskActions::complete(self, element, now);
    }

    fn delete(&mut self, element: &String, now: Instant) {
        let _ = TaskActions::delete(self, element, now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::config::ToastConfig;
    use crate::model::toast::Severity;
    use crate::mutation::api::{ElementPosition, Surface};
    use crate::test_helpers::{FakeMutations, MemoryTaskView, RecordingRenderer};
    use pretty_assertions::assert_eq;

    type Actions = TaskActions<FakeMutations, MemoryTaskView, RecordingRenderer>;

    fn actions() -> Actions {
        let view = MemoryTaskView::with_list("inbox", &["1", "2", "3"]);
        TaskActions::new(
            FakeMutations::default(),
            view,
            ToastQueue::new(RecordingRenderer::default(), ToastConfig::default()),
            SwipeConfig::default(),
        )
    }

    fn at(base: Instant, ms: u64) -> Instant {
        base + Duration::from_millis(ms)
    }

    fn click(a: &mut Actions, task_id: &str, now: Instant) {
        let key = a.toasts().find_by_id(task_id).unwrap().key;
        assert!(a.toasts_mut().click_action(key, now));
    }

    #[test]
    fn delete_fires_after_grace_window() {
        let mut a = actions();
        let base = Instant::now();
        a.delete("2", base).unwrap();
        assert_eq!(a.view().list("inbox"), vec!["1", "3"]);
        a.tick(at(base, 4999));
        assert!(a.api().calls.is_empty());
        a.tick(at(base, 5000));
        assert_eq!(a.api().calls, vec!["delete 2"]);
        assert_eq!(a.view().list("inbox"), vec!["1", "3"]);
    }

    #[test]
    fn undo_click_before_window_restores_exact_position() {
        let mut a = actions();
        let base = Instant::now();
        let before = a.view().position(Surface::List, "2");
        a.delete("2", base).unwrap();
        click(&mut a, "2", at(base, 1000));
        a.tick(at(base, 1000));
        a.tick(at(base, 10_000));
        assert!(a.api().calls.is_empty());
        assert_eq!(a.view().list("inbox"), vec!["1", "2", "3"]);
        assert_eq!(a.view().position(Surface::List, "2"), before);
    }

    #[test]
    fn direct_undo_dismisses_toast() {
        let mut a = actions();
        let base = Instant::now();
        a.delete("1", base).unwrap();
        assert!(a.undo("1", GraceKind::Delete, at(base, 10)));
        assert_eq!(a.view().list("inbox"), vec!["1", "2", "3"]);
        assert!(a.toasts().is_empty());
        assert!(!a.undo("1", GraceKind::Delete, at(base, 20)));
    }

    #[test]
    fn undo_after_fire_is_a_no_op() {
        let mut a = actions();
        let base = Instant::now();
        let token = a.delete("3", base).unwrap();
        a.tick(at(base, 5000));
        assert!(!token.undo());
        assert!(!a.undo("3", GraceKind::Delete, at(base, 5001)));
        assert_eq!(a.view().list("inbox"), vec!["1", "2"]);
    }

    #[test]
    fn failed_delete_restores_and_offers_retry() {
        let mut a = actions();
        a.api_mut().fail_next(MutationError::failed("502 from upstream"));
        let base = Instant::now();
        a.delete("2", base).unwrap();
        a.tick(at(base, 5000));
        assert_eq!(a.view().list("inbox"), vec!["1", "2", "3"]);

        let entry = a.toasts().find_by_id("2").unwrap();
        assert_eq!(entry.record.severity, Severity::Error);
        assert_eq!(entry.record.action.as_ref().unwrap().label, "Retry");

        click(&mut a, "2", at(base, 6000));
        a.tick(at(base, 6000));
        // Retry re-runs the whole delete, grace window included
        assert_eq!(a.view().list("inbox"), vec!["1", "3"]);
        a.tick(at(base, 11_000));
        assert_eq!(a.api().calls, vec!["delete 2", "delete 2"]);
    }

    #[test]
    fn complete_is_optimistic_and_offers_undo() {
        let mut a = actions();
        let base = Instant::now();
        a.complete("1", base).unwrap();
        assert!(a.view().is_completed("1"));
        assert_eq!(a.api().calls, vec!["complete 1"]);

        click(&mut a, "1", at(base, 100));
        a.tick(at(base, 100));
        assert!(!a.view().is_completed("1"));
        assert_eq!(a.api().calls, vec!["complete 1", "uncomplete 1"]);
        assert_eq!(
            a.toasts().find_by_id("1").unwrap().record.message,
            "Task reopened"
        );
    }

    #[test]
    fn failed_complete_rolls_back() {
        let mut a = actions();
        a.api_mut()
            .fail_next(MutationError::from_status(500, "boom", None));
        let base = Instant::now();
        assert!(a.complete("1", base).is_err());
        assert!(!a.view().is_completed("1"));
        let entry = a.toasts().find_by_id("1").unwrap();
        assert_eq!(entry.record.message, "Couldn't save your change.");
    }

    #[test]
    fn offline_short_circuits_before_optimistic_change() {
        let mut a = actions();
        a.api_mut().online = false;
        let base = Instant::now();
        assert_eq!(a.complete("1", base), Err(MutationError::NetworkUnavailable));
        assert!(a.delete("2", base).is_err());
        assert!(!a.view().is_completed("1"));
        assert_eq!(a.view().list("inbox"), vec!["1", "2", "3"]);
        assert!(a.api().calls.is_empty());
        let entry = a.toasts().find_by_id("offline").unwrap();
        assert_eq!(entry.record.severity, Severity::Warning);
        assert!(entry.record.action.is_none());
        assert_eq!(a.toasts().visible_len(), 1);
    }

    #[test]
    fn validation_failure_is_persistent_without_action() {
        let mut a = actions();
        a.api_mut()
            .fail_next(MutationError::ValidationFailed("Task is archived".into()));
        let base = Instant::now();
        let _ = a.complete("1", base);
        let entry = a.toasts().find_by_id("1").unwrap();
        assert_eq!(entry.record.message, "Task is archived");
        assert!(entry.record.action.is_none());
        assert_eq!(entry.deadline, None);
    }

    #[test]
    fn session_expired_offers_refresh() {
        let refreshed = Rc::new(std::cell::Cell::new(false));
        let flag = refreshed.clone();
        let mut a = actions().with_refresh(move || flag.set(true));
        a.api_mut().fail_next(MutationError::SessionExpired);
        let base = Instant::now();
        let _ = a.complete("1", base);
        let entry = a.toasts().find_by_id("1").unwrap();
        assert_eq!(entry.record.action.as_ref().unwrap().label, "Refresh");
        click(&mut a, "1", base);
        a.tick(base);
        assert!(refreshed.get());
    }

    #[test]
    fn short_rate_limit_retries_automatically() {
        let mut a = actions();
        a.api_mut().fail_next(MutationError::RateLimited {
            retry_after: Duration::from_secs(2),
        });
        let base = Instant::now();
        let _ = a.complete("1", base);
        assert!(!a.view().is_completed("1"));
        assert_eq!(
            a.toasts().find_by_id("1").unwrap().record.action.as_ref().unwrap().label,
            "Retry now"
        );
        assert_eq!(a.next_deadline(), Some(at(base, 2000)));
        a.tick(at(base, 2000));
        assert!(a.view().is_completed("1"));
        assert_eq!(a.api().calls, vec!["complete 1", "complete 1"]);
    }

    #[test]
    fn retry_now_cancels_scheduled_retry() {
        let mut a = actions();
        a.api_mut().fail_next(MutationError::RateLimited {
            retry_after: Duration::from_secs(2),
        });
        let base = Instant::now();
        let _ = a.complete("1", base);
        click(&mut a, "1", at(base, 500));
        a.tick(at(base, 500));
        a.tick(at(base, 2500));
        assert_eq!(a.api().calls, vec!["complete 1", "complete 1"]);
    }

    #[test]
    fn restore_after_fired_delete_calls_server() {
        let mut a = actions();
        let base = Instant::now();
        a.delete("2", base).unwrap();
        a.tick(at(base, 5000));
        a.restore_deleted("2", at(base, 6000)).unwrap();
        assert_eq!(a.api().calls, vec!["delete 2", "restore 2"]);
        assert_eq!(
            a.toasts().find_by_id("2").unwrap().record.message,
            "Task restored"
        );
    }

    #[test]
    fn unschedule_detaches_calendar_card() {
        let mut a = actions();
        let base = Instant::now();
        a.unschedule("2", base).unwrap();
        assert_eq!(a.view().calendar(), vec!["1", "3"]);
        assert_eq!(a.view().list("inbox"), vec!["1", "2", "3"]);
        a.tick(at(base, 5000));
        assert_eq!(a.api().calls, vec!["unschedule 2"]);
    }

    #[test]
    fn swipe_actions_route_to_operations() {
        let mut a = actions();
        let base = Instant::now();
        SwipeActions::complete(&mut a, &"1".to_string(), base);
        SwipeActions::delete(&mut a, &"3".to_string(), base);
        assert!(a.view().is_completed("1"));
        assert!(a.is_held_back("3", GraceKind::Delete));
        assert_eq!(
            a.view().position(Surface::List, "3"),
            None::<ElementPosition>
        );
    }
}
