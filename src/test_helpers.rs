use std::cell::RefCell;
use std::collections::{HashSet, VecDeque};

use crate::haptics::{HapticPattern, Haptics};
use crate::model::toast::ToastRecord;
use crate::mutation::{ElementPosition, MutationError, Surface, TaskMutations, TaskView};
use crate::sheet::{Confirm, History};
use crate::toast::{ToastKey, ToastRenderer};

#[derive(Debug, Default)]
pub struct RecordingHaptics {
    patterns: RefCell<Vec<HapticPattern>>,
}

impl RecordingHaptics {
    pub fn patterns(&self) -> Vec<HapticPattern> {
        self.patterns.borrow().clone()
    }
}

impl Haptics for RecordingHaptics {
    fn trigger(&self, pattern: HapticPattern) {
        self.patterns.borrow_mut().push(pattern);
    }
}

/// Counts renderer calls.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub created: usize,
    pub updated: usize,
    pub removed: usize,
}

impl ToastRenderer for RecordingRenderer {
    type Handle = ToastKey;

    fn create(&mut self, key: ToastKey, _record: &ToastRecord) -> ToastKey {
        self.created += 1;
        key
    }

    fn update(&mut self, _handle: &ToastKey, _record: &ToastRecord) {
        self.updated += 1;
    }

    fn remove(&mut self, _handle: ToastKey) {
        self.removed += 1;
    }
}

/// Browser history as a stack of URLs with a cursor.
#[derive(Debug)]
pub struct MemoryHistory {
    entries: Vec<String>,
    cursor: usize,
}

impl MemoryHistory {
    pub fn at(url: &str) -> Self {
        MemoryHistory {
            entries: vec![url.to_string()],
            cursor: 0,
        }
    }

    pub fn entries(&self) -> Vec<&str> {
        self.entries.iter().map(|s| s.as_str()).collect()
    }
}

impl History for MemoryHistory {
    fn current_url(&self) -> String {
        self.entries[self.cursor].clone()
    }

    fn push(&mut self, url: &str) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(url.to_string());
        self.cursor = self.entries.len() - 1;
    }

    fn replace(&mut self, url: &str) {
        self.entries[self.cursor] = url.to_string();
    }

    fn back(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }
}

/// Answers prompts from a script; an unscripted prompt fails the test.
#[derive(Debug)]
pub struct ScriptedConfirm {
    answers: VecDeque<bool>,
    pub asked: usize,
}

impl ScriptedConfirm {
    pub fn new(answers: Vec<bool>) -> Self {
        ScriptedConfirm {
            answers: answers.into(),
            asked: 0,
        }
    }
}

impl Confirm for ScriptedConfirm {
    fn confirm(&mut self, message: &str) -> bool {
        self.asked += 1;
        self.answers
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected prompt: {message}"))
    }
}

/// One list container plus the calendar, as ordered id lists.
#[derive(Debug, Default)]
pub struct MemoryTaskView {
    list_parent: String,
    list: Vec<String>,
    calendar: Vec<String>,
    completed: HashSet<String>,
}

impl MemoryTaskView {
    pub fn with_list(parent: &str, ids: &[&str]) -> Self {
        let ids: Vec<String> = ids.iter().map(|s| s.to_string()).collect();
        MemoryTaskView {
            list_parent: parent.to_string(),
            list: ids.clone(),
            calendar: ids,
            completed: HashSet::new(),
        }
    }

    pub fn list(&self, parent: &str) -> Vec<&str> {
        assert_eq!(parent, self.list_parent);
        self.list.iter().map(|s| s.as_str()).collect()
    }

    pub fn calendar(&self) -> Vec<&str> {
        self.calendar.iter().map(|s| s.as_str()).collect()
    }

    pub fn is_completed(&self, task_id: &str) -> bool {
        self.completed.contains(task_id)
    }

    fn container(&self, surface: Surface) -> (&str, &Vec<String>) {
        match surface {
            Surface::List => (self.list_parent.as_str(), &self.list),
            Surface::Calendar => ("calendar", &self.calendar),
        }
    }

    fn container_mut(&mut self, surface: Surface) -> &mut Vec<String> {
        match surface {
            Surface::List => &mut self.list,
            Surface::Calendar => &mut self.calendar,
        }
    }
}

impl TaskView for MemoryTaskView {
    fn position(&self, surface: Surface, task_id: &str) -> Option<ElementPosition> {
        let (parent, ids) = self.container(surface);
        let idx = ids.iter().position(|id| id == task_id)?;
        Some(ElementPosition {
            parent: parent.to_string(),
            previous_sibling: idx.checked_sub(1).map(|i| ids[i].clone()),
            next_sibling: ids.get(idx + 1).cloned(),
        })
    }

    fn detach(&mut self, surface: Surface, task_id: &str) {
        self.container_mut(surface).retain(|id| id != task_id);
    }

    fn restore(&mut self, surface: Surface, task_id: &str, position: &ElementPosition) {
        let ids = self.container_mut(surface);
        let after_prev = position
            .previous_sibling
            .as_ref()
            .and_then(|p| ids.iter().position(|id| id == p))
            .map(|i| i + 1);
        let before_next = position
            .next_sibling
            .as_ref()
            .and_then(|n| ids.iter().position(|id| id == n));
        let idx = after_prev.or(before_next).unwrap_or(ids.len());
        ids.insert(idx, task_id.to_string());
    }

    fn set_completed(&mut self, task_id: &str, completed: bool) {
        if completed {
            self.completed.insert(task_id.to_string());
        } else {
            self.completed.remove(task_id);
        }
    }
}

/// Records each request as "<op> <id>" and fails on demand.
#[derive(Debug)]
pub struct FakeMutations {
    pub online: bool,
    pub calls: Vec<String>,
    failures: VecDeque<MutationError>,
}

impl Default for FakeMutations {
    fn default() -> Self {
        FakeMutations {
            online: true,
            calls: Vec::new(),
            failures: VecDeque::new(),
        }
    }
}

impl FakeMutations {
    pub fn fail_next(&mut self, err: MutationError) {
        self.failures.push_back(err);
    }

    fn record(&mut self, op: &str, task_id: &str) -> Result<(), MutationError> {
        self.calls.push(format!("{op} {task_id}"));
        match self.failures.pop_front() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl TaskMutations for FakeMutations {
    fn is_online(&self) -> bool {
        self.online
    }

    fn complete(&mut self, task_id: &str) -> Result<(), MutationError> {
        self.record("complete", task_id)
    }

    fn uncomplete(&mut self, task_id: &str) -> Result<(), MutationError> {
        self.record("uncomplete", task_id)
    }

    fn delete(&mut self, task_id: &str) -> Result<(), MutationError> {
        self.record("delete", task_id)
    }

    fn restore(&mut self, task_id: &str) -> Result<(), MutationError> {
        self.record("restore", task_id)
    }

    fn unschedule(&mut self, task_id: &str) -> Result<(), MutationError> {
        self.record("unschedule", task_id)
    }
}
