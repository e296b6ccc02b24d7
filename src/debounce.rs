//! Debounced scheduling at the boundary of the editing core
//!
//! The core is synchronous and timer-free. Front-ends that want to coalesce
//! rapid edits before committing history, autosaving or re-rendering use a
//! [`Debouncer`]: each `schedule` supersedes the pending task of the same kind
//! and hands back a token that can cancel it. Time is passed in explicitly.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// Work a front-end defers until edits settle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundaryTask {
    HistoryCommit,
    Autosave,
    Preview,
}

/// Per-task delays in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebounceConfig {
    #[serde(default = "default_autosave_ms")]
    pub autosave_ms: u64,
    #[serde(default = "default_history_ms")]
    pub history_ms: u64,
    #[serde(default = "default_preview_ms")]
    pub preview_ms: u64,
}

fn default_autosave_ms() -> u64 {
    1000
}

fn default_history_ms() -> u64 {
    3000
}

fn default_preview_ms() -> u64 {
    300
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            autosave_ms: default_autosave_ms(),
            history_ms: default_history_ms(),
            preview_ms: default_preview_ms(),
        }
    }
}

impl DebounceConfig {
    pub fn delay(&self, task: BoundaryTask) -> Duration {
        Duration::from_millis(match task {
            BoundaryTask::HistoryCommit => self.history_ms,
            BoundaryTask::Autosave => self.autosave_ms,
            BoundaryTask::Preview => self.preview_ms,
        })
    }
}

/// Handle to one scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskToken(u64);

#[derive(Debug, Clone, Copy)]
struct Pending {
    token: TaskToken,
    deadline: Instant,
}

/// Coalesces repeated schedules of the same task kind
#[derive(Debug, Clone)]
pub struct Debouncer<K> {
    pending: HashMap<K, Pending>,
    next_token: u64,
}

impl<K> Default for Debouncer<K> {
    fn default() -> Self {
        Self {
            pending: HashMap::new(),
            next_token: 0,
        }
    }
}

impl<K: Eq + Hash + Copy> Debouncer<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `task` to fire `delay` after `now`, superseding any pending one
    pub fn schedule(&mut self, task: K, now: Instant, delay: Duration) -> TaskToken {
        let token = TaskToken(self.next_token);
        self.next_token += 1;
        self.pending.insert(
            task,
            Pending {
                token,
                deadline: now + delay,
            },
        );
        token
    }

    /// Cancel a scheduled task; false if it already fired or was superseded
    pub fn cancel(&mut self, token: TaskToken) -> bool {
        let before = self.pending.len();
        self.pending.retain(|_, pending| pending.token != token);
        self.pending.len() != before
    }

    /// Remove and return every task whose deadline has passed
    pub fn take_due(&mut self, now: Instant) -> Vec<K> {
        let due: Vec<K> = self
            .pending
            .iter()
            .filter(|(_, pending)| pending.deadline <= now)
            .map(|(task, _)| *task)
            .collect();

        for task in &due {
            self.pending.remove(task);
        }
        due
    }

    /// Earliest pending deadline, for sleeping until work is due
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.values().map(|p| p.deadline).min()
    }

    pub fn is_pending(&self, task: K) -> bool {
        self.pending.contains_key(&task)
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }
}

impl Debouncer<BoundaryTask> {
    /// Record an edit: restart every boundary timer
    pub fn on_edit(&mut self, now: Instant, config: &DebounceConfig) {
        for task in [
            BoundaryTask::Preview,
            BoundaryTask::Autosave,
            BoundaryTask::HistoryCommit,
        ] {
            self.schedule(task, now, config.delay(task));
        }
    }
}
