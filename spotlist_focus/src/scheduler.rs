// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Single-shot timers on a virtual clock.
//!
//! Tasks are scheduled against caller-supplied millisecond timestamps and
//! released by [`Scheduler::take_due`]. Nothing runs on its own: hosts call
//! `take_due` from their frame or timer callback, tests call it after
//! advancing a virtual clock.
//!
//! ```
//! use spotlist_focus::Scheduler;
//!
//! let mut timers = Scheduler::new();
//! let settle = timers.schedule(1_000, 30, "settle");
//! let other = timers.schedule(1_000, 10, "other");
//! assert!(timers.cancel(other));
//!
//! assert!(timers.take_due(1_029).is_empty());
//! assert_eq!(timers.take_due(1_030), vec![(settle, "settle")]);
//! ```

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

/// Handle used to cancel a scheduled task.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskToken(u64);

/// Pending single-shot tasks ordered by due time.
#[derive(Clone, Debug)]
pub struct Scheduler<T> {
    next: u64,
    tasks: BTreeMap<(u64, TaskToken), T>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            next: 0,
            tasks: BTreeMap::new(),
        }
    }
}

impl<T> Scheduler<T> {
    /// An empty scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `task` to fire `delay_ms` after `now_ms`.
    pub fn schedule(&mut self, now_ms: u64, delay_ms: u64, task: T) -> TaskToken {
        let token = TaskToken(self.next);
        self.next += 1;
        self.tasks.insert((now_ms.saturating_add(delay_ms), token), task);
        token
    }

    /// Cancels a task. Returns `false` if it already fired or was cancelled.
    pub fn cancel(&mut self, token: TaskToken) -> bool {
        let key = self.tasks.keys().find(|(_, t)| *t == token).copied();
        key.is_some_and(|key| self.tasks.remove(&key).is_some())
    }

    /// Cancels every task matching `predicate`; returns how many were dropped.
    pub fn cancel_where(&mut self, mut predicate: impl FnMut(&T) -> bool) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|_, task| !predicate(task));
        before - self.tasks.len()
    }

    /// Returns `true` if `token` has neither fired nor been cancelled.
    #[must_use]
    pub fn is_pending(&self, token: TaskToken) -> bool {
        self.tasks.keys().any(|(_, t)| *t == token)
    }

    /// Due time of the earliest pending task.
    #[must_use]
    pub fn next_due(&self) -> Option<u64> {
        self.tasks.keys().next().map(|(due, _)| *due)
    }

    /// Number of pending tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns `true` if nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Removes and returns every task due at or before `now_ms`, earliest
    /// first; ties fire in scheduling order.
    pub fn take_due(&mut self, now_ms: u64) -> Vec<(TaskToken, T)> {
        let mut due = Vec::new();
        while let Some(entry) = self.tasks.first_entry() {
            if entry.key().0 > now_ms {
                break;
            }
            let ((_, token), task) = entry.remove_entry();
            due.push((token, task));
        }
        due
    }
}
