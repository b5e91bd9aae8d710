//! Virtual clock and cancellable timers.
//!
//! Every timer belongs to a [`Task`] slot. Scheduling a task cancels whatever
//! was pending in its slot, so at most one timer per slot is ever live.
//! Timers fire in due-time order; ties go to the one scheduled first.

use std::collections::{BTreeMap, HashMap};

/// The logical resources that own timers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Task {
    /// First usage sample after a selection.
    UsageDelay,
    /// Periodic usage samples.
    UsagePoll,
    /// Hiding the suggestion box after blur.
    SuggestionBlur,
    /// Clearing the "copied" indicator.
    CopyFeedback,
}

/// Identifies one scheduled timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TaskHandle {
    id: u64,
    task: Task,
}

impl TaskHandle {
    /// Returns the slot this timer belongs to.
    #[must_use]
    pub const fn task(self) -> Task {
        self.task
    }
}

/// A timer that came due.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fired {
    /// The timer that fired.
    pub handle: TaskHandle,
    /// Virtual time at which it fired.
    pub at_ms: u64,
}

#[derive(Clone, Copy, Debug)]
struct Timer {
    handle: TaskHandle,
    period: Option<u64>,
}

/// Key ordering pending timers: due time, then scheduling sequence.
type Slot = (u64, u64);

/// A single-threaded timer queue over a virtual millisecond clock.
#[derive(Clone, Debug, Default)]
pub struct Scheduler {
    now_ms: u64,
    next_id: u64,
    next_seq: u64,
    queue: BTreeMap<Slot, Timer>,
    slots: HashMap<Task, Slot>,
}

impl Scheduler {
    /// Creates a scheduler at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current virtual time.
    #[must_use]
    pub const fn now(&self) -> u64 {
        self.now_ms
    }

    /// Schedules `task` to fire once after `delay_ms`.
    pub fn schedule(&mut self, task: Task, delay_ms: u64) -> TaskHandle {
        self.insert(task, delay_ms, None)
    }

    /// Schedules `task` to fire after `first_ms`, then every `period_ms`.
    ///
    /// A zero period is treated as one millisecond.
    pub fn schedule_every(&mut self, task: Task, first_ms: u64, period_ms: u64) -> TaskHandle {
        self.insert(task, first_ms, Some(period_ms.max(1)))
    }

    fn insert(&mut self, task: Task, delay_ms: u64, period: Option<u64>) -> TaskHandle {
        self.cancel_task(task);

        let handle = TaskHandle {
            id: self.next_id,
            task,
        };
        self.next_id += 1;

        let slot = self.next_slot(self.now_ms.saturating_add(delay_ms));
        self.queue.insert(slot, Timer { handle, period });
        self.slots.insert(task, slot);
        handle
    }

    fn next_slot(&mut self, due: u64) -> Slot {
        let slot = (due, self.next_seq);
        self.next_seq += 1;
        slot
    }

    /// Cancels a timer. Returns false if it already fired or was replaced.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        if self.handle(handle.task) == Some(handle) {
            self.cancel_task(handle.task)
        } else {
            false
        }
    }

    /// Cancels whatever is pending for `task`.
    pub fn cancel_task(&mut self, task: Task) -> bool {
        match self.slots.remove(&task) {
            Some(slot) => self.queue.remove(&slot).is_some(),
            None => false,
        }
    }

    /// Returns the live timer for `task`.
    #[must_use]
    pub fn handle(&self, task: Task) -> Option<TaskHandle> {
        self.slots
            .get(&task)
            .and_then(|slot| self.queue.get(slot))
            .map(|timer| timer.handle)
    }

    /// Returns true if `task` has a pending timer.
    #[must_use]
    pub fn is_pending(&self, task: Task) -> bool {
        self.slots.contains_key(&task)
    }

    /// Returns the number of pending timers.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Returns when the next timer is due.
    #[must_use]
    pub fn next_due(&self) -> Option<u64> {
        self.queue.keys().next().map(|(due, _)| *due)
    }

    /// Pops the earliest timer due at or before `until_ms`.
    ///
    /// The clock moves to the timer's due time. Periodic timers are re-armed
    /// one period later under the same handle.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<Fired> {
        let (&slot, _) = self.queue.iter().next().filter(|((due, _), _)| *due <= until_ms)?;
        let timer = self.queue.remove(&slot)?;
        let (due, _) = slot;
        let task = timer.handle.task;

        self.now_ms = self.now_ms.max(due);
        self.slots.remove(&task);

        if let Some(period) = timer.period {
            let next = self.next_slot(due.saturating_add(period));
            self.queue.insert(next, timer);
            self.slots.insert(task, next);
        }

        Some(Fired {
            handle: timer.handle,
            at_ms: due,
        })
    }

    /// Moves the clock forward to `target_ms` without firing anything.
    ///
    /// Callers drain [`pop_due`](Self::pop_due) first.
    pub fn advance_to(&mut self, target_ms: u64) {
        self.now_ms = self.now_ms.max(target_ms);
    }

    /// Cancels every pending timer.
    pub fn clear(&mut self) {
        self.queue.clear();
        self.slots.clear();
    }
}
