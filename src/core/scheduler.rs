//! Virtual-time task queue.
//!
//! Every timed behavior on the page (boot pacing, the matrix loop, the delayed
//! download redirect, toast expiry) is a task here. The browser front end pumps
//! the clock with real elapsed milliseconds; tests pump it by hand, so a
//! "1000ms later" assertion is exact.
//!
//! Tasks fire in due-time order. Tasks due at the same instant fire in the
//! order they were scheduled. A handler may schedule new tasks while the clock
//! is being advanced; those still fire within the same advance if they fall due
//! before its target.

/// Milliseconds on the scheduler's clock.
pub type Millis = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

#[derive(Debug, Clone, PartialEq)]
pub struct Fired<T> {
    pub id: TaskId,
    pub at: Millis,
    pub payload: T,
}

#[derive(Debug)]
struct Entry<T> {
    id: TaskId,
    due: Millis,
    seq: u64,
    period: Option<Millis>,
    payload: T,
}

#[derive(Debug)]
pub struct Scheduler<T> {
    now: Millis,
    next_id: u64,
    next_seq: u64,
    tasks: Vec<Entry<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now: 0,
            next_id: 1,
            next_seq: 0,
            tasks: Vec::new(),
        }
    }

    pub fn now(&self) -> Millis {
        self.now
    }

    /// Number of live tasks (one-shot and repeating).
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_scheduled(&self, id: TaskId) -> bool {
        self.tasks.iter().any(|t| t.id == id)
    }

    /// Run `payload` once, `delay` ms from now.
    pub fn after(&mut self, delay: Millis, payload: T) -> TaskId {
        self.push(delay, None, payload)
    }

    /// Run `payload` every `period` ms, first firing one period from now.
    /// A zero period is clamped to 1ms so the queue always makes progress.
    pub fn every(&mut self, period: Millis, payload: T) -> TaskId {
        let period = period.max(1);
        self.push(period, Some(period), payload)
    }

    /// Returns false if the task already fired (one-shot) or was cancelled.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        self.tasks.len() != before
    }

    pub fn period_of(&self, id: TaskId) -> Option<Millis> {
        self.tasks.iter().find(|t| t.id == id).and_then(|t| t.period)
    }

    fn push(&mut self, delay: Millis, period: Option<Millis>, payload: T) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        let seq = self.next_seq;
        self.next_seq += 1;
        self.tasks.push(Entry {
            id,
            due: self.now.saturating_add(delay),
            seq,
            period,
            payload,
        });
        id
    }

    fn earliest_due_index(&self, until: Millis) -> Option<usize> {
        self.tasks
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= until)
            .min_by_key(|(_, t)| (t.due, t.seq))
            .map(|(i, _)| i)
    }

    /// Move the clock to `until` without firing anything. Never moves backwards.
    pub fn settle(&mut self, until: Millis) {
        if until > self.now {
            self.now = until;
        }
    }
}

impl<T: Clone> Scheduler<T> {
    /// Pop the next task due at or before `until`, moving the clock to its due
    /// time. Repeating tasks are re-armed one period later.
    pub fn pop_due(&mut self, until: Millis) -> Option<Fired<T>> {
        let idx = self.earliest_due_index(until)?;
        let due = self.tasks[idx].due;
        if due > self.now {
            self.now = due;
        }

        match self.tasks[idx].period {
            Some(period) => {
                let seq = self.next_seq;
                self.next_seq += 1;
                let entry = &mut self.tasks[idx];
                entry.due = due.saturating_add(period);
                entry.seq = seq;
                Some(Fired {
                    id: entry.id,
                    at: due,
                    payload: entry.payload.clone(),
                })
            }
            None => {
                let entry = self.tasks.swap_remove(idx);
                Some(Fired {
                    id: entry.id,
                    at: due,
                    payload: entry.payload,
                })
            }
        }
    }

    /// Fire everything due within the next `by` ms and return it in order.
    /// Handy when the caller has no reentrant scheduling to do.
    pub fn advance(&mut self, by: Millis) -> Vec<Fired<T>> {
        let target = self.now.saturating_add(by);
        let mut out = Vec::new();
        while let Some(f) = self.pop_due(target) {
            out.push(f);
        }
        self.settle(target);
        out
    }
}
