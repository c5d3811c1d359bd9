//! Deterministic millisecond scheduler
//!
//! Replaces browser intervals/timeouts for the tap game. The scheduler is
//! owned by the run it serves, so dropping the run drops every pending task,
//! and tasks fire only when the owner pumps it with elapsed time.

/// Handle to a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u32);

#[derive(Debug, Clone)]
struct Task<T> {
    id: TaskId,
    due: u64,
    /// `None` for one-shot tasks
    period: Option<u64>,
    tag: T,
}

/// Cancellable periodic and one-shot tasks on a virtual millisecond clock
#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    now: u64,
    tasks: Vec<Task<T>>,
    next_id: u32,
}

impl<T: Copy> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now: 0,
            tasks: Vec::new(),
            next_id: 1,
        }
    }

    /// Current virtual time (ms)
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Fire `tag` every `period` ms, first after one full period
    pub fn every(&mut self, period: u64, tag: T) -> TaskId {
        let period = period.max(1);
        self.push(self.now + period, Some(period), tag)
    }

    /// Fire `tag` once after `delay` ms
    pub fn once(&mut self, delay: u64, tag: T) -> TaskId {
        self.push(self.now + delay, None, tag)
    }

    /// Change a periodic task's period; the pending firing keeps its time
    pub fn set_period(&mut self, id: TaskId, period: u64) -> bool {
        match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) if task.period.is_some() => {
                task.period = Some(period.max(1));
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        self.tasks.len() != before
    }

    pub fn cancel_all(&mut self) {
        self.tasks.clear();
    }

    pub fn is_scheduled(&self, id: TaskId) -> bool {
        self.tasks.iter().any(|t| t.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Next task due at or before `until`, in (due time, creation) order.
    ///
    /// Moves the clock to the task's due time. Periodic tasks are re-armed,
    /// one-shot tasks are removed. Call repeatedly, then [`Self::settle`].
    pub fn pop_due(&mut self, until: u64) -> Option<T> {
        let index = self
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= until)
            .min_by_key(|(_, t)| (t.due, t.id))
            .map(|(i, _)| i)?;

        let Task {
            due, period, tag, ..
        } = self.tasks[index];
        self.now = self.now.max(due);
        match period {
            Some(period) => self.tasks[index].due += period,
            None => {
                self.tasks.swap_remove(index);
            }
        }
        Some(tag)
    }

    /// Move the clock to `until` once every due task has been handled
    pub fn settle(&mut self, until: u64) {
        self.now = self.now.max(until);
    }

    fn push(&mut self, due: u64, period: Option<u64>, tag: T) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.tasks.push(Task {
            id,
            due,
            period,
            tag,
        });
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Tag {
        Second,
        Spawn,
        Once,
    }

    fn drain(s: &mut Scheduler<Tag>, until: u64) -> Vec<Tag> {
        let mut fired = Vec::new();
        while let Some(tag) = s.pop_due(until) {
            fired.push(tag);
        }
        s.settle(until);
        fired
    }

    #[test]
    fn test_periodic_and_once_order() {
        let mut s = Scheduler::new();
        s.every(1000, Tag::Second);
        s.every(600, Tag::Spawn);
        s.once(1000, Tag::Once);

        assert!(drain(&mut s, 599).is_empty());
        assert_eq!(drain(&mut s, 1000), vec![Tag::Spawn, Tag::Second, Tag::Once]);
        assert_eq!(drain(&mut s, 2000), vec![Tag::Spawn, Tag::Spawn, Tag::Second]);
        assert_eq!(s.now(), 2000);
    }

    #[test]
    fn test_cancel_stops_firing() {
        let mut s = Scheduler::new();
        let a = s.every(100, Tag::Spawn);
        let b = s.once(150, Tag::Once);
        assert!(s.cancel(b));
        assert!(!s.cancel(b));
        assert_eq!(drain(&mut s, 200), vec![Tag::Spawn, Tag::Spawn]);

        s.cancel_all();
        assert!(!s.is_scheduled(a));
        assert!(s.is_empty());
        assert!(drain(&mut s, 10_000).is_empty());
    }

    #[test]
    fn test_set_period_applies_after_next_firing() {
        let mut s = Scheduler::new();
        let id = s.every(600, Tag::Spawn);
        assert!(s.set_period(id, 200));
        assert_eq!(drain(&mut s, 600), vec![Tag::Spawn]);
        assert_eq!(drain(&mut s, 1000), vec![Tag::Spawn, Tag::Spawn]);

        let once = s.once(10, Tag::Once);
        assert!(!s.set_period(once, 5));
    }

    #[test]
    fn test_new_tasks_count_from_current_time() {
        let mut s = Scheduler::new();
        s.settle(5000);
        s.once(100, Tag::Once);
        assert!(drain(&mut s, 5099).is_empty());
        assert_eq!(drain(&mut s, 5100), vec![Tag::Once]);
    }
}
