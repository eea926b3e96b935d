//! Deferred one-shot callbacks against the shared tick clock
//!
//! Used for fruit regrowth and for starting leaf sway after a random delay.
//! Tasks fire on the first advance whose cumulative time reaches their
//! deadline, at most once, in (deadline, scheduling order).

use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Identifier handed out for every scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

type Callback = Box<dyn FnOnce()>;

struct ScheduledTask {
    deadline: f64,
    id: TaskId,
    callback: Callback,
}

impl PartialEq for ScheduledTask {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ScheduledTask {}

impl PartialOrd for ScheduledTask {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledTask {
    // BinaryHeap is a max-heap: invert so the earliest (deadline, id) is on top
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .deadline
            .total_cmp(&self.deadline)
            .then_with(|| other.id.cmp(&self.id))
    }
}

/// Min-heap of `(deadline, callback)` polled once per tick
pub struct TaskScheduler {
    /// Cumulative clock time in seconds
    now: f64,
    next_id: u64,
    queue: BinaryHeap<ScheduledTask>,
    fired: u64,
}

impl Default for TaskScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskScheduler {
    pub fn new() -> Self {
        Self {
            now: 0.0,
            next_id: 0,
            queue: BinaryHeap::with_capacity(64),
            fired: 0,
        }
    }

    /// Current clock time in seconds
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Number of tasks waiting to fire
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Total number of tasks fired so far
    pub fn fired(&self) -> u64 {
        self.fired
    }

    /// Schedule `callback` to run `delay` seconds from now
    pub fn schedule_after<F>(&mut self, delay: f32, callback: F) -> TaskId
    where
        F: FnOnce() + 'static,
    {
        debug_assert!(delay >= 0.0, "negative delay {delay}");
        self.schedule_at(self.now + delay.max(0.0) as f64, callback)
    }

    /// Schedule `callback` to run once the clock reaches `deadline`
    pub fn schedule_at<F>(&mut self, deadline: f64, callback: F) -> TaskId
    where
        F: FnOnce() + 'static,
    {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.queue.push(ScheduledTask {
            deadline,
            id,
            callback: Box::new(callback),
        });
        id
    }

    /// Advance the clock by `dt` seconds and run every task that became due.
    ///
    /// Returns the number of tasks fired.
    pub fn advance(&mut self, dt: f32) -> usize {
        self.advance_to(self.now + dt.max(0.0) as f64)
    }

    /// Move the clock to absolute time `time` and run every due task.
    ///
    /// The clock never runs backwards; an earlier `time` only polls.
    pub fn advance_to(&mut self, time: f64) -> usize {
        self.now = self.now.max(time);

        let mut count = 0;
        while self
            .queue
            .peek()
            .is_some_and(|task| task.deadline <= self.now)
        {
            if let Some(task) = self.queue.pop() {
                log::trace!("firing task {:?} (deadline {:.3}s)", task.id, task.deadline);
                (task.callback)();
                count += 1;
            }
        }

        self.fired += count as u64;
        count
    }
}

impl std::fmt::Debug for TaskScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskScheduler")
            .field("now", &self.now)
            .field("pending", &self.queue.len())
            .field("fired", &self.fired)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_fires_at_deadline_not_before() {
        let mut scheduler = TaskScheduler::new();
        let fired = Rc::new(RefCell::new(0));

        let counter = fired.clone();
        scheduler.schedule_after(30.0, move || *counter.borrow_mut() += 1);

        scheduler.advance_to(29.99);
        assert_eq!(*fired.borrow(), 0);
        assert_eq!(scheduler.pending(), 1);

        scheduler.advance_to(30.0);
        assert_eq!(*fired.borrow(), 1);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_fires_at_most_once() {
        let mut scheduler = TaskScheduler::new();
        let fired = Rc::new(RefCell::new(0));

        let counter = fired.clone();
        scheduler.schedule_after(1.0, move || *counter.borrow_mut() += 1);

        for _ in 0..10 {
            scheduler.advance(0.5);
        }
        assert_eq!(*fired.borrow(), 1);
        assert_eq!(scheduler.fired(), 1);
    }

    #[test]
    fn test_order_by_deadline_then_schedule_order() {
        let mut scheduler = TaskScheduler::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        for (name, delay) in [("c", 2.0), ("a", 1.0), ("b", 1.0), ("d", 3.0)] {
            let log = log.clone();
            scheduler.schedule_after(delay, move || log.borrow_mut().push(name));
        }

        let fired = scheduler.advance(2.5);
        assert_eq!(fired, 3);
        assert_eq!(*log.borrow(), vec!["a", "b", "c"]);

        scheduler.advance(1.0);
        assert_eq!(*log.borrow(), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_clock_accumulates() {
        let mut scheduler = TaskScheduler::new();
        scheduler.advance(0.25);
        scheduler.advance(0.25);
        assert_eq!(scheduler.now(), 0.5);

        // Deadlines are relative to the current clock
        let hit = Rc::new(RefCell::new(false));
        let flag = hit.clone();
        scheduler.schedule_after(1.0, move || *flag.borrow_mut() = true);
        scheduler.advance(0.75);
        assert!(!*hit.borrow());
        scheduler.advance(0.25);
        assert!(*hit.borrow());
    }

    #[test]
    fn test_clock_never_rewinds() {
        let mut scheduler = TaskScheduler::new();
        scheduler.advance_to(5.0);
        scheduler.advance_to(1.0);
        assert_eq!(scheduler.now(), 5.0);
    }

    #[test]
    fn test_zero_delay_fires_on_next_poll() {
        let mut scheduler = TaskScheduler::new();
        let hit = Rc::new(RefCell::new(false));
        let flag = hit.clone();
        scheduler.schedule_after(0.0, move || *flag.borrow_mut() = true);
        assert_eq!(scheduler.advance(0.0), 1);
        assert!(*hit.borrow());
    }
}
