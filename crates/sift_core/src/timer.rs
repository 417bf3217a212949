//! Cancellable timers and debouncing
//!
//! The UI thread owns a [`TimerQueue`]. Components schedule deferred
//! callbacks on it and the host fires whatever is due each time it pumps
//! its event loop. Time is always passed in, never read from the clock,
//! so behavior is deterministic under test.
//!
//! [`Debouncer`] builds last-write-wins deferral on top: every call cancels
//! the previous outstanding timer before scheduling a new one.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::{Duration, Instant};

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Handle to a scheduled timer
    pub struct TimerId;
}

type TimerCallback = Box<dyn FnOnce()>;

struct Timer {
    deadline: Instant,
    /// Insertion order, used to break deadline ties
    seq: u64,
    callback: TimerCallback,
}

/// Single-threaded queue of deferred callbacks
#[derive(Default)]
pub struct TimerQueue {
    timers: SlotMap<TimerId, Timer>,
    next_seq: u64,
}

/// Timer queue shared between the host and the components it mounts
pub type SharedTimerQueue = Rc<RefCell<TimerQueue>>;

impl TimerQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty queue behind a shared handle
    pub fn shared() -> SharedTimerQueue {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Schedule `callback` to run once `delay` has elapsed after `now`
    pub fn schedule<F>(&mut self, now: Instant, delay: Duration, callback: F) -> TimerId
    where
        F: FnOnce() + 'static,
    {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.timers.insert(Timer {
            deadline: now + delay,
            seq,
            callback: Box::new(callback),
        })
    }

    /// Cancel a pending timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.timers.remove(id).is_some()
    }

    /// Check whether a timer is still waiting to fire
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timers.contains_key(id)
    }

    /// Number of timers waiting to fire
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    /// Returns true if nothing is scheduled
    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Earliest deadline among pending timers
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.values().map(|t| t.deadline).min()
    }

    /// Remove every timer whose deadline is at or before `now`
    ///
    /// Returned callbacks are ordered by deadline, then by scheduling order.
    pub fn take_due(&mut self, now: Instant) -> Vec<Box<dyn FnOnce()>> {
        let due_ids: Vec<TimerId> = self
            .timers
            .iter()
            .filter(|(_, t)| t.deadline <= now)
            .map(|(id, _)| id)
            .collect();

        let mut due: Vec<Timer> = due_ids
            .into_iter()
            .filter_map(|id| self.timers.remove(id))
            .collect();
        due.sort_by_key(|t| (t.deadline, t.seq));
        due.into_iter().map(|t| t.callback).collect()
    }
}

/// Fire every due timer on a shared queue
///
/// Callbacks run after the queue borrow is released, so they may schedule
/// or cancel timers themselves. Returns the number of callbacks run.
pub fn fire_due(queue: &SharedTimerQueue, now: Instant) -> usize {
    let due = queue.borrow_mut().take_due(now);
    let count = due.len();
    for callback in due {
        callback();
    }
    if count > 0 {
        tracing::trace!(fired = count, "timers fired");
    }
    count
}

/// Last-write-wins deferral of a callback
///
/// At most one timer is outstanding. A new call supersedes the previous
/// one before it can fire.
pub struct Debouncer {
    queue: SharedTimerQueue,
    delay: Duration,
    pending: Rc<Cell<Option<TimerId>>>,
}

impl Debouncer {
    /// Create a debouncer scheduling on `queue` with the given quiet period
    pub fn new(queue: SharedTimerQueue, delay: Duration) -> Self {
        Self {
            queue,
            delay,
            pending: Rc::new(Cell::new(None)),
        }
    }

    /// The quiet period
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Defer `f`, cancelling any call still waiting
    pub fn call<F>(&self, now: Instant, f: F)
    where
        F: FnOnce() + 'static,
    {
        let mut queue = self.queue.borrow_mut();
        if let Some(previous) = self.pending.take() {
            queue.cancel(previous);
        }

        let pending = Rc::clone(&self.pending);
        let id = queue.schedule(now, self.delay, move || {
            pending.set(None);
            f();
        });
        self.pending.set(Some(id));
    }

    /// Cancel the outstanding call, if any. Returns true if one was cancelled.
    pub fn cancel(&self) -> bool {
        match self.pending.take() {
            Some(id) => self.queue.borrow_mut().cancel(id),
            None => false,
        }
    }

    /// Returns true if a call is waiting to fire
    pub fn is_pending(&self) -> bool {
        match self.pending.get() {
            Some(id) => self.queue.borrow().is_pending(id),
            None => false,
        }
    }
}
