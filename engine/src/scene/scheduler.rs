//! Scheduler
//!
//! Deterministic delayed events. Time only moves when the owner calls
//! [`Scheduler::advance`], so timed transitions run the same way in tests as
//! in a live frame loop.

/// An event waiting for its due time.
#[derive(Debug, Clone)]
struct Scheduled<E> {
    due: f64,
    seq: u64,
    event: E,
}

/// Queue of events keyed by due time on the owner's clock.
#[derive(Debug, Clone)]
pub struct Scheduler<E> {
    now: f64,
    next_seq: u64,
    pending: Vec<Scheduled<E>>,
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self {
            now: 0.0,
            next_seq: 0,
            pending: Vec::new(),
        }
    }
}

impl<E> Scheduler<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current clock value (seconds).
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Queue `event` to fire `delay` seconds from now.
    pub fn schedule(&mut self, delay: f32, event: E) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Scheduled {
            due: self.now + f64::from(delay.max(0.0)),
            seq,
            event,
        });
    }

    /// Move the clock to `now` and return every due event, earliest first.
    /// Events due at the same time keep their scheduling order.
    pub fn advance(&mut self, now: f64) -> Vec<E> {
        self.now = self.now.max(now);
        let (mut due, pending): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|s| s.due <= self.now);
        self.pending = pending;
        due.sort_by(|a, b| a.due.total_cmp(&b.due).then(a.seq.cmp(&b.seq)));
        due.into_iter().map(|s| s.event).collect()
    }

    /// Drop pending events matching `pred`. Returns how many were removed.
    pub fn cancel_where(&mut self, mut pred: impl FnMut(&E) -> bool) -> usize {
        let before = self.pending.len();
        self.pending.retain(|s| !pred(&s.event));
        before - self.pending.len()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Iterate pending events in no particular order.
    pub fn pending(&self) -> impl Iterator<Item = &E> {
        self.pending.iter().map(|s| &s.event)
    }
}
