use foundation::math::stable_total_cmp_f64;
use foundation::time::Time;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

#[derive(Debug)]
struct Pending<T> {
    id: TimerId,
    due: Time,
    payload: T,
}

/// Deferred callbacks for the single-threaded event loop.
///
/// Nothing runs on its own: the owner calls [`TimerQueue::take_due`] once per
/// frame and handles whatever came due.
///
/// Ordering contract: due payloads are returned by `(due time, insertion
/// order)`, so two timers due at the same instant fire in the order they were
/// scheduled.
#[derive(Debug)]
pub struct TimerQueue<T> {
    next_id: u64,
    pending: Vec<Pending<T>>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            pending: Vec::new(),
        }
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due: Time, payload: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.pending.push(Pending { id, due, payload });
        id
    }

    /// Drops a timer before it fires. Returns `false` if it already fired or
    /// never existed.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.id != id);
        self.pending.len() != before
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn next_due(&self) -> Option<Time> {
        self.pending
            .iter()
            .map(|p| p.due)
            .min_by(|a, b| stable_total_cmp_f64(a.0, b.0))
    }

    /// Removes and returns every payload due at or before `now`.
    pub fn take_due(&mut self, now: Time) -> Vec<T> {
        let (mut due, rest): (Vec<Pending<T>>, Vec<Pending<T>>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|p| p.due.0 <= now.0);
        self.pending = rest;

        due.sort_by(|a, b| stable_total_cmp_f64(a.due.0, b.due.0).then_with(|| a.id.cmp(&b.id)));
        due.into_iter().map(|p| p.payload).collect()
    }
}
