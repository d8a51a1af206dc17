//! One-shot timers on the virtual clock
//!
//! Escape timeouts and animation completions share one queue so every
//! callback fires in a single global order: by due time, then by the order
//! it was scheduled.

use std::collections::BTreeMap;

use super::duck::{DuckId, Motion};

/// Handle to a scheduled timer. Ordering is `(due_ms, seq)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerHandle {
    due_ms: u64,
    seq: u64,
}

impl TimerHandle {
    pub fn due_ms(&self) -> u64 {
        self.due_ms
    }
}

/// What to do when a timer fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// The duck ran out of time and tries to fly away
    Escape(DuckId),
    /// The duck's current animation reached its destination
    MotionDone(DuckId, Motion),
}

/// Cancellable timer queue
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    queue: BTreeMap<TimerHandle, TimerEvent>,
    next_seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a timer firing at `due_ms`
    pub fn schedule(&mut self, due_ms: u64, event: TimerEvent) -> TimerHandle {
        let handle = TimerHandle {
            due_ms,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.queue.insert(handle, event);
        handle
    }

    /// Disarm a timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        self.queue.remove(&handle).is_some()
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.queue.contains_key(&handle)
    }

    /// Pop the earliest timer due at or before `now_ms`
    pub fn pop_due(&mut self, now_ms: u64) -> Option<(u64, TimerEvent)> {
        let (handle, _) = self.queue.first_key_value()?;
        if handle.due_ms > now_ms {
            return None;
        }
        self.queue
            .pop_first()
            .map(|(handle, event)| (handle.due_ms, event))
    }

    /// Due time of the earliest pending timer
    pub fn next_due(&self) -> Option<u64> {
        self.queue.first_key_value().map(|(h, _)| h.due_ms)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_in_due_then_schedule_order() {
        let mut s = Scheduler::new();
        s.schedule(200, TimerEvent::Escape(DuckId(1)));
        s.schedule(100, TimerEvent::Escape(DuckId(2)));
        s.schedule(100, TimerEvent::Escape(DuckId(3)));

        assert_eq!(s.pop_due(50), None);
        assert_eq!(s.pop_due(150), Some((100, TimerEvent::Escape(DuckId(2)))));
        assert_eq!(s.pop_due(150), Some((100, TimerEvent::Escape(DuckId(3)))));
        assert_eq!(s.pop_due(150), None);
        assert_eq!(s.next_due(), Some(200));
        assert_eq!(s.pop_due(200), Some((200, TimerEvent::Escape(DuckId(1)))));
        assert!(s.is_empty());
    }

    #[test]
    fn test_cancel_is_one_shot() {
        let mut s = Scheduler::new();
        let h = s.schedule(10, TimerEvent::MotionDone(DuckId(1), Motion::Fall));
        assert!(s.is_pending(h));
        assert!(s.cancel(h));
        assert!(!s.cancel(h));
        assert!(!s.is_pending(h));
        assert_eq!(s.pop_due(1_000), None);
    }

    #[test]
    fn test_fired_timer_cannot_be_cancelled() {
        let mut s = Scheduler::new();
        let h = s.schedule(10, TimerEvent::Escape(DuckId(1)));
        assert!(s.pop_due(10).is_some());
        assert!(!s.cancel(h));
    }
}
