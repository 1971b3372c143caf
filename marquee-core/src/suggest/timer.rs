//! Single-slot timers.
//!
//! A slot holds at most one pending deadline. Arming replaces whatever was
//! pending, so a superseded deadline can never fire.

use std::time::Duration;

use tokio::time::Instant;

/// Cancel-and-replace timer holding one pending deadline and its payload.
#[derive(Debug, Clone)]
pub struct TimerSlot<T> {
    pending: Option<(Instant, T)>,
}

impl<T> Default for TimerSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerSlot<T> {
    /// Creates an empty slot.
    pub fn new() -> Self {
        Self { pending: None }
    }

    /// Arms the slot to fire `delay` after `now`, returning the payload it displaced.
    pub fn arm(&mut self, now: Instant, delay: Duration, payload: T) -> Option<T> {
        self.pending
            .replace((now + delay, payload))
            .map(|(_, previous)| previous)
    }

    /// Cancels the pending deadline, returning its payload.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(_, payload)| payload)
    }

    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(deadline, _)| *deadline)
    }

    /// Takes the payload if its deadline has passed at `now`.
    pub fn take_due(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((deadline, _)) if *deadline <= now => self.cancel(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arm_replaces_pending_payload() {
        let now = Instant::now();
        let mut slot = TimerSlot::new();

        assert_eq!(slot.arm(now, Duration::from_millis(300), "a"), None);
        assert_eq!(slot.arm(now, Duration::from_millis(300), "ab"), Some("a"));
        assert_eq!(slot.deadline(), Some(now + Duration::from_millis(300)));

        let later = now + Duration::from_millis(300);
        assert_eq!(slot.take_due(later), Some("ab"));
        assert!(!slot.is_armed());
    }

    #[test]
    fn test_take_due_before_deadline_keeps_slot() {
        let now = Instant::now();
        let mut slot = TimerSlot::new();
        slot.arm(now, Duration::from_millis(200), ());

        assert_eq!(slot.take_due(now + Duration::from_millis(199)), None);
        assert!(slot.is_armed());
    }

    #[test]
    fn test_cancel_clears_slot() {
        let now = Instant::now();
        let mut slot = TimerSlot::new();
        slot.arm(now, Duration::ZERO, 7u8);

        assert_eq!(slot.cancel(), Some(7));
        assert_eq!(slot.take_due(now), None);
        assert_eq!(slot.deadline(), None);
    }
}
