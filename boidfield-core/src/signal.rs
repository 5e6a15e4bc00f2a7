//! Delay queue for alert propagation between neighbouring boids.

use alloc::vec::Vec;

use crate::BoidKey;

/// Pending instruction to alert the neighbours of `boid` at `trigger_time`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalEvent {
    pub boid: BoidKey,
    pub trigger_time: f64,
}

#[derive(Debug, Clone, Default)]
pub struct SignalQueue {
    pending: Vec<SignalEvent>,
}

impl SignalQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, boid: BoidKey, trigger_time: f64) {
        self.pending.push(SignalEvent { boid, trigger_time });
    }

    /// Removes and returns every event with `trigger_time <= now`, earliest
    /// first. Events scheduled while the returned batch is processed wait
    /// for a later call.
    pub fn take_due(&mut self, now: f64) -> Vec<SignalEvent> {
        let (mut due, pending): (Vec<_>, Vec<_>) = self
            .pending
            .drain(..)
            .partition(|event| event.trigger_time <= now);
        self.pending = pending;
        due.sort_by(|a, b| a.trigger_time.total_cmp(&b.trigger_time));
        due
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
