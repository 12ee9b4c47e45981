//! Timers driven by the frame loop's clock
//!
//! Nothing here reads a wall clock. The owner passes `now_ms` on every poll,
//! so tests can step time explicitly.

use serde::{Deserialize, Serialize};

/// The single repeating missile-spawn timer of a level
///
/// Restarting or cancelling bumps `generation`; log lines carry it so a
/// stale timer is easy to spot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpawnTimer {
    interval_ms: f64,
    next_at_ms: f64,
    generation: u64,
    armed: bool,
}

impl SpawnTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace any running timer with a new one. A zero interval leaves it disarmed.
    pub fn start(&mut self, interval_ms: f64, now_ms: f64) {
        self.generation += 1;
        self.interval_ms = interval_ms;
        self.next_at_ms = now_ms + interval_ms;
        self.armed = interval_ms > 0.0;
        log::debug!(
            "spawn timer #{} every {}ms (armed: {})",
            self.generation,
            interval_ms,
            self.armed
        );
    }

    pub fn cancel(&mut self) {
        if self.armed {
            log::debug!("spawn timer #{} cancelled", self.generation);
        }
        self.armed = false;
        self.generation += 1;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// True when a period has elapsed. Fires at most once per poll and does
    /// not try to catch up on missed periods.
    pub fn poll(&mut self, now_ms: f64) -> bool {
        if !self.armed || now_ms < self.next_at_ms {
            return false;
        }
        self.next_at_ms += self.interval_ms;
        if self.next_at_ms <= now_ms {
            self.next_at_ms = now_ms + self.interval_ms;
        }
        true
    }
}

/// One-shot delayed transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimelineEvent {
    ShowFinalScreen,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Timeline {
    pending: Vec<(f64, TimelineEvent)>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, at_ms: f64, event: TimelineEvent) {
        let index = self.pending.partition_point(|(t, _)| *t <= at_ms);
        self.pending.insert(index, (at_ms, event));
    }

    pub fn is_scheduled(&self, event: TimelineEvent) -> bool {
        self.pending.iter().any(|(_, e)| *e == event)
    }

    /// Remove and return every event due at `now_ms`, in schedule order
    pub fn drain_due(&mut self, now_ms: f64) -> Vec<TimelineEvent> {
        let due = self.pending.partition_point(|(t, _)| *t <= now_ms);
        self.pending.drain(..due).map(|(_, e)| e).collect()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

}
