//! Timing state for the independent spawn triggers.

use engine_core::DVec3;

/// Cooldown gate for an event-driven trigger.
///
/// A trigger may re-fire only when `now - last_fired_at >= cooldown`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerState {
    pub last_fired_at: f64,
    pub cooldown: f64,
    pub enabled: bool,
}

impl TriggerState {
    /// A trigger that has never fired.
    pub fn new(cooldown: f64, enabled: bool) -> Self {
        Self {
            last_fired_at: f64::NEG_INFINITY,
            cooldown,
            enabled,
        }
    }

    pub fn is_ready(&self, now: f64) -> bool {
        self.enabled && now - self.last_fired_at >= self.cooldown
    }

    /// Fire if ready, stamping `now`. Returns whether it fired.
    pub fn try_fire(&mut self, now: f64) -> bool {
        if self.is_ready(now) {
            self.last_fired_at = now;
            true
        } else {
            false
        }
    }
}

/// Fixed-interval timer. Missed fires are never queued.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodicTimer {
    pub next_fire_at: f64,
    pub interval: f64,
    pub enabled: bool,
}

impl PeriodicTimer {
    /// First fire is due at `first_fire_at`.
    pub fn new(interval: f64, first_fire_at: f64, enabled: bool) -> Self {
        Self {
            next_fire_at: first_fire_at,
            interval,
            enabled,
        }
    }

    pub fn is_due(&self, now: f64) -> bool {
        self.enabled && now >= self.next_fire_at
    }

    /// Fire if due; the next fire is always `now + interval`.
    pub fn try_fire(&mut self, now: f64) -> bool {
        if self.is_due(now) {
            self.next_fire_at = now + self.interval;
            true
        } else {
            false
        }
    }
}

/// Tracks how far the reference point has moved since the last batch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplacementTracker {
    pub last_recorded: DVec3,
    pub threshold: f64,
}

impl DisplacementTracker {
    pub fn new(start: DVec3, threshold: f64) -> Self {
        Self {
            last_recorded: start,
            threshold,
        }
    }

    /// Distance moved since the last recorded position.
    pub fn displacement(&self, current: DVec3) -> f64 {
        current.distance(self.last_recorded)
    }

    pub fn exceeded(&self, current: DVec3) -> bool {
        self.displacement(current) >= self.threshold
    }

    /// Consume the displacement: the next batch needs another full threshold.
    pub fn record(&mut self, current: DVec3) {
        self.last_recorded = current;
    }
}
