//! Simulation time for the game loop.

/// Manages frame timing, delta time and the global time scale.
///
/// The loop feeds real frame durations into [`Time::advance`]; everything
/// gameplay-related (survival clock, spawn timers, deferred tasks) reads the
/// scaled values, so setting the scale to zero freezes the simulation.
#[derive(Debug, Clone)]
pub struct Time {
    /// Scaled duration of the last frame in seconds.
    delta: f64,
    /// Unscaled duration of the last frame in seconds.
    unscaled_delta: f64,
    /// Total scaled simulation time in seconds.
    elapsed: f64,
    /// Total real time fed into the clock in seconds.
    unscaled_elapsed: f64,
    /// Global time scale (0.0 = frozen, 1.0 = normal).
    time_scale: f64,
    /// Frame count since start.
    frame_count: u64,
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

impl Time {
    /// Create a new time manager at t = 0 with a time scale of one.
    pub fn new() -> Self {
        Self {
            delta: 0.0,
            unscaled_delta: 0.0,
            elapsed: 0.0,
            unscaled_elapsed: 0.0,
            time_scale: 1.0,
            frame_count: 0,
        }
    }

    /// Advance the clock by one frame of `real_dt` seconds. Returns the scaled delta.
    pub fn advance(&mut self, real_dt: f64) -> f64 {
        let real_dt = real_dt.max(0.0);
        self.unscaled_delta = real_dt;
        self.unscaled_elapsed += real_dt;
        self.delta = real_dt * self.time_scale;
        self.elapsed += self.delta;
        self.frame_count += 1;
        self.delta
    }

    /// Get the scaled delta time in seconds.
    pub fn delta_seconds(&self) -> f64 {
        self.delta
    }

    /// Get the unscaled delta time in seconds.
    pub fn unscaled_delta_seconds(&self) -> f64 {
        self.unscaled_delta
    }

    /// Get total scaled simulation time in seconds.
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed
    }

    /// Get total real time fed to the clock in seconds.
    pub fn unscaled_elapsed_seconds(&self) -> f64 {
        self.unscaled_elapsed
    }

    /// Current global time scale.
    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    /// Set the global time scale. Negative values are clamped to zero.
    pub fn set_time_scale(&mut self, scale: f64) {
        self.time_scale = scale.max(0.0);
    }

    /// True while the time scale is zero.
    pub fn is_frozen(&self) -> bool {
        self.time_scale == 0.0
    }

    /// Get the current frame count.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_accumulates_scaled_time() {
        let mut time = Time::new();
        time.advance(0.5);
        time.set_time_scale(2.0);
        let dt = time.advance(0.5);
        assert_eq!(dt, 1.0);
        assert!((time.elapsed_seconds() - 1.5).abs() < 1e-12);
        assert!((time.unscaled_elapsed_seconds() - 1.0).abs() < 1e-12);
        assert_eq!(time.frame_count(), 2);
    }

    #[test]
    fn zero_scale_freezes_simulation_time() {
        let mut time = Time::new();
        time.advance(1.0);
        time.set_time_scale(0.0);
        assert!(time.is_frozen());
        assert_eq!(time.advance(3.0), 0.0);
        assert_eq!(time.elapsed_seconds(), 1.0);
        assert_eq!(time.unscaled_elapsed_seconds(), 4.0);
    }

    #[test]
    fn negative_inputs_are_clamped() {
        let mut time = Time::new();
        time.set_time_scale(-1.0);
        assert_eq!(time.time_scale(), 0.0);
        time.set_time_scale(1.0);
        assert_eq!(time.advance(-0.5), 0.0);
        assert_eq!(time.delta_seconds(), 0.0);
        assert_eq!(time.unscaled_delta_seconds(), 0.0);
    }
}
