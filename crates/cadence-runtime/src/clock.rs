//! Game clock with fixed-timestep accumulator

use crate::config::RuntimeConfig;
use std::time::Instant;

/// Tracks game time and decides how many fixed-update passes each frame runs
#[derive(Debug, Clone)]
pub struct GameClock {
    /// Total elapsed game time in seconds
    pub total_time: f64,
    /// Time since last frame in seconds
    pub delta_time: f64,
    /// Fixed timestep interval (default: 1/60 second)
    pub fixed_timestep: f64,
    /// Longest frame delta accepted before clamping
    pub max_frame_time: f64,
    /// Accumulated time for fixed-step consumption
    accumulator: f64,
    /// Last tick instant
    last_instant: Instant,
    /// Whether this is the first tick
    first_tick: bool,
}

impl Default for GameClock {
    fn default() -> Self {
        Self {
            total_time: 0.0,
            delta_time: 0.0,
            fixed_timestep: 1.0 / 60.0,
            max_frame_time: 0.25,
            accumulator: 0.0,
            last_instant: Instant::now(),
            first_tick: true,
        }
    }
}

impl GameClock {
    /// Create a new game clock with default 60Hz fixed timestep
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a game clock with a custom fixed timestep
    pub fn with_fixed_timestep(hz: f64) -> Self {
        Self {
            fixed_timestep: 1.0 / hz,
            ..Self::default()
        }
    }

    /// Create a game clock from runtime settings
    pub fn from_config(config: &RuntimeConfig) -> Self {
        Self {
            fixed_timestep: 1.0 / config.fixed_hz,
            max_frame_time: config.max_frame_time,
            ..Self::default()
        }
    }

    /// Advance the clock by real elapsed time. Call once per frame.
    pub fn tick(&mut self) {
        let now = Instant::now();

        if self.first_tick {
            self.first_tick = false;
            self.last_instant = now;
            self.delta_time = 0.0;
            return;
        }

        let elapsed = now.duration_since(self.last_instant).as_secs_f64();
        self.last_instant = now;
        self.advance(elapsed);
    }

    /// Advance the clock by a given number of seconds (simulated time)
    pub fn advance(&mut self, elapsed: f64) {
        self.first_tick = false;
        // Clamp to avoid spiral of death
        self.delta_time = elapsed.clamp(0.0, self.max_frame_time);
        self.total_time += self.delta_time;
        self.accumulator += self.delta_time;
    }

    /// Returns true if there's enough accumulated time for a fixed update step
    pub fn should_fixed_update(&self) -> bool {
        self.accumulator >= self.fixed_timestep
    }

    /// Consume one fixed timestep from the accumulator
    pub fn consume_fixed_step(&mut self) {
        self.accumulator -= self.fixed_timestep;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_defaults() {
        let clock = GameClock::new();
        assert!((clock.fixed_timestep - 1.0 / 60.0).abs() < 1e-10);
        assert_eq!(clock.total_time, 0.0);
        assert_eq!(clock.delta_time, 0.0);
    }

    #[test]
    fn test_first_tick_zero_delta() {
        let mut clock = GameClock::new();
        clock.tick();
        assert_eq!(clock.delta_time, 0.0);
        assert!(!clock.should_fixed_update());
    }

    #[test]
    fn test_advance_accumulates() {
        let mut clock = GameClock::with_fixed_timestep(10.0);
        clock.advance(0.25);
        assert!((clock.total_time - 0.25).abs() < 1e-10);

        let mut steps = 0;
        while clock.should_fixed_update() {
            clock.consume_fixed_step();
            steps += 1;
        }
        assert_eq!(steps, 2);
        assert!(!clock.should_fixed_update());
    }

    #[test]
    fn test_advance_clamps_long_frames() {
        let mut clock = GameClock::new();
        clock.advance(3.0);
        assert_eq!(clock.delta_time, 0.25);

        clock.advance(-1.0);
        assert_eq!(clock.delta_time, 0.0);
    }

    #[test]
    fn test_from_config() {
        let config = RuntimeConfig {
            fixed_hz: 50.0,
            max_frame_time: 0.1,
            ..RuntimeConfig::default()
        };
        let clock = GameClock::from_config(&config);
        assert!((clock.fixed_timestep - 0.02).abs() < 1e-10);
        assert_eq!(clock.max_frame_time, 0.1);
    }
}
