//! Value drivers for the demo window.

use std::time::Duration;

use rand::Rng;

/// Produces the next gauge value each time the demo timer fires.
pub trait ValueDriver {
    fn next_value(&mut self, min: f64, max: f64) -> f64;
}

/// Demo timer period.
pub const TIME_DELTA: Duration = Duration::from_nanos(1_000_000_000 / 24);
const ACCELERATION: f64 = 5.0;

/// Accelerates from `min` to `max` and back, bouncing at both ends.
#[derive(Debug, Clone, PartialEq)]
pub struct Sweep {
    velocity: f64,
    acceleration: f64,
    time_delta: f64,
}

impl Default for Sweep {
    fn default() -> Self {
        Self {
            velocity: 0.0,
            acceleration: ACCELERATION,
            time_delta: TIME_DELTA.as_secs_f64(),
        }
    }
}

impl Sweep {
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    pub fn acceleration(&self) -> f64 {
        self.acceleration
    }
}

impl ValueDriver for Sweep {
    fn next_value(&mut self, min: f64, max: f64) -> f64 {
        self.velocity += self.time_delta * self.acceleration;
        if self.velocity > max {
            self.velocity = max;
            self.acceleration = -ACCELERATION;
        }
        if self.velocity < min {
            self.velocity = min;
            self.acceleration = ACCELERATION;
        }
        self.velocity
    }
}

/// Eases toward a random target, occasionally picking a new one.
#[derive(Debug, Clone)]
pub struct RandomWalk<R> {
    rng: R,
    position: f64,
    target: f64,
    reroll_chance: f64,
    lerp_factor: f64,
}

impl<R: Rng> RandomWalk<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            position: 0.0,
            target: 0.0,
            reroll_chance: 0.02,
            lerp_factor: 0.1,
        }
    }

    pub fn with_reroll_chance(mut self, chance: f64) -> Self {
        self.reroll_chance = chance.clamp(0.0, 1.0);
        self
    }
}

impl<R: Rng> ValueDriver for RandomWalk<R> {
    fn next_value(&mut self, min: f64, max: f64) -> f64 {
        if !(min.is_finite() && max.is_finite()) || max <= min {
            self.position = min;
            return min;
        }
        if self.rng.random_bool(self.reroll_chance) {
            self.target = self.rng.random_range(min..=max);
        }
        self.position = lerp(self.position, self.target, self.lerp_factor).clamp(min, max);
        self.position
    }
}

fn lerp(current: f64, target: f64, factor: f64) -> f64 {
    current + (target - current) * factor
}

/// Turns frame times into a count of fixed-period timer firings.
#[derive(Debug, Clone, PartialEq)]
pub struct Ticker {
    interval: Duration,
    pending: Duration,
}

impl Ticker {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            pending: Duration::ZERO,
        }
    }

    /// Adds `dt` and returns how many whole intervals have elapsed since the
    /// last call. A zero interval fires once per call.
    pub fn ticks(&mut self, dt: Duration) -> u32 {
        if self.interval.is_zero() {
            return 1;
        }
        self.pending += dt;
        let mut fired = 0;
        while self.pending >= self.interval {
            self.pending -= self.interval;
            fired += 1;
        }
        fired
    }
}

impl Default for Ticker {
    fn default() -> Self {
        Self::new(TIME_DELTA)
    }
}
