//! Velocity profile generation.
//!
//! Linear speed ramps evaluated against wall-clock time, the decel-start
//! planner deciding between trapezoidal and triangular moves, and the
//! conversion of speeds into step-timer periods.

use libm::roundf;

use crate::config::TimingConfig;

/// Direction of motor motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Clockwise (positive step count).
    Clockwise,
    /// Counter-clockwise (negative step count).
    CounterClockwise,
}

impl Direction {
    /// Get direction from signed step count.
    #[inline]
    pub fn from_steps(steps: i64) -> Self {
        if steps >= 0 {
            Direction::Clockwise
        } else {
            Direction::CounterClockwise
        }
    }

    /// Get the sign multiplier.
    #[inline]
    pub fn sign(self) -> i32 {
        match self {
            Direction::Clockwise => 1,
            Direction::CounterClockwise => -1,
        }
    }

    /// The other direction.
    #[inline]
    pub fn opposite(self) -> Self {
        match self {
            Direction::Clockwise => Direction::CounterClockwise,
            Direction::CounterClockwise => Direction::Clockwise,
        }
    }
}

/// Steps needed to ramp from standstill to `max_speed`: `v² / 2a`.
pub fn accdec_steps(max_speed: u32, acceleration: u32) -> i32 {
    braking_distance(max_speed, acceleration)
}

/// Distance covered while braking from `speed` to standstill.
pub fn braking_distance(speed: u32, acceleration: u32) -> i32 {
    if acceleration == 0 {
        return i32::MAX;
    }
    let v = speed as u64;
    let steps = v * v / (2 * acceleration as u64);
    steps.min(i32::MAX as u64) as i32
}

/// Position at which deceleration must begin for a move `from` → `to`.
///
/// Moves longer than two ramps cruise and start braking `accdec` steps before
/// the target; shorter ones brake at the midpoint.
pub fn decel_start(from: i32, to: i32, accdec: i32) -> i32 {
    let from = from as i64;
    let to = to as i64;
    let len = (to - from).abs();
    let sign = if to >= from { 1 } else { -1 };

    let start = if len > 2 * accdec as i64 {
        to - sign * accdec as i64
    } else {
        from + sign * (len / 2)
    };
    start as i32
}

/// Whether a position has reached `mark` when travelling in `direction`.
#[inline]
pub fn reached(position: i32, mark: i32, direction: Direction) -> bool {
    match direction {
        Direction::Clockwise => position >= mark,
        Direction::CounterClockwise => position <= mark,
    }
}

/// Linear speed ramp of the current motion phase.
///
/// The phase clock starts at the first evaluation, so a ramp created outside
/// the scheduler begins counting at its next tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ramp {
    from: u32,
    started_at: Option<u32>,
}

impl Ramp {
    /// Ramp starting from `from` steps/s at the next evaluation.
    pub fn new(from: u32) -> Self {
        Self {
            from,
            started_at: None,
        }
    }

    /// Ramp starting from `from` steps/s at `now`.
    pub fn starting_at(from: u32, now: u32) -> Self {
        Self {
            from,
            started_at: Some(now),
        }
    }

    /// Speed the ramp started from.
    #[inline]
    pub fn from_speed(&self) -> u32 {
        self.from
    }

    /// Milliseconds since the ramp started, wraparound safe.
    pub fn elapsed_ms(&mut self, now: u32) -> u32 {
        let start = *self.started_at.get_or_insert(now);
        now.wrapping_sub(start)
    }

    /// `v = from + a·t`.
    pub fn accelerate(&mut self, now: u32, acceleration: u32) -> u32 {
        let gained = acceleration as u64 * self.elapsed_ms(now) as u64 / 1000;
        (self.from as u64 + gained).min(u32::MAX as u64) as u32
    }

    /// `v = from − a·t`, saturating at zero.
    pub fn decelerate(&mut self, now: u32, acceleration: u32) -> u32 {
        let lost = acceleration as u64 * self.elapsed_ms(now) as u64 / 1000;
        (self.from as u64).saturating_sub(lost) as u32
    }
}

/// Converts speeds into step-timer periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepTiming {
    clock_hz: u32,
    min_period: u16,
    max_period: u16,
}

impl StepTiming {
    /// Timing derived from the configured timer.
    pub fn from_config(config: &TimingConfig) -> Self {
        Self {
            clock_hz: config.timer_clock_hz,
            min_period: config.min_period,
            max_period: config.max_period,
        }
    }

    /// Timer period for one microstep pulse at `speed` full steps/s.
    ///
    /// Returns the clamped period together with the speed it really produces.
    pub fn period_for(&self, speed: u32, microstep_shift: u8) -> (u16, u32) {
        let raw = if speed == 0 {
            u32::MAX
        } else {
            let ticks_per_step = roundf(self.clock_hz as f32 / speed as f32);
            (ticks_per_step as u32) >> microstep_shift
        };
        let period = raw.clamp(self.min_period as u32, self.max_period as u32) as u16;
        (period, self.speed_of(period, microstep_shift))
    }

    /// Full steps per second produced by a pulse period.
    pub fn speed_of(&self, period: u16, microstep_shift: u8) -> u32 {
        let ticks_per_step = (period as u64) << microstep_shift;
        if ticks_per_step == 0 {
            return 0;
        }
        ((self.clock_hz as u64 + ticks_per_step / 2) / ticks_per_step) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accdec_steps() {
        assert_eq!(accdec_steps(2000, 4000), 500);
        assert_eq!(accdec_steps(1000, 1000), 500);
    }

    #[test]
    fn test_triangular_when_short() {
        // L = accdec: brake at the midpoint
        assert_eq!(decel_start(0, 500, 500), 250);
        // L = 2·accdec is still triangular
        assert_eq!(decel_start(0, 1000, 500), 500);
    }

    #[test]
    fn test_trapezoidal_when_long() {
        // L = 2·accdec + 1: brake accdec before target
        assert_eq!(decel_start(0, 1001, 500), 501);
        assert_eq!(decel_start(100, 5100, 500), 4600);
    }

    #[test]
    fn test_negative_direction() {
        assert_eq!(decel_start(0, -500, 500), -250);
        assert_eq!(decel_start(0, -1001, 500), -501);
        assert_eq!(decel_start(300, -2000, 500), -1500);
    }

    #[test]
    fn test_reached() {
        assert!(reached(10, 10, Direction::Clockwise));
        assert!(!reached(9, 10, Direction::Clockwise));
        assert!(reached(-10, -10, Direction::CounterClockwise));
        assert!(!reached(-9, -10, Direction::CounterClockwise));
    }

    #[test]
    fn test_ramp_accelerates_from_first_tick() {
        let mut ramp = Ramp::new(100);
        assert_eq!(ramp.accelerate(5000, 4000), 100);
        assert_eq!(ramp.accelerate(5010, 4000), 140);
        assert_eq!(ramp.accelerate(5500, 4000), 2100);
    }

    #[test]
    fn test_ramp_wraparound() {
        let mut ramp = Ramp::starting_at(2000, u32::MAX - 4);
        // 10 ms elapsed across the wrap
        assert_eq!(ramp.decelerate(5, 4000), 1960);
    }

    #[test]
    fn test_decelerate_saturates() {
        let mut ramp = Ramp::starting_at(100, 0);
        assert_eq!(ramp.decelerate(10_000, 4000), 0);
    }

    #[test]
    fn test_period_for_speed() {
        let timing = StepTiming::from_config(&TimingConfig::default());

        // 1 MHz / 1000 steps/s = 1000 ticks per step, 16 microsteps -> 62
        let (period, speed) = timing.period_for(1000, 4);
        assert_eq!(period, 62);
        // back-computed: 1e6 / (62 * 16) = 1008
        assert_eq!(speed, 1008);
    }

    #[test]
    fn test_period_clamped() {
        let timing = StepTiming::from_config(&TimingConfig {
            timer_clock_hz: 1_000_000,
            tick_ms: 10,
            min_period: 50,
            max_period: 5000,
        });

        // far too fast: clamped to min period, speed reflects the clamp
        let (period, speed) = timing.period_for(100_000, 0);
        assert_eq!(period, 50);
        assert_eq!(speed, 20_000);

        // far too slow: clamped to max period
        let (period, speed) = timing.period_for(1, 0);
        assert_eq!(period, 5000);
        assert_eq!(speed, 200);
    }
}
