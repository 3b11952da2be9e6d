//! Simulated axis hardware shared by the integration tests.
//!
//! The rig advances a 1 MHz step timer one millisecond at a time, feeding
//! pulses into the controller's interrupt hooks, then runs the scheduler.
#![allow(dead_code)]

use stepper_supervisor::config::{AxisConfig, Microsteps, TimingConfig};
use stepper_supervisor::{AxisHardware, Direction, MotionController, MotionState};

/// Timer ticks elapsing per simulated millisecond.
const TICKS_PER_MS: u64 = 1_000;

/// One simulated axis: driver, step timer, end switch and quadrature counter.
#[derive(Debug, Default)]
pub struct SimAxis {
    pub enabled: bool,
    pub clockwise: bool,
    pub period: u16,
    pub running: bool,
    pub end_switch: bool,
    /// Sub-revolution encoder count.
    pub encoder: u32,
    /// 0 when the axis has no encoder.
    pub ticks_per_revolution: u32,
    pub ticks_per_pulse: u32,
    /// Shaft held in place: pulses no longer move the encoder.
    pub blocked: bool,
    pub pulses: u64,
    tick_acc: u64,
}

impl SimAxis {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_encoder(ticks_per_revolution: u32, ticks_per_pulse: u32) -> Self {
        Self {
            ticks_per_revolution,
            ticks_per_pulse,
            ..Self::default()
        }
    }

    /// Emit one pulse; returns the wrap direction if the counter wrapped.
    fn pulse(&mut self) -> Option<Direction> {
        self.pulses += 1;
        if self.ticks_per_revolution == 0 || self.blocked {
            return None;
        }
        if self.clockwise {
            let next = self.encoder + self.ticks_per_pulse;
            if next >= self.ticks_per_revolution {
                self.encoder = next - self.ticks_per_revolution;
                Some(Direction::Clockwise)
            } else {
                self.encoder = next;
                None
            }
        } else if self.encoder < self.ticks_per_pulse {
            self.encoder = self.encoder + self.ticks_per_revolution - self.ticks_per_pulse;
            Some(Direction::CounterClockwise)
        } else {
            self.encoder -= self.ticks_per_pulse;
            None
        }
    }
}

impl AxisHardware for SimAxis {
    fn enable(&mut self) {
        self.enabled = true;
    }

    fn disable(&mut self) {
        self.enabled = false;
    }

    fn set_direction(&mut self, clockwise: bool) {
        self.clockwise = clockwise;
    }

    fn set_step_period(&mut self, ticks: u16) {
        self.period = ticks;
    }

    fn start_step_timer(&mut self) {
        self.running = true;
    }

    fn stop_step_timer(&mut self) {
        self.running = false;
        self.tick_acc = 0;
    }

    fn end_switch_active(&mut self) -> bool {
        self.end_switch
    }

    fn encoder_count(&mut self) -> u32 {
        self.encoder
    }

    fn set_encoder_count(&mut self, ticks: u32) {
        self.encoder = ticks;
    }
}

/// Axis without encoder: 4 microsteps, 2000/100 steps/s, 4000 steps/s², ±10000 steps.
pub fn plain_axis() -> AxisConfig {
    AxisConfig::new(Microsteps::QUARTER, 2000, 100, 4000, 10_000)
}

/// Axis with an 800-tick encoder on a 200-step motor, full stepping.
pub fn encoder_axis() -> AxisConfig {
    AxisConfig::new(Microsteps::FULL, 2000, 100, 4000, 10_000).with_encoder(800)
}

/// Simulated hardware matching [`encoder_axis`].
pub fn encoder_hw() -> SimAxis {
    SimAxis::with_encoder(800, 4)
}

/// Controller plus simulated clock.
pub struct Rig {
    pub ctrl: MotionController<SimAxis>,
    pub now: u32,
}

impl Rig {
    pub fn new(axes: Vec<(AxisConfig, SimAxis)>) -> Self {
        Self::starting_at(axes, 0)
    }

    pub fn starting_at(axes: Vec<(AxisConfig, SimAxis)>, now: u32) -> Self {
        let mut builder = MotionController::builder().timing(TimingConfig::default());
        for (config, hw) in axes {
            builder = builder.axis(config, hw);
        }
        let mut ctrl = builder.build().expect("valid test configuration");
        ctrl.init();
        Self { ctrl, now }
    }

    pub fn single(config: AxisConfig, hw: SimAxis) -> Self {
        Self::new(vec![(config, hw)])
    }

    pub fn hw(&mut self, axis: usize) -> &mut SimAxis {
        self.ctrl.hardware_mut(axis).expect("axis exists")
    }

    pub fn state(&self, axis: usize) -> MotionState {
        self.ctrl.state(axis).expect("axis exists")
    }

    pub fn position(&self, axis: usize) -> i32 {
        self.ctrl.position(axis).expect("axis exists")
    }

    /// Advance one millisecond: step pulses first, then the scheduler.
    /// Returns `true` if a scheduler tick ran.
    pub fn step_ms(&mut self) -> bool {
        self.now = self.now.wrapping_add(1);
        for i in 0..self.ctrl.axis_count() {
            {
                let hw = self.hw(i);
                if !hw.running {
                    continue;
                }
                hw.tick_acc += TICKS_PER_MS;
            }
            loop {
                let hw = self.hw(i);
                let period = hw.period.max(1) as u64;
                if !hw.running || hw.tick_acc < period {
                    break;
                }
                hw.tick_acc -= period;
                if let Some(direction) = hw.pulse() {
                    self.ctrl.on_encoder_overflow(i, direction);
                }
                self.ctrl.on_step_pulse(i);
            }
        }
        self.ctrl.process(self.now)
    }

    /// Advance up to and including the next scheduler tick.
    pub fn tick(&mut self) {
        while !self.step_ms() {}
    }

    pub fn run_ms(&mut self, ms: u32) {
        for _ in 0..ms {
            self.step_ms();
        }
    }

    /// Run until no axis moves or homes; returns false on timeout.
    pub fn run_until_idle(&mut self, max_ms: u32) -> bool {
        for _ in 0..max_ms {
            self.step_ms();
            let idle = (0..self.ctrl.axis_count()).all(|i| {
                let axis = self.ctrl.axis(i).expect("axis exists");
                !axis.state().is_moving()
                    && axis.homing_state() == stepper_supervisor::HomingState::None
            });
            if idle {
                return true;
            }
        }
        false
    }
}
