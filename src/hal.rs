//! Hardware seam of one axis.
//!
//! The motion core talks to a driver, a step-pulse timer, an end switch and an
//! optional quadrature counter only through [`AxisHardware`]. [`PinAxis`]
//! assembles one from embedded-hal 1.0 pins and two small peripheral traits.

use embedded_hal::digital::{InputPin, OutputPin};

/// Everything the motion core needs from one axis.
pub trait AxisHardware {
    /// Energize the driver.
    fn enable(&mut self);

    /// De-energize the driver.
    fn disable(&mut self);

    /// Set the physical direction output.
    fn set_direction(&mut self, clockwise: bool);

    /// Program the step timer period in timer ticks, one pulse per period.
    fn set_step_period(&mut self, ticks: u16);

    /// Start emitting step pulses.
    fn start_step_timer(&mut self);

    /// Stop emitting step pulses.
    fn stop_step_timer(&mut self);

    /// Whether the end switch is currently active.
    fn end_switch_active(&mut self) -> bool;

    /// Sub-revolution encoder count, in `0..ticks_per_revolution`.
    fn encoder_count(&mut self) -> u32;

    /// Overwrite the sub-revolution encoder count.
    fn set_encoder_count(&mut self, ticks: u32);
}

/// Step-pulse timer peripheral.
pub trait StepTimer {
    /// Program the auto-reload period.
    fn set_period(&mut self, ticks: u16);
    /// Start counting.
    fn start(&mut self);
    /// Stop counting.
    fn stop(&mut self);
}

/// Quadrature counter peripheral wrapping once per revolution.
pub trait QuadratureCounter {
    /// Current count.
    fn count(&mut self) -> u32;
    /// Overwrite the count.
    fn set_count(&mut self, ticks: u32);
}

/// Counter for axes without an encoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEncoder;

impl QuadratureCounter for NoEncoder {
    fn count(&mut self) -> u32 {
        0
    }

    fn set_count(&mut self, _ticks: u32) {}
}

/// Axis hardware built from embedded-hal pins.
///
/// Generic over:
/// - `EN`: driver enable pin
/// - `DIR`: direction pin
/// - `ESW`: end-switch input
/// - `T`: step timer
/// - `Q`: quadrature counter (or [`NoEncoder`])
///
/// Output errors are dropped; a switch that cannot be read counts as active.
pub struct PinAxis<EN, DIR, ESW, T, Q>
where
    EN: OutputPin,
    DIR: OutputPin,
    ESW: InputPin,
    T: StepTimer,
    Q: QuadratureCounter,
{
    enable_pin: EN,
    dir_pin: DIR,
    switch_pin: ESW,
    timer: T,
    counter: Q,
    enable_active_low: bool,
    switch_active_low: bool,
}

impl<EN, DIR, ESW, T, Q> PinAxis<EN, DIR, ESW, T, Q>
where
    EN: OutputPin,
    DIR: OutputPin,
    ESW: InputPin,
    T: StepTimer,
    Q: QuadratureCounter,
{
    /// Assemble an axis; enable and switch are active-high by default.
    pub fn new(enable_pin: EN, dir_pin: DIR, switch_pin: ESW, timer: T, counter: Q) -> Self {
        Self {
            enable_pin,
            dir_pin,
            switch_pin,
            timer,
            counter,
            enable_active_low: false,
            switch_active_low: false,
        }
    }

    /// Driver enable input is active low (`/EN`).
    pub fn enable_active_low(mut self, active_low: bool) -> Self {
        self.enable_active_low = active_low;
        self
    }

    /// End switch pulls its line low when triggered.
    pub fn switch_active_low(mut self, active_low: bool) -> Self {
        self.switch_active_low = active_low;
        self
    }

    /// Access the step timer.
    pub fn timer(&mut self) -> &mut T {
        &mut self.timer
    }

    /// Release the pins and peripherals.
    pub fn release(self) -> (EN, DIR, ESW, T, Q) {
        (
            self.enable_pin,
            self.dir_pin,
            self.switch_pin,
            self.timer,
            self.counter,
        )
    }

    fn drive_enable(&mut self, on: bool) {
        let high = on != self.enable_active_low;
        let _ = if high {
            self.enable_pin.set_high()
        } else {
            self.enable_pin.set_low()
        };
    }
}

impl<EN, DIR, ESW, T, Q> AxisHardware for PinAxis<EN, DIR, ESW, T, Q>
where
    EN: OutputPin,
    DIR: OutputPin,
    ESW: InputPin,
    T: StepTimer,
    Q: QuadratureCounter,
{
    fn enable(&mut self) {
        self.drive_enable(true);
    }

    fn disable(&mut self) {
        self.drive_enable(false);
    }

    fn set_direction(&mut self, clockwise: bool) {
        let _ = if clockwise {
            self.dir_pin.set_high()
        } else {
            self.dir_pin.set_low()
        };
    }

    fn set_step_period(&mut self, ticks: u16) {
        self.timer.set_period(ticks);
    }

    fn start_step_timer(&mut self) {
        self.timer.start();
    }

    fn stop_step_timer(&mut self) {
        self.timer.stop();
    }

    fn end_switch_active(&mut self) -> bool {
        match self.switch_pin.is_high() {
            Ok(high) => high != self.switch_active_low,
            Err(_) => true,
        }
    }

    fn encoder_count(&mut self) -> u32 {
        self.counter.count()
    }

    fn set_encoder_count(&mut self, ticks: u32) {
        self.counter.set_count(ticks);
    }
}
