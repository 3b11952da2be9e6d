//! Builder pattern for MotionController.

use heapless::Vec;

use crate::config::{validate_axis, validate_timing, AxisConfig, SystemConfig, TimingConfig, MAX_AXES};
use crate::error::{ConfigError, Error, Result};
use crate::hal::AxisHardware;
use crate::motion::StepTiming;

use super::axis::Axis;
use super::controller::MotionController;

/// Builder for creating MotionController instances.
pub struct MotionControllerBuilder<H: AxisHardware> {
    timing: TimingConfig,
    axes: Vec<(AxisConfig, H), MAX_AXES>,
    rejected: usize,
    mismatch: Option<(usize, usize)>,
}

impl<H: AxisHardware> Default for MotionControllerBuilder<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: AxisHardware> MotionControllerBuilder<H> {
    /// Create a new builder with default timing and no axes.
    pub fn new() -> Self {
        Self {
            timing: TimingConfig::default(),
            axes: Vec::new(),
            rejected: 0,
            mismatch: None,
        }
    }

    /// Set timer and scheduler settings.
    pub fn timing(mut self, timing: TimingConfig) -> Self {
        self.timing = timing;
        self
    }

    /// Add an axis bound to its hardware.
    pub fn axis(mut self, config: AxisConfig, hw: H) -> Self {
        if self.axes.push((config, hw)).is_err() {
            self.rejected += 1;
        }
        self
    }

    /// Take timing and axes from a SystemConfig, pairing axes with hardware in order.
    pub fn from_config<I>(mut self, config: &SystemConfig, hardware: I) -> Self
    where
        I: IntoIterator<Item = H>,
    {
        self.timing = config.timing;
        let mut bound = 0;
        let mut hardware = hardware.into_iter();
        for axis in config.axes.iter() {
            match hardware.next() {
                Some(hw) => {
                    self = self.axis(axis.clone(), hw);
                    bound += 1;
                }
                None => break,
            }
        }
        let extra = hardware.count();
        if bound != config.axes.len() || extra > 0 {
            self.mismatch = Some((config.axes.len(), bound + extra));
        }
        self
    }

    /// Build the MotionController.
    ///
    /// # Errors
    ///
    /// Returns an error if no axes were added, too many were added, the axis
    /// and hardware counts of a SystemConfig disagree, or any setting is invalid.
    pub fn build(self) -> Result<MotionController<H>> {
        if let Some((axes, hardware)) = self.mismatch {
            return Err(Error::Config(ConfigError::HardwareMismatch { axes, hardware }));
        }
        if self.rejected > 0 {
            return Err(Error::Config(ConfigError::TooManyAxes(
                MAX_AXES + self.rejected,
            )));
        }
        if self.axes.is_empty() {
            return Err(Error::Config(ConfigError::NoAxes));
        }

        validate_timing(&self.timing)?;
        for (config, _) in self.axes.iter() {
            validate_axis(config)?;
        }

        let mut axes = Vec::new();
        for (config, hw) in self.axes {
            // capacity matches the input vector
            let _ = axes.push(Axis::new(config, hw));
        }

        Ok(MotionController::from_parts(
            axes,
            StepTiming::from_config(&self.timing),
            self.timing.tick_ms,
        ))
    }
}
