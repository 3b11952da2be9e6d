//! System configuration - root configuration structure.

use heapless::Vec;
use serde::Deserialize;

use super::axis::AxisConfig;

/// Maximum number of axes a controller drives.
pub const MAX_AXES: usize = 8;

/// Step timer and scheduler settings shared by all axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct TimingConfig {
    /// Step timer input clock in Hz.
    #[serde(default = "default_timer_clock")]
    pub timer_clock_hz: u32,

    /// Scheduler period in milliseconds.
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u32,

    /// Shortest programmable pulse period in timer ticks.
    #[serde(default = "default_min_period")]
    pub min_period: u16,

    /// Longest programmable pulse period (timer register width).
    #[serde(default = "default_max_period")]
    pub max_period: u16,
}

fn default_timer_clock() -> u32 {
    1_000_000
}

fn default_tick_ms() -> u32 {
    10
}

fn default_min_period() -> u16 {
    2
}

fn default_max_period() -> u16 {
    u16::MAX
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            timer_clock_hz: default_timer_clock(),
            tick_ms: default_tick_ms(),
            min_period: default_min_period(),
            max_period: default_max_period(),
        }
    }
}

/// Root configuration structure from TOML.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SystemConfig {
    /// Timer and scheduler settings.
    #[serde(default)]
    pub timing: TimingConfig,

    /// Axis table, indexed by axis number.
    #[serde(default)]
    pub axes: Vec<AxisConfig, MAX_AXES>,
}

impl SystemConfig {
    /// Get an axis configuration by index.
    pub fn axis(&self, index: usize) -> Option<&AxisConfig> {
        self.axes.get(index)
    }

    /// Find an axis index by name.
    pub fn axis_index(&self, name: &str) -> Option<usize> {
        self.axes.iter().position(|a| a.name.as_str() == name)
    }

    /// List all axis names in index order.
    pub fn axis_names(&self) -> impl Iterator<Item = &str> {
        self.axes.iter().map(|a| a.name.as_str())
    }
}
