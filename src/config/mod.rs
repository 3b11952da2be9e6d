//! Configuration module for stepper-supervisor.
//!
//! Provides the axis table and timing settings, loadable from TOML files
//! (with `std` feature) or built in code.

mod axis;
mod constraints;
mod end_switch;
#[cfg(feature = "std")]
mod loader;
mod system;
pub mod units;
mod validation;

pub use axis::AxisConfig;
pub use constraints::{AxisConstraints, EncoderScale};
pub use end_switch::EndSwitchPolicy;
pub use system::{SystemConfig, TimingConfig, MAX_AXES};
pub use validation::{validate_axis, validate_config, validate_timing};

#[cfg(feature = "std")]
pub use loader::{load_config, parse_config};

pub use units::Microsteps;
