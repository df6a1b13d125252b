#![cfg_attr(not(test), no_std)]

mod axis;
mod calibration;
mod command;
mod layer_height;
mod planner;
mod report;
mod units;

#[cfg(test)]
mod test_support;

pub use axis::AxisId;
pub use axis::LinearAxis;

pub use calibration::apply_extruder_steps;
pub use calibration::AxisLimits;
pub use calibration::Calibration;
pub use calibration::Capabilities;
pub use calibration::Error as CalibrationError;
pub use calibration::MAX_EXTRUDERS;
pub use calibration::MAX_LINEAR_AXES;
pub use calibration::VOLUMETRIC_RESCALE_THRESHOLD;

pub use command::handle;
pub use command::parse_request;
pub use command::AxisWord;
pub use command::Error as CommandError;
pub use command::Request;
pub use command::MAX_AXIS_WORDS;

pub use layer_height::advise;
pub use layer_height::Z_MICROSTEPS;

pub use planner::PositionRefresh;

pub use report::report;

pub use units::Fixed2;
pub use units::Fixed4;
pub use units::UnitSystem;
