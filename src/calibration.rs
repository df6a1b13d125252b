mod correction;
mod store;

pub use correction::apply_extruder_steps;
pub use correction::VOLUMETRIC_RESCALE_THRESHOLD;
pub use store::AxisLimits;
pub use store::Calibration;
pub use store::Capabilities;
pub use store::Error;
pub use store::MAX_EXTRUDERS;
pub use store::MAX_LINEAR_AXES;

#[cfg(test)]
pub use store::test as store_test;
