use crate::axis::{AxisId, LinearAxis};

use ufmt_macros::uDebug;

/// Maximum number of configurable linear axes.
pub const MAX_LINEAR_AXES: usize = 6;

/// Maximum number of extruders.
pub const MAX_EXTRUDERS: usize = 8;

const MAX_SLOTS: usize = MAX_LINEAR_AXES + MAX_EXTRUDERS;

/// Per-axis calibration and dependent motion limits.
///
/// `steps_per_unit` is steps per millimeter for linear axes and steps per
/// cubic millimeter for extrusion slots. It must stay strictly positive;
/// the setters enforce this.
#[derive(Debug, PartialEq, Copy, Clone)]
pub struct AxisLimits {
    pub steps_per_unit: f32,
    pub max_feedrate: f32,
    pub max_acceleration: f32,
    pub classic_jerk: f32,
}

/// Machine capability flags, resolved once at startup.
///
/// These replace build-time feature gates so that a single binary can
/// branch at runtime.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct Capabilities {
    /// Number of physical extruders; zero for machines without extrusion.
    pub extruder_count: u8,
    /// Independent calibration per extruder instead of one shared slot.
    pub distinct_e_factors: bool,
    /// Per-axis classic jerk applies to extrusion.
    pub classic_e_jerk: bool,
    /// Layer-height advisory output is available.
    pub layer_height_advisor: bool,
    /// Legacy rescale of extruder limits when a value below the volumetric
    /// threshold is set. See [crate::apply_extruder_steps].
    pub volumetric_rescale: bool,
}

/// Validation errors from the calibration store.
#[derive(Debug, uDebug, PartialEq, Eq, Copy, Clone)]
pub enum Error {
    /// A steps-per-unit value of zero or below was supplied.
    NonPositiveSteps { axis: AxisId },
    /// The axis has no calibration slot on this machine.
    UnknownAxis { axis: AxisId },
    /// The same axis was configured twice.
    DuplicateAxis { axis: AxisId },
    /// A required axis is missing from the configuration.
    MissingAxis { axis: AxisId },
    /// More axes or extruders than the store can hold.
    TooManyAxes,
}

/// Axis calibration store.
///
/// Owns the per-axis steps-per-unit values and the motion limits that
/// depend on them, in one bounded table built at startup. The motion
/// planner reads this store on every queued move; writing a value while a
/// move is in flight on that axis leaves the remainder of that move running
/// on the old calibration. Field writes are single word-sized stores and no
/// lock is taken; callers sequence updates between moves.
pub struct Calibration {
    slots: heapless::Vec<Slot, MAX_SLOTS>,
    linear_axes: heapless::Vec<LinearAxis, MAX_LINEAR_AXES>,
    caps: Capabilities,
}

struct Slot {
    id: AxisId,
    limits: AxisLimits,
}

impl Calibration {
    /// Builds the calibration store.
    ///
    /// # Parameters
    ///
    /// - `linear`: Ordered list of linear axes with their startup limits.
    ///   Must include X, Y and Z, with no duplicates.
    /// - `extruder`: Startup limits shared by every extruder slot. One slot
    ///   is created per extruder when `distinct_e_factors` is set, one
    ///   shared slot otherwise, and none when `extruder_count` is zero.
    /// - `caps`: Machine capability flags.
    pub fn new(
        linear: &[(LinearAxis, AxisLimits)],
        extruder: AxisLimits,
        caps: Capabilities,
    ) -> Result<Self, Error> {
        let mut slots: heapless::Vec<Slot, MAX_SLOTS> = heapless::Vec::new();
        let mut linear_axes: heapless::Vec<LinearAxis, MAX_LINEAR_AXES> =
            heapless::Vec::new();

        for &(axis, limits) in linear {
            let id = AxisId::Linear(axis);
            if limits.steps_per_unit <= 0.0 {
                return Err(Error::NonPositiveSteps { axis: id });
            }
            if linear_axes.contains(&axis) {
                return Err(Error::DuplicateAxis { axis: id });
            }
            if linear_axes.push(axis).is_err()
                || slots.push(Slot { id, limits }).is_err()
            {
                return Err(Error::TooManyAxes);
            }
        }

        for required in [LinearAxis::X, LinearAxis::Y, LinearAxis::Z] {
            if !linear_axes.contains(&required) {
                return Err(Error::MissingAxis {
                    axis: AxisId::Linear(required),
                });
            }
        }

        if caps.extruder_count as usize > MAX_EXTRUDERS {
            return Err(Error::TooManyAxes);
        }
        let extruder_slots: u8 = if caps.extruder_count == 0 {
            0
        } else if caps.distinct_e_factors {
            caps.extruder_count
        } else {
            1
        };
        if extruder_slots > 0 && extruder.steps_per_unit <= 0.0 {
            return Err(Error::NonPositiveSteps {
                axis: AxisId::Extruder(0),
            });
        }
        for index in 0..extruder_slots {
            let id = AxisId::Extruder(index);
            if slots
                .push(Slot {
                    id,
                    limits: extruder,
                })
                .is_err()
            {
                return Err(Error::TooManyAxes);
            }
        }

        Ok(Self {
            slots,
            linear_axes,
            caps,
        })
    }

    /// Returns the machine capability flags.
    pub fn capabilities(&self) -> &Capabilities {
        &self.caps
    }

    /// Returns the configured linear axes, in report order.
    pub fn linear_axes(&self) -> &[LinearAxis] {
        &self.linear_axes
    }

    /// Resolves an extruder index to its calibration slot.
    ///
    /// Without distinct extruder factors all extruders share slot zero.
    pub fn extruder_axis(&self, index: u8) -> AxisId {
        if self.caps.distinct_e_factors {
            AxisId::Extruder(index)
        } else {
            AxisId::Extruder(0)
        }
    }

    /// Returns the limits of an axis slot.
    pub fn limits(&self, id: AxisId) -> Option<&AxisLimits> {
        self.slots.iter().find(|s| s.id == id).map(|s| &s.limits)
    }

    pub(crate) fn limits_mut(&mut self, id: AxisId) -> Option<&mut AxisLimits> {
        self.slots
            .iter_mut()
            .find(|s| s.id == id)
            .map(|s| &mut s.limits)
    }

    /// Returns the steps-per-unit value of an axis slot.
    pub fn steps_per_unit(&self, id: AxisId) -> Option<f32> {
        self.limits(id).map(|l| l.steps_per_unit)
    }

    /// Returns the distance moved by a single step, the reciprocal of
    /// steps-per-unit.
    pub fn steps_to_unit(&self, id: AxisId) -> Option<f32> {
        self.limits(id).map(|l| 1.0 / l.steps_per_unit)
    }

    /// Assigns a steps-per-unit value directly.
    ///
    /// Rejects zero or negative values and unknown slots, leaving the store
    /// unchanged. Extrusion slots are normally updated through
    /// [crate::apply_extruder_steps] instead, which also rescales the
    /// dependent limits.
    pub fn set_steps_per_unit(
        &mut self,
        id: AxisId,
        value: f32,
    ) -> Result<(), Error> {
        if value <= 0.0 {
            return Err(Error::NonPositiveSteps { axis: id });
        }
        let limits =
            self.limits_mut(id).ok_or(Error::UnknownAxis { axis: id })?;
        limits.steps_per_unit = value;
        Ok(())
    }
}
