use super::store::{Calibration, Error};

/// Values below this are treated as being in the legacy volumetric
/// convention and trigger the limit rescale.
pub const VOLUMETRIC_RESCALE_THRESHOLD: f32 = 20.0;

/// Updates an extruder's steps-per-unit, rescaling its dependent limits.
///
/// When the machine opts in to `volumetric_rescale` and the new value lies
/// below [VOLUMETRIC_RESCALE_THRESHOLD], the extruder's max feedrate, max
/// acceleration and (with `classic_e_jerk`) classic jerk are multiplied by
/// `old / new`, keeping the physical limits constant across the change of
/// calibration convention. The scale is taken against the current limits,
/// so applying a sub-threshold value repeatedly compounds it.
///
/// # Parameters
///
/// - `cal`: The calibration store to update.
/// - `extruder`: Extruder index; resolved to a slot via
///   [Calibration::extruder_axis].
/// - `new_steps_per_unit`: Replacement steps-per-unit value. Must be
///   strictly positive; zero would otherwise put an infinite factor into
///   the limits.
pub fn apply_extruder_steps(
    cal: &mut Calibration,
    extruder: u8,
    new_steps_per_unit: f32,
) -> Result<(), Error> {
    let id = cal.extruder_axis(extruder);
    if new_steps_per_unit <= 0.0 {
        return Err(Error::NonPositiveSteps { axis: id });
    }

    let rescale = cal.capabilities().volumetric_rescale
        && new_steps_per_unit < VOLUMETRIC_RESCALE_THRESHOLD;
    let scale_jerk = cal.capabilities().classic_e_jerk;

    let limits = cal.limits_mut(id).ok_or(Error::UnknownAxis { axis: id })?;
    if rescale {
        let factor = limits.steps_per_unit / new_steps_per_unit;
        limits.max_feedrate *= factor;
        limits.max_acceleration *= factor;
        if scale_jerk {
            limits.classic_jerk *= factor;
        }
    }
    limits.steps_per_unit = new_steps_per_unit;
    Ok(())
}

#[cfg(test)]
mod test {
    use super::super::store::test::{caps, typical};
    use super::*;
    use crate::axis::AxisId;
    use proptest::prelude::*;

    #[test]
    fn test_sub_threshold_rescales_limits() {
        let mut cal = typical(caps());
        let e = AxisId::Extruder(0);
        let before = *cal.limits(e).unwrap();

        apply_extruder_steps(&mut cal, 0, 10.0).unwrap();

        let after = cal.limits(e).unwrap();
        // old = 500, new = 10 -> factor = 50.
        assert_eq!(10.0, after.steps_per_unit);
        assert_eq!(before.max_feedrate * 50.0, after.max_feedrate);
        assert_eq!(before.max_acceleration * 50.0, after.max_acceleration);
        assert_eq!(before.classic_jerk * 50.0, after.classic_jerk);
    }

    #[test]
    fn test_above_threshold_sets_without_rescale() {
        let mut cal = typical(caps());
        let e = AxisId::Extruder(0);
        let before = *cal.limits(e).unwrap();

        apply_extruder_steps(&mut cal, 0, 100.0).unwrap();

        let after = cal.limits(e).unwrap();
        assert_eq!(100.0, after.steps_per_unit);
        assert_eq!(before.max_feedrate, after.max_feedrate);
        assert_eq!(before.max_acceleration, after.max_acceleration);
        assert_eq!(before.classic_jerk, after.classic_jerk);
    }

    #[test]
    fn test_threshold_boundary_does_not_rescale() {
        let mut cal = typical(caps());
        let e = AxisId::Extruder(0);
        let before = *cal.limits(e).unwrap();

        apply_extruder_steps(&mut cal, 0, VOLUMETRIC_RESCALE_THRESHOLD)
            .unwrap();

        let after = cal.limits(e).unwrap();
        assert_eq!(VOLUMETRIC_RESCALE_THRESHOLD, after.steps_per_unit);
        assert_eq!(before.max_feedrate, after.max_feedrate);
    }

    #[test]
    fn test_zero_rejected() {
        let mut cal = typical(caps());
        let e = AxisId::Extruder(0);
        let before = *cal.limits(e).unwrap();

        assert_eq!(
            Err(Error::NonPositiveSteps { axis: e }),
            apply_extruder_steps(&mut cal, 0, 0.0)
        );
        assert_eq!(before, *cal.limits(e).unwrap());
    }

    #[test]
    fn test_rescale_opt_out() {
        let mut cal = typical(crate::Capabilities {
            volumetric_rescale: false,
            ..caps()
        });
        let e = AxisId::Extruder(0);
        let before = *cal.limits(e).unwrap();

        apply_extruder_steps(&mut cal, 0, 10.0).unwrap();

        let after = cal.limits(e).unwrap();
        assert_eq!(10.0, after.steps_per_unit);
        assert_eq!(before.max_feedrate, after.max_feedrate);
        assert_eq!(before.max_acceleration, after.max_acceleration);
    }

    #[test]
    fn test_jerk_untouched_without_classic_e_jerk() {
        let mut cal = typical(crate::Capabilities {
            classic_e_jerk: false,
            ..caps()
        });
        let e = AxisId::Extruder(0);
        let before = *cal.limits(e).unwrap();

        apply_extruder_steps(&mut cal, 0, 10.0).unwrap();

        let after = cal.limits(e).unwrap();
        assert_eq!(before.classic_jerk, after.classic_jerk);
        assert_eq!(before.max_feedrate * 50.0, after.max_feedrate);
    }

    #[test]
    fn test_distinct_factors_touch_only_target() {
        let mut cal = typical(crate::Capabilities {
            extruder_count: 3,
            distinct_e_factors: true,
            ..caps()
        });
        let before = *cal.limits(AxisId::Extruder(0)).unwrap();

        apply_extruder_steps(&mut cal, 1, 10.0).unwrap();

        assert_eq!(before, *cal.limits(AxisId::Extruder(0)).unwrap());
        assert_eq!(before, *cal.limits(AxisId::Extruder(2)).unwrap());
        assert_eq!(
            10.0,
            cal.limits(AxisId::Extruder(1)).unwrap().steps_per_unit
        );
    }

    #[test]
    fn test_out_of_range_extruder_with_distinct_factors() {
        let mut cal = typical(crate::Capabilities {
            extruder_count: 3,
            distinct_e_factors: true,
            ..caps()
        });
        assert_eq!(
            Err(Error::UnknownAxis {
                axis: AxisId::Extruder(5)
            }),
            apply_extruder_steps(&mut cal, 5, 100.0)
        );
    }

    proptest! {
        /// The rescale keeps the physical feedrate limit constant: the
        /// limit expressed in steps (feedrate x steps-per-unit) is the
        /// same before and after.
        #[test]
        fn test_rescale_preserves_physical_limits(new in 0.1f32..20.0) {
            let mut cal = typical(caps());
            let e = AxisId::Extruder(0);
            let before = *cal.limits(e).unwrap();
            let physical = before.max_feedrate * before.steps_per_unit;

            apply_extruder_steps(&mut cal, 0, new).unwrap();

            let after = cal.limits(e).unwrap();
            let physical_after = after.max_feedrate * after.steps_per_unit;
            prop_assert!(
                (physical_after - physical).abs() <= physical * 1e-4
            );
        }
    }
}
