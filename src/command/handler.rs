use super::args::{AxisWord, Request};
use crate::axis::AxisId;
use crate::calibration::{self, apply_extruder_steps, Calibration};
use crate::layer_height::advise;
use crate::planner::PositionRefresh;
use crate::report::report;
use crate::units::UnitSystem;

use ufmt::uWrite;
use ufmt_macros::uDebug;

/// Errors from handling an M92 command.
#[derive(Debug, uDebug, PartialEq, Eq, Copy, Clone)]
pub enum Error {
    /// `T` selected an extruder the machine does not have.
    InvalidExtruder { requested: u8, count: u8 },
    /// A calibration value failed validation; nothing was changed.
    Calibration(calibration::Error),
    /// The output channel failed.
    WriteFailed,
}

impl From<calibration::Error> for Error {
    fn from(error: calibration::Error) -> Self {
        Error::Calibration(error)
    }
}

/// Handles an M92 command.
///
/// Without parameters the current calibration is reported. With axis words
/// the named axes are updated — extrusion words through
/// [apply_extruder_steps] with the `T`-selected extruder — and the
/// planner's positioning is refreshed once afterwards. `H`/`L` request the
/// layer-height advisory when the machine has it.
///
/// The update is atomic: every supplied value is validated before any slot
/// is written, so a rejected command leaves the store untouched and the
/// planner unrefreshed.
///
/// # Parameters
///
/// - `cal`: The calibration store.
/// - `units`: The user's active unit system; axis values in `req` are in
///   these units.
/// - `req`: The parsed command.
/// - `planner`: Receives the positioning refresh after a mutation.
/// - `out`: Console channel for report and advisory output.
pub fn handle<P, W>(
    cal: &mut Calibration,
    units: UnitSystem,
    req: &Request,
    planner: &mut P,
    out: &mut W,
) -> Result<(), Error>
where
    P: PositionRefresh,
    W: uWrite,
{
    let caps = *cal.capabilities();
    let target = match req.target {
        None => 0,
        Some(t) if t < caps.extruder_count => t,
        Some(t) => {
            return Err(Error::InvalidExtruder {
                requested: t,
                count: caps.extruder_count,
            })
        }
    };

    // H and L only exist on machines with the advisor.
    let microsteps = req.microsteps.filter(|_| caps.layer_height_advisor);
    let layer_height = req.layer_height.filter(|_| caps.layer_height_advisor);

    if req.axes.is_empty() && microsteps.is_none() && layer_height.is_none() {
        report(cal, units, true, Some(target), out)
            .map_err(|_| Error::WriteFailed)?;
        return Ok(());
    }

    for &word in &req.axes {
        let (id, value) = resolve(cal, target, units, word);
        if value <= 0.0 {
            return Err(
                calibration::Error::NonPositiveSteps { axis: id }.into()
            );
        }
        if cal.limits(id).is_none() {
            return Err(calibration::Error::UnknownAxis { axis: id }.into());
        }
    }
    for &word in &req.axes {
        match word {
            AxisWord::Linear(axis, value) => cal.set_steps_per_unit(
                AxisId::Linear(axis),
                units.steps_per_unit_from_user(value),
            )?,
            AxisWord::Extruder(value) => apply_extruder_steps(
                cal,
                target,
                units.volumetric_from_user(value),
            )?,
        }
    }
    planner.refresh_positioning();

    let wanted = layer_height.filter(|w| *w > 0.0);
    if microsteps.is_some() || wanted.is_some() {
        advise(cal, microsteps, wanted, out).map_err(|_| Error::WriteFailed)?;
    }

    Ok(())
}

/// Resolves an axis word to its calibration slot and native-unit value.
fn resolve(
    cal: &Calibration,
    target: u8,
    units: UnitSystem,
    word: AxisWord,
) -> (AxisId, f32) {
    match word {
        AxisWord::Linear(axis, value) => (
            AxisId::Linear(axis),
            units.steps_per_unit_from_user(value),
        ),
        AxisWord::Extruder(value) => (
            cal.extruder_axis(target),
            units.volumetric_from_user(value),
        ),
    }
}
