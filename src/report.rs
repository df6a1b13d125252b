use crate::axis::AxisId;
use crate::calibration::Calibration;
use crate::units::{Fixed2, UnitSystem};

use ufmt::{uwrite, uwriteln, uWrite};

/// Prints the current steps-per-unit calibration.
///
/// One line covers the linear axes (and the shared extrusion slot, when
/// extruder factors are not distinct), values converted to the active user
/// units. With distinct extruder factors one further line is printed per
/// extruder index: every index when `extruder` is `None`, otherwise only
/// the matching one.
///
/// Reading only; repeated calls produce identical output.
pub fn report<W>(
    cal: &Calibration,
    units: UnitSystem,
    echo: bool,
    extruder: Option<u8>,
    out: &mut W,
) -> Result<(), W::Error>
where
    W: uWrite,
{
    let caps = cal.capabilities();

    line_start(echo, out)?;
    uwrite!(out, " M92")?;
    for &axis in cal.linear_axes() {
        if let Some(value) = cal.steps_per_unit(AxisId::Linear(axis)) {
            uwrite!(
                out,
                " {}{}",
                axis.letter(),
                Fixed2(units.steps_per_unit_to_user(value))
            )?;
        }
    }
    if caps.extruder_count > 0 && !caps.distinct_e_factors {
        if let Some(value) = cal.steps_per_unit(AxisId::Extruder(0)) {
            uwrite!(out, " E{}", Fixed2(units.volumetric_to_user(value)))?;
        }
    }
    out.write_char('\n')?;

    if caps.distinct_e_factors {
        for index in 0..caps.extruder_count {
            if let Some(filter) = extruder {
                if filter != index {
                    continue;
                }
            }
            let Some(value) = cal.steps_per_unit(AxisId::Extruder(index))
            else {
                continue;
            };
            line_start(echo, out)?;
            uwriteln!(
                out,
                " M92 T{} E{}",
                index,
                Fixed2(units.volumetric_to_user(value))
            )?;
        }
    }

    Ok(())
}

/// Starts a report line: echo marker, or a plain continuation space.
fn line_start<W>(echo: bool, out: &mut W) -> Result<(), W::Error>
where
    W: uWrite,
{
    if echo {
        out.write_str("echo:")
    } else {
        out.write_char(' ')
    }
}
