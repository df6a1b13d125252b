use crate::axis::{AxisId, LinearAxis};
use crate::calibration::Calibration;
use crate::units::{to_fixed, Fixed4};

use ufmt::{uwrite, uWrite};

/// Default Z microstepping when no `H` value is supplied.
pub const Z_MICROSTEPS: u16 = 16;

/// Height values are compared and floored at this resolution.
const HEIGHT_SCALE: u32 = 10_000;

/// Prints achievable layer heights for the current Z calibration.
///
/// `z_full_step_mm` is the height of `micro_steps` microsteps at the Z
/// axis's steps-per-unit. When a desired height is given, the nearest
/// achievable height at or below it is reported, plus the next height
/// above whenever the desired value is not an exact multiple. Exactness is
/// decided on values scaled to 1/10000 mm, so decimal multiples are
/// recognized despite float representation.
///
/// Reading only; no calibration value changes.
pub fn advise<W>(
    cal: &Calibration,
    microsteps: Option<u16>,
    desired: Option<f32>,
    out: &mut W,
) -> Result<(), W::Error>
where
    W: uWrite,
{
    let micro_steps = match microsteps {
        Some(h) if h > 0 => h,
        _ => Z_MICROSTEPS,
    };
    let Some(step_mm) = cal.steps_to_unit(AxisId::Linear(LinearAxis::Z))
    else {
        return Ok(());
    };
    let z_full_step_mm = micro_steps as f32 * step_mm;

    uwrite!(out, "echo:")?;
    out.write_str("{ ")?;
    uwrite!(
        out,
        "micro_steps:{}, z_full_step_mm:{}",
        micro_steps,
        Fixed4(z_full_step_mm)
    )?;

    if let Some(wanted) = desired {
        let step_scaled = to_fixed(z_full_step_mm, HEIGHT_SCALE);
        let wanted_scaled = to_fixed(wanted, HEIGHT_SCALE);
        if step_scaled > 0 {
            let whole = wanted_scaled / step_scaled;
            let best = whole as f32 * z_full_step_mm;
            uwrite!(out, ", best:[{}", Fixed4(best))?;
            if whole * step_scaled != wanted_scaled {
                uwrite!(out, ",{}", Fixed4(best + z_full_step_mm))?;
            }
            out.write_char(']')?;
        }
    }

    out.write_str(" }\n")?;
    Ok(())
}
