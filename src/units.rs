use ufmt::{uDisplay, uWrite, Formatter};
use ufmt_macros::uDebug;

/// Unit system the user is currently working in.
///
/// Calibration values are stored natively in steps per millimeter (or per
/// cubic millimeter for extrusion). Inch mode converts on the way in and
/// out.
#[derive(Debug, uDebug, PartialEq, Eq, Copy, Clone)]
pub enum UnitSystem {
    Millimeters,
    Inches,
}

impl UnitSystem {
    const MM_PER_INCH: f32 = 25.4;

    /// Millimeters per user linear unit.
    fn linear_factor(&self) -> f32 {
        use UnitSystem::*;
        match self {
            Millimeters => 1.0,
            Inches => Self::MM_PER_INCH,
        }
    }

    /// Cubic millimeters per user volumetric unit.
    fn volumetric_factor(&self) -> f32 {
        let f = self.linear_factor();
        f * f * f
    }

    /// Converts a native steps-per-mm value for display in user units.
    pub fn steps_per_unit_to_user(&self, value: f32) -> f32 {
        value * self.linear_factor()
    }

    /// Converts a user steps-per-unit value to native steps-per-mm.
    pub fn steps_per_unit_from_user(&self, value: f32) -> f32 {
        value / self.linear_factor()
    }

    /// Converts a native volumetric steps value for display in user units.
    pub fn volumetric_to_user(&self, value: f32) -> f32 {
        value * self.volumetric_factor()
    }

    /// Converts a user volumetric steps value to the native convention.
    pub fn volumetric_from_user(&self, value: f32) -> f32 {
        value / self.volumetric_factor()
    }
}

/// Converts a non-negative value to a scaled integer, rounding to nearest.
///
/// `scale` is a power of ten; `scale == 100` yields hundredths. Negative
/// input clamps to zero, since all calibration values are validated
/// positive before display.
pub fn to_fixed(value: f32, scale: u32) -> u32 {
    if value <= 0.0 {
        0
    } else {
        (value * scale as f32 + 0.5) as u32
    }
}

/// Non-negative value rendered with two decimal places.
#[derive(Debug, PartialEq, Copy, Clone)]
pub struct Fixed2(pub f32);

impl uDisplay for Fixed2 {
    fn fmt<W>(&self, f: &mut Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        udisplay_fixed(to_fixed(self.0, 100), 100, f)
    }
}

/// Non-negative value rendered with four decimal places.
#[derive(Debug, PartialEq, Copy, Clone)]
pub struct Fixed4(pub f32);

impl uDisplay for Fixed4 {
    fn fmt<W>(&self, f: &mut Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        udisplay_fixed(to_fixed(self.0, 10_000), 10_000, f)
    }
}

/// Writes a scaled integer as a decimal with `scale` fractional resolution.
fn udisplay_fixed<W>(
    scaled: u32,
    scale: u32,
    f: &mut Formatter<'_, W>,
) -> Result<(), W::Error>
where
    W: uWrite + ?Sized,
{
    let int_part = scaled / scale;
    let frc_part = scaled % scale;

    int_part.fmt(f)?;
    f.write_char('.')?;

    // Zero-pad the fractional part up to its full width.
    let mut place = scale / 10;
    while place > 1 && frc_part < place {
        f.write_char('0')?;
        place /= 10;
    }
    frc_part.fmt(f)?;

    Ok(())
}
