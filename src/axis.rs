use ufmt_macros::uDebug;

/// Linear axis letters the machine may be configured with.
///
/// Which of these are actually present on a machine is decided when the
/// [crate::Calibration] store is built; X, Y and Z are always required.
#[derive(Debug, uDebug, PartialEq, Eq, Copy, Clone)]
pub enum LinearAxis {
    X,
    Y,
    Z,
    I,
    J,
    K,
}

impl LinearAxis {
    /// Returns the command letter for this axis.
    pub fn letter(&self) -> char {
        use LinearAxis::*;
        match self {
            X => 'X',
            Y => 'Y',
            Z => 'Z',
            I => 'I',
            J => 'J',
            K => 'K',
        }
    }
}

/// Key of a calibration slot.
///
/// Extruder slots carry the resolved extruder index. On machines without
/// distinct per-extruder factors every extruder maps to `Extruder(0)`; see
/// [crate::Calibration::extruder_axis].
#[derive(Debug, uDebug, PartialEq, Eq, Copy, Clone)]
pub enum AxisId {
    Linear(LinearAxis),
    Extruder(u8),
}

impl AxisId {
    /// Returns true for extrusion-axis slots.
    pub fn is_extruder(&self) -> bool {
        matches!(self, AxisId::Extruder(_))
    }
}
