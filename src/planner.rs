/// Hook into the external motion planner.
///
/// The planner caches values derived from steps-per-unit; the command
/// handler calls this once after a calibration change so those caches are
/// recomputed.
pub trait PositionRefresh {
    /// Recomputes planner state derived from the calibration store.
    fn refresh_positioning(&mut self);
}
