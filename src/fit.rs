/// In-place transform application with clip lockstep.
pub mod apply;
/// Bounding-box aggregation over rendered object extents.
pub mod bounds;
/// Fit transform solver (uniform scale, centered).
pub mod solver;
