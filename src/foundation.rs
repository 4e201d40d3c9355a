/// Core geometry, canvas and color types plus the scale-up constants.
pub mod core;
/// Error taxonomy and result alias.
pub mod error;
