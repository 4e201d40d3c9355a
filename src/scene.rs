/// Image decoding and SVG/path parsing.
pub mod decode;
/// Serde scene model and validation.
pub mod model;
/// Front-loaded per-object content preparation.
pub mod store;
