/// Transparency classification over rendered alpha.
pub mod classify;
/// Diagnostic placeholder surfaces for degraded export tiers.
pub mod placeholder;
/// Rasterizer seam and the CPU backend.
pub mod raster;
/// SVG rasterization helpers.
pub mod svg;
