/// Convenience result type used across the crate.
pub type SceneprintResult<T> = Result<T, SceneprintError>;

/// Top-level error taxonomy used by the export pipeline.
///
/// The recovery policy per variant:
///
/// - [`DegenerateBounds`](SceneprintError::DegenerateBounds) is recovered locally
///   by skipping the fit step and exporting the canvas as-is.
/// - [`RasterizationBlocked`](SceneprintError::RasterizationBlocked) and
///   [`SurfaceCreation`](SceneprintError::SurfaceCreation) escalate one tier in
///   the export fallback chain.
/// - [`ExportUnavailable`](SceneprintError::ExportUnavailable) is terminal: the
///   chain has no further tier to advance to.
#[derive(thiserror::Error, Debug)]
pub enum SceneprintError {
    /// Invalid user-provided scene data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Aggregate content bounds have zero width or height; fitting would divide by zero.
    #[error("degenerate bounds: {0}")]
    DegenerateBounds(String),

    /// Pixel readback was refused (readback-protected content on the raster surface).
    #[error("rasterization blocked: {0}")]
    RasterizationBlocked(String),

    /// A raster surface could not be allocated or sized.
    #[error("surface creation failed: {0}")]
    SurfaceCreation(String),

    /// Every fallback tier failed; no export output could be produced.
    #[error("export unavailable: {0}")]
    ExportUnavailable(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SceneprintError {
    /// Build a [`SceneprintError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`SceneprintError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Build a [`SceneprintError::DegenerateBounds`] value.
    pub fn degenerate_bounds(msg: impl Into<String>) -> Self {
        Self::DegenerateBounds(msg.into())
    }

    /// Build a [`SceneprintError::RasterizationBlocked`] value.
    pub fn rasterization_blocked(msg: impl Into<String>) -> Self {
        Self::RasterizationBlocked(msg.into())
    }

    /// Build a [`SceneprintError::SurfaceCreation`] value.
    pub fn surface_creation(msg: impl Into<String>) -> Self {
        Self::SurfaceCreation(msg.into())
    }

    /// Build a [`SceneprintError::ExportUnavailable`] value.
    pub fn export_unavailable(msg: impl Into<String>) -> Self {
        Self::ExportUnavailable(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
