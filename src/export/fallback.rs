use crate::{
    export::encode::RasterResult,
    foundation::error::{SceneprintError, SceneprintResult},
};

/// Fixed dimensions of the tertiary (last-resort) placeholder raster.
pub const TERTIARY_PLACEHOLDER_SIZE: (u32, u32) = (400, 300);

/// Diagnostic text drawn by the secondary placeholder tier.
pub const SECONDARY_DIAGNOSTIC_LINES: [&str; 2] = [
    "Preview could not be rendered",
    "The design contains content that blocks image capture",
];

/// Diagnostic text drawn by the tertiary placeholder tier.
pub const TERTIARY_DIAGNOSTIC_LINE: &str = "Preview unavailable";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Degradation state of the export fallback chain.
///
/// The chain is an explicit state machine with a single transition rule:
/// on failure, advance one state. Modeling it this way keeps the degradation
/// policy testable without forcing real rasterization failures.
pub enum FallbackStage {
    /// Full scene rasterization (fit + transform + render).
    Primary,
    /// Canvas-sized placeholder with diagnostic text; never touches the scene.
    Secondary,
    /// Fixed small placeholder; its failure is terminal.
    Tertiary,
}

impl FallbackStage {
    /// The state to advance to on failure, or `None` when terminal.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Primary => Some(Self::Secondary),
            Self::Secondary => Some(Self::Tertiary),
            Self::Tertiary => None,
        }
    }
}

/// Seam between the chain driver and the tier implementations.
///
/// The production implementation lives in the export pipeline; tests
/// substitute failing tiers to exercise every transition.
pub trait ExportTiers {
    /// Attempt to produce an encoded payload at the given stage.
    fn attempt(&mut self, stage: FallbackStage) -> SceneprintResult<RasterResult>;
}

/// Drive the fallback chain to completion.
///
/// Tiers are attempted strictly in order, each only after the previous tier's
/// attempt failed. There is no retry of a failed tier; failures escalate
/// immediately. If the tertiary tier itself fails, the call terminates with
/// [`SceneprintError::ExportUnavailable`] carrying the last failure; nothing
/// is ever silently substituted.
pub fn run_export_chain(tiers: &mut dyn ExportTiers) -> SceneprintResult<RasterResult> {
    let mut stage = FallbackStage::Primary;
    loop {
        match tiers.attempt(stage) {
            Ok(result) => return Ok(result),
            Err(err) => match stage.next() {
                Some(next) => {
                    tracing::warn!(?stage, %err, "export tier failed; degrading");
                    stage = next;
                }
                None => {
                    return Err(SceneprintError::export_unavailable(format!(
                        "all export tiers failed; last error: {err}"
                    )));
                }
            },
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/fallback.rs"]
mod tests;
