use std::path::Path;

use rayon::prelude::*;

use crate::{
    export::encode::{RasterFormat, RasterResult, encode_raster},
    export::fallback::{
        ExportTiers, FallbackStage, SECONDARY_DIAGNOSTIC_LINES, TERTIARY_DIAGNOSTIC_LINE,
        TERTIARY_PLACEHOLDER_SIZE, run_export_chain,
    },
    fit::apply::apply_fit,
    fit::bounds::aggregate_bounds,
    fit::solver::solve_fit,
    foundation::core::{Color, TARGET_FILL_RATIO, resolution_multiplier},
    foundation::error::{SceneprintError, SceneprintResult},
    render::classify::has_transparency,
    render::placeholder::diagnostic_placeholder,
    render::raster::{CpuRasterizer, FrameRGBA, RasterOpts, Rasterizer},
    scene::model::Scene,
    scene::store::PreparedObjectStore,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// Requested export background handling.
pub enum BackgroundMode {
    /// No explicit request: the transparency classifier picks the output
    /// format from rendered alpha. Intended for the HTML-thumbnail use case.
    #[default]
    Auto,
    /// Force the opaque path: solid background fill, lossy opaque output.
    Opaque,
    /// Force alpha-capable output with no background fill, regardless of what
    /// the classifier would have said.
    Transparent,
}

#[derive(Clone, Copy, Debug, Default, serde::Serialize, serde::Deserialize)]
/// Immutable per-call export parameters.
pub struct ExportRequest {
    /// Background handling and output-format selection.
    #[serde(default)]
    pub background: BackgroundMode,
    /// Rasterize at print density (300 DPI) instead of display density.
    #[serde(default)]
    pub high_resolution: bool,
}

/// Production tier set driving the fallback chain for one scene export.
struct SceneExportTiers<'a> {
    scene: &'a mut Scene,
    store: &'a PreparedObjectStore,
    rasterizer: &'a mut dyn Rasterizer,
    request: &'a ExportRequest,
}

impl ExportTiers for SceneExportTiers<'_> {
    fn attempt(&mut self, stage: FallbackStage) -> SceneprintResult<RasterResult> {
        match stage {
            FallbackStage::Primary => self.primary(),
            FallbackStage::Secondary => self.placeholder(
                self.scene.canvas.width,
                self.scene.canvas.height,
                &SECONDARY_DIAGNOSTIC_LINES,
            ),
            FallbackStage::Tertiary => {
                let (w, h) = TERTIARY_PLACEHOLDER_SIZE;
                self.placeholder(w, h, &[TERTIARY_DIAGNOSTIC_LINE])
            }
        }
    }
}

impl SceneExportTiers<'_> {
    /// Tier 1: auto-fit the content, then rasterize the full scene.
    fn primary(&mut self) -> SceneprintResult<RasterResult> {
        match aggregate_bounds(self.scene, self.store)? {
            None => {
                // No content: canvas exported unmodified, solver never invoked.
                tracing::debug!("scene has no objects; skipping fit");
            }
            Some(bounds) => {
                match solve_fit(bounds, self.scene.canvas, TARGET_FILL_RATIO) {
                    Ok(fit) => apply_fit(self.scene, fit),
                    Err(SceneprintError::DegenerateBounds(reason)) => {
                        // Zero-area content: recovered locally by exporting as-is.
                        tracing::debug!(%reason, "degenerate bounds; exporting scene as-is");
                    }
                    Err(other) => return Err(other),
                }
            }
        }

        let opts = RasterOpts {
            background: match self.request.background {
                BackgroundMode::Opaque => {
                    Some(self.scene.background.unwrap_or(Color::WHITE))
                }
                BackgroundMode::Transparent | BackgroundMode::Auto => None,
            },
            multiplier: resolution_multiplier(self.request.high_resolution),
        };

        let frame = if self.request.background == BackgroundMode::Transparent {
            // Swap the background out for the capture and put it back even when
            // rasterization fails, so a retained scene instance is never left
            // corrupted for a subsequent caller.
            let saved = self.scene.background.take();
            let result = self.rasterizer.rasterize(self.scene, self.store, &opts);
            self.scene.background = saved;
            result?
        } else {
            self.rasterizer.rasterize(self.scene, self.store, &opts)?
        };

        encode_raster(&frame, select_format(self.request.background, &frame))
    }

    /// Tiers 2 and 3: diagnostic placeholder sized by the caller, filled per
    /// the requested background mode. Never touches the scene objects.
    fn placeholder(
        &mut self,
        width: u32,
        height: u32,
        lines: &[&str],
    ) -> SceneprintResult<RasterResult> {
        let background = match self.request.background {
            BackgroundMode::Transparent => None,
            BackgroundMode::Opaque | BackgroundMode::Auto => {
                Some(self.scene.background.unwrap_or(Color::WHITE))
            }
        };
        let frame = diagnostic_placeholder(width, height, background, lines)?;
        encode_raster(&frame, select_format(self.request.background, &frame))
    }
}

/// Output format for a rendered frame under the requested background mode.
///
/// Explicit requests always win; the classifier only decides for `Auto`.
fn select_format(mode: BackgroundMode, frame: &FrameRGBA) -> RasterFormat {
    match mode {
        BackgroundMode::Transparent => RasterFormat::Png,
        BackgroundMode::Opaque => RasterFormat::Jpeg,
        BackgroundMode::Auto => {
            if has_transparency(frame) {
                RasterFormat::Png
            } else {
                RasterFormat::Jpeg
            }
        }
    }
}

/// Export a scene with a caller-provided rasterizer.
///
/// The scene is mutated in place by the fit step; it must be a disposable
/// instance (see [`Scene`]). Prefer [`export_scene`] or [`export_scene_str`]
/// unless a custom [`Rasterizer`] is needed.
#[tracing::instrument(skip(scene, store, rasterizer))]
pub fn export_scene_with(
    scene: &mut Scene,
    store: &PreparedObjectStore,
    rasterizer: &mut dyn Rasterizer,
    request: &ExportRequest,
) -> SceneprintResult<RasterResult> {
    let mut tiers = SceneExportTiers {
        scene,
        store,
        rasterizer,
        request,
    };
    run_export_chain(&mut tiers)
}

/// Export an owned, already-deserialized scene.
///
/// Takes the scene by value: export is destructive to its working copy, so the
/// signature enforces the "disposable instance" precondition at the type
/// level.
pub fn export_scene(
    mut scene: Scene,
    request: &ExportRequest,
    assets_root: impl AsRef<Path>,
) -> SceneprintResult<RasterResult> {
    scene.validate()?;
    let store = PreparedObjectStore::prepare(&scene, assets_root.as_ref())?;
    let mut rasterizer = CpuRasterizer::new();
    export_scene_with(&mut scene, &store, &mut rasterizer, request)
}

/// Deserialize a serialized scene string and export it.
///
/// The pipeline consumes its own deserialized copy, never the live editor
/// scene, which satisfies the mutation-safety rule by construction.
#[tracing::instrument(skip(json, assets_root))]
pub fn export_scene_str(
    json: &str,
    request: &ExportRequest,
    assets_root: impl AsRef<Path>,
) -> SceneprintResult<RasterResult> {
    let scene: Scene = serde_json::from_str(json)
        .map_err(|e| SceneprintError::serde(format!("parse scene json: {e}")))?;
    export_scene(scene, request, assets_root)
}

/// Export independent scenes in parallel.
///
/// Each scene gets its own prepared store and rasterizer, so exports never
/// share mutable state; results keep input order.
pub fn export_scenes_parallel(
    scenes: Vec<Scene>,
    request: &ExportRequest,
    assets_root: impl AsRef<Path> + Sync,
) -> SceneprintResult<Vec<RasterResult>> {
    scenes
        .into_par_iter()
        .map(|scene| export_scene(scene, request, assets_root.as_ref()))
        .collect()
}

/// Best-effort thumbnail compression.
///
/// Decodes `bytes`, downscales so the longer edge is at most `max_edge_px`,
/// and re-encodes per the transparency classifier (alpha → PNG, opaque →
/// JPEG). On any failure the original bytes are returned unchanged: the
/// thumbnail path's contract is explicitly best-effort, preferring the
/// unprocessed original over a hard error. Flagged for product-level review
/// since it can mask genuine decode failures.
pub fn compress_thumbnail(bytes: &[u8], max_edge_px: u32) -> Vec<u8> {
    match try_compress_thumbnail(bytes, max_edge_px) {
        Ok(out) => out.bytes,
        Err(err) => {
            tracing::warn!(%err, "thumbnail compression failed; returning original bytes");
            bytes.to_vec()
        }
    }
}

fn try_compress_thumbnail(bytes: &[u8], max_edge_px: u32) -> SceneprintResult<RasterResult> {
    use anyhow::Context as _;

    if max_edge_px == 0 {
        return Err(SceneprintError::validation("max_edge_px must be > 0"));
    }

    let decoded = image::load_from_memory(bytes).context("decode thumbnail source")?;
    let scaled = decoded.thumbnail(max_edge_px, max_edge_px);
    let rgba = scaled.to_rgba8();
    let (width, height) = rgba.dimensions();

    let frame = FrameRGBA {
        width,
        height,
        data: rgba.into_raw(),
        premultiplied: false,
    };
    let format = if has_transparency(&frame) {
        RasterFormat::Png
    } else {
        RasterFormat::Jpeg
    };
    encode_raster(&frame, format)
}

#[cfg(test)]
#[path = "../../tests/unit/export/pipeline.rs"]
mod tests;
