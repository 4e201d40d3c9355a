//! Sceneprint turns a serialized vector scene into a print-ready encoded image.
//!
//! The pipeline, in order:
//!
//! 1. **Prepare**: deserialize the scene and front-load all external IO
//!    (image decode, SVG parse, text shaping) into a [`PreparedObjectStore`]
//! 2. **Fit**: aggregate content bounds, solve a uniform scale + offset that
//!    centers the content at 90% canvas fill, and apply it in place (clip
//!    regions move in lockstep with their owners)
//! 3. **Rasterize**: render via the CPU backend at display resolution, or at
//!    print density (300 DPI vs. 72 DPI) for high-resolution exports
//! 4. **Encode**: PNG when alpha survives (or is forced), JPEG otherwise
//!
//! When rasterization is blocked, the export degrades through a strict
//! three-tier fallback chain ([`run_export_chain`]) ending in a fixed
//! diagnostic placeholder; only when even that fails does the call error out.
//!
//! Key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **No IO in renderers**: external IO is front-loaded in
//!   [`PreparedObjectStore`].
//! - **Disposable scenes**: the fit step mutates scene geometry in place, so
//!   export always operates on a scene instance it owns, never the live
//!   editor document.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod export;
mod fit;
mod foundation;
mod render;
mod scene;

pub use export::encode::{JPEG_QUALITY, RasterFormat, RasterResult, encode_raster};
pub use export::fallback::{
    ExportTiers, FallbackStage, SECONDARY_DIAGNOSTIC_LINES, TERTIARY_DIAGNOSTIC_LINE,
    TERTIARY_PLACEHOLDER_SIZE, run_export_chain,
};
pub use export::pipeline::{
    BackgroundMode, ExportRequest, compress_thumbnail, export_scene, export_scene_str,
    export_scene_with, export_scenes_parallel,
};
pub use fit::apply::apply_fit;
pub use fit::bounds::{aggregate_bounds, rendered_rect};
pub use fit::solver::{FitTransform, solve_fit};
pub use foundation::core::{
    Affine, BezPath, Canvas, Color, DISPLAY_DPI, PRINT_DPI, Point, Rect, TARGET_FILL_RATIO, Vec2,
    resolution_multiplier,
};
pub use foundation::error::{SceneprintError, SceneprintResult};
pub use render::classify::has_transparency;
pub use render::placeholder::diagnostic_placeholder;
pub use render::raster::{CpuRasterizer, FrameRGBA, RasterOpts, Rasterizer, object_affine};
pub use render::svg::{rasterize_svg_to_premul_rgba8, svg_raster_params};
pub use scene::decode::{decode_image, parse_svg, parse_svg_path};
pub use scene::model::{ClipRegion, ClipShape, ObjectKind, Scene, SceneObject};
pub use scene::store::{
    PreparedContent, PreparedImage, PreparedObjectStore, PreparedPath, PreparedSvg, PreparedText,
    TextLayoutEngine, normalize_rel_path,
};
