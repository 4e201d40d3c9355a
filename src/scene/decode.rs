use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use crate::foundation::core::BezPath;
use crate::foundation::error::{SceneprintError, SceneprintResult};
use crate::scene::store::{PreparedImage, PreparedSvg};

/// Decode encoded image bytes and convert to premultiplied RGBA8.
pub fn decode_image(bytes: &[u8]) -> SceneprintResult<PreparedImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

/// Parse SVG bytes into a prepared `usvg` tree.
///
/// `resources_dir` resolves relative `href`s inside the document; text nodes
/// fall back to system fonts.
pub fn parse_svg(bytes: &[u8], resources_dir: Option<&Path>) -> SceneprintResult<PreparedSvg> {
    let mut fontdb = usvg::fontdb::Database::new();
    fontdb.load_system_fonts();

    let opts = usvg::Options {
        resources_dir: resources_dir.map(|p| p.to_path_buf()),
        fontdb: Arc::new(fontdb),
        ..Default::default()
    };

    let tree = usvg::Tree::from_data(bytes, &opts).context("parse svg tree")?;
    Ok(PreparedSvg {
        tree: Arc::new(tree),
    })
}

/// Parse an SVG path `d` attribute string into a Bezier path.
pub fn parse_svg_path(d: &str) -> SceneprintResult<BezPath> {
    let d = d.trim();
    if d.is_empty() {
        return Err(SceneprintError::validation("svg_path_d must be non-empty"));
    }

    BezPath::from_svg(d)
        .map_err(|e| SceneprintError::validation(format!("invalid svg_path_d: {e}")))
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/decode.rs"]
mod tests;
