use crate::foundation::error::{SceneprintError, SceneprintResult};

/// Compute a conservative raster size for an SVG given the draw transform.
///
/// The returned `(width, height, transform_adjust)` are used as:
///
/// - rasterize the SVG into a pixmap of `(width, height)`
/// - draw the resulting image with `transform_adjust` (not the original transform)
///
/// This avoids blurry upscaling when the SVG is scaled up for print output.
pub fn svg_raster_params(
    tree: &usvg::Tree,
    transform: crate::foundation::core::Affine,
) -> SceneprintResult<(u32, u32, crate::foundation::core::Affine)> {
    fn to_px(v: f32) -> SceneprintResult<u32> {
        if !v.is_finite() || v <= 0.0 {
            return Err(SceneprintError::validation("svg has invalid width/height"));
        }
        Ok((v.ceil() as u32).max(1))
    }

    let size = tree.size();
    let base_w = to_px(size.width())?;
    let base_h = to_px(size.height())?;

    let [a, b, c, d, _e, _f] = transform.as_coeffs();
    let sx = (a * a + b * b).sqrt().max(1e-6);
    let sy = (c * c + d * d).sqrt().max(1e-6);

    let w = ((base_w as f64) * sx).ceil().max(1.0) as u32;
    let h = ((base_h as f64) * sy).ceil().max(1.0) as u32;

    // Avoid pathological allocations; print exports already cap out well below this.
    const MAX_DIM: u32 = 16_384;
    if w > MAX_DIM || h > MAX_DIM {
        return Err(SceneprintError::surface_creation(format!(
            "svg raster size too large: {w}x{h} (max {MAX_DIM}x{MAX_DIM})"
        )));
    }

    // The SVG is rasterized with the scale baked in. Adjust the draw transform so
    // pixel-space coordinates map back into the SVG's logical coordinate space.
    let inv = crate::foundation::core::Affine::scale_non_uniform(1.0 / sx, 1.0 / sy);
    let transform_adjust = transform * inv;

    Ok((w, h, transform_adjust))
}

/// Rasterize a parsed SVG tree into premultiplied RGBA8 bytes.
pub fn rasterize_svg_to_premul_rgba8(
    tree: &usvg::Tree,
    width: u32,
    height: u32,
) -> SceneprintResult<Vec<u8>> {
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| SceneprintError::surface_creation("failed to allocate svg pixmap"))?;

    let sx = (width as f32) / tree.size().width();
    let sy = (height as f32) / tree.size().height();
    let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);

    resvg::render(tree, xform, &mut pixmap.as_mut());
    Ok(pixmap.data().to_vec())
}

#[cfg(test)]
#[path = "../../tests/unit/render/svg.rs"]
mod tests;
