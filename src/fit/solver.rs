use crate::{
    foundation::core::{Canvas, Rect},
    foundation::error::{SceneprintError, SceneprintResult},
};

/// Uniform scale and translation that fit content bounds into the canvas.
///
/// Invariant: applying the transform to the aggregate bounds yields a
/// rectangle centered in the canvas whose larger dimension equals
/// `fill_ratio x canvas dimension`, with the aspect ratio unchanged.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FitTransform {
    /// Uniform scale factor, always > 0.
    pub scale: f64,
    /// Horizontal translation in logical units, applied after scaling.
    pub offset_x: f64,
    /// Vertical translation in logical units, applied after scaling.
    pub offset_y: f64,
}

/// Solve the fit transform for `bounds` inside `canvas`.
///
/// The scale is `min(scale_x_needed, scale_y_needed)` so content is never
/// stretched independently per axis; the offsets place the scaled bounds
/// center on the canvas center.
///
/// Zero-width or zero-height bounds (degenerate single-point or single-line
/// content) fail with [`SceneprintError::DegenerateBounds`] rather than divide
/// by zero; the caller treats this as "skip fit, export as-is".
pub fn solve_fit(bounds: Rect, canvas: Canvas, fill_ratio: f64) -> SceneprintResult<FitTransform> {
    let bw = bounds.width();
    let bh = bounds.height();
    if bw <= 0.0 || bh <= 0.0 {
        return Err(SceneprintError::degenerate_bounds(format!(
            "content bounds {bw}x{bh} cannot be fitted"
        )));
    }

    let cw = f64::from(canvas.width);
    let ch = f64::from(canvas.height);

    let scale_x = (cw * fill_ratio) / bw;
    let scale_y = (ch * fill_ratio) / bh;
    let scale = scale_x.min(scale_y);

    let center = bounds.center();
    let offset_x = cw / 2.0 - center.x * scale;
    let offset_y = ch / 2.0 - center.y * scale;

    Ok(FitTransform {
        scale,
        offset_x,
        offset_y,
    })
}

impl FitTransform {
    /// Apply the transform to a rectangle (scale, then translate).
    pub fn apply_to_rect(self, r: Rect) -> Rect {
        Rect::new(
            r.x0 * self.scale + self.offset_x,
            r.y0 * self.scale + self.offset_y,
            r.x1 * self.scale + self.offset_x,
            r.y1 * self.scale + self.offset_y,
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/fit/solver.rs"]
mod tests;
