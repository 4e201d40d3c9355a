use std::fmt::Write as _;
use std::sync::Arc;

use anyhow::Context;

use crate::{
    foundation::core::Color,
    foundation::error::{SceneprintError, SceneprintResult},
    render::raster::FrameRGBA,
};

/// Build a diagnostic placeholder raster: an optional solid fill plus a short
/// stack of centered text lines.
///
/// Used by the degraded export tiers, so it deliberately avoids the scene
/// rasterizer: the placeholder is a standalone SVG document rendered with
/// system fonts, touching none of the original scene objects.
pub fn diagnostic_placeholder(
    width: u32,
    height: u32,
    background: Option<Color>,
    lines: &[&str],
) -> SceneprintResult<FrameRGBA> {
    if width == 0 || height == 0 {
        return Err(SceneprintError::surface_creation(
            "placeholder dimensions must be > 0",
        ));
    }

    let svg = placeholder_svg(width, height, background, lines);

    let mut fontdb = usvg::fontdb::Database::new();
    fontdb.load_system_fonts();
    let opts = usvg::Options {
        fontdb: Arc::new(fontdb),
        ..Default::default()
    };
    let tree =
        usvg::Tree::from_str(&svg, &opts).context("parse diagnostic placeholder svg")?;

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| SceneprintError::surface_creation("failed to allocate placeholder pixmap"))?;
    resvg::render(&tree, resvg::tiny_skia::Transform::identity(), &mut pixmap.as_mut());

    Ok(FrameRGBA {
        width,
        height,
        data: pixmap.data().to_vec(),
        premultiplied: true,
    })
}

fn placeholder_svg(width: u32, height: u32, background: Option<Color>, lines: &[&str]) -> String {
    let mut svg = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" \
         viewBox=\"0 0 {width} {height}\">"
    );
    if let Some(c) = background {
        let _ = write!(
            svg,
            "<rect width=\"100%\" height=\"100%\" fill=\"#{:02x}{:02x}{:02x}\" \
             fill-opacity=\"{:.3}\"/>",
            c.r,
            c.g,
            c.b,
            f64::from(c.a) / 255.0
        );
    }

    let font_size = (f64::from(height) / 18.0).clamp(12.0, 24.0);
    let line_gap = font_size * 1.5;
    let total = line_gap * lines.len() as f64;
    let mut y = f64::from(height) / 2.0 - total / 2.0 + font_size;
    for line in lines {
        let _ = write!(
            svg,
            "<text x=\"50%\" y=\"{y:.1}\" text-anchor=\"middle\" \
             font-family=\"sans-serif\" font-size=\"{font_size:.1}\" \
             fill=\"#444444\">{}</text>",
            escape_xml(line)
        );
        y += line_gap;
    }

    svg.push_str("</svg>");
    svg
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/placeholder.rs"]
mod tests;
