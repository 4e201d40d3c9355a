use std::collections::HashMap;

use crate::{
    foundation::core::{Affine, Color},
    foundation::error::{SceneprintError, SceneprintResult},
    render::svg::{rasterize_svg_to_premul_rgba8, svg_raster_params},
    scene::model::{ClipRegion, ClipShape, ObjectKind, Scene, SceneObject},
    scene::store::{PreparedContent, PreparedObjectStore},
};

#[derive(Clone, Debug)]
/// A rasterized frame as raw RGBA8 pixels.
pub struct FrameRGBA {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major pixel bytes.
    pub data: Vec<u8>,
    /// Whether pixel bytes are premultiplied by alpha.
    pub premultiplied: bool,
}

#[derive(Clone, Debug)]
/// Per-call rasterization options.
pub struct RasterOpts {
    /// Surface fill behind the scene; `None` leaves the surface transparent.
    /// Overrides the scene's own background when set.
    pub background: Option<Color>,
    /// Resolution multiplier applied to the raster surface only (see
    /// [`crate::resolution_multiplier`]). Object geometry stays in logical
    /// units.
    pub multiplier: f64,
}

impl Default for RasterOpts {
    fn default() -> Self {
        Self {
            background: None,
            multiplier: 1.0,
        }
    }
}

/// Backend seam for turning a scene into pixels.
///
/// The export fallback chain drives implementations of this trait; tests
/// substitute failing ones to exercise tier transitions without forcing real
/// rasterization failures.
pub trait Rasterizer {
    /// Rasterize `scene` at `opts.multiplier` times the canvas resolution.
    fn rasterize(
        &mut self,
        scene: &Scene,
        store: &PreparedObjectStore,
        opts: &RasterOpts,
    ) -> SceneprintResult<FrameRGBA>;
}

/// CPU rasterizer built on `vello_cpu`.
///
/// Holds per-object paint caches; surfaces themselves are created per call and
/// dropped on every path, success or failure.
#[derive(Default)]
pub struct CpuRasterizer {
    image_cache: HashMap<String, vello_cpu::Image>,
    svg_cache: HashMap<(String, u32, u32), vello_cpu::Image>,
    font_cache: HashMap<String, vello_cpu::peniko::FontData>,
}

impl CpuRasterizer {
    /// Construct a rasterizer with empty caches.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Rasterizer for CpuRasterizer {
    fn rasterize(
        &mut self,
        scene: &Scene,
        store: &PreparedObjectStore,
        opts: &RasterOpts,
    ) -> SceneprintResult<FrameRGBA> {
        let (width, height) = scene.canvas.scaled(opts.multiplier);
        let width_u16: u16 = width
            .try_into()
            .map_err(|_| SceneprintError::surface_creation("raster width exceeds u16"))?;
        let height_u16: u16 = height
            .try_into()
            .map_err(|_| SceneprintError::surface_creation("raster height exceeds u16"))?;

        let mut pixmap = vello_cpu::Pixmap::new(width_u16, height_u16);
        let background = opts.background.or(scene.background);
        let clear = background
            .map(|c| premul_rgba8(c.r, c.g, c.b, c.a))
            .unwrap_or([0, 0, 0, 0]);
        clear_pixmap(&mut pixmap, clear);

        let mut ctx = vello_cpu::RenderContext::new(width_u16, height_u16);
        let root = Affine::scale(opts.multiplier);
        for obj in &scene.objects {
            self.draw_object(&mut ctx, obj, root, store)?;
        }
        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);

        // The taint rule: protected content may be composited but its pixels
        // must never leave the surface. The surface is dropped on this path too.
        if scene.has_protected_content() {
            return Err(SceneprintError::rasterization_blocked(
                "scene contains readback-protected image content",
            ));
        }

        Ok(FrameRGBA {
            width,
            height,
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }
}

impl CpuRasterizer {
    fn draw_object(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        obj: &SceneObject,
        root: Affine,
        store: &PreparedObjectStore,
    ) -> SceneprintResult<()> {
        let transform = root * object_affine(obj);
        let opacity = obj.opacity.clamp(0.0, 1.0) as f32;
        if opacity <= 0.0 {
            return Ok(());
        }

        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

        if let Some(clip) = &obj.clip {
            ctx.set_transform(affine_to_cpu(root * clip_affine(clip)));
            ctx.push_clip_layer(&bezpath_to_cpu(&clip_shape_path(&clip.shape)));
        }
        if opacity < 1.0 {
            ctx.push_opacity_layer(opacity);
        }

        match &obj.kind {
            ObjectKind::Rect { width, height, color } => {
                ctx.set_transform(affine_to_cpu(transform));
                ctx.set_paint(color_to_cpu(*color));
                ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, *width, *height));
            }
            ObjectKind::Ellipse { rx, ry, color } => {
                ctx.set_transform(affine_to_cpu(transform));
                ctx.set_paint(color_to_cpu(*color));
                let ellipse = kurbo::Ellipse::new((*rx, *ry), (*rx, *ry), 0.0);
                ctx.fill_path(&bezpath_to_cpu(&kurbo::Shape::to_path(&ellipse, 0.1)));
            }
            ObjectKind::Path { color, .. } => {
                let PreparedContent::Path(p) = store.get(&obj.id)? else {
                    return Err(SceneprintError::validation(format!(
                        "object '{}' prepared content is not a path",
                        obj.id
                    )));
                };
                // Position is the rendered bbox top-left; shift the path so its
                // bbox origin lands on the object origin.
                use kurbo::Shape;
                let bbox = p.path.bounding_box();
                let recenter = Affine::translate((-bbox.x0, -bbox.y0));
                ctx.set_transform(affine_to_cpu(transform * recenter));
                ctx.set_paint(color_to_cpu(*color));
                ctx.fill_path(&bezpath_to_cpu(&p.path));
            }
            ObjectKind::Image { .. } => {
                let paint = self.image_paint_for(obj, store)?;
                let (w, h) = image_paint_size(&paint)?;
                ctx.set_transform(affine_to_cpu(transform));
                ctx.set_paint(paint);
                ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, w, h));
            }
            ObjectKind::Svg { .. } => {
                let (paint, w, h, transform_adjust) = self.svg_paint_for(obj, transform, store)?;
                ctx.set_transform(affine_to_cpu(transform_adjust));
                ctx.set_paint(paint);
                ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, w, h));
            }
            ObjectKind::Text { .. } => {
                let PreparedContent::Text(t) = store.get(&obj.id)? else {
                    return Err(SceneprintError::validation(format!(
                        "object '{}' prepared content is not a text layout",
                        obj.id
                    )));
                };
                let font = self.font_for_text_object(obj, store)?;
                ctx.set_transform(affine_to_cpu(transform));

                for line in t.layout.lines() {
                    for item in line.items() {
                        let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                            continue;
                        };

                        let brush = run.style().brush;
                        ctx.set_paint(color_to_cpu(brush));

                        let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                            id: g.id,
                            x: g.x,
                            y: g.y,
                        });
                        ctx.glyph_run(&font)
                            .font_size(run.run().font_size())
                            .fill_glyphs(glyphs);
                    }
                }
            }
        }

        if opacity < 1.0 {
            ctx.pop_layer();
        }
        if obj.clip.is_some() {
            ctx.pop_layer();
        }
        Ok(())
    }

    fn image_paint_for(
        &mut self,
        obj: &SceneObject,
        store: &PreparedObjectStore,
    ) -> SceneprintResult<vello_cpu::Image> {
        if let Some(paint) = self.image_cache.get(&obj.id) {
            return Ok(paint.clone());
        }

        let PreparedContent::Image(img) = store.get(&obj.id)? else {
            return Err(SceneprintError::validation(format!(
                "object '{}' prepared content is not an image",
                obj.id
            )));
        };

        let pixmap =
            image_premul_bytes_to_pixmap(img.rgba8_premul.as_slice(), img.width, img.height)?;
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(std::sync::Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };

        self.image_cache.insert(obj.id.clone(), paint.clone());
        Ok(paint)
    }

    fn svg_paint_for(
        &mut self,
        obj: &SceneObject,
        transform: Affine,
        store: &PreparedObjectStore,
    ) -> SceneprintResult<(vello_cpu::Image, f64, f64, Affine)> {
        let PreparedContent::Svg(svg) = store.get(&obj.id)? else {
            return Err(SceneprintError::validation(format!(
                "object '{}' prepared content is not an svg",
                obj.id
            )));
        };

        let (w, h, transform_adjust) = svg_raster_params(&svg.tree, transform)?;
        let key = (obj.id.clone(), w, h);
        if let Some(paint) = self.svg_cache.get(&key) {
            return Ok((paint.clone(), w as f64, h as f64, transform_adjust));
        }

        let rgba8_premul = rasterize_svg_to_premul_rgba8(&svg.tree, w, h)?;
        let pixmap = image_premul_bytes_to_pixmap(rgba8_premul.as_slice(), w, h)?;
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(std::sync::Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };

        self.svg_cache.insert(key, paint.clone());
        Ok((paint, w as f64, h as f64, transform_adjust))
    }

    fn font_for_text_object(
        &mut self,
        obj: &SceneObject,
        store: &PreparedObjectStore,
    ) -> SceneprintResult<vello_cpu::peniko::FontData> {
        if let Some(font) = self.font_cache.get(&obj.id) {
            return Ok(font.clone());
        }

        let PreparedContent::Text(t) = store.get(&obj.id)? else {
            return Err(SceneprintError::validation(format!(
                "object '{}' prepared content is not a text layout",
                obj.id
            )));
        };

        let font_bytes = t.font_bytes.as_ref().clone();
        let font = vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(font_bytes), 0);
        self.font_cache.insert(obj.id.clone(), font.clone());
        Ok(font)
    }
}

/// Local-to-canvas affine for an object's position and scale.
pub fn object_affine(obj: &SceneObject) -> Affine {
    Affine::translate((obj.left, obj.top)) * Affine::scale_non_uniform(obj.scale_x, obj.scale_y)
}

fn clip_affine(clip: &ClipRegion) -> Affine {
    Affine::translate((clip.left, clip.top))
        * Affine::scale_non_uniform(clip.scale_x, clip.scale_y)
}

fn clip_shape_path(shape: &ClipShape) -> kurbo::BezPath {
    use kurbo::Shape;
    match shape {
        ClipShape::Rect { width, height } => {
            kurbo::Rect::new(0.0, 0.0, *width, *height).to_path(0.1)
        }
        ClipShape::Ellipse { rx, ry } => {
            kurbo::Ellipse::new((*rx, *ry), (*rx, *ry), 0.0).to_path(0.1)
        }
        ClipShape::Path { svg_path_d } => {
            kurbo::BezPath::from_svg(svg_path_d).unwrap_or_default()
        }
    }
}

fn premul_rgba8(r: u8, g: u8, b: u8, a: u8) -> [u8; 4] {
    let premul = |c: u8| -> u8 { (((c as u16) * (a as u16) + 127) / 255) as u8 };
    [premul(r), premul(g), premul(b), a]
}

fn clear_pixmap(pixmap: &mut vello_cpu::Pixmap, rgba: [u8; 4]) {
    let data = pixmap.data_as_u8_slice_mut();
    for px in data.chunks_exact_mut(4) {
        px.copy_from_slice(&rgba);
    }
}

fn image_paint_size(paint: &vello_cpu::Image) -> SceneprintResult<(f64, f64)> {
    match &paint.image {
        vello_cpu::ImageSource::Pixmap(p) => {
            Ok((f64::from(p.width()), f64::from(p.height())))
        }
        _ => Err(SceneprintError::validation(
            "image paint has no pixmap source",
        )),
    }
}

fn image_premul_bytes_to_pixmap(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> SceneprintResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| SceneprintError::surface_creation("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| SceneprintError::surface_creation("image height exceeds u16"))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(SceneprintError::validation(
            "prepared image byte length mismatch",
        ));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

fn color_to_cpu(c: Color) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: kurbo::Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &kurbo::BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3))
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
