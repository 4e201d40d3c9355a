use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;

use crate::{
    foundation::core::{BezPath, Color},
    foundation::error::{SceneprintError, SceneprintResult},
    scene::decode,
    scene::model::{ObjectKind, Scene, SceneObject},
};

#[derive(Clone, Debug)]
/// Prepared raster image in premultiplied RGBA8 form.
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

#[derive(Clone, Debug)]
/// Prepared SVG asset represented as a parsed `usvg` tree.
pub struct PreparedSvg {
    /// Parsed SVG tree.
    pub tree: Arc<usvg::Tree>,
}

#[derive(Clone)]
/// Prepared text object: shaped layout plus backing font data.
pub struct PreparedText {
    /// Fully built text layout ready for rendering.
    pub layout: Arc<parley::Layout<Color>>,
    /// Original font bytes used to build glyph outlines.
    pub font_bytes: Arc<Vec<u8>>,
    /// Primary detected family name from font data.
    pub font_family: String,
}

impl std::fmt::Debug for PreparedText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreparedText")
            .field("layout_ptr", &Arc::as_ptr(&self.layout))
            .field("font_bytes_len", &self.font_bytes.len())
            .field("font_family", &self.font_family)
            .finish()
    }
}

#[derive(Clone, Debug)]
/// Prepared vector path parsed from SVG path data.
pub struct PreparedPath {
    /// Parsed Bezier path.
    pub path: BezPath,
}

#[derive(Clone, Debug)]
/// Prepared renderable content for one scene object.
pub enum PreparedContent {
    /// Prepared bitmap image.
    Image(PreparedImage),
    /// Prepared SVG vector tree.
    Svg(PreparedSvg),
    /// Prepared text layout.
    Text(PreparedText),
    /// Prepared path geometry.
    Path(PreparedPath),
}

#[derive(Clone, Debug)]
/// Immutable store of prepared per-object content, keyed by object id.
///
/// External IO (image decode, SVG parse, font loading, text shaping) is
/// front-loaded here so the rasterizer stays deterministic and IO-free.
/// `Rect` and `Ellipse` objects carry their geometry inline and have no store
/// entry.
pub struct PreparedObjectStore {
    root: PathBuf,
    content_by_id: HashMap<String, PreparedContent>,
}

impl PreparedObjectStore {
    /// Prepare all external content referenced by `scene` relative to `root`.
    pub fn prepare(scene: &Scene, root: impl Into<PathBuf>) -> SceneprintResult<Self> {
        let root = root.into();
        let mut out = Self {
            root,
            content_by_id: HashMap::new(),
        };

        let mut text_engine = TextLayoutEngine::new();
        for obj in &scene.objects {
            let prepared = match &obj.kind {
                ObjectKind::Rect { .. } | ObjectKind::Ellipse { .. } => continue,
                ObjectKind::Path { svg_path_d, .. } => PreparedContent::Path(PreparedPath {
                    path: decode::parse_svg_path(svg_path_d)?,
                }),
                ObjectKind::Image { source, .. } => {
                    let bytes = out.read_bytes(source)?;
                    PreparedContent::Image(decode::decode_image(&bytes)?)
                }
                ObjectKind::Svg { source } => {
                    let norm = normalize_rel_path(source)?;
                    let abs = out.root.join(Path::new(&norm));
                    let bytes = out.read_bytes(source)?;
                    PreparedContent::Svg(decode::parse_svg(&bytes, abs.parent())?)
                }
                ObjectKind::Text {
                    text,
                    font_source,
                    size_px,
                    max_width_px,
                    color,
                } => {
                    let font_bytes = out.read_bytes(font_source)?;
                    let layout = text_engine.layout_plain(
                        text,
                        font_bytes.as_slice(),
                        *size_px,
                        *color,
                        *max_width_px,
                    )?;
                    let family = text_engine
                        .last_family_name()
                        .unwrap_or_else(|| "unknown".to_string());
                    PreparedContent::Text(PreparedText {
                        layout: Arc::new(layout),
                        font_bytes: Arc::new(font_bytes),
                        font_family: family,
                    })
                }
            };

            out.content_by_id.insert(obj.id.clone(), prepared);
        }

        Ok(out)
    }

    /// An empty store for scenes without external content (shapes only).
    pub fn empty() -> Self {
        Self {
            root: PathBuf::from("."),
            content_by_id: HashMap::new(),
        }
    }

    /// Root directory used when resolving relative sources.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Lookup prepared content for a scene object id.
    pub fn get(&self, id: &str) -> SceneprintResult<&PreparedContent> {
        self.content_by_id
            .get(id)
            .ok_or_else(|| SceneprintError::validation(format!("no prepared content for '{id}'")))
    }

    /// Intrinsic (pre-scale) size of an object's rendered content in logical units.
    pub fn intrinsic_size(&self, obj: &SceneObject) -> SceneprintResult<(f64, f64)> {
        match &obj.kind {
            ObjectKind::Rect { width, height, .. } => Ok((*width, *height)),
            ObjectKind::Ellipse { rx, ry, .. } => Ok((rx * 2.0, ry * 2.0)),
            ObjectKind::Path { .. } => {
                let PreparedContent::Path(p) = self.get(&obj.id)? else {
                    return Err(SceneprintError::validation(format!(
                        "object '{}' prepared content is not a path",
                        obj.id
                    )));
                };
                use kurbo::Shape;
                let bbox = p.path.bounding_box();
                Ok((bbox.width().max(0.0), bbox.height().max(0.0)))
            }
            ObjectKind::Image { .. } => {
                let PreparedContent::Image(i) = self.get(&obj.id)? else {
                    return Err(SceneprintError::validation(format!(
                        "object '{}' prepared content is not an image",
                        obj.id
                    )));
                };
                Ok((f64::from(i.width), f64::from(i.height)))
            }
            ObjectKind::Svg { .. } => {
                let PreparedContent::Svg(s) = self.get(&obj.id)? else {
                    return Err(SceneprintError::validation(format!(
                        "object '{}' prepared content is not an svg",
                        obj.id
                    )));
                };
                Ok((
                    f64::from(s.tree.size().width()),
                    f64::from(s.tree.size().height()),
                ))
            }
            ObjectKind::Text { .. } => {
                let PreparedContent::Text(t) = self.get(&obj.id)? else {
                    return Err(SceneprintError::validation(format!(
                        "object '{}' prepared content is not a text layout",
                        obj.id
                    )));
                };
                let mut w = 0.0f64;
                let mut h = 0.0f64;
                for line in t.layout.lines() {
                    let m = line.metrics();
                    w = w.max(f64::from(m.advance));
                    h += f64::from(m.ascent + m.descent + m.leading);
                }
                Ok((w, h))
            }
        }
    }

    fn read_bytes(&self, source: &str) -> SceneprintResult<Vec<u8>> {
        let norm = normalize_rel_path(source)?;
        let path = self.root.join(Path::new(&norm));
        std::fs::read(&path)
            .with_context(|| format!("read object bytes from '{}'", path.display()))
            .map_err(SceneprintError::from)
    }
}

/// Normalize and validate scene-relative source paths.
///
/// The normalized result uses `/` separators, removes `.` segments, and
/// rejects absolute paths or parent traversals (`..`).
pub fn normalize_rel_path(source: &str) -> SceneprintResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(SceneprintError::validation(
            "object source paths must be relative",
        ));
    }
    if s.is_empty() {
        return Err(SceneprintError::validation(
            "object source path must be non-empty",
        ));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(SceneprintError::validation(
                "object source paths must not contain '..'",
            ));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(SceneprintError::validation(
            "object source path must contain a file name",
        ));
    }

    Ok(out.join("/"))
}

/// Stateful helper for building Parley text layouts from raw font bytes.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<Color>,
    last_family_name: Option<String>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    /// Construct a new layout engine with fresh Parley contexts.
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            last_family_name: None,
        }
    }

    /// Last successfully resolved family name, if any.
    pub fn last_family_name(&self) -> Option<String> {
        self.last_family_name.clone()
    }

    /// Shape and lay out plain text using provided font bytes and styling.
    pub fn layout_plain(
        &mut self,
        text: &str,
        font_bytes: &[u8],
        size_px: f32,
        brush: Color,
        max_width_px: Option<f32>,
    ) -> SceneprintResult<parley::Layout<Color>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(SceneprintError::validation(
                "text size_px must be finite and > 0",
            ));
        }

        let family_name = self.register_font_family(font_bytes)?;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        for prop in [
            parley::style::StyleProperty::FontStack(parley::style::FontStack::Source(
                std::borrow::Cow::Owned(family_name),
            )),
            parley::style::StyleProperty::FontSize(size_px),
            parley::style::StyleProperty::Brush(brush),
        ] {
            builder.push_default(prop);
        }

        let mut layout: parley::Layout<Color> = builder.build(text);
        layout.break_all_lines(max_width_px);
        if let Some(w) = max_width_px {
            layout.align(
                Some(w),
                parley::Alignment::Start,
                parley::AlignmentOptions::default(),
            );
        }

        Ok(layout)
    }

    /// Register `font_bytes` with the collection and return the primary family
    /// name, recording it for later lookup.
    fn register_font_family(&mut self, font_bytes: &[u8]) -> SceneprintResult<String> {
        let blob = parley::fontique::Blob::from(font_bytes.to_vec());
        let families = self.font_ctx.collection.register_fonts(blob, None);

        let name = families
            .first()
            .and_then(|(id, _)| self.font_ctx.collection.family_name(*id))
            .map(str::to_string)
            .ok_or_else(|| {
                SceneprintError::validation("font bytes yielded no named font family")
            })?;

        self.last_family_name = Some(name.clone());
        Ok(name)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/store.rs"]
mod tests;
