use crate::foundation::core::{Canvas, Color};
use crate::foundation::error::{SceneprintError, SceneprintResult};

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
/// A deserialized vector scene: the unit of work for an export call.
///
/// A scene is a pure data model produced by deserializing the scene editor's
/// serialized string. The export pipeline mutates a scene in place when
/// auto-fitting (see [`crate::apply_fit`]); callers must therefore hand the
/// pipeline a disposable copy, never the live editable instance. The
/// deserializing entry point [`crate::export_scene_str`] satisfies this by
/// construction.
pub struct Scene {
    /// Logical canvas dimensions in display units.
    pub canvas: Canvas,
    /// Canvas background fill; `None` renders transparent.
    #[serde(default)]
    pub background: Option<Color>,
    /// Top-level renderable objects in paint order.
    #[serde(default)]
    pub objects: Vec<SceneObject>,
    /// Redraw generation counter, bumped once per transform-application pass.
    #[serde(default, skip_serializing)]
    pub revision: u64,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
/// A renderable unit with its own position, non-uniform scale and optional clip.
pub struct SceneObject {
    /// Object identifier (stable within a scene).
    pub id: String,
    /// What the object draws.
    pub kind: ObjectKind,
    /// Left edge in logical display units.
    pub left: f64,
    /// Top edge in logical display units.
    pub top: f64,
    /// Horizontal scale factor.
    #[serde(default = "default_scale")]
    pub scale_x: f64,
    /// Vertical scale factor.
    #[serde(default = "default_scale")]
    pub scale_y: f64,
    /// Opacity; clamped to `[0, 1]` at render time.
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    /// Clip region owned exclusively by this object.
    ///
    /// The clip's position/scale are transformed in lockstep with the owner by
    /// the single transform-application routine; the two never render one
    /// frame out of sync.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clip: Option<ClipRegion>,
}

fn default_scale() -> f64 {
    1.0
}

fn default_opacity() -> f64 {
    1.0
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// Renderable payload of a [`SceneObject`].
pub enum ObjectKind {
    /// Axis-aligned filled rectangle.
    Rect {
        /// Intrinsic width in logical units (pre-scale).
        width: f64,
        /// Intrinsic height in logical units (pre-scale).
        height: f64,
        /// Fill color.
        #[serde(default)]
        color: Color,
    },
    /// Filled ellipse.
    Ellipse {
        /// Horizontal radius in logical units (pre-scale).
        rx: f64,
        /// Vertical radius in logical units (pre-scale).
        ry: f64,
        /// Fill color.
        #[serde(default)]
        color: Color,
    },
    /// Filled vector path.
    Path {
        /// SVG path `d` attribute string.
        svg_path_d: String,
        /// Fill color.
        #[serde(default)]
        color: Color,
    },
    /// Raster image loaded from a file.
    Image {
        /// Relative path to the image file.
        source: String,
        /// Cross-origin-taint analog: the image may be composited but its
        /// pixels must not be read back. Rasterizing a scene that contains a
        /// protected image fails readback with
        /// [`SceneprintError::RasterizationBlocked`].
        #[serde(default)]
        readback_protected: bool,
    },
    /// SVG document loaded from a file.
    Svg {
        /// Relative path to the SVG file.
        source: String,
    },
    /// Shaped text run.
    Text {
        /// UTF-8 text content.
        text: String,
        /// Relative path to the font file.
        font_source: String,
        /// Font size in logical pixels.
        size_px: f32,
        /// Optional max line width in logical pixels (for wrapping).
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_width_px: Option<f32>,
        /// Text color.
        #[serde(default = "default_text_color")]
        color: Color,
    },
}

fn default_text_color() -> Color {
    Color::BLACK
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
/// A clip region owned one-to-one by a [`SceneObject`].
///
/// Shaped like a scene object (own position and scale over an intrinsic
/// shape) but never rendered on its own: it only bounds its owner's paint.
pub struct ClipRegion {
    /// Clipping shape.
    pub shape: ClipShape,
    /// Left edge in logical display units.
    pub left: f64,
    /// Top edge in logical display units.
    pub top: f64,
    /// Horizontal scale factor.
    #[serde(default = "default_scale")]
    pub scale_x: f64,
    /// Vertical scale factor.
    #[serde(default = "default_scale")]
    pub scale_y: f64,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// Intrinsic geometry of a [`ClipRegion`].
pub enum ClipShape {
    /// Axis-aligned rectangle.
    Rect {
        /// Intrinsic width in logical units (pre-scale).
        width: f64,
        /// Intrinsic height in logical units (pre-scale).
        height: f64,
    },
    /// Ellipse.
    Ellipse {
        /// Horizontal radius in logical units (pre-scale).
        rx: f64,
        /// Vertical radius in logical units (pre-scale).
        ry: f64,
    },
    /// Vector path.
    Path {
        /// SVG path `d` attribute string.
        svg_path_d: String,
    },
}

impl Scene {
    /// Validate scene invariants and per-object geometry.
    pub fn validate(&self) -> SceneprintResult<()> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(SceneprintError::validation(
                "canvas width/height must be > 0",
            ));
        }

        for obj in &self.objects {
            if obj.id.trim().is_empty() {
                return Err(SceneprintError::validation("object id must be non-empty"));
            }
            validate_finite(obj.left, &obj.id, "left")?;
            validate_finite(obj.top, &obj.id, "top")?;
            validate_scale(obj.scale_x, &obj.id, "scale_x")?;
            validate_scale(obj.scale_y, &obj.id, "scale_y")?;
            if !obj.opacity.is_finite() || !(0.0..=1.0).contains(&obj.opacity) {
                return Err(SceneprintError::validation(format!(
                    "object '{}' opacity must be within [0, 1]",
                    obj.id
                )));
            }

            match &obj.kind {
                ObjectKind::Rect { width, height, .. } => {
                    validate_extent(*width, &obj.id, "width")?;
                    validate_extent(*height, &obj.id, "height")?;
                }
                ObjectKind::Ellipse { rx, ry, .. } => {
                    validate_extent(*rx, &obj.id, "rx")?;
                    validate_extent(*ry, &obj.id, "ry")?;
                }
                ObjectKind::Path { svg_path_d, .. } => {
                    if svg_path_d.trim().is_empty() {
                        return Err(SceneprintError::validation(format!(
                            "object '{}' svg_path_d must be non-empty",
                            obj.id
                        )));
                    }
                }
                ObjectKind::Image { source, .. } => {
                    validate_rel_source(source, &obj.id, "image source")?;
                }
                ObjectKind::Svg { source } => {
                    validate_rel_source(source, &obj.id, "svg source")?;
                }
                ObjectKind::Text {
                    text,
                    font_source,
                    size_px,
                    max_width_px,
                    ..
                } => {
                    if text.trim().is_empty() {
                        return Err(SceneprintError::validation(format!(
                            "object '{}' text must be non-empty",
                            obj.id
                        )));
                    }
                    validate_rel_source(font_source, &obj.id, "font_source")?;
                    if !size_px.is_finite() || *size_px <= 0.0 {
                        return Err(SceneprintError::validation(format!(
                            "object '{}' size_px must be finite and > 0",
                            obj.id
                        )));
                    }
                    if let Some(w) = max_width_px
                        && (!w.is_finite() || *w <= 0.0)
                    {
                        return Err(SceneprintError::validation(format!(
                            "object '{}' max_width_px must be finite and > 0 when set",
                            obj.id
                        )));
                    }
                }
            }

            if let Some(clip) = &obj.clip {
                validate_finite(clip.left, &obj.id, "clip.left")?;
                validate_finite(clip.top, &obj.id, "clip.top")?;
                validate_scale(clip.scale_x, &obj.id, "clip.scale_x")?;
                validate_scale(clip.scale_y, &obj.id, "clip.scale_y")?;
                match &clip.shape {
                    ClipShape::Rect { width, height } => {
                        validate_extent(*width, &obj.id, "clip.width")?;
                        validate_extent(*height, &obj.id, "clip.height")?;
                    }
                    ClipShape::Ellipse { rx, ry } => {
                        validate_extent(*rx, &obj.id, "clip.rx")?;
                        validate_extent(*ry, &obj.id, "clip.ry")?;
                    }
                    ClipShape::Path { svg_path_d } => {
                        if svg_path_d.trim().is_empty() {
                            return Err(SceneprintError::validation(format!(
                                "object '{}' clip svg_path_d must be non-empty",
                                obj.id
                            )));
                        }
                    }
                }
            }
        }

        Ok(())
    }

    /// Whether any object carries a readback-protected image.
    pub fn has_protected_content(&self) -> bool {
        self.objects.iter().any(|obj| {
            matches!(
                obj.kind,
                ObjectKind::Image {
                    readback_protected: true,
                    ..
                }
            )
        })
    }
}

fn validate_finite(value: f64, id: &str, field: &str) -> SceneprintResult<()> {
    if !value.is_finite() {
        return Err(SceneprintError::validation(format!(
            "object '{id}' {field} must be finite"
        )));
    }
    Ok(())
}

fn validate_scale(value: f64, id: &str, field: &str) -> SceneprintResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(SceneprintError::validation(format!(
            "object '{id}' {field} must be finite and > 0"
        )));
    }
    Ok(())
}

fn validate_extent(value: f64, id: &str, field: &str) -> SceneprintResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(SceneprintError::validation(format!(
            "object '{id}' {field} must be finite and >= 0"
        )));
    }
    Ok(())
}

fn validate_rel_source(source: &str, id: &str, field: &str) -> SceneprintResult<()> {
    if source.trim().is_empty() {
        return Err(SceneprintError::validation(format!(
            "object '{id}' {field} must be non-empty"
        )));
    }
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(SceneprintError::validation(format!(
            "object '{id}' {field} must be a relative path"
        )));
    }
    for part in s.split('/') {
        if part == ".." {
            return Err(SceneprintError::validation(format!(
                "object '{id}' {field} must not contain '..'"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
