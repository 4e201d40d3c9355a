use crate::foundation::error::{SceneprintError, SceneprintResult};

pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

/// Pixel density assumed for on-screen (logical) scene units.
pub const DISPLAY_DPI: f64 = 72.0;

/// Pixel density targeted for print-quality rasterization.
pub const PRINT_DPI: f64 = 300.0;

/// Fraction of the canvas the fitted content's larger dimension occupies.
pub const TARGET_FILL_RATIO: f64 = 0.90;

/// Raster output multiplier for an export request.
///
/// Returns `PRINT_DPI / DISPLAY_DPI` (~4.17) for high-resolution exports and
/// `1.0` otherwise. The multiplier scales the raster surface only; the fit
/// transform and all object geometry stay in logical display units, so stroke
/// widths, shadows and text metrics remain visually consistent at any
/// resolution.
pub fn resolution_multiplier(high_resolution: bool) -> f64 {
    if high_resolution {
        PRINT_DPI / DISPLAY_DPI
    } else {
        1.0
    }
}

/// Logical canvas dimensions in display units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in logical pixels.
    pub width: u32,
    /// Height in logical pixels.
    pub height: u32,
}

impl Canvas {
    /// Canvas dimensions validated to be non-zero.
    pub fn new(width: u32, height: u32) -> SceneprintResult<Self> {
        if width == 0 || height == 0 {
            return Err(SceneprintError::validation(
                "canvas width/height must be > 0",
            ));
        }
        Ok(Self { width, height })
    }

    /// Pixel dimensions of the raster surface for a given resolution multiplier.
    ///
    /// Scaled dimensions are rounded up so the fitted content never loses its
    /// outermost pixel row/column.
    pub fn scaled(self, multiplier: f64) -> (u32, u32) {
        let w = ((f64::from(self.width)) * multiplier).ceil().max(1.0) as u32;
        let h = ((f64::from(self.height)) * multiplier).ceil().max(1.0) as u32;
        (w, h)
    }
}

/// Straight-alpha RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel (straight, not premultiplied).
    pub a: u8,
}

impl Color {
    /// Opaque white, the default opaque export background.
    pub const WHITE: Self = Self {
        r: 255,
        g: 255,
        b: 255,
        a: 255,
    };

    /// Opaque black.
    pub const BLACK: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 255,
    };

    /// Build a color from channel values.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Whether the color is fully opaque.
    pub fn is_opaque(self) -> bool {
        self.a == 255
    }

    /// Channel bytes in `[r, g, b, a]` order.
    pub fn to_rgba8(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl<'de> serde::Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(serde::Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Hex(String),
            Obj {
                r: u8,
                g: u8,
                b: u8,
                #[serde(default = "opaque")]
                a: u8,
            },
            Arr(Vec<u8>),
        }

        fn opaque() -> u8 {
            255
        }

        match Repr::deserialize(deserializer)? {
            Repr::Hex(s) => parse_hex(&s).map_err(serde::de::Error::custom),
            Repr::Obj { r, g, b, a } => Ok(Self { r, g, b, a }),
            Repr::Arr(v) => match v.as_slice() {
                [r, g, b] => Ok(Self::rgba(*r, *g, *b, 255)),
                [r, g, b, a] => Ok(Self::rgba(*r, *g, *b, *a)),
                _ => Err(serde::de::Error::custom(
                    "color array must have len 3 ([r,g,b]) or 4 ([r,g,b,a])",
                )),
            },
        }
    }
}

fn parse_hex(s: &str) -> Result<Color, String> {
    let hex = s.strip_prefix('#').unwrap_or(s);
    let parse_pair = |i: usize| -> Result<u8, String> {
        u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| format!("invalid hex color '{s}'"))
    };
    match hex.len() {
        6 => Ok(Color::rgba(parse_pair(0)?, parse_pair(2)?, parse_pair(4)?, 255)),
        8 => Ok(Color::rgba(
            parse_pair(0)?,
            parse_pair(2)?,
            parse_pair(4)?,
            parse_pair(6)?,
        )),
        _ => Err(format!("hex color '{s}' must have 6 or 8 digits")),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
