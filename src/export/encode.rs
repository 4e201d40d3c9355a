use anyhow::Context;
use base64::Engine as _;
use image::ImageEncoder as _;

use crate::{
    foundation::error::{SceneprintError, SceneprintResult},
    render::raster::FrameRGBA,
};

/// Fixed quality parameter for lossy (opaque) output.
pub const JPEG_QUALITY: u8 = 90;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// Declared pixel format of an encoded export payload.
pub enum RasterFormat {
    /// Alpha-capable lossless raster.
    Png,
    /// Opaque lossy raster encoded at [`JPEG_QUALITY`].
    Jpeg,
}

impl RasterFormat {
    /// MIME type for the storage backend contract ("bytes + MIME type").
    pub fn mime(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }
}

#[derive(Clone, Debug)]
/// Encoded image payload produced once per export call.
///
/// Ownership passes to the caller; the pipeline keeps no reference.
pub struct RasterResult {
    /// Encoded image bytes.
    pub bytes: Vec<u8>,
    /// Declared pixel format.
    pub format: RasterFormat,
    /// Pixel width of the encoded raster.
    pub width: u32,
    /// Pixel height of the encoded raster.
    pub height: u32,
}

impl RasterResult {
    /// Embedded data representation (`data:<mime>;base64,...`).
    pub fn data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.format.mime(),
            base64::engine::general_purpose::STANDARD.encode(&self.bytes)
        )
    }
}

/// Encode a rasterized frame into the requested format.
///
/// PNG output keeps the alpha channel (unpremultiplied); JPEG output drops it
/// and encodes straight RGB at the fixed quality.
pub fn encode_raster(frame: &FrameRGBA, format: RasterFormat) -> SceneprintResult<RasterResult> {
    let expected = frame.width as usize * frame.height as usize * 4;
    if frame.data.len() != expected {
        return Err(SceneprintError::validation(
            "frame byte length does not match its dimensions",
        ));
    }

    let straight = if frame.premultiplied {
        unpremultiply_rgba8(&frame.data)
    } else {
        frame.data.clone()
    };

    let mut bytes = Vec::new();
    match format {
        RasterFormat::Png => {
            image::codecs::png::PngEncoder::new(&mut bytes)
                .write_image(
                    &straight,
                    frame.width,
                    frame.height,
                    image::ExtendedColorType::Rgba8,
                )
                .context("encode png")?;
        }
        RasterFormat::Jpeg => {
            let rgb: Vec<u8> = straight
                .chunks_exact(4)
                .flat_map(|px| [px[0], px[1], px[2]])
                .collect();
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut bytes, JPEG_QUALITY)
                .write_image(
                    &rgb,
                    frame.width,
                    frame.height,
                    image::ExtendedColorType::Rgb8,
                )
                .context("encode jpeg")?;
        }
    }

    Ok(RasterResult {
        bytes,
        format,
        width: frame.width,
        height: frame.height,
    })
}

fn unpremultiply_rgba8(premul: &[u8]) -> Vec<u8> {
    let mut out = premul.to_vec();
    for px in out.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 || a == 255 {
            continue;
        }
        px[0] = (((px[0] as u16) * 255 + a / 2) / a).min(255) as u8;
        px[1] = (((px[1] as u16) * 255 + a / 2) / a).min(255) as u8;
        px[2] = (((px[2] as u16) * 255 + a / 2) / a).min(255) as u8;
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/export/encode.rs"]
mod tests;
