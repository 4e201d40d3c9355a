use crate::render::raster::FrameRGBA;

/// Whether any pixel in the frame is less than fully opaque.
///
/// Monotonic OR over the alpha channel with early exit on the first
/// transparent pixel. The result selects the output encoding when the caller
/// did not force a background mode: alpha present means alpha-capable
/// lossless output, otherwise opaque lossy output.
pub fn has_transparency(frame: &FrameRGBA) -> bool {
    frame
        .data
        .chunks_exact(4)
        .any(|px| px[3] != u8::MAX)
}

#[cfg(test)]
#[path = "../../tests/unit/render/classify.rs"]
mod tests;
