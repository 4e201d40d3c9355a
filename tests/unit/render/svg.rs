use super::*;

use crate::foundation::core::Affine;
use crate::scene::decode::parse_svg;

fn small_tree() -> std::sync::Arc<usvg::Tree> {
    let svg = br##"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="20">
        <rect width="10" height="20" fill="#ff0000"/>
    </svg>"##;
    parse_svg(svg, None).unwrap().tree
}

#[test]
fn identity_transform_keeps_intrinsic_size() {
    let tree = small_tree();
    let (w, h, adjust) = svg_raster_params(&tree, Affine::IDENTITY).unwrap();
    assert_eq!((w, h), (10, 20));

    let [a, b, c, d, _, _] = adjust.as_coeffs();
    assert!((a - 1.0).abs() < 1e-9);
    assert!((d - 1.0).abs() < 1e-9);
    assert!(b.abs() < 1e-9 && c.abs() < 1e-9);
}

#[test]
fn upscale_bakes_into_raster_size() {
    let tree = small_tree();
    let (w, h, adjust) = svg_raster_params(&tree, Affine::scale(3.0)).unwrap();
    assert_eq!((w, h), (30, 60));

    // The draw transform is reduced so pixel space maps back to logical space.
    let [a, _, _, d, _, _] = adjust.as_coeffs();
    assert!((a - 1.0).abs() < 1e-9);
    assert!((d - 1.0).abs() < 1e-9);
}

#[test]
fn oversized_raster_is_rejected() {
    let tree = small_tree();
    let err = svg_raster_params(&tree, Affine::scale(10_000.0)).unwrap_err();
    assert!(matches!(
        err,
        crate::foundation::error::SceneprintError::SurfaceCreation(_)
    ));
}

#[test]
fn rasterized_bytes_match_dimensions_and_fill() {
    let tree = small_tree();
    let bytes = rasterize_svg_to_premul_rgba8(&tree, 10, 20).unwrap();
    assert_eq!(bytes.len(), 10 * 20 * 4);

    // Solid red fill: first pixel is opaque red.
    assert_eq!(bytes[0], 255);
    assert_eq!(bytes[3], 255);
}
