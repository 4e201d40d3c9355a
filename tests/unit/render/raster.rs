use super::*;

use crate::foundation::core::Canvas;

fn shapes_scene() -> Scene {
    Scene {
        canvas: Canvas {
            width: 100,
            height: 80,
        },
        background: Some(Color::WHITE),
        objects: vec![SceneObject {
            id: "r".to_string(),
            kind: ObjectKind::Rect {
                width: 40.0,
                height: 40.0,
                color: Color::rgba(255, 0, 0, 255),
            },
            left: 10.0,
            top: 10.0,
            scale_x: 1.0,
            scale_y: 1.0,
            opacity: 1.0,
            clip: None,
        }],
        revision: 0,
    }
}

#[test]
fn object_affine_places_and_scales() {
    let mut obj = shapes_scene().objects.remove(0);
    obj.left = 3.0;
    obj.top = 4.0;
    obj.scale_x = 2.0;
    obj.scale_y = 5.0;

    let a = object_affine(&obj);
    let origin = a * kurbo::Point::new(0.0, 0.0);
    assert_eq!((origin.x, origin.y), (3.0, 4.0));

    let unit = a * kurbo::Point::new(1.0, 1.0);
    assert_eq!((unit.x, unit.y), (5.0, 9.0));
}

#[test]
fn premul_helper_scales_color_by_alpha() {
    assert_eq!(premul_rgba8(255, 255, 255, 128), [128, 128, 128, 128]);
    assert_eq!(premul_rgba8(10, 20, 30, 255), [10, 20, 30, 255]);
    assert_eq!(premul_rgba8(200, 200, 200, 0), [0, 0, 0, 0]);
}

#[test]
fn frame_dimensions_follow_multiplier() {
    let scene = shapes_scene();
    let store = PreparedObjectStore::empty();
    let mut rasterizer = CpuRasterizer::new();

    let frame = rasterizer
        .rasterize(&scene, &store, &RasterOpts::default())
        .unwrap();
    assert_eq!((frame.width, frame.height), (100, 80));
    assert_eq!(frame.data.len(), 100 * 80 * 4);
    assert!(frame.premultiplied);

    let frame = rasterizer
        .rasterize(
            &scene,
            &store,
            &RasterOpts {
                background: None,
                multiplier: 2.5,
            },
        )
        .unwrap();
    assert_eq!((frame.width, frame.height), (250, 200));
}

#[test]
fn background_override_beats_scene_background() {
    let mut scene = shapes_scene();
    scene.objects.clear();
    let store = PreparedObjectStore::empty();
    let mut rasterizer = CpuRasterizer::new();

    let frame = rasterizer
        .rasterize(
            &scene,
            &store,
            &RasterOpts {
                background: Some(Color::rgba(0, 0, 255, 255)),
                multiplier: 1.0,
            },
        )
        .unwrap();
    assert_eq!(&frame.data[..4], &[0, 0, 255, 255]);
}

#[test]
fn oversized_surface_is_rejected() {
    let mut scene = shapes_scene();
    scene.canvas = Canvas {
        width: 70_000,
        height: 10,
    };
    let store = PreparedObjectStore::empty();
    let mut rasterizer = CpuRasterizer::new();

    let err = rasterizer
        .rasterize(&scene, &store, &RasterOpts::default())
        .unwrap_err();
    assert!(matches!(err, SceneprintError::SurfaceCreation(_)));
}

#[test]
fn protected_image_blocks_readback() {
    use image::ImageEncoder as _;

    let dir = std::env::temp_dir().join("sceneprint-raster-protected");
    std::fs::create_dir_all(&dir).unwrap();
    let mut png = Vec::new();
    image::codecs::png::PngEncoder::new(&mut png)
        .write_image(&[255, 0, 0, 255], 1, 1, image::ExtendedColorType::Rgba8)
        .unwrap();
    std::fs::write(dir.join("px.png"), &png).unwrap();

    let mut scene = shapes_scene();
    scene.objects = vec![SceneObject {
        id: "img".to_string(),
        kind: ObjectKind::Image {
            source: "px.png".to_string(),
            readback_protected: true,
        },
        left: 0.0,
        top: 0.0,
        scale_x: 1.0,
        scale_y: 1.0,
        opacity: 1.0,
        clip: None,
    }];

    let store = PreparedObjectStore::prepare(&scene, &dir).unwrap();
    let mut rasterizer = CpuRasterizer::new();
    let err = rasterizer
        .rasterize(&scene, &store, &RasterOpts::default())
        .unwrap_err();
    assert!(matches!(err, SceneprintError::RasterizationBlocked(_)));
}
