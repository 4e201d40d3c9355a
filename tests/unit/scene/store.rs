use super::*;

use crate::foundation::core::Canvas;

fn shape_object(id: &str, kind: ObjectKind) -> SceneObject {
    SceneObject {
        id: id.to_string(),
        kind,
        left: 0.0,
        top: 0.0,
        scale_x: 1.0,
        scale_y: 1.0,
        opacity: 1.0,
        clip: None,
    }
}

fn scene_with(objects: Vec<SceneObject>) -> Scene {
    Scene {
        canvas: Canvas {
            width: 100,
            height: 100,
        },
        background: None,
        objects,
        revision: 0,
    }
}

#[test]
fn normalize_collapses_dot_segments_and_separators() {
    assert_eq!(normalize_rel_path("a/./b//c.png").unwrap(), "a/b/c.png");
    assert_eq!(normalize_rel_path("a\\b\\c.png").unwrap(), "a/b/c.png");
    assert_eq!(normalize_rel_path("./x.svg").unwrap(), "x.svg");
}

#[test]
fn normalize_rejects_unsafe_paths() {
    assert!(normalize_rel_path("/abs/x.png").is_err());
    assert!(normalize_rel_path("../x.png").is_err());
    assert!(normalize_rel_path("a/../x.png").is_err());
    assert!(normalize_rel_path("").is_err());
    assert!(normalize_rel_path("./.").is_err());
}

#[test]
fn shapes_need_no_store_entry() {
    let scene = scene_with(vec![
        shape_object(
            "r",
            ObjectKind::Rect {
                width: 10.0,
                height: 20.0,
                color: Color::BLACK,
            },
        ),
        shape_object(
            "e",
            ObjectKind::Ellipse {
                rx: 5.0,
                ry: 8.0,
                color: Color::BLACK,
            },
        ),
    ]);
    let store = PreparedObjectStore::prepare(&scene, ".").unwrap();

    assert!(store.get("r").is_err());
    assert_eq!(store.intrinsic_size(&scene.objects[0]).unwrap(), (10.0, 20.0));
    assert_eq!(store.intrinsic_size(&scene.objects[1]).unwrap(), (10.0, 16.0));
}

#[test]
fn path_intrinsic_size_is_its_bounding_box() {
    let scene = scene_with(vec![shape_object(
        "p",
        ObjectKind::Path {
            svg_path_d: "M 2 3 L 12 3 L 12 8 Z".to_string(),
            color: Color::BLACK,
        },
    )]);
    let store = PreparedObjectStore::prepare(&scene, ".").unwrap();

    assert!(matches!(
        store.get("p").unwrap(),
        PreparedContent::Path(_)
    ));
    let (w, h) = store.intrinsic_size(&scene.objects[0]).unwrap();
    assert_eq!((w, h), (10.0, 5.0));
}

#[test]
fn missing_source_file_fails_preparation() {
    let scene = scene_with(vec![shape_object(
        "img",
        ObjectKind::Image {
            source: "does-not-exist.png".to_string(),
            readback_protected: false,
        },
    )]);
    assert!(PreparedObjectStore::prepare(&scene, std::env::temp_dir()).is_err());
}

#[test]
fn empty_store_has_no_entries() {
    let store = PreparedObjectStore::empty();
    assert!(store.get("anything").is_err());
}
