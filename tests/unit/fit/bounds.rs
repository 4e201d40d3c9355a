use super::*;

use crate::foundation::core::{Canvas, Color};
use crate::scene::model::ObjectKind;

fn rect_at(id: &str, left: f64, top: f64, w: f64, h: f64) -> SceneObject {
    SceneObject {
        id: id.to_string(),
        kind: ObjectKind::Rect {
            width: w,
            height: h,
            color: Color::BLACK,
        },
        left,
        top,
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
fn empty_scene_has_no_bounds() {
    let store = PreparedObjectStore::empty();
    assert!(
        aggregate_bounds(&scene_with(vec![]), &store)
            .unwrap()
            .is_none()
    );
}

#[test]
fn single_object_bounds_are_its_rendered_rect() {
    let store = PreparedObjectStore::empty();
    let scene = scene_with(vec![rect_at("a", 5.0, 10.0, 20.0, 30.0)]);
    let bounds = aggregate_bounds(&scene, &store).unwrap().unwrap();
    assert_eq!(bounds, Rect::new(5.0, 10.0, 25.0, 40.0));
}

#[test]
fn bounds_union_all_objects() {
    let store = PreparedObjectStore::empty();
    let scene = scene_with(vec![
        rect_at("a", 0.0, 0.0, 10.0, 10.0),
        rect_at("b", 50.0, -20.0, 10.0, 10.0),
        rect_at("c", -5.0, 5.0, 2.0, 2.0),
    ]);
    let bounds = aggregate_bounds(&scene, &store).unwrap().unwrap();
    assert_eq!(bounds, Rect::new(-5.0, -20.0, 60.0, 10.0));
}

#[test]
fn rendered_rect_applies_nonuniform_scale() {
    let store = PreparedObjectStore::empty();
    let mut obj = rect_at("a", 10.0, 20.0, 4.0, 5.0);
    obj.scale_x = 2.0;
    obj.scale_y = 3.0;
    let rect = rendered_rect(&obj, &store).unwrap();
    assert_eq!(rect, Rect::new(10.0, 20.0, 18.0, 35.0));
}

#[test]
fn clip_does_not_extend_bounds() {
    use crate::scene::model::{ClipRegion, ClipShape};

    let store = PreparedObjectStore::empty();
    let mut obj = rect_at("a", 0.0, 0.0, 10.0, 10.0);
    obj.clip = Some(ClipRegion {
        shape: ClipShape::Rect {
            width: 500.0,
            height: 500.0,
        },
        left: -100.0,
        top: -100.0,
        scale_x: 1.0,
        scale_y: 1.0,
    });
    let bounds = aggregate_bounds(&scene_with(vec![obj]), &store)
        .unwrap()
        .unwrap();
    assert_eq!(bounds, Rect::new(0.0, 0.0, 10.0, 10.0));
}
