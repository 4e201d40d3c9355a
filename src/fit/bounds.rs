use crate::{
    foundation::core::Rect,
    foundation::error::SceneprintResult,
    scene::model::{Scene, SceneObject},
    scene::store::PreparedObjectStore,
};

/// Union bounding rectangle of all top-level objects' rendered extents.
///
/// Pure read over the scene; recomputed once per export call. Returns `None`
/// for a scene with no objects ("no content"), in which case the caller skips
/// the fit step entirely and exports the canvas unmodified.
pub fn aggregate_bounds(
    scene: &Scene,
    store: &PreparedObjectStore,
) -> SceneprintResult<Option<Rect>> {
    let mut acc: Option<Rect> = None;
    for obj in &scene.objects {
        let rect = rendered_rect(obj, store)?;
        acc = Some(match acc {
            Some(prev) => prev.union(rect),
            None => rect,
        });
    }
    Ok(acc)
}

/// Rendered rectangle of one object under its current transform.
///
/// Intrinsic content size scaled by the object's non-uniform scale, offset by
/// its position. Clip regions never extend an object's rendered extent.
pub fn rendered_rect(obj: &SceneObject, store: &PreparedObjectStore) -> SceneprintResult<Rect> {
    let (w, h) = store.intrinsic_size(obj)?;
    Ok(Rect::new(
        obj.left,
        obj.top,
        obj.left + w * obj.scale_x,
        obj.top + h * obj.scale_y,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/fit/bounds.rs"]
mod tests;
