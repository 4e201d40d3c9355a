use crate::{fit::solver::FitTransform, scene::model::Scene};

/// Apply a solved fit transform to every object in the scene, in place.
///
/// For each object: scales are multiplied by the uniform fit scale and the
/// position is scaled-then-offset. An owned clip region receives the identical
/// update in the same step, before the revision bump, so clip and host can
/// never render one frame out of sync.
///
/// The scene's `revision` is bumped exactly once after all objects are
/// updated: downstream renderers re-render per revision, so a pass over N
/// objects triggers one redraw, not N.
///
/// This mutation is destructive: the scene is not restored afterward. Callers
/// must operate on a disposable scene instance, never the live editor scene.
pub fn apply_fit(scene: &mut Scene, transform: FitTransform) {
    for obj in &mut scene.objects {
        obj.scale_x *= transform.scale;
        obj.scale_y *= transform.scale;
        obj.left = obj.left * transform.scale + transform.offset_x;
        obj.top = obj.top * transform.scale + transform.offset_y;

        // Clip follows host in the same logical step.
        if let Some(clip) = &mut obj.clip {
            clip.scale_x *= transform.scale;
            clip.scale_y *= transform.scale;
            clip.left = clip.left * transform.scale + transform.offset_x;
            clip.top = clip.top * transform.scale + transform.offset_y;
        }
    }

    scene.revision += 1;
}

#[cfg(test)]
#[path = "../../tests/unit/fit/apply.rs"]
mod tests;
