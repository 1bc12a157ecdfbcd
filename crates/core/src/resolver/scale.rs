// Scale factor inference between two skeletons
// Total function; degrades to 1.0 on any degenerate input

use glam::Vec3;

use crate::model::{CanonicalRole, Skeleton};

/// Reference spans or scales below this are treated as degenerate.
const MIN_REFERENCE_VALUE: f32 = 1e-5;

/// Size ratio `destination / source`, used to rescale radii and offsets of
/// relocated rigging.
///
/// Prefers the Hips-to-Head world-space span when both skeletons expose
/// those roles with positions; otherwise falls back to the ratio of the
/// two roots' effective world scale. Never fails: a missing or degenerate
/// reference yields 1.0 instead of NaN or infinity.
pub fn compute_scale_factor(source: &Skeleton, destination: &Skeleton) -> f32 {
    if let (Some(source_span), Some(destination_span)) = (role_span(source), role_span(destination))
    {
        if source_span < MIN_REFERENCE_VALUE {
            return 1.0;
        }
        return destination_span / source_span;
    }

    let source_scale = root_scale(source);
    if source_scale < MIN_REFERENCE_VALUE {
        return 1.0;
    }
    root_scale(destination) / source_scale
}

/// Euclidean distance between the Hips and Head joints, when both are
/// role-mapped and carry world positions.
fn role_span(skeleton: &Skeleton) -> Option<f32> {
    let hips = role_position(skeleton, CanonicalRole::Hips)?;
    let head = role_position(skeleton, CanonicalRole::Head)?;
    Some(hips.distance(head))
}

fn role_position(skeleton: &Skeleton, role: CanonicalRole) -> Option<Vec3> {
    let id = skeleton.role_bone(role)?;
    skeleton.bone(id)?.world_position
}

/// Effective world scale of the root along the x axis; 1.0 when unset.
fn root_scale(skeleton: &Skeleton) -> f32 {
    skeleton
        .bone(skeleton.root())
        .and_then(|bone| bone.world_scale)
        .map_or(1.0, |scale| scale.x)
}
