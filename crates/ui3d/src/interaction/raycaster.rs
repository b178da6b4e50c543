//! UI Raycasting - Detect pointer interaction with flat scene elements

use glam::{Vec2, Vec3};

/// Result of a UI raycast
#[derive(Debug, Clone, Copy)]
pub struct UIRaycastHit {
    /// Position where ray hit the UI element
    pub position: Vec3,
    /// Distance from ray origin to hit point
    pub distance: f32,
    /// UV coordinates on the hit rectangle (0-1 range, v grows upward)
    pub uv: (f32, f32),
}

/// Raycast against a rectangle lying in a plane of constant z.
///
/// `min` and `max` are the rectangle corners as XY offsets from `center`.
pub fn raycast_flat_quad(
    ray_origin: Vec3,
    ray_dir: Vec3,
    center: Vec3,
    min: Vec2,
    max: Vec2,
) -> Option<UIRaycastHit> {
    let plane_normal = Vec3::Z;
    let denom = ray_dir.dot(plane_normal);

    // Ray parallel to plane
    if denom.abs() < 0.0001 {
        return None;
    }

    let t = (center - ray_origin).dot(plane_normal) / denom;

    // Intersection behind ray origin
    if t < 0.0 {
        return None;
    }

    let hit_pos = ray_origin + ray_dir * t;
    let local = Vec2::new(hit_pos.x - center.x, hit_pos.y - center.y);

    if local.x < min.x || local.x > max.x || local.y < min.y || local.y > max.y {
        return None;
    }

    let size = max - min;
    let uv = (
        if size.x > 0.0 { (local.x - min.x) / size.x } else { 0.5 },
        if size.y > 0.0 { (local.y - min.y) / size.y } else { 0.5 },
    );

    Some(UIRaycastHit {
        position: hit_pos,
        distance: t,
        uv,
    })
}
