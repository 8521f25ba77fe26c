/// Ray: half-line used for picking.
///
/// Produced by `Camera::pick_ray`. The intersection helpers return the
/// distance `t` along the ray (so the hit point is `point_at(t)`), or
/// `None` on a miss or when the hit lies behind the origin.

use glam::{Vec3, Vec4};
use super::bounds::{AABB, BoundingSphere};

/// A ray with an origin and a unit-length direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit length, or zero for a degenerate ray
    pub direction: Vec3,
}

impl Ray {
    /// Create a ray. The direction is normalized (zero stays zero).
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction: direction.normalize_or_zero() }
    }

    /// Point at distance `t` along the ray.
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Intersect with a plane given as (A, B, C, D), Ax + By + Cz + D = 0.
    ///
    /// Same representation as the `Frustum` planes. Parallel rays miss.
    pub fn intersect_plane(&self, plane: Vec4) -> Option<f32> {
        let normal = plane.truncate();
        let denom = normal.dot(self.direction);
        if denom.abs() < f32::EPSILON {
            return None;
        }
        let t = -(normal.dot(self.origin) + plane.w) / denom;
        (t >= 0.0).then_some(t)
    }

    /// Slab test against an AABB. Returns 0 when the origin is inside.
    pub fn intersect_aabb(&self, aabb: &AABB) -> Option<f32> {
        let mut t_min = 0.0_f32;
        let mut t_max = f32::INFINITY;

        for axis in 0..3 {
            let origin = self.origin[axis];
            let direction = self.direction[axis];

            if direction.abs() < f32::EPSILON {
                // Parallel to this slab: must already be between its planes
                if origin < aabb.min[axis] || origin > aabb.max[axis] {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / direction;
            let mut t0 = (aabb.min[axis] - origin) * inv;
            let mut t1 = (aabb.max[axis] - origin) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return None;
            }
        }

        Some(t_min)
    }

    /// Nearest non-negative hit with a sphere. Returns 0 when the origin is inside.
    pub fn intersect_sphere(&self, sphere: &BoundingSphere) -> Option<f32> {
        let to_center = sphere.center - self.origin;
        let along = to_center.dot(self.direction);
        let dist_sq = to_center.length_squared() - along * along;
        let radius_sq = sphere.radius * sphere.radius;
        if dist_sq > radius_sq {
            return None;
        }

        let half_chord = (radius_sq - dist_sq).sqrt();
        let t_near = along - half_chord;
        let t_far = along + half_chord;

        if t_far < 0.0 {
            None
        } else {
            Some(t_near.max(0.0))
        }
    }
}

#[cfg(test)]
#[path = "ray_tests.rs"]
mod tests;
