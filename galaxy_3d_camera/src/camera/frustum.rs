/// Frustum: six clipping planes derived from a view-projection matrix.
///
/// Each plane is represented as a Vec4 (A, B, C, D) where:
/// - (A, B, C) is the unit-length, inward-pointing normal
/// - D is the signed distance
/// - A point P is inside the frustum if dot(plane, P_homogeneous) >= 0 for all planes
///
/// `Camera::frustum()` keeps one of these cached. The query helpers are
/// for renderer-side culling; the camera itself never culls.

use glam::{Mat4, Vec3, Vec4};
use crate::math::{AABB, BoundingSphere};

/// Result of a 3-way frustum/AABB classification.
///
/// - `Outside` → skip the object (or the entire subtree)
/// - `Inside` → keep it without further testing
/// - `Partial` → test its parts individually
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrustumTest {
    /// AABB is entirely outside the frustum
    Outside,
    /// AABB is entirely inside the frustum
    Inside,
    /// AABB partially overlaps the frustum
    Partial,
}

/// Frustum plane indices
pub const PLANE_LEFT: usize = 0;
pub const PLANE_RIGHT: usize = 1;
pub const PLANE_BOTTOM: usize = 2;
pub const PLANE_TOP: usize = 3;
pub const PLANE_NEAR: usize = 4;
pub const PLANE_FAR: usize = 5;

/// Six frustum planes.
///
/// Each plane is (A, B, C, D) where Ax + By + Cz + D = 0.
/// Normal (A, B, C) points inward (toward the visible volume).
/// Works with both perspective and orthographic projections.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frustum {
    /// Frustum planes: left, right, bottom, top, near, far
    pub planes: [Vec4; 6],
}

impl Frustum {
    /// Extract frustum planes from a view-projection matrix.
    ///
    /// Uses the Gribb & Hartmann method for OpenGL clip space
    /// (-w <= x, y, z <= w), so the near plane is row3 + row2.
    pub fn from_view_projection(vp: &Mat4) -> Self {
        let (r0, r1, r2, r3) = (vp.row(0), vp.row(1), vp.row(2), vp.row(3));

        let mut planes = [
            r3 + r0, // left
            r3 - r0, // right
            r3 + r1, // bottom
            r3 - r1, // top
            r3 + r2, // near
            r3 - r2, // far
        ];

        for plane in &mut planes {
            let normal_len = plane.truncate().length();
            if normal_len > 0.0 {
                *plane /= normal_len;
            }
        }

        Self { planes }
    }

    /// The eight corners of the volume, from the inverse view-projection.
    ///
    /// Order: near (bottom-left, bottom-right, top-right, top-left), then
    /// far in the same order.
    pub fn corners_from_inverse(inverse_vp: &Mat4) -> [Vec3; 8] {
        const NDC: [Vec3; 8] = [
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(1.0, 1.0, -1.0),
            Vec3::new(-1.0, 1.0, -1.0),
            Vec3::new(-1.0, -1.0, 1.0),
            Vec3::new(1.0, -1.0, 1.0),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(-1.0, 1.0, 1.0),
        ];
        NDC.map(|ndc| inverse_vp.project_point3(ndc))
    }

    pub fn left(&self) -> Vec4 {
        self.planes[PLANE_LEFT]
    }

    pub fn right(&self) -> Vec4 {
        self.planes[PLANE_RIGHT]
    }

    pub fn bottom(&self) -> Vec4 {
        self.planes[PLANE_BOTTOM]
    }

    pub fn top(&self) -> Vec4 {
        self.planes[PLANE_TOP]
    }

    pub fn near(&self) -> Vec4 {
        self.planes[PLANE_NEAR]
    }

    pub fn far(&self) -> Vec4 {
        self.planes[PLANE_FAR]
    }

    /// True if the point is inside or on every plane.
    pub fn contains_point(&self, point: Vec3) -> bool {
        let p = point.extend(1.0);
        self.planes.iter().all(|plane| plane.dot(p) >= 0.0)
    }

    /// Test a bounding sphere. Conservative near the frustum edges.
    pub fn intersects_sphere(&self, sphere: &BoundingSphere) -> bool {
        let center = sphere.center.extend(1.0);
        self.planes.iter().all(|plane| plane.dot(center) >= -sphere.radius)
    }

    /// Test if an AABB intersects this frustum.
    ///
    /// Uses the "positive vertex" test: for each plane, find the AABB corner
    /// most in the direction of the plane normal. If that corner is outside,
    /// the AABB is fully outside.
    ///
    /// May return false positives (conservative), never false negatives.
    pub fn intersects_aabb(&self, aabb: &AABB) -> bool {
        self.planes.iter().all(|plane| {
            let p_vertex = positive_vertex(plane.truncate(), aabb);
            plane.truncate().dot(p_vertex) + plane.w >= 0.0
        })
    }

    /// Classify an AABB against the frustum (3-way test).
    ///
    /// - If the p-vertex is outside any plane → `Outside` (early out)
    /// - If the n-vertex is outside any plane → at least `Partial`
    /// - Otherwise → `Inside`
    pub fn classify_aabb(&self, aabb: &AABB) -> FrustumTest {
        let mut all_inside = true;

        for plane in &self.planes {
            let normal = plane.truncate();

            if normal.dot(positive_vertex(normal, aabb)) + plane.w < 0.0 {
                return FrustumTest::Outside;
            }

            // The n-vertex is the corner opposite the p-vertex
            let n_vertex = aabb.min + aabb.max - positive_vertex(normal, aabb);
            if normal.dot(n_vertex) + plane.w < 0.0 {
                all_inside = false;
            }
        }

        if all_inside { FrustumTest::Inside } else { FrustumTest::Partial }
    }
}

/// AABB corner most aligned with `normal`.
fn positive_vertex(normal: Vec3, aabb: &AABB) -> Vec3 {
    Vec3::select(normal.cmpge(Vec3::ZERO), aabb.max, aabb.min)
}

#[cfg(test)]
#[path = "frustum_tests.rs"]
mod tests;
