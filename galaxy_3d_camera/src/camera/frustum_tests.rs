use glam::{Mat4, Vec3, Vec4};
use crate::math::{AABB, BoundingSphere};
use super::*;

/// 90° vertical FOV, square aspect, near 1, far 100, looking down -Z.
fn create_test_frustum() -> Frustum {
    let projection = Mat4::perspective_rh_gl(std::f32::consts::FRAC_PI_2, 1.0, 1.0, 100.0);
    Frustum::from_view_projection(&projection)
}

fn assert_plane_eq(actual: Vec4, expected: Vec4, tolerance: f32) {
    assert!(
        actual.abs_diff_eq(expected, tolerance),
        "plane {:?} != expected {:?}",
        actual,
        expected
    );
}

// ============================================================================
// Frustum::from_view_projection
// ============================================================================

#[test]
fn test_frustum_from_identity_matrix() {
    let frustum = Frustum::from_view_projection(&Mat4::IDENTITY);

    // Identity VP → NDC cube: x,y,z in [-1, 1]
    assert_plane_eq(frustum.left(), Vec4::new(1.0, 0.0, 0.0, 1.0), 1e-6);
    assert_plane_eq(frustum.right(), Vec4::new(-1.0, 0.0, 0.0, 1.0), 1e-6);
    assert_plane_eq(frustum.bottom(), Vec4::new(0.0, 1.0, 0.0, 1.0), 1e-6);
    assert_plane_eq(frustum.top(), Vec4::new(0.0, -1.0, 0.0, 1.0), 1e-6);
    assert_plane_eq(frustum.near(), Vec4::new(0.0, 0.0, 1.0, 1.0), 1e-6);
    assert_plane_eq(frustum.far(), Vec4::new(0.0, 0.0, -1.0, 1.0), 1e-6);
}

#[test]
fn test_planes_are_normalized() {
    let view = Mat4::look_at_rh(Vec3::new(3.0, 2.0, 5.0), Vec3::ZERO, Vec3::Y);
    let projection = Mat4::perspective_rh_gl(0.8, 16.0 / 9.0, 0.1, 100.0);
    let frustum = Frustum::from_view_projection(&(projection * view));

    for plane in &frustum.planes {
        let normal_len = plane.truncate().length();
        assert!((normal_len - 1.0).abs() < 1e-4, "plane normal should be unit length");
    }
}

#[test]
fn test_perspective_near_and_far_planes() {
    let frustum = create_test_frustum();

    // Near plane z = -1 facing -Z, far plane z = -100 facing +Z
    assert_plane_eq(frustum.near(), Vec4::new(0.0, 0.0, -1.0, -1.0), 1e-4);
    assert_plane_eq(frustum.far(), Vec4::new(0.0, 0.0, 1.0, 100.0), 1e-2);
}

#[test]
fn test_perspective_side_planes_point_inward() {
    let frustum = create_test_frustum();
    let half = std::f32::consts::FRAC_1_SQRT_2;

    assert_plane_eq(frustum.left(), Vec4::new(half, 0.0, -half, 0.0), 1e-5);
    assert_plane_eq(frustum.right(), Vec4::new(-half, 0.0, -half, 0.0), 1e-5);
    assert_plane_eq(frustum.bottom(), Vec4::new(0.0, half, -half, 0.0), 1e-5);
    assert_plane_eq(frustum.top(), Vec4::new(0.0, -half, -half, 0.0), 1e-5);
}

#[test]
fn test_plane_index_constants() {
    let frustum = create_test_frustum();

    assert_eq!(frustum.planes[PLANE_LEFT], frustum.left());
    assert_eq!(frustum.planes[PLANE_RIGHT], frustum.right());
    assert_eq!(frustum.planes[PLANE_BOTTOM], frustum.bottom());
    assert_eq!(frustum.planes[PLANE_TOP], frustum.top());
    assert_eq!(frustum.planes[PLANE_NEAR], frustum.near());
    assert_eq!(frustum.planes[PLANE_FAR], frustum.far());
}

// ============================================================================
// Point and sphere queries
// ============================================================================

#[test]
fn test_contains_point() {
    let frustum = create_test_frustum();

    assert!(frustum.contains_point(Vec3::new(0.0, 0.0, -10.0)));
    assert!(frustum.contains_point(Vec3::new(-5.0, 4.0, -10.0)));

    assert!(!frustum.contains_point(Vec3::new(0.0, 0.0, 10.0)), "behind the camera");
    assert!(!frustum.contains_point(Vec3::new(0.0, 0.0, -0.5)), "closer than near");
    assert!(!frustum.contains_point(Vec3::new(0.0, 0.0, -150.0)), "beyond far");
    assert!(!frustum.contains_point(Vec3::new(20.0, 0.0, -10.0)), "right of the frustum");
}

#[test]
fn test_intersects_sphere() {
    let frustum = create_test_frustum();

    assert!(frustum.intersects_sphere(&BoundingSphere::new(Vec3::new(0.0, 0.0, -10.0), 1.0)));

    // Center ~7.07 units outside the right plane
    let center = Vec3::new(20.0, 0.0, -10.0);
    assert!(frustum.intersects_sphere(&BoundingSphere::new(center, 8.0)));
    assert!(!frustum.intersects_sphere(&BoundingSphere::new(center, 5.0)));
}

// ============================================================================
// AABB queries
// ============================================================================

#[test]
fn test_intersects_aabb() {
    let frustum = create_test_frustum();

    let visible = AABB::from_center_half_extents(Vec3::new(0.0, 0.0, -10.0), Vec3::ONE);
    assert!(frustum.intersects_aabb(&visible));

    let behind = AABB::new(Vec3::new(-1.0, -1.0, 5.0), Vec3::new(1.0, 1.0, 6.0));
    assert!(!frustum.intersects_aabb(&behind));

    let far_left = AABB::new(Vec3::new(-50.0, -1.0, -11.0), Vec3::new(-40.0, 1.0, -9.0));
    assert!(!frustum.intersects_aabb(&far_left));
}

#[test]
fn test_classify_aabb() {
    let frustum = create_test_frustum();

    let inside = AABB::from_center_half_extents(Vec3::new(0.0, 0.0, -10.0), Vec3::ONE);
    assert_eq!(frustum.classify_aabb(&inside), FrustumTest::Inside);

    let straddling_near = AABB::new(Vec3::new(-0.5, -0.5, -2.0), Vec3::new(0.5, 0.5, 0.0));
    assert_eq!(frustum.classify_aabb(&straddling_near), FrustumTest::Partial);

    let outside = AABB::new(Vec3::new(-1.0, -1.0, 5.0), Vec3::new(1.0, 1.0, 6.0));
    assert_eq!(frustum.classify_aabb(&outside), FrustumTest::Outside);
}

#[test]
fn test_classify_aabb_enclosing_frustum_is_partial() {
    let frustum = create_test_frustum();
    let huge = AABB::new(Vec3::splat(-1000.0), Vec3::splat(1000.0));

    assert!(frustum.intersects_aabb(&huge));
    assert_eq!(frustum.classify_aabb(&huge), FrustumTest::Partial);
}

// ============================================================================
// Corners
// ============================================================================

#[test]
fn test_corners_from_inverse_orthographic() {
    let projection = Mat4::orthographic_rh_gl(-2.0, 2.0, -1.0, 1.0, 1.0, 10.0);
    let corners = Frustum::corners_from_inverse(&projection.inverse());

    let expected = [
        Vec3::new(-2.0, -1.0, -1.0),
        Vec3::new(2.0, -1.0, -1.0),
        Vec3::new(2.0, 1.0, -1.0),
        Vec3::new(-2.0, 1.0, -1.0),
        Vec3::new(-2.0, -1.0, -10.0),
        Vec3::new(2.0, -1.0, -10.0),
        Vec3::new(2.0, 1.0, -10.0),
        Vec3::new(-2.0, 1.0, -10.0),
    ];
    for (corner, expected) in corners.iter().zip(expected.iter()) {
        assert!(corner.abs_diff_eq(*expected, 1e-4), "{:?} != {:?}", corner, expected);
    }
}

#[test]
fn test_corners_from_inverse_perspective() {
    let projection = Mat4::perspective_rh_gl(std::f32::consts::FRAC_PI_2, 1.0, 1.0, 100.0);
    let corners = Frustum::corners_from_inverse(&projection.inverse());

    assert!(corners[0].abs_diff_eq(Vec3::new(-1.0, -1.0, -1.0), 1e-4));
    assert!(corners[2].abs_diff_eq(Vec3::new(1.0, 1.0, -1.0), 1e-4));
    assert!(corners[6].abs_diff_eq(Vec3::new(100.0, 100.0, -100.0), 0.1));

    // Every corner lies on the boundary, so a slightly shrunk copy is inside
    let frustum = Frustum::from_view_projection(&projection);
    let center = corners.iter().copied().sum::<Vec3>() / 8.0;
    for corner in corners {
        assert!(frustum.contains_point(center + (corner - center) * 0.99));
    }
}
