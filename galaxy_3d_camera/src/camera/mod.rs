//! Camera module: camera, cached matrices and frustum.
//!
//! A `Camera` is attached to a scene `Node` and derives its view from the
//! node's world transform. Every derived matrix is cached and recomputed
//! lazily when its inputs change.

mod camera;
mod frustum;
mod matrix_cache;

pub use camera::{
    Camera, CameraRef, CameraType, CameraUniform, ScreenPoint, PROJECTION_EPSILON,
};
pub use frustum::{
    Frustum, FrustumTest,
    PLANE_LEFT, PLANE_RIGHT, PLANE_BOTTOM, PLANE_TOP, PLANE_NEAR, PLANE_FAR,
};
pub use matrix_cache::{CacheBits, CacheInvalidator, RecomputeCounts, SINGULAR_TOLERANCE};
