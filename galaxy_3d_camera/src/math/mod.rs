//! Small geometric value types used by the frustum and picking code.
//!
//! Matrices and vectors come from `glam`; this module only adds the
//! bounding volumes and the pick ray that glam does not provide.

mod bounds;
mod ray;

pub use bounds::{AABB, BoundingSphere};
pub use ray::Ray;
