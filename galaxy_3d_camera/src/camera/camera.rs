/// Camera: projection parameters plus lazily cached derived matrices.
///
/// A camera holds its projection parameters (perspective or orthographic)
/// and reads its view from the node it is attached to. Derived values are
/// cached and recomputed on read, only when one of their inputs changed:
///
/// - projection setters mark the projection-dependent values stale
/// - node transform changes mark the view-dependent values stale
///
/// Cameras are shared as `CameraRef` (`Rc<RefCell<Camera>>`). A node owns
/// its camera; the camera only keeps a `Weak` back-reference to the node.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2, Vec3, Vec4};
use crate::error::Result;
use crate::engine::Engine;
use crate::viewport::Viewport;
use crate::math::Ray;
use crate::scene::{ListenerKey, Node, TransformListener};
use crate::{engine_bail, engine_debug, engine_trace, engine_warn};
use super::frustum::Frustum;
use super::matrix_cache::{try_invert, CacheBits, MatrixCache, RecomputeCounts};

/// Shared handle to a camera.
pub type CameraRef = Rc<RefCell<Camera>>;

/// Clip-space w at or below this is treated as "at or behind the camera".
pub const PROJECTION_EPSILON: f32 = 1e-6;

const LOG_SOURCE: &str = "galaxy3d::Camera";

/// Projection kind, fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CameraType {
    Perspective,
    Orthographic,
}

/// Result of `Camera::project`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    /// Pixel x, from the viewport's left edge
    pub x: f32,
    /// Pixel y, from the viewport's top edge
    pub y: f32,
    /// Depth in [0, 1] for points between the near and far planes
    pub depth: f32,
    /// Clip-space w before the perspective divide
    pub w: f32,
}

impl ScreenPoint {
    /// False when the point was at or behind the camera plane; x/y/depth
    /// are then not meaningful.
    pub fn is_reliable(&self) -> bool {
        self.w > PROJECTION_EPSILON
    }
}

/// Per-frame camera block in std140-compatible layout.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct CameraUniform {
    pub view: Mat4,
    pub projection: Mat4,
    pub view_projection: Mat4,
    pub inverse_view: Mat4,
    /// World-space camera position, w = 1
    pub position: Vec4,
}

#[derive(Debug)]
pub struct Camera {
    camera_type: CameraType,
    /// Vertical field of view in degrees (0 for orthographic cameras)
    field_of_view: f32,
    zoom: Vec2,
    aspect_ratio: f32,
    near_plane: f32,
    far_plane: f32,
    node: Weak<Node>,
    subscription: Option<ListenerKey>,
    cache: MatrixCache,
}

impl Camera {
    // ===== CREATION =====

    /// Create a perspective camera.
    ///
    /// # Arguments
    ///
    /// * `field_of_view` - Vertical field of view in degrees, in (0, 180)
    /// * `aspect_ratio` - Width / height, > 0
    /// * `near_plane` - Distance to the near plane, > 0
    /// * `far_plane` - Distance to the far plane, > `near_plane`
    pub fn create_perspective(
        field_of_view: f32,
        aspect_ratio: f32,
        near_plane: f32,
        far_plane: f32,
    ) -> Result<CameraRef> {
        validate_field_of_view(field_of_view)?;
        validate_positive("aspect ratio", aspect_ratio)?;
        validate_clip_planes(near_plane, far_plane)?;

        engine_debug!(LOG_SOURCE, "Perspective camera created (fov {}°, aspect {}, near {}, far {})",
            field_of_view, aspect_ratio, near_plane, far_plane);

        Ok(Rc::new(RefCell::new(Self::new(
            CameraType::Perspective,
            field_of_view,
            Vec2::ONE,
            aspect_ratio,
            near_plane,
            far_plane,
        ))))
    }

    /// Create an orthographic camera.
    ///
    /// The visible volume spans `zoom_x * aspect_ratio` by `zoom_y` world
    /// units, centered on the view axis.
    pub fn create_orthographic(
        zoom_x: f32,
        zoom_y: f32,
        aspect_ratio: f32,
        near_plane: f32,
        far_plane: f32,
    ) -> Result<CameraRef> {
        validate_positive("zoom x", zoom_x)?;
        validate_positive("zoom y", zoom_y)?;
        validate_positive("aspect ratio", aspect_ratio)?;
        validate_clip_planes(near_plane, far_plane)?;

        engine_debug!(LOG_SOURCE, "Orthographic camera created (zoom {}x{}, aspect {}, near {}, far {})",
            zoom_x, zoom_y, aspect_ratio, near_plane, far_plane);

        Ok(Rc::new(RefCell::new(Self::new(
            CameraType::Orthographic,
            0.0,
            Vec2::new(zoom_x, zoom_y),
            aspect_ratio,
            near_plane,
            far_plane,
        ))))
    }

    fn new(
        camera_type: CameraType,
        field_of_view: f32,
        zoom: Vec2,
        aspect_ratio: f32,
        near_plane: f32,
        far_plane: f32,
    ) -> Self {
        Self {
            camera_type,
            field_of_view,
            zoom,
            aspect_ratio,
            near_plane,
            far_plane,
            node: Weak::new(),
            subscription: None,
            cache: MatrixCache::new(),
        }
    }

    // ===== PARAMETERS =====

    pub fn camera_type(&self) -> CameraType {
        self.camera_type
    }

    /// Vertical field of view in degrees.
    pub fn field_of_view(&self) -> f32 {
        self.field_of_view
    }

    pub fn zoom_x(&self) -> f32 {
        self.zoom.x
    }

    pub fn zoom_y(&self) -> f32 {
        self.zoom.y
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    pub fn near_plane(&self) -> f32 {
        self.near_plane
    }

    pub fn far_plane(&self) -> f32 {
        self.far_plane
    }

    /// Only used by perspective cameras.
    pub fn set_field_of_view(&mut self, field_of_view: f32) -> Result<()> {
        validate_field_of_view(field_of_view)?;
        self.field_of_view = field_of_view;
        self.projection_changed();
        Ok(())
    }

    /// Only used by orthographic cameras.
    pub fn set_zoom_x(&mut self, zoom_x: f32) -> Result<()> {
        validate_positive("zoom x", zoom_x)?;
        self.zoom.x = zoom_x;
        self.projection_changed();
        Ok(())
    }

    /// Only used by orthographic cameras.
    pub fn set_zoom_y(&mut self, zoom_y: f32) -> Result<()> {
        validate_positive("zoom y", zoom_y)?;
        self.zoom.y = zoom_y;
        self.projection_changed();
        Ok(())
    }

    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) -> Result<()> {
        validate_positive("aspect ratio", aspect_ratio)?;
        self.aspect_ratio = aspect_ratio;
        self.projection_changed();
        Ok(())
    }

    /// Must stay below the current far plane.
    pub fn set_near_plane(&mut self, near_plane: f32) -> Result<()> {
        validate_clip_planes(near_plane, self.far_plane)?;
        self.near_plane = near_plane;
        self.projection_changed();
        Ok(())
    }

    /// Must stay above the current near plane.
    pub fn set_far_plane(&mut self, far_plane: f32) -> Result<()> {
        validate_clip_planes(self.near_plane, far_plane)?;
        self.far_plane = far_plane;
        self.projection_changed();
        Ok(())
    }

    fn projection_changed(&self) {
        self.cache.invalidate(CacheBits::PROJECTION_DEPENDENT);
    }

    // ===== NODE =====

    /// Node this camera is attached to, if it is still alive.
    pub fn node(&self) -> Option<Rc<Node>> {
        self.node.upgrade()
    }

    /// Mark every view-dependent value stale.
    ///
    /// Called through the node's transform notification; callers rarely
    /// need it directly.
    pub fn on_node_transform_changed(&self) {
        self.cache.invalidate(CacheBits::VIEW_DEPENDENT);
    }

    /// Attach to `node` (or detach with `None`). Only `Node::set_camera`
    /// and node teardown call this, keeping both sides consistent.
    pub(crate) fn set_node(&mut self, node: Option<&Rc<Node>>) {
        match node {
            Some(node) if self.subscription.is_some() && self.node.ptr_eq(&Rc::downgrade(node)) => return,
            None if self.subscription.is_none() => return,
            _ => {}
        }

        if let Some(key) = self.subscription.take() {
            if let Some(previous) = self.node.upgrade() {
                previous.remove_transform_listener(key);
            }
        }
        self.node = Weak::new();

        if let Some(node) = node {
            let listener = Rc::downgrade(&self.cache.invalidator) as Weak<dyn TransformListener>;
            self.subscription = Some(node.add_transform_listener(listener));
            self.node = Rc::downgrade(node);
        }

        self.on_node_transform_changed();
    }

    // ===== CACHED MATRICES =====

    /// Inverse of the node's world matrix, or identity when unattached.
    pub fn view_matrix(&self) -> Mat4 {
        if self.cache.is_dirty(CacheBits::VIEW) {
            let (view, degraded) = match self.node.upgrade() {
                Some(node) => invert_or_identity(&node.world_matrix(), "node world"),
                None => (Mat4::IDENTITY, false),
            };
            self.cache.view.set(view);
            self.cache.mark_fresh(CacheBits::VIEW, degraded);
        }
        self.cache.view.get()
    }

    /// OpenGL-convention projection (right-handed, clip depth in [-1, 1]).
    pub fn projection_matrix(&self) -> Mat4 {
        if self.cache.is_dirty(CacheBits::PROJECTION) {
            self.cache.projection.set(self.compute_projection());
            self.cache.mark_fresh(CacheBits::PROJECTION, false);
        }
        self.cache.projection.get()
    }

    /// `projection * view`.
    pub fn view_projection_matrix(&self) -> Mat4 {
        if self.cache.is_dirty(CacheBits::VIEW_PROJECTION) {
            let view_projection = self.projection_matrix() * self.view_matrix();
            let degraded = self.cache.is_degraded(CacheBits::VIEW | CacheBits::PROJECTION);
            self.cache.view_projection.set(view_projection);
            self.cache.mark_fresh(CacheBits::VIEW_PROJECTION, degraded);
        }
        self.cache.view_projection.get()
    }

    /// Camera-to-world matrix.
    pub fn inverse_view_matrix(&self) -> Mat4 {
        if self.cache.is_dirty(CacheBits::INVERSE_VIEW) {
            let (inverse, failed) = invert_or_identity(&self.view_matrix(), "view");
            let degraded = failed || self.cache.is_degraded(CacheBits::VIEW);
            self.cache.inverse_view.set(inverse);
            self.cache.mark_fresh(CacheBits::INVERSE_VIEW, degraded);
        }
        self.cache.inverse_view.get()
    }

    pub fn inverse_view_projection_matrix(&self) -> Mat4 {
        if self.cache.is_dirty(CacheBits::INVERSE_VIEW_PROJECTION) {
            let (inverse, failed) = invert_or_identity(&self.view_projection_matrix(), "view-projection");
            let degraded = failed || self.cache.is_degraded(CacheBits::VIEW_PROJECTION);
            self.cache.inverse_view_projection.set(inverse);
            self.cache.mark_fresh(CacheBits::INVERSE_VIEW_PROJECTION, degraded);
        }
        self.cache.inverse_view_projection.get()
    }

    /// Frustum planes of the current view-projection.
    pub fn frustum(&self) -> Frustum {
        if self.cache.is_dirty(CacheBits::FRUSTUM) {
            let frustum = Frustum::from_view_projection(&self.view_projection_matrix());
            let degraded = self.cache.is_degraded(CacheBits::VIEW_PROJECTION);
            self.cache.frustum.set(frustum);
            self.cache.mark_fresh(CacheBits::FRUSTUM, degraded);
        }
        self.cache.frustum.get()
    }

    /// World-space frustum corners, see `Frustum::corners_from_inverse`.
    pub fn frustum_corners(&self) -> [Vec3; 8] {
        Frustum::corners_from_inverse(&self.inverse_view_projection_matrix())
    }

    /// World-space camera position.
    pub fn position(&self) -> Vec3 {
        self.inverse_view_matrix().w_axis.truncate()
    }

    /// Snapshot of the matrices a renderer uploads each frame.
    pub fn uniform(&self) -> CameraUniform {
        let inverse_view = self.inverse_view_matrix();
        CameraUniform {
            view: self.view_matrix(),
            projection: self.projection_matrix(),
            view_projection: self.view_projection_matrix(),
            inverse_view,
            position: inverse_view.w_axis,
        }
    }

    // ===== CACHE STATE =====

    /// Values that will be recomputed on their next read.
    pub fn dirty_bits(&self) -> CacheBits {
        self.cache.dirty_bits()
    }

    /// Values that fell back to identity (or were derived from one) on
    /// their last recomputation.
    pub fn degraded_bits(&self) -> CacheBits {
        self.cache.degraded_bits()
    }

    pub fn is_degraded(&self) -> bool {
        !self.cache.degraded_bits().is_empty()
    }

    pub fn recompute_counts(&self) -> RecomputeCounts {
        self.cache.counts()
    }

    // ===== COORDINATE MAPPING =====

    /// Project a world-space position to viewport pixels.
    ///
    /// `viewport = None` uses `Engine::default_viewport()`. Check
    /// `ScreenPoint::is_reliable()` before trusting the result: at or behind
    /// the camera plane the perspective divide is skipped.
    pub fn project(&self, viewport: Option<&Viewport>, position: Vec3) -> ScreenPoint {
        let viewport = resolve_viewport(viewport);
        let clip = self.view_projection_matrix() * position.extend(1.0);
        let ndc = if clip.w.abs() > PROJECTION_EPSILON {
            clip.truncate() / clip.w
        } else {
            clip.truncate()
        };

        let pixel = viewport.ndc_to_pixel(ndc.truncate());
        ScreenPoint {
            x: pixel.x,
            y: pixel.y,
            depth: (ndc.z + 1.0) * 0.5,
            w: clip.w,
        }
    }

    /// World-space position at pixel (x, y) and `depth` in [0, 1]
    /// (0 = near plane, 1 = far plane).
    pub fn unproject(&self, viewport: Option<&Viewport>, x: f32, y: f32, depth: f32) -> Vec3 {
        let viewport = resolve_viewport(viewport);
        let ndc = viewport.pixel_to_ndc(x, y);
        let clip = Vec4::new(ndc.x, ndc.y, depth * 2.0 - 1.0, 1.0);

        let world = self.inverse_view_projection_matrix() * clip;
        if world.w.abs() > PROJECTION_EPSILON {
            world.truncate() / world.w
        } else {
            world.truncate()
        }
    }

    /// Ray from the near plane through pixel (x, y).
    pub fn pick_ray(&self, viewport: Option<&Viewport>, x: f32, y: f32) -> Ray {
        let viewport = resolve_viewport(viewport);
        let near = self.unproject(Some(&viewport), x, y, 0.0);
        let far = self.unproject(Some(&viewport), x, y, 1.0);
        engine_trace!(LOG_SOURCE, "Pick ray at ({}, {}): {:?} -> {:?}", x, y, near, far);
        Ray::new(near, far - near)
    }

    // ===== INTERNAL =====

    fn compute_projection(&self) -> Mat4 {
        let (near, far) = (self.near_plane, self.far_plane);
        match self.camera_type {
            CameraType::Perspective => {
                let f = 1.0 / (self.field_of_view.to_radians() * 0.5).tan();
                Mat4::from_cols(
                    Vec4::new(f / self.aspect_ratio, 0.0, 0.0, 0.0),
                    Vec4::new(0.0, f, 0.0, 0.0),
                    Vec4::new(0.0, 0.0, (far + near) / (near - far), -1.0),
                    Vec4::new(0.0, 0.0, 2.0 * far * near / (near - far), 0.0),
                )
            }
            CameraType::Orthographic => {
                let width = self.zoom.x * self.aspect_ratio;
                let height = self.zoom.y;
                Mat4::from_cols(
                    Vec4::new(2.0 / width, 0.0, 0.0, 0.0),
                    Vec4::new(0.0, 2.0 / height, 0.0, 0.0),
                    Vec4::new(0.0, 0.0, -2.0 / (far - near), 0.0),
                    Vec4::new(0.0, 0.0, -(far + near) / (far - near), 1.0),
                )
            }
        }
    }
}

impl Drop for Camera {
    fn drop(&mut self) {
        if let Some(key) = self.subscription.take() {
            if let Some(node) = self.node.upgrade() {
                node.remove_transform_listener(key);
            }
        }
    }
}

fn resolve_viewport(viewport: Option<&Viewport>) -> Viewport {
    viewport.copied().unwrap_or_else(Engine::default_viewport)
}

/// Returns the inverse and false, or identity and true when singular.
fn invert_or_identity(matrix: &Mat4, what: &str) -> (Mat4, bool) {
    match try_invert(matrix) {
        Some(inverse) => (inverse, false),
        None => {
            engine_warn!(LOG_SOURCE, "Singular {} matrix, using identity", what);
            (Mat4::IDENTITY, true)
        }
    }
}

fn validate_positive(name: &str, value: f32) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        engine_bail!(LOG_SOURCE, "{} must be finite and > 0 (got {})", name, value);
    }
    Ok(())
}

fn validate_field_of_view(field_of_view: f32) -> Result<()> {
    if !field_of_view.is_finite() || field_of_view <= 0.0 || field_of_view >= 180.0 {
        engine_bail!(LOG_SOURCE, "field of view must be in (0, 180) degrees (got {})", field_of_view);
    }
    Ok(())
}

fn validate_clip_planes(near_plane: f32, far_plane: f32) -> Result<()> {
    validate_positive("near plane", near_plane)?;
    if !far_plane.is_finite() || near_plane >= far_plane {
        engine_bail!(LOG_SOURCE, "clip planes must satisfy 0 < near < far (got near {}, far {})",
            near_plane, far_plane);
    }
    Ok(())
}

#[cfg(test)]
#[path = "camera_tests.rs"]
mod tests;
