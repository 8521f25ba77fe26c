/// Cached camera matrices and their dirty-bit bookkeeping.
///
/// Every derived value of a camera (view, projection, view-projection,
/// both inverses, frustum) lives in a `Cell` next to one dirty bit. Writers
/// only set bits; readers recompute what is dirty on the next access.
///
/// The dirty bits live in a `CacheInvalidator` shared through `Rc`: the
/// camera registers a `Weak` to it as the node's `TransformListener`, so a
/// node can invalidate the view without touching the camera itself.

use std::cell::Cell;
use std::rc::Rc;
use bitflags::bitflags;
use glam::Mat4;
use crate::scene::{Node, TransformListener};
use super::frustum::Frustum;

/// Determinants at or below this magnitude are treated as singular.
pub const SINGULAR_TOLERANCE: f32 = 2e-37;

bitflags! {
    /// One bit per cached value.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CacheBits: u8 {
        const VIEW = 1 << 0;
        const PROJECTION = 1 << 1;
        const VIEW_PROJECTION = 1 << 2;
        const INVERSE_VIEW = 1 << 3;
        const INVERSE_VIEW_PROJECTION = 1 << 4;
        const FRUSTUM = 1 << 5;

        /// Everything a node transform change makes stale.
        const VIEW_DEPENDENT = Self::VIEW.bits()
            | Self::VIEW_PROJECTION.bits()
            | Self::INVERSE_VIEW.bits()
            | Self::INVERSE_VIEW_PROJECTION.bits()
            | Self::FRUSTUM.bits();

        /// Everything a projection parameter change makes stale.
        const PROJECTION_DEPENDENT = Self::PROJECTION.bits()
            | Self::VIEW_PROJECTION.bits()
            | Self::INVERSE_VIEW_PROJECTION.bits()
            | Self::FRUSTUM.bits();
    }
}

/// How many times each cached value has been recomputed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecomputeCounts {
    pub view: u64,
    pub projection: u64,
    pub view_projection: u64,
    pub inverse_view: u64,
    pub inverse_view_projection: u64,
    pub frustum: u64,
}

/// Owner of the dirty bits, and the camera's transform listener.
#[derive(Debug)]
pub struct CacheInvalidator {
    dirty: Cell<CacheBits>,
}

impl CacheInvalidator {
    pub(crate) fn new() -> Self {
        Self { dirty: Cell::new(CacheBits::all()) }
    }

    pub fn dirty_bits(&self) -> CacheBits {
        self.dirty.get()
    }

    pub fn invalidate(&self, bits: CacheBits) {
        self.dirty.set(self.dirty.get() | bits);
    }

    pub(crate) fn is_dirty(&self, bit: CacheBits) -> bool {
        self.dirty.get().intersects(bit)
    }

    pub(crate) fn clear(&self, bit: CacheBits) {
        self.dirty.set(self.dirty.get() - bit);
    }
}

impl TransformListener for CacheInvalidator {
    fn transform_changed(&self, _node: &Node) {
        self.invalidate(CacheBits::VIEW_DEPENDENT);
    }
}

/// Cached values of one camera. Read and refreshed through `&self`.
#[derive(Debug)]
pub(crate) struct MatrixCache {
    pub invalidator: Rc<CacheInvalidator>,
    pub view: Cell<Mat4>,
    pub projection: Cell<Mat4>,
    pub view_projection: Cell<Mat4>,
    pub inverse_view: Cell<Mat4>,
    pub inverse_view_projection: Cell<Mat4>,
    pub frustum: Cell<Frustum>,
    degraded: Cell<CacheBits>,
    counts: Cell<RecomputeCounts>,
}

impl MatrixCache {
    pub fn new() -> Self {
        Self {
            invalidator: Rc::new(CacheInvalidator::new()),
            view: Cell::new(Mat4::IDENTITY),
            projection: Cell::new(Mat4::IDENTITY),
            view_projection: Cell::new(Mat4::IDENTITY),
            inverse_view: Cell::new(Mat4::IDENTITY),
            inverse_view_projection: Cell::new(Mat4::IDENTITY),
            frustum: Cell::new(Frustum::from_view_projection(&Mat4::IDENTITY)),
            degraded: Cell::new(CacheBits::empty()),
            counts: Cell::new(RecomputeCounts::default()),
        }
    }

    pub fn is_dirty(&self, bit: CacheBits) -> bool {
        self.invalidator.is_dirty(bit)
    }

    pub fn invalidate(&self, bits: CacheBits) {
        self.invalidator.invalidate(bits);
    }

    pub fn dirty_bits(&self) -> CacheBits {
        self.invalidator.dirty_bits()
    }

    pub fn degraded_bits(&self) -> CacheBits {
        self.degraded.get()
    }

    /// Store a freshly computed value's state: clear its dirty bit, set or
    /// clear its degraded bit and count the recomputation.
    pub fn mark_fresh(&self, bit: CacheBits, degraded: bool) {
        self.invalidator.clear(bit);
        self.degraded.set(self.degraded.get().difference(bit));
        if degraded {
            self.degraded.set(self.degraded.get() | bit);
        }

        let mut counts = self.counts.get();
        if bit == CacheBits::VIEW {
            counts.view += 1;
        } else if bit == CacheBits::PROJECTION {
            counts.projection += 1;
        } else if bit == CacheBits::VIEW_PROJECTION {
            counts.view_projection += 1;
        } else if bit == CacheBits::INVERSE_VIEW {
            counts.inverse_view += 1;
        } else if bit == CacheBits::INVERSE_VIEW_PROJECTION {
            counts.inverse_view_projection += 1;
        } else if bit == CacheBits::FRUSTUM {
            counts.frustum += 1;
        }
        self.counts.set(counts);
    }

    pub fn is_degraded(&self, bits: CacheBits) -> bool {
        self.degraded.get().intersects(bits)
    }

    pub fn counts(&self) -> RecomputeCounts {
        self.counts.get()
    }
}

/// Invert `matrix`, or `None` if it is singular or the result is not finite.
pub fn try_invert(matrix: &Mat4) -> Option<Mat4> {
    let det = matrix.determinant();
    if !det.is_finite() || det.abs() <= SINGULAR_TOLERANCE {
        return None;
    }
    let inverse = matrix.inverse();
    inverse.is_finite().then_some(inverse)
}

#[cfg(test)]
#[path = "matrix_cache_tests.rs"]
mod tests;
