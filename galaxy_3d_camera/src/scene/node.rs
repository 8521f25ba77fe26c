/// Node: positions things (cameras) in the scene.
///
/// Nodes form a parent/child hierarchy. A node owns its local transform,
/// caches its world matrix lazily, and notifies transform listeners when
/// the world matrix changes (its own or an ancestor's).
///
/// Ownership:
/// - parent -> children: strong (`Rc`), child -> parent: `Weak`
/// - node -> camera: strong (`CameraRef`), camera -> node: `Weak`
/// - node -> listeners: `Weak`
///
/// Single-threaded: `Rc`/`RefCell` keep nodes on the scene-graph thread.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use glam::{Mat4, Quat, Vec3};
use slotmap::SlotMap;
use crate::camera::CameraRef;
use super::transform::Transform;
use super::transform_listener::{ListenerKey, TransformListener};

pub struct Node {
    name: String,
    this: Weak<Node>,
    local: Cell<Transform>,
    world: Cell<Mat4>,
    world_dirty: Cell<bool>,
    parent: RefCell<Weak<Node>>,
    children: RefCell<Vec<Rc<Node>>>,
    listeners: RefCell<SlotMap<ListenerKey, Weak<dyn TransformListener>>>,
    camera: RefCell<Option<CameraRef>>,
}

impl Node {
    /// Create a root node with an identity transform.
    pub fn new(name: impl Into<String>) -> Rc<Node> {
        Self::with_transform(name, Transform::IDENTITY)
    }

    pub fn with_transform(name: impl Into<String>, transform: Transform) -> Rc<Node> {
        let name = name.into();
        Rc::new_cyclic(|this| Node {
            name,
            this: this.clone(),
            local: Cell::new(transform),
            world: Cell::new(Mat4::IDENTITY),
            world_dirty: Cell::new(true),
            parent: RefCell::new(Weak::new()),
            children: RefCell::new(Vec::new()),
            listeners: RefCell::new(SlotMap::with_key()),
            camera: RefCell::new(None),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // ===== LOCAL TRANSFORM =====

    pub fn transform(&self) -> Transform {
        self.local.get()
    }

    pub fn set_transform(&self, transform: Transform) {
        self.local.set(transform);
        self.transform_changed();
    }

    pub fn set_translation(&self, translation: Vec3) {
        self.set_transform(Transform { translation, ..self.transform() });
    }

    pub fn set_rotation(&self, rotation: Quat) {
        self.set_transform(Transform { rotation, ..self.transform() });
    }

    pub fn set_scale(&self, scale: Vec3) {
        self.set_transform(Transform { scale, ..self.transform() });
    }

    pub fn translate(&self, delta: Vec3) {
        self.set_translation(self.transform().translation + delta);
    }

    // ===== WORLD TRANSFORM =====

    /// World matrix: `parent.world_matrix() * local`, cached until the next change.
    pub fn world_matrix(&self) -> Mat4 {
        if self.world_dirty.get() {
            let local = self.local.get().to_matrix();
            let world = match self.parent() {
                Some(parent) => parent.world_matrix() * local,
                None => local,
            };
            self.world.set(world);
            self.world_dirty.set(false);
        }
        self.world.get()
    }

    /// World-space position of the node origin.
    pub fn world_translation(&self) -> Vec3 {
        self.world_matrix().w_axis.truncate()
    }

    // ===== HIERARCHY =====

    pub fn parent(&self) -> Option<Rc<Node>> {
        self.parent.borrow().upgrade()
    }

    pub fn children(&self) -> Vec<Rc<Node>> {
        self.children.borrow().clone()
    }

    /// Attach `child` under this node, detaching it from its previous parent.
    ///
    /// Returns false (and changes nothing) if `child` is this node or one
    /// of its ancestors.
    pub fn add_child(&self, child: &Rc<Node>) -> bool {
        if std::ptr::eq(self, Rc::as_ptr(child)) || self.has_ancestor(child) {
            return false;
        }
        if let Some(old_parent) = child.parent() {
            if std::ptr::eq(self, Rc::as_ptr(&old_parent)) {
                return true;
            }
            old_parent.detach_child(child);
        }

        *child.parent.borrow_mut() = self.this.clone();
        self.children.borrow_mut().push(child.clone());
        child.transform_changed();
        true
    }

    /// Detach `child` from this node; it becomes a root. Returns false if
    /// `child` is not a direct child.
    pub fn remove_child(&self, child: &Rc<Node>) -> bool {
        if !self.detach_child(child) {
            return false;
        }
        *child.parent.borrow_mut() = Weak::new();
        child.transform_changed();
        true
    }

    fn detach_child(&self, child: &Rc<Node>) -> bool {
        let mut children = self.children.borrow_mut();
        match children.iter().position(|c| Rc::ptr_eq(c, child)) {
            Some(index) => {
                children.remove(index);
                true
            }
            None => false,
        }
    }

    fn has_ancestor(&self, node: &Rc<Node>) -> bool {
        let mut current = self.parent();
        while let Some(ancestor) = current {
            if Rc::ptr_eq(&ancestor, node) {
                return true;
            }
            current = ancestor.parent();
        }
        false
    }

    // ===== TRANSFORM LISTENERS =====

    pub fn add_transform_listener(&self, listener: Weak<dyn TransformListener>) -> ListenerKey {
        self.listeners.borrow_mut().insert(listener)
    }

    /// Returns false if the subscription was already removed.
    pub fn remove_transform_listener(&self, key: ListenerKey) -> bool {
        self.listeners.borrow_mut().remove(key).is_some()
    }

    /// Number of registered subscriptions. Listeners dropped without
    /// unsubscribing still count until the next notification prunes them.
    pub fn transform_listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Mark the world matrix stale and notify listeners here and in every
    /// descendant, once each.
    fn transform_changed(&self) {
        self.world_dirty.set(true);

        // Collect first: a listener may (un)subscribe from inside its callback
        let live: Vec<Rc<dyn TransformListener>> = {
            let mut listeners = self.listeners.borrow_mut();
            listeners.retain(|_, listener| listener.strong_count() > 0);
            listeners.values().filter_map(Weak::upgrade).collect()
        };
        for listener in live {
            listener.transform_changed(self);
        }

        for child in self.children() {
            child.transform_changed();
        }
    }

    // ===== CAMERA =====

    pub fn camera(&self) -> Option<CameraRef> {
        self.camera.borrow().clone()
    }

    /// Attach a camera to this node (or detach with `None`).
    ///
    /// A camera belongs to at most one node: attaching a camera that is
    /// already on another node detaches it there first.
    pub fn set_camera(&self, camera: Option<CameraRef>) {
        let unchanged = match (self.camera.borrow().as_ref(), camera.as_ref()) {
            (Some(current), Some(new)) => Rc::ptr_eq(current, new),
            (None, None) => true,
            _ => false,
        };
        if unchanged {
            return;
        }

        let previous = self.camera.replace(None);
        if let Some(previous) = previous {
            previous.borrow_mut().set_node(None);
            crate::engine_debug!("galaxy3d::Node", "Camera detached from '{}'", self.name);
        }

        let Some(camera) = camera else {
            return;
        };
        let Some(this) = self.this.upgrade() else {
            return;
        };

        let other = camera.borrow().node();
        if let Some(other) = other {
            other.set_camera(None);
        }

        camera.borrow_mut().set_node(Some(&this));
        *self.camera.borrow_mut() = Some(camera);
        crate::engine_debug!("galaxy3d::Node", "Camera attached to '{}'", self.name);
    }
}

impl Drop for Node {
    fn drop(&mut self) {
        if let Some(camera) = self.camera.get_mut().take() {
            match camera.try_borrow_mut() {
                Ok(mut camera) => camera.set_node(None),
                Err(_) => crate::engine_warn!(
                    "galaxy3d::Node",
                    "Camera of '{}' is borrowed during node teardown; back-reference left to expire",
                    self.name
                ),
            };
        }

        for child in self.children.get_mut().drain(..) {
            *child.parent.borrow_mut() = Weak::new();
            child.transform_changed();
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("name", &self.name)
            .field("transform", &self.local.get())
            .field("children", &self.children.borrow().len())
            .field("has_camera", &self.camera.borrow().is_some())
            .finish()
    }
}

#[cfg(test)]
#[path = "node_tests.rs"]
mod tests;
