//! Scene module: positioning nodes and their transform notifications.
//!
//! A `Node` carries a local TRS transform inside a parent/child hierarchy
//! and tells its `TransformListener`s whenever its world matrix changes.
//! Cameras are attached to nodes and read their view from them.

mod node;
mod transform;
mod transform_listener;

pub use node::Node;
pub use transform::Transform;
pub use transform_listener::{ListenerKey, TransformListener};
