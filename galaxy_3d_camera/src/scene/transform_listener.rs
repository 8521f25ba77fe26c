/// Transform-change notification protocol.
///
/// A node keeps its listeners as `Weak` handles in a SlotMap. The key
/// returned by `Node::add_transform_listener` is the subscription: pass it
/// back to `Node::remove_transform_listener` to unsubscribe. A listener that
/// is dropped without unsubscribing is pruned on the next notification.

use slotmap::new_key_type;
use super::node::Node;

new_key_type! {
    /// Subscription handle returned by `Node::add_transform_listener`.
    pub struct ListenerKey;
}

/// Receives world-transform change notifications from a `Node`.
///
/// Called exactly once per logical change of the node's world transform,
/// including changes inherited from an ancestor. Implementations must not
/// read the node's world matrix eagerly: mark state stale and recompute
/// on the next read.
pub trait TransformListener {
    fn transform_changed(&self, node: &Node);
}
