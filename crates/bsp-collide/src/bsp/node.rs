//! BSP tree node implementation.

use std::fmt;

use crate::Plane3D;

/// Index of a node inside a [`BspTree`](super::BspTree) arena.
///
/// The root of every non-empty tree is [`NodeIndex::ROOT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeIndex(u32);

impl NodeIndex {
    /// The root of the tree.
    pub const ROOT: NodeIndex = NodeIndex(0);

    /// Wraps a raw arena position.
    ///
    /// # Panics
    /// Panics if `index` does not fit in a `u32`.
    #[inline]
    pub fn new(index: usize) -> Self {
        Self(u32::try_from(index).expect("BSP node index exceeds u32::MAX"))
    }

    /// Returns the arena position.
    #[inline]
    pub fn get(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A node in the BSP tree.
///
/// Each node partitions space with a splitting plane. A child reference of
/// `None` is a leaf: by convention an empty `ahead` child is open space and an
/// empty `behind` child is solid space.
#[derive(Debug, Clone, PartialEq)]
pub struct BspNode {
    /// The splitting plane for this node.
    plane: Plane3D,

    /// Subtree in the half-space the plane normal points into.
    ahead: Option<NodeIndex>,

    /// Subtree in the opposite half-space.
    behind: Option<NodeIndex>,
}

impl BspNode {
    /// Creates a node with the given plane and children.
    pub fn new(plane: Plane3D, ahead: Option<NodeIndex>, behind: Option<NodeIndex>) -> Self {
        Self {
            plane,
            ahead,
            behind,
        }
    }

    /// Returns a reference to the splitting plane.
    #[inline]
    pub fn plane(&self) -> &Plane3D {
        &self.plane
    }

    #[inline]
    pub fn ahead(&self) -> Option<NodeIndex> {
        self.ahead
    }

    #[inline]
    pub fn behind(&self) -> Option<NodeIndex> {
        self.behind
    }

    /// Checks if this node has no children.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.ahead.is_none() && self.behind.is_none()
    }

    /// Returns `true` if the half-space behind this plane is solid with no
    /// further subdivision.
    #[inline]
    pub fn borders_solid(&self) -> bool {
        self.behind.is_none()
    }

    #[inline]
    pub(crate) fn set_children(&mut self, ahead: Option<NodeIndex>, behind: Option<NodeIndex>) {
        self.ahead = ahead;
        self.behind = behind;
    }

    /// Iterates over the present children, ahead first.
    pub fn children(&self) -> impl Iterator<Item = NodeIndex> {
        self.ahead.into_iter().chain(self.behind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    fn ground() -> Plane3D {
        Plane3D::new(Vector3::new(0.0, 1.0, 0.0), 0.0)
    }

    #[test]
    fn new_node_without_children_is_leaf() {
        let node = BspNode::new(ground(), None, None);
        assert!(node.is_leaf());
        assert!(node.borders_solid());
        assert_eq!(node.children().count(), 0);
    }

    #[test]
    fn set_children_updates_leaf_status() {
        let mut node = BspNode::new(ground(), None, None);

        node.set_children(Some(NodeIndex::new(1)), None);
        assert!(!node.is_leaf());
        assert!(node.borders_solid());

        node.set_children(None, Some(NodeIndex::new(2)));
        assert!(!node.is_leaf());
        assert!(!node.borders_solid());
    }

    #[test]
    fn children_iterates_ahead_then_behind() {
        let node = BspNode::new(ground(), Some(NodeIndex::new(3)), Some(NodeIndex::new(1)));
        let children: Vec<_> = node.children().collect();
        assert_eq!(children, vec![NodeIndex::new(3), NodeIndex::new(1)]);
    }

    #[test]
    fn node_index_round_trip_and_display() {
        let index = NodeIndex::new(42);
        assert_eq!(index.get(), 42);
        assert_eq!(index.to_string(), "#42");
        assert_eq!(NodeIndex::ROOT.get(), 0);
    }
}
