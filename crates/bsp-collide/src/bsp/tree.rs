//! BSP tree container, construction and validation.

use crate::{BspError, Polygon, Sphere, ValidationConfig};

use super::builder::build_nodes;
use super::clip::{clip_sphere, Clip};
use super::node::{BspNode, NodeIndex};
use super::selector::{FirstPolygon, PlaneSelector};

/// A read-only Binary Space Partitioning tree of splitting planes.
///
/// Nodes live in a flat arena and refer to their children by [`NodeIndex`].
/// The root is always the first node; an empty tree has no root at all.
///
/// # Construction
///
/// Trees are compiled from solid brushes or loaded from an asset:
///
/// ```ignore
/// use bsp_collide::{box_brush, BspTree};
/// use nalgebra::{Point3, Vector3};
///
/// let tree = BspTree::from_polygons(box_brush(Point3::origin(), Vector3::new(1.0, 1.0, 1.0)));
/// ```
///
/// Once built, a tree is never mutated, so it can be shared freely between
/// threads running queries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BspTree {
    nodes: Vec<BspNode>,
}

impl BspTree {
    /// Creates an empty BSP tree.
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Wraps a node arena after checking that it forms a well-formed tree.
    ///
    /// The first node is the root. See [`BspError`] for the checks performed.
    pub fn from_nodes(nodes: Vec<BspNode>, config: &ValidationConfig) -> Result<Self, BspError> {
        validate(&nodes, config)?;
        Ok(Self { nodes })
    }

    /// Wraps an arena the caller guarantees is well-formed.
    pub(crate) fn from_nodes_unchecked(nodes: Vec<BspNode>) -> Self {
        debug_assert!(
            validate(&nodes, &ValidationConfig::default()).is_ok(),
            "BSP arena must be a well-formed tree"
        );
        Self { nodes }
    }

    /// Compiles a tree from convex, outward-facing brush polygons.
    ///
    /// Uses the provided [`PlaneSelector`] to choose splitting planes. Polygons
    /// that span a splitting plane are split. Returns an empty tree if the
    /// input is empty.
    ///
    /// Brushes must not interpenetrate; brushes that only touch are fine.
    /// Overlapping brushes compile without error but misclassify parts of the
    /// shared volume.
    pub fn build<S: PlaneSelector>(polygons: Vec<Polygon>, selector: &S) -> Self {
        let tree = Self::from_nodes_unchecked(build_nodes(polygons, selector));
        log::debug!(
            "Compiled BSP tree: {} nodes, depth {}",
            tree.len(),
            tree.depth()
        );
        tree
    }

    /// Compiles a tree using the default plane selector ([`FirstPolygon`]).
    ///
    /// The same non-interpenetration rule as [`BspTree::build`] applies.
    pub fn from_polygons(polygons: Vec<Polygon>) -> Self {
        Self::build(polygons, &FirstPolygon)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of nodes. This is also the most clips a single query can return.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the root index, or `None` for an empty tree.
    #[inline]
    pub fn root(&self) -> Option<NodeIndex> {
        (!self.nodes.is_empty()).then_some(NodeIndex::ROOT)
    }

    /// Returns the node at `index`.
    ///
    /// # Panics
    /// Panics if `index` is out of range. Indices taken from this tree's own
    /// nodes are always in range.
    #[inline]
    pub fn node(&self, index: NodeIndex) -> &BspNode {
        &self.nodes[index.get()]
    }

    /// Returns the node at `index`, if it exists.
    #[inline]
    pub fn get(&self, index: NodeIndex) -> Option<&BspNode> {
        self.nodes.get(index.get())
    }

    /// All nodes in arena order.
    #[inline]
    pub fn nodes(&self) -> &[BspNode] {
        &self.nodes
    }

    /// Returns the maximum depth of the tree (0 for an empty tree).
    pub fn depth(&self) -> usize {
        self.root().map_or(0, |root| self.depth_of(root))
    }

    fn depth_of(&self, index: NodeIndex) -> usize {
        let node = self.node(index);
        let ahead = node.ahead().map_or(0, |n| self.depth_of(n));
        let behind = node.behind().map_or(0, |n| self.depth_of(n));
        1 + ahead.max(behind)
    }

    /// Clips `sphere` against the tree. See [`clip_sphere`].
    pub fn clip_sphere(&self, sphere: &Sphere) -> Vec<Clip> {
        clip_sphere(self, sphere)
    }
}

/// Structural checks run once per load.
fn validate(nodes: &[BspNode], config: &ValidationConfig) -> Result<(), BspError> {
    let len = nodes.len();

    for (i, node) in nodes.iter().enumerate() {
        let plane = node.plane();
        if !plane.normal().iter().all(|c| c.is_finite()) || !plane.distance().is_finite() {
            return Err(BspError::NonFinitePlane {
                node: NodeIndex::new(i),
            });
        }
        for child in node.children() {
            if child.get() >= len {
                return Err(BspError::DanglingChild {
                    node: NodeIndex::new(i),
                    child: child.get() as i64,
                    len,
                });
            }
        }
    }

    if len == 0 {
        return Ok(());
    }

    // Iterative walk so a malformed arena cannot overflow the stack.
    let mut visited = vec![false; len];
    let mut stack = vec![NodeIndex::ROOT];
    let mut reached = 0;
    while let Some(index) = stack.pop() {
        if std::mem::replace(&mut visited[index.get()], true) {
            return Err(BspError::NotATree { node: index });
        }
        reached += 1;
        stack.extend(nodes[index.get()].children());
    }

    let unreachable = len - reached;
    if unreachable > 0 {
        if !config.allow_unreachable {
            return Err(BspError::UnreachableNodes { count: unreachable });
        }
        log::warn!("{} of {} BSP nodes are unreachable from the root", unreachable, len);
    }

    Ok(())
}
