//! Compiles brush polygons into a node arena.

use crate::{Classification, Plane3D, Polygon};

use super::node::{BspNode, NodeIndex};
use super::selector::PlaneSelector;

/// Builds the arena in pre-order, so the root lands at index 0.
pub(crate) fn build_nodes<S: PlaneSelector>(polygons: Vec<Polygon>, selector: &S) -> Vec<BspNode> {
    let mut nodes = Vec::new();
    build_node(polygons, selector, &mut nodes);
    nodes
}

/// Recursively partitions `polygons`, returning the index of the new subtree.
///
/// An empty ahead list leaves an open-space leaf, an empty behind list a
/// solid-space leaf.
fn build_node<S: PlaneSelector>(
    mut polygons: Vec<Polygon>,
    selector: &S,
    nodes: &mut Vec<BspNode>,
) -> Option<NodeIndex> {
    let splitter_idx = selector.select(&polygons)?;
    let splitter = polygons.swap_remove(splitter_idx);
    let plane = splitter.plane();

    let mut ahead_list = Vec::new();
    let mut behind_list = Vec::new();

    for polygon in polygons {
        match polygon.classify(&plane) {
            Classification::Ahead => ahead_list.push(polygon),
            Classification::Behind => behind_list.push(polygon),
            Classification::Coplanar => {
                // A face turned the other way has its solid ahead of this plane.
                if !faces_same_direction(&polygon, &plane) {
                    ahead_list.push(polygon);
                }
            }
            Classification::Spanning => {
                let (ahead_part, behind_part) = polygon.split(&plane);
                ahead_list.extend(ahead_part);
                behind_list.extend(behind_part);
            }
        }
    }

    let index = NodeIndex::new(nodes.len());
    nodes.push(BspNode::new(plane, None, None));

    let ahead = build_node(ahead_list, selector, nodes);
    let behind = build_node(behind_list, selector, nodes);
    nodes[index.get()].set_children(ahead, behind);

    Some(index)
}

/// Determines if a polygon faces the same direction as a plane.
///
/// Degenerate polygons count as facing the same way, so they are dropped.
fn faces_same_direction(polygon: &Polygon, plane: &Plane3D) -> bool {
    polygon
        .unit_normal()
        .is_none_or(|normal| normal.dot(&plane.normal()) > 0.0)
}
