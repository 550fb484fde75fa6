//! Step through the tree one node at a time and inspect how the sphere
//! relates to each splitting plane.

use bsp_collide::{BspNode, BspTree, NodeIndex, Sphere};
use macroquad::prelude::*;

use crate::draw_plane_patch;

/// Direction taken at each node in the navigation path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Ahead,
    Behind,
}

/// Interactive BSP tree navigator for exploring tree structure.
#[derive(Debug, Default)]
pub struct TreeNavigator {
    path: Vec<Direction>,
}

impl TreeNavigator {
    /// Creates a new navigator starting at the root.
    pub fn new() -> Self {
        Self { path: Vec::new() }
    }

    pub fn path(&self) -> &[Direction] {
        &self.path
    }

    pub fn depth(&self) -> usize {
        self.path.len()
    }

    /// Attempts to step into the ahead child. Returns true if successful.
    pub fn go_ahead(&mut self, tree: &BspTree) -> bool {
        self.step(tree, Direction::Ahead)
    }

    /// Attempts to step into the behind child. Returns true if successful.
    pub fn go_behind(&mut self, tree: &BspTree) -> bool {
        self.step(tree, Direction::Behind)
    }

    fn step(&mut self, tree: &BspTree, direction: Direction) -> bool {
        let child = self
            .current_node(tree)
            .and_then(|index| child_of(tree.node(index), direction));
        if child.is_some() {
            self.path.push(direction);
        }
        child.is_some()
    }

    /// Navigates to the parent node. Returns true if not already at root.
    pub fn go_parent(&mut self) -> bool {
        self.path.pop().is_some()
    }

    pub fn go_root(&mut self) {
        self.path.clear();
    }

    /// Handles keyboard input. Returns true if navigation state changed.
    pub fn update(&mut self, tree: &BspTree) -> bool {
        let mut changed = false;

        if is_key_pressed(KeyCode::F) {
            changed = self.go_ahead(tree);
        }
        if is_key_pressed(KeyCode::B) {
            changed = self.go_behind(tree);
        }
        if is_key_pressed(KeyCode::P) {
            changed = self.go_parent();
        }
        if is_key_pressed(KeyCode::R) && !self.path.is_empty() {
            self.go_root();
            changed = true;
        }

        changed
    }

    /// Index of the current node, if the tree is non-empty.
    pub fn current_node(&self, tree: &BspTree) -> Option<NodeIndex> {
        let mut current = tree.root()?;
        for &direction in &self.path {
            current = child_of(tree.node(current), direction)?;
        }
        Some(current)
    }

    /// Draws the current node's plane where the sphere is.
    pub fn render(&self, tree: &BspTree, sphere: &Sphere) {
        if let Some(index) = self.current_node(tree) {
            draw_plane_patch(tree.node(index).plane(), sphere.center(), 1.5, SKYBLUE);
        }
    }

    /// Draws the navigation UI overlay.
    pub fn draw_ui(&self, tree: &BspTree, sphere: &Sphere, y_offset: f32) {
        let Some(index) = self.current_node(tree) else {
            draw_text("Empty tree", 10.0, y_offset, 18.0, GRAY);
            return;
        };
        let node = tree.node(index);
        let plane = node.plane();
        let (min_dist, max_dist) = sphere.penetration_range(plane);

        let path_str = if self.path.is_empty() {
            "root".to_string()
        } else {
            self.path
                .iter()
                .map(|d| match d {
                    Direction::Ahead => "A",
                    Direction::Behind => "B",
                })
                .collect::<Vec<_>>()
                .join(" -> ")
        };

        draw_text(
            &format!(
                "Node {}: n = ({:.2}, {:.2}, {:.2}), d = {:.2}",
                index,
                plane.normal().x,
                plane.normal().y,
                plane.normal().z,
                plane.distance()
            ),
            10.0,
            y_offset,
            18.0,
            WHITE,
        );
        draw_text(
            &format!("Path: {} (depth {})", path_str, self.path.len()),
            10.0,
            y_offset + 20.0,
            18.0,
            YELLOW,
        );
        draw_text(
            &format!(
                "Children: {}{}",
                if node.ahead().is_some() { "[F] ahead " } else { "" },
                if node.borders_solid() { "(solid behind)" } else { "[B] behind" },
            ),
            10.0,
            y_offset + 40.0,
            18.0,
            if node.is_leaf() { ORANGE } else { GREEN },
        );
        draw_text(
            &format!("Sphere range: [{:.2}, {:.2}]", min_dist, max_dist),
            10.0,
            y_offset + 60.0,
            18.0,
            if min_dist < 0.0 { RED } else { GRAY },
        );
        draw_text("[P]arent | [R]oot", 10.0, y_offset + 80.0, 16.0, DARKGRAY);
    }
}

fn child_of(node: &BspNode, direction: Direction) -> Option<NodeIndex> {
    match direction {
        Direction::Ahead => node.ahead(),
        Direction::Behind => node.behind(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bsp_collide::box_brush;
    use nalgebra::{Point3, Vector3};

    fn box_tree() -> BspTree {
        BspTree::from_polygons(box_brush(Point3::origin(), Vector3::new(1.0, 1.0, 1.0)))
    }

    #[test]
    fn navigates_behind_chain() {
        let tree = box_tree();
        let mut navigator = TreeNavigator::new();

        assert_eq!(navigator.current_node(&tree), Some(NodeIndex::ROOT));
        assert!(!navigator.go_ahead(&tree));
        assert!(navigator.go_behind(&tree));
        assert_eq!(navigator.current_node(&tree), Some(NodeIndex::new(1)));
        assert_eq!(navigator.depth(), 1);

        assert!(navigator.go_parent());
        assert!(!navigator.go_parent());
    }

    #[test]
    fn stops_at_solid_leaf() {
        let tree = box_tree();
        let mut navigator = TreeNavigator::new();

        while navigator.go_behind(&tree) {}
        assert_eq!(navigator.depth(), tree.len() - 1);

        navigator.go_root();
        assert_eq!(navigator.path(), &[] as &[Direction]);
    }

    #[test]
    fn empty_tree_has_no_current_node() {
        let mut navigator = TreeNavigator::new();
        assert!(navigator.current_node(&BspTree::new()).is_none());
        assert!(!navigator.go_behind(&BspTree::new()));
    }
}
