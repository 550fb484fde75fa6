//! Binary Space Partitioning tree for sphere collision queries.
//!
//! The tree stores only splitting planes. Nodes live in a flat arena and point
//! at their children by index; a missing child is a leaf, open space on the
//! ahead side and solid space on the behind side.
//!
//! # Example
//!
//! ```ignore
//! use bsp_collide::{box_brush, BspTree, Sphere};
//! use nalgebra::{Point3, Vector3};
//!
//! // Compile a level from solid brushes
//! let tree = BspTree::from_polygons(box_brush(Point3::origin(), Vector3::new(1.0, 1.0, 1.0)));
//!
//! // Each simulation step, clip the player's sphere
//! let player = Sphere::new(Point3::new(0.0, 1.5, 0.0), 1.0);
//! for clip in tree.clip_sphere(&player) {
//!     // Push out along clip.normal by clip.depth
//! }
//! ```
//!
//! # Architecture
//!
//! - [`BspTree`]: The read-only node arena
//! - [`BspNode`]: A splitting plane plus ahead/behind child indices
//! - [`clip_sphere`]: The sphere query, with [`ClipSink`] for streaming output
//! - [`PlaneSelector`]: Strategy trait for choosing splitting planes when compiling

mod builder;
mod clip;
mod node;
mod selector;
mod tree;

// Re-export main types
pub use clip::{clip_sphere, clip_sphere_into, clip_sphere_into_slice, Clip, ClipSink, FnSink};
pub use node::{BspNode, NodeIndex};
pub use selector::{BalancedSplits, FirstPolygon, PlaneSelector};
pub use tree::BspTree;
