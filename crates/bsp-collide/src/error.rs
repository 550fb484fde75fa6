//! Errors raised while loading and validating collision trees.

use thiserror::Error;

use crate::bsp::NodeIndex;
use crate::config::ConfigError;

/// Errors produced when turning an asset into a [`BspTree`](crate::BspTree).
///
/// Queries never fail; every check happens once, when the tree is loaded.
#[derive(Error, Debug)]
pub enum BspError {
    /// The asset could not be read or parsed.
    #[error("failed to read BSP asset: {0}")]
    Asset(#[from] ConfigError),

    /// A child reference points outside the node array.
    #[error("node {node} references child {child}, but the tree has {len} nodes")]
    DanglingChild {
        /// Node holding the bad reference.
        node: NodeIndex,
        /// Raw child value as stored in the asset.
        child: i64,
        /// Number of nodes in the asset.
        len: usize,
    },

    /// A node is reachable through more than one path (a cycle or shared subtree).
    #[error("node {node} is reached more than once from the root")]
    NotATree {
        /// The node visited twice.
        node: NodeIndex,
    },

    /// A plane normal is not unit length.
    #[error("node {node} has a plane normal of length {length}, expected 1")]
    NonUnitNormal {
        /// Offending node.
        node: NodeIndex,
        /// Measured normal length.
        length: f32,
    },

    /// A plane contains NaN or infinite components.
    #[error("node {node} has a non-finite plane")]
    NonFinitePlane {
        /// Offending node.
        node: NodeIndex,
    },

    /// `normal_tolerance` must be finite and in `[0, 1)`.
    #[error("normal tolerance {tolerance} is outside [0, 1)")]
    InvalidTolerance {
        /// The configured tolerance.
        tolerance: f32,
    },

    /// The tree has more nodes than the asset's `i32` child indices can address.
    #[error("tree has {len} nodes, more than an asset can index")]
    TooManyNodes {
        /// Number of nodes in the tree.
        len: usize,
    },

    /// Some nodes cannot be reached from the root.
    #[error("{count} nodes are unreachable from the root")]
    UnreachableNodes {
        /// Number of unreachable nodes.
        count: usize,
    },
}
