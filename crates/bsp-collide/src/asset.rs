//! On-disk representation of a collision tree.
//!
//! An asset is a flat list of node records. Child references are plain
//! integers into that list, with `-1` meaning "no child". The first record is
//! the root.
//!
//! ```text
//! (
//!     nodes: [
//!         (normal: (0.0, 1.0, 0.0), distance: 0.0, ahead: -1, behind: 1),
//!         (normal: (1.0, 0.0, 0.0), distance: 0.0, ahead: -1, behind: -1),
//!     ],
//! )
//! ```

use std::path::Path;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::bsp::{BspNode, BspTree, NodeIndex};
use crate::config::{ConfigFile, Format};
use crate::{BspError, Plane3D, ValidationConfig};

/// Child value meaning "no child".
pub const NO_CHILD: i32 = -1;

/// One serialized node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    /// Plane normal; must be unit length.
    pub normal: [f32; 3],
    /// Plane distance from the origin along `normal`.
    pub distance: f32,
    /// Index of the ahead child, or [`NO_CHILD`].
    pub ahead: i32,
    /// Index of the behind child, or [`NO_CHILD`].
    pub behind: i32,
}

/// A serialized collision tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BspAsset {
    pub nodes: Vec<NodeRecord>,
}

impl ConfigFile for BspAsset {}

impl BspAsset {
    /// Reads an asset from a `.ron` or `.toml` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, BspError> {
        Ok(Self::load_from_file(path)?)
    }

    pub fn from_ron_str(contents: &str) -> Result<Self, BspError> {
        Ok(Format::Ron.parse(contents)?)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, BspError> {
        Ok(Format::Toml.parse(contents)?)
    }
}

fn decode_child(node: usize, raw: i32, len: usize) -> Result<Option<NodeIndex>, BspError> {
    match raw {
        NO_CHILD => Ok(None),
        raw if raw >= 0 && (raw as usize) < len => Ok(Some(NodeIndex::new(raw as usize))),
        raw => Err(BspError::DanglingChild {
            node: NodeIndex::new(node),
            child: i64::from(raw),
            len,
        }),
    }
}

fn encode_child(child: Option<NodeIndex>, len: usize) -> Result<i32, BspError> {
    child.map_or(Ok(NO_CHILD), |index| {
        i32::try_from(index.get()).map_err(|_| BspError::TooManyNodes { len })
    })
}

fn decode_plane(node: usize, record: &NodeRecord, config: &ValidationConfig) -> Result<Plane3D, BspError> {
    let normal = Vector3::from(record.normal);
    if !normal.iter().all(|c| c.is_finite()) || !record.distance.is_finite() {
        return Err(BspError::NonFinitePlane {
            node: NodeIndex::new(node),
        });
    }

    let length = normal.norm();
    if length <= f32::EPSILON || (length - 1.0).abs() > config.normal_tolerance {
        return Err(BspError::NonUnitNormal {
            node: NodeIndex::new(node),
            length,
        });
    }

    Ok(Plane3D::new(normal, record.distance * length))
}

impl BspTree {
    /// Converts and validates an asset.
    pub fn from_asset(asset: &BspAsset, config: &ValidationConfig) -> Result<Self, BspError> {
        config.check()?;
        let len = asset.nodes.len();
        let nodes = asset
            .nodes
            .iter()
            .enumerate()
            .map(|(i, record)| {
                Ok(BspNode::new(
                    decode_plane(i, record, config)?,
                    decode_child(i, record.ahead, len)?,
                    decode_child(i, record.behind, len)?,
                ))
            })
            .collect::<Result<Vec<_>, BspError>>()?;

        let tree = Self::from_nodes(nodes, config)?;
        log::debug!("Loaded BSP tree: {} nodes, depth {}", tree.len(), tree.depth());
        Ok(tree)
    }

    /// Reads, converts and validates a `.ron` or `.toml` tree asset.
    pub fn load(path: impl AsRef<Path>, config: &ValidationConfig) -> Result<Self, BspError> {
        let path = path.as_ref();
        log::info!("Loading collision tree from {}", path.display());
        Self::from_asset(&BspAsset::load(path)?, config)
    }

    /// Serializable form of this tree.
    ///
    /// Fails with [`BspError::TooManyNodes`] if a child index does not fit the
    /// asset's `i32` fields.
    pub fn to_asset(&self) -> Result<BspAsset, BspError> {
        let len = self.len();
        let nodes = self
            .nodes()
            .iter()
            .map(|node| {
                Ok(NodeRecord {
                    normal: node.plane().normal().into(),
                    distance: node.plane().distance(),
                    ahead: encode_child(node.ahead(), len)?,
                    behind: encode_child(node.behind(), len)?,
                })
            })
            .collect::<Result<Vec<_>, BspError>>()?;
        Ok(BspAsset { nodes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{box_brush, ConfigError, Sphere};
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    const FLOOR_AND_WALL: &str = r#"(
        nodes: [
            (normal: (0.0, 1.0, 0.0), distance: 0.0, ahead: -1, behind: 1),
            (normal: (1.0, 0.0, 0.0), distance: 0.0, ahead: -1, behind: -1),
        ],
    )"#;

    fn record(normal: [f32; 3], ahead: i32, behind: i32) -> NodeRecord {
        NodeRecord {
            normal,
            distance: 0.0,
            ahead,
            behind,
        }
    }

    fn load(nodes: Vec<NodeRecord>) -> Result<BspTree, BspError> {
        BspTree::from_asset(&BspAsset { nodes }, &ValidationConfig::default())
    }

    #[test]
    fn load_ron_asset_and_clip() {
        let asset = BspAsset::from_ron_str(FLOOR_AND_WALL).unwrap();
        let tree = BspTree::from_asset(&asset, &ValidationConfig::default()).unwrap();

        assert_eq!(tree.len(), 2);
        assert_eq!(tree.node(NodeIndex::ROOT).behind(), Some(NodeIndex::new(1)));

        let clips = tree.clip_sphere(&Sphere::new(Point3::new(0.5, -3.0, 0.0), 1.0));
        assert_eq!(clips.len(), 1);
        assert_relative_eq!(clips[0].normal, Vector3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn load_toml_asset() {
        let toml = r#"
            [[nodes]]
            normal = [0.0, 1.0, 0.0]
            distance = 2.0
            ahead = -1
            behind = -1
        "#;
        let tree =
            BspTree::from_asset(&BspAsset::from_toml_str(toml).unwrap(), &ValidationConfig::default())
                .unwrap();

        assert_eq!(tree.len(), 1);
        assert_relative_eq!(tree.node(NodeIndex::ROOT).plane().distance(), 2.0);
    }

    #[test]
    fn empty_asset_is_empty_tree() {
        let tree = load(vec![]).unwrap();
        assert!(tree.is_empty());
    }

    #[test]
    fn malformed_ron_is_asset_error() {
        let err = BspAsset::from_ron_str("(nodes: [(normal: (0.0, 1.0))])").unwrap_err();
        assert!(matches!(err, BspError::Asset(ConfigError::Parse(_))));
    }

    #[test]
    fn dangling_children_are_rejected() {
        let err = load(vec![record([0.0, 1.0, 0.0], 3, NO_CHILD)]).unwrap_err();
        assert!(matches!(err, BspError::DanglingChild { child: 3, len: 1, .. }));

        let err = load(vec![record([0.0, 1.0, 0.0], NO_CHILD, -7)]).unwrap_err();
        assert!(matches!(err, BspError::DanglingChild { child: -7, .. }));
    }

    #[test]
    fn cycles_are_rejected() {
        let err = load(vec![record([0.0, 1.0, 0.0], NO_CHILD, 0)]).unwrap_err();
        assert!(matches!(err, BspError::NotATree { .. }));
    }

    #[test]
    fn non_unit_normals_are_rejected() {
        let err = load(vec![record([0.0, 2.0, 0.0], NO_CHILD, NO_CHILD)]).unwrap_err();
        assert!(matches!(err, BspError::NonUnitNormal { length, .. } if length == 2.0));

        let err = load(vec![record([0.0, 0.0, 0.0], NO_CHILD, NO_CHILD)]).unwrap_err();
        assert!(matches!(err, BspError::NonUnitNormal { .. }));
    }

    #[test]
    fn non_finite_planes_are_rejected() {
        let err = load(vec![record([f32::NAN, 1.0, 0.0], NO_CHILD, NO_CHILD)]).unwrap_err();
        assert!(matches!(err, BspError::NonFinitePlane { .. }));
    }

    #[test]
    fn zero_normal_is_rejected_under_loose_tolerance() {
        let loose = ValidationConfig {
            normal_tolerance: 0.999,
            ..Default::default()
        };
        let asset = BspAsset {
            nodes: vec![record([0.0, 0.0, 0.0], NO_CHILD, NO_CHILD)],
        };
        let err = BspTree::from_asset(&asset, &loose).unwrap_err();
        assert!(matches!(err, BspError::NonUnitNormal { length, .. } if length == 0.0));
    }

    #[test]
    fn out_of_range_tolerance_is_rejected() {
        let asset = BspAsset {
            nodes: vec![record([0.0, 0.0, 0.0], NO_CHILD, NO_CHILD)],
        };
        for tolerance in [1.0, 5.0, -0.1, f32::NAN, f32::INFINITY] {
            let config = ValidationConfig {
                normal_tolerance: tolerance,
                ..Default::default()
            };
            let err = BspTree::from_asset(&asset, &config).unwrap_err();
            assert!(matches!(err, BspError::InvalidTolerance { .. }));
        }
    }

    #[test]
    fn child_indices_beyond_i32_are_reported() {
        let huge = NodeIndex::new(i32::MAX as usize + 1);
        assert!(matches!(
            encode_child(Some(huge), 3),
            Err(BspError::TooManyNodes { len: 3 })
        ));
        assert_eq!(encode_child(Some(NodeIndex::new(7)), 8).unwrap(), 7);
        assert_eq!(encode_child(None, 8).unwrap(), NO_CHILD);
    }

    #[test]
    fn nearly_unit_normals_are_accepted() {
        let tree = load(vec![record([0.0, 1.0005, 0.0], NO_CHILD, NO_CHILD)]).unwrap();
        assert_relative_eq!(tree.node(NodeIndex::ROOT).plane().normal().norm(), 1.0);
    }

    #[test]
    fn compiled_tree_round_trips_through_asset() {
        let tree = BspTree::from_polygons(box_brush(Point3::origin(), Vector3::new(1.0, 2.0, 3.0)));
        let asset = tree.to_asset().unwrap();
        assert_eq!(asset.nodes.len(), tree.len());

        let reloaded = BspTree::from_asset(&asset, &ValidationConfig::default()).unwrap();
        assert_eq!(reloaded.len(), tree.len());
        let query = Sphere::new(Point3::new(0.0, 2.5, 0.0), 1.0);
        assert_eq!(reloaded.clip_sphere(&query), tree.clip_sphere(&query));
    }

    #[test]
    fn save_and_load_file() {
        let tree = BspTree::from_asset(
            &BspAsset::from_ron_str(FLOOR_AND_WALL).unwrap(),
            &ValidationConfig::default(),
        )
        .unwrap();

        for name in ["level.ron", "level.toml"] {
            let path = std::env::temp_dir().join(format!("bsp-collide-{}-{}", std::process::id(), name));
            tree.to_asset().unwrap().save_to_file(&path).unwrap();
            let loaded = BspTree::load(&path, &ValidationConfig::default()).unwrap();
            std::fs::remove_file(&path).unwrap();
            assert_eq!(loaded, tree);
        }
    }

    #[test]
    fn unsupported_extension_is_reported() {
        let err = BspTree::load("level.json", &ValidationConfig::default()).unwrap_err();
        assert!(matches!(err, BspError::Asset(ConfigError::UnsupportedFormat(_))));
    }
}
