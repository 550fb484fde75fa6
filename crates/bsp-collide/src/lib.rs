//! Sphere-vs-BSP collision clipping for static level geometry.

pub mod asset;
pub mod bsp;
pub mod config;
mod error;
mod plane;
mod polygon;
mod sphere;

pub use asset::{BspAsset, NodeRecord, NO_CHILD};
pub use bsp::{
    clip_sphere, clip_sphere_into, clip_sphere_into_slice, BalancedSplits, BspNode, BspTree, Clip,
    ClipSink, FirstPolygon, FnSink, NodeIndex, PlaneSelector,
};
pub use config::{ConfigError, ConfigFile, ValidationConfig};
pub use error::BspError;
pub use plane::{Classification, Plane3D, PlaneSide, PLANE_EPSILON};
pub use polygon::{box_brush, Polygon};
pub use sphere::Sphere;
