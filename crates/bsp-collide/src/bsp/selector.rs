//! Plane selection strategies for BSP tree construction.
//!
//! The choice of splitting plane affects tree balance and the number of
//! polygon splits during construction, and so the depth every collision
//! query has to walk.

use crate::{Classification, Polygon};

/// Strategy for selecting which polygon's plane to use for splitting.
pub trait PlaneSelector {
    /// Select a polygon from the slice to use as the splitting plane.
    ///
    /// Returns the position of the chosen polygon, or `None` if the slice is
    /// empty. The position must be in range for `polygons`.
    fn select(&self, polygons: &[Polygon]) -> Option<usize>;
}

/// Selects the first polygon in the list.
///
/// This is the simplest and fastest selector, but may produce unbalanced
/// trees depending on input order.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstPolygon;

impl PlaneSelector for FirstPolygon {
    fn select(&self, polygons: &[Polygon]) -> Option<usize> {
        (!polygons.is_empty()).then_some(0)
    }
}

/// Scores candidate planes by how many polygons they split and how evenly
/// they divide the rest, and picks the lowest score.
///
/// `score = span_weight * spanning + balance_weight * |ahead - behind|`
#[derive(Debug, Clone, Copy)]
pub struct BalancedSplits {
    /// Weight for polygons that would be split.
    pub span_weight: f32,
    /// Weight for the ahead/behind imbalance.
    pub balance_weight: f32,
    /// Only the first `sample_size` polygons are tried as splitters.
    pub sample_size: usize,
}

impl Default for BalancedSplits {
    fn default() -> Self {
        Self {
            span_weight: 8.0,
            balance_weight: 1.0,
            sample_size: 20,
        }
    }
}

impl BalancedSplits {
    fn score(&self, candidate: &Polygon, polygons: &[Polygon]) -> f32 {
        let plane = candidate.plane();
        let mut ahead = 0i32;
        let mut behind = 0i32;
        let mut spanning = 0i32;

        for polygon in polygons {
            match polygon.classify(&plane) {
                Classification::Coplanar => {}
                Classification::Ahead => ahead += 1,
                Classification::Behind => behind += 1,
                Classification::Spanning => spanning += 1,
            }
        }

        self.span_weight * spanning as f32 + self.balance_weight * (ahead - behind).abs() as f32
    }
}

impl PlaneSelector for BalancedSplits {
    fn select(&self, polygons: &[Polygon]) -> Option<usize> {
        polygons
            .iter()
            .take(self.sample_size.max(1))
            .enumerate()
            .map(|(i, candidate)| (i, self.score(candidate, polygons)))
            // Earliest candidate wins ties.
            .fold(None, |best: Option<(usize, f32)>, (i, score)| match best {
                Some((_, best_score)) if best_score <= score => best,
                _ => Some((i, score)),
            })
            .map(|(i, _)| i)
    }
}
