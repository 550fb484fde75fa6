//! Sphere clipping against a BSP tree.
//!
//! A sphere has extent, so unlike a point query it can straddle a splitting
//! plane and both half-spaces may have to be visited. While descending into
//! "behind" space the traversal carries a binding plane: the plane, along the
//! current path, that the sphere penetrates least. When the walk reaches a
//! solid leaf it reports that plane's normal, giving one contact per solid
//! region reached instead of one per plane crossed.

use nalgebra::Vector3;

use crate::Sphere;

use super::node::NodeIndex;
use super::tree::BspTree;

/// A contact reported by [`clip_sphere`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Clip {
    /// Unit normal of the surface the sphere penetrates, pointing out of the solid.
    pub normal: Vector3<f32>,
    /// How far the sphere reaches past that surface. Always positive.
    pub depth: f32,
}

/// Receives clips as the traversal emits them.
pub trait ClipSink {
    /// Called once per solid leaf reached, in traversal order.
    fn push_clip(&mut self, clip: Clip);
}

impl ClipSink for Vec<Clip> {
    fn push_clip(&mut self, clip: Clip) {
        self.push(clip);
    }
}

/// A sink that calls a closure for each clip.
pub struct FnSink<F>
where
    F: FnMut(Clip),
{
    func: F,
}

impl<F> FnSink<F>
where
    F: FnMut(Clip),
{
    /// Creates a new sink from a closure.
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F> ClipSink for FnSink<F>
where
    F: FnMut(Clip),
{
    fn push_clip(&mut self, clip: Clip) {
        (self.func)(clip);
    }
}

/// Writes into a fixed caller-owned buffer.
struct SliceSink<'a> {
    out: &'a mut [Clip],
    len: usize,
}

impl ClipSink for SliceSink<'_> {
    fn push_clip(&mut self, clip: Clip) {
        assert!(
            self.len < self.out.len(),
            "clip buffer holds {} clips; size it to the tree's node count",
            self.out.len()
        );
        self.out[self.len] = clip;
        self.len += 1;
    }
}

/// Counts what passes through to the wrapped sink.
struct Counting<'a, S> {
    inner: &'a mut S,
    count: usize,
}

impl<S: ClipSink> ClipSink for Counting<'_, S> {
    fn push_clip(&mut self, clip: Clip) {
        self.count += 1;
        self.inner.push_clip(clip);
    }
}

/// The shallowest penetrating plane seen on the current descent.
#[derive(Debug, Clone, Copy)]
struct Binding {
    normal: Vector3<f32>,
    min_dist: f32,
}

/// Clips `sphere` against `tree` and returns the contacts found.
///
/// An empty result means the sphere touches no solid space. The result never
/// holds more than `tree.len()` clips, and identical inputs always give the
/// same clips in the same order.
pub fn clip_sphere(tree: &BspTree, sphere: &Sphere) -> Vec<Clip> {
    let mut clips = Vec::new();
    clip_sphere_into(tree, sphere, &mut clips);
    clips
}

/// Clips `sphere` against `tree`, streaming contacts into `sink`.
///
/// Returns the number of clips emitted by this call.
pub fn clip_sphere_into<S: ClipSink>(tree: &BspTree, sphere: &Sphere, sink: &mut S) -> usize {
    let mut counting = Counting {
        inner: sink,
        count: 0,
    };
    clip_node(tree, tree.root(), sphere, None, &mut counting);
    log::trace!(
        "Sphere at {:?} (r = {}) produced {} clips",
        sphere.center(),
        sphere.radius(),
        counting.count
    );
    counting.count
}

/// Clips `sphere` against `tree` into a fixed buffer and returns how many
/// entries were written, starting at `out[0]`.
///
/// # Panics
/// Panics if the query emits more clips than `out` can hold. A buffer of
/// `tree.len()` entries is always large enough.
pub fn clip_sphere_into_slice(tree: &BspTree, sphere: &Sphere, out: &mut [Clip]) -> usize {
    let mut sink = SliceSink { out, len: 0 };
    clip_sphere_into(tree, sphere, &mut sink)
}

fn clip_node<S: ClipSink>(
    tree: &BspTree,
    index: Option<NodeIndex>,
    sphere: &Sphere,
    binding: Option<Binding>,
    sink: &mut S,
) {
    let Some(index) = index else {
        return;
    };

    let node = tree.node(index);
    let (min_dist, max_dist) = sphere.penetration_range(node.plane());

    if max_dist > 0.0 {
        clip_node(tree, node.ahead(), sphere, binding, sink);
    }

    if min_dist < 0.0 {
        // Ties keep the plane found higher up the tree.
        let binding = match binding {
            Some(current) if current.min_dist >= min_dist => current,
            _ => Binding {
                normal: node.plane().normal(),
                min_dist,
            },
        };

        match node.behind() {
            None => sink.push_clip(Clip {
                normal: binding.normal,
                depth: -binding.min_dist,
            }),
            behind => clip_node(tree, behind, sphere, Some(binding), sink),
        }
    }
}
