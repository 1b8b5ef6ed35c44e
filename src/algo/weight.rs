//! Edge weighting strategies for one-ring operators.
//!
//! A [`Weighting`] assigns a weight to every spoke `(center, neighbor)` of a
//! vertex. Operators normalize the weights by their sum, so the uniform
//! weighting yields `1 / valence` per neighbour.
//!
//! Weights are evaluated against an explicit position buffer rather than the
//! mesh's own positions, which lets smoothing passes weigh edges by the
//! geometry they are currently reading from.

use nalgebra::{Point3, Vector3};

use crate::mesh::geometry::cotangent;
use crate::mesh::{MeshIndex, Spoke, TriangleMesh, VertexId};

/// How much a neighbour contributes to a vertex update.
///
/// Implemented by [`Uniform`], [`Cotangent`], and any
/// `Fn(&TriangleMesh<I>, &[Point3<f64>], &Spoke<I>) -> f64 + Sync` closure.
pub trait Weighting<I: MeshIndex = u32>: Sync {
    /// Weight of the edge described by `spoke`, read from `positions`.
    ///
    /// Spokes on boundary edges have no `across` corner.
    fn weight(&self, mesh: &TriangleMesh<I>, positions: &[Point3<f64>], spoke: &Spoke<I>) -> f64;
}

impl<I, F> Weighting<I> for F
where
    I: MeshIndex,
    F: Fn(&TriangleMesh<I>, &[Point3<f64>], &Spoke<I>) -> f64 + Sync,
{
    #[inline]
    fn weight(&self, mesh: &TriangleMesh<I>, positions: &[Point3<f64>], spoke: &Spoke<I>) -> f64 {
        self(mesh, positions, spoke)
    }
}

/// Every neighbour counts the same.
#[derive(Debug, Clone, Copy, Default)]
pub struct Uniform;

impl<I: MeshIndex> Weighting<I> for Uniform {
    #[inline]
    fn weight(&self, _: &TriangleMesh<I>, _: &[Point3<f64>], _: &Spoke<I>) -> f64 {
        1.0
    }
}

/// Cotangent weights: `cot α + cot β` over the angles facing the edge.
///
/// Boundary edges contribute a single cotangent. Weights can be negative
/// around obtuse triangles.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cotangent;

impl<I: MeshIndex> Weighting<I> for Cotangent {
    fn weight(&self, mesh: &TriangleMesh<I>, positions: &[Point3<f64>], spoke: &Spoke<I>) -> f64 {
        spoke
            .opposite_corners()
            .map(|c| {
                let a = &positions[mesh.vertex_of_corner(c).index()];
                let b = &positions[mesh.vertex_of_corner(c.next()).index()];
                let d = &positions[mesh.vertex_of_corner(c.prev()).index()];
                cotangent(a, b, d)
            })
            .sum()
    }
}

/// Weighted average of `p_j - p_i` over the spokes of `v`.
///
/// A vertex without neighbours (or whose weights sum to zero) produces NaN.
pub fn normalized_laplacian<I, W>(
    weighting: &W,
    mesh: &TriangleMesh<I>,
    positions: &[Point3<f64>],
    v: VertexId<I>,
) -> Vector3<f64>
where
    I: MeshIndex,
    W: Weighting<I> + ?Sized,
{
    let pi = positions[v.index()];
    let mut sum = Vector3::zeros();
    let mut total = 0.0;
    for spoke in mesh.spokes(v) {
        let w = weighting.weight(mesh, positions, &spoke);
        sum += w * (positions[spoke.neighbor.index()] - pi);
        total += w;
    }
    sum / total
}
