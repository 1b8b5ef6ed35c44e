//! Undirected edges and boundary extraction.

use std::collections::HashSet;

use super::index::{MeshIndex, VertexId};
use super::triangle_mesh::TriangleMesh;

/// An undirected edge, stored with its smaller vertex first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Edge<I: MeshIndex = u32> {
    v0: VertexId<I>,
    v1: VertexId<I>,
}

impl<I: MeshIndex> Edge<I> {
    /// Create an edge between two vertices, in either order.
    #[inline]
    pub fn new(a: VertexId<I>, b: VertexId<I>) -> Self {
        if a <= b {
            Self { v0: a, v1: b }
        } else {
            Self { v0: b, v1: a }
        }
    }

    /// The endpoints, smaller index first.
    #[inline]
    pub fn vertices(self) -> (VertexId<I>, VertexId<I>) {
        (self.v0, self.v1)
    }

    /// Check whether `v` is an endpoint.
    #[inline]
    pub fn contains(self, v: VertexId<I>) -> bool {
        self.v0 == v || self.v1 == v
    }
}

/// Every edge whose facing corner has no opposite.
pub(crate) fn collect_boundary_edges<I: MeshIndex>(mesh: &TriangleMesh<I>) -> HashSet<Edge<I>> {
    mesh.corner_ids()
        .filter(|&c| mesh.opposite_corner(c).is_none())
        .map(|c| mesh.facing_edge(c))
        .collect()
}

/// Chain boundary edges into closed loops.
///
/// The boundary edge leaving a boundary vertex `v` faces `prev(c)`, where `c`
/// is the first corner of `v`'s fan, and ends at `v(next(c))`.
pub(crate) fn collect_boundary_loops<I: MeshIndex>(
    mesh: &TriangleMesh<I>,
) -> Vec<Vec<VertexId<I>>> {
    let mut visited = vec![false; mesh.n_vertices()];
    let mut loops = Vec::new();

    for start in mesh.vertex_ids() {
        if visited[start.index()] || !mesh.is_boundary_vertex(start) {
            continue;
        }

        let mut boundary = Vec::new();
        let mut v = start;
        while !visited[v.index()] {
            visited[v.index()] = true;
            boundary.push(v);
            let Some(c) = mesh.vertex_corner(v) else {
                break;
            };
            v = mesh.vertex_of_corner(c.next());
        }
        loops.push(boundary);
    }

    loops
}
