//! Mesh construction from indexed triangle lists.
//!
//! Building a [`TriangleMesh`] validates the input and links the corner
//! table. A failed build returns a [`TopologyError`] and no mesh, so an
//! invalid mesh can never be used.

use std::collections::HashMap;

use nalgebra::Point3;
use once_cell::sync::OnceCell;

use super::index::{CornerId, MeshIndex, VertexId};
use super::triangle_mesh::{CacheState, TriangleMesh};
use crate::error::{Result, TopologyError};

/// Options controlling mesh construction.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Reject meshes with boundary edges.
    pub require_closed: bool,
}

impl BuildOptions {
    /// Set whether every edge must have two incident triangles.
    pub fn with_require_closed(mut self, require_closed: bool) -> Self {
        self.require_closed = require_closed;
        self
    }

    /// Options that only accept closed meshes.
    pub fn closed() -> Self {
        Self::default().with_require_closed(true)
    }
}

impl<I: MeshIndex> TriangleMesh<I> {
    /// Build a mesh from vertex positions and triangles.
    ///
    /// Open meshes are accepted. See [`build_with`](Self::build_with).
    ///
    /// # Example
    /// ```
    /// use cornermesh::mesh::TriangleMesh;
    /// use nalgebra::Point3;
    ///
    /// let vertices = vec![
    ///     Point3::new(0.0, 0.0, 0.0),
    ///     Point3::new(1.0, 0.0, 0.0),
    ///     Point3::new(0.5, 1.0, 0.0),
    /// ];
    /// let triangles = vec![[0, 1, 2]];
    ///
    /// let mesh: TriangleMesh = TriangleMesh::build(&vertices, &triangles).unwrap();
    /// assert_eq!(mesh.n_vertices(), 3);
    /// assert_eq!(mesh.n_triangles(), 1);
    /// assert_eq!(mesh.boundary_edges().len(), 3);
    /// ```
    pub fn build(vertices: &[Point3<f64>], triangles: &[[usize; 3]]) -> Result<Self> {
        Self::build_with(vertices, triangles, &BuildOptions::default())
    }

    /// Build a mesh with explicit options.
    ///
    /// # Errors
    ///
    /// Returns a [`TopologyError`] if:
    /// - there are no triangles
    /// - the vertex or corner count does not fit the index type `I`
    /// - a triangle references a vertex that does not exist, or repeats one
    /// - an undirected edge is shared by more than two triangles
    /// - two triangles traverse an edge in the same direction
    /// - the triangles around a vertex form more than one fan
    /// - `options.require_closed` is set and an edge has a single triangle
    ///
    /// Vertices referenced by no triangle are kept as isolated vertices.
    pub fn build_with(
        vertices: &[Point3<f64>],
        triangles: &[[usize; 3]],
        options: &BuildOptions,
    ) -> Result<Self> {
        check_capacity::<I>(vertices.len(), triangles.len())?;
        validate_triangles(vertices.len(), triangles)?;

        let corner_vertex: Vec<VertexId<I>> = triangles
            .iter()
            .flat_map(|tri| tri.iter().map(|&v| VertexId::new(v)))
            .collect();

        let opposite = link_opposite_corners::<I>(triangles, options.require_closed)?;

        let mut mesh = TriangleMesh {
            positions: vertices.to_vec(),
            corner_vertex,
            opposite,
            vertex_corner: vec![CornerId::invalid(); vertices.len()],
            angles: Vec::new(),
            areas: Vec::new(),
            cache: CacheState::Stale,
            boundary_edges: OnceCell::new(),
            boundaries: OnceCell::new(),
        };

        assign_vertex_corners(&mut mesh)?;
        mesh.make_angles_area();

        log::debug!(
            "built mesh: {} vertices, {} triangles, {} boundary edges",
            mesh.n_vertices(),
            mesh.n_triangles(),
            mesh.n_boundary_edges()
        );

        Ok(mesh)
    }
}

/// Reject inputs whose vertex or corner ids would not fit in `I`.
fn check_capacity<I: MeshIndex>(n_vertices: usize, n_triangles: usize) -> Result<()> {
    // Ids run from 0 to I::MAX; I::MAX + 1 is the sentinel.
    let max = I::MAX.to_usize().saturating_add(1);
    let bits = (std::mem::size_of::<I>() * 8) as u32;

    if n_vertices > max {
        return Err(TopologyError::TooManyElements {
            element: "vertices",
            count: n_vertices,
            max,
            bits,
        }
        .into());
    }

    let n_corners = n_triangles.saturating_mul(3);
    if n_corners > max {
        return Err(TopologyError::TooManyElements {
            element: "corners",
            count: n_corners,
            max,
            bits,
        }
        .into());
    }

    Ok(())
}

fn validate_triangles(n_vertices: usize, triangles: &[[usize; 3]]) -> Result<()> {
    if triangles.is_empty() {
        return Err(TopologyError::EmptyMesh.into());
    }

    for (ti, tri) in triangles.iter().enumerate() {
        for &vi in tri {
            if vi >= n_vertices {
                return Err(TopologyError::InvalidVertexIndex {
                    triangle: ti,
                    vertex: vi,
                }
                .into());
            }
        }
        if tri[0] == tri[1] || tri[1] == tri[2] || tri[0] == tri[2] {
            return Err(TopologyError::DegenerateTriangle { triangle: ti }.into());
        }
    }

    Ok(())
}

/// The directed edge facing corner `k` of `tri`, from `next(k)` to `prev(k)`.
#[inline]
fn facing_edge(tri: &[usize; 3], k: usize) -> (usize, usize) {
    (tri[(k + 1) % 3], tri[(k + 2) % 3])
}

/// Pair every half-edge with its reverse and record the corners facing them.
fn link_opposite_corners<I: MeshIndex>(
    triangles: &[[usize; 3]],
    require_closed: bool,
) -> Result<Vec<CornerId<I>>> {
    // Undirected incidence counts, checked first so that an edge shared by
    // three triangles is reported as such even if two agree in direction.
    let mut incidence: HashMap<(usize, usize), u32> = HashMap::with_capacity(triangles.len() * 2);
    for tri in triangles {
        for k in 0..3 {
            let (a, b) = facing_edge(tri, k);
            let count = incidence.entry((a.min(b), a.max(b))).or_insert(0);
            *count += 1;
            if *count > 2 {
                return Err(TopologyError::NonManifoldEdge {
                    v0: a.min(b),
                    v1: a.max(b),
                }
                .into());
            }
        }
    }

    // Map from directed edge (from, to) to the corner facing it
    let mut half_edges: HashMap<(usize, usize), usize> = HashMap::with_capacity(triangles.len() * 3);
    for (ti, tri) in triangles.iter().enumerate() {
        for k in 0..3 {
            let edge = facing_edge(tri, k);
            if half_edges.insert(edge, 3 * ti + k).is_some() {
                return Err(TopologyError::InconsistentOrientation {
                    v0: edge.0,
                    v1: edge.1,
                }
                .into());
            }
        }
    }

    let mut opposite = vec![CornerId::invalid(); 3 * triangles.len()];
    for (ti, tri) in triangles.iter().enumerate() {
        for k in 0..3 {
            let (a, b) = facing_edge(tri, k);
            match half_edges.get(&(b, a)) {
                Some(&o) => opposite[3 * ti + k] = CornerId::new(o),
                None if require_closed => {
                    return Err(TopologyError::OpenBoundary { v0: a, v1: b }.into());
                }
                None => {}
            }
        }
    }

    Ok(opposite)
}

/// Choose a corner per vertex and check that every vertex has a single fan.
///
/// Boundary vertices get the corner whose backward neighbour is missing, so
/// forward walks start at one end of the fan.
fn assign_vertex_corners<I: MeshIndex>(mesh: &mut TriangleMesh<I>) -> Result<()> {
    let mut incident = vec![0usize; mesh.n_vertices()];
    for c in 0..mesh.n_corners() {
        let v = mesh.corner_vertex[c].index();
        incident[v] += 1;
        if !mesh.vertex_corner[v].is_valid() {
            mesh.vertex_corner[v] = CornerId::new(c);
        }
    }

    for v in 0..mesh.n_vertices() {
        let start = mesh.vertex_corner[v];
        if !start.is_valid() {
            continue;
        }

        // Walk backwards to the start of the fan
        let mut first = start;
        let mut steps = 0;
        while let Some(o) = mesh.opposite_corner(first.prev()) {
            let back = o.prev();
            steps += 1;
            if back == start || steps > incident[v] {
                break;
            }
            first = back;
        }
        mesh.vertex_corner[v] = first;

        let fan = mesh.vertex_corners(VertexId::new(v)).take(incident[v] + 1).count();
        if fan != incident[v] {
            return Err(TopologyError::NonManifoldVertex { vertex: v }.into());
        }
    }

    Ok(())
}
