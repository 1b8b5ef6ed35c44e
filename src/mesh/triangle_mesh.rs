//! The corner-table triangle mesh.
//!
//! Every triangle owns three consecutive corners. Each corner stores the
//! vertex it sits at and the corner facing it across the opposite edge in
//! the neighbouring triangle. All other adjacency (vertex fans, edges,
//! boundary loops) is derived from these two arrays.

use std::collections::HashSet;

use nalgebra::{Point3, Vector3};
use once_cell::sync::OnceCell;

use super::edge::Edge;
use super::geometry;
use super::index::{CornerId, MeshIndex, TriangleId, VertexId};
use super::traversal::{SpokeIter, VertexCornerIter};
use crate::error::{MeshError, Result};

/// Freshness of the per-triangle angle and area cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    /// Angles and areas match the current vertex positions.
    Valid,
    /// Positions changed since the cache was last filled.
    Stale,
}

/// A triangle mesh with corner-table connectivity.
///
/// Topology is fixed once the mesh is built; only vertex positions can change.
/// Per-triangle angles and areas are cached and guarded by a [`CacheState`].
/// Read-only consumers (curvature, parallel workers) refuse a stale cache
/// instead of recomputing it, so refresh it with
/// [`make_angles_area`](Self::make_angles_area) after moving vertices.
///
/// # Type Parameters
///
/// * `I` - The index type (u16, u32, or u64). Defaults to u32.
#[derive(Debug, Clone)]
pub struct TriangleMesh<I: MeshIndex = u32> {
    pub(super) positions: Vec<Point3<f64>>,
    /// Vertex of every corner, `3 * n_triangles` entries.
    pub(super) corner_vertex: Vec<VertexId<I>>,
    /// Opposite corner of every corner, invalid on boundary edges.
    pub(super) opposite: Vec<CornerId<I>>,
    /// One corner per vertex. For boundary vertices this is the first corner
    /// of the fan so a forward walk visits every incident triangle.
    pub(super) vertex_corner: Vec<CornerId<I>>,
    /// Interior angle at every corner.
    pub(super) angles: Vec<f64>,
    pub(super) areas: Vec<f64>,
    pub(super) cache: CacheState,
    pub(super) boundary_edges: OnceCell<HashSet<Edge<I>>>,
    pub(super) boundaries: OnceCell<Vec<Vec<VertexId<I>>>>,
}

impl<I: MeshIndex> TriangleMesh<I> {
    // ==================== Counts ====================

    /// Number of vertices, including isolated ones.
    #[inline]
    pub fn n_vertices(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles.
    #[inline]
    pub fn n_triangles(&self) -> usize {
        self.corner_vertex.len() / 3
    }

    /// Number of corners, always `3 * n_triangles`.
    #[inline]
    pub fn n_corners(&self) -> usize {
        self.corner_vertex.len()
    }

    /// Number of undirected edges.
    pub fn n_edges(&self) -> usize {
        (self.n_corners() + self.n_boundary_edges()) / 2
    }

    /// Number of edges with a single incident triangle.
    pub fn n_boundary_edges(&self) -> usize {
        self.opposite.iter().filter(|c| !c.is_valid()).count()
    }

    // ==================== Element iteration ====================

    /// Iterate over all vertex IDs.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId<I>> + '_ {
        (0..self.n_vertices()).map(VertexId::new)
    }

    /// Iterate over all triangle IDs.
    pub fn triangle_ids(&self) -> impl Iterator<Item = TriangleId<I>> + '_ {
        (0..self.n_triangles()).map(TriangleId::new)
    }

    /// Iterate over all corner IDs.
    pub fn corner_ids(&self) -> impl Iterator<Item = CornerId<I>> + '_ {
        (0..self.n_corners()).map(CornerId::new)
    }

    // ==================== Corner table ====================

    /// The corner across the edge facing `c`, or `None` on a boundary edge.
    #[inline]
    pub fn opposite_corner(&self, c: CornerId<I>) -> Option<CornerId<I>> {
        let o = self.opposite[c.index()];
        o.is_valid().then_some(o)
    }

    /// The vertex a corner sits at.
    #[inline]
    pub fn vertex_of_corner(&self, c: CornerId<I>) -> VertexId<I> {
        self.corner_vertex[c.index()]
    }

    /// The triangle a corner belongs to.
    #[inline]
    pub fn triangle_of_corner(&self, c: CornerId<I>) -> TriangleId<I> {
        c.triangle()
    }

    /// The next corner in the same triangle.
    #[inline]
    pub fn next_corner(&self, c: CornerId<I>) -> CornerId<I> {
        c.next()
    }

    /// The previous corner in the same triangle.
    #[inline]
    pub fn prev_corner(&self, c: CornerId<I>) -> CornerId<I> {
        c.prev()
    }

    /// The three corners of a triangle.
    #[inline]
    pub fn corners_of_triangle(&self, t: TriangleId<I>) -> [CornerId<I>; 3] {
        t.corners()
    }

    /// The three vertices of a triangle, in winding order.
    #[inline]
    pub fn vertices_of_triangle(&self, t: TriangleId<I>) -> [VertexId<I>; 3] {
        let [c0, c1, c2] = t.corners();
        [
            self.vertex_of_corner(c0),
            self.vertex_of_corner(c1),
            self.vertex_of_corner(c2),
        ]
    }

    /// The vertices of `t` rotated so that `v` comes first.
    ///
    /// Returns `None` if `v` is not a vertex of `t`.
    pub fn vertices_of_triangle_from(
        &self,
        t: TriangleId<I>,
        v: VertexId<I>,
    ) -> Option<[VertexId<I>; 3]> {
        let [a, b, c] = self.vertices_of_triangle(t);
        if a == v {
            Some([a, b, c])
        } else if b == v {
            Some([b, c, a])
        } else if c == v {
            Some([c, a, b])
        } else {
            None
        }
    }

    /// One corner incident to `v`, or `None` for an isolated vertex.
    ///
    /// On a boundary vertex this is the first corner of its fan.
    #[inline]
    pub fn vertex_corner(&self, v: VertexId<I>) -> Option<CornerId<I>> {
        let c = self.vertex_corner[v.index()];
        c.is_valid().then_some(c)
    }

    /// The triangles across each edge of `t`, or `None` on boundary edges.
    ///
    /// Entry `k` is the neighbour across the edge facing corner `k`.
    pub fn triangle_neighbors(&self, t: TriangleId<I>) -> [Option<TriangleId<I>>; 3] {
        t.corners().map(|c| self.opposite_corner(c).map(CornerId::triangle))
    }

    // ==================== Vertex neighbourhoods ====================

    /// Iterate over the corners at `v`, walking its fan counter-clockwise.
    pub fn vertex_corners(&self, v: VertexId<I>) -> VertexCornerIter<'_, I> {
        VertexCornerIter::new(self, v)
    }

    /// Iterate over the edges leaving `v`, see [`Spoke`](super::Spoke).
    pub fn spokes(&self, v: VertexId<I>) -> SpokeIter<'_, I> {
        SpokeIter::new(self, v)
    }

    /// Iterate over the vertices sharing an edge with `v`.
    pub fn vertex_neighbors(&self, v: VertexId<I>) -> impl Iterator<Item = VertexId<I>> + '_ {
        self.spokes(v).map(|s| s.neighbor)
    }

    /// Iterate over the triangles incident to `v`.
    pub fn vertex_triangles(&self, v: VertexId<I>) -> impl Iterator<Item = TriangleId<I>> + '_ {
        self.vertex_corners(v).map(|c| c.triangle())
    }

    /// Number of edges incident to `v`.
    pub fn valence(&self, v: VertexId<I>) -> usize {
        self.spokes(v).count()
    }

    /// Check whether `v` lies on a boundary edge.
    pub fn is_boundary_vertex(&self, v: VertexId<I>) -> bool {
        match self.vertex_corner(v) {
            Some(c) => self.opposite_corner(c.prev()).is_none(),
            None => false,
        }
    }

    // ==================== Positions ====================

    /// All vertex positions, indexed by vertex.
    #[inline]
    pub fn vertices(&self) -> &[Point3<f64>] {
        &self.positions
    }

    /// Position of a vertex.
    #[inline]
    pub fn position(&self, v: VertexId<I>) -> &Point3<f64> {
        &self.positions[v.index()]
    }

    /// The positions of a triangle's vertices.
    #[inline]
    pub fn triangle_positions(&self, t: TriangleId<I>) -> [Point3<f64>; 3] {
        self.vertices_of_triangle(t).map(|v| self.positions[v.index()])
    }

    /// Replace all vertex positions. Marks angles and areas stale.
    pub fn set_positions(&mut self, positions: Vec<Point3<f64>>) -> Result<()> {
        MeshError::check_len(self.n_vertices(), positions.len())?;
        self.positions = positions;
        self.cache = CacheState::Stale;
        Ok(())
    }

    /// Move one vertex. Marks angles and areas stale.
    ///
    /// # Panics
    ///
    /// Panics if `v` is not a vertex of this mesh, like [`position`](Self::position).
    pub fn set_position(&mut self, v: VertexId<I>, position: Point3<f64>) {
        self.positions[v.index()] = position;
        self.cache = CacheState::Stale;
    }

    // ==================== Angle / area cache ====================

    /// State of the angle and area cache.
    #[inline]
    pub fn cache_state(&self) -> CacheState {
        self.cache
    }

    /// Check whether angles and areas match the current positions.
    ///
    /// This never recomputes anything.
    #[inline]
    pub fn is_angles_area_valid(&self) -> bool {
        self.cache == CacheState::Valid
    }

    /// Same as [`is_angles_area_valid`](Self::is_angles_area_valid).
    #[inline]
    pub fn are_angles_area_valid(&self) -> bool {
        self.is_angles_area_valid()
    }

    /// Recompute every corner angle and triangle area from the positions.
    pub fn make_angles_area(&mut self) {
        let n_triangles = self.n_triangles();
        self.angles.resize(3 * n_triangles, 0.0);
        self.areas.resize(n_triangles, 0.0);

        for t in 0..n_triangles {
            let [p0, p1, p2] = self.triangle_positions(TriangleId::new(t));
            self.angles[3 * t..3 * t + 3].copy_from_slice(&geometry::triangle_angles(&p0, &p1, &p2));
            self.areas[t] = geometry::triangle_area(&p0, &p1, &p2);
        }
        self.cache = CacheState::Valid;
    }

    /// Corner angles, recomputed first if stale.
    pub fn get_angles(&mut self) -> &[f64] {
        if !self.is_angles_area_valid() {
            self.make_angles_area();
        }
        &self.angles
    }

    /// Triangle areas, recomputed first if stale.
    pub fn get_areas(&mut self) -> &[f64] {
        if !self.is_angles_area_valid() {
            self.make_angles_area();
        }
        &self.areas
    }

    /// Corner angles, or [`MeshError::StaleGeometry`] if the cache is stale.
    pub fn angles(&self) -> Result<&[f64]> {
        if self.is_angles_area_valid() {
            Ok(&self.angles)
        } else {
            Err(MeshError::StaleGeometry)
        }
    }

    /// Triangle areas, or [`MeshError::StaleGeometry`] if the cache is stale.
    pub fn areas(&self) -> Result<&[f64]> {
        if self.is_angles_area_valid() {
            Ok(&self.areas)
        } else {
            Err(MeshError::StaleGeometry)
        }
    }

    // ==================== Edges ====================

    /// Every undirected edge, once.
    ///
    /// An interior edge is reported by the lower of its two facing corners,
    /// a boundary edge by its only one.
    pub fn edges(&self) -> impl Iterator<Item = Edge<I>> + '_ {
        self.corner_ids()
            .filter(move |&c| self.opposite_corner(c).map_or(true, |o| o > c))
            .map(move |c| self.facing_edge(c))
    }

    /// The undirected edge facing corner `c`.
    #[inline]
    pub fn facing_edge(&self, c: CornerId<I>) -> Edge<I> {
        Edge::new(self.vertex_of_corner(c.next()), self.vertex_of_corner(c.prev()))
    }

    // ==================== Boundary ====================

    /// The set of boundary edges, computed on first use.
    pub fn boundary_edges(&self) -> &HashSet<Edge<I>> {
        self.boundary_edges
            .get_or_init(|| super::edge::collect_boundary_edges(self))
    }

    /// Closed boundary loops as vertex sequences, computed on first use.
    ///
    /// Each loop follows the winding of its triangles. A closed mesh has none.
    pub fn boundaries(&self) -> &[Vec<VertexId<I>>] {
        self.boundaries
            .get_or_init(|| super::edge::collect_boundary_loops(self))
    }

    /// Re-derive the boundary edges from the corner table and compare them
    /// with the cached set.
    pub fn are_boundaries_valid(&self) -> bool {
        let cached = self.boundary_edges();
        let fresh = super::edge::collect_boundary_edges(self);
        if *cached != fresh {
            return false;
        }
        let in_loops: usize = self.boundaries().iter().map(Vec::len).sum();
        in_loops == fresh.len()
    }

    /// Check whether the mesh has no boundary edges.
    pub fn is_closed(&self) -> bool {
        self.opposite.iter().all(|c| c.is_valid())
    }

    // ==================== Geometry ====================

    /// Unit normal of a triangle.
    pub fn triangle_normal(&self, t: TriangleId<I>) -> Vector3<f64> {
        let [p0, p1, p2] = self.triangle_positions(t);
        geometry::triangle_normal(&p0, &p1, &p2)
    }

    /// Area-weighted average of the incident triangle normals.
    pub fn vertex_normal(&self, v: VertexId<I>) -> Vector3<f64> {
        let mut sum = Vector3::zeros();
        for t in self.vertex_triangles(v) {
            let [p0, p1, p2] = self.triangle_positions(t);
            sum += (p1 - p0).cross(&(p2 - p0));
        }
        let len = sum.norm();
        if len > 1e-12 {
            sum / len
        } else {
            sum
        }
    }

    /// Axis-aligned bounding box as `(min, max)`, `None` without vertices.
    pub fn bounding_box(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let first = *self.positions.first()?;
        Some(self.positions.iter().fold((first, first), |(lo, hi), p| {
            (lo.inf(p), hi.sup(p))
        }))
    }

    /// Total surface area, computed from the current positions.
    pub fn surface_area(&self) -> f64 {
        self.triangle_ids()
            .map(|t| {
                let [p0, p1, p2] = self.triangle_positions(t);
                geometry::triangle_area(&p0, &p1, &p2)
            })
            .sum()
    }

    /// Signed volume enclosed by the triangles.
    ///
    /// Only meaningful for closed meshes; positive for outward winding.
    pub fn enclosed_volume(&self) -> f64 {
        self.triangle_ids()
            .map(|t| {
                let [p0, p1, p2] = self.triangle_positions(t);
                p0.coords.dot(&p1.coords.cross(&p2.coords))
            })
            .sum::<f64>()
            / 6.0
    }

    /// Average of all vertex positions.
    pub fn centroid(&self) -> Point3<f64> {
        let n = self.n_vertices().max(1) as f64;
        let sum = self
            .positions
            .iter()
            .fold(Vector3::zeros(), |acc, p| acc + p.coords);
        Point3::from(sum / n)
    }

    /// Centre the mesh on its bounding box and scale the longest side to 1.
    ///
    /// Marks angles and areas stale.
    pub fn scale_to_unit(&mut self) {
        let Some((lo, hi)) = self.bounding_box() else {
            return;
        };
        let center = nalgebra::center(&lo, &hi);
        let extent = (hi - lo).max();
        let scale = if extent > 0.0 { 1.0 / extent } else { 1.0 };
        for p in &mut self.positions {
            *p = Point3::from((*p - center) * scale);
        }
        self.cache = CacheState::Stale;
    }

    /// The triangles as raw vertex-index triples.
    pub fn to_triangle_list(&self) -> Vec<[usize; 3]> {
        self.triangle_ids()
            .map(|t| self.vertices_of_triangle(t).map(|v| v.index()))
            .collect()
    }

    // ==================== Validation ====================

    /// Check the internal consistency of the mesh.
    ///
    /// Verifies that the opposite-corner relation is an involution across
    /// matching edges, that every vertex corner points back at its vertex,
    /// and (when the cache is valid) that non-degenerate triangles have
    /// angles summing to `π`.
    pub fn is_valid(&self) -> bool {
        for c in self.corner_ids() {
            let Some(o) = self.opposite_corner(c) else {
                continue;
            };
            if self.opposite_corner(o) != Some(c) || o.triangle() == c.triangle() {
                return false;
            }
            // The shared edge is traversed in opposite directions.
            if self.vertex_of_corner(o.next()) != self.vertex_of_corner(c.prev())
                || self.vertex_of_corner(o.prev()) != self.vertex_of_corner(c.next())
            {
                return false;
            }
        }

        for v in self.vertex_ids() {
            if let Some(c) = self.vertex_corner(v) {
                if self.vertex_of_corner(c) != v {
                    return false;
                }
            }
        }

        if self.is_angles_area_valid() {
            for t in 0..self.n_triangles() {
                if self.areas[t] <= 1e-12 {
                    continue;
                }
                let sum: f64 = self.angles[3 * t..3 * t + 3].iter().sum();
                if (sum - std::f64::consts::PI).abs() > 1e-4 {
                    return false;
                }
            }
        }

        true
    }
}
