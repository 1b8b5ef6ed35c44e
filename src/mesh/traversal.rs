//! One-ring traversal over the corner table.
//!
//! Around a vertex `v`, the corner at `v` in the next triangle of the fan is
//! `next(opposite(next(c)))`. The walk stops when it returns to its start
//! (interior vertex) or runs into a boundary edge. Boundary vertices store
//! the first corner of their fan, so a single forward walk is complete.

use std::iter::FusedIterator;

use super::index::{CornerId, MeshIndex, VertexId};
use super::triangle_mesh::TriangleMesh;

/// Iterator over the corners at a vertex, counter-clockwise around its fan.
pub struct VertexCornerIter<'a, I: MeshIndex = u32> {
    mesh: &'a TriangleMesh<I>,
    start: Option<CornerId<I>>,
    current: Option<CornerId<I>>,
    hit_boundary: bool,
}

impl<'a, I: MeshIndex> VertexCornerIter<'a, I> {
    pub(crate) fn new(mesh: &'a TriangleMesh<I>, v: VertexId<I>) -> Self {
        let start = mesh.vertex_corner(v);
        Self {
            mesh,
            start,
            current: start,
            hit_boundary: false,
        }
    }

    /// Whether the walk ended on a boundary edge rather than closing its loop.
    ///
    /// Only meaningful once the iterator is exhausted.
    pub fn hit_boundary(&self) -> bool {
        self.hit_boundary
    }
}

impl<'a, I: MeshIndex> Iterator for VertexCornerIter<'a, I> {
    type Item = CornerId<I>;

    fn next(&mut self) -> Option<Self::Item> {
        let c = self.current?;
        let start = self.start;
        self.current = match self.mesh.opposite_corner(c.next()) {
            Some(o) => Some(o.next()).filter(|&n| Some(n) != start),
            None => {
                self.hit_boundary = true;
                None
            }
        };
        Some(c)
    }
}

impl<'a, I: MeshIndex> FusedIterator for VertexCornerIter<'a, I> {}

/// A directed edge leaving a vertex, with the corners that face it.
///
/// `facing` is the corner opposite the edge in the triangle that follows it
/// counter-clockwise; `across` is the corner in the triangle on the other
/// side, absent on boundary edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spoke<I: MeshIndex = u32> {
    /// The vertex the walk is centred on.
    pub center: VertexId<I>,
    /// The other endpoint of the edge.
    pub neighbor: VertexId<I>,
    /// Corner facing the edge on one side.
    pub facing: CornerId<I>,
    /// Corner facing the edge on the other side, if any.
    pub across: Option<CornerId<I>>,
}

impl<I: MeshIndex> Spoke<I> {
    /// Check whether the edge has a single incident triangle.
    #[inline]
    pub fn is_boundary(&self) -> bool {
        self.across.is_none()
    }

    /// The one or two corners facing this edge.
    pub fn opposite_corners(&self) -> impl Iterator<Item = CornerId<I>> {
        std::iter::once(self.facing).chain(self.across)
    }
}

/// Iterator over the spokes of a vertex.
///
/// An interior vertex has one spoke per incident triangle. A boundary vertex
/// has one more, closing the fan on its second boundary edge.
pub struct SpokeIter<'a, I: MeshIndex = u32> {
    mesh: &'a TriangleMesh<I>,
    center: VertexId<I>,
    corners: VertexCornerIter<'a, I>,
    last: Option<CornerId<I>>,
    done: bool,
}

impl<'a, I: MeshIndex> SpokeIter<'a, I> {
    pub(crate) fn new(mesh: &'a TriangleMesh<I>, center: VertexId<I>) -> Self {
        Self {
            mesh,
            center,
            corners: VertexCornerIter::new(mesh, center),
            last: None,
            done: false,
        }
    }
}

impl<'a, I: MeshIndex> Iterator for SpokeIter<'a, I> {
    type Item = Spoke<I>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if let Some(c) = self.corners.next() {
            self.last = Some(c);
            let facing = c.prev();
            return Some(Spoke {
                center: self.center,
                neighbor: self.mesh.vertex_of_corner(c.next()),
                facing,
                across: self.mesh.opposite_corner(facing),
            });
        }

        self.done = true;
        if !self.corners.hit_boundary() {
            return None;
        }
        let c = self.last?;
        Some(Spoke {
            center: self.center,
            neighbor: self.mesh.vertex_of_corner(c.prev()),
            facing: c.next(),
            across: None,
        })
    }
}

impl<'a, I: MeshIndex> FusedIterator for SpokeIter<'a, I> {}
