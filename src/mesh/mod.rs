//! Core mesh data structures.
//!
//! This module provides the corner-table mesh representation and the
//! per-triangle geometry it caches.
//!
//! # Overview
//!
//! The primary type is [`TriangleMesh`]. Each triangle owns three corners,
//! and each corner knows its vertex and the corner facing it across the
//! opposite edge. Vertex fans, edges and boundary loops are all derived from
//! that table, so adjacency queries are O(1) per step without any pointer
//! cycles.
//!
//! # Index Types
//!
//! Mesh elements are identified by type-safe index wrappers:
//! - [`VertexId`] - Identifies a vertex
//! - [`CornerId`] - Identifies a corner (triangle-vertex incidence)
//! - [`TriangleId`] - Identifies a triangle
//!
//! These indices are generic over the underlying integer type ([`MeshIndex`] trait),
//! allowing you to choose `u16`, `u32`, or `u64` based on mesh size.
//!
//! # Construction
//!
//! ```
//! use cornermesh::mesh::{CornerId, TriangleMesh};
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! let triangles = vec![[0, 1, 2], [0, 2, 3]];
//!
//! let mesh: TriangleMesh = TriangleMesh::build(&vertices, &triangles).unwrap();
//!
//! // Corner 0 faces the edge (1, 2), which is on the boundary.
//! assert_eq!(mesh.opposite_corner(CornerId::new(0)), None);
//! // Corner 1 faces the diagonal (2, 0), shared with the second triangle.
//! assert_eq!(mesh.opposite_corner(CornerId::new(1)), Some(CornerId::new(5)));
//! ```

mod builder;
mod edge;
pub mod geometry;
mod index;
mod traversal;
mod triangle_mesh;

pub use builder::BuildOptions;
pub use edge::Edge;
pub use index::{CornerId, MeshIndex, TriangleId, VertexId};
pub use traversal::{Spoke, SpokeIter, VertexCornerIter};
pub use triangle_mesh::{CacheState, TriangleMesh};
