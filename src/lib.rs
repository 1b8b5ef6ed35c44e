//! # Cornermesh
//!
//! Triangle meshes stored as corner tables, with discrete Gaussian curvature
//! and local Laplacian smoothing.
//!
//! ## Features
//!
//! - **Corner table**: O(1) adjacency through opposite corners, with type-safe indices
//! - **Flexible indexing**: Support for 16-bit, 32-bit, and 64-bit indices
//! - **Cached geometry**: per-corner angles and per-triangle areas behind an explicit validity state
//! - **Curvature**: angle-defect Gaussian curvature with barycentric or mixed Voronoi areas
//! - **Smoothing**: ping-pong Laplacian smoothing with pluggable weights (uniform, cotangent)
//! - **Threading**: every kernel runs serially or on a fixed-size pool with identical results
//!
//! ## Quick Start
//!
//! ```
//! use cornermesh::prelude::*;
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//!     Point3::new(0.5, 0.5, 1.0),
//! ];
//!
//! let triangles = vec![
//!     [0, 2, 1],  // bottom
//!     [0, 1, 3],  // front
//!     [1, 2, 3],  // right
//!     [2, 0, 3],  // left
//! ];
//!
//! let mut mesh: TriangleMesh = TriangleMesh::build(&vertices, &triangles).unwrap();
//! assert!(mesh.is_closed());
//!
//! // Curvature reads the cached angles and areas.
//! let k = gaussian_curvature(&mesh, &CurvatureOptions::default()).unwrap();
//! assert_eq!(k.len(), 4);
//!
//! // Smoothing writes new positions and refreshes the cache.
//! let options = SmoothOptions::default().with_iterations(5).with_threads(2);
//! taubin(&mut mesh, &Cotangent, &options).unwrap();
//! assert!(mesh.is_angles_area_valid());
//! ```
//!
//! ## Mesh Traversal
//!
//! ```
//! use cornermesh::prelude::*;
//! use nalgebra::Point3;
//!
//! # let vertices = vec![
//! #     Point3::new(0.0, 0.0, 0.0),
//! #     Point3::new(1.0, 0.0, 0.0),
//! #     Point3::new(0.5, 1.0, 0.0),
//! # ];
//! # let triangles = vec![[0, 1, 2]];
//! # let mesh: TriangleMesh = TriangleMesh::build(&vertices, &triangles).unwrap();
//! let v = VertexId::new(0);
//! for neighbor in mesh.vertex_neighbors(v) {
//!     println!("Neighbor: {:?}", neighbor);
//! }
//!
//! for c in mesh.vertex_corners(v) {
//!     println!("Corner {:?} in triangle {:?}", c, mesh.triangle_of_corner(c));
//! }
//!
//! // A single triangle is bounded by all three of its edges.
//! assert_eq!(mesh.boundary_edges().len(), 3);
//! assert!(mesh.are_boundaries_valid());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod mesh;

pub use error::{MeshError, Result, TopologyError};

/// Prelude module for convenient imports.
///
/// ```
/// use cornermesh::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::curvature::{
        gaussian_curvature, BoundaryPolicy, CurvatureOptions, GaussianCurvature, VertexArea,
    };
    pub use crate::algo::smooth::{
        apply_local, apply_once_per_it, apply_twice_per_it, bilaplacian, laplacian, taubin,
        PingPong, SmoothOptions,
    };
    pub use crate::algo::weight::{Cotangent, Uniform, Weighting};
    pub use crate::algo::Workers;
    pub use crate::error::{MeshError, Result, TopologyError};
    pub use crate::mesh::{
        BuildOptions, CacheState, CornerId, Edge, MeshIndex, Spoke, TriangleId, TriangleMesh,
        VertexId,
    };
}

// Re-export nalgebra types for convenience
pub use nalgebra;

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use nalgebra::Point3;

    #[test]
    fn test_tetrahedron() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, 0.5, 1.0),
        ];

        let triangles = vec![
            [0, 2, 1], // bottom
            [0, 1, 3], // front
            [1, 2, 3], // right
            [2, 0, 3], // left
        ];

        let mesh: TriangleMesh = TriangleMesh::build(&vertices, &triangles).unwrap();

        assert_eq!(mesh.n_vertices(), 4);
        assert_eq!(mesh.n_triangles(), 4);
        // 4 triangles * 3 corners, every one with an opposite
        assert_eq!(mesh.n_corners(), 12);
        assert!(mesh.corner_ids().all(|c| mesh.opposite_corner(c).is_some()));
        assert!(mesh.is_valid());

        for v in mesh.vertex_ids() {
            assert!(!mesh.is_boundary_vertex(v), "vertex {:?} should not be on boundary", v);
        }
    }
}
