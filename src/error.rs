//! Error types for cornermesh.
//!
//! Topology problems are detected once, while the corner table is built, and
//! are reported through [`TopologyError`]. Everything that can go wrong later
//! (bad parameters, stale geometry caches, thread pool setup) is a
//! [`MeshError`]. Degenerate geometry is never an error: zero-area triangles
//! simply produce saturated angles and zero areas.

use thiserror::Error;

/// Result type alias using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;

/// Connectivity errors raised while building a mesh.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TopologyError {
    /// The mesh has no triangles.
    #[error("mesh has no triangles")]
    EmptyMesh,

    /// A triangle references a vertex index outside the position array.
    #[error("triangle {triangle} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// The triangle index.
        triangle: usize,
        /// The out-of-range vertex index.
        vertex: usize,
    },

    /// A triangle repeats a vertex index.
    #[error("triangle {triangle} is degenerate (has duplicate vertices)")]
    DegenerateTriangle {
        /// The triangle index.
        triangle: usize,
    },

    /// An undirected edge is shared by more than two triangles.
    #[error("edge ({v0}, {v1}) has more than two incident triangles")]
    NonManifoldEdge {
        /// First vertex of the edge.
        v0: usize,
        /// Second vertex of the edge.
        v1: usize,
    },

    /// Two triangles traverse the same edge in the same direction.
    #[error("edge ({v0}, {v1}) is traversed twice in the same direction")]
    InconsistentOrientation {
        /// Origin of the repeated half-edge.
        v0: usize,
        /// Destination of the repeated half-edge.
        v1: usize,
    },

    /// The triangles around a vertex do not form a single fan.
    #[error("vertex {vertex} is non-manifold (incident triangles form several fans)")]
    NonManifoldVertex {
        /// The vertex index.
        vertex: usize,
    },

    /// More vertices or corners than the index type can address.
    #[error("{count} {element} do not fit a {bits}-bit index (at most {max})")]
    TooManyElements {
        /// What overflowed, `"vertices"` or `"corners"`.
        element: &'static str,
        /// How many were requested.
        count: usize,
        /// The largest count the index type can address.
        max: usize,
        /// Width of the index type.
        bits: u32,
    },

    /// A half-edge has no partner but the mesh was required to be closed.
    #[error("edge ({v0}, {v1}) is a boundary edge but the mesh must be closed")]
    OpenBoundary {
        /// Origin of the unmatched half-edge.
        v0: usize,
        /// Destination of the unmatched half-edge.
        v1: usize,
    },
}

/// Errors that can occur during mesh operations.
#[derive(Error, Debug)]
pub enum MeshError {
    /// The input triangles do not describe a valid 2-manifold.
    #[error("invalid topology: {0}")]
    Topology(#[from] TopologyError),

    /// Per-triangle angles and areas are out of date for the current positions.
    #[error("angles and areas are stale; call make_angles_area before this operation")]
    StaleGeometry,

    /// A position buffer does not match the vertex count of the mesh.
    #[error("position buffer has {actual} entries, mesh has {expected} vertices")]
    BufferSize {
        /// Number of vertices in the mesh.
        expected: usize,
        /// Length of the offending buffer.
        actual: usize,
    },

    /// The worker pool could not be created.
    #[error("failed to build worker pool: {0}")]
    ThreadPool(String),

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },
}

impl MeshError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        MeshError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }

    /// Check that a buffer covers exactly `expected` vertices.
    pub(crate) fn check_len(expected: usize, actual: usize) -> Result<()> {
        if expected == actual {
            Ok(())
        } else {
            Err(MeshError::BufferSize { expected, actual })
        }
    }
}

impl From<rayon::ThreadPoolBuildError> for MeshError {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        MeshError::ThreadPool(err.to_string())
    }
}
