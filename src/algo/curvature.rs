//! Discrete Gaussian curvature.
//!
//! The Gaussian curvature at a vertex is its angle defect divided by the
//! area attributed to it:
//!
//! ```text
//! K(v) = (2π - Σ θ_t(v)) / A(v)
//! ```
//!
//! where `θ_t(v)` is the angle at `v` in each incident triangle. On a
//! boundary vertex a flat neighbourhood has an angle sum of `π`, so by
//! default the defect is measured against `π` there instead (see
//! [`BoundaryPolicy`]).
//!
//! Angles and areas come from the mesh's cache, which must be valid: the
//! computation only reads shared data, so it can be split across threads
//! freely, and a stale cache is reported as [`MeshError::StaleGeometry`]
//! instead of being refreshed behind the caller's back.
//!
//! # Example
//!
//! ```
//! use cornermesh::algo::curvature::{gaussian_curvature, CurvatureOptions};
//! use cornermesh::mesh::TriangleMesh;
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//!     Point3::new(0.5, 0.5, 1.0),
//! ];
//! let triangles = vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]];
//! let mesh: TriangleMesh = TriangleMesh::build(&vertices, &triangles).unwrap();
//!
//! let options = CurvatureOptions::default().with_threads(2).with_range(true);
//! let curvature = gaussian_curvature(&mesh, &options).unwrap();
//! assert_eq!(curvature.len(), 4);
//! assert!(curvature.values().iter().all(|&k| k > 0.0));
//! assert!(curvature.range().is_some());
//! ```
//!
//! # References
//!
//! - Meyer, M., et al. (2003). "Discrete Differential-Geometry Operators for
//!   Triangulated 2-Manifolds." Visualization and Mathematics III.

use std::f64::consts::{FRAC_PI_2, PI};
use std::marker::PhantomData;

use crate::error::Result;
use crate::mesh::{CornerId, MeshIndex, TriangleMesh, VertexId};

use super::parallel::Workers;

/// Areas below this are treated as zero.
const AREA_EPSILON: f64 = 1e-12;

/// How curvature is defined on boundary vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundaryPolicy {
    /// Measure the angle defect against `π`, so a flat border has zero
    /// curvature and corners of the border are curved.
    #[default]
    StraightAngle,
    /// Report zero on every boundary vertex.
    Zero,
}

/// The area attributed to a vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VertexArea {
    /// One third of the incident triangle areas.
    #[default]
    Barycentric,
    /// The mixed Voronoi area of Meyer et al.: the Voronoi region inside
    /// non-obtuse triangles, and a half or quarter of obtuse ones.
    Mixed,
}

/// Options for Gaussian curvature.
#[derive(Debug, Clone, Default)]
pub struct CurvatureOptions {
    /// Worker threads, `0` or `1` for serial.
    pub n_threads: usize,
    /// Treatment of boundary vertices.
    pub boundary: BoundaryPolicy,
    /// Area normalization.
    pub area: VertexArea,
    /// Also compute the global minimum and maximum.
    pub report_range: bool,
}

impl CurvatureOptions {
    /// Set the number of worker threads.
    pub fn with_threads(mut self, n_threads: usize) -> Self {
        self.n_threads = n_threads;
        self
    }

    /// Set the boundary policy.
    pub fn with_boundary(mut self, boundary: BoundaryPolicy) -> Self {
        self.boundary = boundary;
        self
    }

    /// Set the vertex area.
    pub fn with_area(mut self, area: VertexArea) -> Self {
        self.area = area;
        self
    }

    /// Set whether the global range is reported.
    pub fn with_range(mut self, report_range: bool) -> Self {
        self.report_range = report_range;
        self
    }
}

/// Per-vertex Gaussian curvature.
#[derive(Debug, Clone)]
pub struct GaussianCurvature<I: MeshIndex = u32> {
    values: Vec<f64>,
    range: Option<(f64, f64)>,
    _marker: PhantomData<I>,
}

impl<I: MeshIndex> GaussianCurvature<I> {
    /// Curvature at a vertex.
    #[inline]
    pub fn at(&self, v: VertexId<I>) -> f64 {
        self.values[v.index()]
    }

    /// All values, indexed by vertex.
    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Take the values, indexed by vertex.
    pub fn into_values(self) -> Vec<f64> {
        self.values
    }

    /// `(min, max)` over all vertices, if requested and any value is a number.
    #[inline]
    pub fn range(&self) -> Option<(f64, f64)> {
        self.range
    }

    /// Number of vertices.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Compute the Gaussian curvature of every vertex.
///
/// The angle-defect estimator reads only cached corner angles and triangle
/// areas, so it takes no edge [`Weighting`](crate::algo::weight::Weighting);
/// the area attributed to a vertex is chosen with [`VertexArea`].
///
/// Isolated vertices and vertices with (near) zero area get `0`.
///
/// # Errors
///
/// - [`MeshError::StaleGeometry`](crate::MeshError::StaleGeometry) if the
///   angle/area cache does not match the positions
/// - [`MeshError::ThreadPool`](crate::MeshError::ThreadPool) if the worker
///   pool cannot be created
pub fn gaussian_curvature<I: MeshIndex>(
    mesh: &TriangleMesh<I>,
    options: &CurvatureOptions,
) -> Result<GaussianCurvature<I>> {
    let workers = Workers::new(options.n_threads)?;
    gaussian_curvature_with(mesh, options, &workers)
}

/// Like [`gaussian_curvature`], on an existing worker pool.
///
/// `options.n_threads` is ignored.
pub fn gaussian_curvature_with<I: MeshIndex>(
    mesh: &TriangleMesh<I>,
    options: &CurvatureOptions,
    workers: &Workers,
) -> Result<GaussianCurvature<I>> {
    let angles = mesh.angles()?;
    let areas = mesh.areas()?;

    log::debug!(
        "gaussian curvature: {} vertices, {} threads, {:?} area, {:?} boundary",
        mesh.n_vertices(),
        workers.n_threads(),
        options.area,
        options.boundary
    );

    let mut values = vec![0.0; mesh.n_vertices()];
    workers.fill(&mut values, |i| {
        vertex_curvature(mesh, angles, areas, VertexId::new(i), options)
    });

    let range = if options.report_range {
        workers.min_max(&values)
    } else {
        None
    };

    Ok(GaussianCurvature {
        values,
        range,
        _marker: PhantomData,
    })
}

/// The area attributed to `v`.
///
/// Returns [`MeshError::StaleGeometry`](crate::MeshError::StaleGeometry) if
/// the cache is stale.
pub fn vertex_area<I: MeshIndex>(mesh: &TriangleMesh<I>, v: VertexId<I>, kind: VertexArea) -> Result<f64> {
    let angles = mesh.angles()?;
    let areas = mesh.areas()?;
    Ok(area_at(mesh, angles, areas, v, kind))
}

fn vertex_curvature<I: MeshIndex>(
    mesh: &TriangleMesh<I>,
    angles: &[f64],
    areas: &[f64],
    v: VertexId<I>,
    options: &CurvatureOptions,
) -> f64 {
    let target = if mesh.is_boundary_vertex(v) {
        match options.boundary {
            BoundaryPolicy::StraightAngle => PI,
            BoundaryPolicy::Zero => return 0.0,
        }
    } else {
        2.0 * PI
    };

    let angle_sum: f64 = mesh.vertex_corners(v).map(|c| angles[c.index()]).sum();
    let area = area_at(mesh, angles, areas, v, options.area);

    if area > AREA_EPSILON {
        (target - angle_sum) / area
    } else {
        0.0
    }
}

fn area_at<I: MeshIndex>(
    mesh: &TriangleMesh<I>,
    angles: &[f64],
    areas: &[f64],
    v: VertexId<I>,
    kind: VertexArea,
) -> f64 {
    let barycentric = || -> f64 {
        mesh.vertex_corners(v)
            .map(|c| areas[c.triangle().index()])
            .sum::<f64>()
            / 3.0
    };

    match kind {
        VertexArea::Barycentric => barycentric(),
        VertexArea::Mixed => {
            let area: f64 = mesh
                .vertex_corners(v)
                .map(|c| mixed_area_in_triangle(mesh, angles, areas, c))
                .sum();
            if area > AREA_EPSILON {
                area
            } else {
                barycentric()
            }
        }
    }
}

/// Share of corner `c`'s triangle that belongs to its vertex.
fn mixed_area_in_triangle<I: MeshIndex>(
    mesh: &TriangleMesh<I>,
    angles: &[f64],
    areas: &[f64],
    c: CornerId<I>,
) -> f64 {
    let (n, p) = (c.next(), c.prev());
    let theta = angles[c.index()];
    let theta_next = angles[n.index()];
    let theta_prev = angles[p.index()];
    let area = areas[c.triangle().index()];

    if theta > FRAC_PI_2 {
        area / 2.0
    } else if theta_next > FRAC_PI_2 || theta_prev > FRAC_PI_2 {
        area / 4.0
    } else {
        // Voronoi region: (|PR|² cot Q + |PQ|² cot R) / 8
        let pv = mesh.position(mesh.vertex_of_corner(c));
        let pn = mesh.position(mesh.vertex_of_corner(n));
        let pp = mesh.position(mesh.vertex_of_corner(p));
        0.125 * ((pp - pv).norm_squared() * cot(theta_next) + (pn - pv).norm_squared() * cot(theta_prev))
    }
}

#[inline]
fn cot(theta: f64) -> f64 {
    let s = theta.sin();
    if s.abs() < 1e-12 {
        0.0
    } else {
        theta.cos() / s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MeshError;
    use nalgebra::Point3;

    fn create_flat_grid(n: usize) -> TriangleMesh {
        let mut vertices = Vec::new();
        let mut triangles = Vec::new();

        for j in 0..=n {
            for i in 0..=n {
                vertices.push(Point3::new(i as f64, j as f64, 0.0));
            }
        }

        for j in 0..n {
            for i in 0..n {
                let v00 = j * (n + 1) + i;
                let v10 = v00 + 1;
                let v01 = v00 + (n + 1);
                let v11 = v01 + 1;

                triangles.push([v00, v10, v11]);
                triangles.push([v00, v11, v01]);
            }
        }

        TriangleMesh::build(&vertices, &triangles).unwrap()
    }

    fn create_icosphere(subdivisions: usize) -> TriangleMesh {
        let phi = (1.0 + 5.0_f64.sqrt()) / 2.0;
        let scale = 1.0 / (1.0 + phi * phi).sqrt();

        let mut vertices = vec![
            Point3::new(-1.0, phi, 0.0) * scale,
            Point3::new(1.0, phi, 0.0) * scale,
            Point3::new(-1.0, -phi, 0.0) * scale,
            Point3::new(1.0, -phi, 0.0) * scale,
            Point3::new(0.0, -1.0, phi) * scale,
            Point3::new(0.0, 1.0, phi) * scale,
            Point3::new(0.0, -1.0, -phi) * scale,
            Point3::new(0.0, 1.0, -phi) * scale,
            Point3::new(phi, 0.0, -1.0) * scale,
            Point3::new(phi, 0.0, 1.0) * scale,
            Point3::new(-phi, 0.0, -1.0) * scale,
            Point3::new(-phi, 0.0, 1.0) * scale,
        ];

        let mut triangles = vec![
            [0, 11, 5],
            [0, 5, 1],
            [0, 1, 7],
            [0, 7, 10],
            [0, 10, 11],
            [1, 5, 9],
            [5, 11, 4],
            [11, 10, 2],
            [10, 7, 6],
            [7, 1, 8],
            [3, 9, 4],
            [3, 4, 2],
            [3, 2, 6],
            [3, 6, 8],
            [3, 8, 9],
            [4, 9, 5],
            [2, 4, 11],
            [6, 2, 10],
            [8, 6, 7],
            [9, 8, 1],
        ];

        for _ in 0..subdivisions {
            let mut next = Vec::new();
            let mut midpoints: std::collections::HashMap<(usize, usize), usize> =
                std::collections::HashMap::new();

            for tri in &triangles {
                let mut mids = [0usize; 3];
                for i in 0..3 {
                    let v0 = tri[i];
                    let v1 = tri[(i + 1) % 3];
                    let key = if v0 < v1 { (v0, v1) } else { (v1, v0) };
                    mids[i] = *midpoints.entry(key).or_insert_with(|| {
                        let mid = (vertices[v0].coords + vertices[v1].coords) / 2.0;
                        vertices.push(Point3::from(mid.normalize()));
                        vertices.len() - 1
                    });
                }
                next.push([tri[0], mids[0], mids[2]]);
                next.push([tri[1], mids[1], mids[0]]);
                next.push([tri[2], mids[2], mids[1]]);
                next.push([mids[0], mids[1], mids[2]]);
            }

            triangles = next;
        }

        TriangleMesh::build(&vertices, &triangles).unwrap()
    }

    #[test]
    fn test_curvature_flat_plane() {
        let mesh = create_flat_grid(4);
        let k = gaussian_curvature(&mesh, &CurvatureOptions::default()).unwrap();

        for v in mesh.vertex_ids() {
            let p = mesh.position(v);
            let is_grid_corner = (p.x == 0.0 || p.x == 4.0) && (p.y == 0.0 || p.y == 4.0);
            if is_grid_corner {
                // Quarter turn of defect against a straight boundary.
                assert!(k.at(v) > 0.0, "corner {:?} should be curved", v);
            } else {
                assert!(k.at(v).abs() < 1e-10, "vertex {:?}: K = {}", v, k.at(v));
            }
        }
    }

    #[test]
    fn test_boundary_zero_policy() {
        let mesh = create_flat_grid(3);
        let options = CurvatureOptions::default().with_boundary(BoundaryPolicy::Zero);
        let k = gaussian_curvature(&mesh, &options).unwrap();
        for v in mesh.vertex_ids() {
            if mesh.is_boundary_vertex(v) {
                assert_eq!(k.at(v), 0.0);
            }
        }
    }

    #[test]
    fn test_icosahedron_is_uniform() {
        let mesh = create_icosphere(0);
        let k = gaussian_curvature(&mesh, &CurvatureOptions::default().with_range(true)).unwrap();

        // Five equilateral angles at each vertex: defect π/3.
        let area = vertex_area(&mesh, VertexId::new(0), VertexArea::Barycentric).unwrap();
        let expected = (PI / 3.0) / area;
        for v in mesh.vertex_ids() {
            assert!(
                (k.at(v) - expected).abs() < 1e-9,
                "vertex {:?}: K = {}, expected {}",
                v,
                k.at(v),
                expected
            );
        }

        let (lo, hi) = k.range().unwrap();
        assert!(hi - lo < 1e-9);
    }

    #[test]
    fn test_mixed_area_matches_barycentric_on_equilateral() {
        let mesh = create_icosphere(0);
        for v in mesh.vertex_ids() {
            let a = vertex_area(&mesh, v, VertexArea::Barycentric).unwrap();
            let b = vertex_area(&mesh, v, VertexArea::Mixed).unwrap();
            assert!((a - b).abs() < 1e-12, "barycentric {} vs mixed {}", a, b);
        }
    }

    #[test]
    fn test_mixed_areas_partition_surface() {
        let mesh = create_flat_grid(3);
        let total: f64 = mesh
            .vertex_ids()
            .map(|v| vertex_area(&mesh, v, VertexArea::Mixed).unwrap())
            .sum();
        assert!((total - 9.0).abs() < 1e-10, "total mixed area {}", total);
    }

    #[test]
    fn test_gauss_bonnet() {
        let mesh = create_icosphere(2);
        for kind in [VertexArea::Barycentric, VertexArea::Mixed] {
            let options = CurvatureOptions::default().with_area(kind);
            let k = gaussian_curvature(&mesh, &options).unwrap();

            let total: f64 = mesh
                .vertex_ids()
                .map(|v| k.at(v) * vertex_area(&mesh, v, kind).unwrap())
                .sum();

            let expected = 4.0 * PI;
            assert!(
                (total - expected).abs() < 1e-8,
                "Gauss-Bonnet violated with {:?}: got {}, expected {}",
                kind,
                total,
                expected
            );
        }
    }

    #[test]
    fn test_threads_match_serial() {
        let mesh = create_icosphere(2);
        let serial = gaussian_curvature(&mesh, &CurvatureOptions::default().with_range(true)).unwrap();
        for n in [1, 2, 4, 8] {
            let options = CurvatureOptions::default().with_threads(n).with_range(true);
            let threaded = gaussian_curvature(&mesh, &options).unwrap();
            for (a, b) in serial.values().iter().zip(threaded.values()) {
                assert!((a - b).abs() < 1e-12, "{} threads: {} vs {}", n, a, b);
            }
            assert_eq!(serial.range(), threaded.range());
        }
    }

    #[test]
    fn test_stale_cache_is_rejected() {
        let mut mesh = create_icosphere(0);
        mesh.set_position(VertexId::new(0), Point3::new(0.0, 0.0, 2.0));
        let err = gaussian_curvature(&mesh, &CurvatureOptions::default()).unwrap_err();
        assert!(matches!(err, MeshError::StaleGeometry));

        mesh.make_angles_area();
        assert!(gaussian_curvature(&mesh, &CurvatureOptions::default()).is_ok());
    }

    #[test]
    fn test_range_not_reported_by_default() {
        let mesh = create_icosphere(0);
        let k = gaussian_curvature(&mesh, &CurvatureOptions::default()).unwrap();
        assert!(k.range().is_none());
        assert_eq!(k.into_values().len(), 12);
    }
}
