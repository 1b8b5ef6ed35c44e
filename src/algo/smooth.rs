//! Local (one-ring) mesh smoothing.
//!
//! Every pass moves each vertex along its normalized weighted Laplacian:
//!
//! ```text
//! new[v] = old[v] + λ · Σ w_j (old[j] - old[v]) / Σ w_j
//! ```
//!
//! Passes read only from `old` and write only to `new`, so the result does
//! not depend on the order vertices are visited in, nor on how they are split
//! across threads. [`PingPong`] keeps the two buffers and tracks which one
//! holds the latest positions.
//!
//! # Algorithms
//!
//! - [`apply_local`]: a single pass
//! - [`apply_once_per_it`]: one pass per iteration with a single λ
//! - [`apply_twice_per_it`]: two passes per iteration, λ1 then λ2
//! - [`laplacian`], [`bilaplacian`], [`taubin`]: drivers that smooth a mesh in place
//!
//! # Example
//!
//! ```
//! use cornermesh::algo::smooth::{taubin, SmoothOptions};
//! use cornermesh::algo::weight::Uniform;
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
//! let mut mesh: TriangleMesh = TriangleMesh::build(&vertices, &triangles).unwrap();
//!
//! let options = SmoothOptions::default().with_iterations(10).with_lambda(0.5);
//! taubin(&mut mesh, &Uniform, &options).unwrap();
//! assert!(mesh.is_angles_area_valid());
//! ```

use nalgebra::Point3;

use crate::error::{MeshError, Result};
use crate::mesh::{MeshIndex, TriangleMesh, VertexId};

use super::parallel::Workers;
use super::weight::{normalized_laplacian, Weighting};

/// Pass-band frequency used to derive Taubin's μ from λ.
const TAUBIN_K_PB: f64 = 0.1;

/// Two position buffers used alternately as source and destination.
#[derive(Debug, Clone)]
pub struct PingPong {
    buffers: [Vec<Point3<f64>>; 2],
    front: usize,
}

impl PingPong {
    /// Start from `positions`; both buffers begin as copies of it.
    pub fn new(positions: Vec<Point3<f64>>) -> Self {
        let back = positions.clone();
        Self {
            buffers: [positions, back],
            front: 0,
        }
    }

    /// Start from the current positions of a mesh.
    pub fn from_mesh<I: MeshIndex>(mesh: &TriangleMesh<I>) -> Self {
        Self::new(mesh.vertices().to_vec())
    }

    /// Number of positions per buffer.
    #[inline]
    pub fn len(&self) -> usize {
        self.buffers[0].len()
    }

    /// Check if the buffers are empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buffers[0].is_empty()
    }

    /// The latest positions.
    #[inline]
    pub fn front(&self) -> &[Point3<f64>] {
        &self.buffers[self.front]
    }

    /// Which of the two buffers holds the latest positions (0 or 1).
    #[inline]
    pub fn parity(&self) -> usize {
        self.front
    }

    /// Borrow the latest positions for reading and the other buffer for writing.
    pub fn split(&mut self) -> (&[Point3<f64>], &mut [Point3<f64>]) {
        let [a, b] = &mut self.buffers;
        if self.front == 0 {
            (&a[..], &mut b[..])
        } else {
            (&b[..], &mut a[..])
        }
    }

    /// Make the buffer written last the front buffer.
    #[inline]
    pub fn swap(&mut self) {
        self.front ^= 1;
    }

    /// Take the latest positions.
    pub fn into_front(self) -> Vec<Point3<f64>> {
        let [a, b] = self.buffers;
        if self.front == 0 {
            a
        } else {
            b
        }
    }
}

/// One smoothing pass from `old` into `new`.
///
/// NaN weights (for example from a vertex without neighbours) propagate
/// into `new` unchanged.
///
/// # Errors
///
/// [`MeshError::BufferSize`] if either buffer does not match the vertex count.
pub fn apply_local<I, W>(
    weighting: &W,
    lambda: f64,
    mesh: &TriangleMesh<I>,
    workers: &Workers,
    old: &[Point3<f64>],
    new: &mut [Point3<f64>],
) -> Result<()>
where
    I: MeshIndex,
    W: Weighting<I> + ?Sized,
{
    MeshError::check_len(mesh.n_vertices(), old.len())?;
    MeshError::check_len(mesh.n_vertices(), new.len())?;

    workers.fill(new, |i| {
        let v = VertexId::new(i);
        old[i] + lambda * normalized_laplacian(weighting, mesh, old, v)
    });
    Ok(())
}

/// Run `n_iterations` passes with the same λ, swapping buffers after each.
///
/// With zero iterations the buffers are left untouched. The result is in
/// [`PingPong::front`].
pub fn apply_once_per_it<I, W>(
    weighting: &W,
    lambda: f64,
    n_iterations: usize,
    mesh: &TriangleMesh<I>,
    workers: &Workers,
    buffers: &mut PingPong,
) -> Result<()>
where
    I: MeshIndex,
    W: Weighting<I> + ?Sized,
{
    for _ in 0..n_iterations {
        let (old, new) = buffers.split();
        apply_local(weighting, lambda, mesh, workers, old, new)?;
        buffers.swap();
    }
    Ok(())
}

/// Run `n_iterations` iterations of two passes each, `lambda1` then `lambda2`.
///
/// A positive `lambda1` followed by a negative `lambda2` of larger magnitude
/// damps noise while counteracting the shrinkage of plain Laplacian
/// smoothing. The result is in [`PingPong::front`].
pub fn apply_twice_per_it<I, W>(
    weighting: &W,
    lambda1: f64,
    lambda2: f64,
    n_iterations: usize,
    mesh: &TriangleMesh<I>,
    workers: &Workers,
    buffers: &mut PingPong,
) -> Result<()>
where
    I: MeshIndex,
    W: Weighting<I> + ?Sized,
{
    for _ in 0..n_iterations {
        for lambda in [lambda1, lambda2] {
            let (old, new) = buffers.split();
            apply_local(weighting, lambda, mesh, workers, old, new)?;
            buffers.swap();
        }
    }
    Ok(())
}

/// Options for the smoothing drivers.
#[derive(Debug, Clone)]
pub struct SmoothOptions {
    /// Number of smoothing iterations.
    pub iterations: usize,

    /// Smoothing factor.
    /// Higher values result in more aggressive smoothing.
    pub lambda: f64,

    /// Worker threads, `0` or `1` for serial.
    pub n_threads: usize,
}

impl Default for SmoothOptions {
    fn default() -> Self {
        Self {
            iterations: 1,
            lambda: 0.5,
            n_threads: 0,
        }
    }
}

impl SmoothOptions {
    /// Set the number of iterations.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set the smoothing factor.
    pub fn with_lambda(mut self, lambda: f64) -> Self {
        self.lambda = lambda;
        self
    }

    /// Set the number of worker threads.
    pub fn with_threads(mut self, n_threads: usize) -> Self {
        self.n_threads = n_threads;
        self
    }

    /// Create options for single-threaded execution.
    pub fn sequential(mut self) -> Self {
        self.n_threads = 0;
        self
    }
}

/// Laplacian smoothing: one pass of `options.lambda` per iteration.
///
/// Shrinks closed surfaces over many iterations. Updates the mesh positions
/// and refreshes its angle/area cache.
pub fn laplacian<I, W>(mesh: &mut TriangleMesh<I>, weighting: &W, options: &SmoothOptions) -> Result<()>
where
    I: MeshIndex,
    W: Weighting<I> + ?Sized,
{
    check_lambda(options.lambda)?;
    log::debug!(
        "laplacian smoothing: {} iterations, lambda {}, {} threads",
        options.iterations,
        options.lambda,
        options.n_threads
    );
    run(mesh, options, |mesh, workers, buffers| {
        apply_once_per_it(weighting, options.lambda, options.iterations, mesh, workers, buffers)
    })
}

/// Bi-Laplacian smoothing: passes of `λ` and `-λ` per iteration.
pub fn bilaplacian<I, W>(mesh: &mut TriangleMesh<I>, weighting: &W, options: &SmoothOptions) -> Result<()>
where
    I: MeshIndex,
    W: Weighting<I> + ?Sized,
{
    check_lambda(options.lambda)?;
    log::debug!(
        "bilaplacian smoothing: {} iterations, lambda {}, {} threads",
        options.iterations,
        options.lambda,
        options.n_threads
    );
    let lambda = options.lambda;
    run(mesh, options, |mesh, workers, buffers| {
        apply_twice_per_it(weighting, lambda, -lambda, options.iterations, mesh, workers, buffers)
    })
}

/// Taubin λ|μ smoothing: passes of `λ` and `μ` per iteration.
///
/// `μ = 1 / (k_pb - 1/λ)` with a pass-band frequency `k_pb = 0.1`, which
/// makes `μ` negative and slightly larger in magnitude than `λ`.
///
/// # Errors
///
/// [`MeshError::InvalidParameter`] unless `0 < λ ≤ 1`.
///
/// # Reference
///
/// Taubin, G. (1995). "A signal processing approach to fair surface design."
/// SIGGRAPH '95.
pub fn taubin<I, W>(mesh: &mut TriangleMesh<I>, weighting: &W, options: &SmoothOptions) -> Result<()>
where
    I: MeshIndex,
    W: Weighting<I> + ?Sized,
{
    let lambda = options.lambda;
    if !(lambda > 0.0 && lambda <= 1.0) {
        return Err(MeshError::invalid_param("lambda", lambda, "must be in (0, 1]"));
    }
    let mu = taubin_mu(lambda);
    log::debug!(
        "taubin smoothing: {} iterations, lambda {}, mu {:.4}, {} threads",
        options.iterations,
        lambda,
        mu,
        options.n_threads
    );
    run(mesh, options, |mesh, workers, buffers| {
        apply_twice_per_it(weighting, lambda, mu, options.iterations, mesh, workers, buffers)
    })
}

/// Taubin's μ for a given λ.
#[inline]
pub fn taubin_mu(lambda: f64) -> f64 {
    1.0 / (TAUBIN_K_PB - 1.0 / lambda)
}

fn check_lambda(lambda: f64) -> Result<()> {
    if lambda.is_finite() {
        Ok(())
    } else {
        Err(MeshError::invalid_param("lambda", lambda, "must be finite"))
    }
}

/// Smooth through a fresh pair of buffers, then write the result back.
fn run<I, F>(mesh: &mut TriangleMesh<I>, options: &SmoothOptions, smooth: F) -> Result<()>
where
    I: MeshIndex,
    F: FnOnce(&TriangleMesh<I>, &Workers, &mut PingPong) -> Result<()>,
{
    if options.iterations == 0 {
        return Ok(());
    }
    let workers = Workers::new(options.n_threads)?;
    let mut buffers = PingPong::from_mesh(&*mesh);
    smooth(&*mesh, &workers, &mut buffers)?;
    mesh.set_positions(buffers.into_front())?;
    mesh.make_angles_area();
    Ok(())
}
