//! Mesh processing algorithms.
//!
//! - **Weighting**: pluggable edge weights for one-ring operators
//! - **Curvature**: discrete Gaussian curvature from angle defects
//! - **Smoothing**: local Laplacian, bi-Laplacian and Taubin smoothing
//!
//! Every algorithm takes a thread count, where `0` or `1` means serial.
//! Threaded and serial runs produce the same per-vertex results.

pub mod curvature;
pub mod parallel;
pub mod smooth;
pub mod weight;

pub use parallel::Workers;
