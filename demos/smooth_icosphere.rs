//! Smooth a noisy sphere and report how curvature and volume respond.
//!
//! Run with `RUST_LOG=debug cargo run --example smooth_icosphere -- 4`, where
//! the optional argument is the number of worker threads.

use std::collections::HashMap;

use cornermesh::prelude::*;
use nalgebra::Point3;

fn noisy_icosphere(levels: usize, amplitude: f64) -> Result<TriangleMesh> {
    let phi = (1.0 + 5.0_f64.sqrt()) / 2.0;
    let mut vertices: Vec<Point3<f64>> = [
        (-1.0, phi, 0.0),
        (1.0, phi, 0.0),
        (-1.0, -phi, 0.0),
        (1.0, -phi, 0.0),
        (0.0, -1.0, phi),
        (0.0, 1.0, phi),
        (0.0, -1.0, -phi),
        (0.0, 1.0, -phi),
        (phi, 0.0, -1.0),
        (phi, 0.0, 1.0),
        (-phi, 0.0, -1.0),
        (-phi, 0.0, 1.0),
    ]
    .iter()
    .map(|&(x, y, z)| Point3::from(nalgebra::Vector3::new(x, y, z).normalize()))
    .collect();

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

    for _ in 0..levels {
        let mut next = Vec::with_capacity(triangles.len() * 4);
        let mut midpoints: HashMap<(usize, usize), usize> = HashMap::new();
        for tri in &triangles {
            let mut mids = [0usize; 3];
            for i in 0..3 {
                let (a, b) = (tri[i], tri[(i + 1) % 3]);
                mids[i] = *midpoints.entry((a.min(b), a.max(b))).or_insert_with(|| {
                    let mid = (vertices[a].coords + vertices[b].coords) / 2.0;
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

    for (i, p) in vertices.iter_mut().enumerate() {
        let bump = ((i * 2654435761) % 1000) as f64 / 1000.0 - 0.5;
        *p = Point3::from(p.coords * (1.0 + amplitude * bump));
    }

    TriangleMesh::build_with(&vertices, &triangles, &BuildOptions::closed())
}

fn report(label: &str, mesh: &TriangleMesh, n_threads: usize) -> Result<()> {
    let options = CurvatureOptions::default()
        .with_area(VertexArea::Mixed)
        .with_threads(n_threads)
        .with_range(true);
    let k = gaussian_curvature(mesh, &options)?;
    let (lo, hi) = k.range().unwrap_or((f64::NAN, f64::NAN));
    log::info!(
        "{}: volume {:.4}, area {:.4}, curvature in [{:.3}, {:.3}]",
        label,
        mesh.enclosed_volume(),
        mesh.surface_area(),
        lo,
        hi
    );
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let n_threads = match std::env::args().nth(1) {
        Some(arg) => arg
            .parse()
            .map_err(|_| MeshError::invalid_param("threads", &arg, "expected an integer"))?,
        None => 4,
    };

    let noisy = noisy_icosphere(4, 0.15)?;
    log::info!(
        "noisy sphere: {} vertices, {} triangles, {} threads",
        noisy.n_vertices(),
        noisy.n_triangles(),
        n_threads
    );
    report("input", &noisy, n_threads)?;

    let options = SmoothOptions::default()
        .with_iterations(20)
        .with_lambda(0.5)
        .with_threads(n_threads);

    let mut plain = noisy.clone();
    laplacian(&mut plain, &Cotangent, &options)?;
    report("laplacian", &plain, n_threads)?;

    let mut fair = noisy.clone();
    taubin(&mut fair, &Cotangent, &options)?;
    report("taubin", &fair, n_threads)?;

    Ok(())
}
