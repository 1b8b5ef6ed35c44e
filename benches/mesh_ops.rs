//! Benchmarks for mesh operations.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use cornermesh::prelude::*;
use nalgebra::Point3;

fn grid_input(n: usize) -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
    let mut vertices = Vec::with_capacity((n + 1) * (n + 1));
    let mut triangles = Vec::with_capacity(n * n * 2);

    // Create a gently curved grid
    for j in 0..=n {
        for i in 0..=n {
            let (x, y) = (i as f64 / n as f64, j as f64 / n as f64);
            vertices.push(Point3::new(x, y, 0.1 * (6.0 * x).sin() * (6.0 * y).cos()));
        }
    }

    // Create triangles
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

    (vertices, triangles)
}

fn create_grid_mesh(n: usize) -> TriangleMesh {
    let (vertices, triangles) = grid_input(n);
    TriangleMesh::build(&vertices, &triangles).unwrap()
}

fn bench_mesh_construction(c: &mut Criterion) {
    let (vertices, triangles) = grid_input(100);
    c.bench_function("build_grid_100x100", |b| {
        b.iter(|| {
            let mesh: TriangleMesh = TriangleMesh::build(&vertices, &triangles).unwrap();
            mesh
        });
    });
}

fn bench_mesh_traversal(c: &mut Criterion) {
    let mesh = create_grid_mesh(100);

    c.bench_function("vertex_neighbors_all", |b| {
        b.iter(|| {
            let mut count = 0;
            for v in mesh.vertex_ids() {
                count += mesh.vertex_neighbors(v).count();
            }
            count
        });
    });

    c.bench_function("boundary_edges_recompute", |b| {
        b.iter(|| mesh.are_boundaries_valid());
    });
}

fn bench_curvature(c: &mut Criterion) {
    let mesh = create_grid_mesh(200);
    let mut group = c.benchmark_group("gaussian_curvature");

    for n_threads in [1, 2, 4, 8] {
        let workers = Workers::new(n_threads).unwrap();
        let options = CurvatureOptions::default().with_range(true);
        group.bench_with_input(BenchmarkId::from_parameter(n_threads), &n_threads, |b, _| {
            b.iter(|| {
                cornermesh::algo::curvature::gaussian_curvature_with(&mesh, &options, &workers)
                    .unwrap()
            });
        });
    }

    group.finish();
}

fn bench_smoothing(c: &mut Criterion) {
    let mesh = create_grid_mesh(200);
    let mut group = c.benchmark_group("smooth_twice_per_it");
    group.sample_size(20);

    for n_threads in [1, 2, 4, 8] {
        let workers = Workers::new(n_threads).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(n_threads), &n_threads, |b, _| {
            b.iter(|| {
                let mut buffers = PingPong::from_mesh(&mesh);
                apply_twice_per_it(&Cotangent, 0.5, -0.53, 5, &mesh, &workers, &mut buffers)
                    .unwrap();
                buffers
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_mesh_construction,
    bench_mesh_traversal,
    bench_curvature,
    bench_smoothing
);
criterion_main!(benches);
