//! Shared mesh fixtures for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;

use cornermesh::mesh::TriangleMesh;
use nalgebra::Point3;

/// Unit icosahedron: 12 vertices of valence 5, 20 equilateral triangles.
pub fn icosahedron() -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
    let phi = (1.0 + 5.0_f64.sqrt()) / 2.0;
    let scale = 1.0 / (1.0 + phi * phi).sqrt();

    let vertices = vec![
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

    let triangles = vec![
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

    (vertices, triangles)
}

/// Icosahedron subdivided `levels` times and projected onto the unit sphere.
pub fn icosphere(levels: usize) -> TriangleMesh {
    let (mut vertices, mut triangles) = icosahedron();

    for _ in 0..levels {
        let mut next = Vec::with_capacity(triangles.len() * 4);
        let mut midpoints: HashMap<(usize, usize), usize> = HashMap::new();

        for tri in &triangles {
            let mut mids = [0usize; 3];
            for i in 0..3 {
                let v0 = tri[i];
                let v1 = tri[(i + 1) % 3];
                let key = (v0.min(v1), v0.max(v1));
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

/// Icosphere with deterministic radial noise.
pub fn noisy_sphere(levels: usize, amplitude: f64) -> TriangleMesh {
    let mesh = icosphere(levels);
    let noisy: Vec<Point3<f64>> = mesh
        .vertices()
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let bump = ((i * 2654435761) % 1000) as f64 / 1000.0 - 0.5;
            Point3::from(p.coords * (1.0 + amplitude * bump))
        })
        .collect();
    TriangleMesh::build(&noisy, &mesh.to_triangle_list()).unwrap()
}

/// `n × n` grid of unit squares in the z = 0 plane, two triangles each.
pub fn flat_grid(n: usize) -> TriangleMesh {
    let mut vertices = Vec::with_capacity((n + 1) * (n + 1));
    let mut triangles = Vec::with_capacity(n * n * 2);

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

pub fn max_distance(a: &[Point3<f64>], b: &[Point3<f64>]) -> f64 {
    a.iter().zip(b).map(|(p, q)| (p - q).norm()).fold(0.0, f64::max)
}
