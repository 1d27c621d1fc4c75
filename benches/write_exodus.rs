use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ndarray::Array2;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;

use meshport::exodus::Version;
use meshport::prelude::*;

fn hex_mesh(n: usize) -> Mesh {
    let points: Array2<f64> = Array2::random((n * 8, 3), Uniform::new(0., 10.));
    let cells = Array2::from_shape_fn((n, 8), |(i, j)| (i * 8 + j) as i32);
    let temperature: Array2<f64> = Array2::random((n * 8, 1), Uniform::new(250., 350.));

    Mesh::new(points, CellBlocks::new())
        .with_cells(CellType::Hexahedron, cells)
        .with_point_data("temperature", temperature.into_shape(n * 8).unwrap())
}

fn encode(mesh: &Mesh) -> Vec<u8> {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bench.e");
    meshport::exodus::write(&path, mesh).unwrap();
    std::fs::read(path).unwrap()
}

fn write_exodus_bench(c: &mut Criterion) {
    let small = hex_mesh(1_000);
    let large = hex_mesh(50_000);

    c.bench_function("write exodus 1k hexes", |b| b.iter(|| encode(black_box(&small))));
    c.bench_function("write exodus 50k hexes", |b| b.iter(|| encode(black_box(&large))));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bench.e");
    let options = ExodusOptions::default().with_version(Version::Classic);
    meshport::exodus::write_with_options(&path, &large, &options).unwrap();
    c.bench_function("read exodus 50k hexes", |b| {
        b.iter(|| meshport::exodus::read(black_box(&path)).unwrap())
    });
}

criterion_group!(benches, write_exodus_bench);
criterion_main!(benches);
