use criterion::{Criterion, criterion_group, criterion_main};
use num_complex::Complex;
use wisefft::{CacheGeometry, TransposeMethod};

fn check_transpose(c: &mut Criterion, n: usize, vl: usize, geometry: CacheGeometry, group: &str) {
    let input = (0..n * n * vl)
        .map(|i| Complex::new(i as f64, -(i as f64)))
        .collect::<Vec<_>>();
    for method in TransposeMethod::ALL {
        c.bench_function(format!("{method:?} {group}").as_str(), |b| {
            let mut working = input.to_vec();
            b.iter(|| {
                method
                    .apply(&mut working, n, n * vl, vl, vl, &geometry)
                    .unwrap();
            })
        });
    }
}

pub fn criterion_benchmark(c: &mut Criterion) {
    check_transpose(c, 64, 1, CacheGeometry::default(), "64");
    check_transpose(c, 512, 1, CacheGeometry::default(), "512");
    check_transpose(c, 500, 1, CacheGeometry::default(), "500");
    check_transpose(
        c,
        256,
        2,
        CacheGeometry::default().with_raster(true),
        "256 vl2 raster",
    );
    check_transpose(c, 256, 2, CacheGeometry::detect(), "256 vl2 detected");
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
