#![no_main]

use libfuzzer_sys::fuzz_target;
use wisefft::{CacheGeometry, TransposeMethod};

#[derive(arbitrary::Arbitrary, Debug)]
struct Target {
    n: u8,
    vl: u8,
    pad: u8,
    cache_size: u16,
    raster: bool,
}

fuzz_target!(|data: Target| {
    let n = data.n as usize % 96;
    let vl = (data.vl as usize % 4).max(1);
    let s1 = vl;
    let s0 = n * vl + data.pad as usize % 3;
    let len = n * s0 + vl;
    let geometry = CacheGeometry::new(data.cache_size as usize)
        .with_l1d_size(data.cache_size as usize * 4)
        .with_raster(data.raster);

    let original = (0..len).map(|i| i as u32).collect::<Vec<_>>();
    let mut naive = original.clone();
    TransposeMethod::Naive
        .apply(&mut naive, n, s0, s1, vl, &geometry)
        .unwrap();

    let mut tiled = original.clone();
    TransposeMethod::Tiled
        .apply(&mut tiled, n, s0, s1, vl, &geometry)
        .unwrap();
    assert_eq!(tiled, naive);

    let mut buffered = original.clone();
    match TransposeMethod::TiledBuf.apply(&mut buffered, n, s0, s1, vl, &geometry) {
        Ok(()) => assert_eq!(buffered, naive),
        Err(_) => assert_eq!(buffered, original),
    }

    TransposeMethod::Naive
        .apply(&mut naive, n, s0, s1, vl, &geometry)
        .unwrap();
    assert_eq!(naive, original);
});
