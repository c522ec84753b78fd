/*
 * // Copyright (c) Radzivon Bartoshyk 10/2026. All rights reserved.
 * //
 * // Redistribution and use in source and binary forms, with or without modification,
 * // are permitted provided that the following conditions are met:
 * //
 * // 1.  Redistributions of source code must retain the above copyright notice, this
 * // list of conditions and the following disclaimer.
 * //
 * // 2.  Redistributions in binary form must reproduce the above copyright notice,
 * // this list of conditions and the following disclaimer in the documentation
 * // and/or other materials provided with the distribution.
 * //
 * // 3.  Neither the name of the copyright holder nor the names of its
 * // contributors may be used to endorse or promote products derived from
 * // this software without specific prior written permission.
 * //
 * // THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
 * // AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
 * // IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE ARE
 * // DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE LIABLE
 * // FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR CONSEQUENTIAL
 * // DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR
 * // SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER
 * // CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY,
 * // OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE
 * // OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.
 */
//! In-place transposition of square, strided matrices of `vl`-element groups.
//!
//! Element `(i1, i0)` of the logical `n x n` matrix lives at
//! `i1 * s0 + i0 * s1`; transposing exchanges it with `i1 * s1 + i0 * s0`.
use crate::err::try_vec;
use crate::tile::{CacheGeometry, cpy2d_ci, cpy2d_co, tile2d};
use crate::FftError;
use serde::{Deserialize, Serialize};

/// Transposition algorithm a plan commits to.
#[derive(Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum TransposeMethod {
    Naive,
    Tiled,
    TiledBuf,
}

impl TransposeMethod {
    pub const ALL: [TransposeMethod; 3] = [
        TransposeMethod::Naive,
        TransposeMethod::Tiled,
        TransposeMethod::TiledBuf,
    ];

    pub fn apply<T: Copy + Default>(
        self,
        data: &mut [T],
        n: usize,
        s0: usize,
        s1: usize,
        vl: usize,
        geometry: &CacheGeometry,
    ) -> Result<(), FftError> {
        match self {
            TransposeMethod::Naive => {
                transpose(data, n, s0, s1, vl);
                Ok(())
            }
            TransposeMethod::Tiled => {
                transpose_tiled_with(data, n, s0, s1, vl, geometry);
                Ok(())
            }
            TransposeMethod::TiledBuf => transpose_tiledbuf_with(data, n, s0, s1, vl, geometry),
        }
    }
}

#[inline]
fn check_extent(len: usize, n: usize, s0: usize, s1: usize, vl: usize) {
    if n > 1 {
        let required = (n - 1) * (s0 + s1) + vl;
        assert!(
            len >= required,
            "Transpose of {n}x{n} with strides {s0}, {s1} needs {required} elements, but buffer has {len}"
        );
    }
}

/// Naive in-place transposition over the lower triangle.
pub fn transpose<T: Copy>(data: &mut [T], n: usize, s0: usize, s1: usize, vl: usize) {
    check_extent(data.len(), n, s0, s1, vl);
    match vl {
        1 => {
            for i1 in 1..n {
                for i0 in 0..i1 {
                    data.swap(i1 * s0 + i0 * s1, i1 * s1 + i0 * s0);
                }
            }
        }
        2 => {
            for i1 in 1..n {
                for i0 in 0..i1 {
                    let a = i1 * s0 + i0 * s1;
                    let b = i1 * s1 + i0 * s0;
                    let x0 = data[a];
                    let x1 = data[a + 1];
                    let y0 = data[b];
                    let y1 = data[b + 1];
                    data[b] = x0;
                    data[b + 1] = x1;
                    data[a] = y0;
                    data[a + 1] = y1;
                }
            }
        }
        _ => {
            for i1 in 1..n {
                for i0 in 0..i1 {
                    let a = i1 * s0 + i0 * s1;
                    let b = i1 * s1 + i0 * s0;
                    for v in 0..vl {
                        data.swap(a + v, b + v);
                    }
                }
            }
        }
    }
}

/// State of one tiled transposition; lives on the caller's stack frame.
struct TransposeClosure<'a, T> {
    data: &'a mut [T],
    origin: usize,
    s0: usize,
    s1: usize,
    vl: usize,
    tilesz: usize,
    buf0: &'a mut [T],
    buf1: &'a mut [T],
}

type TileFn<'a, T> = fn(&mut TransposeClosure<'a, T>, usize, usize, usize, usize);

impl<T: Copy> TransposeClosure<'_, T> {
    fn dotile(&mut self, n0l: usize, n0u: usize, n1l: usize, n1u: usize) {
        let (o, s0, s1, vl) = (self.origin, self.s0, self.s1, self.vl);
        let data = &mut *self.data;
        match vl {
            1 => {
                for i1 in n1l..n1u {
                    for i0 in n0l..n0u {
                        data.swap(o + i1 * s0 + i0 * s1, o + i1 * s1 + i0 * s0);
                    }
                }
            }
            2 => {
                for i1 in n1l..n1u {
                    for i0 in n0l..n0u {
                        let a = o + i1 * s0 + i0 * s1;
                        let b = o + i1 * s1 + i0 * s0;
                        let x0 = data[a];
                        let x1 = data[a + 1];
                        let y0 = data[b];
                        let y1 = data[b + 1];
                        data[b] = x0;
                        data[b + 1] = x1;
                        data[a] = y0;
                        data[a + 1] = y1;
                    }
                }
            }
            _ => {
                for i1 in n1l..n1u {
                    for i0 in n0l..n0u {
                        let a = o + i1 * s0 + i0 * s1;
                        let b = o + i1 * s1 + i0 * s0;
                        for v in 0..vl {
                            data.swap(a + v, b + v);
                        }
                    }
                }
            }
        }
    }

    fn dotile_buf(&mut self, n0l: usize, n0u: usize, n1l: usize, n1u: usize) {
        let (o, s0, s1, vl) = (self.origin, self.s0, self.s1, self.vl);
        let d0 = n0u - n0l;
        let d1 = n1u - n1l;
        let upper = o + n0l * s0 + n1l * s1;
        let lower = o + n0l * s1 + n1l * s0;
        cpy2d_ci(&self.data[upper..], self.buf0, d0, s0, vl, d1, s1, vl * d0, vl);
        cpy2d_ci(&self.data[lower..], self.buf1, d0, s1, vl, d1, s0, vl * d0, vl);
        cpy2d_co(self.buf1, &mut self.data[upper..], d0, vl, s0, d1, vl * d0, s1, vl);
        cpy2d_co(self.buf0, &mut self.data[lower..], d0, vl, s1, d1, vl * d0, s0, vl);
    }
}

/// Swaps the off-diagonal rectangle of every split, then walks down the diagonal.
fn transpose_rec<'a, T: Copy>(k: &mut TransposeClosure<'a, T>, n: usize, f: TileFn<'a, T>) {
    let mut n = n;
    while n > 1 {
        let n2 = n / 2;
        let tilesz = k.tilesz;
        tile2d(0, n2, n2, n, tilesz, &mut |n0l, n0u, n1l, n1u| {
            f(k, n0l, n0u, n1l, n1u)
        });
        let origin = k.origin;
        transpose_rec(k, n2, f);
        k.origin = origin + n2 * (k.s0 + k.s1);
        n -= n2;
    }
}

/// Cache-tiled in-place transposition with direct swaps.
pub fn transpose_tiled<T: Copy>(data: &mut [T], n: usize, s0: usize, s1: usize, vl: usize) {
    transpose_tiled_with(data, n, s0, s1, vl, &CacheGeometry::default())
}

pub fn transpose_tiled_with<T: Copy>(
    data: &mut [T],
    n: usize,
    s0: usize,
    s1: usize,
    vl: usize,
    geometry: &CacheGeometry,
) {
    check_extent(data.len(), n, s0, s1, vl);
    let mut k = TransposeClosure {
        data,
        origin: 0,
        s0,
        s1,
        vl,
        // two tiles must be resident to be swapped
        tilesz: geometry.tile_size(vl, size_of::<T>(), 2),
        buf0: &mut [],
        buf1: &mut [],
    };
    transpose_rec(&mut k, n, TransposeClosure::dotile);
}

/// Cache-tiled in-place transposition staged through two local buffers.
///
/// Meant for strides where the two halves of a swap map to the same cache
/// sets, which makes direct swapping thrash.
pub fn transpose_tiledbuf<T: Copy + Default>(
    data: &mut [T],
    n: usize,
    s0: usize,
    s1: usize,
    vl: usize,
) -> Result<(), FftError> {
    transpose_tiledbuf_with(data, n, s0, s1, vl, &CacheGeometry::default())
}

pub fn transpose_tiledbuf_with<T: Copy + Default>(
    data: &mut [T],
    n: usize,
    s0: usize,
    s1: usize,
    vl: usize,
    geometry: &CacheGeometry,
) -> Result<(), FftError> {
    check_extent(data.len(), n, s0, s1, vl);
    let tilesz = geometry.tile_size(vl, size_of::<T>(), 2);
    let tile_elements = tilesz * tilesz * vl;
    let required = tile_elements * size_of::<T>();
    let capacity = geometry.staging_capacity();
    if required > capacity {
        return Err(FftError::StagingBufferTooSmall { required, capacity });
    }
    if n <= 1 {
        return Ok(());
    }

    if geometry.raster && vl != 1 {
        let block = geometry.raster_block(vl, size_of::<T>());
        if block > 0 && n >= block && n % block == 0 {
            let mut buf0 = try_vec![T::default(); block * block * vl];
            let mut buf1 = try_vec![T::default(); block * block * vl];
            transpose_raster(data, n, s0, s1, vl, block, &mut buf0, &mut buf1);
            return Ok(());
        }
    }

    let mut buf0 = try_vec![T::default(); tile_elements];
    let mut buf1 = try_vec![T::default(); tile_elements];
    let mut k = TransposeClosure {
        data,
        origin: 0,
        s0,
        s1,
        vl,
        tilesz,
        buf0: &mut buf0,
        buf1: &mut buf1,
    };
    transpose_rec(&mut k, n, TransposeClosure::dotile_buf);
    Ok(())
}

/// Block raster sweep: each diagonal block is transposed through one buffer,
/// each off-diagonal block is exchanged with its mirror exactly once.
#[allow(clippy::too_many_arguments)]
fn transpose_raster<T: Copy>(
    data: &mut [T],
    n: usize,
    s0: usize,
    s1: usize,
    vl: usize,
    block: usize,
    buf0: &mut [T],
    buf1: &mut [T],
) {
    let row = vl * block;
    for i in (0..n).step_by(block) {
        let diagonal = i * s0 + i * s1;
        cpy2d_ci(&data[diagonal..], buf0, block, s1, vl, block, s0, row, vl);
        cpy2d_co(buf0, &mut data[diagonal..], block, row, s1, block, vl, s0, vl);

        for j in (i + block..n).step_by(block) {
            let upper = i * s0 + j * s1;
            let lower = j * s0 + i * s1;
            cpy2d_ci(&data[upper..], buf0, block, s1, vl, block, s0, row, vl);
            cpy2d_ci(&data[lower..], buf1, block, s1, vl, block, s0, row, vl);
            cpy2d_co(buf1, &mut data[upper..], block, row, s1, block, vl, s0, vl);
            cpy2d_co(buf0, &mut data[lower..], block, row, s1, block, vl, s0, vl);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::Rng;

    fn random_buffer(len: usize) -> Vec<f64> {
        (0..len).map(|_| rand::rng().random()).collect()
    }

    fn reference<T: Copy>(data: &[T], n: usize, s0: usize, s1: usize, vl: usize) -> Vec<T> {
        let mut out = data.to_vec();
        for i1 in 0..n {
            for i0 in 0..n {
                for v in 0..vl {
                    out[i1 * s1 + i0 * s0 + v] = data[i1 * s0 + i0 * s1 + v];
                }
            }
        }
        out
    }

    #[test]
    fn test_transpose_4x4_scenario() {
        let mut data: Vec<u32> = (0..16).collect();
        transpose(&mut data, 4, 1, 4, 1);
        assert_eq!(
            data,
            vec![0, 4, 8, 12, 1, 5, 9, 13, 2, 6, 10, 14, 3, 7, 11, 15]
        );
    }

    #[test]
    fn test_transpose_matches_reference() {
        for vl in [1usize, 2, 3, 5] {
            for n in 0..19usize {
                let s1 = vl;
                let s0 = (n + 2) * vl;
                let len = (n.max(1) - 1) * (s0 + s1) + vl + 8;
                let src = random_buffer(len);
                let expected = reference(&src, n, s0, s1, vl);
                let mut naive = src.clone();
                transpose(&mut naive, n, s0, s1, vl);
                assert_eq!(naive, expected, "naive n {n} vl {vl}");
            }
        }
    }

    #[test]
    fn test_tiled_variants_agree_with_naive() {
        let geometries = [
            CacheGeometry::new(64),
            CacheGeometry::new(512),
            CacheGeometry::default(),
        ];
        for geometry in geometries.iter() {
            for vl in [1usize, 2, 4] {
                for n in [0usize, 1, 2, 3, 7, 16, 33, 64] {
                    let s0 = n * vl;
                    let s1 = vl;
                    let src = random_buffer((n * n * vl).max(1));
                    let mut naive = src.clone();
                    transpose(&mut naive, n, s0, s1, vl);
                    let mut tiled = src.clone();
                    transpose_tiled_with(&mut tiled, n, s0, s1, vl, geometry);
                    let mut buffered = src.clone();
                    transpose_tiledbuf_with(&mut buffered, n, s0, s1, vl, geometry).unwrap();
                    assert_eq!(tiled, naive, "tiled n {n} vl {vl} {geometry:?}");
                    assert_eq!(buffered, naive, "tiledbuf n {n} vl {vl} {geometry:?}");
                }
            }
        }
    }

    #[test]
    fn test_raster_agrees_with_naive() {
        let geometry = CacheGeometry::new(8192)
            .with_l1d_size(4096)
            .with_raster(true);
        for vl in [2usize, 3, 4] {
            assert_eq!(geometry.raster_block(vl, size_of::<f64>()), 8);
            for n in [8usize, 16, 32, 40, 12] {
                let padded = (n + 1) * (vl + 1);
                for (s0, s1) in [
                    (n * vl, vl),
                    (vl, n * vl),
                    (padded, vl + 1),
                    (vl + 1, padded),
                ] {
                    let src = random_buffer((n + 1) * padded);
                    let mut naive = src.clone();
                    transpose(&mut naive, n, s0, s1, vl);
                    let mut raster = src.clone();
                    transpose_tiledbuf_with(&mut raster, n, s0, s1, vl, &geometry).unwrap();
                    assert_eq!(raster, naive, "raster n {n} vl {vl} strides {s0} {s1}");
                }
            }
        }
    }

    #[test]
    fn test_staging_too_small_is_reported() {
        let geometry = CacheGeometry::new(16);
        let mut data = vec![0f64; 4 * 4 * 8];
        let result = transpose_tiledbuf_with(&mut data, 4, 32, 8, 8, &geometry);
        assert!(matches!(
            result,
            Err(FftError::StagingBufferTooSmall {
                required: 64,
                capacity: 8
            })
        ));
    }

    #[test]
    fn test_methods_agree() {
        let n = 24;
        let vl = 2;
        let src = random_buffer(n * n * vl);
        let geometry = CacheGeometry::default();
        let mut outputs = Vec::new();
        for method in TransposeMethod::ALL {
            let mut data = src.clone();
            method
                .apply(&mut data, n, n * vl, vl, vl, &geometry)
                .unwrap();
            outputs.push(data);
        }
        assert_eq!(outputs[0], outputs[1]);
        assert_eq!(outputs[0], outputs[2]);
    }

    proptest! {
        #[test]
        fn prop_transpose_is_involution(n in 0usize..24, vl in 1usize..5, pad in 0usize..3) {
            let s1 = vl;
            let s0 = (n + pad) * vl;
            let len = (n + pad).max(1) * n.max(1) * vl;
            let src: Vec<u64> = (0..len as u64).collect();
            let mut data = src.clone();
            transpose(&mut data, n, s0, s1, vl);
            transpose(&mut data, n, s0, s1, vl);
            prop_assert_eq!(data, src);
        }

        #[test]
        fn prop_tiling_is_not_semantic(n in 0usize..40, vl in 1usize..4, cache in 32usize..4096) {
            let geometry = CacheGeometry::new(cache);
            let src: Vec<u64> = (0..(n * n * vl).max(1) as u64).collect();
            let mut naive = src.clone();
            transpose(&mut naive, n, n * vl, vl, vl);
            let mut tiled = src.clone();
            transpose_tiled_with(&mut tiled, n, n * vl, vl, vl, &geometry);
            prop_assert_eq!(&tiled, &naive);
            let mut buffered = src.clone();
            if transpose_tiledbuf_with(&mut buffered, n, n * vl, vl, vl, &geometry).is_ok() {
                prop_assert_eq!(&buffered, &naive);
            }
        }
    }
}
