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
use crate::util::isqrt;

/// Cache budget used to size transposition tiles and staging buffers.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CacheGeometry {
    /// Bytes a pair of tiles may occupy together.
    pub cache_size: usize,
    /// Bytes of level-1 data cache, used to tune the raster block size.
    pub l1d_size: usize,
    /// Enables the raster-order sweep in [`transpose_tiledbuf_with`](crate::transpose_tiledbuf_with).
    pub raster: bool,
}

const DEFAULT_CACHE_SIZE: usize = 8192;
const DEFAULT_L1D_SIZE: usize = 32 * 1024;

impl Default for CacheGeometry {
    fn default() -> Self {
        CacheGeometry {
            cache_size: DEFAULT_CACHE_SIZE,
            l1d_size: DEFAULT_L1D_SIZE,
            raster: false,
        }
    }
}

impl CacheGeometry {
    pub fn new(cache_size: usize) -> CacheGeometry {
        CacheGeometry {
            cache_size,
            ..Default::default()
        }
    }

    pub fn with_l1d_size(mut self, l1d_size: usize) -> CacheGeometry {
        self.l1d_size = l1d_size;
        self
    }

    pub fn with_raster(mut self, raster: bool) -> CacheGeometry {
        self.raster = raster;
        self
    }

    /// Reads the level-1 data cache size of the first CPU and enables the
    /// raster sweep. Falls back to defaults where the size is not exposed.
    pub fn detect() -> CacheGeometry {
        let l1d_size = detect_l1d_size().unwrap_or(DEFAULT_L1D_SIZE);
        CacheGeometry {
            cache_size: DEFAULT_CACHE_SIZE.min(l1d_size),
            l1d_size,
            raster: true,
        }
    }

    /// Edge of a square tile such that `how_many_tiles` of them fit the budget.
    pub fn tile_size(&self, vl: usize, element_size: usize, how_many_tiles: usize) -> usize {
        compute_tilesz(self.cache_size, vl, element_size, how_many_tiles)
    }

    /// Bytes available to each of the two staging buffers.
    pub fn staging_capacity(&self) -> usize {
        self.cache_size / 2
    }

    /// Largest power-of-two block edge whose two staging blocks fit in L1D.
    pub fn raster_block(&self, vl: usize, element_size: usize) -> usize {
        let per_block = self.l1d_size / (2 * vl.max(1) * element_size.max(1));
        let edge = isqrt(per_block);
        if edge == 0 {
            return 0;
        }
        1usize << (usize::BITS - 1 - edge.leading_zeros())
    }
}

#[cfg(target_os = "linux")]
fn detect_l1d_size() -> Option<usize> {
    let raw = std::fs::read_to_string("/sys/devices/system/cpu/cpu0/cache/index0/size").ok()?;
    parse_cache_size(raw.trim())
}

#[cfg(not(target_os = "linux"))]
fn detect_l1d_size() -> Option<usize> {
    None
}

fn parse_cache_size(value: &str) -> Option<usize> {
    let (digits, scale) = match value.strip_suffix('K') {
        Some(digits) => (digits, 1024),
        None => match value.strip_suffix('M') {
            Some(digits) => (digits, 1024 * 1024),
            None => (value, 1),
        },
    };
    digits.parse::<usize>().ok().map(|x| x * scale)
}

pub(crate) fn compute_tilesz(
    cache_size: usize,
    vl: usize,
    element_size: usize,
    how_many_tiles: usize,
) -> usize {
    let denominator = element_size.max(1) * vl.max(1) * how_many_tiles.max(1);
    isqrt(cache_size / denominator).max(1)
}

/// Splits `[lo0, hi0) x [lo1, hi1)` into tiles no larger than `tilesz` on
/// either side and hands each one to `f`.
///
/// The larger side is halved first. Only coverage is guaranteed, not order.
pub(crate) fn tile2d<F: FnMut(usize, usize, usize, usize)>(
    mut lo0: usize,
    hi0: usize,
    mut lo1: usize,
    hi1: usize,
    tilesz: usize,
    f: &mut F,
) {
    assert!(tilesz > 0, "Tile size must be positive");
    loop {
        let d0 = hi0 - lo0;
        let d1 = hi1 - lo1;
        if d0 >= d1 && d0 > tilesz {
            let mid0 = (lo0 + hi0) / 2;
            tile2d(lo0, mid0, lo1, hi1, tilesz, f);
            lo0 = mid0;
        } else if d1 > tilesz {
            let mid1 = (lo1 + hi1) / 2;
            tile2d(lo0, hi0, lo1, mid1, tilesz, f);
            lo1 = mid1;
        } else {
            f(lo0, hi0, lo1, hi1);
            return;
        }
    }
}

/// Strided 2D copy of `vl`-element groups.
#[inline]
#[allow(clippy::too_many_arguments)]
fn cpy2d<T: Copy>(
    src: &[T],
    dst: &mut [T],
    n0: usize,
    is0: usize,
    os0: usize,
    n1: usize,
    is1: usize,
    os1: usize,
    vl: usize,
) {
    match vl {
        1 => {
            for i1 in 0..n1 {
                for i0 in 0..n0 {
                    dst[i0 * os0 + i1 * os1] = src[i0 * is0 + i1 * is1];
                }
            }
        }
        2 => {
            for i1 in 0..n1 {
                for i0 in 0..n0 {
                    let s = i0 * is0 + i1 * is1;
                    let d = i0 * os0 + i1 * os1;
                    dst[d] = src[s];
                    dst[d + 1] = src[s + 1];
                }
            }
        }
        _ => {
            for i1 in 0..n1 {
                for i0 in 0..n0 {
                    let s = i0 * is0 + i1 * is1;
                    let d = i0 * os0 + i1 * os1;
                    dst[d..d + vl].copy_from_slice(&src[s..s + vl]);
                }
            }
        }
    }
}

/// [`cpy2d`] with the inner loop running along the smaller input stride.
#[allow(clippy::too_many_arguments)]
pub(crate) fn cpy2d_ci<T: Copy>(
    src: &[T],
    dst: &mut [T],
    n0: usize,
    is0: usize,
    os0: usize,
    n1: usize,
    is1: usize,
    os1: usize,
    vl: usize,
) {
    if is0 < is1 {
        cpy2d(src, dst, n0, is0, os0, n1, is1, os1, vl);
    } else {
        cpy2d(src, dst, n1, is1, os1, n0, is0, os0, vl);
    }
}

/// [`cpy2d`] with the inner loop running along the smaller output stride.
#[allow(clippy::too_many_arguments)]
pub(crate) fn cpy2d_co<T: Copy>(
    src: &[T],
    dst: &mut [T],
    n0: usize,
    is0: usize,
    os0: usize,
    n1: usize,
    is1: usize,
    os1: usize,
    vl: usize,
) {
    if os0 < os1 {
        cpy2d(src, dst, n0, is0, os0, n1, is1, os1, vl);
    } else {
        cpy2d(src, dst, n1, is1, os1, n0, is0, os0, vl);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile2d_covers_rectangle_once() {
        for tilesz in 1..9 {
            let (lo0, hi0, lo1, hi1) = (0usize, 13usize, 13usize, 29usize);
            let mut hits = vec![0u32; 29 * 29];
            tile2d(lo0, hi0, lo1, hi1, tilesz, &mut |a0, b0, a1, b1| {
                assert!(b0 - a0 <= tilesz && b1 - a1 <= tilesz);
                for i0 in a0..b0 {
                    for i1 in a1..b1 {
                        hits[i0 * 29 + i1] += 1;
                    }
                }
            });
            for i0 in 0..29 {
                for i1 in 0..29 {
                    let inside = (lo0..hi0).contains(&i0) && (lo1..hi1).contains(&i1);
                    assert_eq!(hits[i0 * 29 + i1], inside as u32, "tile {tilesz}");
                }
            }
        }
    }

    #[test]
    fn test_compute_tilesz() {
        assert_eq!(compute_tilesz(8192, 1, 8, 2), 22);
        assert_eq!(compute_tilesz(8192, 2, 8, 2), 16);
        assert_eq!(compute_tilesz(16, 64, 8, 2), 1);
    }

    #[test]
    fn test_raster_block_is_power_of_two() {
        let geometry = CacheGeometry::default();
        let block = geometry.raster_block(2, 8);
        assert!(block.is_power_of_two());
        assert!(2 * block * block * 2 * 8 <= geometry.l1d_size);
    }

    #[test]
    fn test_parse_cache_size() {
        assert_eq!(parse_cache_size("32K"), Some(32768));
        assert_eq!(parse_cache_size("1M"), Some(1 << 20));
        assert_eq!(parse_cache_size("4096"), Some(4096));
        assert_eq!(parse_cache_size("n/a"), None);
    }

    #[test]
    fn test_cpy2d_transposing_round_trip() {
        let src: Vec<u32> = (0..12).collect();
        let mut staged = vec![0u32; 12];
        // 3 rows of 4, read column-major into staged
        cpy2d_ci(&src, &mut staged, 4, 1, 3, 3, 4, 1, 1);
        assert_eq!(staged, vec![0, 4, 8, 1, 5, 9, 2, 6, 10, 3, 7, 11]);
        let mut back = vec![0u32; 12];
        cpy2d_co(&staged, &mut back, 4, 3, 1, 3, 1, 4, 1);
        assert_eq!(back, src);
    }
}
