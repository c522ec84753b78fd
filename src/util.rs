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
use crate::FftError;
use num_complex::Complex;
use num_integer::Roots;
use num_traits::Float;

/// Views interleaved complex samples as their real and imaginary scalars.
#[inline]
pub(crate) fn as_scalars_mut<T>(data: &mut [Complex<T>]) -> &mut [T] {
    let len = data.len() * 2;
    // Complex<T> is repr(C) with exactly two fields of T.
    unsafe { std::slice::from_raw_parts_mut(data.as_mut_ptr().cast::<T>(), len) }
}

/// `a * b + acc` with fused multiply-adds on both components.
#[inline(always)]
pub(crate) fn c_mul_add_fast<T: Float>(a: Complex<T>, b: Complex<T>, acc: Complex<T>) -> Complex<T> {
    Complex {
        re: a.re.mul_add(b.re, (-a.im).mul_add(b.im, acc.re)),
        im: a.re.mul_add(b.im, a.im.mul_add(b.re, acc.im)),
    }
}

#[inline(always)]
pub(crate) fn c_mul_fast<T: Float>(a: Complex<T>, b: Complex<T>) -> Complex<T> {
    Complex {
        re: a.re.mul_add(b.re, -(a.im * b.im)),
        im: a.re.mul_add(b.im, a.im * b.re),
    }
}

/// Bit-reversal permutation table for a power-of-two `n`.
pub(crate) fn bit_reverse_indices(n: usize) -> Result<Vec<usize>, FftError> {
    let mut indices = Vec::new();
    indices
        .try_reserve_exact(n)
        .map_err(|_| FftError::OutOfMemory(n))?;
    if n <= 1 {
        indices.extend(0..n);
        return Ok(indices);
    }
    let bits = n.trailing_zeros();
    indices.extend((0..n).map(|i| i.reverse_bits() >> (usize::BITS - bits)));
    Ok(indices)
}

pub(crate) fn permute_inplace<T: Copy>(table: &mut [T], lut: &[usize]) {
    for (i, &j) in lut.iter().enumerate() {
        if i < j {
            table.swap(i, j);
        }
    }
}

/// Returns `m` when `n == m * m` and `m > 1`.
pub(crate) fn square_root_of(n: usize) -> Option<usize> {
    let m = n.sqrt();
    if m > 1 && m * m == n { Some(m) } else { None }
}

/// Integer square root, rounding down.
#[inline]
pub(crate) fn isqrt(n: usize) -> usize {
    n.sqrt()
}

/// Misalignment of `ptr` relative to the SIMD-friendly boundary of two scalars.
///
/// Two buffers with the same result share an alignment class, so a plan made
/// for one can execute on the other.
pub fn alignment_of<T>(ptr: *const T) -> usize {
    alignment_of_address::<T>(ptr as usize)
}

#[inline]
pub(crate) fn alignment_of_address<T>(address: usize) -> usize {
    address % (2 * size_of::<T>()).max(1)
}
