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
use crate::err::try_vec;
use crate::traits::{FftSample, FftTrigonometry};
use crate::util::isqrt;
use crate::{FftDirection, FftError};
use num_complex::Complex;

/// How an awakened plan materializes its trigonometric tables.
#[derive(Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash)]
pub enum AwakeMode {
    /// Two tables of about `sqrt(n)` factors combined in `f64`.
    SqrtNTable,
    /// Every factor computed directly.
    SinCos,
}

impl AwakeMode {
    /// `SqrtNTable` when `f64` has enough extra bits over `T` to absorb the
    /// rounding of the combining product, `SinCos` otherwise.
    pub fn for_precision<T>() -> AwakeMode {
        if size_of::<f64>() > size_of::<T>() {
            AwakeMode::SqrtNTable
        } else {
            AwakeMode::SinCos
        }
    }
}

#[inline]
fn unit_root(index: usize, fft_len: usize, direction: FftDirection) -> Complex<f64> {
    let angle = -2. * index as f64 / fft_len as f64;
    let (v_sin, v_cos) = angle.sincos_pi();
    let result = Complex {
        re: v_cos,
        im: v_sin,
    };
    match direction {
        FftDirection::Forward => result,
        FftDirection::Inverse => result.conj(),
    }
}

#[inline]
fn narrow<T: FftSample>(value: Complex<f64>) -> Complex<T> {
    Complex {
        re: T::from_trig(value.re),
        im: T::from_trig(value.im),
    }
}

pub(crate) fn compute_twiddle<T: FftSample>(
    index: usize,
    fft_len: usize,
    direction: FftDirection,
) -> Complex<T> {
    narrow(unit_root(index, fft_len, direction))
}

/// All `n` powers of the primitive `n`-th root of unity for one direction.
pub(crate) struct TwiddleTable<T> {
    table: Vec<Complex<T>>,
}

impl<T: FftSample> TwiddleTable<T> {
    pub(crate) fn generate(
        n: usize,
        direction: FftDirection,
        mode: AwakeMode,
    ) -> Result<TwiddleTable<T>, FftError> {
        let mut table = try_vec![Complex::<T>::default(); n];
        match mode {
            AwakeMode::SinCos => {
                for (k, dst) in table.iter_mut().enumerate() {
                    *dst = compute_twiddle(k, n, direction);
                }
            }
            AwakeMode::SqrtNTable => {
                let chunk = isqrt(n).max(1);
                let coarse_len = n.div_ceil(chunk);
                let mut fine = try_vec![Complex::<f64>::default(); chunk];
                for (j, dst) in fine.iter_mut().enumerate() {
                    *dst = unit_root(j, n, direction);
                }
                let mut coarse = try_vec![Complex::<f64>::default(); coarse_len];
                for (i, dst) in coarse.iter_mut().enumerate() {
                    *dst = unit_root(i * chunk, n, direction);
                }
                for (k, dst) in table.iter_mut().enumerate() {
                    *dst = narrow(fine[k % chunk] * coarse[k / chunk]);
                }
            }
        }
        Ok(TwiddleTable { table })
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.table.len()
    }

    /// `w^index`, index taken modulo the table length.
    #[inline]
    pub(crate) fn at(&self, index: usize) -> Complex<T> {
        unsafe { *self.table.get_unchecked(index % self.table.len()) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_awake_mode_for_precision() {
        assert_eq!(AwakeMode::for_precision::<f32>(), AwakeMode::SqrtNTable);
        assert_eq!(AwakeMode::for_precision::<f64>(), AwakeMode::SinCos);
    }

    #[test]
    fn test_sqrtn_table_matches_sincos() {
        for n in [1usize, 2, 7, 64, 100, 1023] {
            let direct = TwiddleTable::<f64>::generate(n, FftDirection::Forward, AwakeMode::SinCos)
                .unwrap();
            let combined =
                TwiddleTable::<f64>::generate(n, FftDirection::Forward, AwakeMode::SqrtNTable)
                    .unwrap();
            assert_eq!(direct.len(), n);
            for k in 0..n {
                let a = direct.at(k);
                let b = combined.at(k);
                assert!((a.re - b.re).abs() < 1e-12, "re mismatch at {k} of {n}");
                assert!((a.im - b.im).abs() < 1e-12, "im mismatch at {k} of {n}");
            }
        }
    }

    #[test]
    fn test_quarter_turns_are_exact() {
        let table = TwiddleTable::<f32>::generate(4, FftDirection::Forward, AwakeMode::SinCos)
            .unwrap();
        assert_eq!(table.at(1), Complex::new(0f32, -1f32));
        assert_eq!(table.at(2), Complex::new(-1f32, 0f32));
        let inverse = TwiddleTable::<f32>::generate(4, FftDirection::Inverse, AwakeMode::SinCos)
            .unwrap();
        assert_eq!(inverse.at(1), Complex::new(0f32, 1f32));
        assert_eq!(inverse.at(5), inverse.at(1));
    }
}
