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
use crate::strategy::{FftStrategy, StrategyDescriptor};
use crate::traits::FftSample;
use crate::trig::{AwakeMode, TwiddleTable};
use crate::util::{bit_reverse_indices, c_mul_fast, permute_inplace};
use crate::{FftDirection, FftError};
use num_complex::Complex;

pub(crate) struct Radix2<T> {
    twiddles: Option<Vec<Complex<T>>>,
    permutations: Vec<usize>,
    execution_length: usize,
    direction: FftDirection,
}

impl<T: FftSample> Radix2<T> {
    pub fn new(size: usize, fft_direction: FftDirection) -> Result<Radix2<T>, FftError> {
        assert!(size.is_power_of_two(), "Input length must be a power of 2");

        Ok(Radix2 {
            permutations: bit_reverse_indices(size)?,
            execution_length: size,
            twiddles: None,
            direction: fft_direction,
        })
    }
}

/// Per-stage twiddles, stage of length `len` taking `len / 2` entries.
fn radix2_stage_twiddles<T: FftSample>(
    size: usize,
    fft_direction: FftDirection,
    mode: AwakeMode,
) -> Result<Vec<Complex<T>>, FftError> {
    let table = TwiddleTable::<T>::generate(size, fft_direction, mode)?;
    let mut twiddles = Vec::new();
    twiddles
        .try_reserve_exact(size.saturating_sub(1))
        .map_err(|_| FftError::OutOfMemory(size.saturating_sub(1)))?;

    let mut len = 2;
    while len <= size {
        let half = len / 2;
        let step = size / len;
        for j in 0..half {
            twiddles.push(table.at(j * step));
        }
        len *= 2;
    }
    Ok(twiddles)
}

impl<T: FftSample> FftStrategy<T> for Radix2<T> {
    fn descriptor(&self) -> StrategyDescriptor {
        StrategyDescriptor::Radix2 {
            n: self.execution_length,
        }
    }

    fn length(&self) -> usize {
        self.execution_length
    }

    fn awake(&mut self, mode: AwakeMode) -> Result<(), FftError> {
        if self.twiddles.is_none() {
            self.twiddles = Some(radix2_stage_twiddles(
                self.execution_length,
                self.direction,
                mode,
            )?);
        }
        Ok(())
    }

    fn sleep(&mut self) {
        self.twiddles = None;
    }

    fn execute(&self, in_place: &mut [Complex<T>]) -> Result<(), FftError> {
        if !in_place.len().is_multiple_of(self.execution_length) {
            return Err(FftError::InvalidSizeMultiplier(
                in_place.len(),
                self.execution_length,
            ));
        }
        let Some(twiddles) = self.twiddles.as_ref() else {
            return Err(FftError::PlanIsAsleep);
        };

        for chunk in in_place.chunks_exact_mut(self.execution_length) {
            permute_inplace(chunk, &self.permutations);

            let mut len = 2;
            let mut m_twiddles = twiddles.as_slice();
            unsafe {
                while len <= self.execution_length {
                    let half = len / 2;
                    for data in chunk.chunks_exact_mut(len) {
                        for j in 0..half {
                            let u = *data.get_unchecked(j);
                            let tw = *m_twiddles.get_unchecked(j);
                            let t = c_mul_fast(tw, *data.get_unchecked(j + half));
                            *data.get_unchecked_mut(j) = u + t;
                            *data.get_unchecked_mut(j + half) = u - t;
                        }
                    }

                    len *= 2;
                    m_twiddles = &m_twiddles[half..];
                }
            }
        }
        Ok(())
    }
}
