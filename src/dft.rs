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
use crate::strategy::{FftStrategy, StrategyDescriptor};
use crate::traits::FftSample;
use crate::trig::{AwakeMode, TwiddleTable};
use crate::util::c_mul_add_fast;
use crate::{FftDirection, FftError};
use num_complex::Complex;

/// Direct O(n^2) transform; the fallback every length admits.
pub(crate) struct Dft<T> {
    execution_length: usize,
    twiddles: Option<TwiddleTable<T>>,
    direction: FftDirection,
}

impl<T: FftSample> Dft<T> {
    pub fn new(size: usize, fft_direction: FftDirection) -> Dft<T> {
        Dft {
            execution_length: size,
            twiddles: None,
            direction: fft_direction,
        }
    }
}

impl<T: FftSample> FftStrategy<T> for Dft<T> {
    fn descriptor(&self) -> StrategyDescriptor {
        StrategyDescriptor::Dft {
            n: self.execution_length,
        }
    }

    fn length(&self) -> usize {
        self.execution_length
    }

    fn awake(&mut self, mode: AwakeMode) -> Result<(), FftError> {
        if self.twiddles.is_none() {
            self.twiddles = Some(TwiddleTable::generate(
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

        let mut output = try_vec![Complex::<T>::default(); self.execution_length];

        for chunk in in_place.chunks_exact_mut(self.execution_length) {
            for (k, dst) in output.iter_mut().enumerate() {
                let mut sum = Complex::<T>::default();
                let mut twiddle_idx = 0usize;
                for src in chunk.iter() {
                    sum = c_mul_add_fast(*src, twiddles.at(twiddle_idx), sum);
                    twiddle_idx += k;
                    if twiddle_idx >= twiddles.len() {
                        twiddle_idx -= twiddles.len();
                    }
                }
                *dst = sum;
            }

            chunk.copy_from_slice(&output);
        }
        Ok(())
    }
}
