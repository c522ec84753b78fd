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
use crate::strategy::{FftStrategy, InnerKernel, StrategyDescriptor};
use crate::tile::CacheGeometry;
use crate::traits::FftSample;
use crate::transpose::TransposeMethod;
use crate::trig::{AwakeMode, TwiddleTable};
use crate::util::{as_scalars_mut, c_mul_fast};
use crate::{FftDirection, FftError};
use num_complex::Complex;

/// Square decomposition of `n = m * m`.
///
/// Columns are brought into rows with an in-place transposition, so both
/// passes of `m`-point transforms run on contiguous rows:
/// transpose, rows, twiddle, transpose, rows, transpose.
pub(crate) struct FourStep<T> {
    inner: Box<dyn FftStrategy<T>>,
    transpose: TransposeMethod,
    geometry: CacheGeometry,
    twiddles: Option<TwiddleTable<T>>,
    execution_length: usize,
    direction: FftDirection,
}

impl<T: FftSample> FourStep<T> {
    pub fn new(
        inner: Box<dyn FftStrategy<T>>,
        transpose: TransposeMethod,
        direction: FftDirection,
        geometry: CacheGeometry,
    ) -> FourStep<T> {
        let m = inner.length();
        FourStep {
            inner,
            transpose,
            geometry,
            twiddles: None,
            execution_length: m * m,
            direction,
        }
    }

    /// Transposes the `m x m` matrix of pairs `(re, im)` in place.
    #[inline]
    fn transpose_square(&self, chunk: &mut [Complex<T>]) -> Result<(), FftError> {
        let m = self.inner.length();
        self.transpose
            .apply(as_scalars_mut(chunk), m, 2 * m, 2, 2, &self.geometry)
    }
}

impl<T: FftSample> FftStrategy<T> for FourStep<T> {
    fn descriptor(&self) -> StrategyDescriptor {
        let inner = match self.inner.descriptor() {
            StrategyDescriptor::Radix2 { .. } => InnerKernel::Radix2,
            _ => InnerKernel::Dft,
        };
        StrategyDescriptor::FourStep {
            n: self.execution_length,
            inner,
            transpose: self.transpose,
        }
    }

    fn length(&self) -> usize {
        self.execution_length
    }

    fn awake(&mut self, mode: AwakeMode) -> Result<(), FftError> {
        self.inner.awake(mode)?;
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
        self.inner.sleep();
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
        let m = self.inner.length();

        for chunk in in_place.chunks_exact_mut(self.execution_length) {
            self.transpose_square(chunk)?;
            self.inner.execute(chunk)?;
            for (n2, row) in chunk.chunks_exact_mut(m).enumerate() {
                for (k1, dst) in row.iter_mut().enumerate() {
                    *dst = c_mul_fast(*dst, twiddles.at(n2 * k1));
                }
            }
            self.transpose_square(chunk)?;
            self.inner.execute(chunk)?;
            self.transpose_square(chunk)?;
        }
        Ok(())
    }
}
