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
use crate::dft::Dft;
use crate::four_step::FourStep;
use crate::radix2::Radix2;
use crate::tile::CacheGeometry;
use crate::traits::FftSample;
use crate::transpose::TransposeMethod;
use crate::trig::AwakeMode;
use crate::util::square_root_of;
use crate::{FftDirection, FftError};
use num_complex::Complex;
use serde::{Deserialize, Serialize};

/// Compiled execution strategy for one transform length.
///
/// Trigonometric tables exist only between [`awake`](FftStrategy::awake) and
/// [`sleep`](FftStrategy::sleep).
pub trait FftStrategy<T>: Send + Sync {
    fn descriptor(&self) -> StrategyDescriptor;
    fn length(&self) -> usize;
    fn awake(&mut self, mode: AwakeMode) -> Result<(), FftError>;
    fn sleep(&mut self);
    /// Transforms every `length()` sized chunk of `data` in place.
    fn execute(&self, data: &mut [Complex<T>]) -> Result<(), FftError>;
}

#[derive(Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum InnerKernel {
    Dft,
    Radix2,
}

/// Serializable recipe of a strategy; what wisdom remembers.
#[derive(Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum StrategyDescriptor {
    Dft {
        n: usize,
    },
    Radix2 {
        n: usize,
    },
    /// Square decomposition `n = m * m` with three in-place transpositions.
    FourStep {
        n: usize,
        inner: InnerKernel,
        transpose: TransposeMethod,
    },
}

impl StrategyDescriptor {
    pub fn length(&self) -> usize {
        match *self {
            StrategyDescriptor::Dft { n }
            | StrategyDescriptor::Radix2 { n }
            | StrategyDescriptor::FourStep { n, .. } => n,
        }
    }

    /// Whether the recipe can be instantiated at all.
    pub fn is_consistent(&self) -> bool {
        match *self {
            StrategyDescriptor::Dft { n } => n > 0,
            StrategyDescriptor::Radix2 { n } => n.is_power_of_two(),
            StrategyDescriptor::FourStep { n, inner, .. } => match square_root_of(n) {
                Some(m) => inner != InnerKernel::Radix2 || m.is_power_of_two(),
                None => false,
            },
        }
    }

    pub fn name(&self) -> String {
        match *self {
            StrategyDescriptor::Dft { n } => format!("dft-{n}"),
            StrategyDescriptor::Radix2 { n } => format!("radix2-{n}"),
            StrategyDescriptor::FourStep {
                n,
                inner,
                transpose,
            } => format!("four-step-{n}-{inner:?}-{transpose:?}").to_lowercase(),
        }
    }

    /// Rough count of complex multiply-adds per transform.
    pub fn op_count(&self) -> f64 {
        match *self {
            StrategyDescriptor::Dft { n } => (n * n) as f64,
            StrategyDescriptor::Radix2 { n } => {
                (n / 2) as f64 * n.trailing_zeros() as f64 + n as f64
            }
            StrategyDescriptor::FourStep {
                n,
                inner,
                transpose,
            } => {
                let m = square_root_of(n).unwrap_or(n);
                let inner_ops = match inner {
                    InnerKernel::Dft => StrategyDescriptor::Dft { n: m },
                    InnerKernel::Radix2 => StrategyDescriptor::Radix2 { n: m },
                }
                .op_count();
                let transpose_weight = match transpose {
                    TransposeMethod::Naive => 1.0,
                    TransposeMethod::Tiled => 0.75,
                    TransposeMethod::TiledBuf => 0.9,
                };
                2. * m as f64 * inner_ops + n as f64 + 3. * n as f64 * transpose_weight
            }
        }
    }

    /// Builds a dormant strategy, or `None` when the recipe does not fit.
    pub(crate) fn instantiate<T: FftSample>(
        &self,
        direction: FftDirection,
        geometry: &CacheGeometry,
    ) -> Option<Box<dyn FftStrategy<T>>> {
        if !self.is_consistent() {
            return None;
        }
        match *self {
            StrategyDescriptor::Dft { n } => {
                Some(Box::new(Dft::<T>::new(n, direction)) as Box<dyn FftStrategy<T>>)
            }
            StrategyDescriptor::Radix2 { n } => Radix2::<T>::new(n, direction)
                .ok()
                .map(|x| Box::new(x) as Box<dyn FftStrategy<T>>),
            StrategyDescriptor::FourStep {
                n,
                inner,
                transpose,
            } => {
                let m = square_root_of(n)?;
                let inner: Box<dyn FftStrategy<T>> = match inner {
                    InnerKernel::Dft => Box::new(Dft::<T>::new(m, direction)),
                    InnerKernel::Radix2 => Box::new(Radix2::<T>::new(m, direction).ok()?),
                };
                Some(Box::new(FourStep::new(inner, transpose, direction, *geometry))
                    as Box<dyn FftStrategy<T>>)
            }
        }
    }

    /// Every recipe applicable to length `n`, restricted by the search effort.
    pub(crate) fn enumerate(
        n: usize,
        quadratic_limit: usize,
        transposes: &[TransposeMethod],
    ) -> Vec<StrategyDescriptor> {
        let mut candidates = Vec::new();
        if n.is_power_of_two() {
            candidates.push(StrategyDescriptor::Radix2 { n });
        }
        if let Some(m) = square_root_of(n) {
            let inner = if m.is_power_of_two() {
                InnerKernel::Radix2
            } else {
                InnerKernel::Dft
            };
            for &transpose in transposes {
                candidates.push(StrategyDescriptor::FourStep {
                    n,
                    inner,
                    transpose,
                });
            }
        }
        if candidates.is_empty() || n <= quadratic_limit {
            candidates.push(StrategyDescriptor::Dft { n });
        }
        candidates
    }
}
