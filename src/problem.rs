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
use crate::{FftDirection, FftError};
use num_complex::Complex;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

#[derive(Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum ProblemKind {
    /// Complex to complex.
    Dft,
    /// Real to real, or real to halfcomplex.
    Rdft,
}

/// One dimension of a transform: extent plus input and output strides,
/// measured in complex elements.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct IoDim {
    pub n: usize,
    pub is: usize,
    pub os: usize,
}

impl IoDim {
    pub fn new(n: usize, is: usize, os: usize) -> IoDim {
        IoDim { n, is, os }
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Hash, Default)]
pub struct Tensor {
    dims: Vec<IoDim>,
}

impl Tensor {
    pub fn new(dims: Vec<IoDim>) -> Tensor {
        Tensor { dims }
    }

    pub fn rank0() -> Tensor {
        Tensor { dims: Vec::new() }
    }

    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    pub fn dims(&self) -> &[IoDim] {
        &self.dims
    }

    /// Number of points spanned, one for rank zero.
    pub fn total(&self) -> usize {
        self.dims.iter().map(|d| d.n).product()
    }
}

/// Addresses of the real and imaginary parts of a buffer.
///
/// Kept as plain numbers: the planner compares and rebinds them but never
/// dereferences them.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct SplitBinding {
    pub re: usize,
    pub im: usize,
}

impl SplitBinding {
    pub fn interleaved<T>(buffer: &[Complex<T>]) -> SplitBinding {
        let re = buffer.as_ptr() as usize;
        SplitBinding {
            re,
            im: re + size_of::<T>(),
        }
    }
}

/// Immutable description of a requested transform.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Problem {
    kind: ProblemKind,
    sz: Tensor,
    vecsz: Tensor,
    pub(crate) input: SplitBinding,
    pub(crate) output: SplitBinding,
}

impl Problem {
    pub fn new(kind: ProblemKind, sz: Tensor, vecsz: Tensor) -> Result<Problem, FftError> {
        if sz.dims().iter().chain(vecsz.dims()).any(|d| d.n == 0) {
            return Err(FftError::ZeroSizedFft);
        }
        Ok(Problem {
            kind,
            sz,
            vecsz,
            input: SplitBinding::default(),
            output: SplitBinding::default(),
        })
    }

    /// Contiguous in-place complex transform of length `n`.
    pub fn dft_1d(n: usize) -> Result<Problem, FftError> {
        Problem::new(
            ProblemKind::Dft,
            Tensor::new(vec![IoDim::new(n, 1, 1)]),
            Tensor::rank0(),
        )
    }

    /// `howmany` contiguous transforms of length `n`, laid back to back.
    pub fn dft_batched(n: usize, howmany: usize) -> Result<Problem, FftError> {
        Problem::new(
            ProblemKind::Dft,
            Tensor::new(vec![IoDim::new(n, 1, 1)]),
            Tensor::new(vec![IoDim::new(howmany, n, n)]),
        )
    }

    pub fn with_buffers(mut self, input: SplitBinding, output: SplitBinding) -> Problem {
        self.input = input;
        self.output = output;
        self
    }

    pub fn kind(&self) -> ProblemKind {
        self.kind
    }

    pub fn sz(&self) -> &Tensor {
        &self.sz
    }

    pub fn vecsz(&self) -> &Tensor {
        &self.vecsz
    }

    pub fn input(&self) -> SplitBinding {
        self.input
    }

    pub fn output(&self) -> SplitBinding {
        self.output
    }

    pub fn is_in_place(&self) -> bool {
        self.input.re == self.output.re
    }

    pub fn transform_size(&self) -> usize {
        self.sz.total()
    }

    pub fn total_size(&self) -> usize {
        self.sz.total() * self.vecsz.total()
    }

    /// `(n, howmany)` when the problem is a batch of unit-stride complex
    /// transforms stored back to back.
    pub fn contiguous_rank1(&self) -> Option<(usize, usize)> {
        if self.kind != ProblemKind::Dft || self.sz.rank() != 1 {
            return None;
        }
        let d = self.sz.dims()[0];
        if d.is != 1 || d.os != 1 {
            return None;
        }
        match self.vecsz.dims() {
            [] => Some((d.n, 1)),
            [v] if v.n == 1 || (v.is == d.n && v.os == d.n) => Some((d.n, v.n)),
            _ => None,
        }
    }

    /// Key identifying the problem shape in wisdom. Buffer addresses are
    /// left out, so wisdom carries over between buffers.
    pub fn signature(&self, direction: FftDirection) -> String {
        let mut key = String::new();
        let kind = match self.kind {
            ProblemKind::Dft => "dft",
            ProblemKind::Rdft => "rdft",
        };
        _ = write!(key, "{kind}:{}:", direction.sign());
        for (name, tensor) in [("sz", &self.sz), ("vec", &self.vecsz)] {
            _ = write!(key, "{name}");
            for d in tensor.dims() {
                _ = write!(key, "[{},{},{}]", d.n, d.is, d.os);
            }
            _ = write!(key, ";");
        }
        if self.is_in_place() {
            key.push_str("inplace");
        }
        key
    }
}
