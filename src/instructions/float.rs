// This file is part of FLOAT-CIRCUITS.
// SPDX-License-Identifier: Apache-2.0
// Licensed under the Apache License, Version 2.0 (the "License");
// You may not use this file except in compliance with the License.
// You may obtain a copy of the License at
// http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Floating-point instructions interface.
//!
//! It provides functions for operating on assigned floating-point numbers,
//! represented as an (exponent, mantissa) pair of native values.
//!
//! A pair `(e, m)` is *well-formed* with respect to parameters `(k, p)` if
//! either `e = 0` and `m = 0` (the representation of zero), or `e < 2^k` and
//! `2^p <= m < 2^(p+1)` (a normalized mantissa of `p + 1` bits). A
//! well-formed pair represents the number `m * 2^(e - p)`.

use ff::PrimeField;
use halo2_proofs::{circuit::Layouter, plonk::Error};

use crate::{
    float::FloatParams,
    instructions::{AssertionInstructions, AssignmentInstructions, ControlFlowInstructions},
    types::AssignedFloat,
};

/// The set of circuit instructions for floating-point operations.
pub trait FloatInstructions<F>:
    AssignmentInstructions<F, AssignedFloat<F>>
    + AssertionInstructions<F, AssignedFloat<F>>
    + ControlFlowInstructions<F, AssignedFloat<F>>
where
    F: PrimeField,
{
    /// The floating-point parameters `(k, p)` this instruction set operates
    /// with.
    fn float_params(&self) -> FloatParams;

    /// Enforces that the given (exponent, mantissa) pair is well-formed.
    ///
    /// Note that [assign](AssignmentInstructions::assign) already enforces
    /// well-formedness, so this is only needed for pairs built through other
    /// means.
    fn assert_well_formed(
        &self,
        layouter: &mut impl Layouter<F>,
        x: &AssignedFloat<F>,
    ) -> Result<(), Error>;

    /// Floating-point addition with round-to-nearest (ties away from zero).
    ///
    /// The result is well-formed whenever both inputs are.
    fn add(
        &self,
        layouter: &mut impl Layouter<F>,
        x: &AssignedFloat<F>,
        y: &AssignedFloat<F>,
    ) -> Result<AssignedFloat<F>, Error>;
}
