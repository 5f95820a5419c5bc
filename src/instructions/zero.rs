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

//! Zero instructions interface.
//!
//! It provides an interface for comparing assigned values with zero.
//!
//! Implementors of this trait need to implement [AssertionInstructions]
//! and [EqualityInstructions]. The trait is parametrized by `assigned`
//! values that implement `InnerConstants`, which gives access to zero.

use ff::PrimeField;
use halo2_proofs::{circuit::Layouter, plonk::Error};

use crate::{
    instructions::{AssertionInstructions, EqualityInstructions},
    types::{AssignedBit, InnerConstants},
};

/// The set of circuit instructions for zero equality and assertions.
pub trait ZeroInstructions<F, Assigned>:
    AssertionInstructions<F, Assigned> + EqualityInstructions<F, Assigned>
where
    F: PrimeField,
    Assigned: InnerConstants,
{
    /// Enforces that the given assigned element is zero.
    fn assert_zero(&self, layouter: &mut impl Layouter<F>, x: &Assigned) -> Result<(), Error> {
        self.assert_equal_to_fixed(layouter, x, Assigned::inner_zero())
    }

    /// Asserts that the given element is non-zero.
    fn assert_non_zero(&self, layouter: &mut impl Layouter<F>, x: &Assigned) -> Result<(), Error> {
        self.assert_not_equal_to_fixed(layouter, x, Assigned::inner_zero())
    }

    /// Returns `1` iff the given element equals zero (the additive identity).
    fn is_zero(
        &self,
        layouter: &mut impl Layouter<F>,
        x: &Assigned,
    ) -> Result<AssignedBit<F>, Error> {
        self.is_equal_to_fixed(layouter, x, Assigned::inner_zero())
    }
}
