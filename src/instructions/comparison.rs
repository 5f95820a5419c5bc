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

//! Range-check and comparison instructions interface.
//!
//! It provides functions to compare assigned values with other assigned
//! values or fixed elements.
//!
//! Comparisons are defined by comparing the *integer representation* of field
//! elements and assumes we only compare "small" integers, i.e. all elements
//! are bounded. The maximum allowed bound is implementation specific and
//! should be at most 2^{F::NUM_BITS/2 - 1} to avoid breaking "natural"
//! properties of comparison.

use std::{fmt::Debug, ops::Add};

use ff::PrimeField;
use halo2_proofs::{circuit::Layouter, plonk::Error};

use crate::{
    field::AssignedBounded,
    instructions::BinaryInstructions,
    types::{AssignedBit, InnerValue},
};

/// The set of circuit instructions for comparison operations.
pub trait ComparisonInstructions<F, Assigned>: Clone + Debug + BinaryInstructions<F>
where
    F: PrimeField,
    Assigned: InnerValue,
    Assigned::Element: From<u64> + Add<Output = Assigned::Element>,
{
    /// All numbers involved in comparisons should be in the range [0,
    /// 2^{MAX_BOUND_IN_BITS}) and no comparison should be allowed for some
    /// bound > MAX_BOUND_IN_BITS.
    const MAX_BOUND_IN_BITS: u32;

    /// Converts an assigned element into an assigned bounded element.
    /// The circuit becomes unsatisfiable if the element value is not in [0,
    /// 2^n).
    fn bounded_of_element(
        &self,
        layouter: &mut impl Layouter<F>,
        n: usize,
        x: &Assigned,
    ) -> Result<AssignedBounded<F>, Error>;

    /// Converts an assigned bounded element into an assigned element with the
    /// same value.
    fn element_of_bounded(
        &self,
        layouter: &mut impl Layouter<F>,
        bounded: &AssignedBounded<F>,
    ) -> Result<Assigned, Error>;

    /// Returns `true` iff the given assigned element is strictly lower than
    /// the given bound.
    fn lower_than_fixed(
        &self,
        layouter: &mut impl Layouter<F>,
        x: &AssignedBounded<F>,
        bound: Assigned::Element,
    ) -> Result<AssignedBit<F>, Error>;

    /// Returns `true` iff the given assigned element is strictly greater than
    /// the given bound.
    fn greater_than_fixed(
        &self,
        layouter: &mut impl Layouter<F>,
        x: &AssignedBounded<F>,
        bound: Assigned::Element,
    ) -> Result<AssignedBit<F>, Error> {
        let b = self.leq_fixed(layouter, x, bound)?;
        self.not(layouter, &b)
    }

    /// Returns `true` iff the given assigned element is lower than or equal to
    /// the given bound.
    fn leq_fixed(
        &self,
        layouter: &mut impl Layouter<F>,
        x: &AssignedBounded<F>,
        bound: Assigned::Element,
    ) -> Result<AssignedBit<F>, Error> {
        self.lower_than_fixed(layouter, x, bound + Assigned::Element::from(1))
    }

    /// Returns `true` iff the given assigned element is greater than or equal
    /// to the given bound.
    fn geq_fixed(
        &self,
        layouter: &mut impl Layouter<F>,
        x: &AssignedBounded<F>,
        bound: Assigned::Element,
    ) -> Result<AssignedBit<F>, Error> {
        let b = self.lower_than_fixed(layouter, x, bound)?;
        self.not(layouter, &b)
    }

    /// Returns `true` iff `x < y`.
    fn lower_than(
        &self,
        layouter: &mut impl Layouter<F>,
        x: &AssignedBounded<F>,
        y: &AssignedBounded<F>,
    ) -> Result<AssignedBit<F>, Error>;

    /// Returns `true` iff `x > y`.
    fn greater_than(
        &self,
        layouter: &mut impl Layouter<F>,
        x: &AssignedBounded<F>,
        y: &AssignedBounded<F>,
    ) -> Result<AssignedBit<F>, Error> {
        let b = self.leq(layouter, x, y)?;
        self.not(layouter, &b)
    }

    /// Returns `true` iff `x <= y`.
    fn leq(
        &self,
        layouter: &mut impl Layouter<F>,
        x: &AssignedBounded<F>,
        y: &AssignedBounded<F>,
    ) -> Result<AssignedBit<F>, Error>;

    /// Returns `true` iff `x >= y`.
    fn geq(
        &self,
        layouter: &mut impl Layouter<F>,
        x: &AssignedBounded<F>,
        y: &AssignedBounded<F>,
    ) -> Result<AssignedBit<F>, Error> {
        let b = self.lower_than(layouter, x, y)?;
        self.not(layouter, &b)
    }

    /// Returns `true` iff the value of `x` is in the range `[0, 2^n)`.
    ///
    /// Unlike [bounded_of_element](Self::bounded_of_element), this function
    /// never makes the circuit unsatisfiable. The returned bit witnesses
    /// whether the range check holds.
    fn is_lower_than_pow2(
        &self,
        layouter: &mut impl Layouter<F>,
        x: &Assigned,
        n: usize,
    ) -> Result<AssignedBit<F>, Error>;
}
