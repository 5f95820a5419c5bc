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

//! Arithmetic instructions interface.
//!
//! It provides functions for performing arithmetic operations between assigned
//! values in the circuit.
//!
//! This trait is parametrized by a generic `Assigned` (required to implement
//! [InnerValue]) which defines the type over which the arithmetic operations
//! take place.

use std::{
    fmt::Debug,
    ops::{Add, Neg},
};

use ff::PrimeField;
use halo2_proofs::{circuit::Layouter, plonk::Error};

use crate::{
    instructions::{AssertionInstructions, AssignmentInstructions},
    types::InnerValue,
};

/// The set of circuit instructions for arithmetic operations.
pub trait ArithInstructions<F, Assigned>:
    Clone + Debug + AssignmentInstructions<F, Assigned> + AssertionInstructions<F, Assigned>
where
    F: PrimeField,
    Assigned::Element:
        PartialEq + From<u64> + Add<Output = Assigned::Element> + Neg<Output = Assigned::Element>,
    Assigned: InnerValue,
{
    /// Addition of many elements, given a slice of terms of the form
    /// `(coeff_i, x_i)` and a constant `k`, returns
    /// `k + (sum_i coeff_i * x_i)`.
    ///
    /// This function is potentially more efficient than folding over
    /// [add](ArithInstructions::add) and
    /// [mul_by_constant](ArithInstructions::mul_by_constant).
    fn linear_combination(
        &self,
        layouter: &mut impl Layouter<F>,
        terms: &[(Assigned::Element, Assigned)],
        constant: Assigned::Element,
    ) -> Result<Assigned, Error>;

    /// Addition.
    fn add(
        &self,
        layouter: &mut impl Layouter<F>,
        x: &Assigned,
        y: &Assigned,
    ) -> Result<Assigned, Error> {
        self.linear_combination(
            layouter,
            &[
                (Assigned::Element::from(1), x.clone()),
                (Assigned::Element::from(1), y.clone()),
            ],
            Assigned::Element::from(0),
        )
    }

    /// Subtraction.
    fn sub(
        &self,
        layouter: &mut impl Layouter<F>,
        x: &Assigned,
        y: &Assigned,
    ) -> Result<Assigned, Error> {
        self.linear_combination(
            layouter,
            &[
                (Assigned::Element::from(1), x.clone()),
                (-Assigned::Element::from(1), y.clone()),
            ],
            Assigned::Element::from(0),
        )
    }

    /// Multiplication, possibly with an additional multiplying constant.
    fn mul(
        &self,
        layouter: &mut impl Layouter<F>,
        x: &Assigned,
        y: &Assigned,
        multiplying_constant: Option<Assigned::Element>,
    ) -> Result<Assigned, Error>;

    /// Negation (additive inverse).
    fn neg(&self, layouter: &mut impl Layouter<F>, x: &Assigned) -> Result<Assigned, Error> {
        self.linear_combination(
            layouter,
            &[(-Assigned::Element::from(1), x.clone())],
            Assigned::Element::from(0),
        )
    }

    /// Addition of a constant to an assigned value.
    fn add_constant(
        &self,
        layouter: &mut impl Layouter<F>,
        x: &Assigned,
        constant: Assigned::Element,
    ) -> Result<Assigned, Error> {
        if constant == Assigned::Element::from(0) {
            return Ok(x.clone());
        }
        self.linear_combination(
            layouter,
            &[(Assigned::Element::from(1), x.clone())],
            constant,
        )
    }

    /// Multiplication by a constant.
    /// This function is potentially more efficient than composing
    /// [assign_fixed](AssignmentInstructions::assign_fixed) and
    /// [mul](ArithInstructions::mul).
    fn mul_by_constant(
        &self,
        layouter: &mut impl Layouter<F>,
        x: &Assigned,
        constant: Assigned::Element,
    ) -> Result<Assigned, Error> {
        if constant == Assigned::Element::from(0) {
            return self.assign_fixed(layouter, Assigned::Element::from(0));
        }
        if constant == Assigned::Element::from(1) {
            return Ok(x.clone());
        }
        self.linear_combination(
            layouter,
            &[(constant, x.clone())],
            Assigned::Element::from(0),
        )
    }
}
