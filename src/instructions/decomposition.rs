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

//! Decomposition instructions interface.
//!
//! It provides functions for decomposing assigned values into bits, but also
//! composing bits into assigned values.
//!
//! This trait is parametrized by the `Assigned` type (a generic of this trait
//! that implements [InnerValue](crate::types::InnerValue)) that is being
//! decomposed/composed.

use ff::PrimeField;
use halo2_proofs::{circuit::Layouter, plonk::Error};

use crate::{
    instructions::{ArithInstructions, ConversionInstructions},
    types::{AssignedBit, InnerConstants},
};

/// The set of circuit instructions for (de)composition operations.
pub trait DecompositionInstructions<F, Assigned>:
    ArithInstructions<F, Assigned> + ConversionInstructions<F, AssignedBit<F>, Assigned>
where
    F: PrimeField,
    Assigned::Element: PrimeField,
    Assigned: InnerConstants + Clone,
{
    /// Returns a vector of `nb_bits` assigned bits representing the given
    /// assigned element in little-endian.
    ///
    /// The decomposition is complete: the bits are constrained to be Boolean
    /// and to recompose to `x`. In particular, the circuit becomes
    /// unsatisfiable if the value of `x` is not in `[0, 2^nb_bits)`.
    ///
    /// # Panics
    ///
    /// If `nb_bits > Assigned::Element::NUM_BITS - 2`. This margin guarantees
    /// that the recomposition sum cannot wrap around the modulus.
    fn assigned_to_le_bits(
        &self,
        layouter: &mut impl Layouter<F>,
        x: &Assigned,
        nb_bits: usize,
    ) -> Result<Vec<AssignedBit<F>>, Error>;

    /// Same as [assigned_to_le_bits](Self::assigned_to_le_bits) but the output
    /// bits are given in big-endian.
    fn assigned_to_be_bits(
        &self,
        layouter: &mut impl Layouter<F>,
        x: &Assigned,
        nb_bits: usize,
    ) -> Result<Vec<AssignedBit<F>>, Error> {
        let mut bits = self.assigned_to_le_bits(layouter, x, nb_bits)?;
        bits.reverse();
        Ok(bits)
    }

    /// Composes the given bits (in little-endian) into an assigned element.
    fn assigned_from_le_bits(
        &self,
        layouter: &mut impl Layouter<F>,
        bits: &[AssignedBit<F>],
    ) -> Result<Assigned, Error> {
        let mut coeff = Assigned::Element::from(1);
        let mut terms = vec![];
        for b in bits {
            let b_as_element: Assigned = self.convert(layouter, b)?;
            terms.push((coeff, b_as_element));
            coeff = coeff + coeff; // double the coeff
        }
        self.linear_combination(layouter, &terms, Assigned::Element::from(0))
    }

    /// Same as [assigned_from_le_bits](Self::assigned_from_le_bits) but the
    /// input bits are given in big-endian.
    fn assigned_from_be_bits(
        &self,
        layouter: &mut impl Layouter<F>,
        bits: &[AssignedBit<F>],
    ) -> Result<Assigned, Error> {
        let mut bits = bits.to_vec();
        bits.reverse();
        self.assigned_from_le_bits(layouter, &bits)
    }
}
