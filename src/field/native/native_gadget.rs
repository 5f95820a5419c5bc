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

//! Gadget implementing the full set of native instructions on top of a chip
//! providing the basic arithmetic ones. Decomposition and comparison
//! operations are built here from the arithmetic layer, everything else is
//! delegated.

use std::marker::PhantomData;

use ff::PrimeField;
use halo2_proofs::{
    circuit::{Layouter, Value},
    plonk::Error,
};
use num_bigint::BigUint;
#[cfg(any(test, feature = "testing"))]
use {
    crate::field::native::{NativeChip, NativeConfig},
    crate::testing_utils::FromScratch,
    halo2_proofs::plonk::ConstraintSystem,
};

use crate::{
    instructions::{
        ArithInstructions, AssertionInstructions, AssignmentInstructions, BinaryInstructions,
        ComparisonInstructions, ControlFlowInstructions, ConversionInstructions,
        DecompositionInstructions, EqualityInstructions, NativeInstructions,
        UnsafeConversionInstructions, ZeroInstructions,
    },
    types::{AssignedBit, AssignedNative, InnerValue},
    utils::util::fe_to_big,
};

#[derive(Debug, Clone)]
/// A gadget that implements all basic operations on the Native field:
/// - Assignments
/// - Assertions
/// - Arithmetic
/// - Binary
/// - Comparison
/// - ControlFlow
/// - Conversions
/// - Decomposition
/// - Equality
pub struct NativeGadget<F, NativeArith>
where
    F: PrimeField,
    NativeArith: ArithInstructions<F, AssignedNative<F>>,
{
    pub(crate) native_chip: NativeArith,
    _marker: PhantomData<F>,
}

impl<F, NativeArith> NativeGadget<F, NativeArith>
where
    F: PrimeField,
    NativeArith: ArithInstructions<F, AssignedNative<F>>,
{
    /// Create a new gadget.
    pub fn new(native_chip: NativeArith) -> Self {
        Self {
            native_chip,
            _marker: PhantomData,
        }
    }
}

/// Struct representing bounded elements, i.e. 0 <= value < 2^bound.
#[derive(Clone, Debug)]
pub struct BoundedElement<F: PrimeField> {
    value: F,
    bound: u32,
}

impl<F: PrimeField> BoundedElement<F> {
    /// Creates a new bounded element
    pub fn new(value: F, bound: u32) -> Self {
        #[cfg(not(test))]
        {
            use num_traits::One;

            let v_as_bint = fe_to_big(value);
            let bound_as_bint = BigUint::one() << bound;
            assert!(
                v_as_bint < bound_as_bint,
                "Trying to convert {:?} to an AssignedBounded less than 2^{:?}!",
                value,
                bound
            );
        }
        BoundedElement { value, bound }
    }

    /// gets the field value of a BoundedElement
    pub fn field_value(&self) -> F {
        self.value
    }

    /// gets the bound of a BoundedElement
    pub fn bound(&self) -> u32 {
        self.bound
    }
}

/// This type is designed to enforce type safety on assigned "small" values.
/// It prevents the user from creating an `AssignedBounded` without using the
/// designated entry points, which guarantee (with constraints) that the
/// assigned value is in the desired range, `[0, 2^bound)`.
#[derive(Clone, Debug)]
pub struct AssignedBounded<F: PrimeField> {
    value: AssignedNative<F>,
    bound: u32,
}

impl<F: PrimeField> AssignedBounded<F> {
    /// CAUTION: use only if you know what you are doing!
    ///
    /// This function converts an `AssignedNative` to an `AssignedBounded`
    /// *without* adding any constraint to guarantee the number respects the
    /// bound.
    ///
    /// *It should be used only when the input x is already rangechecked
    pub(crate) fn to_assigned_bounded_unsafe(x: &AssignedNative<F>, bound: u32) -> Self {
        // we create the element to enforce the runtime assertions
        let _new = x.value().map(|&x| BoundedElement::new(x, bound));
        AssignedBounded {
            value: x.clone(),
            bound,
        }
    }

    /// gets the bound of an AssignedBounded
    pub fn bound(&self) -> u32 {
        self.bound
    }
}

impl<F: PrimeField> InnerValue for AssignedBounded<F> {
    type Element = BoundedElement<F>;

    fn value(&self) -> Value<BoundedElement<F>> {
        let (assigned_value, bound) = (self.value.clone(), self.bound());
        assigned_value
            .value()
            .map(|&value| BoundedElement { value, bound })
    }
}

// Inherit Assignment Instructions.
impl<F, NativeArith> AssignmentInstructions<F, AssignedNative<F>> for NativeGadget<F, NativeArith>
where
    F: PrimeField,
    NativeArith: ArithInstructions<F, AssignedNative<F>>,
{
    fn assign(
        &self,
        layouter: &mut impl Layouter<F>,
        value: Value<F>,
    ) -> Result<AssignedNative<F>, Error> {
        self.native_chip.assign(layouter, value)
    }

    fn assign_fixed(
        &self,
        layouter: &mut impl Layouter<F>,
        constant: F,
    ) -> Result<AssignedNative<F>, Error> {
        self.native_chip.assign_fixed(layouter, constant)
    }
}

// Inherit Bit Assignment Instructions.
impl<F, NativeArith> AssignmentInstructions<F, AssignedBit<F>> for NativeGadget<F, NativeArith>
where
    F: PrimeField,
    NativeArith:
        ArithInstructions<F, AssignedNative<F>> + AssignmentInstructions<F, AssignedBit<F>>,
{
    fn assign(
        &self,
        layouter: &mut impl Layouter<F>,
        value: Value<bool>,
    ) -> Result<AssignedBit<F>, Error> {
        self.native_chip.assign(layouter, value)
    }

    fn assign_fixed(
        &self,
        layouter: &mut impl Layouter<F>,
        constant: bool,
    ) -> Result<AssignedBit<F>, Error> {
        self.native_chip.assign_fixed(layouter, constant)
    }
}

// Inherit Assertion Instructions.
impl<F, NativeArith> AssertionInstructions<F, AssignedNative<F>> for NativeGadget<F, NativeArith>
where
    F: PrimeField,
    NativeArith: ArithInstructions<F, AssignedNative<F>>,
{
    fn assert_equal(
        &self,
        layouter: &mut impl Layouter<F>,
        x: &AssignedNative<F>,
        y: &AssignedNative<F>,
    ) -> Result<(), Error> {
        self.native_chip.assert_equal(layouter, x, y)
    }

    fn assert_not_equal(
        &self,
        layouter: &mut impl Layouter<F>,
        x: &AssignedNative<F>,
        y: &AssignedNative<F>,
    ) -> Result<(), Error> {
        self.native_chip.assert_not_equal(layouter, x, y)
    }

    fn assert_equal_to_fixed(
        &self,
        layouter: &mut impl Layouter<F>,
        x: &AssignedNative<F>,
        constant: F,
    ) -> Result<(), Error> {
        self.native_chip.assert_equal_to_fixed(layouter, x, constant)
    }

    fn assert_not_equal_to_fixed(
        &self,
        layouter: &mut impl Layouter<F>,
        x: &AssignedNative<F>,
        constant: F,
    ) -> Result<(), Error> {
        self.native_chip
            .assert_not_equal_to_fixed(layouter, x, constant)
    }
}

// Inherit Bit Assertion Instructions.
impl<F, NativeArith> AssertionInstructions<F, AssignedBit<F>> for NativeGadget<F, NativeArith>
where
    F: PrimeField,
    NativeArith: ArithInstructions<F, AssignedNative<F>> + AssertionInstructions<F, AssignedBit<F>>,
{
    fn assert_equal(
        &self,
        layouter: &mut impl Layouter<F>,
        x: &AssignedBit<F>,
        y: &AssignedBit<F>,
    ) -> Result<(), Error> {
        self.native_chip.assert_equal(layouter, x, y)
    }

    fn assert_not_equal(
        &self,
        layouter: &mut impl Layouter<F>,
        x: &AssignedBit<F>,
        y: &AssignedBit<F>,
    ) -> Result<(), Error> {
        self.native_chip.assert_not_equal(layouter, x, y)
    }

    fn assert_equal_to_fixed(
        &self,
        layouter: &mut impl Layouter<F>,
        x: &AssignedBit<F>,
        constant: bool,
    ) -> Result<(), Error> {
        self.native_chip.assert_equal_to_fixed(layouter, x, constant)
    }

    fn assert_not_equal_to_fixed(
        &self,
        layouter: &mut impl Layouter<F>,
        x: &AssignedBit<F>,
        constant: bool,
    ) -> Result<(), Error> {
        self.native_chip
            .assert_not_equal_to_fixed(layouter, x, constant)
    }
}

// Inherit Arith Instructions.
impl<F, NativeArith> ArithInstructions<F, AssignedNative<F>> for NativeGadget<F, NativeArith>
where
    F: PrimeField,
    NativeArith: ArithInstructions<F, AssignedNative<F>>,
{
    fn linear_combination(
        &self,
        layouter: &mut impl Layouter<F>,
        terms: &[(F, AssignedNative<F>)],
        constant: F,
    ) -> Result<AssignedNative<F>, Error> {
        self.native_chip.linear_combination(layouter, terms, constant)
    }

    fn mul(
        &self,
        layouter: &mut impl Layouter<F>,
        x: &AssignedNative<F>,
        y: &AssignedNative<F>,
        multiplying_constant: Option<F>,
    ) -> Result<AssignedNative<F>, Error> {
        self.native_chip.mul(layouter, x, y, multiplying_constant)
    }
}

// Inherit Equality Instructions.
impl<F, NativeArith> EqualityInstructions<F, AssignedNative<F>> for NativeGadget<F, NativeArith>
where
    F: PrimeField,
    NativeArith:
        ArithInstructions<F, AssignedNative<F>> + EqualityInstructions<F, AssignedNative<F>>,
{
    fn is_equal(
        &self,
        layouter: &mut impl Layouter<F>,
        x: &AssignedNative<F>,
        y: &AssignedNative<F>,
    ) -> Result<AssignedBit<F>, Error> {
        self.native_chip.is_equal(layouter, x, y)
    }

    fn is_equal_to_fixed(
        &self,
        layouter: &mut impl Layouter<F>,
        x: &AssignedNative<F>,
        constant: F,
    ) -> Result<AssignedBit<F>, Error> {
        self.native_chip.is_equal_to_fixed(layouter, x, constant)
    }
}

// Inherit Bit Equality Instructions.
impl<F, NativeArith> EqualityInstructions<F, AssignedBit<F>> for NativeGadget<F, NativeArith>
where
    F: PrimeField,
    NativeArith: ArithInstructions<F, AssignedNative<F>> + EqualityInstructions<F, AssignedBit<F>>,
{
    fn is_equal(
        &self,
        layouter: &mut impl Layouter<F>,
        x: &AssignedBit<F>,
        y: &AssignedBit<F>,
    ) -> Result<AssignedBit<F>, Error> {
        self.native_chip.is_equal(layouter, x, y)
    }

    fn is_equal_to_fixed(
        &self,
        layouter: &mut impl Layouter<F>,
        x: &AssignedBit<F>,
        constant: bool,
    ) -> Result<AssignedBit<F>, Error> {
        self.native_chip.is_equal_to_fixed(layouter, x, constant)
    }
}

// Inherit Zero Instructions.
impl<F, NativeArith> ZeroInstructions<F, AssignedNative<F>> for NativeGadget<F, NativeArith>
where
    F: PrimeField,
    NativeArith:
        ArithInstructions<F, AssignedNative<F>> + EqualityInstructions<F, AssignedNative<F>>,
{
}

// Inherit Control Flow Instructions.
impl<F, NativeArith> ControlFlowInstructions<F, AssignedNative<F>> for NativeGadget<F, NativeArith>
where
    F: PrimeField,
    NativeArith:
        ArithInstructions<F, AssignedNative<F>> + ControlFlowInstructions<F, AssignedNative<F>>,
{
    fn select(
        &self,
        layouter: &mut impl Layouter<F>,
        cond: &AssignedBit<F>,
        x: &AssignedNative<F>,
        y: &AssignedNative<F>,
    ) -> Result<AssignedNative<F>, Error> {
        self.native_chip.select(layouter, cond, x, y)
    }

    fn cond_swap(
        &self,
        layouter: &mut impl Layouter<F>,
        cond: &AssignedBit<F>,
        x: &AssignedNative<F>,
        y: &AssignedNative<F>,
    ) -> Result<(AssignedNative<F>, AssignedNative<F>), Error> {
        self.native_chip.cond_swap(layouter, cond, x, y)
    }
}

// Inherit Bit Control Flow Instructions.
impl<F, NativeArith> ControlFlowInstructions<F, AssignedBit<F>> for NativeGadget<F, NativeArith>
where
    F: PrimeField,
    NativeArith: ArithInstructions<F, AssignedNative<F>>
        + AssertionInstructions<F, AssignedBit<F>>
        + ControlFlowInstructions<F, AssignedBit<F>>,
{
    fn select(
        &self,
        layouter: &mut impl Layouter<F>,
        cond: &AssignedBit<F>,
        x: &AssignedBit<F>,
        y: &AssignedBit<F>,
    ) -> Result<AssignedBit<F>, Error> {
        self.native_chip.select(layouter, cond, x, y)
    }
}

// Inherit Binary Instructions.
impl<F, NativeArith> BinaryInstructions<F> for NativeGadget<F, NativeArith>
where
    F: PrimeField,
    NativeArith: ArithInstructions<F, AssignedNative<F>> + BinaryInstructions<F>,
{
    fn and(
        &self,
        layouter: &mut impl Layouter<F>,
        bits: &[AssignedBit<F>],
    ) -> Result<AssignedBit<F>, Error> {
        self.native_chip.and(layouter, bits)
    }

    fn or(
        &self,
        layouter: &mut impl Layouter<F>,
        bits: &[AssignedBit<F>],
    ) -> Result<AssignedBit<F>, Error> {
        self.native_chip.or(layouter, bits)
    }

    fn xor(
        &self,
        layouter: &mut impl Layouter<F>,
        bits: &[AssignedBit<F>],
    ) -> Result<AssignedBit<F>, Error> {
        self.native_chip.xor(layouter, bits)
    }

    fn not(
        &self,
        layouter: &mut impl Layouter<F>,
        bit: &AssignedBit<F>,
    ) -> Result<AssignedBit<F>, Error> {
        self.native_chip.not(layouter, bit)
    }
}

// Inherit Conversion Instructions.
impl<F, NativeArith> ConversionInstructions<F, AssignedBit<F>, AssignedNative<F>>
    for NativeGadget<F, NativeArith>
where
    F: PrimeField,
    NativeArith: ArithInstructions<F, AssignedNative<F>>
        + ConversionInstructions<F, AssignedBit<F>, AssignedNative<F>>,
{
    fn convert_value(&self, x: &bool) -> Option<F> {
        self.native_chip.convert_value(x)
    }

    fn convert(
        &self,
        layouter: &mut impl Layouter<F>,
        x: &AssignedBit<F>,
    ) -> Result<AssignedNative<F>, Error> {
        self.native_chip.convert(layouter, x)
    }
}

impl<F, NativeArith> ConversionInstructions<F, AssignedNative<F>, AssignedBit<F>>
    for NativeGadget<F, NativeArith>
where
    F: PrimeField,
    NativeArith: ArithInstructions<F, AssignedNative<F>>
        + ConversionInstructions<F, AssignedNative<F>, AssignedBit<F>>,
{
    fn convert_value(&self, x: &F) -> Option<bool> {
        self.native_chip.convert_value(x)
    }

    fn convert(
        &self,
        layouter: &mut impl Layouter<F>,
        x: &AssignedNative<F>,
    ) -> Result<AssignedBit<F>, Error> {
        self.native_chip.convert(layouter, x)
    }
}

impl<F, NativeArith> UnsafeConversionInstructions<F, AssignedNative<F>, AssignedBit<F>>
    for NativeGadget<F, NativeArith>
where
    F: PrimeField,
    NativeArith: ArithInstructions<F, AssignedNative<F>>
        + UnsafeConversionInstructions<F, AssignedNative<F>, AssignedBit<F>>,
{
    fn convert_unsafe(
        &self,
        layouter: &mut impl Layouter<F>,
        x: &AssignedNative<F>,
    ) -> Result<AssignedBit<F>, Error> {
        self.native_chip.convert_unsafe(layouter, x)
    }
}

// Decomposition Instructions, built on the arithmetic layer.
impl<F, NativeArith> DecompositionInstructions<F, AssignedNative<F>>
    for NativeGadget<F, NativeArith>
where
    F: PrimeField,
    NativeArith: ArithInstructions<F, AssignedNative<F>>
        + AssignmentInstructions<F, AssignedBit<F>>
        + ConversionInstructions<F, AssignedBit<F>, AssignedNative<F>>,
{
    fn assigned_to_le_bits(
        &self,
        layouter: &mut impl Layouter<F>,
        x: &AssignedNative<F>,
        nb_bits: usize,
    ) -> Result<Vec<AssignedBit<F>>, Error> {
        // The margin of 2 bits guarantees that the recomposition sum stays
        // below the modulus, so it cannot wrap around.
        assert!(
            nb_bits as u32 <= F::NUM_BITS - 2,
            "assigned_to_le_bits: {} bits exceed the supported maximum of {}",
            nb_bits,
            F::NUM_BITS - 2
        );

        let x_as_bint = x.value().map(|v| fe_to_big(*v));
        let bit_values: Vec<Value<bool>> = (0..nb_bits)
            .map(|i| x_as_bint.clone().map(|b| b.bit(i as u64)))
            .collect();
        let bits = self.native_chip.assign_many(layouter, &bit_values)?;

        let sum = self.assigned_from_le_bits(layouter, &bits)?;
        self.native_chip.assert_equal(layouter, x, &sum)?;

        Ok(bits)
    }
}

// Comparison Instructions, built on the decomposition layer.
impl<F, NativeArith> ComparisonInstructions<F, AssignedNative<F>> for NativeGadget<F, NativeArith>
where
    F: PrimeField,
    NativeArith: ArithInstructions<F, AssignedNative<F>>
        + AssignmentInstructions<F, AssignedBit<F>>
        + ConversionInstructions<F, AssignedBit<F>, AssignedNative<F>>
        + BinaryInstructions<F>
        + EqualityInstructions<F, AssignedNative<F>>
        + ControlFlowInstructions<F, AssignedNative<F>>,
{
    // This constant must not exceed F::NUM_BITS - 2. This restriction derives
    // from the assumption that the following condition holds true:
    //
    //     x <  y    ==> 0 < y - x < 2^MAX_BOUND_IN_BITS
    //
    // This implies that the difference x - y should not wrap around in the
    // field, ensuring it remains less than 2^MAX_BOUND_IN_BITS.
    const MAX_BOUND_IN_BITS: u32 = F::NUM_BITS - 2;

    fn bounded_of_element(
        &self,
        layouter: &mut impl Layouter<F>,
        n: usize,
        x: &AssignedNative<F>,
    ) -> Result<AssignedBounded<F>, Error> {
        #[cfg(not(test))]
        assert!(
            n <= Self::MAX_BOUND_IN_BITS as usize,
            "Cannot bound an element with a bound {} > {} = MAX_BOUND",
            n,
            Self::MAX_BOUND_IN_BITS,
        );

        self.assigned_to_le_bits(layouter, x, n)?;
        Ok(AssignedBounded::to_assigned_bounded_unsafe(x, n as u32))
    }

    fn element_of_bounded(
        &self,
        _layouter: &mut impl Layouter<F>,
        bounded: &AssignedBounded<F>,
    ) -> Result<AssignedNative<F>, Error> {
        Ok(bounded.value.clone())
    }

    fn lower_than_fixed(
        &self,
        layouter: &mut impl Layouter<F>,
        x: &AssignedBounded<F>,
        y: F,
    ) -> Result<AssignedBit<F>, Error> {
        let x_as_bint = x.value.value().map(|&x| fe_to_big(x));
        let y_as_bint = fe_to_big(y);

        // check that we try to make a meaningful comparison, i.e. y < 2^MAX
        #[cfg(not(test))]
        assert!(y_as_bint < BigUint::from(1u8) << Self::MAX_BOUND_IN_BITS);

        // x is already bounded by the type system so x < bound for some fixed
        // bound. If we want to show that x < bound <= y this relation
        // automatically holds.
        if y_as_bint >= (BigUint::from(1u8) << x.bound()) {
            return self.native_chip.assign_fixed(layouter, true);
        }

        // we know 0 <= x,y < 2^bound. There are two cases:
        //  1. x <  y    ==>    0 < y - x < 2^bound    ==>    0 <= y - x - 1 < 2^bound
        //  2. x >= y    ==>                                  0 <=  x - y < 2^bound

        // define z = b(2y-1) + x + bx(-2) - y
        //   - if b = 0 ==> z = x - y
        //   - if b = 1 ==> z = 2y-1 + x -2x - y = y - 1 - x

        let result_bit = x_as_bint.map(|x_as_bint| x_as_bint < y_as_bint);
        let assigned_result: AssignedBit<F> = self.native_chip.assign(layouter, result_bit)?;

        let b_el: AssignedNative<F> = self.native_chip.convert(layouter, &assigned_result)?;
        let x_el = self.element_of_bounded(layouter, x)?;
        let bx = self.native_chip.mul(layouter, &x_el, &b_el, None)?;
        let terms = vec![
            (F::from(2) * y - F::ONE, b_el),
            (F::ONE, x_el),
            (-F::from(2), bx),
        ];
        let z = self
            .native_chip
            .linear_combination(layouter, terms.as_slice(), -y)?;

        self.assigned_to_le_bits(layouter, &z, x.bound() as usize)?;
        Ok(assigned_result)
    }

    fn lower_than(
        &self,
        layouter: &mut impl Layouter<F>,
        x: &AssignedBounded<F>,
        y: &AssignedBounded<F>,
    ) -> Result<AssignedBit<F>, Error> {
        let x_as_bint = x.value.value().map(|&x| fe_to_big(x));
        let y_as_bint = y.value.value().map(|&x| fe_to_big(x));

        // we know 0 <= x,y < 2^bound. There are two cases:
        //  1. x <  y    ==>    0 < y - x < 2^bound    ==>    0 <= y - x - 1 < 2^bound
        //  2. x >= y    ==>                                  0 <=  x - y < 2^bound

        // define z = 2by - b + x + bx(-2) - y
        //   - if b = 0 ==> z = x - y
        //   - if b = 1 ==> z = 2y-1 + x -2x - y = y - 1 - x

        let result_bit = x_as_bint
            .zip(y_as_bint)
            .map(|(x_as_bint, y_as_bint)| x_as_bint < y_as_bint);
        let assigned_result: AssignedBit<F> = self.native_chip.assign(layouter, result_bit)?;

        let b_el: AssignedNative<F> = self.native_chip.convert(layouter, &assigned_result)?;
        let x_el = self.element_of_bounded(layouter, x)?;
        let y_el = self.element_of_bounded(layouter, y)?;

        let bx = self.native_chip.mul(layouter, &x_el, &b_el, None)?;
        let by = self.native_chip.mul(layouter, &y_el, &b_el, None)?;
        let terms = vec![
            (F::from(2), by),
            (-F::ONE, b_el),
            (F::ONE, x_el),
            (-F::from(2), bx),
            (-F::ONE, y_el),
        ];
        let z = self
            .native_chip
            .linear_combination(layouter, terms.as_slice(), F::ZERO)?;

        let max_bound = x.bound().max(y.bound());
        self.assigned_to_le_bits(layouter, &z, max_bound as usize)?;
        Ok(assigned_result)
    }

    fn leq(
        &self,
        layouter: &mut impl Layouter<F>,
        x: &AssignedBounded<F>,
        y: &AssignedBounded<F>,
    ) -> Result<AssignedBit<F>, Error> {
        // This is reimplemented this way because doing x < y + 1 might break
        // things in some weird edge case.
        let b1 = self.lower_than(layouter, x, y)?;
        let x_el = self.element_of_bounded(layouter, x)?;
        let y_el = self.element_of_bounded(layouter, y)?;
        let b2 = self.native_chip.is_equal(layouter, &x_el, &y_el)?;
        self.native_chip.or(layouter, &[b1, b2])
    }

    fn is_lower_than_pow2(
        &self,
        layouter: &mut impl Layouter<F>,
        x: &AssignedNative<F>,
        n: usize,
    ) -> Result<AssignedBit<F>, Error> {
        assert!(n as u32 <= Self::MAX_BOUND_IN_BITS);

        // Witness the low n bits of x and compare their recomposition with x.
        // The bits are Boolean-constrained but not tied to x, so the check
        // fails (instead of becoming unsatisfiable) when x >= 2^n.
        let x_as_bint = x.value().map(|v| fe_to_big(*v));
        let bit_values: Vec<Value<bool>> = (0..n)
            .map(|i| x_as_bint.clone().map(|b| b.bit(i as u64)))
            .collect();
        let bits = self.native_chip.assign_many(layouter, &bit_values)?;
        let low_part = self.assigned_from_le_bits(layouter, &bits)?;
        self.native_chip.is_equal(layouter, x, &low_part)
    }
}

// Implement Native Instructions.
impl<F, NativeArith> NativeInstructions<F> for NativeGadget<F, NativeArith>
where
    F: PrimeField,
    NativeArith: ArithInstructions<F, AssignedNative<F>>
        + AssignmentInstructions<F, AssignedBit<F>>
        + AssertionInstructions<F, AssignedBit<F>>
        + EqualityInstructions<F, AssignedNative<F>>
        + EqualityInstructions<F, AssignedBit<F>>
        + ControlFlowInstructions<F, AssignedNative<F>>
        + ControlFlowInstructions<F, AssignedBit<F>>
        + BinaryInstructions<F>
        + ConversionInstructions<F, AssignedBit<F>, AssignedNative<F>>
        + ConversionInstructions<F, AssignedNative<F>, AssignedBit<F>>
        + UnsafeConversionInstructions<F, AssignedNative<F>, AssignedBit<F>>,
{
}

// Circuit implementation for NativeGadget based on the NativeChip.
#[cfg(any(test, feature = "testing"))]
impl<F: PrimeField> FromScratch<F> for NativeGadget<F, NativeChip<F>> {
    type Config = NativeConfig;

    fn new_from_scratch(config: &Self::Config) -> Self {
        let native_chip = NativeChip::new_from_scratch(config);
        NativeGadget::new(native_chip)
    }

    fn configure_from_scratch(meta: &mut ConstraintSystem<F>) -> Self::Config {
        NativeChip::configure_from_scratch(meta)
    }

    fn load_from_scratch(_layouter: &mut impl Layouter<F>, _config: &Self::Config) {}
}

#[cfg(test)]
mod tests {
    use halo2_proofs::{
        circuit::SimpleFloorPlanner,
        dev::MockProver,
        pasta::Fp,
        plonk::{Circuit, ConstraintSystem},
    };

    use super::*;

    type NG = NativeGadget<Fp, NativeChip<Fp>>;

    #[derive(Clone, Debug)]
    enum Operation {
        BitDecomposition { nb_bits: usize },
        BitRecomposition { nb_bits: usize },
        IsZero,
        IsEqual,
        LowerThan { n: usize },
        LowerThanFixed { n: usize },
        Leq { n: usize },
        IsLowerThanPow2 { n: usize },
        Select,
        CondSwap,
    }

    #[derive(Clone, Debug)]
    struct TestCircuit {
        x: u64,
        y: u64,
        cond: bool,
        expected: bool,
        operation: Operation,
    }

    impl Circuit<Fp> for TestCircuit {
        type Config = NativeConfig;
        type FloorPlanner = SimpleFloorPlanner;

        fn without_witnesses(&self) -> Self {
            unreachable!()
        }

        fn configure(meta: &mut ConstraintSystem<Fp>) -> Self::Config {
            <NG as FromScratch<Fp>>::configure_from_scratch(meta)
        }

        fn synthesize(
            &self,
            config: Self::Config,
            mut layouter: impl Layouter<Fp>,
        ) -> Result<(), Error> {
            let gadget = NG::new_from_scratch(&config);
            let x = gadget.assign(&mut layouter, Value::known(Fp::from(self.x)))?;
            let y = gadget.assign(&mut layouter, Value::known(Fp::from(self.y)))?;

            match &self.operation {
                Operation::BitDecomposition { nb_bits } => {
                    let bits = gadget.assigned_to_le_bits(&mut layouter, &x, *nb_bits)?;
                    for (i, bit) in bits.iter().enumerate() {
                        let expected_bit = (self.x >> i) & 1 == 1;
                        gadget.assert_equal_to_fixed(&mut layouter, bit, expected_bit)?;
                    }
                }
                Operation::BitRecomposition { nb_bits } => {
                    let bit_values: Vec<Value<bool>> = (0..*nb_bits)
                        .map(|i| Value::known((self.x >> i) & 1 == 1))
                        .collect();
                    let bits = gadget.assign_many(&mut layouter, &bit_values)?;
                    let sum = gadget.assigned_from_le_bits(&mut layouter, &bits)?;
                    gadget.assert_equal_to_fixed(&mut layouter, &sum, Fp::from(self.x))?;
                }
                Operation::IsZero => {
                    let b = gadget.is_zero(&mut layouter, &x)?;
                    gadget.assert_equal_to_fixed(&mut layouter, &b, self.expected)?;
                }
                Operation::IsEqual => {
                    let b = gadget.is_equal(&mut layouter, &x, &y)?;
                    gadget.assert_equal_to_fixed(&mut layouter, &b, self.expected)?;
                }
                Operation::LowerThan { n } => {
                    let x = gadget.bounded_of_element(&mut layouter, *n, &x)?;
                    let y = gadget.bounded_of_element(&mut layouter, *n, &y)?;
                    let b = gadget.lower_than(&mut layouter, &x, &y)?;
                    gadget.assert_equal_to_fixed(&mut layouter, &b, self.expected)?;
                }
                Operation::LowerThanFixed { n } => {
                    let x = gadget.bounded_of_element(&mut layouter, *n, &x)?;
                    let b = gadget.lower_than_fixed(&mut layouter, &x, Fp::from(self.y))?;
                    gadget.assert_equal_to_fixed(&mut layouter, &b, self.expected)?;
                }
                Operation::Leq { n } => {
                    let x = gadget.bounded_of_element(&mut layouter, *n, &x)?;
                    let y = gadget.bounded_of_element(&mut layouter, *n, &y)?;
                    let b = gadget.leq(&mut layouter, &x, &y)?;
                    gadget.assert_equal_to_fixed(&mut layouter, &b, self.expected)?;
                }
                Operation::IsLowerThanPow2 { n } => {
                    let b = gadget.is_lower_than_pow2(&mut layouter, &x, *n)?;
                    gadget.assert_equal_to_fixed(&mut layouter, &b, self.expected)?;
                }
                Operation::Select => {
                    let cond = gadget.assign(&mut layouter, Value::known(self.cond))?;
                    let chosen = gadget.select(&mut layouter, &cond, &x, &y)?;
                    let expected = if self.cond { &x } else { &y };
                    gadget.assert_equal(&mut layouter, &chosen, expected)?;
                }
                Operation::CondSwap => {
                    let cond = gadget.assign(&mut layouter, Value::known(self.cond))?;
                    let (new_x, new_y) = gadget.cond_swap(&mut layouter, &cond, &x, &y)?;
                    let (exp_x, exp_y) = if self.cond { (&y, &x) } else { (&x, &y) };
                    gadget.assert_equal(&mut layouter, &new_x, exp_x)?;
                    gadget.assert_equal(&mut layouter, &new_y, exp_y)?;
                }
            }

            Ok(())
        }
    }

    fn run(operation: Operation, x: u64, y: u64, cond: bool, expected: bool, must_pass: bool) {
        const K: u32 = 10;
        let circuit = TestCircuit {
            x,
            y,
            cond,
            expected,
            operation,
        };
        match MockProver::run(K, &circuit, vec![]) {
            Ok(prover) => match prover.verify() {
                Ok(()) => assert!(must_pass, "Unexpectedly passed the verifier"),
                Err(e) => assert!(!must_pass, "Failed verifier with error {e:?}"),
            },
            Err(e) => assert!(!must_pass, "Failed prover with error {e:?}"),
        }
    }

    #[test]
    fn test_bit_decomposition() {
        run(Operation::BitDecomposition { nb_bits: 4 }, 0b1011, 0, false, true, true);
        run(Operation::BitDecomposition { nb_bits: 8 }, 0, 0, false, true, true);
        run(Operation::BitDecomposition { nb_bits: 8 }, 255, 0, false, true, true);
        // A value that does not fit in the requested number of bits.
        run(Operation::BitDecomposition { nb_bits: 4 }, 16, 0, false, true, false);
        run(Operation::BitDecomposition { nb_bits: 8 }, 256, 0, false, true, false);
    }

    #[test]
    fn test_bit_recomposition() {
        run(Operation::BitRecomposition { nb_bits: 8 }, 0b0101_0000, 0, false, true, true);
        run(Operation::BitRecomposition { nb_bits: 10 }, 1023, 0, false, true, true);
    }

    #[test]
    fn test_is_zero() {
        run(Operation::IsZero, 0, 0, false, true, true);
        run(Operation::IsZero, 5, 0, false, false, true);
        run(Operation::IsZero, 5, 0, false, true, false);
    }

    #[test]
    fn test_is_equal() {
        run(Operation::IsEqual, 7, 7, false, true, true);
        run(Operation::IsEqual, 7, 8, false, false, true);
        run(Operation::IsEqual, 7, 8, false, true, false);
    }

    #[test]
    fn test_lower_than() {
        // Boundary cases x = y - 1 and x = y.
        run(Operation::LowerThan { n: 8 }, 99, 100, false, true, true);
        run(Operation::LowerThan { n: 8 }, 100, 100, false, false, true);
        run(Operation::LowerThan { n: 8 }, 101, 100, false, false, true);
        run(Operation::LowerThan { n: 8 }, 0, 255, false, true, true);
        run(Operation::LowerThan { n: 8 }, 99, 100, false, false, false);
    }

    #[test]
    fn test_lower_than_fixed() {
        run(Operation::LowerThanFixed { n: 8 }, 99, 100, false, true, true);
        run(Operation::LowerThanFixed { n: 8 }, 100, 100, false, false, true);
        run(Operation::LowerThanFixed { n: 8 }, 0, 1, false, true, true);
        // Trivial case: the fixed bound exceeds the type-level bound.
        run(Operation::LowerThanFixed { n: 8 }, 17, 256, false, true, true);
    }

    #[test]
    fn test_leq() {
        run(Operation::Leq { n: 8 }, 100, 100, false, true, true);
        run(Operation::Leq { n: 8 }, 100, 101, false, true, true);
        run(Operation::Leq { n: 8 }, 101, 100, false, false, true);
    }

    #[test]
    fn test_is_lower_than_pow2() {
        run(Operation::IsLowerThanPow2 { n: 4 }, 15, 0, false, true, true);
        run(Operation::IsLowerThanPow2 { n: 4 }, 16, 0, false, false, true);
        run(Operation::IsLowerThanPow2 { n: 10 }, 1 << 20, 0, false, false, true);
        run(Operation::IsLowerThanPow2 { n: 4 }, 16, 0, false, true, false);
    }

    #[test]
    fn test_select() {
        run(Operation::Select, 3, 5, true, true, true);
        run(Operation::Select, 3, 5, false, true, true);
    }

    #[test]
    fn test_cond_swap() {
        run(Operation::CondSwap, 3, 5, true, true, true);
        run(Operation::CondSwap, 3, 5, false, true, true);
    }
}
