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

//! Gadget implementing floating-point instructions over a native instruction
//! set.
//!
//! Every conditional in the usual addition algorithm is arithmetized without
//! branching: all alternatives are computed unconditionally and the relevant
//! one is picked with a select. Dead alternatives still need a satisfying
//! assignment, so the inner operations take a `skip` bit that relaxes their
//! assertions without changing their shape.

use std::marker::PhantomData;

use ff::PrimeField;
use halo2_proofs::{
    circuit::{Layouter, Value},
    plonk::Error,
};

use crate::{
    field::AssignedBounded,
    float::{cpu, AssignedFloat, Float, FloatParams},
    instructions::{
        AssertionInstructions, AssignmentInstructions, ControlFlowInstructions, FloatInstructions,
        NativeInstructions,
    },
    types::{AssignedBit, AssignedNative},
    utils::util::pow2,
};

/// A gadget for operating on floating-point numbers of a fixed format,
/// implemented on top of a set of native instructions.
#[derive(Clone, Debug)]
pub struct FloatGadget<F, N> {
    params: FloatParams,
    native_gadget: N,
    _marker: PhantomData<F>,
}

impl<F, N> FloatGadget<F, N>
where
    F: PrimeField,
    N: NativeInstructions<F>,
{
    /// Creates a new float gadget for the given parameters.
    ///
    /// # Panics
    ///
    /// If the parameters are too large for the native field. Every integer
    /// manipulated during an addition must be decomposable in bits, the
    /// widest being the magnitude key (`k + p + 1` bits) and the mantissa
    /// sum rounding input (`2p + 3` bits).
    pub fn new(params: FloatParams, native_gadget: &N) -> Self {
        let max_bits = params.magnitude_bits().max(params.sum_msb() + 2);
        assert!(
            max_bits <= F::NUM_BITS - 2,
            "float parameters {:?} require {} bits, the field supports {}",
            params,
            max_bits,
            F::NUM_BITS - 2
        );
        FloatGadget {
            params,
            native_gadget: native_gadget.clone(),
            _marker: PhantomData,
        }
    }

    /// Shifts an assigned value of (at most) `nb_bits` bits to the right by a
    /// fixed amount. The low `shift` bits are dropped.
    ///
    /// The circuit becomes unsatisfiable if the value of `x` is not in
    /// `[0, 2^nb_bits)`.
    pub fn right_shift(
        &self,
        layouter: &mut impl Layouter<F>,
        x: &AssignedNative<F>,
        nb_bits: usize,
        shift: usize,
    ) -> Result<AssignedNative<F>, Error> {
        assert!(shift <= nb_bits);
        let bits = self.native_gadget.assigned_to_le_bits(layouter, x, nb_bits)?;
        self.native_gadget.assigned_from_le_bits(layouter, &bits[shift..])
    }

    /// Shifts an assigned value to the left by an assigned amount, i.e.
    /// returns `x * 2^shift`.
    ///
    /// The shift is only known to the prover. For every candidate amount
    /// below `shift_bound`, an equality indicator against `shift` is
    /// computed; the power `2^shift` is the indicator-weighted sum of all
    /// candidate powers. Unless `skip` is set, the circuit enforces
    /// `shift < shift_bound`. When `skip` is set and the shift is out of
    /// range, the result is `0` and its value is meaningless.
    pub fn left_shift(
        &self,
        layouter: &mut impl Layouter<F>,
        x: &AssignedNative<F>,
        shift: &AssignedNative<F>,
        shift_bound: usize,
        skip: &AssignedBit<F>,
    ) -> Result<AssignedNative<F>, Error> {
        let ng = &self.native_gadget;

        let mut power_terms = Vec::with_capacity(shift_bound);
        let mut hit_terms = Vec::with_capacity(shift_bound);
        for i in 0..shift_bound {
            let hit = ng.is_equal_to_fixed(layouter, shift, F::from(i as u64))?;
            let hit = ng.convert(layouter, &hit)?;
            power_terms.push((pow2::<F>(i), hit.clone()));
            hit_terms.push((F::ONE, hit));
        }
        let power = ng.linear_combination(layouter, &power_terms, F::ZERO)?;

        // The indicators are mutually exclusive, so their sum is a bit: 1
        // iff shift < shift_bound.
        let in_range = ng.linear_combination(layouter, &hit_terms, F::ZERO)?;
        let in_range = ng.convert_unsafe(layouter, &in_range)?;
        let ok = ng.or(layouter, &[skip.clone(), in_range])?;
        ng.assert_equal_to_fixed(layouter, &ok, true)?;

        ng.mul(layouter, x, &power, None)
    }

    /// Returns a one-hot vector of length `nb_bits` marking the position of
    /// the most significant non-zero bit of `x`.
    ///
    /// Unless `skip` is set, the circuit enforces `x != 0`. When `skip` is
    /// set and `x` is zero, the returned vector is all zeroes.
    ///
    /// The circuit becomes unsatisfiable if the value of `x` is not in
    /// `[0, 2^nb_bits)`.
    pub fn msnzb(
        &self,
        layouter: &mut impl Layouter<F>,
        x: &AssignedNative<F>,
        nb_bits: usize,
        skip: &AssignedBit<F>,
    ) -> Result<Vec<AssignedBit<F>>, Error> {
        let ng = &self.native_gadget;

        let bits = ng.assigned_to_le_bits(layouter, x, nb_bits)?;

        let x_is_zero = ng.is_zero(layouter, x)?;
        let x_is_non_zero = ng.not(layouter, &x_is_zero)?;
        let ok = ng.or(layouter, &[skip.clone(), x_is_non_zero])?;
        ng.assert_equal_to_fixed(layouter, &ok, true)?;

        // Scan the bits top-down, keeping a running "no bit above this one is
        // set" mask. The one-hot flag at position i is bit_i * mask_i.
        let mut none_above: AssignedBit<F> = ng.assign_fixed(layouter, true)?;
        let mut one_hot = Vec::with_capacity(nb_bits);
        for bit in bits.iter().rev() {
            let flag = ng.and(layouter, &[bit.clone(), none_above.clone()])?;
            let not_bit = ng.not(layouter, bit)?;
            none_above = ng.and(layouter, &[none_above, not_bit])?;
            one_hot.push(flag);
        }
        one_hot.reverse();
        Ok(one_hot)
    }

    /// Normalizes an unnormalized mantissa `m` of at most `2p + 2` bits at
    /// scale `p`, with exponent `e`. Returns the pair `(e + l - p, m *
    /// 2^(P - l))` where `l` is the position of the leading bit of `m` and
    /// `P = 2p + 1`, so that the output mantissa has its leading bit exactly
    /// at position `P` and the represented value is unchanged.
    ///
    /// Unless `skip` is set, the circuit enforces `m != 0`.
    pub fn normalize(
        &self,
        layouter: &mut impl Layouter<F>,
        exponent: &AssignedNative<F>,
        mantissa: &AssignedNative<F>,
        skip: &AssignedBit<F>,
    ) -> Result<(AssignedNative<F>, AssignedNative<F>), Error> {
        let ng = &self.native_gadget;
        let p = self.params.mantissa_bits();
        let big_p = self.params.sum_msb();

        let one_hot = self.msnzb(layouter, mantissa, (big_p + 1) as usize, skip)?;

        // Recover both the leading-bit position l and the scaling factor
        // 2^(P - l) as linear combinations of the one-hot flags.
        let mut position_terms = Vec::with_capacity(one_hot.len());
        let mut scale_terms = Vec::with_capacity(one_hot.len());
        for (i, flag) in one_hot.iter().enumerate() {
            let flag = ng.convert(layouter, flag)?;
            position_terms.push((F::from(i as u64), flag.clone()));
            scale_terms.push((pow2::<F>((big_p as usize) - i), flag));
        }
        let position = ng.linear_combination(layouter, &position_terms, F::ZERO)?;
        let scale = ng.linear_combination(layouter, &scale_terms, F::ZERO)?;

        let m_out = ng.mul(layouter, mantissa, &scale, None)?;
        let e_out = ng.linear_combination(
            layouter,
            &[(F::ONE, exponent.clone()), (F::ONE, position)],
            -F::from(p as u64),
        )?;
        Ok((e_out, m_out))
    }

    /// Rounds a normalized mantissa at scale `P = 2p + 1` back to scale `p`,
    /// to the nearest value with ties rounded up. When the rounded mantissa
    /// overflows `p + 1` bits, which happens exactly for `m >= 2^(P+1) -
    /// 2^p`, the result is mantissa `2^p` with an incremented exponent.
    pub fn round_and_check(
        &self,
        layouter: &mut impl Layouter<F>,
        exponent: &AssignedNative<F>,
        mantissa: &AssignedNative<F>,
    ) -> Result<(AssignedNative<F>, AssignedNative<F>), Error> {
        let ng = &self.native_gadget;
        let p = self.params.mantissa_bits();
        let r = self.params.round_shift();
        let big_p = self.params.sum_msb();

        // The mantissa was produced by normalization, so it fits in P + 1
        // bits.
        let m_bounded = AssignedBounded::to_assigned_bounded_unsafe(mantissa, big_p + 1);
        let limit = pow2::<F>((big_p + 1) as usize) - pow2::<F>((r - 1) as usize);
        let no_overflow = ng.lower_than_fixed(layouter, &m_bounded, limit)?;

        // Add half of the rounding unit and drop the low r bits.
        let m_plus = ng.add_constant(layouter, mantissa, pow2::<F>((r - 1) as usize))?;
        let m_rounded = self.right_shift(layouter, &m_plus, (big_p + 2) as usize, r as usize)?;

        let m_overflow = ng.assign_fixed(layouter, pow2::<F>(p as usize))?;
        let e_overflow = ng.add_constant(layouter, exponent, F::ONE)?;

        let m_out = ng.select(layouter, &no_overflow, &m_rounded, &m_overflow)?;
        let e_out = ng.select(layouter, &no_overflow, exponent, &e_overflow)?;
        Ok((e_out, m_out))
    }

    // The magnitude key e * 2^(p+1) + m, monotone in the represented value
    // for well-formed floats.
    fn magnitude(
        &self,
        layouter: &mut impl Layouter<F>,
        x: &AssignedFloat<F>,
    ) -> Result<AssignedBounded<F>, Error> {
        let p = self.params.mantissa_bits();
        let key = self.native_gadget.linear_combination(
            layouter,
            &[
                (pow2::<F>((p + 1) as usize), x.exponent.clone()),
                (F::ONE, x.mantissa.clone()),
            ],
            F::ZERO,
        )?;
        // Bounded by construction, given the well-formedness of x.
        Ok(AssignedBounded::to_assigned_bounded_unsafe(
            &key,
            self.params.magnitude_bits(),
        ))
    }
}

impl<F, N> AssignmentInstructions<F, AssignedFloat<F>> for FloatGadget<F, N>
where
    F: PrimeField,
    N: NativeInstructions<F>,
{
    fn assign(
        &self,
        layouter: &mut impl Layouter<F>,
        value: Value<Float>,
    ) -> Result<AssignedFloat<F>, Error> {
        let exponent = self
            .native_gadget
            .assign(layouter, value.map(|f| F::from(f.exponent)))?;
        let mantissa = self
            .native_gadget
            .assign(layouter, value.map(|f| F::from(f.mantissa)))?;
        let x = AssignedFloat { exponent, mantissa };
        self.assert_well_formed(layouter, &x)?;
        Ok(x)
    }

    fn assign_fixed(
        &self,
        layouter: &mut impl Layouter<F>,
        constant: Float,
    ) -> Result<AssignedFloat<F>, Error> {
        assert!(
            cpu::is_well_formed(&self.params, constant),
            "cannot assign the malformed float {:?}",
            constant
        );
        let exponent = self
            .native_gadget
            .assign_fixed(layouter, F::from(constant.exponent))?;
        let mantissa = self
            .native_gadget
            .assign_fixed(layouter, F::from(constant.mantissa))?;
        Ok(AssignedFloat { exponent, mantissa })
    }
}

impl<F, N> AssertionInstructions<F, AssignedFloat<F>> for FloatGadget<F, N>
where
    F: PrimeField,
    N: NativeInstructions<F>,
{
    fn assert_equal(
        &self,
        layouter: &mut impl Layouter<F>,
        x: &AssignedFloat<F>,
        y: &AssignedFloat<F>,
    ) -> Result<(), Error> {
        self.native_gadget
            .assert_equal(layouter, &x.exponent, &y.exponent)?;
        self.native_gadget
            .assert_equal(layouter, &x.mantissa, &y.mantissa)
    }

    fn assert_not_equal(
        &self,
        layouter: &mut impl Layouter<F>,
        x: &AssignedFloat<F>,
        y: &AssignedFloat<F>,
    ) -> Result<(), Error> {
        let ng = &self.native_gadget;
        let e_eq = ng.is_equal(layouter, &x.exponent, &y.exponent)?;
        let m_eq = ng.is_equal(layouter, &x.mantissa, &y.mantissa)?;
        let both = ng.and(layouter, &[e_eq, m_eq])?;
        ng.assert_equal_to_fixed(layouter, &both, false)
    }

    fn assert_equal_to_fixed(
        &self,
        layouter: &mut impl Layouter<F>,
        x: &AssignedFloat<F>,
        constant: Float,
    ) -> Result<(), Error> {
        self.native_gadget
            .assert_equal_to_fixed(layouter, &x.exponent, F::from(constant.exponent))?;
        self.native_gadget
            .assert_equal_to_fixed(layouter, &x.mantissa, F::from(constant.mantissa))
    }

    fn assert_not_equal_to_fixed(
        &self,
        layouter: &mut impl Layouter<F>,
        x: &AssignedFloat<F>,
        constant: Float,
    ) -> Result<(), Error> {
        let ng = &self.native_gadget;
        let e_eq = ng.is_equal_to_fixed(layouter, &x.exponent, F::from(constant.exponent))?;
        let m_eq = ng.is_equal_to_fixed(layouter, &x.mantissa, F::from(constant.mantissa))?;
        let both = ng.and(layouter, &[e_eq, m_eq])?;
        ng.assert_equal_to_fixed(layouter, &both, false)
    }
}

impl<F, N> ControlFlowInstructions<F, AssignedFloat<F>> for FloatGadget<F, N>
where
    F: PrimeField,
    N: NativeInstructions<F>,
{
    fn select(
        &self,
        layouter: &mut impl Layouter<F>,
        cond: &AssignedBit<F>,
        x: &AssignedFloat<F>,
        y: &AssignedFloat<F>,
    ) -> Result<AssignedFloat<F>, Error> {
        let exponent = self
            .native_gadget
            .select(layouter, cond, &x.exponent, &y.exponent)?;
        let mantissa = self
            .native_gadget
            .select(layouter, cond, &x.mantissa, &y.mantissa)?;
        Ok(AssignedFloat { exponent, mantissa })
    }
}

impl<F, N> FloatInstructions<F> for FloatGadget<F, N>
where
    F: PrimeField,
    N: NativeInstructions<F>,
{
    fn float_params(&self) -> FloatParams {
        self.params
    }

    fn assert_well_formed(
        &self,
        layouter: &mut impl Layouter<F>,
        x: &AssignedFloat<F>,
    ) -> Result<(), Error> {
        let ng = &self.native_gadget;
        let k = self.params.exponent_bits();
        let p = self.params.mantissa_bits();

        let e_is_zero = ng.is_zero(layouter, &x.exponent)?;
        let m_is_zero = ng.is_zero(layouter, &x.mantissa)?;

        let e_in_range = ng.is_lower_than_pow2(layouter, &x.exponent, k as usize)?;
        // A normalized mantissa is in [2^p, 2^(p+1)), i.e. m - 2^p fits in p
        // bits.
        let m_shifted = ng.add_constant(layouter, &x.mantissa, -pow2::<F>(p as usize))?;
        let m_normalized = ng.is_lower_than_pow2(layouter, &m_shifted, p as usize)?;
        let normal = ng.and(layouter, &[e_in_range, m_normalized])?;

        let ok = ng.select(layouter, &e_is_zero, &m_is_zero, &normal)?;
        ng.assert_equal_to_fixed(layouter, &ok, true)
    }

    fn add(
        &self,
        layouter: &mut impl Layouter<F>,
        x: &AssignedFloat<F>,
        y: &AssignedFloat<F>,
    ) -> Result<AssignedFloat<F>, Error> {
        let ng = &self.native_gadget;
        let k = self.params.exponent_bits();
        let p = self.params.mantissa_bits();

        // Do not trust the inputs, even if they were produced by this gadget.
        self.assert_well_formed(layouter, x)?;
        self.assert_well_formed(layouter, y)?;

        // Order the operands by magnitude: alpha is the larger one.
        let x_key = self.magnitude(layouter, x)?;
        let y_key = self.magnitude(layouter, y)?;
        let x_is_smaller = ng.lower_than(layouter, &x_key, &y_key)?;
        let (e_alpha, e_beta) = ng.cond_swap(layouter, &x_is_smaller, &x.exponent, &y.exponent)?;
        let (m_alpha, m_beta) = ng.cond_swap(layouter, &x_is_smaller, &x.mantissa, &y.mantissa)?;

        // The addition is trivial when alpha is the zero float (then so is
        // beta) or when the exponent gap exceeds p + 1 (then beta is
        // entirely absorbed by rounding). In both cases the result is alpha.
        let diff = ng.sub(layouter, &e_alpha, &e_beta)?;
        let alpha_is_zero = ng.is_zero(layouter, &e_alpha)?;
        let diff_bounded = AssignedBounded::to_assigned_bounded_unsafe(&diff, k);
        let gap_too_large =
            ng.greater_than_fixed(layouter, &diff_bounded, F::from((p + 1) as u64))?;
        let trivial = ng.or(layouter, &[alpha_is_zero, gap_too_large])?;

        // General path: align the mantissas at scale p of the smaller
        // exponent, add, normalize to scale P = 2p + 1 and round back to
        // scale p. The inner assertions are skipped on the trivial path,
        // where the exponent gap may exceed any static shift bound.
        let m_shifted = self.left_shift(layouter, &m_alpha, &diff, (p + 2) as usize, &trivial)?;
        let m_sum = ng.add(layouter, &m_shifted, &m_beta)?;
        let (e_norm, m_norm) = self.normalize(layouter, &e_beta, &m_sum, &trivial)?;
        let (e_round, m_round) = self.round_and_check(layouter, &e_norm, &m_norm)?;

        let exponent = ng.select(layouter, &trivial, &e_alpha, &e_round)?;
        let mantissa = ng.select(layouter, &trivial, &m_alpha, &m_round)?;
        Ok(AssignedFloat { exponent, mantissa })
    }
}

#[cfg(test)]
mod tests {
    use halo2_proofs::{
        circuit::SimpleFloorPlanner,
        dev::MockProver,
        pasta::Fp,
        plonk::{Circuit, ConstraintSystem},
    };
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    use super::*;
    use crate::{
        field::{NativeChip, NativeConfig, NativeGadget},
        testing_utils::FromScratch,
        types::InnerValue,
    };

    type NG = NativeGadget<Fp, NativeChip<Fp>>;

    #[derive(Clone, Debug)]
    enum Operation {
        WellFormedness,
        RightShift { nb_bits: usize, shift: usize },
        LeftShift { shift_bound: usize },
        Msnzb { nb_bits: usize },
        Normalize,
        RoundAndCheck,
        Add,
    }

    #[derive(Clone, Debug)]
    struct TestCircuit {
        params: FloatParams,
        operation: Operation,
        // Inputs and expected output, interpreted per operation.
        x: Float,
        y: Float,
        expected: Float,
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
            let ng = NG::new_from_scratch(&config);
            let gadget = FloatGadget::new(self.params, &ng);
            let no_skip: AssignedBit<Fp> = ng.assign_fixed(&mut layouter, false)?;

            match &self.operation {
                Operation::WellFormedness => {
                    // The assignment itself asserts well-formedness, so it is
                    // exercised on raw components.
                    let exponent =
                        ng.assign(&mut layouter, Value::known(Fp::from(self.x.exponent)))?;
                    let mantissa =
                        ng.assign(&mut layouter, Value::known(Fp::from(self.x.mantissa)))?;
                    let x = AssignedFloat::from_parts_unsafe(exponent, mantissa);
                    gadget.assert_well_formed(&mut layouter, &x)?;
                }
                Operation::RightShift { nb_bits, shift } => {
                    let x = ng.assign(&mut layouter, Value::known(Fp::from(self.x.mantissa)))?;
                    let res = gadget.right_shift(&mut layouter, &x, *nb_bits, *shift)?;
                    ng.assert_equal_to_fixed(
                        &mut layouter,
                        &res,
                        Fp::from(self.expected.mantissa),
                    )?;
                }
                Operation::LeftShift { shift_bound } => {
                    let x = ng.assign(&mut layouter, Value::known(Fp::from(self.x.mantissa)))?;
                    let shift =
                        ng.assign(&mut layouter, Value::known(Fp::from(self.y.mantissa)))?;
                    let res =
                        gadget.left_shift(&mut layouter, &x, &shift, *shift_bound, &no_skip)?;
                    ng.assert_equal_to_fixed(
                        &mut layouter,
                        &res,
                        Fp::from(self.expected.mantissa),
                    )?;
                }
                Operation::Msnzb { nb_bits } => {
                    let x = ng.assign(&mut layouter, Value::known(Fp::from(self.x.mantissa)))?;
                    let one_hot = gadget.msnzb(&mut layouter, &x, *nb_bits, &no_skip)?;
                    // The expected mantissa encodes the leading-bit position.
                    for (i, flag) in one_hot.iter().enumerate() {
                        let expected = i as u64 == self.expected.mantissa;
                        ng.assert_equal_to_fixed(&mut layouter, flag, expected)?;
                    }
                }
                Operation::Normalize => {
                    let e = ng.assign(&mut layouter, Value::known(Fp::from(self.x.exponent)))?;
                    let m = ng.assign(&mut layouter, Value::known(Fp::from(self.x.mantissa)))?;
                    let (e_out, m_out) = gadget.normalize(&mut layouter, &e, &m, &no_skip)?;
                    ng.assert_equal_to_fixed(
                        &mut layouter,
                        &e_out,
                        Fp::from(self.expected.exponent),
                    )?;
                    ng.assert_equal_to_fixed(
                        &mut layouter,
                        &m_out,
                        Fp::from(self.expected.mantissa),
                    )?;
                }
                Operation::RoundAndCheck => {
                    let e = ng.assign(&mut layouter, Value::known(Fp::from(self.x.exponent)))?;
                    let m = ng.assign(&mut layouter, Value::known(Fp::from(self.x.mantissa)))?;
                    let (e_out, m_out) = gadget.round_and_check(&mut layouter, &e, &m)?;
                    ng.assert_equal_to_fixed(
                        &mut layouter,
                        &e_out,
                        Fp::from(self.expected.exponent),
                    )?;
                    ng.assert_equal_to_fixed(
                        &mut layouter,
                        &m_out,
                        Fp::from(self.expected.mantissa),
                    )?;
                }
                Operation::Add => {
                    let x = gadget.assign(&mut layouter, Value::known(self.x))?;
                    let y = gadget.assign(&mut layouter, Value::known(self.y))?;
                    let res = gadget.add(&mut layouter, &x, &y)?;
                    gadget.assert_equal_to_fixed(&mut layouter, &res, self.expected)?;
                }
            }

            Ok(())
        }
    }

    fn run(
        params: FloatParams,
        operation: Operation,
        x: Float,
        y: Float,
        expected: Float,
        must_pass: bool,
    ) {
        const K: u32 = 12;
        let circuit = TestCircuit {
            params,
            operation,
            x,
            y,
            expected,
        };
        match MockProver::run(K, &circuit, vec![]) {
            Ok(prover) => match prover.verify() {
                Ok(()) => assert!(must_pass, "Unexpectedly passed the verifier"),
                Err(e) => assert!(!must_pass, "Failed verifier with error {e:?}"),
            },
            Err(e) => assert!(!must_pass, "Failed prover with error {e:?}"),
        }
    }

    fn params() -> FloatParams {
        FloatParams::new(8, 3)
    }

    fn run_add(x: Float, y: Float) {
        let params = params();
        let expected = cpu::add(&params, x, y);
        run(params, Operation::Add, x, y, expected, true);
    }

    #[test]
    fn test_well_formedness() {
        let zero = Float::zero();
        let wf = |x, ok| run(params(), Operation::WellFormedness, x, zero, zero, ok);
        wf(Float::zero(), true);
        wf(Float::new(1, 8), true);
        wf(Float::new(255, 15), true);
        // A zero exponent with a non-zero mantissa.
        wf(Float::new(0, 8), false);
        // A mantissa just below and just above the normalized range.
        wf(Float::new(1, 7), false);
        wf(Float::new(1, 16), false);
        // An exponent out of range.
        wf(Float::new(256, 8), false);
    }

    #[test]
    fn test_right_shift() {
        let sh = |x: u64, nb_bits, shift, expected: u64, ok| {
            run(
                params(),
                Operation::RightShift { nb_bits, shift },
                Float::new(0, x),
                Float::zero(),
                Float::new(0, expected),
                ok,
            )
        };
        sh(0b1101_0110, 8, 3, 0b11010, true);
        sh(255, 8, 8, 0, true);
        sh(12, 8, 0, 12, true);
        sh(0b1101_0110, 8, 3, 0b1101, false);
        // A value exceeding the declared width.
        sh(256, 8, 3, 32, false);
    }

    #[test]
    fn test_left_shift() {
        let sh = |x: u64, shift: u64, shift_bound, expected: u64, ok| {
            run(
                params(),
                Operation::LeftShift { shift_bound },
                Float::new(0, x),
                Float::new(0, shift),
                Float::new(0, expected),
                ok,
            )
        };
        sh(13, 0, 5, 13, true);
        sh(13, 4, 5, 13 << 4, true);
        sh(1, 9, 10, 512, true);
        sh(13, 4, 5, 13, false);
        // A shift amount at and beyond the bound, without skipping.
        sh(13, 5, 5, 13 << 5, false);
        sh(13, 40, 5, 0, false);
    }

    #[test]
    fn test_msnzb() {
        let ms = |x: u64, nb_bits, position: u64, ok| {
            run(
                params(),
                Operation::Msnzb { nb_bits },
                Float::new(0, x),
                Float::zero(),
                Float::new(0, position),
                ok,
            )
        };
        ms(0b0101_0000, 8, 6, true);
        ms(1, 8, 0, true);
        ms(255, 8, 7, true);
        ms(0b0101_0000, 8, 4, false);
        // Zero has no leading bit.
        ms(0, 8, 0, false);
    }

    #[test]
    fn test_normalize() {
        // For p = 3, normalization moves the leading bit to position P = 7.
        let n = |e: u64, m: u64, e_out: u64, m_out: u64| {
            run(
                params(),
                Operation::Normalize,
                Float::new(e, m),
                Float::zero(),
                Float::new(e_out, m_out),
                true,
            )
        };
        // m = 36 = 0b100100, leading bit at 5: e + 5 - 3, m << 2.
        n(4, 36, 6, 144);
        // An already maximal mantissa is left in place: leading bit at 7.
        n(3, 200, 7, 200);
        // A single bit at position 0 climbs all the way up.
        n(5, 1, 2, 128);
    }

    #[test]
    fn test_round_and_check() {
        // For p = 3, the mantissa comes at scale P = 7 in [128, 256) and the
        // rounded mantissa drops r = 4 bits.
        let r = |e: u64, m: u64, e_out: u64, m_out: u64| {
            run(
                params(),
                Operation::RoundAndCheck,
                Float::new(e, m),
                Float::zero(),
                Float::new(e_out, m_out),
                true,
            )
        };
        // An exact multiple of 2^r.
        r(5, 144, 5, 9);
        // A tie rounds up: 136 = 8.5 * 16.
        r(5, 136, 5, 9);
        // The largest non-overflowing mantissa.
        r(5, 247, 5, 15);
        // From 248 on, rounding overflows into the next exponent.
        r(5, 248, 6, 8);
        r(5, 255, 6, 8);
    }

    #[test]
    fn test_add_zero_identity() {
        run_add(Float::new(5, 11), Float::zero());
        run_add(Float::zero(), Float::new(5, 11));
        run_add(Float::zero(), Float::zero());
        // Adding zero through the general path: the exponent gap is within
        // p + 1.
        run_add(Float::new(2, 9), Float::zero());
    }

    #[test]
    fn test_add_equal_magnitudes() {
        run_add(Float::new(5, 8), Float::new(5, 8));
        run_add(Float::new(5, 15), Float::new(5, 15));
    }

    #[test]
    fn test_add_absorbed_operand() {
        // The exponent gap exceeds p + 1.
        run_add(Float::new(10, 9), Float::new(1, 9));
        run_add(Float::new(255, 15), Float::new(1, 8));
    }

    #[test]
    fn test_add_rounding_overflow() {
        // 60 + 3.75 rounds up to 64.
        run_add(Float::new(5, 15), Float::new(1, 15));
    }

    #[test]
    fn test_add_boundary_gap() {
        // An exponent gap of exactly p + 1 still goes through the general
        // path.
        run_add(Float::new(6, 8), Float::new(2, 8));
        run_add(Float::new(6, 15), Float::new(2, 15));
    }

    #[test]
    fn test_add_wrong_result_rejected() {
        let params = params();
        let x = Float::new(5, 8);
        let expected = cpu::add(&params, x, x);
        let wrong = Float::new(expected.exponent, expected.mantissa + 1);
        run(params, Operation::Add, x, x, wrong, false);
    }

    #[test]
    fn test_add_malformed_input_rejected() {
        // Assignment itself enforces well-formedness.
        run(
            params(),
            Operation::Add,
            Float::new(0, 8),
            Float::zero(),
            Float::new(0, 8),
            false,
        );
    }

    #[test]
    fn test_add_random() {
        let params = params();
        let mut rng = ChaCha8Rng::seed_from_u64(0xc0ffee);
        let sample = |rng: &mut ChaCha8Rng| -> Float {
            if rng.gen_ratio(1, 8) {
                return Float::zero();
            }
            Float::new(rng.gen_range(1..256), rng.gen_range(8..16))
        };
        for _ in 0..20 {
            let x = sample(&mut rng);
            let y = sample(&mut rng);
            let expected = cpu::add(&params, x, y);
            run(params, Operation::Add, x, y, expected, true);
        }
    }

    #[test]
    fn test_add_f64_shaped() {
        // An IEEE-754 double shaped format. The exponents are kept small
        // enough for the values to be finite as f64, and the mantissas are
        // chosen so that the aligned sum is exactly representable, making the
        // f64 comparison exact.
        let params = FloatParams::new(11, 52);
        let p = params.mantissa_bits() as u64;
        let x = Float::new(80, (1u64 << p) + 12345);
        let y = Float::new(78, (1u64 << p) + 987654320);
        let expected = cpu::add(&params, x, y);
        run(params, Operation::Add, x, y, expected, true);
        assert!(
            (expected.to_f64(&params) - (x.to_f64(&params) + y.to_f64(&params))).abs()
                < f64::EPSILON * x.to_f64(&params)
        );
    }

    #[test]
    fn test_assigned_float_value() {
        // The assigned pair reads back as the float it was built from.
        let params = params();
        let x = Float::new(5, 11);

        #[derive(Clone, Debug)]
        struct ValueCircuit {
            params: FloatParams,
            x: Float,
        }

        impl Circuit<Fp> for ValueCircuit {
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
                let ng = NG::new_from_scratch(&config);
                let gadget = FloatGadget::new(self.params, &ng);
                let x = gadget.assign(&mut layouter, Value::known(self.x))?;
                x.value().assert_if_known(|v| *v == self.x);
                Ok(())
            }
        }

        let circuit = ValueCircuit { params, x };
        let prover = MockProver::run(12, &circuit, vec![]).unwrap();
        prover.assert_satisfied();
    }
}
