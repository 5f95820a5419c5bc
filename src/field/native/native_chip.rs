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

//! Chip implementing basic arithmetic instructions over the native field with
//! a single custom gate.
//!
//! All operations are expressed as instances of the row constraint:
//!
//! `q_arith * (sum_i coeff_i * v_i + q_mul * v_0 * v_1 + q_const) = 0`
//!
//! where the `v_i` are the advice values of the row, the `coeff_i`, `q_mul`
//! and `q_const` are fixed column values, and `q_arith` is a selector.

use std::{cmp::min, marker::PhantomData};

use ff::PrimeField;
use halo2_proofs::{
    circuit::{Chip, Layouter, Region, Value},
    plonk::{Advice, Column, ConstraintSystem, Constraints, Error, Expression, Fixed, Selector},
    poly::Rotation,
};

use crate::{
    field::{native::AssignedBit, AssignedNative},
    instructions::{
        ArithInstructions, AssertionInstructions, AssignmentInstructions, BinaryInstructions,
        ControlFlowInstructions, ConversionInstructions, EqualityInstructions,
        UnsafeConversionInstructions, ZeroInstructions,
    },
    utils::ComposableChip,
};
#[cfg(any(test, feature = "testing"))]
use crate::utils::util::FromScratch;

/// The number of advice columns used by the NativeChip.
pub const NB_ARITH_COLS: usize = 4;

/// The number of fixed columns used by the NativeChip: one coefficient per
/// advice column, plus `q_mul` and `q_const`.
pub const NB_ARITH_FIXED_COLS: usize = NB_ARITH_COLS + 2;

/// A value to be placed in an advice cell of an arithmetic row, together with
/// its fixed coefficient.
pub(crate) enum Term<'a, F: PrimeField> {
    /// A copy of an already assigned cell.
    Copied(F, &'a AssignedNative<F>),
    /// A freshly witnessed value.
    Fresh(F, Value<F>),
}

impl<F: PrimeField> Term<'_, F> {
    fn coeff(&self) -> F {
        match self {
            Term::Copied(c, _) => *c,
            Term::Fresh(c, _) => *c,
        }
    }

    fn value(&self) -> Value<F> {
        match self {
            Term::Copied(_, cell) => cell.value().copied(),
            Term::Fresh(_, v) => *v,
        }
    }
}

/// [`NativeConfig`], which uses [`NB_ARITH_COLS`] advice columns and
/// [`NB_ARITH_FIXED_COLS`] fixed columns.
#[derive(Clone, Debug)]
pub struct NativeConfig {
    pub(crate) q_arith: Selector,
    pub(crate) advice_cols: [Column<Advice>; NB_ARITH_COLS],
    pub(crate) coeff_cols: [Column<Fixed>; NB_ARITH_COLS],
    pub(crate) q_mul_col: Column<Fixed>,
    pub(crate) q_const_col: Column<Fixed>,
}

impl NativeConfig {
    /// Enforce the arithmetic identity, using columns:
    ///
    /// ```text
    ///    0      1      2      3
    /// -----------------------------
    /// |  v0  |  v1  |  v2  |  v3  |
    /// -----------------------------
    /// ```
    ///
    /// Enforce the constraint:
    /// * `c0*v0 + c1*v1 + c2*v2 + c3*v3 + q_mul * v0 * v1 + q_const = 0`
    fn create_arith_gate<F: PrimeField>(
        &self,
        meta: &mut ConstraintSystem<F>,
        q_arith: &Selector,
    ) {
        meta.create_gate("native arithmetic", |meta| {
            let q_arith = meta.query_selector(*q_arith);

            let values: Vec<Expression<F>> = self
                .advice_cols
                .iter()
                .map(|col| meta.query_advice(*col, Rotation::cur()))
                .collect();
            let coeffs: Vec<Expression<F>> = self
                .coeff_cols
                .iter()
                .map(|col| meta.query_fixed(*col))
                .collect();
            let q_mul = meta.query_fixed(self.q_mul_col);
            let q_const = meta.query_fixed(self.q_const_col);

            let linear = values
                .iter()
                .zip(coeffs.iter())
                .fold(q_const, |acc, (v, c)| acc + c.clone() * v.clone());

            let id = linear + q_mul * values[0].clone() * values[1].clone();

            Constraints::with_selector(q_arith, vec![("arithmetic identity", id)])
        })
    }
}

/// A chip implementing arithmetic, assertion, equality, control-flow and
/// binary instructions over the native field.
#[derive(Clone, Debug)]
pub struct NativeChip<F: PrimeField> {
    config: NativeConfig,
    _marker: PhantomData<F>,
}

impl<F: PrimeField> Chip<F> for NativeChip<F> {
    type Config = NativeConfig;
    type Loaded = ();

    fn config(&self) -> &Self::Config {
        &self.config
    }

    fn loaded(&self) -> &Self::Loaded {
        &()
    }
}

impl<F: PrimeField> ComposableChip<F> for NativeChip<F> {
    type SharedResources = (
        [Column<Advice>; NB_ARITH_COLS],
        [Column<Fixed>; NB_ARITH_FIXED_COLS],
    );
    type InstructionDeps = ();

    fn new(config: &Self::Config, _sub_chips: &Self::InstructionDeps) -> Self {
        Self {
            config: config.clone(),
            _marker: PhantomData,
        }
    }

    fn configure(
        meta: &mut ConstraintSystem<F>,
        shared_resources: &Self::SharedResources,
    ) -> Self::Config {
        let (advice_cols, fixed_cols) = shared_resources;
        for col in advice_cols.iter() {
            meta.enable_equality(*col)
        }

        let q_arith = meta.selector();

        let config = NativeConfig {
            q_arith,
            advice_cols: *advice_cols,
            coeff_cols: fixed_cols[..NB_ARITH_COLS].try_into().unwrap(),
            q_mul_col: fixed_cols[NB_ARITH_COLS],
            q_const_col: fixed_cols[NB_ARITH_COLS + 1],
        };

        config.create_arith_gate(meta, &q_arith);

        config
    }

    fn load(&self, _layouter: &mut impl Layouter<F>) -> Result<(), Error> {
        Ok(())
    }
}

impl<F: PrimeField> NativeChip<F> {
    /// Assigns one arithmetic row at the given offset, enforcing:
    ///
    /// `sum_i coeff_i * v_i + q_mul * v_0 * v_1 + q_const = 0`
    ///
    /// Unused columns are filled with zero values and zero coefficients.
    /// Copied terms are equality-constrained to their original cell. The
    /// returned cells follow the column order.
    ///
    /// # Panics
    ///
    /// If more than [`NB_ARITH_COLS`] terms are given.
    pub(crate) fn assign_arith_row(
        &self,
        region: &mut Region<'_, F>,
        offset: usize,
        terms: &[Term<'_, F>],
        q_mul: F,
        q_const: F,
    ) -> Result<Vec<AssignedNative<F>>, Error> {
        assert!(terms.len() <= NB_ARITH_COLS);
        let config = &self.config;

        config.q_arith.enable(region, offset)?;
        region.assign_fixed(|| "q_mul", config.q_mul_col, offset, || Value::known(q_mul))?;
        region.assign_fixed(
            || "q_const",
            config.q_const_col,
            offset,
            || Value::known(q_const),
        )?;

        let mut cells = Vec::with_capacity(NB_ARITH_COLS);
        for i in 0..NB_ARITH_COLS {
            let (coeff, value) = match terms.get(i) {
                Some(term) => (term.coeff(), term.value()),
                None => (F::ZERO, Value::known(F::ZERO)),
            };
            region.assign_fixed(
                || "coeff",
                config.coeff_cols[i],
                offset,
                || Value::known(coeff),
            )?;
            let cell = region.assign_advice(|| "value", config.advice_cols[i], offset, || value)?;
            if let Some(Term::Copied(_, original)) = terms.get(i) {
                region.constrain_equal(cell.cell(), original.cell())?;
            }
            cells.push(cell);
        }

        Ok(cells)
    }

    /// Assigns a single arithmetic row in its own region.
    fn arith_row(
        &self,
        layouter: &mut impl Layouter<F>,
        terms: &[Term<'_, F>],
        q_mul: F,
        q_const: F,
    ) -> Result<Vec<AssignedNative<F>>, Error> {
        layouter.assign_region(
            || "arith row",
            |mut region| self.assign_arith_row(&mut region, 0, terms, q_mul, q_const),
        )
    }

    /// Returns a bit witnessing whether the given value is zero.
    ///
    /// Enforced with an inverse hint `inv` through the identities
    /// `b = 1 - x * inv` and `x * b = 0`.
    fn is_zero_native(
        &self,
        layouter: &mut impl Layouter<F>,
        x: &AssignedNative<F>,
    ) -> Result<AssignedBit<F>, Error> {
        let inv_val = x
            .value()
            .map(|v| Option::<F>::from(v.invert()).unwrap_or(F::ZERO));
        let b_val = x
            .value()
            .map(|v| if v.is_zero_vartime() { F::ONE } else { F::ZERO });

        layouter.assign_region(
            || "is_zero",
            |mut region| {
                let cells = self.assign_arith_row(
                    &mut region,
                    0,
                    &[
                        Term::Copied(F::ZERO, x),
                        Term::Fresh(F::ZERO, inv_val),
                        Term::Fresh(-F::ONE, b_val),
                    ],
                    -F::ONE,
                    F::ONE,
                )?;
                let b = cells[2].clone();
                self.assign_arith_row(
                    &mut region,
                    1,
                    &[Term::Copied(F::ZERO, x), Term::Copied(F::ZERO, &b)],
                    F::ONE,
                    F::ZERO,
                )?;
                Ok(AssignedBit(b))
            },
        )
    }

    /// `x AND y` on assigned bits.
    fn and2(
        &self,
        layouter: &mut impl Layouter<F>,
        x: &AssignedBit<F>,
        y: &AssignedBit<F>,
    ) -> Result<AssignedBit<F>, Error> {
        let out_val = x.0.value().copied() * y.0.value().copied();
        let cells = self.arith_row(
            layouter,
            &[
                Term::Copied(F::ZERO, &x.0),
                Term::Copied(F::ZERO, &y.0),
                Term::Fresh(-F::ONE, out_val),
            ],
            F::ONE,
            F::ZERO,
        )?;
        Ok(AssignedBit(cells[2].clone()))
    }

    /// `x OR y` on assigned bits, as `x + y - x * y`.
    fn or2(
        &self,
        layouter: &mut impl Layouter<F>,
        x: &AssignedBit<F>,
        y: &AssignedBit<F>,
    ) -> Result<AssignedBit<F>, Error> {
        let x_val = x.0.value().copied();
        let y_val = y.0.value().copied();
        let out_val = x_val + y_val - x_val * y_val;
        let cells = self.arith_row(
            layouter,
            &[
                Term::Copied(F::ONE, &x.0),
                Term::Copied(F::ONE, &y.0),
                Term::Fresh(-F::ONE, out_val),
            ],
            -F::ONE,
            F::ZERO,
        )?;
        Ok(AssignedBit(cells[2].clone()))
    }

    /// `x XOR y` on assigned bits, as `x + y - 2 * x * y`.
    fn xor2(
        &self,
        layouter: &mut impl Layouter<F>,
        x: &AssignedBit<F>,
        y: &AssignedBit<F>,
    ) -> Result<AssignedBit<F>, Error> {
        let x_val = x.0.value().copied();
        let y_val = y.0.value().copied();
        let two = F::ONE + F::ONE;
        let out_val = x_val + y_val - x_val * y_val * Value::known(two);
        let cells = self.arith_row(
            layouter,
            &[
                Term::Copied(F::ONE, &x.0),
                Term::Copied(F::ONE, &y.0),
                Term::Fresh(-F::ONE, out_val),
            ],
            -two,
            F::ZERO,
        )?;
        Ok(AssignedBit(cells[2].clone()))
    }
}

impl<F: PrimeField> AssignmentInstructions<F, AssignedNative<F>> for NativeChip<F> {
    fn assign(
        &self,
        layouter: &mut impl Layouter<F>,
        value: Value<F>,
    ) -> Result<AssignedNative<F>, Error> {
        let cells = self.arith_row(layouter, &[Term::Fresh(F::ZERO, value)], F::ZERO, F::ZERO)?;
        Ok(cells[0].clone())
    }

    fn assign_fixed(
        &self,
        layouter: &mut impl Layouter<F>,
        constant: F,
    ) -> Result<AssignedNative<F>, Error> {
        let cells = self.arith_row(
            layouter,
            &[Term::Fresh(F::ONE, Value::known(constant))],
            F::ZERO,
            -constant,
        )?;
        Ok(cells[0].clone())
    }
}

impl<F: PrimeField> AssertionInstructions<F, AssignedNative<F>> for NativeChip<F> {
    fn assert_equal(
        &self,
        layouter: &mut impl Layouter<F>,
        x: &AssignedNative<F>,
        y: &AssignedNative<F>,
    ) -> Result<(), Error> {
        layouter.assign_region(
            || "assert_equal",
            |mut region| region.constrain_equal(x.cell(), y.cell()),
        )
    }

    fn assert_not_equal(
        &self,
        layouter: &mut impl Layouter<F>,
        x: &AssignedNative<F>,
        y: &AssignedNative<F>,
    ) -> Result<(), Error> {
        let diff = self.sub(layouter, x, y)?;
        let inv_val = diff
            .value()
            .map(|v| Option::<F>::from(v.invert()).unwrap_or(F::ZERO));
        // diff * inv = 1 is satisfiable iff diff != 0.
        self.arith_row(
            layouter,
            &[Term::Copied(F::ZERO, &diff), Term::Fresh(F::ZERO, inv_val)],
            F::ONE,
            -F::ONE,
        )?;
        Ok(())
    }

    fn assert_equal_to_fixed(
        &self,
        layouter: &mut impl Layouter<F>,
        x: &AssignedNative<F>,
        constant: F,
    ) -> Result<(), Error> {
        self.arith_row(layouter, &[Term::Copied(F::ONE, x)], F::ZERO, -constant)?;
        Ok(())
    }

    fn assert_not_equal_to_fixed(
        &self,
        layouter: &mut impl Layouter<F>,
        x: &AssignedNative<F>,
        constant: F,
    ) -> Result<(), Error> {
        let diff = self.add_constant(layouter, x, -constant)?;
        let inv_val = diff
            .value()
            .map(|v| Option::<F>::from(v.invert()).unwrap_or(F::ZERO));
        self.arith_row(
            layouter,
            &[Term::Copied(F::ZERO, &diff), Term::Fresh(F::ZERO, inv_val)],
            F::ONE,
            -F::ONE,
        )?;
        Ok(())
    }
}

impl<F: PrimeField> ArithInstructions<F, AssignedNative<F>> for NativeChip<F> {
    fn linear_combination(
        &self,
        layouter: &mut impl Layouter<F>,
        terms: &[(F, AssignedNative<F>)],
        constant: F,
    ) -> Result<AssignedNative<F>, Error> {
        if terms.is_empty() {
            return self.assign_fixed(layouter, constant);
        }

        layouter.assign_region(
            || "linear combination",
            |mut region| {
                let mut offset = 0;
                let (head, tail) = terms.split_at(min(NB_ARITH_COLS - 1, terms.len()));

                let mut acc_val = Value::known(constant);
                for (coeff, x) in head {
                    acc_val = acc_val + x.value().map(|v| *coeff * v);
                }

                let mut row: Vec<Term<F>> =
                    head.iter().map(|(c, x)| Term::Copied(*c, x)).collect();
                row.push(Term::Fresh(-F::ONE, acc_val));
                let cells = self.assign_arith_row(&mut region, offset, &row, F::ZERO, constant)?;
                let mut acc = cells[row.len() - 1].clone();
                offset += 1;

                // Continuation rows fold the previous accumulator with up to
                // NB_ARITH_COLS - 2 further terms each.
                for chunk in tail.chunks(NB_ARITH_COLS - 2) {
                    let mut acc_val = acc.value().copied();
                    for (coeff, x) in chunk {
                        acc_val = acc_val + x.value().map(|v| *coeff * v);
                    }

                    let mut row: Vec<Term<F>> = vec![Term::Copied(F::ONE, &acc)];
                    row.extend(chunk.iter().map(|(c, x)| Term::Copied(*c, x)));
                    row.push(Term::Fresh(-F::ONE, acc_val));
                    let cells =
                        self.assign_arith_row(&mut region, offset, &row, F::ZERO, F::ZERO)?;
                    let new_acc = cells[row.len() - 1].clone();
                    drop(row);
                    acc = new_acc;
                    offset += 1;
                }

                Ok(acc)
            },
        )
    }

    fn mul(
        &self,
        layouter: &mut impl Layouter<F>,
        x: &AssignedNative<F>,
        y: &AssignedNative<F>,
        multiplying_constant: Option<F>,
    ) -> Result<AssignedNative<F>, Error> {
        let k = multiplying_constant.unwrap_or(F::ONE);
        let prod_val = x.value().copied() * y.value().copied() * Value::known(k);
        let cells = self.arith_row(
            layouter,
            &[
                Term::Copied(F::ZERO, x),
                Term::Copied(F::ZERO, y),
                Term::Fresh(-F::ONE, prod_val),
            ],
            k,
            F::ZERO,
        )?;
        Ok(cells[2].clone())
    }
}

impl<F: PrimeField> ZeroInstructions<F, AssignedNative<F>> for NativeChip<F> {}

impl<F: PrimeField> EqualityInstructions<F, AssignedNative<F>> for NativeChip<F> {
    fn is_equal(
        &self,
        layouter: &mut impl Layouter<F>,
        x: &AssignedNative<F>,
        y: &AssignedNative<F>,
    ) -> Result<AssignedBit<F>, Error> {
        let diff = self.sub(layouter, x, y)?;
        self.is_zero_native(layouter, &diff)
    }

    fn is_equal_to_fixed(
        &self,
        layouter: &mut impl Layouter<F>,
        x: &AssignedNative<F>,
        constant: F,
    ) -> Result<AssignedBit<F>, Error> {
        let diff = self.add_constant(layouter, x, -constant)?;
        self.is_zero_native(layouter, &diff)
    }
}

impl<F: PrimeField> ControlFlowInstructions<F, AssignedNative<F>> for NativeChip<F> {
    fn select(
        &self,
        layouter: &mut impl Layouter<F>,
        cond: &AssignedBit<F>,
        x: &AssignedNative<F>,
        y: &AssignedNative<F>,
    ) -> Result<AssignedNative<F>, Error> {
        let diff = self.sub(layouter, x, y)?;
        let out_val = y.value().copied() + cond.0.value().copied() * diff.value().copied();
        // out = y + cond * (x - y)
        let cells = self.arith_row(
            layouter,
            &[
                Term::Copied(F::ZERO, &cond.0),
                Term::Copied(F::ZERO, &diff),
                Term::Copied(F::ONE, y),
                Term::Fresh(-F::ONE, out_val),
            ],
            F::ONE,
            F::ZERO,
        )?;
        Ok(cells[3].clone())
    }

    // A single multiplication suffices for a swap, compared to the two
    // required by the default implementation.
    fn cond_swap(
        &self,
        layouter: &mut impl Layouter<F>,
        cond: &AssignedBit<F>,
        x: &AssignedNative<F>,
        y: &AssignedNative<F>,
    ) -> Result<(AssignedNative<F>, AssignedNative<F>), Error> {
        let diff = self.sub(layouter, y, x)?;
        let aux = self.mul(layouter, &cond.0, &diff, None)?;
        let new_x = self.add(layouter, x, &aux)?;
        let new_y = self.sub(layouter, y, &aux)?;
        Ok((new_x, new_y))
    }
}

impl<F: PrimeField> AssignmentInstructions<F, AssignedBit<F>> for NativeChip<F> {
    fn assign(
        &self,
        layouter: &mut impl Layouter<F>,
        value: Value<bool>,
    ) -> Result<AssignedBit<F>, Error> {
        let value = value.map(|b| if b { F::ONE } else { F::ZERO });
        layouter.assign_region(
            || "assign bit",
            |mut region| {
                // v * v - v = 0, with both cells equality-constrained.
                let cells = self.assign_arith_row(
                    &mut region,
                    0,
                    &[Term::Fresh(-F::ONE, value), Term::Fresh(F::ZERO, value)],
                    F::ONE,
                    F::ZERO,
                )?;
                region.constrain_equal(cells[0].cell(), cells[1].cell())?;
                Ok(AssignedBit(cells[0].clone()))
            },
        )
    }

    fn assign_fixed(
        &self,
        layouter: &mut impl Layouter<F>,
        constant: bool,
    ) -> Result<AssignedBit<F>, Error> {
        let constant = if constant { F::ONE } else { F::ZERO };
        let cell = AssignmentInstructions::<F, AssignedNative<F>>::assign_fixed(
            self, layouter, constant,
        )?;
        Ok(AssignedBit(cell))
    }
}

impl<F: PrimeField> AssertionInstructions<F, AssignedBit<F>> for NativeChip<F> {
    fn assert_equal(
        &self,
        layouter: &mut impl Layouter<F>,
        x: &AssignedBit<F>,
        y: &AssignedBit<F>,
    ) -> Result<(), Error> {
        AssertionInstructions::<F, AssignedNative<F>>::assert_equal(self, layouter, &x.0, &y.0)
    }

    fn assert_not_equal(
        &self,
        layouter: &mut impl Layouter<F>,
        x: &AssignedBit<F>,
        y: &AssignedBit<F>,
    ) -> Result<(), Error> {
        AssertionInstructions::<F, AssignedNative<F>>::assert_not_equal(self, layouter, &x.0, &y.0)
    }

    fn assert_equal_to_fixed(
        &self,
        layouter: &mut impl Layouter<F>,
        x: &AssignedBit<F>,
        constant: bool,
    ) -> Result<(), Error> {
        let constant = if constant { F::ONE } else { F::ZERO };
        AssertionInstructions::<F, AssignedNative<F>>::assert_equal_to_fixed(
            self, layouter, &x.0, constant,
        )
    }

    fn assert_not_equal_to_fixed(
        &self,
        layouter: &mut impl Layouter<F>,
        x: &AssignedBit<F>,
        constant: bool,
    ) -> Result<(), Error> {
        // The complement assertion is cheaper than a disequality check.
        AssertionInstructions::<F, AssignedBit<F>>::assert_equal_to_fixed(
            self, layouter, x, !constant,
        )
    }
}

impl<F: PrimeField> EqualityInstructions<F, AssignedBit<F>> for NativeChip<F> {
    fn is_equal(
        &self,
        layouter: &mut impl Layouter<F>,
        x: &AssignedBit<F>,
        y: &AssignedBit<F>,
    ) -> Result<AssignedBit<F>, Error> {
        let xor = self.xor2(layouter, x, y)?;
        self.not(layouter, &xor)
    }

    fn is_equal_to_fixed(
        &self,
        layouter: &mut impl Layouter<F>,
        x: &AssignedBit<F>,
        constant: bool,
    ) -> Result<AssignedBit<F>, Error> {
        if constant {
            Ok(x.clone())
        } else {
            self.not(layouter, x)
        }
    }
}

impl<F: PrimeField> ControlFlowInstructions<F, AssignedBit<F>> for NativeChip<F> {
    fn select(
        &self,
        layouter: &mut impl Layouter<F>,
        cond: &AssignedBit<F>,
        x: &AssignedBit<F>,
        y: &AssignedBit<F>,
    ) -> Result<AssignedBit<F>, Error> {
        // Both branches are bits, so the selected value is too.
        let bit = ControlFlowInstructions::<F, AssignedNative<F>>::select(
            self, layouter, cond, &x.0, &y.0,
        )?;
        Ok(AssignedBit(bit))
    }
}

impl<F: PrimeField> BinaryInstructions<F> for NativeChip<F> {
    fn and(
        &self,
        layouter: &mut impl Layouter<F>,
        bits: &[AssignedBit<F>],
    ) -> Result<AssignedBit<F>, Error> {
        assert!(!bits.is_empty());
        let mut acc = bits[0].clone();
        for bit in bits.iter().skip(1) {
            acc = self.and2(layouter, &acc, bit)?;
        }
        Ok(acc)
    }

    fn or(
        &self,
        layouter: &mut impl Layouter<F>,
        bits: &[AssignedBit<F>],
    ) -> Result<AssignedBit<F>, Error> {
        assert!(!bits.is_empty());
        let mut acc = bits[0].clone();
        for bit in bits.iter().skip(1) {
            acc = self.or2(layouter, &acc, bit)?;
        }
        Ok(acc)
    }

    fn xor(
        &self,
        layouter: &mut impl Layouter<F>,
        bits: &[AssignedBit<F>],
    ) -> Result<AssignedBit<F>, Error> {
        assert!(!bits.is_empty());
        let mut acc = bits[0].clone();
        for bit in bits.iter().skip(1) {
            acc = self.xor2(layouter, &acc, bit)?;
        }
        Ok(acc)
    }

    fn not(
        &self,
        layouter: &mut impl Layouter<F>,
        bit: &AssignedBit<F>,
    ) -> Result<AssignedBit<F>, Error> {
        let out_val = bit.0.value().map(|v| F::ONE - v);
        let cells = self.arith_row(
            layouter,
            &[Term::Copied(-F::ONE, &bit.0), Term::Fresh(-F::ONE, out_val)],
            F::ZERO,
            F::ONE,
        )?;
        Ok(AssignedBit(cells[1].clone()))
    }
}

impl<F: PrimeField> ConversionInstructions<F, AssignedBit<F>, AssignedNative<F>> for NativeChip<F> {
    fn convert_value(&self, x: &bool) -> Option<F> {
        Some(if *x { F::ONE } else { F::ZERO })
    }

    fn convert(
        &self,
        _layouter: &mut impl Layouter<F>,
        x: &AssignedBit<F>,
    ) -> Result<AssignedNative<F>, Error> {
        // The underlying cell of a bit is already a valid native value.
        Ok(x.0.clone())
    }
}

impl<F: PrimeField> ConversionInstructions<F, AssignedNative<F>, AssignedBit<F>> for NativeChip<F> {
    fn convert_value(&self, x: &F) -> Option<bool> {
        if *x == F::ZERO {
            Some(false)
        } else if *x == F::ONE {
            Some(true)
        } else {
            None
        }
    }

    fn convert(
        &self,
        layouter: &mut impl Layouter<F>,
        x: &AssignedNative<F>,
    ) -> Result<AssignedBit<F>, Error> {
        // x * x - x = 0
        self.arith_row(
            layouter,
            &[Term::Copied(-F::ONE, x), Term::Copied(F::ZERO, x)],
            F::ONE,
            F::ZERO,
        )?;
        Ok(AssignedBit(x.clone()))
    }
}

impl<F: PrimeField> UnsafeConversionInstructions<F, AssignedNative<F>, AssignedBit<F>>
    for NativeChip<F>
{
    fn convert_unsafe(
        &self,
        _layouter: &mut impl Layouter<F>,
        x: &AssignedNative<F>,
    ) -> Result<AssignedBit<F>, Error> {
        Ok(AssignedBit(x.clone()))
    }
}

#[cfg(any(test, feature = "testing"))]
impl<F: PrimeField> FromScratch<F> for NativeChip<F> {
    type Config = NativeConfig;

    fn new_from_scratch(config: &Self::Config) -> Self {
        <Self as ComposableChip<F>>::new(config, &())
    }

    fn configure_from_scratch(meta: &mut ConstraintSystem<F>) -> Self::Config {
        let advice_cols: [Column<Advice>; NB_ARITH_COLS] =
            core::array::from_fn(|_| meta.advice_column());
        let fixed_cols: [Column<Fixed>; NB_ARITH_FIXED_COLS] =
            core::array::from_fn(|_| meta.fixed_column());
        <Self as ComposableChip<F>>::configure(meta, &(advice_cols, fixed_cols))
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

    #[derive(Clone, Debug)]
    enum Operation {
        LinearCombination { coeffs: Vec<u64>, constant: u64 },
        Mul,
        AddConstant { constant: u64 },
        AssertNotEqual,
        IsEqual,
        And,
        Or,
        Xor,
        Not,
        Select,
        FixedAssignment,
    }

    #[derive(Clone, Debug)]
    struct TestCircuit {
        operation: Operation,
        inputs: Vec<u64>,
        expected: u64,
    }

    impl Circuit<Fp> for TestCircuit {
        type Config = NativeConfig;
        type FloorPlanner = SimpleFloorPlanner;

        fn without_witnesses(&self) -> Self {
            unreachable!()
        }

        fn configure(meta: &mut ConstraintSystem<Fp>) -> Self::Config {
            NativeChip::configure_from_scratch(meta)
        }

        fn synthesize(
            &self,
            config: Self::Config,
            mut layouter: impl Layouter<Fp>,
        ) -> Result<(), Error> {
            let chip = NativeChip::new_from_scratch(&config);
            let inputs: Vec<AssignedNative<Fp>> = self
                .inputs
                .iter()
                .map(|x| chip.assign(&mut layouter, Value::known(Fp::from(*x))))
                .collect::<Result<_, Error>>()?;
            let bits: Vec<AssignedBit<Fp>> = self
                .inputs
                .iter()
                .map(|x| chip.assign(&mut layouter, Value::known(*x != 0)))
                .collect::<Result<_, Error>>()?;
            let expected = Fp::from(self.expected);

            match &self.operation {
                Operation::LinearCombination { coeffs, constant } => {
                    let terms: Vec<(Fp, AssignedNative<Fp>)> = coeffs
                        .iter()
                        .zip(inputs.iter())
                        .map(|(c, x)| (Fp::from(*c), x.clone()))
                        .collect();
                    let res =
                        chip.linear_combination(&mut layouter, &terms, Fp::from(*constant))?;
                    chip.assert_equal_to_fixed(&mut layouter, &res, expected)?;
                }
                Operation::Mul => {
                    let res = chip.mul(&mut layouter, &inputs[0], &inputs[1], None)?;
                    chip.assert_equal_to_fixed(&mut layouter, &res, expected)?;
                }
                Operation::AddConstant { constant } => {
                    let res =
                        chip.add_constant(&mut layouter, &inputs[0], Fp::from(*constant))?;
                    chip.assert_equal_to_fixed(&mut layouter, &res, expected)?;
                }
                Operation::AssertNotEqual => {
                    chip.assert_not_equal(&mut layouter, &inputs[0], &inputs[1])?;
                }
                Operation::IsEqual => {
                    let b = chip.is_equal(&mut layouter, &inputs[0], &inputs[1])?;
                    chip.assert_equal_to_fixed(&mut layouter, &b, self.expected != 0)?;
                }
                Operation::And => {
                    let b = chip.and(&mut layouter, &bits)?;
                    chip.assert_equal_to_fixed(&mut layouter, &b, self.expected != 0)?;
                }
                Operation::Or => {
                    let b = chip.or(&mut layouter, &bits)?;
                    chip.assert_equal_to_fixed(&mut layouter, &b, self.expected != 0)?;
                }
                Operation::Xor => {
                    let b = chip.xor(&mut layouter, &bits)?;
                    chip.assert_equal_to_fixed(&mut layouter, &b, self.expected != 0)?;
                }
                Operation::Not => {
                    let b = chip.not(&mut layouter, &bits[0])?;
                    chip.assert_equal_to_fixed(&mut layouter, &b, self.expected != 0)?;
                }
                Operation::Select => {
                    let res = chip.select(&mut layouter, &bits[0], &inputs[1], &inputs[2])?;
                    chip.assert_equal_to_fixed(&mut layouter, &res, expected)?;
                }
                Operation::FixedAssignment => {
                    let res = chip.assign_fixed(&mut layouter, expected)?;
                    chip.assert_equal(&mut layouter, &res, &inputs[0])?;
                }
            }
            Ok(())
        }
    }

    fn run(operation: Operation, inputs: &[u64], expected: u64, must_pass: bool) {
        const K: u32 = 7;
        let circuit = TestCircuit {
            operation,
            inputs: inputs.to_vec(),
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

    #[test]
    fn test_linear_combination() {
        let lc = |coeffs: &[u64], constant: u64| Operation::LinearCombination {
            coeffs: coeffs.to_vec(),
            constant,
        };
        run(lc(&[], 7), &[], 7, true);
        run(lc(&[2], 0), &[21], 42, true);
        run(lc(&[1, 2, 3], 4), &[10, 20, 30], 144, true);
        // More terms than fit in a single row.
        run(lc(&[1, 1, 1, 1, 1, 1, 1], 0), &[1, 2, 3, 4, 5, 6, 7], 28, true);
        run(lc(&[1, 2, 3], 4), &[10, 20, 30], 143, false);
    }

    #[test]
    fn test_mul() {
        run(Operation::Mul, &[6, 7], 42, true);
        run(Operation::Mul, &[6, 7], 43, false);
        run(Operation::Mul, &[0, 7], 0, true);
    }

    #[test]
    fn test_add_constant() {
        run(Operation::AddConstant { constant: 5 }, &[37], 42, true);
        run(Operation::AddConstant { constant: 0 }, &[42], 42, true);
        run(Operation::AddConstant { constant: 5 }, &[37], 41, false);
    }

    #[test]
    fn test_assert_not_equal() {
        run(Operation::AssertNotEqual, &[1, 2], 0, true);
        run(Operation::AssertNotEqual, &[2, 2], 0, false);
    }

    #[test]
    fn test_is_equal() {
        run(Operation::IsEqual, &[4, 4], 1, true);
        run(Operation::IsEqual, &[4, 5], 0, true);
        run(Operation::IsEqual, &[4, 5], 1, false);
    }

    #[test]
    fn test_binary_gates() {
        run(Operation::And, &[1, 1, 1], 1, true);
        run(Operation::And, &[1, 0, 1], 0, true);
        run(Operation::Or, &[0, 0, 0], 0, true);
        run(Operation::Or, &[0, 1, 0], 1, true);
        run(Operation::Xor, &[1, 1], 0, true);
        run(Operation::Xor, &[1, 1, 1], 1, true);
        run(Operation::Not, &[1], 0, true);
        run(Operation::Not, &[0], 1, true);
        run(Operation::And, &[1, 1], 0, false);
    }

    #[test]
    fn test_select() {
        run(Operation::Select, &[1, 20, 30], 20, true);
        run(Operation::Select, &[0, 20, 30], 30, true);
        run(Operation::Select, &[1, 20, 30], 30, false);
    }

    #[test]
    fn test_fixed_assignment() {
        run(Operation::FixedAssignment, &[42], 42, true);
        run(Operation::FixedAssignment, &[41], 42, false);
    }
}
